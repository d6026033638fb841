use super::actor::{PlanningActor, PlanningActorHandle};
use super::models::ChangeSet;
use crate::components::store::StoreActorHandle;
use crate::config::Config;
use crate::error::BotResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Handle for interacting with the planning actor
#[derive(Clone)]
pub struct PlanningHandle {
    actor_handle: PlanningActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl PlanningHandle {
    /// Create a new PlanningHandle and spawn the actor
    pub fn new(config: Arc<RwLock<Config>>, store_handle: StoreActorHandle) -> Self {
        // Create the actor and get its handle
        let (mut actor, handle) = PlanningActor::new(config, store_handle);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Run one scrape-diff-persist cycle
    pub async fn run_update_cycle(&self) -> BotResult<ChangeSet> {
        self.actor_handle.run_update_cycle().await
    }

    /// Regenerate the calendar file and return its text
    pub async fn export_calendar(&self) -> BotResult<String> {
        self.actor_handle.export_calendar().await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        self.actor_handle.shutdown().await
    }
}
