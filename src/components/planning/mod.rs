mod actor;
pub mod diff;
pub mod format;
mod handle;
pub mod ics;
pub mod models;
mod notifications;
pub mod parser;
mod scheduler;
pub mod scraper;
pub mod time;

pub use handle::PlanningHandle;
pub use models::{ChangeSet, HomeworkItem, ScheduleEvent};
pub use scheduler::{route_changes, Delivery};

use super::store::StoreActorHandle;
use crate::config::Config;
use crate::error::BotResult;
use crate::utils::scheduler::Scheduler;
use async_trait::async_trait;
use lazy_static::lazy_static;
use poise::serenity_prelude as serenity;
use scheduler::{PlanningScheduler, SchedulerHandles};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

lazy_static! {
    static ref SCHEDULER_STARTED: AtomicBool = AtomicBool::new(false);
}

/// Planning component: timetable snapshot tracking and change announcements
#[derive(Default)]
pub struct Planning {
    handle: RwLock<Option<PlanningHandle>>,
    ctx: RwLock<Option<Arc<serenity::Context>>>,
}

impl Planning {
    /// Create a new planning component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
            ctx: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<PlanningHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for Planning {
    fn name(&self) -> &'static str {
        "planning"
    }

    async fn init(
        &self,
        ctx: &serenity::Context,
        config: Arc<RwLock<Config>>,
        store_handle: StoreActorHandle,
    ) -> BotResult<()> {
        // Store context for scheduler
        *self.ctx.write().await = Some(Arc::new(ctx.clone()));

        // Create a new handle if one doesn't exist
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            *handle_lock = Some(PlanningHandle::new(config.clone(), store_handle.clone()));
        }

        // Get the handle and context for the scheduler
        let handle = handle_lock.as_ref().unwrap().clone();
        let ctx = Arc::new(ctx.clone());

        // Start the notification scheduler only if it hasn't been started yet
        if !SCHEDULER_STARTED.swap(true, Ordering::SeqCst) {
            info!("Starting planning scheduler");
            let handles = SchedulerHandles {
                planning: handle,
                store: store_handle,
            };
            if let Err(e) = PlanningScheduler::start(ctx, config, handles).await {
                error!("Failed to start planning scheduler: {}", e);
            }
        } else {
            warn!("Planning scheduler is already running, skipping initialization");
        }

        Ok(())
    }

    async fn shutdown(&self) -> BotResult<()> {
        // Shutdown the handle if it exists
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }

        // Stop the scheduler
        let scheduler = PlanningScheduler;
        scheduler.stop().await?;

        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
