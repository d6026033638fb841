use super::models::ChangeSet;
use super::{diff, ics, parser, scraper};
use crate::components::store::StoreActorHandle;
use crate::config::Config;
use crate::error::{component_error, BotResult, Error};
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::info;

/// The planning actor that processes messages.
///
/// One update cycle is scrape, parse, diff against the stored snapshot, and
/// replace the snapshot. Running the cycle behind the actor mailbox makes it
/// the snapshot's only writer: a second tick arriving while a scrape is
/// still in flight queues instead of running concurrently.
pub struct PlanningActor {
    config: Arc<RwLock<Config>>,
    store_handle: StoreActorHandle,
    command_rx: mpsc::Receiver<PlanningCommand>,
}

/// Commands that can be sent to the planning actor
pub enum PlanningCommand {
    RunUpdateCycle(mpsc::Sender<BotResult<ChangeSet>>),
    ExportCalendar(mpsc::Sender<BotResult<String>>),
    Shutdown,
}

/// Handle for communicating with the planning actor
#[derive(Clone)]
pub struct PlanningActorHandle {
    command_tx: mpsc::Sender<PlanningCommand>,
}

impl PlanningActorHandle {
    /// Run one scrape-diff-persist cycle and return the detected changes
    pub async fn run_update_cycle(&self) -> BotResult<ChangeSet> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(PlanningCommand::RunUpdateCycle(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Build the calendar file from the current snapshot; returns its text
    pub async fn export_calendar(&self) -> BotResult<String> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(PlanningCommand::ExportCalendar(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        let _ = self.command_tx.send(PlanningCommand::Shutdown).await;
        Ok(())
    }
}

impl PlanningActor {
    /// Create a new actor and return its handle
    pub fn new(
        config: Arc<RwLock<Config>>,
        store_handle: StoreActorHandle,
    ) -> (Self, PlanningActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            config,
            store_handle,
            command_rx,
        };

        let handle = PlanningActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Planning actor started");

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                PlanningCommand::RunUpdateCycle(response_tx) => {
                    let result = self.run_update_cycle().await;
                    let _ = response_tx.send(result).await;
                }
                PlanningCommand::ExportCalendar(response_tx) => {
                    let result = self.export_calendar().await;
                    let _ = response_tx.send(result).await;
                }
                PlanningCommand::Shutdown => {
                    info!("Planning actor shutting down");
                    break;
                }
            }
        }

        info!("Planning actor shut down");
    }

    /// One full update cycle. A failed scrape leaves the snapshot untouched;
    /// the snapshot is only replaced once the new collection parsed cleanly.
    async fn run_update_cycle(&self) -> BotResult<ChangeSet> {
        let (scrape_command, timeout_secs) = {
            let config = self.config.read().await;
            (config.scrape_command.clone(), config.scrape_timeout_secs)
        };

        let rows = scraper::run_scrape(&scrape_command, timeout_secs).await?;
        let new_events = parser::events_from_rows(rows);

        let old_events = self.store_handle.load_courses().await?;
        let changes = diff::diff(&old_events, &new_events);

        self.store_handle.replace_courses(new_events).await?;

        info!(
            "Update cycle finished: {} added, {} removed",
            changes.added.len(),
            changes.removed.len()
        );
        Ok(changes)
    }

    /// Build the calendar from the full snapshot and write it to disk
    async fn export_calendar(&self) -> BotResult<String> {
        let (timezone, ics_path) = {
            let config = self.config.read().await;
            (config.timezone.clone(), config.ics_path.clone())
        };

        let tz: Tz = timezone
            .parse()
            .map_err(|_| Error::Config(format!("Invalid timezone: {}", timezone)))?;

        let events = self.store_handle.load_courses().await?;
        let calendar = ics::build_calendar(&events, tz);
        tokio::fs::write(&ics_path, &calendar).await?;

        Ok(calendar)
    }
}
