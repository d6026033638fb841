use chrono::{Duration, Utc};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use poise::serenity_prelude as serenity;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration as TokioDuration};
use tracing::{error, info, warn};

use super::handle::PlanningHandle;
use super::models::ChangeSet;
use super::notifications::{
    send_added_courses, send_daily_schedule, send_removed_courses, send_status,
};
use super::time::{next_daily_time, wait_seconds};
use crate::components::store::StoreActorHandle;
use crate::config::Config;
use crate::error::{BotResult, Error};
use crate::utils::scheduler::Scheduler;

lazy_static! {
    static ref SCHEDULER_TASK_RUNNING: AtomicBool = AtomicBool::new(false);
}

/// Notification channel IDs, read from config once at startup
#[derive(Debug, Clone, Copy)]
pub struct ChannelSet {
    pub daily: u64,
    pub added: u64,
    pub removed: u64,
    pub logs: u64,
}

/// Handles the planning scheduler needs to do its work
#[derive(Clone)]
pub struct SchedulerHandles {
    pub planning: PlanningHandle,
    pub store: StoreActorHandle,
}

/// Scheduler driving the two periodic loops: the daily schedule posting at
/// a fixed wall-clock time and the fixed-interval update cycle.
pub struct PlanningScheduler;

impl Scheduler for PlanningScheduler {
    type Handle = SchedulerHandles;

    fn start(
        ctx: Arc<serenity::Context>,
        config: Arc<RwLock<Config>>,
        handles: SchedulerHandles,
    ) -> Pin<Box<dyn Future<Output = BotResult<()>> + Send>> {
        Box::pin(async move {
            // Read config values
            let config_read = config.read().await;
            let tz: Tz = config_read
                .timezone
                .parse()
                .map_err(|_| Error::Config(format!("Invalid timezone: {}", config_read.timezone)))?;
            let daily_time = config_read.daily_schedule_time.clone();
            let update_interval = config_read.update_interval_secs;
            let channels = ChannelSet {
                daily: config_read.daily_schedule_channel_id,
                added: config_read.added_courses_channel_id,
                removed: config_read.removed_courses_channel_id,
                logs: config_read.bot_logs_channel_id,
            };
            drop(config_read);

            // Only spawn the loops if they are not already running
            if SCHEDULER_TASK_RUNNING.swap(true, Ordering::SeqCst) {
                warn!("Planning scheduler is already running, skipping initialization");
                return Ok(());
            }

            info!("Starting planning scheduler");

            let ctx_clone = Arc::clone(&ctx);
            let store = handles.store.clone();
            tokio::spawn(async move {
                run_daily_loop(ctx_clone, tz, daily_time, channels.daily, store).await;
            });

            let planning = handles.planning.clone();
            tokio::spawn(async move {
                run_update_loop(ctx, update_interval, channels, planning).await;
            });

            Ok(())
        })
    }

    fn stop(&self) -> Pin<Box<dyn Future<Output = BotResult<()>> + Send>> {
        Box::pin(async move {
            SCHEDULER_TASK_RUNNING.store(false, Ordering::SeqCst);
            Ok(())
        })
    }
}

/// Post tomorrow's schedule every day at the configured wall-clock time
async fn run_daily_loop(
    ctx: Arc<serenity::Context>,
    tz: Tz,
    daily_time: String,
    channel_id: u64,
    store: StoreActorHandle,
) {
    loop {
        let now = Utc::now().with_timezone(&tz);
        let next = match next_daily_time(now, &daily_time) {
            Some(next) => next,
            None => {
                error!("Invalid daily schedule time: {}", daily_time);
                sleep(TokioDuration::from_secs(3600)).await; // Retry in an hour
                continue;
            }
        };

        info!("Next daily schedule posting at {}", next);
        sleep(TokioDuration::from_secs(wait_seconds(now, next))).await;

        if !SCHEDULER_TASK_RUNNING.load(Ordering::SeqCst) {
            break;
        }

        let tomorrow = Utc::now().with_timezone(&tz).date_naive() + Duration::days(1);
        if let Err(e) = send_daily_schedule(&ctx, channel_id, &store, tomorrow).await {
            error!("Failed to send daily schedule: {}", e);
        }
    }
}

/// Run the update cycle on a fixed interval. Each cycle is awaited to
/// completion before the next sleep starts, so cycles never overlap.
async fn run_update_loop(
    ctx: Arc<serenity::Context>,
    interval_secs: u64,
    channels: ChannelSet,
    planning: PlanningHandle,
) {
    loop {
        sleep(TokioDuration::from_secs(interval_secs)).await;

        if !SCHEDULER_TASK_RUNNING.load(Ordering::SeqCst) {
            break;
        }

        run_update_cycle(&ctx, channels, &planning).await;
    }
}

/// The sinks one cycle's changeset fans out to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    AddedCourses,
    RemovedCourses,
    NoChanges,
}

/// Decide which sinks a changeset goes to. Each non-empty list goes to its
/// announcement channel; a fully empty changeset becomes exactly one
/// status line to the log channel instead.
pub fn route_changes(changes: &ChangeSet) -> Vec<Delivery> {
    let mut deliveries = Vec::new();
    if !changes.added.is_empty() {
        deliveries.push(Delivery::AddedCourses);
    }
    if !changes.removed.is_empty() {
        deliveries.push(Delivery::RemovedCourses);
    }
    if deliveries.is_empty() {
        deliveries.push(Delivery::NoChanges);
    }
    deliveries
}

/// One tick of the update loop: run the cycle and route its outcome.
/// Every error becomes exactly one log-channel message; nothing here is
/// allowed to take the loop down.
pub async fn run_update_cycle(
    ctx: &serenity::Context,
    channels: ChannelSet,
    planning: &PlanningHandle,
) {
    match planning.run_update_cycle().await {
        Ok(changes) => {
            for delivery in route_changes(&changes) {
                match delivery {
                    Delivery::AddedCourses => {
                        if let Err(e) =
                            send_added_courses(ctx, channels.added, &changes.added).await
                        {
                            let text =
                                format!("Could not send added-courses notification: {}", e);
                            report(ctx, channels.logs, &text).await;
                        }
                    }
                    Delivery::RemovedCourses => {
                        if let Err(e) =
                            send_removed_courses(ctx, channels.removed, &changes.removed).await
                        {
                            let text =
                                format!("Could not send removed-courses notification: {}", e);
                            report(ctx, channels.logs, &text).await;
                        }
                    }
                    Delivery::NoChanges => {
                        report(ctx, channels.logs, "No course changes detected during update.")
                            .await;
                    }
                }
            }

            match planning.export_calendar().await {
                Ok(_) => {
                    report(ctx, channels.logs, "Successfully generated calendar file.").await;
                }
                Err(e) => {
                    let text = format!("Error generating calendar file: {}", e);
                    report(ctx, channels.logs, &text).await;
                }
            }
        }
        Err(e) => report(ctx, channels.logs, &describe_cycle_error(&e)).await,
    }
}

/// One human-readable status line per error kind
fn describe_cycle_error(error: &Error) -> String {
    match error {
        Error::ScrapeUnavailable(msg) => format!("Error: scraper could not be started: {}", msg),
        Error::ScrapeFailed(msg) => format!("Error updating planning: {}", msg),
        Error::MalformedOutput(msg) => {
            format!("Error: could not process course updates: {}", msg)
        }
        other => format!("Unexpected error during planning update: {}", other),
    }
}

/// Deliver a status line to the log channel; if the log channel itself is
/// unreachable the message goes to the process log only
async fn report(ctx: &serenity::Context, logs_channel: u64, text: &str) {
    if let Err(e) = send_status(ctx, logs_channel, text).await {
        error!("Failed to report to log channel: {} (message was: {})", e, text);
    }
}
