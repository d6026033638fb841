use crate::components::planning::models::{HomeworkItem, ScheduleEvent};
use crate::components::planning::time::parse_event_date;
use crate::config::Config;
use crate::error::{store_error, BotResult};
use chrono::{Duration, NaiveDate};
use redis::{aio::MultiplexedConnection, AsyncCommands, Client as RedisClient};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::info;

// Redis key constants
pub mod keys {
    pub const PLANNING_COURSES: &str = "planning:courses";
    pub const PLANNING_HOMEWORK: &str = "planning:homework";
}

/// The snapshot store actor that processes messages.
///
/// The actor owns the durable course snapshot and the homework list. All
/// access goes through its mailbox, so the single-writer role of the update
/// cycle and the interactive readers are serialized; a snapshot replacement
/// is one Redis SET of the serialized collection, so a reader never sees a
/// mix of old and new events.
pub struct StoreActor {
    config: Arc<RwLock<Config>>,
    client: RedisClient,
    command_rx: mpsc::Receiver<StoreCommand>,
}

/// Commands that can be sent to the store actor
pub enum StoreCommand {
    LoadCourses(mpsc::Sender<BotResult<Vec<ScheduleEvent>>>),
    ReplaceCourses(Vec<ScheduleEvent>, mpsc::Sender<BotResult<()>>),
    GetDaySchedule(NaiveDate, mpsc::Sender<BotResult<Vec<ScheduleEvent>>>),
    GetWeekSchedule(NaiveDate, mpsc::Sender<BotResult<Vec<ScheduleEvent>>>),
    AddHomework(HomeworkItem, mpsc::Sender<BotResult<()>>),
    GetHomework(mpsc::Sender<BotResult<Vec<HomeworkItem>>>),
    Shutdown,
}

/// Handle for communicating with the store actor
#[derive(Clone)]
pub struct StoreActorHandle {
    command_tx: mpsc::Sender<StoreCommand>,
}

impl StoreActorHandle {
    /// Create a new empty handle for initialization purposes
    pub fn empty() -> Self {
        let (command_tx, _) = mpsc::channel(32);
        Self { command_tx }
    }

    /// Load the full stored snapshot; empty when nothing is stored yet
    pub async fn load_courses(&self) -> BotResult<Vec<ScheduleEvent>> {
        self.request(StoreCommand::LoadCourses).await
    }

    /// Replace the stored snapshot wholesale
    pub async fn replace_courses(&self, courses: Vec<ScheduleEvent>) -> BotResult<()> {
        self.request(|tx| StoreCommand::ReplaceCourses(courses, tx))
            .await
    }

    /// Get all events on one day, sorted by start time
    pub async fn get_day_schedule(&self, date: NaiveDate) -> BotResult<Vec<ScheduleEvent>> {
        self.request(|tx| StoreCommand::GetDaySchedule(date, tx))
            .await
    }

    /// Get all events in the week starting at `monday`, sorted by date and time
    pub async fn get_week_schedule(&self, monday: NaiveDate) -> BotResult<Vec<ScheduleEvent>> {
        self.request(|tx| StoreCommand::GetWeekSchedule(monday, tx))
            .await
    }

    /// Append one homework item
    pub async fn add_homework(&self, item: HomeworkItem) -> BotResult<()> {
        self.request(|tx| StoreCommand::AddHomework(item, tx)).await
    }

    /// Get all homework items, sorted by due date
    pub async fn get_homework(&self) -> BotResult<Vec<HomeworkItem>> {
        self.request(StoreCommand::GetHomework).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        let _ = self.command_tx.send(StoreCommand::Shutdown).await;
        Ok(())
    }

    async fn request<T>(
        &self,
        make_cmd: impl FnOnce(mpsc::Sender<BotResult<T>>) -> StoreCommand,
    ) -> BotResult<T> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(make_cmd(response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }
}

impl StoreActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<RwLock<Config>>) -> (Self, StoreActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        // Connections are opened lazily with the configured URL
        let redis = RedisClient::open("redis://127.0.0.1:6379")
            .expect("Failed to create Redis client");

        let actor = Self {
            config,
            client: redis,
            command_rx,
        };

        let handle = StoreActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Snapshot store actor started");

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                StoreCommand::LoadCourses(response_tx) => {
                    let result = self.load_courses().await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::ReplaceCourses(courses, response_tx) => {
                    let result = self.replace_courses(courses).await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::GetDaySchedule(date, response_tx) => {
                    let result = self.get_schedule_between(date, date).await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::GetWeekSchedule(monday, response_tx) => {
                    let sunday = monday + Duration::days(6);
                    let result = self.get_schedule_between(monday, sunday).await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::AddHomework(item, response_tx) => {
                    let result = self.add_homework(item).await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::GetHomework(response_tx) => {
                    let result = self.get_homework().await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::Shutdown => {
                    info!("Snapshot store actor shutting down");
                    break;
                }
            }
        }

        info!("Snapshot store actor shut down");
    }

    /// Get a redis connection
    async fn get_connection(&self) -> BotResult<MultiplexedConnection> {
        // Get Redis URL from config
        let redis_url = {
            let config_guard = self.config.read().await;
            config_guard.redis_url.clone()
        };

        // Reconnect with the proper URL if needed
        let redis = if redis_url != "redis://127.0.0.1:6379" {
            RedisClient::open(redis_url)
                .map_err(|e| store_error(&format!("Failed to create Redis client: {}", e)))?
        } else {
            self.client.clone()
        };

        redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| store_error(&format!("Failed to connect to Redis: {}", e)))
    }

    /// Load the stored snapshot; an uninitialized store yields an empty list
    async fn load_courses(&self) -> BotResult<Vec<ScheduleEvent>> {
        self.read_list(keys::PLANNING_COURSES).await
    }

    /// Replace the snapshot with a single SET of the serialized collection
    async fn replace_courses(&self, courses: Vec<ScheduleEvent>) -> BotResult<()> {
        self.write_list(keys::PLANNING_COURSES, &courses).await
    }

    /// Events whose start date falls inside [start, end], sorted
    async fn get_schedule_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BotResult<Vec<ScheduleEvent>> {
        let mut events: Vec<(NaiveDate, ScheduleEvent)> = self
            .load_courses()
            .await?
            .into_iter()
            .filter_map(|e| parse_event_date(&e.start_date).map(|d| (d, e)))
            .filter(|(d, _)| *d >= start && *d <= end)
            .collect();

        events.sort_by(|a, b| (a.0, &a.1.start_time).cmp(&(b.0, &b.1.start_time)));
        Ok(events.into_iter().map(|(_, e)| e).collect())
    }

    /// Append a homework item to the stored list
    async fn add_homework(&self, item: HomeworkItem) -> BotResult<()> {
        let mut items: Vec<HomeworkItem> = self.read_list(keys::PLANNING_HOMEWORK).await?;
        items.push(item);
        self.write_list(keys::PLANNING_HOMEWORK, &items).await
    }

    /// All homework items, sorted by due date
    async fn get_homework(&self) -> BotResult<Vec<HomeworkItem>> {
        let mut items: Vec<HomeworkItem> = self.read_list(keys::PLANNING_HOMEWORK).await?;
        items.sort_by(|a, b| {
            let a_date = parse_event_date(&a.due_date);
            let b_date = parse_event_date(&b.due_date);
            a_date.cmp(&b_date)
        });
        Ok(items)
    }

    /// Read a JSON-serialized list from Redis
    async fn read_list<T: serde::de::DeserializeOwned>(&self, key: &str) -> BotResult<Vec<T>> {
        let mut conn = self.get_connection().await?;

        let exists: bool = conn
            .exists(key)
            .await
            .map_err(|e| store_error(&format!("Redis error: {}", e)))?;

        if !exists {
            return Ok(Vec::new());
        }

        let json: String = conn
            .get(key)
            .await
            .map_err(|e| store_error(&format!("Failed to read {} from Redis: {}", key, e)))?;

        serde_json::from_str(&json)
            .map_err(|e| store_error(&format!("Failed to deserialize {}: {}", key, e)))
    }

    /// Write a JSON-serialized list to Redis in one SET
    async fn write_list<T: serde::Serialize>(&self, key: &str, items: &[T]) -> BotResult<()> {
        let mut conn = self.get_connection().await?;

        let json = serde_json::to_string(items)
            .map_err(|e| store_error(&format!("Failed to serialize {}: {}", key, e)))?;

        () = conn
            .set(key, json)
            .await
            .map_err(|e| store_error(&format!("Failed to write {} to Redis: {}", key, e)))?;

        Ok(())
    }
}
