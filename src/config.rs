use crate::error::{env_error, BotResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use toml;

/// Default activity text for the bot
pub const DEFAULT_ACTIVITY: &str = "Watching the planning";

/// Default command used to run the external timetable scraper
pub const DEFAULT_SCRAPE_COMMAND: &str = "python3 planning_parser.py";

/// Main configuration structure for the bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Discord bot token
    pub discord_token: String,
    /// Discord channel ID for the daily schedule posting
    pub daily_schedule_channel_id: u64,
    /// Discord channel ID for added-course announcements
    pub added_courses_channel_id: u64,
    /// Discord channel ID for removed-course announcements
    pub removed_courses_channel_id: u64,
    /// Discord channel ID for operational status and errors
    pub bot_logs_channel_id: u64,
    /// Redis connection URL for the snapshot store
    pub redis_url: String,
    /// Timezone the timetable is expressed in
    pub timezone: String,
    /// Wall-clock time (HH:MM) of the daily schedule posting
    pub daily_schedule_time: String,
    /// Interval between update cycles, in seconds
    pub update_interval_secs: u64,
    /// Command line invoking the external scraper
    pub scrape_command: String,
    /// Upper bound on one scraper run, in seconds
    pub scrape_timeout_secs: u64,
    /// Path the generated calendar file is written to
    pub ics_path: String,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
    /// Bot activity status text
    pub activity: String,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let discord_token = env::var("DISCORD_TOKEN").map_err(|_| env_error("DISCORD_TOKEN"))?;

        let daily_schedule_channel_id = parse_channel_id("DAILY_SCHEDULE_CHANNEL_ID")?;
        let added_courses_channel_id = parse_channel_id("ADDED_COURSES_CHANNEL_ID")?;
        let removed_courses_channel_id = parse_channel_id("REMOVED_COURSES_CHANNEL_ID")?;
        let bot_logs_channel_id = parse_channel_id("BOT_LOGS_CHANNEL_ID")?;

        // Optional values with defaults
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| String::from("redis://127.0.0.1:6379"));
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from("Europe/Paris"));
        let daily_schedule_time =
            env::var("DAILY_SCHEDULE_TIME").unwrap_or_else(|_| String::from("18:00"));
        let update_interval_secs = env::var("UPDATE_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(300);
        let scrape_command =
            env::var("SCRAPE_COMMAND").unwrap_or_else(|_| String::from(DEFAULT_SCRAPE_COMMAND));
        let scrape_timeout_secs = env::var("SCRAPE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(120);
        let ics_path = env::var("ICS_PATH").unwrap_or_else(|_| String::from("planning.ics"));

        // Bot activity status
        let activity = env::var("BOT_ACTIVITY").unwrap_or_else(|_| String::from(DEFAULT_ACTIVITY));

        // Initialize default components
        let mut components = HashMap::new();
        components.insert("planning".to_string(), true);

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string("config/components.toml") {
            if let Ok(file_components) = toml::from_str::<HashMap<String, bool>>(&content) {
                // Merge with defaults
                for (key, value) in file_components {
                    components.insert(key, value);
                }
            }
        }

        Ok(Config {
            discord_token,
            daily_schedule_channel_id,
            added_courses_channel_id,
            removed_courses_channel_id,
            bot_logs_channel_id,
            redis_url,
            timezone,
            daily_schedule_time,
            update_interval_secs,
            scrape_command,
            scrape_timeout_secs,
            ics_path,
            components,
            activity,
        })
    }

    /// Check if a component is enabled
    #[allow(dead_code)]
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }

    /// Update component enabled status
    #[allow(dead_code)]
    pub fn set_component_enabled(&mut self, name: &str, enabled: bool) -> BotResult<()> {
        self.components.insert(name.to_string(), enabled);
        self.save_components()
    }

    /// Save component configuration to file
    #[allow(dead_code)]
    fn save_components(&self) -> BotResult<()> {
        // Create config directory if it doesn't exist
        if !Path::new("config").exists() {
            fs::create_dir("config")?;
        }

        let toml_str = toml::to_string(&self.components)?;
        fs::write("config/components.toml", toml_str)?;

        Ok(())
    }
}

/// Read a channel ID from the environment
fn parse_channel_id(var: &str) -> BotResult<u64> {
    env::var(var)
        .map_err(|_| env_error(var))?
        .parse::<u64>()
        .map_err(|_| env_error(&format!("Invalid {} format", var)))
}
