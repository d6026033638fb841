use crate::components::planning::format::{split_message, MAX_MESSAGE_LEN};
use crate::components::store::StoreActorHandle;
use crate::components::ComponentManager;
use crate::config::Config;
use crate::error::BotResult;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tokio::sync::RwLock;

// Export submodules
pub mod homework;
pub mod ics;
pub mod schedule;
pub mod util;

/// Shared context for all commands
pub struct CommandContext {
    pub config: Arc<RwLock<Config>>,
    pub component_manager: Option<Arc<ComponentManager>>,
    pub store: StoreActorHandle,
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("config", &self.config)
            .field(
                "component_manager",
                &self.component_manager.as_ref().map(|_| "ComponentManager"),
            )
            .finish()
    }
}

impl CommandContext {
    /// Create a new command context
    pub fn new(config: Arc<RwLock<Config>>, store: StoreActorHandle) -> Self {
        Self {
            config,
            component_manager: None,
            store,
        }
    }

    /// Set the component manager
    pub fn with_component_manager(mut self, component_manager: Arc<ComponentManager>) -> Self {
        self.component_manager = Some(component_manager);
        self
    }
}

/// Type alias for command result
pub type CommandResult = BotResult<()>;

/// Type alias for poise context
pub type Context<'a> = poise::Context<'a, CommandContext, crate::error::Error>;

/// All application commands and event listeners
pub fn get_all_application_commands() -> Vec<poise::Command<CommandContext, crate::error::Error>> {
    vec![
        // Utility commands
        util::ping(),
        // Schedule lookups
        schedule::schedule(),
        schedule::current_week(),
        schedule::next_week(),
        // Homework tracking
        homework::add_homework(),
        homework::view_homework(),
        // Calendar export
        ics::export_ics(),
    ]
}

/// Reply with a possibly long message, chunked to the size limit; the first
/// chunk is the reply and the rest are follow-ups in order
pub async fn say_chunked(ctx: Context<'_>, message: &str) -> CommandResult {
    for chunk in split_message(message, MAX_MESSAGE_LEN) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

/// Build a red error embed
pub fn create_error_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_string())
        .description(description.to_string())
        .color(0xFF_00_00)
}

/// Build a green success embed
pub fn create_success_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_string())
        .description(description.to_string())
        .color(0x00_FF_00)
}
