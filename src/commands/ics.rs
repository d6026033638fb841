use crate::commands::{CommandResult, Context};
use crate::components::planning::Planning;
use crate::components::PlanningHandle;
use poise::serenity_prelude as serenity;

/// Generates an .ics file of the schedule
#[poise::command(slash_command, prefix_command)]
pub async fn export_ics(ctx: Context<'_>) -> CommandResult {
    ctx.defer().await?;

    let handle = planning_handle(&ctx).await;

    match handle.export_calendar().await {
        Ok(calendar) => {
            let filename = {
                let config = ctx.data().config.read().await;
                config.ics_path.clone()
            };

            ctx.send(
                poise::CreateReply::default()
                    .content("Generated planning calendar.")
                    .attachment(serenity::CreateAttachment::bytes(
                        calendar.into_bytes(),
                        filename,
                    )),
            )
            .await?;
        }
        Err(e) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!(
                        "An error occurred while generating the calendar file: {}",
                        e
                    ))
                    .ephemeral(true),
            )
            .await?;
        }
    }

    Ok(())
}

/// Get the planning handle from the component manager, creating a
/// standalone one when the component is not available
async fn planning_handle(ctx: &Context<'_>) -> PlanningHandle {
    let config = ctx.data().config.clone();
    let store = ctx.data().store.clone();

    if let Some(cm) = &ctx.data().component_manager {
        if let Some(component) = cm.get_component_by_name("planning") {
            if let Some(planning) = component.as_any().downcast_ref::<Planning>() {
                if let Some(handle) = planning.get_handle().await {
                    return handle;
                }
            }
        }
    }

    tracing::debug!("Planning component not available, creating standalone handle");
    PlanningHandle::new(config, store)
}
