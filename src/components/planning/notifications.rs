use super::format::{format_change_lines, format_events, split_message, MAX_MESSAGE_LEN};
use super::models::ScheduleEvent;
use super::time::format_date;
use crate::components::store::StoreActorHandle;
use crate::error::BotResult;
use chrono::NaiveDate;
use poise::serenity_prelude::{self as serenity, ChannelId, CreateMessage};
use tracing::info;

/// Send a message to a channel, chunked to the size limit.
///
/// Chunks are awaited one by one so they arrive in document order.
pub async fn send_chunked(
    ctx: &serenity::Context,
    channel_id: u64,
    message: &str,
) -> BotResult<()> {
    for chunk in split_message(message, MAX_MESSAGE_LEN) {
        ChannelId::new(channel_id)
            .send_message(&ctx.http, CreateMessage::new().content(chunk))
            .await?;
    }
    Ok(())
}

/// Post tomorrow's schedule to the daily channel
pub async fn send_daily_schedule(
    ctx: &serenity::Context,
    channel_id: u64,
    store: &StoreActorHandle,
    tomorrow: NaiveDate,
) -> BotResult<()> {
    info!("Sending daily schedule for {}", format_date(tomorrow));

    let events = store.get_day_schedule(tomorrow).await?;
    let date_str = format_date(tomorrow);

    let message = if events.is_empty() {
        format!("No events found for tomorrow ({}).", date_str)
    } else {
        format_events(
            &events,
            &format!("**Planning for Tomorrow ({}):**\n", date_str),
        )
    };

    send_chunked(ctx, channel_id, &message).await
}

/// Announce courses that appeared in the latest snapshot
pub async fn send_added_courses(
    ctx: &serenity::Context,
    channel_id: u64,
    events: &[ScheduleEvent],
) -> BotResult<()> {
    info!("Announcing {} added courses", events.len());
    let message = format_change_lines(events, "**Courses Added:**\n");
    send_chunked(ctx, channel_id, &message).await
}

/// Announce courses that disappeared from the latest snapshot
pub async fn send_removed_courses(
    ctx: &serenity::Context,
    channel_id: u64,
    events: &[ScheduleEvent],
) -> BotResult<()> {
    info!("Announcing {} removed courses", events.len());
    let message = format_change_lines(events, "**Courses Removed:**\n");
    send_chunked(ctx, channel_id, &message).await
}

/// Post an operational status line to the log channel
pub async fn send_status(ctx: &serenity::Context, channel_id: u64, text: &str) -> BotResult<()> {
    send_chunked(ctx, channel_id, text).await
}
