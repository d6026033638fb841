use crate::commands::{say_chunked, CommandResult, Context};
use crate::components::planning::format::format_events;
use crate::components::planning::time::{format_date, parse_date, week_monday};
use chrono::{Duration, Utc};
use chrono_tz::Tz;

/// Granularity of a schedule lookup
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum ScheduleWindow {
    #[name = "week"]
    Week,
    #[name = "day"]
    Day,
}

impl ScheduleWindow {
    fn label(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Day => "day",
        }
    }
}

/// Displays the schedule for a specific week or day
#[poise::command(slash_command, prefix_command)]
pub async fn schedule(
    ctx: Context<'_>,
    #[description = "Choose to view by week or day"] window: ScheduleWindow,
    #[description = "Enter the date in DD/MM/YYYY format"] date: String,
) -> CommandResult {
    let parsed_date = match parse_date(&date) {
        Ok(d) => d,
        Err(e) => {
            // Validation errors go back to the requester only
            ctx.send(
                poise::CreateReply::default()
                    .content(e.to_string())
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    };

    let (events, title) = match window {
        ScheduleWindow::Week => {
            let monday = week_monday(parsed_date);
            let events = ctx.data().store.get_week_schedule(monday).await?;
            let title = format!("**Planning for the week of {}:**\n", format_date(monday));
            (events, title)
        }
        ScheduleWindow::Day => {
            let events = ctx.data().store.get_day_schedule(parsed_date).await?;
            let title = format!("**Planning for {}:**\n", format_date(parsed_date));
            (events, title)
        }
    };

    let message = if events.is_empty() {
        format!("No events found for {} {}.", window.label(), date)
    } else {
        format_events(&events, &title)
    };

    say_chunked(ctx, &message).await
}

/// Displays the schedule for the current week
#[poise::command(slash_command, prefix_command)]
pub async fn current_week(ctx: Context<'_>) -> CommandResult {
    let today = today_in_configured_tz(&ctx).await;
    let monday = week_monday(today);
    let events = ctx.data().store.get_week_schedule(monday).await?;

    let message = if events.is_empty() {
        "No events found for the current week.".to_string()
    } else {
        format_events(&events, "**Planning for the Current Week:**\n")
    };

    say_chunked(ctx, &message).await
}

/// Displays the schedule for the next week
#[poise::command(slash_command, prefix_command)]
pub async fn next_week(ctx: Context<'_>) -> CommandResult {
    let today = today_in_configured_tz(&ctx).await;
    let monday = week_monday(today + Duration::days(7));
    let events = ctx.data().store.get_week_schedule(monday).await?;

    let message = if events.is_empty() {
        "No events found for the next week.".to_string()
    } else {
        format_events(&events, "**Planning for the Next Week:**\n")
    };

    say_chunked(ctx, &message).await
}

/// Today's date in the configured timetable timezone
async fn today_in_configured_tz(ctx: &Context<'_>) -> chrono::NaiveDate {
    let timezone = {
        let config = ctx.data().config.read().await;
        config.timezone.clone()
    };
    let tz: Tz = timezone.parse().unwrap_or(chrono_tz::UTC);
    Utc::now().with_timezone(&tz).date_naive()
}
