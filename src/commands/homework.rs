use crate::commands::{say_chunked, CommandResult, Context};
use crate::components::planning::format::format_homework;
use crate::components::planning::models::HomeworkItem;
use crate::components::planning::time::parse_date;

/// Adds a new homework assignment
#[poise::command(slash_command, prefix_command)]
pub async fn add_homework(
    ctx: Context<'_>,
    #[description = "Course name"] course_name: String,
    #[description = "Due date in DD/MM/YYYY format"] due_date: String,
    #[description = "Assignment description"] description: String,
    #[description = "Professor name"] professor_name: String,
) -> CommandResult {
    // Validate the date format before anything is stored
    if let Err(e) = parse_date(&due_date) {
        ctx.send(
            poise::CreateReply::default()
                .content(e.to_string())
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let item = HomeworkItem {
        course_name: course_name.clone(),
        due_date: due_date.clone(),
        description,
        professor_name: professor_name.clone(),
    };

    ctx.data().store.add_homework(item).await?;

    ctx.say(format!(
        "Homework for **{}** (Professor: {}) due on **{}** added successfully!",
        course_name, professor_name, due_date
    ))
    .await?;

    Ok(())
}

/// Displays all homework assignments
#[poise::command(slash_command, prefix_command)]
pub async fn view_homework(ctx: Context<'_>) -> CommandResult {
    let items = ctx.data().store.get_homework().await?;

    let message = if items.is_empty() {
        "No homework assignments found.".to_string()
    } else {
        format_homework(&items, "**All Homework Assignments:**\n")
    };

    say_chunked(ctx, &message).await
}
