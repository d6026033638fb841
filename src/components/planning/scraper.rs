use super::models::RawCourseRow;
use crate::error::{BotResult, Error};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::info;

/// Run the external timetable scraper and decode its output.
///
/// The command line is split on whitespace; stdout on success must be a
/// JSON array of raw course rows. The three failure modes stay distinct:
/// `ScrapeUnavailable` when the process cannot be spawned, `ScrapeFailed`
/// for a non-zero exit or a timeout (the child is killed), and
/// `MalformedOutput` when stdout does not decode.
pub async fn run_scrape(command_line: &str, timeout_secs: u64) -> BotResult<Vec<RawCourseRow>> {
    let mut parts = command_line.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::Config("Scrape command is empty".to_string()))?;

    let mut cmd = Command::new(program);
    cmd.args(parts).kill_on_drop(true);

    info!("Running scraper: {}", command_line);

    let output = match timeout(Duration::from_secs(timeout_secs), cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(Error::ScrapeUnavailable(format!(
                "Could not run {}: {}",
                program, e
            )))
        }
        Err(_) => {
            return Err(Error::ScrapeFailed(format!(
                "Scraper timed out after {}s",
                timeout_secs
            )))
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::ScrapeFailed(format!(
            "Scraper exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let rows: Vec<RawCourseRow> = serde_json::from_slice(&output.stdout)
        .map_err(|e| Error::MalformedOutput(format!("Could not decode scraper output: {}", e)))?;

    info!("Scraper returned {} rows", rows.len());
    Ok(rows)
}
