use availability_libs::{
    availability_grid, AvailabilityGrid, AvailabilityInterval, GridConfig, ValidationError,
};
use chrono::NaiveDate;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use std::env;
use tracing::info;

/// Grid shape fields are optional; missing ones fall back to the
/// `GRID_*` environment variables, then to a 09:00-21:00 week of
/// 30-minute slots.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    meeting_id: String,
    intervals: Vec<AvailabilityInterval>,
    anchor: NaiveDate,
    num_days: Option<u32>,
    day_start_hour: Option<u32>,
    day_end_hour: Option<u32>,
    slot_duration_minutes: Option<u32>,
    /// Size of the group, for colour scaling
    max_possible: usize,
}

fn env_or(key: &str, default: u32) -> u32 {
    env::var(key)
        .map(|e| e.parse::<u32>().ok())
        .ok()
        .flatten()
        .unwrap_or(default)
}

fn grid_config(request: &Request) -> Result<GridConfig, ValidationError> {
    let defaults = GridConfig::week_from(request.anchor);

    GridConfig::new(
        request.anchor,
        request
            .num_days
            .unwrap_or_else(|| env_or("GRID_NUM_DAYS", defaults.num_days)),
        request
            .day_start_hour
            .unwrap_or_else(|| env_or("GRID_DAY_START_HOUR", defaults.day_start_hour)),
        request
            .day_end_hour
            .unwrap_or_else(|| env_or("GRID_DAY_END_HOUR", defaults.day_end_hour)),
        request
            .slot_duration_minutes
            .unwrap_or_else(|| env_or("GRID_SLOT_MINUTES", defaults.slot_duration_minutes)),
    )
}

async fn function_handler(
    event: LambdaEvent<Request>,
) -> Result<AvailabilityGrid, ValidationError> {
    let request = event.payload;
    let config = grid_config(&request)?;

    let grid = availability_grid(
        &request.meeting_id,
        &request.intervals,
        &config,
        request.max_possible,
    )?;

    info!(
        meeting_id = request.meeting_id.as_str(),
        days = config.num_days,
        slots = config.slots_per_day(),
        peak = grid.peak(),
        "rendered availability grid"
    );

    Ok(grid)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .init();

    run(service_fn(function_handler)).await
}
