use availability_libs::{
    best_meeting_times, peak_overlap_windows, AvailabilityInterval, OverlapWindow,
    ValidationError,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Submissions arrive already fetched from the meeting service; this
/// function only ranks them.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    meeting_id: String,
    intervals: Vec<AvailabilityInterval>,
    /// Rank partially overlapping submissions too
    #[serde(default)]
    sweep: bool,
}

#[derive(Serialize)]
struct Response {
    windows: Vec<OverlapWindow>,
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, ValidationError> {
    let Request {
        meeting_id,
        intervals,
        sweep,
    } = event.payload;

    let windows = if sweep {
        peak_overlap_windows(&meeting_id, &intervals)?
    } else {
        best_meeting_times(&meeting_id, &intervals)?
    };

    info!(
        meeting_id = meeting_id.as_str(),
        submissions = intervals.len(),
        windows = windows.len(),
        "ranked meeting times"
    );

    Ok(Response { windows })
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
