use availability_libs::{
    validate_members, AvailabilitySubmission, CellIndex, GridConfig, Instant, Member,
    SubmissionMode, TimeRange, ValidationError,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Deserialize)]
struct Range {
    start: Instant,
    end: Instant,
}

/// Either explicit ranges or a grid selection (with its grid) may be sent.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    meeting_id: String,
    member_id: String,
    #[serde(default)]
    intervals: Vec<Range>,
    #[serde(default)]
    selection: Vec<CellIndex>,
    grid: Option<GridConfig>,
    mode: SubmissionMode,
    /// Group roster; membership is only checked when present
    members: Option<Vec<Member>>,
}

#[derive(Serialize)]
struct Response {
    success: bool,
    error: Option<String>,
    submission: Option<AvailabilitySubmission>,
}

fn precheck(request: Request) -> Result<AvailabilitySubmission, ValidationError> {
    let mut ranges = request
        .intervals
        .iter()
        .map(|r| TimeRange::new(r.start, r.end))
        .collect::<Result<Vec<_>, _>>()?;

    if !request.selection.is_empty() {
        let config = request
            .grid
            .ok_or_else(|| ValidationError::InvalidConfiguration {
                reason: "a selection needs the grid it was made on".to_string(),
            })?;
        ranges.extend(availability_libs::cells_to_intervals(
            request.selection.iter().copied(),
            &config,
        )?);
    }

    let submission = AvailabilitySubmission::new(
        &request.meeting_id,
        &request.member_id,
        &ranges,
        request.mode,
    )?;

    if let Some(members) = &request.members {
        validate_members(submission.intervals(), members)?;
        if !members.iter().any(|m| m.id == request.member_id) {
            return Err(ValidationError::UnknownMember {
                member_id: request.member_id,
            });
        }
    }

    Ok(submission)
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, String> {
    Ok(match precheck(event.payload) {
        Ok(submission) => {
            info!(
                meeting_id = submission.meeting_id(),
                member_id = submission.member_id(),
                intervals = submission.intervals().len(),
                "submission accepted"
            );
            Response {
                success: true,
                error: None,
                submission: Some(submission),
            }
        }
        Err(err) => {
            warn!(error = %err, "submission rejected");
            Response {
                success: false,
                error: Some(err.to_string()),
                submission: None,
            }
        }
    })
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
