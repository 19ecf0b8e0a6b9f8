use crate::error::ValidationError;
use crate::grid::{selection_to_intervals, CellIndex, GridConfig};
use crate::interval::{check_identifier, check_meeting, AvailabilityInterval, Member};
use crate::time::TimeRange;
use itertools::Itertools;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a submission combines with what a member already submitted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SubmissionMode {
    /// Keep earlier submissions and add these
    Append,
    /// Drop every earlier submission of this member for this meeting first
    Replace,
}

/// A validated batch of one member's intervals for one meeting, ready to hand
/// to the store.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySubmission {
    meeting_id: String,
    member_id: String,
    intervals: Vec<AvailabilityInterval>,
    mode: SubmissionMode,
}

impl AvailabilitySubmission {
    pub fn new(
        meeting_id: &str,
        member_id: &str,
        ranges: &[TimeRange],
        mode: SubmissionMode,
    ) -> Result<AvailabilitySubmission, ValidationError> {
        check_identifier("meeting id", meeting_id)?;
        check_identifier("member id", member_id)?;

        let intervals = ranges
            .iter()
            .map(|range| AvailabilityInterval::with_range(member_id, *range, meeting_id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AvailabilitySubmission {
            meeting_id: meeting_id.to_string(),
            member_id: member_id.to_string(),
            intervals,
            mode,
        })
    }

    /// Builds a submission from grid cells, merging contiguous runs first.
    pub fn from_selection<I>(
        meeting_id: &str,
        member_id: &str,
        selected: I,
        config: &GridConfig,
        mode: SubmissionMode,
    ) -> Result<AvailabilitySubmission, ValidationError>
    where
        I: IntoIterator<Item = CellIndex>,
    {
        check_identifier("meeting id", meeting_id)?;
        check_identifier("member id", member_id)?;

        Ok(AvailabilitySubmission {
            meeting_id: meeting_id.to_string(),
            member_id: member_id.to_string(),
            intervals: selection_to_intervals(member_id, meeting_id, selected, config)?,
            mode,
        })
    }

    pub fn meeting_id(&self) -> &str {
        &self.meeting_id
    }

    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    pub fn intervals(&self) -> &[AvailabilityInterval] {
        &self.intervals
    }

    pub fn mode(&self) -> SubmissionMode {
        self.mode
    }
}

/// Adds `ranges` for `member_id` after the existing intervals.
pub fn append_availability(
    existing: &[AvailabilityInterval],
    meeting_id: &str,
    member_id: &str,
    ranges: &[TimeRange],
) -> Result<Vec<AvailabilityInterval>, ValidationError> {
    let submission =
        AvailabilitySubmission::new(meeting_id, member_id, ranges, SubmissionMode::Append)?;

    apply_submission(existing, &submission)
}

/// Swaps every existing interval of `member_id` for `ranges`. Other members'
/// intervals keep their order.
pub fn replace_member_availability(
    existing: &[AvailabilityInterval],
    meeting_id: &str,
    member_id: &str,
    ranges: &[TimeRange],
) -> Result<Vec<AvailabilityInterval>, ValidationError> {
    let submission =
        AvailabilitySubmission::new(meeting_id, member_id, ranges, SubmissionMode::Replace)?;

    apply_submission(existing, &submission)
}

/// Returns the meeting's intervals as they stand after `submission`.
/// `existing` is left untouched.
///
/// # Errors
/// `ValidationError::MeetingMismatch` if `existing` holds another meeting's
/// intervals.
///
/// # Examples
/// ```
/// use availability_libs::submission::{
///     apply_submission, AvailabilitySubmission, SubmissionMode,
/// };
/// use availability_libs::time::TimeRange;
/// use chrono::{TimeZone, Utc};
///
/// let at = |h| Utc.with_ymd_and_hms(2025, 4, 10, h, 0, 0).unwrap();
/// let morning = [TimeRange::new(at(9), at(10)).unwrap()];
/// let afternoon = [TimeRange::new(at(14), at(15)).unwrap()];
///
/// let submit = |ranges: &[TimeRange], mode| {
///     AvailabilitySubmission::new("review", "ada", ranges, mode).unwrap()
/// };
///
/// let stored = apply_submission(&[], &submit(&morning[..], SubmissionMode::Append)).unwrap();
///
/// let append = submit(&afternoon[..], SubmissionMode::Append);
/// assert_eq!(apply_submission(&stored, &append).unwrap().len(), 2);
///
/// let replace = submit(&afternoon[..], SubmissionMode::Replace);
/// let replaced = apply_submission(&stored, &replace).unwrap();
/// assert_eq!(replaced.len(), 1);
/// assert_eq!(replaced[0].start(), at(14));
/// ```
pub fn apply_submission(
    existing: &[AvailabilityInterval],
    submission: &AvailabilitySubmission,
) -> Result<Vec<AvailabilityInterval>, ValidationError> {
    check_meeting(&submission.meeting_id, existing)?;

    let kept = existing.iter().filter(|interval| match submission.mode {
        SubmissionMode::Append => true,
        SubmissionMode::Replace => interval.member_id() != submission.member_id,
    });

    let updated = kept
        .chain(submission.intervals.iter())
        .cloned()
        .collect_vec();

    debug!(
        "{:?} of {} intervals by {} for meeting {}: {} -> {}",
        submission.mode,
        submission.intervals.len(),
        submission.member_id,
        submission.meeting_id,
        existing.len(),
        updated.len()
    );

    Ok(updated)
}

/// Checks that every submission comes from a member of the group.
///
/// # Errors
/// `ValidationError::UnknownMember` for the first submission by an outsider.
pub fn validate_members(
    intervals: &[AvailabilityInterval],
    members: &[Member],
) -> Result<(), ValidationError> {
    let known: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();

    match intervals.iter().find(|i| !known.contains(i.member_id())) {
        Some(outsider) => Err(ValidationError::UnknownMember {
            member_id: outsider.member_id().to_string(),
        }),
        None => Ok(()),
    }
}
