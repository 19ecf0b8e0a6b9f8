use crate::error::ValidationError;
use crate::grid::{availability_grid, AvailabilityGrid, CellIndex, GridConfig};
use crate::interval::{AvailabilityInterval, Member};
use crate::overlap::{best_meeting_times, peak_overlap_windows, OverlapWindow};
use crate::submission::{apply_submission, AvailabilitySubmission, SubmissionMode};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum DirectoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unknown group {0}")]
    UnknownGroup(String),
    #[error("Unknown meeting {0}")]
    UnknownMeeting(String),
}

/// The group/meeting service this crate reads from and hands submissions to.
pub trait MeetingDirectory {
    fn members(&self, group_id: &str) -> Result<Vec<Member>, DirectoryError>;

    fn availability_intervals(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<AvailabilityInterval>, DirectoryError>;

    fn submit_availability(&self, submission: AvailabilitySubmission)
        -> Result<(), DirectoryError>;
}

/// In-process directory, safe to share between threads.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    groups: RwLock<HashMap<String, Vec<Member>>>,
    meetings: RwLock<HashMap<String, Vec<AvailabilityInterval>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&self, group_id: &str, members: Vec<Member>) {
        self.groups
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(group_id.to_string(), members);
    }

    /// Registers a meeting with no submissions yet. Existing submissions are kept.
    pub fn add_meeting(&self, meeting_id: &str) {
        self.meetings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(meeting_id.to_string())
            .or_default();
    }
}

impl MeetingDirectory for MemoryDirectory {
    fn members(&self, group_id: &str) -> Result<Vec<Member>, DirectoryError> {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(group_id)
            .cloned()
            .ok_or_else(|| DirectoryError::UnknownGroup(group_id.to_string()))
    }

    fn availability_intervals(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<AvailabilityInterval>, DirectoryError> {
        self.meetings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(meeting_id)
            .cloned()
            .ok_or_else(|| DirectoryError::UnknownMeeting(meeting_id.to_string()))
    }

    fn submit_availability(
        &self,
        submission: AvailabilitySubmission,
    ) -> Result<(), DirectoryError> {
        let mut meetings = self
            .meetings
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let stored = meetings
            .get_mut(submission.meeting_id())
            .ok_or_else(|| DirectoryError::UnknownMeeting(submission.meeting_id().to_string()))?;

        *stored = apply_submission(stored, &submission)?;

        Ok(())
    }
}

/// Runs the availability computations against a [`MeetingDirectory`].
pub struct Planner<D>
where
    D: MeetingDirectory,
{
    directory: D,
}

impl<D> Planner<D>
where
    D: MeetingDirectory,
{
    pub fn new(directory: D) -> Planner<D> {
        Planner { directory }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn best_meeting_times(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<OverlapWindow>, DirectoryError> {
        let intervals = self.directory.availability_intervals(meeting_id)?;

        Ok(best_meeting_times(meeting_id, &intervals)?)
    }

    pub fn peak_overlap_windows(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<OverlapWindow>, DirectoryError> {
        let intervals = self.directory.availability_intervals(meeting_id)?;

        Ok(peak_overlap_windows(meeting_id, &intervals)?)
    }

    /// Renders the meeting's grid, normalized against the group's size.
    pub fn availability_grid(
        &self,
        meeting_id: &str,
        group_id: &str,
        config: &GridConfig,
    ) -> Result<AvailabilityGrid, DirectoryError> {
        let members = self.directory.members(group_id)?;
        let intervals = self.directory.availability_intervals(meeting_id)?;

        debug!(
            "Rendering grid for meeting {} against {} members of group {}",
            meeting_id,
            members.len(),
            group_id
        );

        Ok(availability_grid(
            meeting_id,
            &intervals,
            config,
            members.len(),
        )?)
    }

    /// Converts a member's drag selection into a submission and hands it to
    /// the directory. The member must belong to the group.
    pub fn submit_selection<I>(
        &self,
        group_id: &str,
        meeting_id: &str,
        member_id: &str,
        selected: I,
        config: &GridConfig,
        mode: SubmissionMode,
    ) -> Result<AvailabilitySubmission, DirectoryError>
    where
        I: IntoIterator<Item = CellIndex>,
    {
        let members = self.directory.members(group_id)?;
        if !members.iter().any(|m| m.id == member_id) {
            return Err(ValidationError::UnknownMember {
                member_id: member_id.to_string(),
            }
            .into());
        }

        let submission =
            AvailabilitySubmission::from_selection(meeting_id, member_id, selected, config, mode)?;

        self.directory.submit_availability(submission.clone())?;

        info!(
            "Stored {} intervals from {} for meeting {}",
            submission.intervals().len(),
            member_id,
            meeting_id
        );

        Ok(submission)
    }
}
