use crate::error::ValidationError;
use crate::time::{Instant, Span, TimeRange};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A group member as supplied by the group-membership service.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMember"))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "displayName"))]
    pub display_name: String,
}

impl Member {
    pub fn new(id: &str, display_name: &str) -> Result<Member, ValidationError> {
        check_identifier("member id", id)?;

        Ok(Member {
            id: id.to_string(),
            display_name: display_name.to_string(),
        })
    }
}

/// One member's availability submission for one meeting.
///
/// Only constructed through [`AvailabilityInterval::new`] (or deserialization,
/// which runs the same checks), so every value seen by the aggregator and the
/// grid has non-empty ids and `start < end`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RawInterval", into = "RawInterval")
)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvailabilityInterval {
    member_id: String,
    meeting_id: String,
    range: TimeRange,
}

impl AvailabilityInterval {
    /// Validates and builds a submission.
    ///
    /// # Errors
    /// * `ValidationError::InvalidIdentifier` for an empty `member_id` or `meeting_id`
    /// * `ValidationError::InvalidInterval` when `start >= end`
    ///
    /// # Examples
    /// ```
    /// use availability_libs::error::ValidationError;
    /// use availability_libs::interval::AvailabilityInterval;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let start = Utc.with_ymd_and_hms(2025, 4, 10, 14, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2025, 4, 10, 15, 0, 0).unwrap();
    ///
    /// let interval = AvailabilityInterval::new("ada", start, end, "review").unwrap();
    /// assert_eq!(interval.member_id(), "ada");
    ///
    /// assert_eq!(
    ///     AvailabilityInterval::new("", start, end, "review"),
    ///     Err(ValidationError::InvalidIdentifier { field: "member id" })
    /// );
    /// assert!(matches!(
    ///     AvailabilityInterval::new("ada", end, start, "review"),
    ///     Err(ValidationError::InvalidInterval { .. })
    /// ));
    /// ```
    pub fn new(
        member_id: &str,
        start: Instant,
        end: Instant,
        meeting_id: &str,
    ) -> Result<AvailabilityInterval, ValidationError> {
        check_identifier("member id", member_id)?;
        check_identifier("meeting id", meeting_id)?;

        Ok(AvailabilityInterval {
            member_id: member_id.to_string(),
            meeting_id: meeting_id.to_string(),
            range: TimeRange::new(start, end)?,
        })
    }

    /// Same as [`AvailabilityInterval::new`] for an already validated range.
    pub fn with_range(
        member_id: &str,
        range: TimeRange,
        meeting_id: &str,
    ) -> Result<AvailabilityInterval, ValidationError> {
        Self::new(member_id, range.start(), range.end(), meeting_id)
    }

    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    pub fn meeting_id(&self) -> &str {
        &self.meeting_id
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn start(&self) -> Instant {
        self.range.start()
    }

    pub fn end(&self) -> Instant {
        self.range.end()
    }
}

impl Span for AvailabilityInterval {
    fn span(&self) -> TimeRange {
        self.range
    }
}

pub(crate) fn check_identifier(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::InvalidIdentifier { field })
    } else {
        Ok(())
    }
}

/// Fails on the first interval that does not belong to `meeting_id`.
pub(crate) fn check_meeting(
    meeting_id: &str,
    intervals: &[AvailabilityInterval],
) -> Result<(), ValidationError> {
    check_identifier("meeting id", meeting_id)?;

    match intervals.iter().find(|i| i.meeting_id != meeting_id) {
        Some(foreign) => Err(ValidationError::MeetingMismatch {
            expected: meeting_id.to_string(),
            found: foreign.meeting_id.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMember {
    id: String,
    display_name: String,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMember> for Member {
    type Error = ValidationError;

    fn try_from(raw: RawMember) -> Result<Self, Self::Error> {
        Member::new(&raw.id, &raw.display_name)
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInterval {
    member_id: String,
    meeting_id: String,
    start: Instant,
    end: Instant,
}

#[cfg(feature = "serde")]
impl TryFrom<RawInterval> for AvailabilityInterval {
    type Error = ValidationError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        AvailabilityInterval::new(&raw.member_id, raw.start, raw.end, &raw.meeting_id)
    }
}

#[cfg(feature = "serde")]
impl From<AvailabilityInterval> for RawInterval {
    fn from(interval: AvailabilityInterval) -> Self {
        RawInterval {
            start: interval.start(),
            end: interval.end(),
            member_id: interval.member_id,
            meeting_id: interval.meeting_id,
        }
    }
}

/// A whole meeting's worth of submissions, used to drive the fuzzers and
/// benchmarks.
#[cfg(feature = "arbitrary")]
#[derive(Debug, Clone)]
pub struct MeetingSample {
    pub meeting_id: String,
    pub members: Vec<String>,
    pub intervals: Vec<AvailabilityInterval>,
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for MeetingSample {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let meeting_id = u.arbitrary::<uuid::Uuid>()?.to_string();

        let member_count = u.int_in_range(1..=8_usize)?;
        let mut members = Vec::with_capacity(member_count);
        for _ in 0..member_count {
            members.push(u.arbitrary::<uuid::Uuid>()?.to_string());
        }

        let len = u.arbitrary_len::<TimeRange>()?.min(64);
        let mut intervals = Vec::with_capacity(len);
        for _ in 0..len {
            let member = &members[u.int_in_range(0..=member_count - 1)?];
            let range = u.arbitrary::<TimeRange>()?;
            intervals.push(
                AvailabilityInterval::with_range(member, range, &meeting_id)
                    .map_err(|_| arbitrary::Error::IncorrectFormat)?,
            );
        }

        Ok(MeetingSample {
            meeting_id,
            members,
            intervals,
        })
    }
}
