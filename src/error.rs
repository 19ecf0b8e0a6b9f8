use crate::time::Instant;
#[cfg(feature = "serde")]
use serde::Serialize;
use thiserror::Error;

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ValidationError {
    #[error("Invalid interval: start ({start}) must be strictly before end ({end})")]
    InvalidInterval { start: Instant, end: Instant },
    #[error("Invalid identifier: {field} must not be empty")]
    InvalidIdentifier { field: &'static str },
    #[error("Invalid grid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[error("Interval belongs to meeting {found}, expected {expected}")]
    MeetingMismatch { expected: String, found: String },
    #[error("Member {member_id} is not part of this group")]
    UnknownMember { member_id: String },
}
