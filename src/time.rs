use crate::error::ValidationError;
use chrono::{DateTime, Duration, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Absolute instant. Callers are expected to normalize to UTC before
/// handing timestamps to this crate.
pub type Instant = DateTime<Utc>;

/// Half-open [start, end) time range
///
/// Ranges are ordered by start, then end.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTimeRange"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeRange {
    pub(crate) start: Instant,
    pub(crate) end: Instant,
}

impl TimeRange {
    /// Construct a new Time Range
    /// Range is half-open on [start, end)
    ///
    /// # Errors
    /// `ValidationError::InvalidInterval` when `start >= end`.
    ///
    /// # Examples
    /// ```
    /// use availability_libs::time::TimeRange;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let start = Utc.with_ymd_and_hms(2025, 4, 10, 10, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2025, 4, 10, 10, 30, 0).unwrap();
    ///
    /// let range = TimeRange::new(start, end).unwrap();
    /// assert_eq!(range.start(), start);
    /// assert_eq!(range.end(), end);
    ///
    /// assert!(TimeRange::new(end, start).is_err());
    /// assert!(TimeRange::new(start, start).is_err());
    /// ```
    pub fn new(start: Instant, end: Instant) -> Result<TimeRange, ValidationError> {
        if start < end {
            Ok(TimeRange { start, end })
        } else {
            Err(ValidationError::InvalidInterval { start, end })
        }
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when `instant` lies in [start, end)
    pub fn contains(&self, instant: Instant) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Anything that occupies a half-open span of time.
pub trait Span {
    fn span(&self) -> TimeRange;
}

impl Span for TimeRange {
    fn span(&self) -> TimeRange {
        *self
    }
}

/// Half-open overlap test shared by every consumer in this crate.
///
/// Back-to-back ranges do *not* overlap.
///
/// # Examples
/// ```
/// use availability_libs::time::{intersects, TimeRange};
/// use chrono::{TimeZone, Utc};
///
/// let at = |h, m| Utc.with_ymd_and_hms(2025, 4, 10, h, m, 0).unwrap();
///
/// let first = TimeRange::new(at(10, 0), at(10, 30)).unwrap();
/// let second = TimeRange::new(at(10, 30), at(11, 0)).unwrap();
/// let spanning = TimeRange::new(at(10, 15), at(10, 45)).unwrap();
///
/// assert!(!intersects(&first, &second));
/// assert!(intersects(&first, &spanning));
/// assert!(intersects(&spanning, &second));
/// ```
pub fn intersects<A, B>(a: &A, b: &B) -> bool
where
    A: Span + ?Sized,
    B: Span + ?Sized,
{
    let (a, b) = (a.span(), b.span());
    a.start < b.end && b.start < a.end
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawTimeRange {
    start: Instant,
    end: Instant,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTimeRange> for TimeRange {
    type Error = ValidationError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for TimeRange {
    /// Ranges fall on 30-minute boundaries within one week so that fuzzed
    /// inputs regularly collide on exact bounds.
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        use chrono::TimeZone;

        let origin = Utc
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .ok_or(arbitrary::Error::IncorrectFormat)?;
        let first_slot = u.int_in_range(0..=335_i64)?;
        let slots = u.int_in_range(1..=8_i64)?;

        let start = origin + Duration::minutes(first_slot * 30);
        TimeRange::new(start, start + Duration::minutes(slots * 30))
            .map_err(|_| arbitrary::Error::IncorrectFormat)
    }
}
