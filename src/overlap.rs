use crate::error::ValidationError;
use crate::interval::{check_meeting, AvailabilityInterval};
use crate::time::{Instant, Span, TimeRange};
use core::cmp::Ordering;
use itertools::Itertools;
use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A time window claimed by two or more members.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapWindow {
    start: Instant,
    end: Instant,
    member_ids: Vec<String>,
    count: usize,
}

impl OverlapWindow {
    fn new(range: TimeRange, members: BTreeSet<&str>) -> OverlapWindow {
        let member_ids: Vec<String> = members.into_iter().map(str::to_string).collect();

        OverlapWindow {
            start: range.start(),
            end: range.end(),
            count: member_ids.len(),
            member_ids,
        }
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    /// Sorted, without duplicates
    pub fn member_ids(&self) -> &[String] {
        &self.member_ids
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn tier(&self) -> OverlapTier {
        OverlapTier::from_count(self.count)
    }

    /// Most members first, then earliest start, then smallest member list.
    fn ranking(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then(self.start.cmp(&other.start))
            .then_with(|| self.member_ids.cmp(&other.member_ids))
            .then(self.end.cmp(&other.end))
    }
}

impl Span for OverlapWindow {
    fn span(&self) -> TimeRange {
        TimeRange {
            start: self.start,
            end: self.end,
        }
    }
}

/// Coarse bucket used by the calendar view to colour a window.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverlapTier {
    Low,
    Medium,
    High,
}

impl OverlapTier {
    /// # Examples
    /// ```
    /// use availability_libs::overlap::OverlapTier;
    ///
    /// assert_eq!(OverlapTier::from_count(1), OverlapTier::Low);
    /// assert_eq!(OverlapTier::from_count(2), OverlapTier::Medium);
    /// assert_eq!(OverlapTier::from_count(7), OverlapTier::High);
    /// ```
    pub fn from_count(count: usize) -> OverlapTier {
        match count {
            0 | 1 => OverlapTier::Low,
            2 => OverlapTier::Medium,
            _ => OverlapTier::High,
        }
    }
}

/// Ranks the exact `(start, end)` windows picked by more than one member.
///
/// Submissions are grouped by identical bounds only; two members picking
/// 14:00-15:00 and 14:00-15:30 do not share a window here. See
/// [`peak_overlap_windows`] for the sweep-line alternative. Windows picked
/// by a single member are left out, and a member submitting the same window
/// twice is counted once.
///
/// # Errors
/// `ValidationError::MeetingMismatch` if any interval belongs to another meeting.
///
/// # Examples
/// ```
/// use availability_libs::interval::AvailabilityInterval;
/// use availability_libs::overlap::best_meeting_times;
/// use chrono::{TimeZone, Utc};
///
/// let at = |h| Utc.with_ymd_and_hms(2025, 4, 10, h, 0, 0).unwrap();
/// let intervals = vec![
///     AvailabilityInterval::new("ada", at(14), at(15), "review").unwrap(),
///     AvailabilityInterval::new("bob", at(14), at(15), "review").unwrap(),
///     AvailabilityInterval::new("cy", at(14), at(15), "review").unwrap(),
///     AvailabilityInterval::new("dee", at(9), at(10), "review").unwrap(),
/// ];
///
/// let windows = best_meeting_times("review", &intervals).unwrap();
/// assert_eq!(windows.len(), 1);
/// assert_eq!(windows[0].count(), 3);
/// assert_eq!(windows[0].start(), at(14));
///
/// assert!(best_meeting_times("review", &[]).unwrap().is_empty());
/// ```
pub fn best_meeting_times(
    meeting_id: &str,
    intervals: &[AvailabilityInterval],
) -> Result<Vec<OverlapWindow>, ValidationError> {
    check_meeting(meeting_id, intervals)?;

    let mut buckets: BTreeMap<TimeRange, BTreeSet<&str>> = BTreeMap::new();
    for interval in intervals {
        buckets
            .entry(interval.range())
            .or_default()
            .insert(interval.member_id());
    }

    trace!(
        "{} distinct windows from {} submissions for meeting {}",
        buckets.len(),
        intervals.len(),
        meeting_id
    );

    let windows = buckets
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(range, members)| OverlapWindow::new(range, members))
        .sorted_by(OverlapWindow::ranking)
        .collect_vec();

    debug!(
        "Found {} shared windows for meeting {}",
        windows.len(),
        meeting_id
    );

    Ok(windows)
}

/// Sweep-line overlap: splits the timeline wherever any submission starts or
/// ends and reports every maximal segment on which at least two distinct
/// members are available, ranked like [`best_meeting_times`].
///
/// Neighbouring segments with the same members are joined, and a member's
/// own overlapping submissions count once.
///
/// # Examples
/// ```
/// use availability_libs::interval::AvailabilityInterval;
/// use availability_libs::overlap::peak_overlap_windows;
/// use chrono::{TimeZone, Utc};
///
/// let at = |h, m| Utc.with_ymd_and_hms(2025, 4, 10, h, m, 0).unwrap();
/// let intervals = vec![
///     AvailabilityInterval::new("ada", at(14, 0), at(15, 30), "review").unwrap(),
///     AvailabilityInterval::new("bob", at(14, 30), at(16, 0), "review").unwrap(),
/// ];
///
/// let windows = peak_overlap_windows("review", &intervals).unwrap();
/// assert_eq!(windows.len(), 1);
/// assert_eq!(windows[0].start(), at(14, 30));
/// assert_eq!(windows[0].end(), at(15, 30));
/// assert_eq!(windows[0].member_ids(), ["ada", "bob"]);
/// ```
pub fn peak_overlap_windows(
    meeting_id: &str,
    intervals: &[AvailabilityInterval],
) -> Result<Vec<OverlapWindow>, ValidationError> {
    check_meeting(meeting_id, intervals)?;

    let edges = intervals
        .iter()
        .flat_map(|i| {
            vec![
                Edge::Start(i.start(), i.member_id()),
                Edge::End(i.end(), i.member_id()),
            ]
        })
        .sorted_unstable_by_key(|edge| edge.at());

    // Open submissions per member; a member stays available while any of
    // their submissions is open.
    let mut open: BTreeMap<&str, usize> = BTreeMap::new();
    let mut cursor: Option<Instant> = None;
    let mut segments: Vec<(TimeRange, BTreeSet<&str>)> = Vec::new();

    for edge in edges {
        let at = edge.at();

        if let Some(from) = cursor {
            if from < at && open.len() > 1 {
                segments.push((
                    TimeRange {
                        start: from,
                        end: at,
                    },
                    open.keys().copied().collect(),
                ));
            }
        }

        match edge {
            Edge::Start(_, member) => *open.entry(member).or_default() += 1,
            Edge::End(_, member) => {
                if let Some(depth) = open.get_mut(member) {
                    *depth -= 1;
                    if *depth == 0 {
                        open.remove(member);
                    }
                }
            }
        }

        cursor = Some(at);
    }

    let windows = segments
        .into_iter()
        .coalesce(|(prev, prev_members), (next, next_members)| {
            if prev.end == next.start && prev_members == next_members {
                Ok((
                    TimeRange {
                        start: prev.start,
                        end: next.end,
                    },
                    prev_members,
                ))
            } else {
                Err(((prev, prev_members), (next, next_members)))
            }
        })
        .map(|(range, members)| OverlapWindow::new(range, members))
        .sorted_by(OverlapWindow::ranking)
        .collect_vec();

    debug!(
        "Swept {} overlap segments for meeting {}",
        windows.len(),
        meeting_id
    );

    Ok(windows)
}

enum Edge<'a> {
    Start(Instant, &'a str),
    End(Instant, &'a str),
}

impl Edge<'_> {
    fn at(&self) -> Instant {
        match self {
            Edge::Start(at, _) | Edge::End(at, _) => *at,
        }
    }
}
