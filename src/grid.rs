use crate::error::ValidationError;
use crate::interval::{check_meeting, AvailabilityInterval};
use crate::time::{intersects, Instant, Span, TimeRange};
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use itertools::Itertools;
use log::{debug, trace};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `(day_index, slot_index)` of one grid cell
pub type CellIndex = (u32, u32);

/// Longest grid a single render may cover, one year of days.
pub const MAX_GRID_DAYS: u32 = 366;

/// Shape of a rendered availability grid.
///
/// Fixed per render call; nothing here is global.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GridConfig {
    /// First rendered day; day 0 starts at `day_start_hour` UTC on this date
    pub anchor: NaiveDate,
    pub num_days: u32,
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub slot_duration_minutes: u32,
}

impl GridConfig {
    pub fn new(
        anchor: NaiveDate,
        num_days: u32,
        day_start_hour: u32,
        day_end_hour: u32,
        slot_duration_minutes: u32,
    ) -> Result<GridConfig, ValidationError> {
        let config = GridConfig {
            anchor,
            num_days,
            day_start_hour,
            day_end_hour,
            slot_duration_minutes,
        };
        config.validate()?;

        Ok(config)
    }

    /// Seven days of 30-minute slots between 09:00 and 21:00.
    pub fn week_from(anchor: NaiveDate) -> GridConfig {
        GridConfig {
            anchor,
            num_days: 7,
            day_start_hour: 9,
            day_end_hour: 21,
            slot_duration_minutes: 30,
        }
    }

    /// # Errors
    /// `ValidationError::InvalidConfiguration` when there are no days or more
    /// than [`MAX_GRID_DAYS`], the hour range is empty or runs past midnight,
    /// the slot duration does not evenly divide an hour, or the last day
    /// ends beyond the latest representable instant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let reason = if self.num_days == 0 {
            "the grid must cover at least one day".to_string()
        } else if self.num_days > MAX_GRID_DAYS {
            format!(
                "{} days exceeds the limit of {} days",
                self.num_days, MAX_GRID_DAYS
            )
        } else if self.day_end_hour > 24 {
            format!("day end hour {} is past midnight", self.day_end_hour)
        } else if self.day_start_hour >= self.day_end_hour {
            format!(
                "day start hour {} must be before day end hour {}",
                self.day_start_hour, self.day_end_hour
            )
        } else if self.slot_duration_minutes == 0 || 60 % self.slot_duration_minutes != 0 {
            format!(
                "slot duration of {} minutes does not evenly divide an hour",
                self.slot_duration_minutes
            )
        } else if self.day_end(self.num_days - 1).is_none() {
            format!(
                "{} days from {} run past the last representable date",
                self.num_days, self.anchor
            )
        } else {
            return Ok(());
        };

        Err(ValidationError::InvalidConfiguration { reason })
    }

    /// Zero for a shape `validate` would reject.
    pub fn slots_per_day(&self) -> u32 {
        self.day_end_hour
            .saturating_sub(self.day_start_hour)
            .saturating_mul(60)
            / self.slot_duration_minutes.max(1)
    }

    /// Absolute `[start, end)` of a cell, `None` for a cell outside the grid.
    ///
    /// # Examples
    /// ```
    /// use availability_libs::grid::GridConfig;
    /// use chrono::{NaiveDate, TimeZone, Utc};
    ///
    /// let anchor = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
    /// let config = GridConfig::week_from(anchor);
    ///
    /// let span = config.cell_span(1, 3).unwrap();
    /// assert_eq!(span.start(), Utc.with_ymd_and_hms(2025, 4, 11, 10, 30, 0).unwrap());
    /// assert_eq!(span.end(), Utc.with_ymd_and_hms(2025, 4, 11, 11, 0, 0).unwrap());
    ///
    /// assert_eq!(config.cell_span(7, 0), None);
    /// ```
    pub fn cell_span(&self, day: u32, slot: u32) -> Option<TimeRange> {
        if !self.contains_cell((day, slot)) {
            return None;
        }

        let minutes = i64::from(self.slot_duration_minutes);
        let start = self
            .day_origin(day)?
            .checked_add_signed(Duration::minutes(i64::from(slot) * minutes))?;

        Some(TimeRange {
            start,
            end: start.checked_add_signed(Duration::minutes(minutes))?,
        })
    }

    /// The rendered hours of one day, `None` past the last day.
    pub fn day_span(&self, day: u32) -> Option<TimeRange> {
        if day >= self.num_days {
            return None;
        }

        Some(TimeRange {
            start: self.day_origin(day)?,
            end: self.day_end(day)?,
        })
    }

    pub fn contains_cell(&self, (day, slot): CellIndex) -> bool {
        day < self.num_days && slot < self.slots_per_day()
    }

    fn day_origin(&self, day: u32) -> Option<Instant> {
        let midnight = Utc.from_utc_datetime(&self.anchor.and_time(NaiveTime::default()));

        midnight
            .checked_add_signed(Duration::days(i64::from(day)))?
            .checked_add_signed(Duration::hours(i64::from(self.day_start_hour)))
    }

    fn day_end(&self, day: u32) -> Option<Instant> {
        let hours = self.day_end_hour.checked_sub(self.day_start_hour)?;

        self.day_origin(day)?
            .checked_add_signed(Duration::hours(i64::from(hours)))
    }

    fn outside(&self, (day, slot): CellIndex) -> ValidationError {
        ValidationError::InvalidConfiguration {
            reason: format!(
                "cell ({}, {}) lies outside the {}x{} grid",
                day,
                slot,
                self.num_days,
                self.slots_per_day()
            ),
        }
    }
}

/// One cell of the heat-map.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SlotCell {
    pub day_index: u32,
    pub slot_index: u32,
    pub overlap_count: usize,
    pub span: TimeRange,
}

impl SlotCell {
    /// `overlap_count / max_possible` clamped to `[0, 1]`; a `max_possible`
    /// of zero is treated as one.
    pub fn intensity(&self, max_possible: usize) -> f64 {
        let max = max_possible.max(1) as f64;

        (self.overlap_count as f64 / max).min(1.0)
    }
}

impl Span for SlotCell {
    fn span(&self) -> TimeRange {
        self.span
    }
}

/// Dense `num_days x slots_per_day` matrix of overlap counts.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityGrid {
    config: GridConfig,
    max_possible: usize,
    rows: Vec<Vec<SlotCell>>,
}

impl AvailabilityGrid {
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of known group members, for normalizing counts
    pub fn max_possible(&self) -> usize {
        self.max_possible
    }

    /// One row per day, one cell per slot
    pub fn rows(&self) -> &[Vec<SlotCell>] {
        &self.rows
    }

    pub fn cell(&self, day: u32, slot: u32) -> Option<&SlotCell> {
        self.rows.get(day as usize)?.get(slot as usize)
    }

    pub fn cells(&self) -> impl Iterator<Item = &SlotCell> {
        self.rows.iter().flatten()
    }

    /// Raw counts, `[day][slot]`
    pub fn counts(&self) -> Vec<Vec<usize>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.overlap_count).collect())
            .collect()
    }

    /// Highest count in the grid, zero for an empty one
    pub fn peak(&self) -> usize {
        self.cells()
            .map(|cell| cell.overlap_count)
            .max()
            .unwrap_or(0)
    }

    pub fn intensity(&self, day: u32, slot: u32) -> Option<f64> {
        self.cell(day, slot)
            .map(|cell| cell.intensity(self.max_possible))
    }
}

/// Counts, for every cell of the grid described by `config`, how many
/// submissions overlap the cell.
///
/// `max_possible` is carried through untouched for the caller's colour
/// scale; pass the size of the group.
///
/// # Errors
/// * `ValidationError::InvalidConfiguration` for a bad `config`
/// * `ValidationError::MeetingMismatch` if any interval belongs to another meeting
///
/// # Examples
/// ```
/// use availability_libs::grid::{availability_grid, GridConfig};
/// use availability_libs::interval::AvailabilityInterval;
/// use chrono::{NaiveDate, TimeZone, Utc};
///
/// let anchor = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
/// let config = GridConfig::new(anchor, 1, 9, 17, 30).unwrap();
/// let interval = AvailabilityInterval::new(
///     "ada",
///     Utc.with_ymd_and_hms(2025, 4, 10, 9, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2025, 4, 10, 10, 0, 0).unwrap(),
///     "review",
/// )
/// .unwrap();
///
/// let grid = availability_grid("review", &[interval], &config, 4).unwrap();
/// let counts = grid.counts();
/// assert_eq!(counts[0].len(), 16);
/// assert_eq!(counts[0][..3].to_vec(), vec![1, 1, 0]);
/// ```
pub fn availability_grid(
    meeting_id: &str,
    intervals: &[AvailabilityInterval],
    config: &GridConfig,
    max_possible: usize,
) -> Result<AvailabilityGrid, ValidationError> {
    config.validate()?;
    check_meeting(meeting_id, intervals)?;

    let slots = config.slots_per_day();

    let build_row = |day: u32| -> Result<Vec<SlotCell>, ValidationError> {
        let day_span = config.day_span(day).ok_or_else(|| config.outside((day, 0)))?;
        let relevant = intervals
            .iter()
            .filter(|interval| intersects(*interval, &day_span))
            .collect_vec();

        trace!("Day {}: {} intervals in range", day, relevant.len());

        (0..slots)
            .map(|slot| -> Result<SlotCell, ValidationError> {
                let span = config
                    .cell_span(day, slot)
                    .ok_or_else(|| config.outside((day, slot)))?;

                Ok(SlotCell {
                    day_index: day,
                    slot_index: slot,
                    overlap_count: relevant
                        .iter()
                        .filter(|interval| intersects(**interval, &span))
                        .count(),
                    span,
                })
            })
            .collect()
    };

    #[cfg(feature = "rayon")]
    let rows: Vec<Vec<SlotCell>> = (0..config.num_days)
        .into_par_iter()
        .map(build_row)
        .collect::<Result<_, _>>()?;
    #[cfg(not(feature = "rayon"))]
    let rows: Vec<Vec<SlotCell>> = (0..config.num_days)
        .map(build_row)
        .collect::<Result<_, _>>()?;

    debug!(
        "Rendered {}x{} grid for meeting {} from {} intervals",
        config.num_days,
        slots,
        meeting_id,
        intervals.len()
    );

    Ok(AvailabilityGrid {
        config: *config,
        max_possible,
        rows,
    })
}

/// Turns a drag selection into intervals, one per maximal run of
/// consecutive slots on the same day. Runs never continue across days.
///
/// Duplicate cells are ignored. Output is ordered by day, then slot.
///
/// # Errors
/// `ValidationError::InvalidConfiguration` for a bad `config` or a cell
/// outside the grid.
///
/// # Examples
/// ```
/// use availability_libs::grid::{cells_to_intervals, GridConfig};
/// use chrono::{NaiveDate, TimeZone, Utc};
///
/// let anchor = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
/// let config = GridConfig::new(anchor, 1, 9, 17, 30).unwrap();
/// let at = |h, m| Utc.with_ymd_and_hms(2025, 4, 10, h, m, 0).unwrap();
///
/// let merged = cells_to_intervals(vec![(0, 0), (0, 1), (0, 2)], &config).unwrap();
/// assert_eq!(merged.len(), 1);
/// assert_eq!((merged[0].start(), merged[0].end()), (at(9, 0), at(10, 30)));
///
/// let split = cells_to_intervals(vec![(0, 0), (0, 2)], &config).unwrap();
/// assert_eq!(split.len(), 2);
/// ```
pub fn cells_to_intervals<I>(
    selected: I,
    config: &GridConfig,
) -> Result<Vec<TimeRange>, ValidationError>
where
    I: IntoIterator<Item = CellIndex>,
{
    config.validate()?;

    let cells = selected.into_iter().sorted_unstable().dedup().collect_vec();

    if let Some(&cell) = cells.iter().find(|&&cell| !config.contains_cell(cell)) {
        return Err(config.outside(cell));
    }

    let ranges = cells
        .into_iter()
        .map(|(day, slot)| (day, slot, slot))
        .coalesce(|(day, first, last), (next_day, next_first, next_last)| {
            if day == next_day && last + 1 == next_first {
                Ok((day, first, next_last))
            } else {
                Err(((day, first, last), (next_day, next_first, next_last)))
            }
        })
        .map(|(day, first, last)| -> Result<TimeRange, ValidationError> {
            let first = config
                .cell_span(day, first)
                .ok_or_else(|| config.outside((day, first)))?;
            let last = config
                .cell_span(day, last)
                .ok_or_else(|| config.outside((day, last)))?;

            Ok(TimeRange {
                start: first.start,
                end: last.end,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    trace!("Merged selection into {} intervals", ranges.len());

    Ok(ranges)
}

/// [`cells_to_intervals`], stamped with the submitting member and meeting.
pub fn selection_to_intervals<I>(
    member_id: &str,
    meeting_id: &str,
    selected: I,
    config: &GridConfig,
) -> Result<Vec<AvailabilityInterval>, ValidationError>
where
    I: IntoIterator<Item = CellIndex>,
{
    cells_to_intervals(selected, config)?
        .into_iter()
        .map(|range| AvailabilityInterval::with_range(member_id, range, meeting_id))
        .collect()
}
