pub mod directory;
pub mod error;
pub mod grid;
pub mod interval;
pub mod overlap;
pub mod submission;
pub mod time;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use directory::{DirectoryError, MeetingDirectory, MemoryDirectory, Planner};
pub use error::ValidationError;
pub use grid::{
    availability_grid, cells_to_intervals, selection_to_intervals, AvailabilityGrid, CellIndex,
    GridConfig, SlotCell, MAX_GRID_DAYS,
};
pub use interval::{AvailabilityInterval, Member};
pub use overlap::{best_meeting_times, peak_overlap_windows, OverlapTier, OverlapWindow};
pub use submission::{
    append_availability, apply_submission, replace_member_availability, validate_members,
    AvailabilitySubmission, SubmissionMode,
};
pub use time::{intersects, Instant, Span, TimeRange};

#[cfg(test)]
mod tests {
    use crate::interval::AvailabilityInterval;
    use crate::time::{Instant, TimeRange};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn at(day: u32, hour: u32, minute: u32) -> Instant {
        Utc.with_ymd_and_hms(2025, 4, 10 + day, hour, minute, 0)
            .unwrap()
    }

    fn range(from: (u32, u32), to: (u32, u32)) -> TimeRange {
        TimeRange::new(at(0, from.0, from.1), at(0, to.0, to.1)).unwrap()
    }

    fn submit(member: &str, from: (u32, u32), to: (u32, u32)) -> AvailabilityInterval {
        AvailabilityInterval::with_range(member, range(from, to), "review").unwrap()
    }

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    #[test]
    fn intersects_is_reflexive_and_symmetric() {
        use crate::time::intersects;

        let ranges = vec![
            range((9, 0), (10, 0)),
            range((9, 30), (11, 0)),
            range((10, 0), (10, 30)),
            range((12, 0), (13, 0)),
        ];

        for a in ranges.iter() {
            assert!(intersects(a, a));
            for b in ranges.iter() {
                assert_eq!(intersects(a, b), intersects(b, a), "{:?} / {:?}", a, b);
            }
        }
    }

    #[test]
    fn back_to_back_ranges_do_not_intersect() {
        use crate::time::intersects;

        let first = range((10, 0), (10, 30));
        let second = range((10, 30), (11, 0));

        assert!(!intersects(&first, &second));
        assert!(!intersects(&second, &first));

        let nested = range((10, 10), (10, 20));
        assert!(intersects(&first, &nested));
        assert!(first.contains(at(0, 10, 0)));
        assert!(!first.contains(at(0, 10, 30)));
    }

    #[test]
    fn intervals_and_cells_share_overlap_semantics() {
        use crate::grid::GridConfig;
        use crate::time::intersects;

        let config = GridConfig::week_from(anchor());
        let first_cell = config.cell_span(0, 0).unwrap();
        let interval = submit("ada", (8, 0), (9, 0));

        assert_eq!(first_cell.start(), at(0, 9, 0));
        assert!(!intersects(&interval, &first_cell));
        assert!(intersects(&submit("ada", (8, 0), (9, 1)), &first_cell));
    }

    #[test]
    fn rejects_empty_or_inverted_intervals() {
        use crate::error::ValidationError;

        assert_eq!(
            AvailabilityInterval::new("ada", at(0, 10, 0), at(0, 10, 0), "review"),
            Err(ValidationError::InvalidInterval {
                start: at(0, 10, 0),
                end: at(0, 10, 0)
            })
        );
        assert!(matches!(
            AvailabilityInterval::new("ada", at(0, 11, 0), at(0, 10, 0), "review"),
            Err(ValidationError::InvalidInterval { .. })
        ));
        assert_eq!(
            AvailabilityInterval::new("ada", at(0, 10, 0), at(0, 11, 0), "  "),
            Err(ValidationError::InvalidIdentifier {
                field: "meeting id"
            })
        );
        assert_eq!(
            AvailabilityInterval::new("", at(0, 11, 0), at(0, 10, 0), ""),
            Err(ValidationError::InvalidIdentifier { field: "member id" })
        );
    }

    #[test]
    fn best_times_of_nothing_is_nothing() {
        use crate::overlap::best_meeting_times;

        assert_eq!(best_meeting_times("review", &[]), Ok(vec![]));
    }

    #[test]
    fn best_times_group_exact_windows() {
        use crate::overlap::{best_meeting_times, OverlapTier};

        let intervals = vec![
            submit("ada", (14, 0), (15, 0)),
            submit("dee", (9, 0), (10, 0)),
            submit("bob", (14, 0), (15, 0)),
            submit("cy", (14, 0), (15, 0)),
        ];

        let windows = best_meeting_times("review", &intervals).unwrap();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start(), at(0, 14, 0));
        assert_eq!(windows[0].end(), at(0, 15, 0));
        assert_eq!(windows[0].count(), 3);
        assert_eq!(windows[0].member_ids(), ["ada", "bob", "cy"]);
        assert_eq!(windows[0].tier(), OverlapTier::High);
    }

    #[test]
    fn best_times_count_each_member_once() {
        use crate::overlap::best_meeting_times;

        let intervals = vec![
            submit("ada", (14, 0), (15, 0)),
            submit("ada", (14, 0), (15, 0)),
            submit("ada", (16, 0), (17, 0)),
            submit("bob", (16, 0), (17, 0)),
        ];

        let windows = best_meeting_times("review", &intervals).unwrap();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start(), at(0, 16, 0));
        assert_eq!(windows[0].count(), 2);
    }

    #[test]
    fn best_times_ignore_partial_overlaps() {
        use crate::overlap::best_meeting_times;

        let intervals = vec![
            submit("ada", (14, 0), (15, 0)),
            submit("bob", (14, 0), (15, 30)),
        ];

        assert!(best_meeting_times("review", &intervals).unwrap().is_empty());
    }

    #[test]
    fn best_times_rank_by_count_then_start_then_members() {
        use crate::overlap::best_meeting_times;

        let intervals = vec![
            submit("ada", (16, 0), (17, 0)),
            submit("bob", (16, 0), (17, 0)),
            submit("cy", (13, 0), (14, 0)),
            submit("dee", (13, 0), (14, 0)),
            submit("ada", (11, 0), (12, 0)),
            submit("bob", (11, 0), (12, 0)),
            submit("cy", (11, 0), (12, 0)),
            submit("ada", (13, 0), (14, 30)),
            submit("bob", (13, 0), (14, 30)),
        ];

        let windows = best_meeting_times("review", &intervals).unwrap();
        let order = windows
            .iter()
            .map(|w| (w.start(), w.end(), w.count()))
            .collect::<Vec<_>>();

        assert_eq!(
            order,
            vec![
                (at(0, 11, 0), at(0, 12, 0), 3),
                (at(0, 13, 0), at(0, 14, 30), 2),
                (at(0, 13, 0), at(0, 14, 0), 2),
                (at(0, 16, 0), at(0, 17, 0), 2),
            ]
        );
        assert_eq!(windows[1].member_ids(), ["ada", "bob"]);
        assert_eq!(windows[2].member_ids(), ["cy", "dee"]);
    }

    #[test]
    fn best_times_are_repeatable() {
        use crate::overlap::best_meeting_times;

        let intervals = vec![
            submit("cy", (9, 0), (10, 0)),
            submit("ada", (9, 0), (10, 0)),
            submit("bob", (10, 0), (11, 0)),
            submit("dee", (10, 0), (11, 0)),
        ];

        let first = best_meeting_times("review", &intervals).unwrap();
        let second = best_meeting_times("review", &intervals).unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0].start(), at(0, 9, 0));
        assert_eq!(first[1].start(), at(0, 10, 0));
    }

    #[test]
    fn best_times_reject_foreign_meetings() {
        use crate::error::ValidationError;
        use crate::overlap::best_meeting_times;

        let intervals = vec![
            submit("ada", (9, 0), (10, 0)),
            AvailabilityInterval::with_range("bob", range((9, 0), (10, 0)), "standup").unwrap(),
        ];

        assert_eq!(
            best_meeting_times("review", &intervals),
            Err(ValidationError::MeetingMismatch {
                expected: "review".to_string(),
                found: "standup".to_string()
            })
        );
    }

    #[test]
    fn sweep_finds_partial_overlaps() {
        use crate::overlap::peak_overlap_windows;

        let intervals = vec![
            submit("ada", (9, 0), (12, 0)),
            submit("bob", (10, 0), (11, 0)),
            submit("cy", (10, 30), (13, 0)),
        ];

        let windows = peak_overlap_windows("review", &intervals).unwrap();
        let summary = windows
            .iter()
            .map(|w| (w.start(), w.end(), w.member_ids().to_vec()))
            .collect::<Vec<_>>();

        assert_eq!(
            summary,
            vec![
                (
                    at(0, 10, 30),
                    at(0, 11, 0),
                    vec!["ada".to_string(), "bob".to_string(), "cy".to_string()]
                ),
                (
                    at(0, 10, 0),
                    at(0, 10, 30),
                    vec!["ada".to_string(), "bob".to_string()]
                ),
                (
                    at(0, 11, 0),
                    at(0, 12, 0),
                    vec!["ada".to_string(), "cy".to_string()]
                ),
            ]
        );
    }

    #[test]
    fn sweep_joins_back_to_back_segments_and_own_overlaps() {
        use crate::overlap::peak_overlap_windows;

        let intervals = vec![
            submit("ada", (9, 0), (10, 0)),
            submit("ada", (10, 0), (11, 0)),
            submit("ada", (9, 30), (10, 30)),
            submit("bob", (9, 0), (11, 0)),
        ];

        let windows = peak_overlap_windows("review", &intervals).unwrap();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start(), at(0, 9, 0));
        assert_eq!(windows[0].end(), at(0, 11, 0));
        assert_eq!(windows[0].count(), 2);
    }

    #[test]
    fn sweep_skips_lone_members() {
        use crate::overlap::peak_overlap_windows;

        let intervals = vec![
            submit("ada", (9, 0), (10, 0)),
            submit("bob", (10, 0), (11, 0)),
        ];

        assert!(peak_overlap_windows("review", &intervals)
            .unwrap()
            .is_empty());
        assert!(peak_overlap_windows("review", &[]).unwrap().is_empty());
    }

    #[test]
    fn grid_counts_overlapping_cells() {
        use crate::grid::{availability_grid, GridConfig};

        let config = GridConfig::new(anchor(), 1, 9, 17, 30).unwrap();
        assert_eq!(config.slots_per_day(), 16);

        let grid = availability_grid("review", &[submit("ada", (9, 0), (10, 0))], &config, 3)
            .unwrap();
        let counts = grid.counts();

        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].len(), 16);
        assert_eq!(counts[0][0], 1);
        assert_eq!(counts[0][1], 1);
        assert!(counts[0][2..].iter().all(|&c| c == 0));
        assert_eq!(grid.max_possible(), 3);
    }

    #[test]
    fn grid_spans_several_days() {
        use crate::grid::{availability_grid, GridConfig};

        let config = GridConfig::week_from(anchor());
        assert_eq!(config.slots_per_day(), 24);

        let intervals = vec![
            AvailabilityInterval::new("ada", at(1, 9, 15), at(1, 10, 0), "review").unwrap(),
            AvailabilityInterval::new("bob", at(1, 9, 0), at(1, 9, 30), "review").unwrap(),
            // Overnight, only the evening of day 2 and the morning of day 3 are rendered
            AvailabilityInterval::new("cy", at(2, 20, 0), at(3, 9, 30), "review").unwrap(),
        ];

        let grid = availability_grid("review", &intervals, &config, 4).unwrap();

        assert_eq!(grid.rows().len(), 7);
        assert_eq!(grid.cell(1, 0).map(|c| c.overlap_count), Some(2));
        assert_eq!(grid.cell(1, 1).map(|c| c.overlap_count), Some(1));
        assert_eq!(grid.cell(1, 2).map(|c| c.overlap_count), Some(0));
        assert_eq!(grid.cell(2, 22).map(|c| c.overlap_count), Some(1));
        assert_eq!(grid.cell(2, 23).map(|c| c.overlap_count), Some(1));
        assert_eq!(grid.cell(3, 0).map(|c| c.overlap_count), Some(1));
        assert_eq!(grid.cell(3, 1).map(|c| c.overlap_count), Some(0));
        assert_eq!(grid.cell(0, 0).map(|c| c.overlap_count), Some(0));
        assert_eq!(grid.cell(7, 0), None);

        assert_eq!(grid.peak(), 2);
        assert_eq!(grid.intensity(1, 0), Some(0.5));
        assert_eq!(grid.cells().count(), 7 * 24);
    }

    #[test]
    fn grid_cells_know_their_position() {
        use crate::grid::{availability_grid, GridConfig};

        let config = GridConfig::new(anchor(), 2, 8, 10, 15).unwrap();
        let grid = availability_grid("review", &[], &config, 0).unwrap();

        let cell = grid.cell(1, 5).unwrap();
        assert_eq!((cell.day_index, cell.slot_index), (1, 5));
        assert_eq!(cell.span.start(), at(1, 9, 15));
        assert_eq!(cell.span.end(), at(1, 9, 30));
        assert_eq!(cell.intensity(grid.max_possible()), 0.0);
        assert_eq!(grid.peak(), 0);
    }

    #[test]
    fn intensity_is_normalized_and_clamped() {
        use crate::grid::SlotCell;

        let cell = SlotCell {
            day_index: 0,
            slot_index: 0,
            overlap_count: 3,
            span: range((9, 0), (9, 30)),
        };

        assert_eq!(cell.intensity(4), 0.75);
        assert_eq!(cell.intensity(2), 1.0);
        assert_eq!(cell.intensity(0), 1.0);
    }

    #[test]
    fn grid_rejects_bad_configurations() {
        use crate::error::ValidationError;
        use crate::grid::{availability_grid, GridConfig};

        let bad = vec![
            (0, 9, 17, 30),
            (1, 17, 9, 30),
            (1, 9, 9, 30),
            (1, 9, 25, 30),
            (1, 9, 17, 45),
            (1, 9, 17, 0),
            (1, 9, 17, 90),
        ];

        for (days, start, end, minutes) in bad {
            assert!(
                matches!(
                    GridConfig::new(anchor(), days, start, end, minutes),
                    Err(ValidationError::InvalidConfiguration { .. })
                ),
                "{} {} {} {}",
                days,
                start,
                end,
                minutes
            );
        }

        let config = GridConfig {
            slot_duration_minutes: 7,
            ..GridConfig::week_from(anchor())
        };
        assert!(matches!(
            availability_grid("review", &[], &config, 1),
            Err(ValidationError::InvalidConfiguration { .. })
        ));

        assert!(GridConfig::new(anchor(), 1, 0, 24, 60).is_ok());
    }

    #[test]
    fn grid_rejects_days_past_the_calendar() {
        use crate::error::ValidationError;
        use crate::grid::{availability_grid, cells_to_intervals, GridConfig, MAX_GRID_DAYS};

        let last = GridConfig::new(NaiveDate::MAX, 1, 9, 17, 30).unwrap();
        assert_eq!(
            last.cell_span(0, 15).map(|span| span.end().date_naive()),
            Some(NaiveDate::MAX)
        );
        assert_eq!(last.cell_span(1, 0), None);
        assert!(matches!(
            cells_to_intervals(vec![(1, 0)], &last),
            Err(ValidationError::InvalidConfiguration { .. })
        ));

        assert!(matches!(
            GridConfig::new(NaiveDate::MAX, 2, 9, 17, 30),
            Err(ValidationError::InvalidConfiguration { .. })
        ));

        let unchecked = GridConfig {
            num_days: 2,
            ..last
        };
        assert_eq!(unchecked.day_span(1), None);
        assert!(matches!(
            availability_grid("review", &[], &unchecked, 1),
            Err(ValidationError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            cells_to_intervals(vec![(1, 0)], &unchecked),
            Err(ValidationError::InvalidConfiguration { .. })
        ));

        assert!(GridConfig::new(anchor(), MAX_GRID_DAYS, 9, 17, 30).is_ok());
        assert!(matches!(
            GridConfig::new(anchor(), MAX_GRID_DAYS + 1, 9, 17, 30),
            Err(ValidationError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            GridConfig::new(anchor(), u32::MAX, 9, 17, 30),
            Err(ValidationError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn grid_rejects_foreign_meetings() {
        use crate::error::ValidationError;
        use crate::grid::{availability_grid, GridConfig};

        let foreign =
            AvailabilityInterval::with_range("ada", range((9, 0), (10, 0)), "standup").unwrap();

        assert!(matches!(
            availability_grid("review", &[foreign], &GridConfig::week_from(anchor()), 1),
            Err(ValidationError::MeetingMismatch { .. })
        ));
    }

    #[test]
    fn merges_contiguous_selection() {
        use crate::grid::{cells_to_intervals, GridConfig};

        let config = GridConfig::new(anchor(), 1, 9, 17, 30).unwrap();

        assert_eq!(
            cells_to_intervals(vec![(0, 2), (0, 0), (0, 1)], &config),
            Ok(vec![range((9, 0), (10, 30))])
        );
        assert_eq!(
            cells_to_intervals(vec![(0, 0), (0, 2)], &config),
            Ok(vec![range((9, 0), (9, 30)), range((10, 0), (10, 30))])
        );
        assert_eq!(cells_to_intervals(Vec::<(u32, u32)>::new(), &config), Ok(vec![]));
    }

    #[test]
    fn selection_ignores_duplicates_and_splits_days() {
        use crate::grid::{cells_to_intervals, GridConfig};

        let config = GridConfig::new(anchor(), 2, 0, 24, 60).unwrap();

        let merged = cells_to_intervals(vec![(0, 22), (0, 23), (0, 23), (1, 0), (1, 1)], &config)
            .unwrap();

        assert_eq!(
            merged,
            vec![
                TimeRange::new(at(0, 22, 0), at(1, 0, 0)).unwrap(),
                TimeRange::new(at(1, 0, 0), at(1, 2, 0)).unwrap(),
            ]
        );
    }

    #[test]
    fn selection_outside_grid_is_rejected() {
        use crate::error::ValidationError;
        use crate::grid::{cells_to_intervals, GridConfig};

        let config = GridConfig::new(anchor(), 1, 9, 17, 30).unwrap();

        assert!(matches!(
            cells_to_intervals(vec![(0, 0), (0, 16)], &config),
            Err(ValidationError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            cells_to_intervals(vec![(1, 0)], &config),
            Err(ValidationError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn selection_round_trips_through_the_grid() {
        use crate::grid::{availability_grid, selection_to_intervals, GridConfig};

        let config = GridConfig::week_from(anchor());
        let selected = vec![(2, 4), (2, 5), (2, 6), (4, 0)];

        let intervals = selection_to_intervals("ada", "review", selected.clone(), &config).unwrap();
        assert_eq!(intervals.len(), 2);

        let grid = availability_grid("review", &intervals, &config, 1).unwrap();
        let marked = grid
            .cells()
            .filter(|c| c.overlap_count > 0)
            .map(|c| (c.day_index, c.slot_index))
            .collect::<Vec<_>>();

        assert_eq!(marked, selected);
    }

    #[test]
    fn append_keeps_and_replace_swaps() {
        use crate::submission::{append_availability, replace_member_availability};

        let existing = vec![
            submit("ada", (9, 0), (10, 0)),
            submit("bob", (9, 0), (10, 0)),
            submit("ada", (11, 0), (12, 0)),
        ];

        let appended =
            append_availability(&existing, "review", "ada", &[range((14, 0), (15, 0))]).unwrap();
        assert_eq!(appended.len(), 4);
        assert_eq!(&appended[..3], &existing[..]);
        assert_eq!(appended[3], submit("ada", (14, 0), (15, 0)));

        let replaced =
            replace_member_availability(&existing, "review", "ada", &[range((14, 0), (15, 0))])
                .unwrap();
        assert_eq!(
            replaced,
            vec![submit("bob", (9, 0), (10, 0)), submit("ada", (14, 0), (15, 0))]
        );

        let cleared = replace_member_availability(&existing, "review", "ada", &[]).unwrap();
        assert_eq!(cleared, vec![submit("bob", (9, 0), (10, 0))]);

        assert_eq!(existing.len(), 3);
    }

    #[test]
    fn submissions_validate_identity() {
        use crate::error::ValidationError;
        use crate::submission::{append_availability, AvailabilitySubmission, SubmissionMode};

        assert_eq!(
            AvailabilitySubmission::new("review", "", &[], SubmissionMode::Append),
            Err(ValidationError::InvalidIdentifier { field: "member id" })
        );

        let foreign = vec![
            AvailabilityInterval::with_range("ada", range((9, 0), (10, 0)), "standup").unwrap(),
        ];
        assert!(matches!(
            append_availability(&foreign, "review", "ada", &[]),
            Err(ValidationError::MeetingMismatch { .. })
        ));
    }

    #[test]
    fn validates_group_membership() {
        use crate::error::ValidationError;
        use crate::interval::Member;
        use crate::submission::validate_members;

        let members = vec![
            Member::new("ada", "Ada L").unwrap(),
            Member::new("bob", "Bob K").unwrap(),
        ];

        assert_eq!(
            validate_members(&[submit("ada", (9, 0), (10, 0))], &members),
            Ok(())
        );
        assert_eq!(
            validate_members(
                &[submit("bob", (9, 0), (10, 0)), submit("eve", (9, 0), (10, 0))],
                &members
            ),
            Err(ValidationError::UnknownMember {
                member_id: "eve".to_string()
            })
        );
        assert!(Member::new("", "Nobody").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialization_runs_the_same_checks() {
        use crate::interval::Member;

        let interval: AvailabilityInterval = serde_json::from_str(
            r#"{"memberId":"ada","meetingId":"review","start":"2025-04-10T09:00:00Z","end":"2025-04-10T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(interval, submit("ada", (9, 0), (10, 0)));

        let wire = serde_json::to_string(&interval).unwrap();
        assert_eq!(
            serde_json::from_str::<AvailabilityInterval>(&wire).unwrap(),
            interval
        );

        assert!(serde_json::from_str::<AvailabilityInterval>(
            r#"{"memberId":"ada","meetingId":"review","start":"2025-04-10T10:00:00Z","end":"2025-04-10T09:00:00Z"}"#,
        )
        .is_err());
        assert!(serde_json::from_str::<AvailabilityInterval>(
            r#"{"memberId":" ","meetingId":"review","start":"2025-04-10T09:00:00Z","end":"2025-04-10T10:00:00Z"}"#,
        )
        .is_err());
        assert!(serde_json::from_str::<TimeRange>(
            r#"{"start":"2025-04-10T09:00:00Z","end":"2025-04-10T09:00:00Z"}"#,
        )
        .is_err());

        let member: Member =
            serde_json::from_str(r#"{"id":"ada","displayName":"Ada L"}"#).unwrap();
        assert_eq!(member, Member::new("ada", "Ada L").unwrap());
        assert!(serde_json::from_str::<Member>(r#"{"id":"","displayName":"Nobody"}"#).is_err());
    }

    #[test]
    fn tiers_follow_counts() {
        use crate::overlap::OverlapTier;

        assert_eq!(OverlapTier::from_count(0), OverlapTier::Low);
        assert_eq!(OverlapTier::from_count(2), OverlapTier::Medium);
        assert_eq!(OverlapTier::from_count(3), OverlapTier::High);
        assert!(OverlapTier::High > OverlapTier::Medium);
    }

    #[test]
    fn planner_reads_and_writes_through_the_directory() {
        use crate::directory::{DirectoryError, MeetingDirectory, MemoryDirectory, Planner};
        use crate::error::ValidationError;
        use crate::grid::GridConfig;
        use crate::interval::Member;
        use crate::submission::SubmissionMode;

        let directory = MemoryDirectory::new();
        directory.add_group(
            "study",
            vec![
                Member::new("ada", "Ada L").unwrap(),
                Member::new("bob", "Bob K").unwrap(),
                Member::new("cy", "Cy T").unwrap(),
                Member::new("dee", "Dee M").unwrap(),
            ],
        );
        directory.add_meeting("review");

        let planner = Planner::new(directory);
        let config = GridConfig::week_from(anchor());

        for member in ["ada", "bob"].iter() {
            planner
                .submit_selection(
                    "study",
                    "review",
                    member,
                    vec![(0, 0), (0, 1)],
                    &config,
                    SubmissionMode::Append,
                )
                .unwrap();
        }

        let windows = planner.best_meeting_times("review").unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].count(), 2);
        assert_eq!(windows[0].start(), at(0, 9, 0));
        assert_eq!(windows[0].end(), at(0, 10, 0));

        let grid = planner.availability_grid("review", "study", &config).unwrap();
        assert_eq!(grid.max_possible(), 4);
        assert_eq!(grid.intensity(0, 1), Some(0.5));

        // Bob moves to the afternoon
        planner
            .submit_selection(
                "study",
                "review",
                "bob",
                vec![(0, 10)],
                &config,
                SubmissionMode::Replace,
            )
            .unwrap();
        assert!(planner.best_meeting_times("review").unwrap().is_empty());
        assert_eq!(
            planner.directory().availability_intervals("review").unwrap().len(),
            2
        );
        assert_eq!(planner.peak_overlap_windows("review").unwrap(), vec![]);

        assert_eq!(
            planner.submit_selection(
                "study",
                "review",
                "eve",
                vec![(0, 0)],
                &config,
                SubmissionMode::Append,
            ),
            Err(DirectoryError::Validation(ValidationError::UnknownMember {
                member_id: "eve".to_string()
            }))
        );
        assert_eq!(
            planner.best_meeting_times("retro"),
            Err(DirectoryError::UnknownMeeting("retro".to_string()))
        );
        assert!(matches!(
            planner.availability_grid("review", "chess", &config),
            Err(DirectoryError::UnknownGroup(_))
        ));
    }
}
