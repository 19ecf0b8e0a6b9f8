#![no_main]
use availability_libs::grid::{
    availability_grid, cells_to_intervals, selection_to_intervals, GridConfig,
};
use availability_libs::time::intersects;
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeSet;

fuzz_target!(|data: (u8, u8, u8, u8, Vec<(u8, u8)>)| {
    let (days, start_hour, end_hour, minutes, cells) = data;

    let anchor = match NaiveDate::from_ymd_opt(2025, 4, 10) {
        Some(anchor) => anchor,
        None => return,
    };

    let config = match GridConfig::new(
        anchor,
        u32::from(days % 8),
        u32::from(start_hour % 25),
        u32::from(end_hour % 25),
        u32::from(minutes % 61),
    ) {
        Ok(config) => config,
        Err(_) => return,
    };

    let selected: BTreeSet<(u32, u32)> = cells
        .into_iter()
        .map(|(d, s)| (u32::from(d) % config.num_days, u32::from(s) % config.slots_per_day()))
        .collect();

    let merged = cells_to_intervals(selected.iter().copied(), &config)
        .expect("Every selected cell lies inside the grid");

    assert!(
        merged.windows(2).all(|pair| !intersects(&pair[0], &pair[1])),
        "Merged selection overlaps itself"
    );

    let covered: i64 = merged.iter().map(|r| r.duration().num_minutes()).sum();
    assert_eq!(
        covered,
        selected.len() as i64 * i64::from(config.slot_duration_minutes),
        "Merged selection does not cover exactly the selected cells"
    );

    let intervals = selection_to_intervals("fuzz", "fuzz", selected.iter().copied(), &config)
        .expect("Selection converts to intervals");
    let grid = availability_grid("fuzz", &intervals, &config, 1).expect("Valid grid");

    let marked: BTreeSet<(u32, u32)> = grid
        .cells()
        .filter(|cell| cell.overlap_count > 0)
        .map(|cell| (cell.day_index, cell.slot_index))
        .collect();

    assert_eq!(marked, selected, "Grid does not reproduce the selection");
    assert!(grid.peak() <= 1, "A lone member overlaps a cell twice");
});
