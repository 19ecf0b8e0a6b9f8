//! Browser bindings. Timestamps cross the boundary as RFC 3339 strings and
//! errors come back as their display message.

use crate::error::ValidationError;
use crate::grid::{self, CellIndex, GridConfig};
use crate::interval::AvailabilityInterval;
use crate::overlap;
use wasm_bindgen::prelude::*;

fn to_js(err: ValidationError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(js_name = bestMeetingTimes)]
pub fn best_meeting_times(meeting_id: &str, intervals: JsValue) -> Result<JsValue, JsValue> {
    let intervals: Vec<AvailabilityInterval> = serde_wasm_bindgen::from_value(intervals)?;
    let windows = overlap::best_meeting_times(meeting_id, &intervals).map_err(to_js)?;

    Ok(serde_wasm_bindgen::to_value(&windows)?)
}

#[wasm_bindgen(js_name = peakOverlapWindows)]
pub fn peak_overlap_windows(meeting_id: &str, intervals: JsValue) -> Result<JsValue, JsValue> {
    let intervals: Vec<AvailabilityInterval> = serde_wasm_bindgen::from_value(intervals)?;
    let windows = overlap::peak_overlap_windows(meeting_id, &intervals).map_err(to_js)?;

    Ok(serde_wasm_bindgen::to_value(&windows)?)
}

#[wasm_bindgen(js_name = availabilityGrid)]
pub fn availability_grid(
    meeting_id: &str,
    intervals: JsValue,
    config: JsValue,
    max_possible: usize,
) -> Result<JsValue, JsValue> {
    let intervals: Vec<AvailabilityInterval> = serde_wasm_bindgen::from_value(intervals)?;
    let config: GridConfig = serde_wasm_bindgen::from_value(config)?;

    let grid =
        grid::availability_grid(meeting_id, &intervals, &config, max_possible).map_err(to_js)?;

    Ok(serde_wasm_bindgen::to_value(&grid)?)
}

/// `selected` is an array of `[day, slot]` pairs.
#[wasm_bindgen(js_name = mergeSelectedCells)]
pub fn merge_selected_cells(selected: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let selected: Vec<CellIndex> = serde_wasm_bindgen::from_value(selected)?;
    let config: GridConfig = serde_wasm_bindgen::from_value(config)?;

    let ranges = grid::cells_to_intervals(selected, &config).map_err(to_js)?;

    Ok(serde_wasm_bindgen::to_value(&ranges)?)
}
