//! Fuzz target: calendar event binning
//!
//! Builds a month grid from the first bytes, parses the rest as a JSON
//! array of calendar events and bins them, verifying:
//! - No panics for any month or event start the parser accepts
//! - No cell ever shows more than `MAX_DISPLAYED_EVENTS`
//! - Binning the binned grid again gives the same grid
//!
//! cargo fuzz run fuzz_event_binner

#![no_main]

use irrigation_panel::binner::{CalendarEvent, MAX_DISPLAYED_EVENTS, bin_events};
use irrigation_panel::calendar::{GRID_CELLS, MonthRef, build_month_grid};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let year = i32::from(i16::from_le_bytes([data[0], data[1]]));
    let month = MonthRef::new(year, u32::from(data[2]));
    let cap = usize::from(data[3] % 4).max(1);

    let Ok(events) = serde_json::from_slice::<Vec<CalendarEvent>>(&data[4..]) else {
        return;
    };

    let grid = build_month_grid(month, month.first_day());
    assert_eq!(grid.cells().len(), GRID_CELLS);

    let binned = bin_events(&grid, &events, cap, 15);
    for cell in binned.cells() {
        assert!(cell.displayed_events.len() <= cap.min(MAX_DISPLAYED_EVENTS));
        for shown in &cell.displayed_events {
            assert!(shown.summary.chars().count() <= 15);
        }
    }
    assert!(binned.event_count() <= events.len());
    assert_eq!(bin_events(&binned, &events, cap, 15), binned);
});
