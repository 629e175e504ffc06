//! Built-in sample dataset
//!
//! Six projects (A-F) used whenever no usable data file is available. The
//! values are fixed so the fallback dashboard is reproducible.

use crate::milestone::{DateSlot, Milestone};
use crate::models::RawProjectRecord;

const NAMES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// Columns in chronological slot order (TR1, TR1 reschedule, TR2, ...); one
/// entry per project
const COLUMNS: [[Option<&str>; 6]; 16] = [
    // TR1
    [
        Some("2024-12-01"),
        Some("2024-12-15"),
        Some("2025-01-10"),
        Some("2024-11-20"),
        Some("2025-02-05"),
        Some("2025-03-01"),
    ],
    [None, Some("2025-03-01"), None, Some("2025-09-01"), None, None],
    // TR2
    [
        Some("2025-01-20"),
        Some("2025-02-28"),
        Some("2025-03-15"),
        Some("2025-01-05"),
        Some("2025-04-10"),
        Some("2025-05-10"),
    ],
    [Some("2025-01-23"), None, Some("2025-03-25"), None, None, Some("2025-05-15")],
    // TR3
    [
        Some("2025-03-10"),
        Some("2025-04-30"),
        Some("2025-05-20"),
        Some("2025-03-01"),
        Some("2025-06-15"),
        Some("2025-07-10"),
    ],
    [None, Some("2025-05-05"), None, None, Some("2025-06-22"), None],
    // TR3A
    [
        Some("2025-04-01"),
        Some("2025-05-15"),
        Some("2025-06-10"),
        Some("2025-04-05"),
        Some("2025-07-20"),
        Some("2025-08-05"),
    ],
    [Some("2025-04-03"), None, Some("2025-06-13"), None, None, None],
    // TR4
    [
        Some("2025-05-15"),
        Some("2025-06-30"),
        Some("2025-08-01"),
        Some("2025-05-20"),
        Some("2025-09-10"),
        Some("2025-09-30"),
    ],
    [None, None, Some("2025-08-06"), Some("2025-05-22"), None, None],
    // TR4A
    [
        Some("2025-06-01"),
        Some("2025-07-15"),
        Some("2025-08-20"),
        Some("2025-06-05"),
        Some("2025-09-25"),
        Some("2025-10-15"),
    ],
    [None, Some("2025-07-18"), None, None, Some("2025-09-30"), None],
    // TR5
    [
        Some("2025-07-10"),
        Some("2025-08-30"),
        Some("2025-10-01"),
        Some("2025-07-20"),
        Some("2025-11-05"),
        Some("2025-11-20"),
    ],
    [Some("2025-07-15"), None, None, Some("2025-07-23"), None, None],
    // TR6
    [
        Some("2025-08-20"),
        Some("2025-10-15"),
        Some("2025-12-01"),
        Some("2025-09-10"),
        Some("2025-12-15"),
        Some("2025-12-30"),
    ],
    [None, None, Some("2025-12-11"), None, None, None],
];

/// The sample projects, in display order
pub fn sample_records() -> Vec<RawProjectRecord> {
    let slots = DateSlot::chronological();
    NAMES
        .iter()
        .enumerate()
        .map(|(row, name)| {
            let mut record = RawProjectRecord::new(*name);
            for (slot, column) in slots.iter().zip(COLUMNS.iter()) {
                record.set(*slot, column[row]);
            }
            record
        })
        .collect()
}
