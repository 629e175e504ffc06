//! Cross-project timeline derivation
//!
//! Turns raw project rows into [`ProjectTimeline`]s and reduces them to the
//! shared [`GlobalTimeline`] axis. Everything here is pure: the only outside
//! input is `today`, used when a project has no dates or there are no
//! projects at all.

use chrono::{Datelike, Months, NaiveDate};
use std::collections::BTreeMap;

use crate::config::TimelineConfig;
use crate::dates::normalize;
use crate::delay::compute_delay;
use crate::milestone::{DateSlot, Milestone};
use crate::models::{GlobalTimeline, MilestoneObservation, ProjectTimeline, RawProjectRecord};
use crate::span::{resolve_span, shift_days};

/// Derive one timeline per record (in input order) plus the global axis
pub fn build_timelines(
    records: &[RawProjectRecord],
    config: &TimelineConfig,
    today: NaiveDate,
) -> (Vec<ProjectTimeline>, GlobalTimeline) {
    let projects: Vec<ProjectTimeline> = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let slot = (index as u32).saturating_mul(config.row_step);
            build_project(record, slot, config, today)
        })
        .collect();

    let global = global_timeline(&projects, config.empty_window_days, today);
    log::info!(
        "Built {} project timelines spanning {} to {}",
        projects.len(),
        global.min_date,
        global.max_date
    );

    (projects, global)
}

/// Derive a single project's timeline
pub fn build_project(
    record: &RawProjectRecord,
    vertical_slot: u32,
    config: &TimelineConfig,
    today: NaiveDate,
) -> ProjectTimeline {
    let slots: Vec<Option<NaiveDate>> = DateSlot::chronological()
        .iter()
        .map(|slot| normalize(record.slot(*slot).clone()))
        .collect();

    let resolved = resolve_span(&slots, config.pad_days, config.missing_end_days, today);
    if resolved.is_inverted() {
        log::warn!(
            "Project '{}' ends ({}) before it starts ({}); applying '{}' policy",
            record.name,
            resolved.end,
            resolved.start,
            config.span_policy
        );
    }
    let span = resolved.apply(config.span_policy);

    let mut observations = BTreeMap::new();
    for milestone in Milestone::ALL {
        let nominal = slots[2 * milestone.index()];
        let reschedule = slots[2 * milestone.index() + 1];
        if let Some(date) = nominal {
            observations.insert(
                milestone,
                MilestoneObservation {
                    date,
                    delay_days: compute_delay(date, reschedule),
                },
            );
        } else if reschedule.is_some() {
            log::debug!(
                "Project '{}' has a {} reschedule date without a nominal date; ignored",
                record.name,
                milestone
            );
        }
    }

    ProjectTimeline {
        name: record.name.clone(),
        start_date: span.start,
        end_date: span.end,
        vertical_slot,
        observations,
    }
}

/// Reduce project spans to the shared axis
pub fn global_timeline(
    projects: &[ProjectTimeline],
    empty_window_days: i64,
    today: NaiveDate,
) -> GlobalTimeline {
    let (min_date, max_date) = match (
        projects.iter().map(|p| p.start_date).min(),
        projects.iter().map(|p| p.end_date).max(),
    ) {
        (Some(min), Some(max)) => (min, max),
        _ => (
            shift_days(today, -empty_window_days),
            shift_days(today, empty_window_days),
        ),
    };

    GlobalTimeline {
        min_date,
        max_date,
        monthly_ticks: monthly_ticks(min_date, max_date),
    }
}

/// Every first-of-month date within `[from, to]`
pub fn monthly_ticks(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut ticks = Vec::new();
    let Some(month_start) = from.with_day(1) else {
        return ticks;
    };
    let mut tick = if month_start == from {
        Some(month_start)
    } else {
        month_start.checked_add_months(Months::new(1))
    };

    while let Some(t) = tick {
        if t > to {
            break;
        }
        ticks.push(t);
        tick = t.checked_add_months(Months::new(1));
    }
    ticks
}

/// Two-line axis label for a tick: year, then `MM.DD`
pub fn tick_label(tick: NaiveDate) -> (String, String) {
    (tick.format("%Y").to_string(), tick.format("%m.%d").to_string())
}
