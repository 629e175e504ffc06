use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dates::RawValue;
use crate::milestone::{DateSlot, Milestone};

/// Raw nominal/reschedule cells for one gate
#[derive(Debug, Clone, PartialEq)]
pub struct RawMilestoneCells {
    pub nominal: RawValue,
    pub reschedule: RawValue,
}

impl Default for RawMilestoneCells {
    fn default() -> Self {
        Self {
            nominal: RawValue::Null,
            reschedule: RawValue::Null,
        }
    }
}

/// One input row: a project name and the raw cells of every gate
#[derive(Debug, Clone, PartialEq)]
pub struct RawProjectRecord {
    /// Project name, already trimmed and non-empty
    pub name: String,
    cells: [RawMilestoneCells; 8],
}

impl RawProjectRecord {
    /// Creates a record with every date slot empty
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            cells: Default::default(),
        }
    }

    /// Builder-style setter for one gate
    pub fn with_dates(
        mut self,
        milestone: Milestone,
        nominal: impl Into<RawValue>,
        reschedule: impl Into<RawValue>,
    ) -> Self {
        self.cells[milestone.index()] = RawMilestoneCells {
            nominal: nominal.into(),
            reschedule: reschedule.into(),
        };
        self
    }

    /// Sets a single slot
    pub fn set(&mut self, slot: DateSlot, value: impl Into<RawValue>) {
        let cells = &mut self.cells[slot.milestone().index()];
        match slot {
            DateSlot::Nominal(_) => cells.nominal = value.into(),
            DateSlot::Reschedule(_) => cells.reschedule = value.into(),
        }
    }

    pub fn cells(&self, milestone: Milestone) -> &RawMilestoneCells {
        &self.cells[milestone.index()]
    }

    pub fn slot(&self, slot: DateSlot) -> &RawValue {
        let cells = self.cells(slot.milestone());
        match slot {
            DateSlot::Nominal(_) => &cells.nominal,
            DateSlot::Reschedule(_) => &cells.reschedule,
        }
    }
}

/// A gate that has a nominal date, with its slip in days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneObservation {
    pub date: NaiveDate,
    pub delay_days: i64,
}

impl MilestoneObservation {
    pub fn is_delayed(&self) -> bool {
        self.delay_days > 0
    }

    /// The date the gate actually moved to
    pub fn rescheduled_date(&self) -> Option<NaiveDate> {
        if self.is_delayed() {
            self.date.checked_add_signed(Duration::days(self.delay_days))
        } else {
            None
        }
    }
}

/// Derived, read-only timeline of a single project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTimeline {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Row position for layout; unique across the snapshot
    pub vertical_slot: u32,
    pub observations: BTreeMap<Milestone, MilestoneObservation>,
}

impl ProjectTimeline {
    /// Sum of all gate delays
    pub fn total_delay_days(&self) -> i64 {
        self.observations.values().map(|o| o.delay_days).sum()
    }

    /// Gates that slipped, in gate order
    pub fn delayed(&self) -> impl Iterator<Item = (Milestone, &MilestoneObservation)> {
        self.observations
            .iter()
            .filter(|(_, o)| o.is_delayed())
            .map(|(m, o)| (*m, o))
    }
}

/// Axis shared by every project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalTimeline {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    /// First day of every month within `[min_date, max_date]`
    pub monthly_ticks: Vec<NaiveDate>,
}
