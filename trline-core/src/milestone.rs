//! The fixed, ordered set of TR review gates
//!
//! Every project is measured against the same eight gates. The declaration
//! order of [`Milestone`] is the chronological order used when resolving a
//! project's span, so it must not be reordered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix used by source spreadsheets for the reschedule column of a gate
pub const RESCHEDULE_SUFFIX: &str = "延期";

/// A TR gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Milestone {
    #[serde(rename = "TR1")]
    Tr1,
    #[serde(rename = "TR2")]
    Tr2,
    #[serde(rename = "TR3")]
    Tr3,
    #[serde(rename = "TR3A")]
    Tr3a,
    #[serde(rename = "TR4")]
    Tr4,
    #[serde(rename = "TR4A")]
    Tr4a,
    #[serde(rename = "TR5")]
    Tr5,
    #[serde(rename = "TR6")]
    Tr6,
}

impl Milestone {
    /// All gates, earliest first
    pub const ALL: [Milestone; 8] = [
        Milestone::Tr1,
        Milestone::Tr2,
        Milestone::Tr3,
        Milestone::Tr3a,
        Milestone::Tr4,
        Milestone::Tr4a,
        Milestone::Tr5,
        Milestone::Tr6,
    ];

    /// Canonical identifier, as it appears in column headers
    pub fn id(&self) -> &'static str {
        match self {
            Milestone::Tr1 => "TR1",
            Milestone::Tr2 => "TR2",
            Milestone::Tr3 => "TR3",
            Milestone::Tr3a => "TR3A",
            Milestone::Tr4 => "TR4",
            Milestone::Tr4a => "TR4A",
            Milestone::Tr5 => "TR5",
            Milestone::Tr6 => "TR6",
        }
    }

    /// Identifier of the paired reschedule column (e.g. "TR3A延期")
    pub fn reschedule_id(&self) -> String {
        format!("{}{}", self.id(), RESCHEDULE_SUFFIX)
    }

    /// Position in the canonical order
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// One of the sixteen date slots of a project row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateSlot {
    Nominal(Milestone),
    Reschedule(Milestone),
}

impl DateSlot {
    /// Nominal gates interleaved with their reschedule counterparts, earliest first
    pub fn chronological() -> [DateSlot; 16] {
        let mut slots = [DateSlot::Nominal(Milestone::Tr1); 16];
        for (i, m) in Milestone::ALL.iter().enumerate() {
            slots[2 * i] = DateSlot::Nominal(*m);
            slots[2 * i + 1] = DateSlot::Reschedule(*m);
        }
        slots
    }

    pub fn milestone(&self) -> Milestone {
        match self {
            DateSlot::Nominal(m) | DateSlot::Reschedule(m) => *m,
        }
    }

    /// Column identifier for this slot
    pub fn column_id(&self) -> String {
        match self {
            DateSlot::Nominal(m) => m.id().to_string(),
            DateSlot::Reschedule(m) => m.reschedule_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_declaration_order() {
        let mut sorted = Milestone::ALL;
        sorted.sort();
        assert_eq!(sorted, Milestone::ALL);
        assert_eq!(Milestone::Tr3a.index(), 3);
    }

    #[test]
    fn test_reschedule_id() {
        assert_eq!(Milestone::Tr1.reschedule_id(), "TR1延期");
        assert_eq!(Milestone::Tr4a.reschedule_id(), "TR4A延期");
    }

    #[test]
    fn test_chronological_slots_interleave() {
        let slots = DateSlot::chronological();
        assert_eq!(slots[0], DateSlot::Nominal(Milestone::Tr1));
        assert_eq!(slots[1], DateSlot::Reschedule(Milestone::Tr1));
        assert_eq!(slots[6], DateSlot::Nominal(Milestone::Tr3a));
        assert_eq!(slots[15], DateSlot::Reschedule(Milestone::Tr6));
        assert_eq!(slots[7].column_id(), "TR3A延期");
    }
}
