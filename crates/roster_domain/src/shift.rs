use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical shift buckets of the weekly grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shift {
    Day,
    Night,
}

impl Shift {
    /// Grid order: day shift first.
    pub const ALL: [Shift; 2] = [Shift::Day, Shift::Night];

    pub fn index(self) -> usize {
        match self {
            Shift::Day => 0,
            Shift::Night => 1,
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Day => f.write_str("Day"),
            Shift::Night => f.write_str("Night"),
        }
    }
}

/// Classifies a free-form shift label. Any label without "day" in it is a night shift.
pub fn normalize(raw: &str) -> Shift {
    if raw.to_lowercase().contains("day") {
        Shift::Day
    } else {
        Shift::Night
    }
}
