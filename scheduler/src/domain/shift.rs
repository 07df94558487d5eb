use serde::{Deserialize, Serialize};

/// A single shift kind an employee can be assigned on a work day.
///
/// `VACATION`, `CUSTOM` and `NONE` are sentinels that only ever appear in
/// inputs (pins, previous-month history) — the solver never assigns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftKind {
    Day,
    Sleep,
    MiniNight,
    LateNight,
    Vacation,
    Custom,
    None,
}

/// The four working shift kinds, in the head-count order the solver reports
/// statistics in.
pub const WORKING_KINDS: [ShiftKind; 4] = [
    ShiftKind::Day,
    ShiftKind::Sleep,
    ShiftKind::MiniNight,
    ShiftKind::LateNight,
];

/// The three night shift kinds, each requiring exactly one chief.
pub const NIGHT_KINDS: [ShiftKind; 3] = [ShiftKind::Sleep, ShiftKind::MiniNight, ShiftKind::LateNight];

impl ShiftKind {
    pub fn is_working(self) -> bool {
        WORKING_KINDS.contains(&self)
    }

    pub fn is_night(self) -> bool {
        NIGHT_KINDS.contains(&self)
    }

    /// Required head-count for this working shift kind on any work day, per
    /// the 6/5/3/3 invariant. `None` for non-working kinds.
    pub fn slot_count(self) -> Option<usize> {
        match self {
            ShiftKind::Day => Some(6),
            ShiftKind::Sleep => Some(5),
            ShiftKind::MiniNight => Some(3),
            ShiftKind::LateNight => Some(3),
            _ => None,
        }
    }
}
