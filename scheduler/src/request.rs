use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::calendar::Group;
use crate::domain::roster::{AvoidanceGroup, Employee};
use crate::domain::shift::ShiftKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    pub employee_id: String,
    pub date: NaiveDate,
    pub shift: ShiftKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviousMonthRecord {
    pub date: NaiveDate,
    pub records: Vec<(String, ShiftKind)>,
}

/// `{ month, group, employees, avoidance_groups?, pinned?,
/// previous_month_schedule?, first_work_day_override?, seed? }` (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub year: i32,
    pub month: u32,
    pub group: Group,
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub avoidance_groups: Vec<AvoidanceGroup>,
    #[serde(default)]
    pub pinned: Vec<Pin>,
    #[serde(default)]
    pub previous_month_schedule: Vec<PreviousMonthRecord>,
    pub first_work_day_override: Option<u32>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub records: Vec<(String, ShiftKind)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftDistribution {
    pub employee_id: String,
    pub counts: HashMap<ShiftKind, u32>,
}

/// Per-working-shift-kind aggregate across employees (spec §3: "the
/// min/max/avg/std/spread across employees for the month").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShiftStat {
    pub shift: ShiftKind,
    pub min: u32,
    pub max: u32,
    pub avg: f64,
    pub std: f64,
    pub spread: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    pub shift_distributions: Vec<ShiftDistribution>,
    pub two_month_distributions: Vec<ShiftDistribution>,
    pub shift_stats: Vec<ShiftStat>,
    pub two_month_shift_stats: Vec<ShiftStat>,
    pub fairness_score: u32,
    pub has_previous_data: bool,
    pub seed: u64,
}

/// `{ work_days, schedules, statistics }` (spec §6, success case).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    pub work_days: Vec<NaiveDate>,
    pub schedules: Vec<DayRecord>,
    pub statistics: Statistics,
}

/// `{ error_kind, detail }` (spec §6, failure case).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveError {
    pub error_kind: crate::error::ErrorKind,
    pub detail: String,
}

impl From<crate::error::SchedulerError> for SolveError {
    fn from(err: crate::error::SchedulerError) -> Self {
        Self {
            error_kind: err.kind,
            detail: err.detail,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub avoidance_groups: Vec<AvoidanceGroup>,
    pub schedule: Vec<DayRecord>,
    #[serde(default)]
    pub pinned: Vec<Pin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    SlotCountMismatch,
    ChiefMissing,
    ChiefDuplicate,
    RoleMismatch,
    AvoidanceConflict,
    ConsecutiveViolation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub date: NaiveDate,
    pub shift: Option<ShiftKind>,
    pub employee_ids: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorRequest {
    pub violation: Violation,
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub avoidance_groups: Vec<AvoidanceGroup>,
    pub schedule: Vec<DayRecord>,
    #[serde(default)]
    pub pinned: Vec<Pin>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    pub date: NaiveDate,
    pub employee_id: String,
    pub from_shift: ShiftKind,
    pub to_shift: ShiftKind,
}

/// `{description, changes}` where `changes` has length 1 (move) or 2 (pair
/// swap). (spec §6)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub description: String,
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorResponse {
    pub suggestion: Option<Suggestion>,
}
