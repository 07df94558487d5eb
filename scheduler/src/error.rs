use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error token surfaced across the scheduler's public API (spec §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    CalendarEmpty,
    RosterTooSmall,
    PinInvalid,
    Infeasible,
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            ErrorKind::CalendarEmpty => "CALENDAR_EMPTY",
            ErrorKind::RosterTooSmall => "ROSTER_TOO_SMALL",
            ErrorKind::PinInvalid => "PIN_INVALID",
            ErrorKind::Infeasible => "INFEASIBLE",
            ErrorKind::Timeout => "TIMEOUT",
        };
        f.write_str(token)
    }
}

/// The single error type threaded through `solve()`/`validate()`/`advise()`.
/// Never panics past the crate boundary; pairs a stable token with a
/// human-readable detail (spec §7).
#[derive(Error, Debug)]
#[error("{kind}: {detail}")]
pub struct SchedulerError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl SchedulerError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn calendar_empty(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::CalendarEmpty, detail)
    }

    pub fn roster_too_small(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::RosterTooSmall, detail)
    }

    pub fn pin_invalid(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::PinInvalid, detail)
    }

    pub fn infeasible(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Infeasible, detail)
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, detail)
    }
}

impl From<good_lp::ResolutionError> for SchedulerError {
    fn from(err: good_lp::ResolutionError) -> Self {
        match err {
            good_lp::ResolutionError::Infeasible => {
                Self::infeasible("solver proved no assignment satisfies the hard constraints")
            }
            good_lp::ResolutionError::Unbounded => {
                Self::infeasible("objective is unbounded, check penalty weights")
            }
            other => {
                let detail = format!("{other:?}");
                if detail.to_lowercase().contains("time limit") {
                    Self::timeout("solver exhausted its time budget without proving feasibility")
                } else {
                    Self::new(ErrorKind::Infeasible, format!("solver error: {detail}"))
                }
            }
        }
    }
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
