use rand::Rng;

use crate::config::Settings;
use crate::domain::calendar::{Calendar, CalendarOverride};
use crate::domain::history::{HistoryProjector, PreviousMonthDay};
use crate::domain::model::ConstraintModelBuilder;
use crate::domain::roster::RosterModel;
use crate::domain::shift::ShiftKind;
use crate::error::{ErrorKind, SchedulerError};
use crate::request::{Pin, PreviousMonthRecord, SolveRequest, SolveResponse};

use super::extractor::extract;

/// Orchestrates one end-to-end solve: resolve the calendar, validate and
/// project history, build and solve the constraint model, then materialize
/// the response. Mirrors the flow spec.md §2 describes for the whole
/// system, as a single synchronous call (spec §5).
pub fn solve(request: &SolveRequest, settings: &Settings) -> Result<SolveResponse, SchedulerError> {
    let roster = RosterModel::new(request.employees.clone(), request.avoidance_groups.clone())?;

    validate_pins(&roster, &request.pinned)?;

    let override_ = request.first_work_day_override.map(|dom| CalendarOverride {
        first_work_day: chrono::NaiveDate::from_ymd_opt(request.year, request.month, dom)
            .unwrap_or(settings.anchor.anchor_date),
    });

    let work_days = Calendar::work_days(
        request.year,
        request.month,
        request.group,
        settings.anchor.anchor_date,
        settings.anchor.anchor_group,
        override_.as_ref(),
    )?;
    tracing::debug!(work_day_count = work_days.len(), "calendar resolved");

    let previous_month: Vec<PreviousMonthDay> = request
        .previous_month_schedule
        .iter()
        .map(to_previous_month_day)
        .collect();
    let anchor_employee_id = roster.anchor_employee().id.clone();
    let history = HistoryProjector::project(&previous_month, &anchor_employee_id);
    if !history.has_previous_data() {
        tracing::debug!("no previous-month history, defaulting anchor phase to 0");
    }

    let seed = request.seed.or(settings.default_seed()).unwrap_or_else(|| rand::thread_rng().gen());

    let builder = ConstraintModelBuilder {
        roster: &roster,
        work_days,
        history: &history,
        pins: &request.pinned,
        weights: settings.penalty_weights(),
        max_time_in_seconds: settings.max_time_in_seconds(),
        seed,
    };

    tracing::info!(seed, "starting solve");
    let started = std::time::Instant::now();
    let solved = builder.build()?;
    tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "solve finished");

    Ok(extract(&roster, &history, &solved))
}

fn to_previous_month_day(record: &PreviousMonthRecord) -> PreviousMonthDay {
    PreviousMonthDay {
        date: record.date,
        records: record.records.clone(),
    }
}

/// `PIN_INVALID`: a pin assigns the anchor employee to a non-{DAY,SLEEP}
/// shift, or two pins contradict each other for the same (employee, date).
fn validate_pins(roster: &RosterModel, pins: &[Pin]) -> Result<(), SchedulerError> {
    use std::collections::HashMap;

    let mut seen: HashMap<(usize, chrono::NaiveDate), ShiftKind> = HashMap::new();
    for pin in pins {
        let Some(pos) = roster.position_of(&pin.employee_id) else {
            continue;
        };
        if roster.is_anchor(pos) && !matches!(pin.shift, ShiftKind::Day | ShiftKind::Sleep) {
            return Err(SchedulerError::new(
                ErrorKind::PinInvalid,
                format!(
                    "anchor employee {} pinned to {:?}, only DAY/SLEEP allowed",
                    pin.employee_id, pin.shift
                ),
            ));
        }
        if let Some(existing) = seen.insert((pos, pin.date), pin.shift) {
            if existing != pin.shift {
                return Err(SchedulerError::new(
                    ErrorKind::PinInvalid,
                    format!(
                        "conflicting pins for {} on {}: {:?} vs {:?}",
                        pin.employee_id, pin.date, existing, pin.shift
                    ),
                ));
            }
        }
    }
    Ok(())
}
