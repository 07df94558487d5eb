use chrono::NaiveDate;
use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::PenaltyWeights;
use crate::domain::history::HistoryProjector;
use crate::domain::roster::RosterModel;
use crate::domain::shift::{ShiftKind, WORKING_KINDS};

use super::VarIndex;

const CHIEF_LATE_NIGHT_MAX_GAP: usize = 5;
const NON_CHIEF_LATE_NIGHT_MAX_GAP: usize = 6;
const DAY_MAX_GAP: usize = 3;

/// Everything the soft objective needs that the solver hasn't been handed
/// yet: the objective expression itself, plus the auxiliary constraints
/// that bind each linearized penalty indicator to the `x` variables it
/// tracks. Callers add `constraints` to the problem right after
/// `.using(..)`, since the indicators are created here but the problem
/// object doesn't exist until the objective is finalized.
pub struct Objective {
    pub expression: Expression,
    pub constraints: Vec<Constraint>,
}

/// Assembles the single linear objective: the five soft-penalty terms of
/// spec §4.4, each realized as a linearized indicator bounded below by the
/// pair of `x` variables it penalizes, minimized so the solver drives each
/// indicator to its true (0 or 1) value.
pub fn build_objective(
    vars: &mut ProblemVariables,
    rng: &mut StdRng,
    index: &VarIndex,
    roster: &RosterModel,
    history: &HistoryProjector,
    work_days: &[NaiveDate],
    weights: PenaltyWeights,
) -> Objective {
    let mut expression: Expression = 0.into();
    let mut constraints = Vec::new();
    let n_days = work_days.len();
    let n_employees = roster.len();

    leader_day_consecutive(
        vars,
        index,
        roster,
        n_days,
        weights.leader_day_consecutive,
        &mut expression,
        &mut constraints,
    );
    late_gap_violation(
        vars,
        index,
        roster,
        n_days,
        weights.late_gap_violation,
        &mut expression,
        &mut constraints,
    );
    day_gap_violation(
        vars,
        index,
        roster,
        n_days,
        weights.day_gap_violation,
        &mut expression,
        &mut constraints,
    );
    two_month_spread(
        vars,
        index,
        roster,
        history,
        n_days,
        weights.two_month_spread,
        &mut expression,
        &mut constraints,
    );
    random_tiebreak(
        rng,
        index,
        n_employees,
        n_days,
        weights.random_tiebreak,
        &mut expression,
    );

    Objective { expression, constraints }
}

/// `leader_day_consecutive` (weight 1000): 1 per adjacent day pair where a
/// chief has DAY on both days.
#[allow(clippy::too_many_arguments)]
fn leader_day_consecutive(
    vars: &mut ProblemVariables,
    index: &VarIndex,
    roster: &RosterModel,
    n_days: usize,
    weight: u32,
    expression: &mut Expression,
    constraints: &mut Vec<Constraint>,
) {
    if weight == 0 || n_days < 2 {
        return;
    }
    for e in 0..roster.len() {
        if !roster.is_chief(e) {
            continue;
        }
        for d in 0..(n_days - 1) {
            if let (Some(vi), Some(vj)) = (
                index.x(e, d, ShiftKind::Day),
                index.x(e, d + 1, ShiftKind::Day),
            ) {
                let indicator = vars.add(variable().min(0.0).max(1.0));
                constraints.push(constraint!(indicator >= vi + vj - 1));
                *expression += (weight as f64) * indicator;
            }
        }
    }
}

/// `late_gap_violation` (weight 500): 1 per LATE_NIGHT pair whose gap
/// exceeds the per-role maximum.
#[allow(clippy::too_many_arguments)]
fn late_gap_violation(
    vars: &mut ProblemVariables,
    index: &VarIndex,
    roster: &RosterModel,
    n_days: usize,
    weight: u32,
    expression: &mut Expression,
    constraints: &mut Vec<Constraint>,
) {
    if weight == 0 || n_days < 2 {
        return;
    }
    for e in 0..roster.len() {
        let max_gap = if roster.is_chief(e) {
            CHIEF_LATE_NIGHT_MAX_GAP
        } else {
            NON_CHIEF_LATE_NIGHT_MAX_GAP
        };
        for i in 0..n_days {
            for j in (i + 1)..n_days {
                if j - i - 1 <= max_gap {
                    continue;
                }
                if let (Some(vi), Some(vj)) = (
                    index.x(e, i, ShiftKind::LateNight),
                    index.x(e, j, ShiftKind::LateNight),
                ) {
                    let indicator = vars.add(variable().min(0.0).max(1.0));
                    constraints.push(constraint!(indicator >= vi + vj - 1));
                    *expression += (weight as f64) * indicator;
                }
            }
        }
    }
}

/// `day_gap_violation` (weight 500): 1 per non-anchor DAY pair whose gap
/// exceeds 3.
#[allow(clippy::too_many_arguments)]
fn day_gap_violation(
    vars: &mut ProblemVariables,
    index: &VarIndex,
    roster: &RosterModel,
    n_days: usize,
    weight: u32,
    expression: &mut Expression,
    constraints: &mut Vec<Constraint>,
) {
    if weight == 0 || n_days < 2 {
        return;
    }
    for e in 0..roster.len() {
        if roster.is_anchor(e) {
            continue;
        }
        for i in 0..n_days {
            for j in (i + 1)..n_days {
                if j - i - 1 <= DAY_MAX_GAP {
                    continue;
                }
                if let (Some(vi), Some(vj)) =
                    (index.x(e, i, ShiftKind::Day), index.x(e, j, ShiftKind::Day))
                {
                    let indicator = vars.add(variable().min(0.0).max(1.0));
                    constraints.push(constraint!(indicator >= vi + vj - 1));
                    *expression += (weight as f64) * indicator;
                }
            }
        }
    }
}

/// `two_month_spread[s]` (weight 200): max − min across employees of
/// (this month + previous month) counts of shift kind `s`, summed over
/// working shift kinds.
#[allow(clippy::too_many_arguments)]
fn two_month_spread(
    vars: &mut ProblemVariables,
    index: &VarIndex,
    roster: &RosterModel,
    history: &HistoryProjector,
    n_days: usize,
    weight: u32,
    expression: &mut Expression,
    constraints: &mut Vec<Constraint>,
) {
    if weight == 0 {
        return;
    }
    for s in WORKING_KINDS {
        let spread_max = vars.add(variable().min(0.0));
        let spread_min = vars.add(variable().min(0.0));
        for e in 0..roster.len() {
            let employee_id = &roster.employees()[e].id;
            let prev = history.previous_count(employee_id, s) as f64;
            let mut count_expr: Expression = prev.into();
            for d in 0..n_days {
                if let Some(v) = index.x(e, d, s) {
                    count_expr += v;
                }
            }
            constraints.push(constraint!(spread_max >= count_expr.clone()));
            constraints.push(constraint!(spread_min <= count_expr));
        }
        *expression += (weight as f64) * (spread_max - spread_min);
    }
}

/// `random_tiebreak` (weight 1): small per-(e,d,s) jitter to diversify
/// equally-optimal solutions across seeds.
fn random_tiebreak(
    rng: &mut StdRng,
    index: &VarIndex,
    n_employees: usize,
    n_days: usize,
    weight: u32,
    expression: &mut Expression,
) {
    if weight == 0 {
        return;
    }
    for e in 0..n_employees {
        for d in 0..n_days {
            for s in WORKING_KINDS {
                if let Some(v) = index.x(e, d, s) {
                    let jitter: f64 = rng.gen_range(0.0..1.0);
                    *expression += (weight as f64) * jitter * v;
                }
            }
        }
    }
}
