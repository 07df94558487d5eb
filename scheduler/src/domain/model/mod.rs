mod penalties;

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use good_lp::{constraint, variable, ProblemVariables, Solution, SolverModel, Variable};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::PenaltyWeights;
use crate::domain::history::HistoryProjector;
use crate::domain::roster::RosterModel;
use crate::domain::shift::{ShiftKind, NIGHT_KINDS, WORKING_KINDS};
use crate::error::{ErrorKind, SchedulerError};
use crate::request::Pin;

/// Dense lookup from (employee position, work-day index, shift kind) to the
/// `good_lp` decision variable, built once and consulted by both the hard
/// constraints and the soft penalties (spec §9: "back this with a flat
/// vector plus an `index(e,d,s)` helper").
#[derive(Default)]
pub struct VarIndex {
    x: HashMap<(usize, usize, ShiftKind), Variable>,
    c: HashMap<(usize, usize, ShiftKind), Variable>,
}

impl VarIndex {
    pub fn x(&self, e: usize, d: usize, s: ShiftKind) -> Option<Variable> {
        self.x.get(&(e, d, s)).copied()
    }

    pub fn c(&self, e: usize, d: usize, s: ShiftKind) -> Option<Variable> {
        self.c.get(&(e, d, s)).copied()
    }
}

pub enum SolveStatus {
    Optimal,
    Feasible,
}

pub struct SolvedModel {
    pub work_days: Vec<NaiveDate>,
    /// `assignment[day_idx][employee_pos]` is the shift that employee holds
    /// on that work day.
    pub assignment: Vec<Vec<ShiftKind>>,
    /// `chiefs[day_idx][night_shift]` is the employee position occupying
    /// that night shift's chief seat.
    pub chiefs: Vec<HashMap<ShiftKind, usize>>,
    pub seed: u64,
    pub status: SolveStatus,
}

pub struct ConstraintModelBuilder<'a> {
    pub roster: &'a RosterModel,
    pub work_days: Vec<NaiveDate>,
    pub history: &'a HistoryProjector,
    pub pins: &'a [Pin],
    pub weights: PenaltyWeights,
    pub max_time_in_seconds: u64,
    pub seed: u64,
}

impl<'a> ConstraintModelBuilder<'a> {
    /// Resolves pins against roster positions and work-day indices ahead of
    /// building the model, since both the anchor-cycle skip (constraint 5)
    /// and the pin constraint (constraint 7) need the same lookup.
    fn pinned_by_cell(&self) -> HashMap<(usize, usize), ShiftKind> {
        let day_index: HashMap<NaiveDate, usize> = self
            .work_days
            .iter()
            .enumerate()
            .map(|(i, d)| (*d, i))
            .collect();
        let mut out = HashMap::new();
        for pin in self.pins {
            let Some(pos) = self.roster.position_of(&pin.employee_id) else {
                continue;
            };
            let Some(&day_idx) = day_index.get(&pin.date) else {
                continue;
            };
            out.insert((pos, day_idx), pin.shift);
        }
        out
    }

    /// Builds and solves the model. Returns an empty schedule without
    /// touching the solver when there are no work days (spec §4.4 edge
    /// case).
    pub fn build(self) -> Result<SolvedModel, SchedulerError> {
        if self.work_days.is_empty() {
            return Ok(SolvedModel {
                work_days: self.work_days,
                assignment: Vec::new(),
                chiefs: Vec::new(),
                seed: self.seed,
                status: SolveStatus::Optimal,
            });
        }

        let n_employees = self.roster.len();
        let n_days = self.work_days.len();
        let pinned = self.pinned_by_cell();
        let anchor_pos = 0usize;

        let mut vars = ProblemVariables::new();
        let mut index = VarIndex::default();

        for e in 0..n_employees {
            let is_anchor = self.roster.is_anchor(e);
            for d in 0..n_days {
                for s in WORKING_KINDS {
                    if is_anchor && !matches!(s, ShiftKind::Day | ShiftKind::Sleep) {
                        // Anchor shift restriction (hard constraint 6):
                        // never create the variable at all.
                        continue;
                    }
                    index.x.insert((e, d, s), vars.add(variable().binary()));
                }
            }
        }

        for e in 0..n_employees {
            if !self.roster.is_chief(e) {
                continue;
            }
            for d in 0..n_days {
                for s in NIGHT_KINDS {
                    index.c.insert((e, d, s), vars.add(variable().binary()));
                }
            }
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let objective = penalties::build_objective(
            &mut vars,
            &mut rng,
            &index,
            self.roster,
            self.history,
            &self.work_days,
            self.weights,
        );

        let mut problem = vars.minimise(objective.expression).using(good_lp::highs);

        for penalty_constraint in objective.constraints {
            problem = problem.with(penalty_constraint);
        }

        // Hard constraint 1: one shift per day.
        for e in 0..n_employees {
            for d in 0..n_days {
                let mut sum_expr: good_lp::Expression = 0.into();
                for s in WORKING_KINDS {
                    if let Some(v) = index.x(e, d, s) {
                        sum_expr += v;
                    }
                }
                problem = problem.with(constraint!(sum_expr == 1));
            }
        }

        // Hard constraint 2: exact head-count per (day, shift).
        for d in 0..n_days {
            for s in WORKING_KINDS {
                let slots = s.slot_count().expect("working kind always has a slot count") as f64;
                let mut sum_expr: good_lp::Expression = 0.into();
                for e in 0..n_employees {
                    if let Some(v) = index.x(e, d, s) {
                        sum_expr += v;
                    }
                }
                problem = problem.with(constraint!(sum_expr == slots));
            }
        }

        // Hard constraint 3 + 4: chief coverage and chief-only-where-assigned.
        for d in 0..n_days {
            for s in NIGHT_KINDS {
                let mut coverage: good_lp::Expression = 0.into();
                for e in 0..n_employees {
                    if let Some(c) = index.c(e, d, s) {
                        coverage += c;
                    }
                }
                problem = problem.with(constraint!(coverage == 1));

                for e in 0..n_employees {
                    if let (Some(c), Some(x)) = (index.c(e, d, s), index.x(e, d, s)) {
                        problem = problem.with(constraint!(c <= x));
                    }
                }
            }
        }

        // Hard constraint 5: anchor cycle, skipped on pinned anchor days.
        for d in 0..n_days {
            if pinned.contains_key(&(anchor_pos, d)) {
                continue;
            }
            let required = self.history.anchor_required_shift(d);
            if let Some(v) = index.x(anchor_pos, d, required) {
                problem = problem.with(constraint!(v == 1));
            }
        }

        // Hard constraint 7: pins.
        for (&(e, d), &shift) in &pinned {
            if let Some(v) = index.x(e, d, shift) {
                problem = problem.with(constraint!(v == 1));
            }
        }

        // Hard constraint 8: avoidance groups.
        for group in self.roster.avoidance_groups() {
            let positions: Vec<usize> = group
                .members
                .iter()
                .filter_map(|id| self.roster.position_of(id))
                .collect();
            for d in 0..n_days {
                for s in WORKING_KINDS {
                    let mut sum_expr: good_lp::Expression = 0.into();
                    let mut any = false;
                    for &e in &positions {
                        if let Some(v) = index.x(e, d, s) {
                            sum_expr += v;
                            any = true;
                        }
                    }
                    if any {
                        problem = problem.with(constraint!(sum_expr <= 1));
                    }
                }
            }
        }

        if n_days >= 2 {
            // Hard constraint 9: LATE_NIGHT minimum spacing of 3.
            for e in 0..n_employees {
                for i in 0..n_days {
                    for j in (i + 1)..n_days {
                        if j - i - 1 >= 3 {
                            continue;
                        }
                        if let (Some(vi), Some(vj)) = (
                            index.x(e, i, ShiftKind::LateNight),
                            index.x(e, j, ShiftKind::LateNight),
                        ) {
                            problem = problem.with(constraint!(vi + vj <= 1));
                        }
                    }
                }
            }

            // Hard constraint 10: DAY minimum spacing of 1 for non-anchor employees.
            for e in 0..n_employees {
                if self.roster.is_anchor(e) {
                    continue;
                }
                for d in 0..(n_days - 1) {
                    if let (Some(vi), Some(vj)) =
                        (index.x(e, d, ShiftKind::Day), index.x(e, d + 1, ShiftKind::Day))
                    {
                        problem = problem.with(constraint!(vi + vj <= 1));
                    }
                }
            }

            // Hard constraint 11: no two consecutive night shifts of the same kind.
            for e in 0..n_employees {
                for d in 0..(n_days - 1) {
                    for s in [ShiftKind::MiniNight, ShiftKind::LateNight] {
                        if let (Some(vi), Some(vj)) = (index.x(e, d, s), index.x(e, d + 1, s)) {
                            problem = problem.with(constraint!(vi + vj <= 1));
                        }
                    }
                }
            }
        }

        problem.set_time_limit(self.max_time_in_seconds as f64);

        let solution = match problem.solve() {
            Ok(solution) => solution,
            Err(err) => {
                let mut scheduler_err: SchedulerError = err.into();
                if scheduler_err.kind == ErrorKind::Infeasible {
                    scheduler_err.detail =
                        diagnose_infeasibility(self.roster, self.history, &pinned, &self.work_days);
                }
                return Err(scheduler_err);
            }
        };

        let mut assignment = vec![vec![ShiftKind::None; n_employees]; n_days];
        for e in 0..n_employees {
            for d in 0..n_days {
                for s in WORKING_KINDS {
                    if let Some(v) = index.x(e, d, s) {
                        if solution.value(v) > 0.5 {
                            assignment[d][e] = s;
                        }
                    }
                }
            }
        }

        let mut chiefs = vec![HashMap::new(); n_days];
        for d in 0..n_days {
            for s in NIGHT_KINDS {
                for e in 0..n_employees {
                    if let Some(c) = index.c(e, d, s) {
                        if solution.value(c) > 0.5 {
                            chiefs[d].insert(s, e);
                        }
                    }
                }
            }
        }

        Ok(SolvedModel {
            work_days: self.work_days,
            assignment,
            chiefs,
            seed: self.seed,
            status: SolveStatus::Optimal,
        })
    }
}

/// A lightweight heuristic scan over pinned cells, run only when the solve
/// itself reports `INFEASIBLE` (so it costs nothing on the feasible path).
/// Names the first of {pins, avoidance, anchor cycle} — spec §4.4/§7's own
/// ordering of "most common culprits" — that it can statically show is in
/// tension with the others; falls back to the generic message when no
/// single rule stands out.
fn diagnose_infeasibility(
    roster: &RosterModel,
    history: &HistoryProjector,
    pinned: &HashMap<(usize, usize), ShiftKind>,
    work_days: &[NaiveDate],
) -> String {
    // 1. Pins alone overfilling a (day, shift) seat count.
    let mut by_day_shift: HashMap<(usize, ShiftKind), usize> = HashMap::new();
    for (&(_, d), &shift) in pinned {
        *by_day_shift.entry((d, shift)).or_insert(0) += 1;
    }
    for (&(d, shift), &count) in &by_day_shift {
        if let Some(slots) = shift.slot_count() {
            if count > slots {
                return format!(
                    "pins: {count} employees pinned to {shift:?} on {}, exceeding its {slots}-seat head-count",
                    work_days[d]
                );
            }
        }
    }

    // 2. Two pinned members of the same avoidance group sharing a shift.
    for group in roster.avoidance_groups() {
        let positions: HashSet<usize> =
            group.members.iter().filter_map(|id| roster.position_of(id)).collect();
        let mut seen: HashMap<(usize, ShiftKind), usize> = HashMap::new();
        for (&(e, d), &shift) in pinned {
            if positions.contains(&e) {
                *seen.entry((d, shift)).or_insert(0) += 1;
            }
        }
        if let Some((&(d, shift), _)) = seen.iter().find(|(_, &count)| count > 1) {
            return format!(
                "avoidance: two members of group {} are pinned to {shift:?} on {}",
                group.id, work_days[d]
            );
        }
    }

    // 3. Pins filling the anchor's required shift to capacity on a day the
    // anchor itself is not pinned, leaving no seat for the forced cycle.
    let anchor_pos = 0usize;
    for d in 0..work_days.len() {
        if pinned.contains_key(&(anchor_pos, d)) {
            continue;
        }
        let required = history.anchor_required_shift(d);
        if let Some(slots) = required.slot_count() {
            let pinned_others = pinned
                .iter()
                .filter(|(&(e, day), &shift)| day == d && e != anchor_pos && shift == required)
                .count();
            if pinned_others + 1 > slots {
                return format!(
                    "anchor cycle: the anchor employee needs {required:?} on {}, but pins already fill that shift to capacity",
                    work_days[d]
                );
            }
        }
    }

    "solver proved no assignment satisfies the hard constraints".to_string()
}
