use std::collections::HashMap;

use chrono::Datelike;

use crate::domain::history::HistoryProjector;
use crate::domain::model::SolvedModel;
use crate::domain::roster::RosterModel;
use crate::domain::shift::{ShiftKind, WORKING_KINDS};
use crate::request::{DayRecord, ShiftDistribution, ShiftStat, SolveResponse, Statistics};

/// Materializes day records in work-day order and employees in display
/// order, and computes per-shift statistics over both the single month and
/// the rolling two-month window (spec §4.5).
pub fn extract(roster: &RosterModel, history: &HistoryProjector, solved: &SolvedModel) -> SolveResponse {
    let schedules: Vec<DayRecord> = solved
        .work_days
        .iter()
        .enumerate()
        .map(|(d, date)| DayRecord {
            date: *date,
            day_of_week: date.weekday().to_string(),
            records: (0..roster.len())
                .map(|e| (roster.employees()[e].id.clone(), solved.assignment[d][e]))
                .collect(),
        })
        .collect();

    let this_month_counts = tally(roster, solved);
    let shift_distributions = to_distributions(roster, &this_month_counts);

    let two_month_counts: HashMap<String, HashMap<ShiftKind, u32>> = roster
        .employees()
        .iter()
        .map(|employee| {
            let mut counts = this_month_counts
                .get(&employee.id)
                .cloned()
                .unwrap_or_default();
            for s in WORKING_KINDS {
                let prev = history.previous_count(&employee.id, s);
                *counts.entry(s).or_insert(0) += prev;
            }
            (employee.id.clone(), counts)
        })
        .collect();
    let two_month_distributions = to_distributions(roster, &two_month_counts);

    let shift_stats = to_shift_stats(&shift_distributions);
    let two_month_shift_stats = to_shift_stats(&two_month_distributions);
    let fairness_score = two_month_shift_stats.iter().map(|stat| stat.spread).sum();

    SolveResponse {
        work_days: solved.work_days.clone(),
        schedules,
        statistics: Statistics {
            shift_distributions,
            two_month_distributions,
            shift_stats,
            two_month_shift_stats,
            fairness_score,
            has_previous_data: history.has_previous_data(),
            seed: solved.seed,
        },
    }
}

fn tally(roster: &RosterModel, solved: &SolvedModel) -> HashMap<String, HashMap<ShiftKind, u32>> {
    let mut counts: HashMap<String, HashMap<ShiftKind, u32>> = HashMap::new();
    for day in &solved.assignment {
        for (e, shift) in day.iter().enumerate() {
            if !shift.is_working() {
                continue;
            }
            let employee_id = &roster.employees()[e].id;
            *counts.entry(employee_id.clone()).or_default().entry(*shift).or_insert(0) += 1;
        }
    }
    counts
}

fn to_distributions(
    roster: &RosterModel,
    counts: &HashMap<String, HashMap<ShiftKind, u32>>,
) -> Vec<ShiftDistribution> {
    roster
        .employees()
        .iter()
        .map(|employee| ShiftDistribution {
            employee_id: employee.id.clone(),
            counts: counts.get(&employee.id).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Per-working-shift-kind min/max/avg/std/spread across employees (spec §3,
/// §4.5). `spread` is `max - min`; the fairness score sums this across
/// working shift kinds (spec §9 glossary "fairness score").
fn to_shift_stats(distributions: &[ShiftDistribution]) -> Vec<ShiftStat> {
    WORKING_KINDS
        .iter()
        .map(|&s| {
            let values: Vec<u32> = distributions.iter().map(|d| *d.counts.get(&s).unwrap_or(&0)).collect();
            let min = values.iter().copied().min().unwrap_or(0);
            let max = values.iter().copied().max().unwrap_or(0);
            let n = values.len().max(1) as f64;
            let avg = values.iter().map(|&v| v as f64).sum::<f64>() / n;
            let variance = values.iter().map(|&v| (v as f64 - avg).powi(2)).sum::<f64>() / n;
            ShiftStat {
                shift: s,
                min,
                max,
                avg,
                std: variance.sqrt(),
                spread: max - min,
            }
        })
        .collect()
}
