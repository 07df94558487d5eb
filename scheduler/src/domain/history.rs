use std::collections::HashMap;

use chrono::NaiveDate;

use super::shift::{ShiftKind, WORKING_KINDS};

/// One (date, [(employee_id, shift)]) row of a previous month's solved
/// schedule, as supplied by the caller (spec §6 `previous_month_schedule`).
pub struct PreviousMonthDay {
    pub date: NaiveDate,
    pub records: Vec<(String, ShiftKind)>,
}

/// Projects the prior month's schedule into what the new month's anchor
/// cycle and two-month fairness spread need (spec §4.3).
pub struct HistoryProjector {
    pub anchor_phase_offset: u8,
    pub prev_counts: HashMap<String, HashMap<ShiftKind, u32>>,
}

impl HistoryProjector {
    /// `anchor_employee_id` identifies whose shift sequence drives the
    /// phase-offset rule. Degrades gracefully to "new month starts on DAY"
    /// when there is no usable history, rather than erroring.
    pub fn project(previous_month: &[PreviousMonthDay], anchor_employee_id: &str) -> Self {
        let prev_counts = Self::tally(previous_month);
        let anchor_phase_offset = Self::phase_offset(previous_month, anchor_employee_id);
        Self {
            anchor_phase_offset,
            prev_counts,
        }
    }

    fn phase_offset(previous_month: &[PreviousMonthDay], anchor_employee_id: &str) -> u8 {
        let anchor_shifts: Vec<ShiftKind> = previous_month
            .iter()
            .filter_map(|day| {
                day.records
                    .iter()
                    .find(|(emp, _)| emp == anchor_employee_id)
                    .map(|(_, shift)| *shift)
            })
            .collect();

        let last = anchor_shifts.last().copied();
        let second_last = anchor_shifts.len().checked_sub(2).map(|i| anchor_shifts[i]);

        match (last, second_last) {
            (Some(ShiftKind::Day), _) => 1,
            (Some(ShiftKind::Sleep), Some(ShiftKind::Day)) => 2,
            (Some(ShiftKind::Sleep), Some(ShiftKind::Sleep)) => 0,
            _ => 0,
        }
    }

    fn tally(previous_month: &[PreviousMonthDay]) -> HashMap<String, HashMap<ShiftKind, u32>> {
        let mut counts: HashMap<String, HashMap<ShiftKind, u32>> = HashMap::new();
        for day in previous_month {
            for (employee_id, shift) in &day.records {
                if !WORKING_KINDS.contains(shift) {
                    continue;
                }
                *counts
                    .entry(employee_id.clone())
                    .or_default()
                    .entry(*shift)
                    .or_insert(0) += 1;
            }
        }
        counts
    }

    /// Required anchor-employee shift for work-day index `i` (0-based) of
    /// the new month, per the §4.3 cycle rule.
    pub fn anchor_required_shift(&self, work_day_index: usize) -> ShiftKind {
        if (work_day_index as u64 + self.anchor_phase_offset as u64) % 3 == 0 {
            ShiftKind::Day
        } else {
            ShiftKind::Sleep
        }
    }

    pub fn previous_count(&self, employee_id: &str, shift: ShiftKind) -> u32 {
        self.prev_counts
            .get(employee_id)
            .and_then(|counts| counts.get(&shift))
            .copied()
            .unwrap_or(0)
    }

    pub fn has_previous_data(&self) -> bool {
        !self.prev_counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: NaiveDate, anchor_shift: ShiftKind) -> PreviousMonthDay {
        PreviousMonthDay {
            date,
            records: vec![("anchor".to_string(), anchor_shift)],
        }
    }

    #[test]
    fn no_history_starts_on_day() {
        let projector = HistoryProjector::project(&[], "anchor");
        assert_eq!(projector.anchor_phase_offset, 0);
        assert_eq!(projector.anchor_required_shift(0), ShiftKind::Day);
        assert!(!projector.has_previous_data());
    }

    #[test]
    fn last_shift_day_gives_offset_one() {
        let d1 = NaiveDate::from_ymd_opt(2026, 1, 29).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 1, 30).unwrap();
        let projector = HistoryProjector::project(&[day(d1, ShiftKind::Sleep), day(d2, ShiftKind::Day)], "anchor");
        assert_eq!(projector.anchor_phase_offset, 1);
        assert_eq!(projector.anchor_required_shift(2), ShiftKind::Day);
        assert_eq!(projector.anchor_required_shift(0), ShiftKind::Sleep);
    }

    #[test]
    fn sleep_sleep_resumes_on_day() {
        let d1 = NaiveDate::from_ymd_opt(2026, 1, 29).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 1, 30).unwrap();
        let projector = HistoryProjector::project(&[day(d1, ShiftKind::Sleep), day(d2, ShiftKind::Sleep)], "anchor");
        assert_eq!(projector.anchor_phase_offset, 0);
        assert_eq!(projector.anchor_required_shift(0), ShiftKind::Day);
    }

    #[test]
    fn counts_only_working_kinds() {
        let d1 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let projector = HistoryProjector::project(
            &[PreviousMonthDay {
                date: d1,
                records: vec![
                    ("e1".to_string(), ShiftKind::Day),
                    ("e1".to_string(), ShiftKind::Vacation),
                ],
            }],
            "anchor",
        );
        assert_eq!(projector.previous_count("e1", ShiftKind::Day), 1);
        assert_eq!(projector.previous_count("e1", ShiftKind::Vacation), 0);
    }
}
