use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::roster::RosterModel;
use crate::domain::shift::{NIGHT_KINDS, WORKING_KINDS};
use crate::request::{DayRecord, Violation, ViolationKind};

/// Validates a proposed full schedule against every invariant in spec §3,
/// plus the supplementary checks §4.7 names (`ROLE_MISMATCH`,
/// `AVOIDANCE_CONFLICT`, `CONSECUTIVE_VIOLATION`). Used both to drive UI
/// badges and to feed the advisor.
pub struct LiveValidator<'a> {
    roster: &'a RosterModel,
}

impl<'a> LiveValidator<'a> {
    pub fn new(roster: &'a RosterModel) -> Self {
        Self { roster }
    }

    pub fn validate(&self, schedule: &[DayRecord]) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_slot_counts(schedule, &mut violations);
        self.check_chief_coverage(schedule, &mut violations);
        self.check_anchor_role(schedule, &mut violations);
        self.check_avoidance(schedule, &mut violations);
        self.check_consecutive(schedule, &mut violations);
        violations
    }

    fn check_slot_counts(&self, schedule: &[DayRecord], out: &mut Vec<Violation>) {
        for day in schedule {
            let mut counts: HashMap<_, usize> = HashMap::new();
            for (_, shift) in &day.records {
                if shift.is_working() {
                    *counts.entry(*shift).or_insert(0) += 1;
                }
            }
            for s in WORKING_KINDS {
                let expected = s.slot_count().unwrap();
                let actual = *counts.get(&s).unwrap_or(&0);
                if actual != expected {
                    out.push(Violation {
                        kind: ViolationKind::SlotCountMismatch,
                        date: day.date,
                        shift: Some(s),
                        employee_ids: Vec::new(),
                        message: format!("{s:?} has {actual} assigned, expected {expected}"),
                    });
                }
            }
        }
    }

    fn check_chief_coverage(&self, schedule: &[DayRecord], out: &mut Vec<Violation>) {
        for day in schedule {
            for s in NIGHT_KINDS {
                let chiefs: Vec<&String> = day
                    .records
                    .iter()
                    .filter(|(employee_id, shift)| {
                        *shift == s
                            && self
                                .roster
                                .position_of(employee_id)
                                .is_some_and(|p| self.roster.is_chief(p))
                    })
                    .map(|(employee_id, _)| employee_id)
                    .collect();
                if chiefs.is_empty() {
                    out.push(Violation {
                        kind: ViolationKind::ChiefMissing,
                        date: day.date,
                        shift: Some(s),
                        employee_ids: Vec::new(),
                        message: format!("{s:?} has no chief on {}", day.date),
                    });
                } else if chiefs.len() > 1 {
                    out.push(Violation {
                        kind: ViolationKind::ChiefDuplicate,
                        date: day.date,
                        shift: Some(s),
                        employee_ids: chiefs.into_iter().cloned().collect(),
                        message: format!("{s:?} has more than one chief on {}", day.date),
                    });
                }
            }
        }
    }

    fn check_anchor_role(&self, schedule: &[DayRecord], out: &mut Vec<Violation>) {
        let anchor_id = &self.roster.anchor_employee().id;
        for day in schedule {
            if let Some((_, shift)) = day.records.iter().find(|(employee_id, _)| employee_id == anchor_id) {
                if !matches!(
                    shift,
                    crate::domain::shift::ShiftKind::Day | crate::domain::shift::ShiftKind::Sleep
                ) {
                    out.push(Violation {
                        kind: ViolationKind::RoleMismatch,
                        date: day.date,
                        shift: Some(*shift),
                        employee_ids: vec![anchor_id.clone()],
                        message: format!("anchor employee assigned {shift:?} instead of DAY/SLEEP"),
                    });
                }
            }
        }
    }

    fn check_avoidance(&self, schedule: &[DayRecord], out: &mut Vec<Violation>) {
        for day in schedule {
            for s in WORKING_KINDS {
                let on_shift: Vec<&String> = day
                    .records
                    .iter()
                    .filter(|(_, shift)| *shift == s)
                    .map(|(employee_id, _)| employee_id)
                    .collect();
                for group in self.roster.avoidance_groups() {
                    let members_on_shift: Vec<String> = on_shift
                        .iter()
                        .filter(|id| group.members.iter().any(|m| m == **id))
                        .map(|id| (*id).clone())
                        .collect();
                    if members_on_shift.len() > 1 {
                        out.push(Violation {
                            kind: ViolationKind::AvoidanceConflict,
                            date: day.date,
                            shift: Some(s),
                            employee_ids: members_on_shift,
                            message: format!("avoidance group {} shares {s:?} on {}", group.id, day.date),
                        });
                    }
                }
            }
        }
    }

    fn check_consecutive(&self, schedule: &[DayRecord], out: &mut Vec<Violation>) {
        let by_employee = employee_shift_sequences(self.roster, schedule);
        for (employee_id, sequence) in &by_employee {
            for window in sequence.windows(2) {
                let (date_a, shift_a) = window[0];
                let (_, shift_b) = window[1];
                if matches!(
                    shift_a,
                    crate::domain::shift::ShiftKind::MiniNight | crate::domain::shift::ShiftKind::LateNight
                ) && shift_a == shift_b
                {
                    out.push(Violation {
                        kind: ViolationKind::ConsecutiveViolation,
                        date: date_a,
                        shift: Some(shift_a),
                        employee_ids: vec![employee_id.clone()],
                        message: format!("{employee_id} has consecutive {shift_a:?} starting {date_a}"),
                    });
                }
            }

            for window in sequence.windows(4) {
                let night_count = window
                    .iter()
                    .filter(|(_, shift)| NIGHT_KINDS.contains(shift))
                    .count();
                if night_count > 3 {
                    let (date_a, _) = window[0];
                    out.push(Violation {
                        kind: ViolationKind::ConsecutiveViolation,
                        date: date_a,
                        shift: None,
                        employee_ids: vec![employee_id.clone()],
                        message: format!("{employee_id} has more than 3 night shifts in a 4-day window starting {date_a}"),
                    });
                }
            }
        }
    }
}

pub(super) fn employee_shift_sequences(
    roster: &RosterModel,
    schedule: &[DayRecord],
) -> HashMap<String, Vec<(NaiveDate, crate::domain::shift::ShiftKind)>> {
    let mut by_employee: HashMap<String, Vec<(NaiveDate, crate::domain::shift::ShiftKind)>> = roster
        .employees()
        .iter()
        .map(|e| (e.id.clone(), Vec::new()))
        .collect();
    for day in schedule {
        for (employee_id, shift) in &day.records {
            if let Some(sequence) = by_employee.get_mut(employee_id) {
                sequence.push((day.date, *shift));
            }
        }
    }
    by_employee
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roster::Employee;
    use crate::domain::shift::ShiftKind;

    fn roster() -> RosterModel {
        let employees = (0..17)
            .map(|i| Employee {
                id: format!("e{i}"),
                name: format!("Employee {i}"),
            })
            .collect();
        RosterModel::new(employees, vec![]).unwrap()
    }

    /// A fully-staffed day with exactly one chief (e0/e1/e2) seeding each
    /// night shift: DAY {e3,e4,e5,e14,e15,e16}, SLEEP {e0,e6,e7,e8,e9},
    /// MINI_NIGHT {e1,e10,e11}, LATE_NIGHT {e2,e12,e13}.
    fn full_day(date: NaiveDate) -> DayRecord {
        let mut records = vec![
            ("e3".to_string(), ShiftKind::Day),
            ("e4".to_string(), ShiftKind::Day),
            ("e5".to_string(), ShiftKind::Day),
            ("e14".to_string(), ShiftKind::Day),
            ("e15".to_string(), ShiftKind::Day),
            ("e16".to_string(), ShiftKind::Day),
            ("e0".to_string(), ShiftKind::Sleep),
            ("e6".to_string(), ShiftKind::Sleep),
            ("e7".to_string(), ShiftKind::Sleep),
            ("e8".to_string(), ShiftKind::Sleep),
            ("e9".to_string(), ShiftKind::Sleep),
            ("e1".to_string(), ShiftKind::MiniNight),
            ("e10".to_string(), ShiftKind::MiniNight),
            ("e11".to_string(), ShiftKind::MiniNight),
            ("e2".to_string(), ShiftKind::LateNight),
            ("e12".to_string(), ShiftKind::LateNight),
            ("e13".to_string(), ShiftKind::LateNight),
        ];
        records.sort_by(|a, b| a.0.cmp(&b.0));
        DayRecord {
            date,
            day_of_week: date.weekday().to_string(),
            records,
        }
    }

    use chrono::Datelike;

    #[test]
    fn flags_missing_chief() {
        let roster = roster();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let mut day = full_day(date);
        // Replace MINI_NIGHT's sole chief (e1) with a non-chief (e14, who
        // was on DAY), leaving that night shift chiefless.
        for record in day.records.iter_mut() {
            if record.0 == "e1" {
                record.1 = ShiftKind::Day;
            } else if record.0 == "e14" {
                record.1 = ShiftKind::MiniNight;
            }
        }
        let validator = LiveValidator::new(&roster);
        let violations = validator.validate(&[day]);
        assert!(violations.iter().any(|v| v.kind == ViolationKind::ChiefMissing));
    }

    #[test]
    fn flags_slot_count_mismatch() {
        let roster = roster();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let mut day = full_day(date);
        day.records.pop();
        let validator = LiveValidator::new(&roster);
        let violations = validator.validate(&[day]);
        assert!(violations.iter().any(|v| v.kind == ViolationKind::SlotCountMismatch));
    }
}
