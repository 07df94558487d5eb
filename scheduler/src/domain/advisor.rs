use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::roster::RosterModel;
use crate::domain::shift::{ShiftKind, NIGHT_KINDS, WORKING_KINDS};
use crate::request::{Change, DayRecord, Pin, Suggestion, Violation, ViolationKind};

/// Proposes a single head-count-preserving edit for one Live validator
/// conflict. Never touches a pinned cell or a date before today. Returns
/// `None` when no proposal satisfies every guard — callers must tolerate
/// that (spec §4.6).
pub struct RepairAdvisor<'a> {
    roster: &'a RosterModel,
    pinned: HashSet<(String, NaiveDate)>,
    today: NaiveDate,
}

impl<'a> RepairAdvisor<'a> {
    pub fn new(roster: &'a RosterModel, pinned: &[Pin], today: NaiveDate) -> Self {
        let pinned = pinned.iter().map(|p| (p.employee_id.clone(), p.date)).collect();
        Self { roster, pinned, today }
    }

    pub fn advise(&self, violation: &Violation, schedule: &[DayRecord]) -> Option<Suggestion> {
        match violation.kind {
            ViolationKind::SlotCountMismatch => self.advise_slot_count(violation, schedule),
            ViolationKind::ConsecutiveViolation => self.advise_consecutive(violation, schedule),
            ViolationKind::ChiefMissing => self.advise_chief_missing(violation, schedule),
            ViolationKind::ChiefDuplicate => self.advise_chief_duplicate(violation, schedule),
            ViolationKind::RoleMismatch | ViolationKind::AvoidanceConflict => None,
        }
    }

    fn is_eligible(&self, employee_id: &str, date: NaiveDate) -> bool {
        date >= self.today && !self.pinned.contains(&(employee_id.to_string(), date))
    }

    fn day_record<'s>(&self, schedule: &'s [DayRecord], date: NaiveDate) -> Option<&'s DayRecord> {
        schedule.iter().find(|d| d.date == date)
    }

    /// `SLOT_COUNT_MISMATCH`: pair every excess with an under-staffed shift
    /// on the same day, moving one employee per pair.
    fn advise_slot_count(&self, violation: &Violation, schedule: &[DayRecord]) -> Option<Suggestion> {
        let day = self.day_record(schedule, violation.date)?;
        let mut counts = [0i64; 4];
        for (i, s) in WORKING_KINDS.iter().enumerate() {
            counts[i] = day.records.iter().filter(|(_, shift)| shift == s).count() as i64
                - s.slot_count().unwrap() as i64;
        }
        let excess_idx = counts.iter().position(|&c| c > 0)?;
        let short_idx = counts.iter().position(|&c| c < 0)?;
        let excess_shift = WORKING_KINDS[excess_idx];
        let short_shift = WORKING_KINDS[short_idx];

        let mover = day
            .records
            .iter()
            .find(|(employee_id, shift)| *shift == excess_shift && self.is_eligible(employee_id, day.date))?;

        Some(Suggestion {
            description: format!(
                "move {} from over-staffed {excess_shift:?} to under-staffed {short_shift:?} on {}",
                mover.0, day.date
            ),
            changes: vec![Change {
                date: day.date,
                employee_id: mover.0.clone(),
                from_shift: excess_shift,
                to_shift: short_shift,
            }],
        })
    }

    /// `CONSECUTIVE_VIOLATION` for MINI_NIGHT/LATE_NIGHT: swap the D+1
    /// offender with someone on a different working kind who won't create a
    /// new run.
    fn advise_consecutive(&self, violation: &Violation, schedule: &[DayRecord]) -> Option<Suggestion> {
        let s = violation.shift?;
        if !matches!(s, ShiftKind::MiniNight | ShiftKind::LateNight) {
            return None;
        }
        // `schedule` holds only this group's work days, spaced three
        // calendar days apart (spec §4.1) — "D+1" means the next entry in
        // the work-day sequence, not `violation.date + 1 day`.
        let violation_idx = schedule.iter().position(|d| d.date == violation.date)?;
        let next_day = schedule.get(violation_idx + 1)?;
        let day_next = next_day.date;
        let day_after_record = schedule.get(violation_idx + 2);

        let offender_id = violation.employee_ids.first()?.clone();

        if !self.is_eligible(&offender_id, day_next) {
            return None;
        }

        let candidate = next_day.records.iter().find(|(employee_id, shift)| {
            *employee_id != offender_id
                && *shift != s
                && shift.is_working()
                && self.is_eligible(employee_id, day_next)
                && !would_create_run(day_after_record, employee_id, s)
        })?;

        Some(Suggestion {
            description: format!(
                "swap {} and {} on {} to break the consecutive {s:?} run",
                offender_id, candidate.0, day_next
            ),
            changes: vec![
                Change {
                    date: day_next,
                    employee_id: offender_id.clone(),
                    from_shift: s,
                    to_shift: candidate.1,
                },
                Change {
                    date: day_next,
                    employee_id: candidate.0.clone(),
                    from_shift: candidate.1,
                    to_shift: s,
                },
            ],
        })
    }

    /// `CHIEF_MISSING`: find another working shift on D that currently
    /// holds a chief (a spare one, if itself a night shift) and a non-chief
    /// on the conflicted shift; swap them.
    fn advise_chief_missing(&self, violation: &Violation, schedule: &[DayRecord]) -> Option<Suggestion> {
        let s = violation.shift?;
        let day = self.day_record(schedule, violation.date)?;

        let non_chief = day.records.iter().find(|(employee_id, shift)| {
            *shift == s
                && self.is_eligible(employee_id, day.date)
                && !self.roster.position_of(employee_id).is_some_and(|p| self.roster.is_chief(p))
        })?;

        for candidate_shift in WORKING_KINDS {
            if candidate_shift == s {
                continue;
            }
            let chiefs_on_candidate: Vec<&(String, ShiftKind)> = day
                .records
                .iter()
                .filter(|(employee_id, shift)| {
                    *shift == candidate_shift
                        && self.roster.position_of(employee_id).is_some_and(|p| self.roster.is_chief(p))
                })
                .collect();

            let is_night = NIGHT_KINDS.contains(&candidate_shift);
            let spare_available = if is_night {
                chiefs_on_candidate.len() > 1
            } else {
                !chiefs_on_candidate.is_empty()
            };
            if !spare_available {
                continue;
            }

            let chief = chiefs_on_candidate
                .into_iter()
                .find(|(employee_id, _)| self.is_eligible(employee_id, day.date))?;

            return Some(Suggestion {
                description: format!(
                    "swap chief {} ({candidate_shift:?}) with {} ({s:?}) on {} to cover the missing chief seat",
                    chief.0, non_chief.0, day.date
                ),
                changes: vec![
                    Change {
                        date: day.date,
                        employee_id: chief.0.clone(),
                        from_shift: candidate_shift,
                        to_shift: s,
                    },
                    Change {
                        date: day.date,
                        employee_id: non_chief.0.clone(),
                        from_shift: s,
                        to_shift: candidate_shift,
                    },
                ],
            });
        }
        None
    }

    /// `CHIEF_DUPLICATE`: for each extra chief beyond the first, find a
    /// night shift missing a chief (preferred) or DAY (fallback) and a
    /// non-chief there; pair-swap.
    fn advise_chief_duplicate(&self, violation: &Violation, schedule: &[DayRecord]) -> Option<Suggestion> {
        let s = violation.shift?;
        let day = self.day_record(schedule, violation.date)?;
        let extra_chief_id = violation.employee_ids.get(1)?.clone();
        if !self.is_eligible(&extra_chief_id, day.date) {
            return None;
        }

        let mut candidate_shifts: Vec<ShiftKind> = NIGHT_KINDS
            .into_iter()
            .filter(|candidate| {
                *candidate != s
                    && !day.records.iter().any(|(employee_id, shift)| {
                        *shift == *candidate
                            && self.roster.position_of(employee_id).is_some_and(|p| self.roster.is_chief(p))
                    })
            })
            .collect();
        candidate_shifts.push(ShiftKind::Day);

        for candidate_shift in candidate_shifts {
            let non_chief = day.records.iter().find(|(employee_id, shift)| {
                *shift == candidate_shift
                    && self.is_eligible(employee_id, day.date)
                    && !self.roster.position_of(employee_id).is_some_and(|p| self.roster.is_chief(p))
            });
            let Some(non_chief) = non_chief else { continue };

            return Some(Suggestion {
                description: format!(
                    "swap extra chief {} ({s:?}) with {} ({candidate_shift:?}) on {}",
                    extra_chief_id, non_chief.0, day.date
                ),
                changes: vec![
                    Change {
                        date: day.date,
                        employee_id: extra_chief_id.clone(),
                        from_shift: s,
                        to_shift: candidate_shift,
                    },
                    Change {
                        date: day.date,
                        employee_id: non_chief.0.clone(),
                        from_shift: candidate_shift,
                        to_shift: s,
                    },
                ],
            });
        }
        None
    }
}

fn would_create_run(day_after: Option<&DayRecord>, employee_id: &str, s: ShiftKind) -> bool {
    let Some(day_after) = day_after else { return false };
    day_after
        .records
        .iter()
        .any(|(id, shift)| id == employee_id && *shift == s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roster::Employee;

    fn roster() -> RosterModel {
        let employees = (0..17)
            .map(|i| Employee {
                id: format!("e{i}"),
                name: format!("Employee {i}"),
            })
            .collect();
        RosterModel::new(employees, vec![]).unwrap()
    }

    fn day_with(date: NaiveDate, assignments: &[(&str, ShiftKind)]) -> DayRecord {
        DayRecord {
            date,
            day_of_week: date.weekday().to_string(),
            records: assignments.iter().map(|(id, s)| (id.to_string(), *s)).collect(),
        }
    }

    use chrono::Datelike;

    #[test]
    fn proposes_move_for_slot_count_mismatch() {
        let roster = roster();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        // e0 (chief) doubled up on DAY, SLEEP short by one.
        let mut assignments: Vec<(&str, ShiftKind)> = vec![
            ("e0", ShiftKind::Day),
            ("e1", ShiftKind::Day),
            ("e2", ShiftKind::Day),
            ("e3", ShiftKind::Day),
            ("e4", ShiftKind::Day),
            ("e5", ShiftKind::Day),
            ("e6", ShiftKind::Day),
            ("e7", ShiftKind::Sleep),
            ("e8", ShiftKind::Sleep),
            ("e9", ShiftKind::Sleep),
            ("e10", ShiftKind::Sleep),
            ("e11", ShiftKind::MiniNight),
            ("e12", ShiftKind::MiniNight),
            ("e13", ShiftKind::MiniNight),
            ("e14", ShiftKind::LateNight),
            ("e15", ShiftKind::LateNight),
            ("e16", ShiftKind::LateNight),
        ];
        assignments.sort_by(|a, b| a.0.cmp(b.0));
        let day = day_with(date, &assignments);

        let advisor = RepairAdvisor::new(&roster, &[], date);
        let violation = Violation {
            kind: ViolationKind::SlotCountMismatch,
            date,
            shift: Some(ShiftKind::Day),
            employee_ids: Vec::new(),
            message: "too many on DAY".to_string(),
        };
        let suggestion = advisor.advise(&violation, std::slice::from_ref(&day));
        let suggestion = suggestion.expect("expected a move suggestion");
        assert_eq!(suggestion.changes.len(), 1);
        assert_eq!(suggestion.changes[0].from_shift, ShiftKind::Day);
        assert_eq!(suggestion.changes[0].to_shift, ShiftKind::Sleep);
    }

    #[test]
    fn proposes_swap_for_consecutive_night_run_across_work_days() {
        let roster = roster();
        // Work days for a single group are three calendar days apart
        // (spec §4.1); the sequence here mirrors that spacing instead of
        // consecutive calendar dates.
        let day0 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let day1 = NaiveDate::from_ymd_opt(2026, 1, 4).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();

        let first = day_with(day0, &[("e11", ShiftKind::MiniNight)]);
        let second = day_with(day1, &[("e11", ShiftKind::MiniNight), ("e5", ShiftKind::Day)]);
        let third = day_with(day2, &[("e11", ShiftKind::Day), ("e5", ShiftKind::Sleep)]);

        let advisor = RepairAdvisor::new(&roster, &[], day0);
        let violation = Violation {
            kind: ViolationKind::ConsecutiveViolation,
            date: day0,
            shift: Some(ShiftKind::MiniNight),
            employee_ids: vec!["e11".to_string()],
            message: "e11 has consecutive MINI_NIGHT".to_string(),
        };

        let suggestion = advisor
            .advise(&violation, &[first, second, third])
            .expect("expected a swap suggestion on the next work day");
        assert_eq!(suggestion.changes.len(), 2);
        for change in &suggestion.changes {
            assert_eq!(change.date, day1, "swap must land on the next work day, not the next calendar day");
        }
        let e11_change = suggestion.changes.iter().find(|c| c.employee_id == "e11").unwrap();
        assert_eq!(e11_change.from_shift, ShiftKind::MiniNight);
        assert_eq!(e11_change.to_shift, ShiftKind::Day);
    }

    #[test]
    fn never_touches_a_pinned_cell() {
        let roster = roster();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let pinned = vec![Pin {
            employee_id: "e6".to_string(),
            date,
            shift: ShiftKind::Day,
        }];
        let advisor = RepairAdvisor::new(&roster, &pinned, date);
        assert!(!advisor.is_eligible("e6", date));
    }
}
