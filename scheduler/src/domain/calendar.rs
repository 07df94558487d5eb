use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// The three rotating work groups a month/roster is scheduled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Group {
    A,
    B,
    C,
}

impl Group {
    fn offset(self) -> i64 {
        match self {
            Group::A => 0,
            Group::B => 1,
            Group::C => 2,
        }
    }
}

/// An explicit "first work day of this month" that bypasses the anchor
/// formula for one (month, group) pair.
pub struct CalendarOverride {
    pub first_work_day: NaiveDate,
}

/// Resolves which calendar dates in a target month are work days for a
/// given group, either from the anchor-cycle formula or an operator
/// override (spec §4.1).
pub struct Calendar;

impl Calendar {
    /// `year`/`month` identify the target month. `anchor_date` is the fixed
    /// reference date on which `anchor_group` works.
    pub fn work_days(
        year: i32,
        month: u32,
        group: Group,
        anchor_date: NaiveDate,
        anchor_group: Group,
        override_: Option<&CalendarOverride>,
    ) -> Result<Vec<NaiveDate>, SchedulerError> {
        let month_start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| SchedulerError::calendar_empty(format!("invalid month {year}-{month}")))?;
        let month_end = last_day_of_month(year, month);

        let days = if let Some(override_) = override_ {
            Self::override_days(override_.first_work_day, month_end)
        } else {
            Self::formula_days(month_start, month_end, group, anchor_date, anchor_group)
        };

        if days.is_empty() {
            return Err(SchedulerError::calendar_empty(format!(
                "no work days for group {group:?} in {year}-{month:02}"
            )));
        }
        Ok(days)
    }

    fn formula_days(
        month_start: NaiveDate,
        month_end: NaiveDate,
        group: Group,
        anchor_date: NaiveDate,
        anchor_group: Group,
    ) -> Vec<NaiveDate> {
        // On `anchor_date`, `anchor_group` works: normalize the anchor so
        // that offset 0 always lands on the group that actually works there.
        let anchor_shift = anchor_group.offset();
        let mut days = Vec::new();
        let mut d = month_start;
        while d <= month_end {
            let delta = (d - anchor_date).num_days() + anchor_shift - group.offset();
            if delta.rem_euclid(3) == 0 {
                days.push(d);
            }
            d += Duration::days(1);
        }
        days
    }

    fn override_days(first_work_day: NaiveDate, month_end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut d = first_work_day;
        while d <= month_end {
            days.push(d);
            d += Duration::days(3);
        }
        days
    }
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("valid next month")
        .pred_opt()
        .expect("month has at least one day")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_group_works_on_anchor_date() {
        let anchor = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let days = Calendar::work_days(2026, 1, Group::A, anchor, Group::A, None).unwrap();
        assert!(days.contains(&anchor));
    }

    #[test]
    fn non_a_anchor_group_works_on_its_own_anchor_date() {
        let anchor = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let b = Calendar::work_days(2026, 1, Group::B, anchor, Group::B, None).unwrap();
        assert!(b.contains(&anchor));
        let c = Calendar::work_days(2026, 1, Group::C, anchor, Group::C, None).unwrap();
        assert!(c.contains(&anchor));
    }

    #[test]
    fn groups_partition_the_month() {
        let anchor = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let a = Calendar::work_days(2026, 1, Group::A, anchor, Group::A, None).unwrap();
        let b = Calendar::work_days(2026, 1, Group::B, anchor, Group::A, None).unwrap();
        let c = Calendar::work_days(2026, 1, Group::C, anchor, Group::A, None).unwrap();
        assert_eq!(a.len() + b.len() + c.len(), 31);
        for day in &a {
            assert!(!b.contains(day) && !c.contains(day));
        }
    }

    #[test]
    fn override_steps_by_three_days_to_month_end() {
        let anchor = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let first = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let days = Calendar::work_days(
            2026,
            2,
            Group::A,
            anchor,
            Group::A,
            Some(&CalendarOverride { first_work_day: first }),
        )
        .unwrap();
        assert_eq!(days.first(), Some(&first));
        assert!(days.iter().all(|d| d.month() == 2));
        for pair in days.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_days(), 3);
        }
    }

    #[test]
    fn empty_result_is_calendar_empty() {
        // A month with fewer than 3 days never happens in the Gregorian
        // calendar, so force emptiness via an override that starts after
        // month end.
        let anchor = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let after_month_end = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let err = Calendar::work_days(
            2026,
            2,
            Group::A,
            anchor,
            Group::A,
            Some(&CalendarOverride { first_work_day: after_month_end }),
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::CalendarEmpty);
    }
}
