use chrono::NaiveDate;
use scheduler::config::{AnchorSettings, Settings, SolverSettings};
use scheduler::domain::calendar::Group;
use scheduler::domain::roster::Employee;
use scheduler::request::{Pin, PreviousMonthRecord, SolveRequest};

/// A roster of `count` employees named `e0..e{count-1}`, positions 0-5
/// chief-qualified and position 0 anchor, mirroring the teacher's
/// `create_sample_staff_list`.
pub fn sample_roster(count: usize) -> Vec<Employee> {
    (0..count)
        .map(|i| Employee {
            id: format!("e{i}"),
            name: format!("Employee {i}"),
        })
        .collect()
}

pub fn sample_settings(anchor_date: NaiveDate, anchor_group: Group) -> Settings {
    Settings {
        anchor: AnchorSettings { anchor_date, anchor_group },
        solver: SolverSettings {
            max_time_in_seconds: 30,
            ..SolverSettings::default()
        },
    }
}

#[allow(clippy::too_many_arguments)]
pub fn sample_request(
    year: i32,
    month: u32,
    group: Group,
    employee_count: usize,
    pinned: Vec<Pin>,
    previous_month_schedule: Vec<PreviousMonthRecord>,
    seed: Option<u64>,
) -> SolveRequest {
    SolveRequest {
        year,
        month,
        group,
        employees: sample_roster(employee_count),
        avoidance_groups: Vec::new(),
        pinned,
        previous_month_schedule,
        first_work_day_override: None,
        seed,
    }
}
