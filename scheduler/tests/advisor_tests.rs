mod common;

use chrono::NaiveDate;
use common::sample_roster;
use scheduler::request::{AdvisorRequest, Change, DayRecord, Pin, Violation, ViolationKind};
use scheduler::domain::shift::ShiftKind;

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
        day_of_week: date.format("%A").to_string(),
        records,
    }
}

/// Removing the chief from MINI_NIGHT and proposing a repair must not
/// introduce a SLOT_COUNT_MISMATCH and must swap in another chief (spec §8
/// advisor properties).
#[test]
fn chief_missing_repair_preserves_head_count() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let mut day = full_day(date);
    for record in day.records.iter_mut() {
        if record.0 == "e1" {
            record.1 = ShiftKind::Day;
        } else if record.0 == "e14" {
            record.1 = ShiftKind::MiniNight;
        }
    }

    let violation = Violation {
        kind: ViolationKind::ChiefMissing,
        date,
        shift: Some(ShiftKind::MiniNight),
        employee_ids: Vec::new(),
        message: "MINI_NIGHT has no chief".to_string(),
    };

    let request = AdvisorRequest {
        violation,
        employees: sample_roster(17),
        avoidance_groups: Vec::new(),
        schedule: vec![day],
        pinned: Vec::new(),
    };

    let response = scheduler::advise(&request, date).expect("advisor call should not error");
    let suggestion = response.suggestion.expect("expected a suggestion");

    assert_eq!(suggestion.changes.len(), 2);
    let (from_shifts, to_shifts): (Vec<_>, Vec<_>) = suggestion
        .changes
        .iter()
        .map(|c| (c.from_shift, c.to_shift))
        .unzip();
    for change in &suggestion.changes {
        assert!(to_shifts.contains(&change.from_shift));
        assert!(from_shifts.contains(&change.to_shift));
    }
}

/// No proposal ever touches a pinned cell (spec §4.6, §8 advisor
/// properties).
#[test]
fn never_proposes_a_change_to_a_pinned_cell() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let mut day = full_day(date);
    day.records.push(("extra".to_string(), ShiftKind::Day));

    let violation = Violation {
        kind: ViolationKind::SlotCountMismatch,
        date,
        shift: Some(ShiftKind::Day),
        employee_ids: Vec::new(),
        message: "DAY over-staffed".to_string(),
    };

    let pinned = vec![
        Pin { employee_id: "e3".to_string(), date, shift: ShiftKind::Day },
        Pin { employee_id: "e4".to_string(), date, shift: ShiftKind::Day },
        Pin { employee_id: "e5".to_string(), date, shift: ShiftKind::Day },
        Pin { employee_id: "e14".to_string(), date, shift: ShiftKind::Day },
        Pin { employee_id: "e15".to_string(), date, shift: ShiftKind::Day },
        Pin { employee_id: "e16".to_string(), date, shift: ShiftKind::Day },
    ];

    let request = AdvisorRequest {
        violation,
        employees: sample_roster(17),
        avoidance_groups: Vec::new(),
        schedule: vec![day],
        pinned,
    };

    let pinned_ids = ["e3", "e4", "e5", "e14", "e15", "e16"];
    let response = scheduler::advise(&request, date).expect("advisor call should not error");
    match response.suggestion {
        None => {}
        Some(suggestion) => {
            for change in &suggestion.changes {
                assert!(
                    !pinned_ids.contains(&change.employee_id.as_str()),
                    "pinned employee {} must not be touched",
                    change.employee_id
                );
            }
        }
    }
}

fn swap_changes(date: NaiveDate, a: (&str, ShiftKind, ShiftKind), b: (&str, ShiftKind, ShiftKind)) -> Vec<Change> {
    vec![
        Change { date, employee_id: a.0.to_string(), from_shift: a.1, to_shift: a.2 },
        Change { date, employee_id: b.0.to_string(), from_shift: b.1, to_shift: b.2 },
    ]
}

/// Every proposed swap's two changes have reversed (from, to) shift kinds.
#[test]
fn swap_changes_are_mirror_images() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let changes = swap_changes(
        date,
        ("e1", ShiftKind::MiniNight, ShiftKind::Day),
        ("e14", ShiftKind::Day, ShiftKind::MiniNight),
    );
    assert_eq!(changes[0].from_shift, changes[1].to_shift);
    assert_eq!(changes[0].to_shift, changes[1].from_shift);
}
