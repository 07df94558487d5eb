use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// The minimum number of employees a roster must carry to meet the 17-seat
/// daily head-count (spec §4.2).
pub const MIN_ROSTER_SIZE: usize = 17;

/// Positions `0..CHIEF_COUNT` in display order are chief-qualified.
pub const CHIEF_COUNT: usize = 6;

/// Position `0` is the anchor employee, who follows the DAY/SLEEP/SLEEP cycle.
pub const ANCHOR_POSITION: usize = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvoidanceGroup {
    pub id: String,
    pub members: Vec<String>,
}

/// The immutable, display-ordered description of who the solver schedules.
///
/// Positions are derived from array order, never carried as a field on
/// `Employee` itself, so that "chief" and "anchor" stay first-class
/// properties of the model rather than assumptions re-derived ad hoc
/// (spec §9).
pub struct RosterModel {
    employees: Vec<Employee>,
    position_by_id: HashMap<String, usize>,
    /// First-class per-position chief flag, computed once here rather than
    /// re-derived from `position < CHIEF_COUNT` downstream (spec §9 design
    /// note).
    chief_by_position: Vec<bool>,
    avoidance_groups: Vec<AvoidanceGroup>,
    group_of_employee: HashMap<String, usize>,
}

impl RosterModel {
    pub fn new(
        employees: Vec<Employee>,
        avoidance_groups: Vec<AvoidanceGroup>,
    ) -> Result<Self, SchedulerError> {
        if employees.len() < MIN_ROSTER_SIZE {
            return Err(SchedulerError::roster_too_small(format!(
                "roster has {} employees, need at least {}",
                employees.len(),
                MIN_ROSTER_SIZE
            )));
        }

        let position_by_id: HashMap<String, usize> = employees
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.id.clone(), idx))
            .collect();

        let mut group_of_employee = HashMap::new();
        let mut kept_groups = Vec::with_capacity(avoidance_groups.len());
        for group in avoidance_groups {
            let known_members: Vec<String> = group
                .members
                .iter()
                .filter(|id| position_by_id.contains_key(*id))
                .cloned()
                .collect();
            if known_members.len() < 2 {
                tracing::warn!(
                    group_id = %group.id,
                    "avoidance group has fewer than two known members, ignoring"
                );
                continue;
            }
            for member_id in &known_members {
                group_of_employee.insert(member_id.clone(), kept_groups.len());
            }
            kept_groups.push(AvoidanceGroup {
                id: group.id,
                members: known_members,
            });
        }

        let chief_by_position = (0..employees.len()).map(|p| p < CHIEF_COUNT).collect();

        Ok(Self {
            employees,
            position_by_id,
            chief_by_position,
            avoidance_groups: kept_groups,
            group_of_employee,
        })
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn position_of(&self, employee_id: &str) -> Option<usize> {
        self.position_by_id.get(employee_id).copied()
    }

    pub fn is_chief(&self, position: usize) -> bool {
        self.chief_by_position.get(position).copied().unwrap_or(false)
    }

    pub fn is_anchor(&self, position: usize) -> bool {
        position == ANCHOR_POSITION
    }

    pub fn anchor_employee(&self) -> &Employee {
        &self.employees[ANCHOR_POSITION]
    }

    pub fn avoidance_groups(&self) -> &[AvoidanceGroup] {
        &self.avoidance_groups
    }

    /// The avoidance group a given employee belongs to, if any.
    pub fn group_of(&self, employee_id: &str) -> Option<&AvoidanceGroup> {
        self.group_of_employee
            .get(employee_id)
            .map(|idx| &self.avoidance_groups[*idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employees(n: usize) -> Vec<Employee> {
        (0..n)
            .map(|i| Employee {
                id: format!("e{i}"),
                name: format!("Employee {i}"),
            })
            .collect()
    }

    #[test]
    fn rejects_small_rosters() {
        let err = RosterModel::new(employees(5), vec![]).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::RosterTooSmall);
    }

    #[test]
    fn first_six_are_chief_and_position_zero_is_anchor() {
        let roster = RosterModel::new(employees(17), vec![]).unwrap();
        for p in 0..6 {
            assert!(roster.is_chief(p));
        }
        assert!(!roster.is_chief(6));
        assert!(roster.is_anchor(0));
        assert!(!roster.is_anchor(1));
    }

    #[test]
    fn drops_avoidance_groups_with_fewer_than_two_known_members() {
        let roster = RosterModel::new(
            employees(17),
            vec![
                AvoidanceGroup {
                    id: "g1".into(),
                    members: vec!["e0".into()],
                },
                AvoidanceGroup {
                    id: "g2".into(),
                    members: vec!["e1".into(), "e2".into()],
                },
            ],
        )
        .unwrap();
        assert_eq!(roster.avoidance_groups().len(), 1);
        assert!(roster.group_of("e1").is_some());
        assert!(roster.group_of("e0").is_none());
    }
}
