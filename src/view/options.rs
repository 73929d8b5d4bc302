//! Distinct values available to each filter selector.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::domain::ScheduleSnapshot;

/// Selector entry: identifier plus display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub id: String,
    pub label: String,
}

/// Values present in a snapshot's assignments, per dimension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub dates: Vec<NaiveDate>,
    pub locations: Vec<FilterOption>,
    pub employees: Vec<FilterOption>,
    pub shifts: Vec<FilterOption>,
}

fn label_or_lookup(denormalized: &str, lookup: Option<&str>, id: &str) -> String {
    if !denormalized.is_empty() {
        return denormalized.to_string();
    }
    lookup.unwrap_or(id).to_string()
}

fn into_sorted(map: BTreeMap<String, String>) -> Vec<FilterOption> {
    let mut options: Vec<FilterOption> = map.into_iter().map(|(id, label)| FilterOption { id, label }).collect();
    options.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
    options
}

impl FilterOptions {
    pub fn from_snapshot(snapshot: &ScheduleSnapshot) -> Self {
        let mut dates = BTreeSet::new();
        let mut locations = BTreeMap::new();
        let mut employees = BTreeMap::new();
        let mut shifts = BTreeMap::new();

        for a in &snapshot.assignments {
            dates.insert(a.date);
            locations
                .entry(a.location_id.clone())
                .or_insert_with(|| label_or_lookup(&a.location_name, snapshot.location_name(&a.location_id), &a.location_id));
            employees
                .entry(a.employee_id.clone())
                .or_insert_with(|| label_or_lookup(&a.employee_name, snapshot.employee_name(&a.employee_id), &a.employee_id));
            shifts
                .entry(a.shift_id.clone())
                .or_insert_with(|| label_or_lookup(&a.shift_name, snapshot.shift_name(&a.shift_id), &a.shift_id));
        }

        Self {
            dates: dates.into_iter().collect(),
            locations: into_sorted(locations),
            employees: into_sorted(employees),
            shifts: into_sorted(shifts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Assignment, Employee};

    #[test]
    fn test_options_from_snapshot() {
        let d1 = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut a1 = Assignment::new("E2", "L1", "S1", d1);
        a1.location_name = "Downtown".into();
        let a2 = Assignment::new("E1", "L1", "S1", d2);
        let a3 = Assignment::new("E2", "L1", "S1", d1);

        let snap = ScheduleSnapshot {
            employees: vec![Employee::new("E1", "Zoe"), Employee::new("E2", "Anh")],
            assignments: vec![a1, a2, a3],
            ..Default::default()
        };

        let options = FilterOptions::from_snapshot(&snap);
        assert_eq!(options.dates, vec![d2, d1]);
        assert_eq!(options.locations.len(), 1);
        assert_eq!(options.locations[0].label, "Downtown");
        let labels: Vec<&str> = options.employees.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Anh", "Zoe"]);
        // no shift name anywhere: falls back to the id
        assert_eq!(options.shifts[0].label, "S1");
    }

    #[test]
    fn test_empty_snapshot_has_no_options() {
        assert_eq!(FilterOptions::from_snapshot(&ScheduleSnapshot::default()), FilterOptions::default());
    }
}
