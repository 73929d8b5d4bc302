//! Solver output: assignments plus the reference data they were computed from.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de_id;
use super::entity::{Employee, EntityKind, Location, Shift};

/// One employee working one shift at one location on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(deserialize_with = "de_id")]
    pub employee_id: String,
    #[serde(default)]
    pub employee_name: String,
    #[serde(deserialize_with = "de_id")]
    pub location_id: String,
    #[serde(default)]
    pub location_name: String,
    #[serde(deserialize_with = "de_id")]
    pub shift_id: String,
    #[serde(default)]
    pub shift_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

impl Assignment {
    pub fn new(
        employee_id: impl Into<String>,
        location_id: impl Into<String>,
        shift_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            employee_name: String::new(),
            location_id: location_id.into(),
            location_name: String::new(),
            shift_id: shift_id.into(),
            shift_name: String::new(),
            date,
            start_time: String::new(),
            end_time: String::new(),
        }
    }
}

/// Aggregate statistics computed by the solver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub total_assignments: u64,
    pub shifts_per_employee: BTreeMap<String, u64>,
    pub shifts_per_location: BTreeMap<String, u64>,
    pub shifts_per_day: BTreeMap<String, u64>,
    pub shifts_per_type: BTreeMap<String, u64>,
    pub min_shifts_per_employee: u64,
    pub max_shifts_per_employee: u64,
    pub avg_shifts_per_employee: f64,
    pub load_balance_score: f64,
    pub conflicts_detected: u64,

    /// Any further metrics the solver reports
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// AI narrative attached to a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAnalysis {
    pub fairness_score: f64,
    pub fairness_analysis: String,
    pub insights: String,
    pub optimization_suggestions: String,
    pub schedule_explanation: String,
    pub ai_model_used: String,
    pub ai_provider: String,
}

/// Present when the fairness score fell below target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationSuggestions {
    pub current_fairness: f64,
    pub target_fairness: f64,
    pub suggestions: String,
}

/// Immutable bundle produced by a successful regeneration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSnapshot {
    pub status: String,
    pub solver_status: String,
    pub generated_at: Option<String>,
    pub dates: Vec<NaiveDate>,
    pub employees: Vec<Employee>,
    pub locations: Vec<Location>,
    pub shifts: Vec<Shift>,
    #[serde(rename = "schedule")]
    pub assignments: Vec<Assignment>,
    pub statistics: Statistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AiAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization_suggestions: Option<OptimizationSuggestions>,
}

/// An assignment field pointing at an entity missing from the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub assignment_index: usize,
    pub kind: EntityKind,
    pub id: String,
}

impl ScheduleSnapshot {
    pub fn is_ai_augmented(&self) -> bool {
        self.ai_analysis.is_some()
    }

    /// First and last date covered, from `dates` or else from the assignments
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates: Vec<NaiveDate> = if self.dates.is_empty() {
            self.assignments.iter().map(|a| a.date).collect()
        } else {
            self.dates.clone()
        };
        dates.sort();
        Some((*dates.first()?, *dates.last()?))
    }

    pub fn employee_name(&self, id: &str) -> Option<&str> {
        self.employees.iter().find(|e| e.id == id).map(|e| e.name.as_str())
    }

    pub fn location_name(&self, id: &str) -> Option<&str> {
        self.locations.iter().find(|l| l.id == id).map(|l| l.name.as_str())
    }

    pub fn shift_name(&self, id: &str) -> Option<&str> {
        self.shifts.iter().find(|s| s.id == id).map(|s| s.name.as_str())
    }

    /// Assignments whose references are absent from the embedded collections
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let employees: HashSet<&str> = self.employees.iter().map(|e| e.id.as_str()).collect();
        let locations: HashSet<&str> = self.locations.iter().map(|l| l.id.as_str()).collect();
        let shifts: HashSet<&str> = self.shifts.iter().map(|s| s.id.as_str()).collect();

        let mut dangling = Vec::new();
        for (index, a) in self.assignments.iter().enumerate() {
            let checks = [
                (EntityKind::Employee, &a.employee_id, &employees),
                (EntityKind::Location, &a.location_id, &locations),
                (EntityKind::Shift, &a.shift_id, &shifts),
            ];
            for (kind, id, known) in checks {
                if !known.contains(id.as_str()) {
                    dangling.push(DanglingReference {
                        assignment_index: index,
                        kind,
                        id: id.clone(),
                    });
                }
            }
        }
        dangling
    }
}
