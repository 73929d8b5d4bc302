//! Reference entities: the staffing inputs a user can edit.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de_id;

/// Which reference collection an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Employee,
    Location,
    Shift,
}

impl EntityKind {
    /// All kinds, in the order collections are loaded and persisted
    pub const ALL: [EntityKind; 3] = [EntityKind::Employee, EntityKind::Location, EntityKind::Shift];

    /// Collection name as used in payload keys and resource file names
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Employee => "employees",
            EntityKind::Location => "locations",
            EntityKind::Shift => "shifts",
        }
    }

    /// Resource file name, e.g. `employees.json`
    pub fn file_name(self) -> String {
        format!("{}.json", self.collection())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Employee => "employee",
            EntityKind::Location => "location",
            EntityKind::Shift => "shift",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "employee" | "employees" => Ok(EntityKind::Employee),
            "location" | "locations" => Ok(EntityKind::Location),
            "shift" | "shifts" => Ok(EntityKind::Shift),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

/// A staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub skills: Vec<String>,

    /// Backend fields this client does not model, written back unchanged
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Employee {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            skills: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }
}

/// A work site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub capacity: i64,
    #[serde(default)]
    pub required_skills: Vec<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            capacity,
            required_skills: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_required_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Capacity is expected to be a positive integer; nothing enforces it.
    pub fn has_positive_capacity(&self) -> bool {
        self.capacity > 0
    }
}

/// A shift definition with wall-clock start and end (`HH:MM`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,

    /// Unmodelled fields, including a stored `duration` under that key
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Alternate key some datasets use for the stored duration
const LEGACY_DURATION_KEY: &str = "duration";

impl Shift {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            duration_hours: None,
            extra: BTreeMap::new(),
        }
    }

    /// Stored duration, under whichever key the data used
    pub fn stored_duration(&self) -> Option<f64> {
        self.duration_hours
            .or_else(|| self.extra.get(LEGACY_DURATION_KEY).and_then(Value::as_f64))
    }

    /// Store a duration, keeping the key the record was loaded with
    pub fn set_duration(&mut self, hours: f64) {
        if self.duration_hours.is_none() && self.extra.contains_key(LEGACY_DURATION_KEY) {
            self.extra.insert(LEGACY_DURATION_KEY.to_string(), Value::from(hours));
        } else {
            self.duration_hours = Some(hours);
        }
    }

    fn parse_times(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = parse_clock(&self.start_time)?;
        let end = parse_clock(&self.end_time)?;
        Some((start, end))
    }

    /// Stored duration if present, otherwise derived from start/end for same-day shifts
    pub fn duration_hours(&self) -> Option<f64> {
        if let Some(hours) = self.stored_duration() {
            return Some(hours);
        }
        let (start, end) = self.parse_times()?;
        if end <= start {
            return None;
        }
        Some((end - start).num_minutes() as f64 / 60.0)
    }

    /// True when both times parse and end is after start
    pub fn is_well_formed(&self) -> bool {
        self.parse_times().map(|(s, e)| e > s).unwrap_or(false)
    }
}

fn parse_clock(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s.trim(), "%H:%M:%S"))
        .ok()
}

/// Any one reference entity, tagged with its kind
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRecord {
    Employee(Employee),
    Location(Location),
    Shift(Shift),
}

impl EntityRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRecord::Employee(_) => EntityKind::Employee,
            EntityRecord::Location(_) => EntityKind::Location,
            EntityRecord::Shift(_) => EntityKind::Shift,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            EntityRecord::Employee(e) => &e.id,
            EntityRecord::Location(l) => &l.id,
            EntityRecord::Shift(s) => &s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EntityRecord::Employee(e) => &e.name,
            EntityRecord::Location(l) => &l.name,
            EntityRecord::Shift(s) => &s.name,
        }
    }
}

impl From<Employee> for EntityRecord {
    fn from(e: Employee) -> Self {
        EntityRecord::Employee(e)
    }
}

impl From<Location> for EntityRecord {
    fn from(l: Location) -> Self {
        EntityRecord::Location(l)
    }
}

impl From<Shift> for EntityRecord {
    fn from(s: Shift) -> Self {
        EntityRecord::Shift(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_collection_names() {
        assert_eq!(EntityKind::Employee.collection(), "employees");
        assert_eq!(EntityKind::Location.file_name(), "locations.json");
        assert_eq!(EntityKind::Shift.to_string(), "shift");
    }

    #[test]
    fn test_entity_kind_from_str() {
        assert_eq!("employees".parse::<EntityKind>().unwrap(), EntityKind::Employee);
        assert_eq!("Location".parse::<EntityKind>().unwrap(), EntityKind::Location);
        assert!("rooms".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_employee_deserialize_numeric_id() {
        let json = r#"{"id": 3, "name": "Mai", "email": "mai@example.com", "skills": ["cashier", "barista"]}"#;
        let e: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(e.id, "3");
        assert_eq!(e.skills, vec!["cashier", "barista"]);
    }

    #[test]
    fn test_location_defaults_missing_fields() {
        let l: Location = serde_json::from_str(r#"{"id": "L1", "name": "Downtown"}"#).unwrap();
        assert_eq!(l.capacity, 0);
        assert!(!l.has_positive_capacity());
        assert!(l.required_skills.is_empty());
    }

    #[test]
    fn test_shift_derived_duration() {
        let s = Shift::new("S1", "Morning", "06:00", "14:30");
        assert_eq!(s.duration_hours(), Some(8.5));
        assert!(s.is_well_formed());
    }

    #[test]
    fn test_shift_stored_duration_wins() {
        let json = r#"{"id": "S2", "name": "Night", "start_time": "22:00", "end_time": "06:00", "duration": 8}"#;
        let s: Shift = serde_json::from_str(json).unwrap();
        assert_eq!(s.duration_hours(), Some(8.0));
        assert!(!s.is_well_formed());

        let mut s = s;
        s.set_duration(7.5);
        let out = serde_json::to_value(&s).unwrap();
        assert_eq!(out["duration"], 7.5);
        assert!(out.get("duration_hours").is_none());
    }

    #[test]
    fn test_shift_unparseable_times() {
        let s = Shift::new("S3", "Odd", "morning", "noon");
        assert_eq!(s.duration_hours(), None);
        assert!(!s.is_well_formed());
    }

    #[test]
    fn test_entity_record_accessors() {
        let rec: EntityRecord = Employee::new("E1", "An").into();
        assert_eq!(rec.kind(), EntityKind::Employee);
        assert_eq!(rec.id(), "E1");
        assert_eq!(rec.name(), "An");
    }
}
