//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - schedule: filtered, paginated schedule view (the default)
//! - options: filter values present in the schedule
//! - refs: reference collections (management view)
//! - edit: change or add an employee, location or shift
//! - regenerate: persist and request a new schedule
//! - proxy: serve the local generate route

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rota::domain::{Employee, EntityKind, EntityRecord, Location, Shift};
use rota::view::{Filters, Selection};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Rota - schedule viewer and regeneration client
#[derive(Parser, Debug)]
#[command(name = "rota")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show one page of the schedule
    Schedule(ScheduleArgs),

    /// List the filter values present in the schedule
    Options {
        /// Bypass caches
        #[arg(short, long)]
        refresh: bool,
    },

    /// Show reference collections
    Refs {
        /// Only this collection (employees, locations, shifts)
        kind: Option<EntityKind>,
    },

    /// Edit (or add) a reference entity and save it
    Edit(EditArgs),

    /// Generate a new schedule
    Regenerate {
        /// Save the current reference data and send it with the request
        #[arg(short, long)]
        inline: bool,
    },

    /// Serve the local /api/generate proxy route
    Proxy {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
}

/// Filter and page selection for the schedule view
#[derive(Args, Debug, Clone, Default)]
pub struct ScheduleArgs {
    /// Only this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Only this location id
    #[arg(short, long)]
    pub location: Option<String>,

    /// Only this employee id
    #[arg(short, long)]
    pub employee: Option<String>,

    /// Only this shift id
    #[arg(short, long)]
    pub shift: Option<String>,

    /// Page to show (1-based)
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Bypass caches
    #[arg(short, long)]
    pub refresh: bool,
}

impl ScheduleArgs {
    pub fn filters(&self) -> Filters {
        Filters {
            date: Selection::from(self.date),
            location: Selection::from(self.location.clone()),
            employee: Selection::from(self.employee.clone()),
            shift: Selection::from(self.shift.clone()),
        }
    }
}

/// Entity edit: kind, id and the fields to change
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// employee, location or shift
    pub kind: EntityKind,

    /// Entity id
    pub id: String,

    /// Add a new entity instead of editing an existing one
    #[arg(long)]
    pub new: bool,

    #[arg(long)]
    pub name: Option<String>,

    /// Employee email
    #[arg(long)]
    pub email: Option<String>,

    /// Employee skills, comma separated
    #[arg(long, value_delimiter = ',')]
    pub skills: Option<Vec<String>>,

    /// Location address
    #[arg(long)]
    pub address: Option<String>,

    /// Location capacity
    #[arg(long, allow_negative_numbers = true)]
    pub capacity: Option<i64>,

    /// Location required skills, comma separated
    #[arg(long, value_delimiter = ',')]
    pub required_skills: Option<Vec<String>>,

    /// Shift start (HH:MM)
    #[arg(long)]
    pub start: Option<String>,

    /// Shift end (HH:MM)
    #[arg(long)]
    pub end: Option<String>,

    /// Shift duration in hours
    #[arg(long)]
    pub duration: Option<f64>,
}

impl EditArgs {
    /// Apply the given flags to an existing record; flags for other kinds are ignored
    pub fn apply(&self, record: EntityRecord) -> EntityRecord {
        match record {
            EntityRecord::Employee(mut e) => {
                set(&mut e.name, &self.name);
                set(&mut e.email, &self.email);
                set(&mut e.skills, &self.skills);
                e.into()
            }
            EntityRecord::Location(mut l) => {
                set(&mut l.name, &self.name);
                set(&mut l.address, &self.address);
                set(&mut l.capacity, &self.capacity);
                set(&mut l.required_skills, &self.required_skills);
                l.into()
            }
            EntityRecord::Shift(mut s) => {
                set(&mut s.name, &self.name);
                set(&mut s.start_time, &self.start);
                set(&mut s.end_time, &self.end);
                if let Some(hours) = self.duration {
                    s.set_duration(hours);
                }
                s.into()
            }
        }
    }

    /// Build a fresh record of `kind` from the flags
    pub fn new_record(&self) -> EntityRecord {
        let name = self.name.clone().unwrap_or_default();
        let blank: EntityRecord = match self.kind {
            EntityKind::Employee => Employee::new(self.id.clone(), name).into(),
            EntityKind::Location => Location::new(self.id.clone(), name, 0).into(),
            EntityKind::Shift => Shift::new(self.id.clone(), name, "", "").into(),
        };
        self.apply(blank)
    }
}

fn set<T: Clone>(field: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *field = v.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit_args(args: &[&str]) -> EditArgs {
        let mut argv = vec!["rota", "edit"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Edit(args)) => args,
            other => panic!("expected edit, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_no_args() {
        // No args falls through to the schedule view
        let cli = Cli::try_parse_from(["rota"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["rota", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["rota", "schedule", "-c", "/path/to/rota.yml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/rota.yml")));
    }

    #[test]
    fn test_schedule_filters() {
        let cli = Cli::try_parse_from(["rota", "schedule", "--date", "2024-01-05", "--location", "L1", "--page", "3"]).unwrap();
        let Some(Commands::Schedule(args)) = cli.command else {
            panic!("expected schedule");
        };
        let filters = args.filters();
        assert_eq!(filters.date, Selection::Only(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()));
        assert_eq!(filters.location, Selection::Only("L1".to_string()));
        assert!(filters.employee.is_all());
        assert_eq!(args.page, 3);
    }

    #[test]
    fn test_schedule_bad_date_rejected() {
        assert!(Cli::try_parse_from(["rota", "schedule", "--date", "tomorrow"]).is_err());
    }

    #[test]
    fn test_refs_kind() {
        let cli = Cli::try_parse_from(["rota", "refs", "shifts"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Refs { kind: Some(EntityKind::Shift) })));
    }

    #[test]
    fn test_regenerate_inline() {
        let cli = Cli::try_parse_from(["rota", "regenerate", "--inline"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Regenerate { inline: true })));
    }

    #[test]
    fn test_proxy_bind() {
        let cli = Cli::try_parse_from(["rota", "proxy", "--bind", "127.0.0.1:4000"]).unwrap();
        let Some(Commands::Proxy { bind: Some(addr) }) = cli.command else {
            panic!("expected proxy bind");
        };
        assert_eq!(addr.port(), 4000);
    }

    #[test]
    fn test_edit_applies_only_given_fields() {
        let args = edit_args(&["employee", "E1", "--email", "an@example.com", "--skills", "cook,driver"]);
        let original = Employee::new("E1", "An");
        let EntityRecord::Employee(e) = args.apply(original.into()) else {
            panic!("kind changed");
        };
        assert_eq!(e.name, "An");
        assert_eq!(e.email, "an@example.com");
        assert_eq!(e.skills, vec!["cook", "driver"]);
    }

    #[test]
    fn test_edit_location_negative_capacity_allowed() {
        let args = edit_args(&["location", "L1", "--capacity", "-1"]);
        let EntityRecord::Location(l) = args.apply(Location::new("L1", "Downtown", 2).into()) else {
            panic!("kind changed");
        };
        assert_eq!(l.capacity, -1);
    }

    #[test]
    fn test_new_shift_record() {
        let args = edit_args(&["shift", "S9", "--new", "--name", "Late", "--start", "18:00", "--end", "23:00"]);
        assert!(args.new);
        let record = args.new_record();
        assert_eq!(record.kind(), EntityKind::Shift);
        assert_eq!(record.id(), "S9");
        let EntityRecord::Shift(s) = record else { unreachable!() };
        assert_eq!(s.duration_hours(), Some(5.0));
    }
}
