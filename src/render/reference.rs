//! Management view listings and filter option lists.

use colored::*;

use crate::domain::{EntityKind, ReferenceDataset};
use crate::loader::{CollectionOrigin, LoadedReference};
use crate::view::{FilterOption, FilterOptions};

fn origin_tag(origin: CollectionOrigin) -> ColoredString {
    match origin {
        CollectionOrigin::Api => "api".green(),
        CollectionOrigin::StaticFallback => "static".yellow(),
        CollectionOrigin::Unavailable => "unavailable".red(),
    }
}

fn entity_lines(dataset: &ReferenceDataset, kind: EntityKind) -> Vec<String> {
    match kind {
        EntityKind::Employee => dataset
            .employees
            .iter()
            .map(|e| {
                let mut line = format!("  {:<8} {}", e.id, e.name);
                if !e.email.is_empty() {
                    line.push_str(&format!(" <{}>", e.email));
                }
                if !e.skills.is_empty() {
                    line.push_str(&format!(" [{}]", e.skills.join(", ")));
                }
                line
            })
            .collect(),
        EntityKind::Location => dataset
            .locations
            .iter()
            .map(|l| {
                let mut line = format!("  {:<8} {} (capacity {})", l.id, l.name, l.capacity);
                if !l.address.is_empty() {
                    line.push_str(&format!(", {}", l.address));
                }
                line
            })
            .collect(),
        EntityKind::Shift => dataset
            .shifts
            .iter()
            .map(|s| {
                let hours = s.duration_hours().map(|h| format!(" {:.1}h", h)).unwrap_or_default();
                format!("  {:<8} {} {}-{}{}", s.id, s.name, s.start_time, s.end_time, hours)
            })
            .collect(),
    }
}

/// One collection with its provenance
pub fn render_collection(loaded: &LoadedReference, kind: EntityKind) -> String {
    let count = loaded.dataset.len(kind);
    let mut lines = vec![format!(
        "{} ({}, {})",
        kind.collection().to_uppercase().bold(),
        count,
        origin_tag(loaded.origin(kind))
    )];
    if count == 0 {
        lines.push(format!("  {}", "none".dimmed()));
    } else {
        lines.extend(entity_lines(&loaded.dataset, kind));
    }
    lines.join("\n")
}

/// Every requested collection, in load order
pub fn render_reference(loaded: &LoadedReference, kinds: &[EntityKind]) -> String {
    kinds
        .iter()
        .map(|kind| render_collection(loaded, *kind))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn option_lines(title: &str, options: &[FilterOption]) -> String {
    let mut lines = vec![title.bold().to_string()];
    lines.extend(options.iter().map(|o| format!("  {:<8} {}", o.id, o.label)));
    lines.join("\n")
}

/// Filter selector contents
pub fn render_filter_options(options: &FilterOptions) -> String {
    let mut dates = vec!["Dates".bold().to_string()];
    dates.extend(options.dates.iter().map(|d| format!("  {}", d)));
    [
        dates.join("\n"),
        option_lines("Locations", &options.locations),
        option_lines("Employees", &options.employees),
        option_lines("Shifts", &options.shifts),
    ]
    .join("\n\n")
}
