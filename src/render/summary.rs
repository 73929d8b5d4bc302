//! Statistics and AI narrative sections under the schedule table.

use colored::*;

use crate::domain::{AiAnalysis, OptimizationSuggestions, ScheduleSnapshot, Statistics};

/// Aggregate numbers reported by the solver
pub fn render_statistics(stats: &Statistics) -> String {
    let mut lines = vec![
        "Statistics".bold().to_string(),
        format!("  Total assignments:      {}", stats.total_assignments),
        format!(
            "  Shifts per employee:    min {} / max {} / avg {:.1}",
            stats.min_shifts_per_employee, stats.max_shifts_per_employee, stats.avg_shifts_per_employee
        ),
        format!("  Load balance score:     {:.1}", stats.load_balance_score),
    ];
    let conflicts = format!("  Conflicts detected:     {}", stats.conflicts_detected);
    lines.push(if stats.conflicts_detected > 0 {
        conflicts.red().to_string()
    } else {
        conflicts
    });
    lines.join("\n")
}

fn section(title: &str, body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    Some(format!("{}\n{}", title.cyan().bold(), body))
}

/// Narrative fields, skipping empty ones
pub fn render_ai_analysis(analysis: &AiAnalysis) -> String {
    let mut parts = vec![format!(
        "{} fairness score {:.0}/100",
        "AI analysis:".magenta().bold(),
        analysis.fairness_score
    )];
    parts.extend(
        [
            ("Fairness", analysis.fairness_analysis.as_str()),
            ("Insights", analysis.insights.as_str()),
            ("Suggestions", analysis.optimization_suggestions.as_str()),
            ("Explanation", analysis.schedule_explanation.as_str()),
        ]
        .into_iter()
        .filter_map(|(title, body)| section(title, body)),
    );
    if !analysis.ai_model_used.is_empty() {
        parts.push(format!("(model: {} via {})", analysis.ai_model_used, analysis.ai_provider).dimmed().to_string());
    }
    parts.join("\n\n")
}

/// Below-target fairness notice
pub fn render_optimization(suggestions: &OptimizationSuggestions) -> String {
    let mut out = format!(
        "{} fairness {:.0} is below target {:.0}",
        "Optimization:".yellow().bold(),
        suggestions.current_fairness,
        suggestions.target_fairness
    );
    if !suggestions.suggestions.trim().is_empty() {
        out.push('\n');
        out.push_str(suggestions.suggestions.trim());
    }
    out
}

/// Everything shown below the table for a snapshot
pub fn render_summary(snapshot: &ScheduleSnapshot) -> String {
    let mut parts = vec![render_statistics(&snapshot.statistics)];
    if let Some(analysis) = &snapshot.ai_analysis {
        parts.push(render_ai_analysis(analysis));
    }
    if let Some(suggestions) = &snapshot.optimization_suggestions {
        parts.push(render_optimization(suggestions));
    }
    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_lines() {
        let stats = Statistics {
            total_assignments: 42,
            min_shifts_per_employee: 3,
            max_shifts_per_employee: 6,
            avg_shifts_per_employee: 4.33,
            ..Default::default()
        };
        let out = render_statistics(&stats);
        assert!(out.contains("Total assignments:      42"));
        assert!(out.contains("min 3 / max 6 / avg 4.3"));
    }

    #[test]
    fn test_ai_analysis_skips_empty_sections() {
        let analysis = AiAnalysis {
            fairness_score: 72.0,
            insights: "Weekend coverage is thin.".into(),
            ..Default::default()
        };
        let out = render_ai_analysis(&analysis);
        assert!(out.contains("72/100"));
        assert!(out.contains("Weekend coverage is thin."));
        assert!(!out.contains("Explanation"));
        assert!(!out.contains("model:"));
    }

    #[test]
    fn test_summary_without_ai() {
        let snapshot = ScheduleSnapshot::default();
        let out = render_summary(&snapshot);
        assert!(out.contains("Statistics"));
        assert!(!out.contains("AI analysis"));
    }

    #[test]
    fn test_summary_with_optimization() {
        let snapshot = ScheduleSnapshot {
            optimization_suggestions: Some(OptimizationSuggestions {
                current_fairness: 60.0,
                target_fairness: 85.0,
                suggestions: "Rotate night shifts.".into(),
            }),
            ..Default::default()
        };
        let out = render_summary(&snapshot);
        assert!(out.contains("below target 85"));
        assert!(out.contains("Rotate night shifts."));
    }
}
