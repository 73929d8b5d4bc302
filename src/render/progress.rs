//! Text progress bar for regeneration.

use colored::*;

use crate::regen::RegenPhase;

const BAR_WIDTH: usize = 30;

/// `generating schedule [#########.....]  30%`
pub fn render_progress(phase: RegenPhase, percent: u8) -> String {
    let percent = percent.min(100);
    let filled = BAR_WIDTH * usize::from(percent) / 100;
    let bar = format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled));
    let bar = if percent == 100 { bar.green() } else { bar.cyan() };
    format!("{:<20} [{}] {:>3}%", phase.to_string(), bar, percent)
}
