//! Text rendering for reports and rounds.
//!
//! Deterministic string building: the same report always renders to the
//! same text, so rendered output is safe to diff between runs.

use vigil_core::{Report, RoundResult};

/// Render the human-readable summary of a report.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(&format!("deployment verification: {}\n", report.outcome.label()));
    out.push_str(&format!("rounds completed: {}\n", report.rounds_completed));
    out.push_str(&format!(
        "success rate: {:.1}% ({}/{} targets healthy)\n",
        report.success_rate * 100.0,
        report.histogram.healthy,
        report.histogram.total()
    ));

    out.push_str("states:\n");
    out.push_str(&format!("  healthy: {}\n", report.histogram.healthy));
    out.push_str(&format!("  degraded: {}\n", report.histogram.degraded));
    out.push_str(&format!(
        "  placeholder_build: {}\n",
        report.histogram.placeholder_build
    ));
    out.push_str(&format!("  error: {}\n", report.histogram.error));
    out.push_str(&format!("  unreachable: {}\n", report.histogram.unreachable));

    out.push_str("recommendations:\n");
    for recommendation in &report.recommendations {
        out.push_str(&format!("  - {recommendation}\n"));
    }

    out
}

/// Render the per-target detail of one round.
pub fn render_round(round: &RoundResult) -> String {
    let mut out = String::new();

    if round.targets.is_empty() {
        out.push_str("no rounds completed\n");
        return out;
    }

    out.push_str(&format!("round {} results:\n", round.attempt));
    for target in &round.targets {
        out.push_str(&format!(
            "  {} → {} (status {}, {}ms)\n",
            target.path,
            target.state.label(),
            target.outcome.status,
            target.outcome.elapsed_ms
        ));
    }

    out
}
