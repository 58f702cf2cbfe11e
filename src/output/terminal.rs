// Colored terminal output for evaluations.
//
// Wording stays observational: signals are described as patterns, never
// as findings of fraud.

use colored::Colorize;

use super::truncate_chars;
use crate::calibration::envelope::CalibratedScoreEnvelope;
use crate::config::CalibrationConfig;
use crate::graph::metrics::CredibilitySignal;
use crate::graph::schema::{EngagementGraph, GraphStatus};
use crate::graph::signals::CoordinationSignals;
use crate::pipeline::evaluate::Evaluation;

const NOTE_WIDTH: usize = 110;

/// Display a full evaluation: graph summary, signals, detectors, envelope.
pub fn display_evaluation(evaluation: &Evaluation) {
    display_graph(&evaluation.graph);
    display_signals(&evaluation.signals);
    display_credibility_signals(&evaluation.credibility_signals);
    display_envelope(&evaluation.envelope);
}

pub fn display_graph(graph: &EngagementGraph) {
    println!(
        "\n{}",
        format!("=== Engagement graph: @{} ({}) ===", graph.creator(), graph.window()).bold()
    );
    let status = match graph.status() {
        GraphStatus::Ok => graph.status().as_str().green(),
        GraphStatus::Inconclusive => graph.status().as_str().yellow(),
    };
    println!("  Status:   {status}");
    println!("  Nodes:    {}", graph.nodes().len());
    println!("  Edges:    {}", graph.edges().len());
    println!("  Built at: {}", graph.built_at().format("%Y-%m-%d %H:%M:%S UTC"));
    if !graph.is_conclusive() {
        println!(
            "  {}",
            "Too few repeat commenters to draw conclusions from this window.".dimmed()
        );
    }
}

pub fn display_signals(signals: &CoordinationSignals) {
    println!("\n{}", "Coordination signals".bold());
    println!("  {:<22} {:>6.2}", "Timing concentration", signals.timing_concentration);
    println!("  {:<22} {:>6.2}", "Edge reuse ratio", signals.edge_reuse_ratio);
    println!(
        "  {:<22} {:>6.2}  {}",
        "Commenter overlap",
        signals.commenter_overlap,
        "(approximated by edge reuse)".dimmed()
    );
    println!(
        "  {:<22} {:>6}  {}",
        "Reciprocity",
        "n/a",
        "(not collected)".dimmed()
    );
    println!("  {:<22} {:>6}", "Sample size", signals.sample_size);
    println!("  {:<22} {:>6.2}", "Signal confidence", signals.confidence);
    for note in &signals.notes {
        println!("  - {}", truncate_chars(note, NOTE_WIDTH).dimmed());
    }
}

pub fn display_credibility_signals(signals: &[CredibilitySignal]) {
    println!("\n{}", "Graph detectors".bold());
    if signals.is_empty() {
        println!(
            "  {}",
            "No detector fired (below threshold or sample too small).".dimmed()
        );
        return;
    }
    for signal in signals {
        let patterns: Vec<&str> = signal.detected_patterns.iter().map(|p| p.as_str()).collect();
        println!(
            "  {} strength {:.2}, confidence penalty {:.2}",
            patterns.join(", ").yellow(),
            signal.signal_strength,
            signal.confidence_penalty
        );
        println!("    {}", truncate_chars(&signal.explanation, NOTE_WIDTH));
    }
}

pub fn display_envelope(envelope: &CalibratedScoreEnvelope) {
    println!("\n{}", "Calibrated score".bold());
    let adjusted = format!("{:.1}", envelope.adjusted_score);
    let adjusted = if envelope.was_adjusted() {
        adjusted.yellow()
    } else {
        adjusted.green()
    };
    println!("  Base score:     {:.1}", envelope.base_score);
    println!("  Adjusted score: {adjusted}");
    println!(
        "  Range:          {:.1} - {:.1}",
        envelope.uncertainty_band.0, envelope.uncertainty_band.1
    );
    println!("  Confidence:     {:.2}", envelope.confidence);
    println!("  Data:           {}", envelope.data_completeness);

    if !envelope.applied_adjustments.is_empty() {
        let applied: Vec<&str> = envelope.applied_adjustments.iter().map(|s| s.as_str()).collect();
        println!("  Applied:        {}", applied.join(", "));
    }
    if !envelope.suppressed_signals.is_empty() {
        let suppressed: Vec<&str> = envelope.suppressed_signals.iter().map(|s| s.as_str()).collect();
        println!("  Suppressed:     {}", suppressed.join(", ").dimmed());
    }
    println!(
        "  {}",
        format!("calibration {}", envelope.calibration_version).dimmed()
    );
}

/// Display the effective configuration as aligned key/value pairs.
pub fn display_config(config: &CalibrationConfig) -> serde_json::Result<()> {
    println!("\n{}", "=== Effective configuration ===".bold());
    let value = serde_json::to_value(config)?;
    if let Some(map) = value.as_object() {
        for (key, v) in map {
            println!("  {:<34} {}", key, v);
        }
    }
    Ok(())
}
