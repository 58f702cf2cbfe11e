use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use sponsorscope::calibration::calibrator::BaseScore;
use sponsorscope::config::Config;
use sponsorscope::graph::schema::Window;
use sponsorscope::ingest::completeness::DataCompleteness;
use sponsorscope::ingest::raw::{self, Creator};
use sponsorscope::output::terminal;
use sponsorscope::pipeline::evaluate;

/// SponsorScope: engagement-graph coordination signals for creator accounts.
///
/// Builds a windowed engagement graph from scraped interactions, measures
/// coordination signals, and calibrates a heuristic score against them.
/// Outputs are probabilistic signals, never verdicts.
#[derive(Parser)]
#[command(name = "sponsorscope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one creator from a JSON file of interaction records
    Evaluate {
        /// JSON array of interaction records
        #[arg(long)]
        input: PathBuf,

        /// Creator handle the interactions were collected for
        #[arg(long)]
        creator: String,

        /// Lookback window: 24h, 7d or 30d (default: SPONSORSCOPE_WINDOW or 7d)
        #[arg(long)]
        window: Option<Window>,

        /// Heuristic base score (0-100)
        #[arg(long)]
        base_score: f64,

        /// Confidence of the heuristic base score (0-1)
        #[arg(long, default_value = "1.0")]
        base_confidence: f64,

        /// Data completeness reported by ingestion
        #[arg(long, default_value = "full")]
        completeness: DataCompleteness,

        /// Evaluate as of this RFC 3339 time instead of now
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Print the evaluation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration (defaults + SPONSORSCOPE_* overrides)
    Config,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sponsorscope=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            input,
            creator,
            window,
            base_score,
            base_confidence,
            completeness,
            now,
            json,
        } => {
            let config = Config::load()?;
            let window = window.unwrap_or(config.default_window);
            let now = now.unwrap_or_else(Utc::now);

            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let interactions = raw::parse_interactions(&text)
                .with_context(|| format!("Failed to parse interactions in {}", input.display()))?;
            info!(
                records = interactions.len(),
                path = %input.display(),
                "Loaded interactions"
            );

            let evaluation = evaluate::evaluate(
                &config.calibration,
                &Creator::new(creator),
                &interactions,
                window,
                BaseScore::new(base_score, base_confidence),
                completeness,
                now,
            )?;

            if !evaluation.graph.is_conclusive() {
                warn!("Graph is inconclusive; no adjustment was derived from it");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&evaluation)?);
            } else {
                terminal::display_evaluation(&evaluation);
                println!(
                    "\n{}",
                    "Signals are statistical patterns, not findings of fraud.".dimmed()
                );
            }
        }

        Commands::Config => {
            let config = Config::load()?;
            terminal::display_config(&config.calibration)?;
            println!("  {:<34} {}", "default_window", config.default_window);
        }
    }

    Ok(())
}
