//! adscore — scores a synced campaign snapshot and prints the ranked ads.
//!
//! Reads a JSON array of ad metrics, builds the campaign baseline, classifies
//! every ad and prints either the full scorecard as JSON or a summary table.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use adscore_core::{AdMetrics, AppConfig, CoreResult, ScoringError};
use adscore_engine::{score_campaign, CampaignScorecard, Classifier};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "adscore")]
#[command(about = "Explainable per-ad performance scoring for a campaign snapshot")]
#[command(version)]
struct Cli {
    /// Path to a JSON array of ad metrics
    #[arg(long, short)]
    input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Only print the first N ranked ads (overrides config)
    #[arg(long, env = "ADSCORE__REPORT__TOP_N")]
    top: Option<usize>,

    /// Impression floor below which ads are not evaluated (overrides config)
    #[arg(long, env = "ADSCORE__SCORING__MIN_IMPRESSIONS")]
    min_impressions: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adscore=info,adscore_engine=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let config = resolve_config(AppConfig::load(), &cli)?;

    let ads = load_snapshot(&cli.input)?;
    info!(path = %cli.input.display(), ads = ads.len(), "Snapshot loaded");

    let classifier = Classifier::new(config.scoring.clone());
    let mut card = score_campaign(&ads, &classifier);
    if let Some(top) = config.report.top_n {
        card.ads.truncate(top);
    }

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Table => print!("{}", render_table(&card)),
    }

    Ok(())
}

/// Falls back to defaults only when no config could be read. Thresholds
/// that were read but are invalid are an error, never silently replaced.
fn resolve_config(loaded: CoreResult<AppConfig>, cli: &Cli) -> CoreResult<AppConfig> {
    let mut config = match loaded {
        Ok(config) => config,
        Err(ScoringError::Config(e)) => {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        }
        Err(e) => return Err(e),
    };

    if let Some(min) = cli.min_impressions {
        config.scoring.min_impressions = min;
    }
    if let Some(top) = cli.top {
        config.report.top_n = Some(top);
    }
    config.scoring.validate()?;
    Ok(config)
}

fn load_snapshot(path: &Path) -> CoreResult<Vec<AdMetrics>> {
    let raw = std::fs::read_to_string(path)?;
    let ads: Vec<AdMetrics> = serde_json::from_str(&raw)?;

    if let Some(dup) = first_duplicate_id(&ads) {
        return Err(ScoringError::Snapshot(format!(
            "ad id {dup} appears more than once in {}",
            path.display()
        )));
    }
    Ok(ads)
}

fn first_duplicate_id(ads: &[AdMetrics]) -> Option<&str> {
    let mut seen = std::collections::HashSet::new();
    ads.iter()
        .map(|a| a.id.as_str())
        .find(|id| !seen.insert(*id))
}

fn render_table(card: &CampaignScorecard) -> String {
    let mut out = String::new();
    let b = &card.baseline;
    let _ = writeln!(
        out,
        "baseline: ctr {:.2}% | dwell {} | cpc {} | cpm {} | impressions {}",
        b.ctr,
        optional(b.dwell_seconds, "s"),
        optional(b.cpc, ""),
        optional(b.cpm, ""),
        b.total_impressions
    );
    let _ = writeln!(
        out,
        "{:>3}  {:<14} {:<24} {:>10} {:>6} {:>8} {:>8} {:>8}  {:<20} {}",
        "#", "id", "name", "impr", "share", "ctr", "dwell", "cpc", "contribution", "recommendation"
    );

    for (rank, r) in card.ads.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<14} {:<24} {:>10} {:>5.1}% {:>8} {:>8} {:>8}  {:<20} {}",
            rank + 1,
            truncate(&r.ad.id, 14),
            truncate(&r.ad.name, 24),
            r.ad.impressions,
            r.impression_share * 100.0,
            delta(r.ctr_delta),
            delta(r.dwell_delta),
            delta(r.cpc_delta),
            r.contribution.map_or("-", |c| c.as_str()),
            r.recommendation
        );
    }

    if !card.needs_attention.is_empty() {
        let _ = writeln!(out, "needs attention: {}", card.needs_attention.join(", "));
    }
    out
}

fn delta(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |d| format!("{:+.1}%", d * 100.0))
}

fn optional(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}{unit}"))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max - 1).collect();
        cut.push('~');
        cut
    }
}
