use serde::Deserialize;

use crate::error::{CoreResult, ScoringError};

/// Root application configuration. Loaded from an optional `adscore.toml`
/// and environment variables with the prefix `ADSCORE__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scoring: ScoringThresholds,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Heuristic cut-offs used by the ad classifier.
///
/// Delta bands are fractions of the baseline (`0.10` is +10%). Weak bands are
/// negative and compared inclusively, as are strong bands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoringThresholds {
    /// Ads below this many impressions are not evaluated.
    #[serde(default = "default_min_impressions")]
    pub min_impressions: u64,
    /// Last day (inclusive) of the learning phase.
    #[serde(default = "default_learning_max_age_days")]
    pub learning_max_age_days: u32,
    /// First day of the fatigue-risk window.
    #[serde(default = "default_fatigue_min_age_days")]
    pub fatigue_min_age_days: u32,
    #[serde(default = "default_ctr_strong")]
    pub ctr_strong: f64,
    #[serde(default = "default_ctr_weak")]
    pub ctr_weak: f64,
    #[serde(default = "default_dwell_strong")]
    pub dwell_strong: f64,
    #[serde(default = "default_dwell_weak")]
    pub dwell_weak: f64,
    #[serde(default = "default_cpc_efficient")]
    pub cpc_efficient: f64,
    #[serde(default = "default_cpc_inefficient")]
    pub cpc_inefficient: f64,
    /// Impression share at or above which an ad is over-served.
    #[serde(default = "default_over_served_share")]
    pub over_served_share: f64,
    /// Impression share below which an ad is under-served.
    #[serde(default = "default_under_served_share")]
    pub under_served_share: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Only print the first `top_n` ranked ads.
    #[serde(default)]
    pub top_n: Option<usize>,
}

// Default functions
fn default_min_impressions() -> u64 {
    1000
}
fn default_learning_max_age_days() -> u32 {
    13
}
fn default_fatigue_min_age_days() -> u32 {
    60
}
fn default_ctr_strong() -> f64 {
    0.10
}
fn default_ctr_weak() -> f64 {
    -0.15
}
fn default_dwell_strong() -> f64 {
    0.10
}
fn default_dwell_weak() -> f64 {
    -0.10
}
fn default_cpc_efficient() -> f64 {
    0.10
}
fn default_cpc_inefficient() -> f64 {
    -0.15
}
fn default_over_served_share() -> f64 {
    0.70
}
fn default_under_served_share() -> f64 {
    0.10
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            min_impressions: default_min_impressions(),
            learning_max_age_days: default_learning_max_age_days(),
            fatigue_min_age_days: default_fatigue_min_age_days(),
            ctr_strong: default_ctr_strong(),
            ctr_weak: default_ctr_weak(),
            dwell_strong: default_dwell_strong(),
            dwell_weak: default_dwell_weak(),
            cpc_efficient: default_cpc_efficient(),
            cpc_inefficient: default_cpc_inefficient(),
            over_served_share: default_over_served_share(),
            under_served_share: default_under_served_share(),
        }
    }
}

impl ScoringThresholds {
    /// Reject threshold sets whose bands overlap or whose shares are not fractions.
    pub fn validate(&self) -> CoreResult<()> {
        let bands = [
            ("ctr", self.ctr_weak, self.ctr_strong),
            ("dwell", self.dwell_weak, self.dwell_strong),
            ("cpc", self.cpc_inefficient, self.cpc_efficient),
        ];
        for (name, weak, strong) in bands {
            if !weak.is_finite() || !strong.is_finite() || weak >= strong {
                return Err(ScoringError::InvalidThresholds(format!(
                    "{name} weak band {weak} must be below strong band {strong}"
                )));
            }
        }

        for (name, share) in [
            ("over_served_share", self.over_served_share),
            ("under_served_share", self.under_served_share),
        ] {
            if !(0.0..=1.0).contains(&share) {
                return Err(ScoringError::InvalidThresholds(format!(
                    "{name} must be within [0, 1], got {share}"
                )));
            }
        }
        if self.under_served_share >= self.over_served_share {
            return Err(ScoringError::InvalidThresholds(format!(
                "under_served_share {} must be below over_served_share {}",
                self.under_served_share, self.over_served_share
            )));
        }

        if self.learning_max_age_days >= self.fatigue_min_age_days {
            return Err(ScoringError::InvalidThresholds(format!(
                "learning phase ({} days) must end before fatigue risk starts ({} days)",
                self.learning_max_age_days, self.fatigue_min_age_days
            )));
        }

        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from `adscore.toml` (if present) and environment
    /// variables, then validate the scoring thresholds.
    pub fn load() -> CoreResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("adscore").required(false))
            .add_source(
                config::Environment::with_prefix("ADSCORE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.scoring.validate()?;
        Ok(config)
    }
}
