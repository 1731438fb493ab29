use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery state of an ad as reported by the ad platform sync.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LifecycleStatus {
    Active,
    Paused,
    Archived,
    /// Any status the platform reports that we do not model explicitly.
    Other(String),
}

impl LifecycleStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Archived => "ARCHIVED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for LifecycleStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ACTIVE" => Self::Active,
            "PAUSED" => Self::Paused,
            "ARCHIVED" => Self::Archived,
            _ => Self::Other(raw),
        }
    }
}

impl From<LifecycleStatus> for String {
    fn from(status: LifecycleStatus) -> Self {
        match status {
            LifecycleStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery metrics for a single ad creative, as synced from the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdMetrics {
    pub id: String,
    pub name: String,
    pub status: LifecycleStatus,
    /// Click-through rate as a percentage (1.5 means 1.5%).
    pub ctr: f64,
    /// Average dwell time in seconds, `None` when the platform has no measurement.
    #[serde(default)]
    pub dwell_seconds: Option<f64>,
    #[serde(default)]
    pub cpc: Option<f64>,
    #[serde(default)]
    pub cpm: Option<f64>,
    pub impressions: u64,
    pub clicks: u64,
    /// Days since first delivery.
    pub age_days: u32,
    pub spend: f64,
}

/// Campaign-wide reference values every ad is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignBaseline {
    /// Aggregate CTR percentage; 0 when the campaign has no impressions.
    pub ctr: f64,
    /// Impression-weighted dwell over ads with a measured dwell.
    pub dwell_seconds: Option<f64>,
    pub cpc: Option<f64>,
    pub cpm: Option<f64>,
    pub total_impressions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBucket {
    Learning,
    Stable,
    FatigueRisk,
}

/// Classification of an engagement signal (CTR, dwell) against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    Strong,
    Weak,
    Neutral,
}

/// Classification of cost per click against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostStatus {
    Efficient,
    Inefficient,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionFlag {
    OverServed,
    UnderServed,
    #[default]
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueFlag {
    Fatigued,
    AgeingButOk,
    #[default]
    NotFatigued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contribution {
    HighContributor,
    NeutralContributor,
    WeakContributor,
    Learning,
    NotEvaluable,
}

/// Why the signals of an ad disagree, or why it cannot be judged yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    LearningPhaseUncertain,
    SeniorAudienceOrMessageDepth,
    CuriosityClicks,
    AlgorithmOverServingWeakAd,
    TopAdOverServed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    NoActionAdPaused,
    InsufficientData,
    AllowMoreTime,
    StrongMessageButCtaWeak,
    ImprovePostClickExperience,
    PauseOrReplace,
    CreateVariants,
    ScaleOrDuplicate,
    KeepRunning,
    RefreshOrReplaceCreative,
    ReduceImpressionShareOrPause,
    PauseOrOptimize,
}

macro_rules! wire_labels {
    ($ty:ty { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            /// Snake-case label used by the reporting layer.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_labels!(AgeBucket {
    Learning => "learning",
    Stable => "stable",
    FatigueRisk => "fatigue_risk",
});

wire_labels!(SignalStatus {
    Strong => "strong",
    Weak => "weak",
    Neutral => "neutral",
});

wire_labels!(CostStatus {
    Efficient => "efficient",
    Inefficient => "inefficient",
    Neutral => "neutral",
});

wire_labels!(DistributionFlag {
    OverServed => "over_served",
    UnderServed => "under_served",
    Normal => "normal",
});

wire_labels!(FatigueFlag {
    Fatigued => "fatigued",
    AgeingButOk => "ageing_but_ok",
    NotFatigued => "not_fatigued",
});

wire_labels!(Contribution {
    HighContributor => "high_contributor",
    NeutralContributor => "neutral_contributor",
    WeakContributor => "weak_contributor",
    Learning => "learning",
    NotEvaluable => "not_evaluable",
});

wire_labels!(ConflictReason {
    LearningPhaseUncertain => "learning_phase_uncertain",
    SeniorAudienceOrMessageDepth => "senior_audience_or_message_depth",
    CuriosityClicks => "curiosity_clicks",
    AlgorithmOverServingWeakAd => "algorithm_over_serving_weak_ad",
    TopAdOverServed => "top_ad_over_served",
});

wire_labels!(Recommendation {
    NoActionAdPaused => "no_action_ad_paused",
    InsufficientData => "insufficient_data",
    AllowMoreTime => "allow_more_time",
    StrongMessageButCtaWeak => "strong_message_but_cta_weak",
    ImprovePostClickExperience => "improve_post_click_experience",
    PauseOrReplace => "pause_or_replace",
    CreateVariants => "create_variants",
    ScaleOrDuplicate => "scale_or_duplicate",
    KeepRunning => "keep_running",
    RefreshOrReplaceCreative => "refresh_or_replace_creative",
    ReduceImpressionShareOrPause => "reduce_impression_share_or_pause",
    PauseOrOptimize => "pause_or_optimize",
});

/// Outcome of scoring one ad against its campaign baseline.
///
/// Fields past `impression_share` stay at their neutral values when an
/// early gate (paused, low volume, learning) short-circuits classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub ad: AdMetrics,
    pub age_bucket: Option<AgeBucket>,
    pub impression_share: f64,
    pub ctr_delta: Option<f64>,
    pub dwell_delta: Option<f64>,
    /// Positive when the ad is cheaper per click than the campaign.
    pub cpc_delta: Option<f64>,
    pub ctr_status: Option<SignalStatus>,
    pub dwell_status: Option<SignalStatus>,
    pub cpc_status: Option<CostStatus>,
    pub fatigue: FatigueFlag,
    pub distribution: DistributionFlag,
    /// `None` only for paused ads, which are never evaluated.
    pub contribution: Option<Contribution>,
    pub conflict: Option<ConflictReason>,
    pub recommendation: Recommendation,
    pub low_volume: bool,
}

impl ScoringResult {
    /// A result carrying only the echoed metrics and the given recommendation.
    pub fn neutral(ad: AdMetrics, impression_share: f64, recommendation: Recommendation) -> Self {
        Self {
            ad,
            age_bucket: None,
            impression_share,
            ctr_delta: None,
            dwell_delta: None,
            cpc_delta: None,
            ctr_status: None,
            dwell_status: None,
            cpc_status: None,
            fatigue: FatigueFlag::default(),
            distribution: DistributionFlag::default(),
            contribution: None,
            conflict: None,
            recommendation,
            low_volume: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_status_round_trips_unknown_values() {
        let status: LifecycleStatus = serde_json::from_str("\"IN_REVIEW\"").unwrap();
        assert_eq!(status, LifecycleStatus::Other("IN_REVIEW".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"IN_REVIEW\"");

        let paused: LifecycleStatus = serde_json::from_str("\"PAUSED\"").unwrap();
        assert_eq!(paused, LifecycleStatus::Paused);
    }

    #[test]
    fn test_labels_match_serde_names() {
        let json = serde_json::to_string(&Recommendation::ReduceImpressionShareOrPause).unwrap();
        assert_eq!(json, "\"reduce_impression_share_or_pause\"");
        assert_eq!(
            Recommendation::ReduceImpressionShareOrPause.as_str(),
            "reduce_impression_share_or_pause"
        );
        assert_eq!(AgeBucket::FatigueRisk.to_string(), "fatigue_risk");
        assert_eq!(
            serde_json::to_string(&ConflictReason::SeniorAudienceOrMessageDepth).unwrap(),
            "\"senior_audience_or_message_depth\""
        );
    }

    #[test]
    fn test_ad_metrics_optional_fields_default_to_none() {
        let json = r#"{
            "id": "ad-1",
            "name": "Spring hero",
            "status": "ACTIVE",
            "ctr": 1.2,
            "impressions": 4000,
            "clicks": 48,
            "age_days": 20,
            "spend": 120.0
        }"#;
        let ad: AdMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(ad.status, LifecycleStatus::Active);
        assert!(ad.dwell_seconds.is_none());
        assert!(ad.cpc.is_none());
        assert!(ad.cpm.is_none());
    }
}
