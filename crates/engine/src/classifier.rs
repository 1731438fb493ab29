//! Ad classifier — maps one ad and its campaign baseline to a scoring result.
//!
//! Scoring runs through three gates before full classification:
//!   1. paused ads are skipped,
//!   2. ads below the impression floor are not evaluable,
//!   3. ads still in their learning phase get deltas but no judgement.
//! Every gate returns a complete result; nothing is filled in after it.

use adscore_core::{
    AdMetrics, AgeBucket, CampaignBaseline, ConflictReason, Contribution, CostStatus,
    DistributionFlag, FatigueFlag, LifecycleStatus, Recommendation, ScoringResult,
    ScoringThresholds, SignalStatus,
};
use tracing::debug;

use crate::baseline::impression_share;
use crate::rules::{self, Signals};

/// Score one ad with the default thresholds.
pub fn score_ad(ad: &AdMetrics, baseline: &CampaignBaseline) -> ScoringResult {
    Classifier::default().score(ad, baseline)
}

/// Relative deltas of an ad against the baseline. `None` when the baseline
/// (or the ad) has no usable value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Deltas {
    pub ctr: Option<f64>,
    pub dwell: Option<f64>,
    /// Sign is inverted: cheaper than baseline is positive.
    pub cpc: Option<f64>,
}

impl Deltas {
    pub fn compute(ad: &AdMetrics, baseline: &CampaignBaseline) -> Self {
        let ctr = (baseline.ctr > 0.0).then(|| (ad.ctr - baseline.ctr) / baseline.ctr);

        let dwell = match (ad.dwell_seconds, baseline.dwell_seconds) {
            (Some(value), Some(base)) if base > 0.0 => Some((value - base) / base),
            _ => None,
        };

        let cpc = match (ad.cpc, baseline.cpc) {
            (Some(value), Some(base)) if base > 0.0 => Some((base - value) / base),
            _ => None,
        };

        Self { ctr, dwell, cpc }
    }
}

/// Threshold-driven ad classifier. Holds nothing but its thresholds.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: ScoringThresholds,
}

impl Classifier {
    pub fn new(thresholds: ScoringThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ScoringThresholds {
        &self.thresholds
    }

    pub fn score(&self, ad: &AdMetrics, baseline: &CampaignBaseline) -> ScoringResult {
        let share = impression_share(ad, baseline);

        if ad.status == LifecycleStatus::Paused {
            debug!(ad_id = %ad.id, gate = "paused", "Scoring stopped at gate");
            return ScoringResult::neutral(ad.clone(), share, Recommendation::NoActionAdPaused);
        }

        if ad.impressions < self.thresholds.min_impressions {
            debug!(
                ad_id = %ad.id,
                gate = "low_volume",
                impressions = ad.impressions,
                "Scoring stopped at gate"
            );
            return ScoringResult {
                low_volume: true,
                contribution: Some(Contribution::NotEvaluable),
                ..ScoringResult::neutral(ad.clone(), share, Recommendation::InsufficientData)
            };
        }

        let age_bucket = self.age_bucket(ad.age_days);
        let deltas = Deltas::compute(ad, baseline);

        if age_bucket == AgeBucket::Learning {
            debug!(
                ad_id = %ad.id,
                gate = "learning",
                age_days = ad.age_days,
                "Scoring stopped at gate"
            );
            return ScoringResult {
                age_bucket: Some(AgeBucket::Learning),
                ctr_delta: deltas.ctr,
                dwell_delta: deltas.dwell,
                cpc_delta: deltas.cpc,
                contribution: Some(Contribution::Learning),
                conflict: Some(ConflictReason::LearningPhaseUncertain),
                ..ScoringResult::neutral(ad.clone(), share, Recommendation::AllowMoreTime)
            };
        }

        let t = &self.thresholds;
        let ctr_status = deltas.ctr.map(|d| signal_status(d, t.ctr_strong, t.ctr_weak));
        let dwell_status = deltas
            .dwell
            .map(|d| signal_status(d, t.dwell_strong, t.dwell_weak));
        let cpc_status = deltas
            .cpc
            .map(|d| cost_status(d, t.cpc_efficient, t.cpc_inefficient));

        let distribution = self.distribution(share);
        let fatigue = fatigue_flag(age_bucket, ctr_status, dwell_status);
        let contribution = classify_contribution(ctr_status, dwell_status, cpc_status);

        let (conflict, recommendation) = rules::resolve(&Signals {
            ctr: ctr_status,
            dwell: dwell_status,
            distribution,
            fatigue,
            contribution,
        });

        debug!(
            ad_id = %ad.id,
            contribution = contribution.as_str(),
            recommendation = recommendation.as_str(),
            "Ad classified"
        );

        ScoringResult {
            ad: ad.clone(),
            age_bucket: Some(age_bucket),
            impression_share: share,
            ctr_delta: deltas.ctr,
            dwell_delta: deltas.dwell,
            cpc_delta: deltas.cpc,
            ctr_status,
            dwell_status,
            cpc_status,
            fatigue,
            distribution,
            contribution: Some(contribution),
            conflict,
            recommendation,
            low_volume: false,
        }
    }

    pub fn age_bucket(&self, age_days: u32) -> AgeBucket {
        if age_days <= self.thresholds.learning_max_age_days {
            AgeBucket::Learning
        } else if age_days >= self.thresholds.fatigue_min_age_days {
            AgeBucket::FatigueRisk
        } else {
            AgeBucket::Stable
        }
    }

    pub fn distribution(&self, impression_share: f64) -> DistributionFlag {
        if impression_share >= self.thresholds.over_served_share {
            DistributionFlag::OverServed
        } else if impression_share < self.thresholds.under_served_share {
            DistributionFlag::UnderServed
        } else {
            DistributionFlag::Normal
        }
    }
}

fn signal_status(delta: f64, strong: f64, weak: f64) -> SignalStatus {
    if delta >= strong {
        SignalStatus::Strong
    } else if delta <= weak {
        SignalStatus::Weak
    } else {
        SignalStatus::Neutral
    }
}

fn cost_status(delta: f64, efficient: f64, inefficient: f64) -> CostStatus {
    if delta >= efficient {
        CostStatus::Efficient
    } else if delta <= inefficient {
        CostStatus::Inefficient
    } else {
        CostStatus::Neutral
    }
}

fn fatigue_flag(
    bucket: AgeBucket,
    ctr: Option<SignalStatus>,
    dwell: Option<SignalStatus>,
) -> FatigueFlag {
    if bucket != AgeBucket::FatigueRisk {
        return FatigueFlag::NotFatigued;
    }
    if ctr == Some(SignalStatus::Weak) || dwell == Some(SignalStatus::Weak) {
        FatigueFlag::Fatigued
    } else {
        FatigueFlag::AgeingButOk
    }
}

/// High requires every signal to be good; any weak signal otherwise makes the
/// ad a weak contributor.
fn classify_contribution(
    ctr: Option<SignalStatus>,
    dwell: Option<SignalStatus>,
    cpc: Option<CostStatus>,
) -> Contribution {
    let cpc_acceptable = matches!(cpc, Some(CostStatus::Efficient | CostStatus::Neutral));

    if ctr == Some(SignalStatus::Strong) && dwell == Some(SignalStatus::Strong) && cpc_acceptable {
        Contribution::HighContributor
    } else if ctr == Some(SignalStatus::Weak)
        || dwell == Some(SignalStatus::Weak)
        || cpc == Some(CostStatus::Inefficient)
    {
        Contribution::WeakContributor
    } else {
        Contribution::NeutralContributor
    }
}
