//! Campaign scorecard — baseline, ranked ads and roll-up counts in one
//! structure for the reporting layer.

use std::collections::BTreeMap;

use adscore_core::{
    AdMetrics, CampaignBaseline, Contribution, DistributionFlag, Recommendation, ScoringResult,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::baseline::compute_baseline;
use crate::classifier::Classifier;
use crate::ranker::rank_with;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignScorecard {
    pub baseline: CampaignBaseline,
    /// Ranked results, most valuable first.
    pub ads: Vec<ScoringResult>,
    pub contribution_counts: BTreeMap<Contribution, usize>,
    pub recommendation_counts: BTreeMap<Recommendation, usize>,
    pub total_spend: f64,
    pub low_volume_ads: usize,
    pub paused_ads: usize,
    /// Weak contributors, worst-served first.
    pub needs_attention: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Compute the baseline, rank every ad and roll up the results.
pub fn score_campaign(ads: &[AdMetrics], classifier: &Classifier) -> CampaignScorecard {
    let baseline = compute_baseline(ads);
    let ranked = rank_with(classifier, ads, &baseline);

    let mut contribution_counts = BTreeMap::new();
    let mut recommendation_counts = BTreeMap::new();
    for result in &ranked {
        if let Some(contribution) = result.contribution {
            *contribution_counts.entry(contribution).or_insert(0) += 1;
        }
        *recommendation_counts.entry(result.recommendation).or_insert(0) += 1;
    }

    CampaignScorecard {
        baseline,
        contribution_counts,
        recommendation_counts,
        total_spend: ads.iter().map(|a| a.spend).sum(),
        low_volume_ads: ranked.iter().filter(|r| r.low_volume).count(),
        paused_ads: ranked
            .iter()
            .filter(|r| r.recommendation == Recommendation::NoActionAdPaused)
            .count(),
        needs_attention: needs_attention(&ranked),
        ads: ranked,
        generated_at: Utc::now(),
    }
}

/// Ids of weak contributors, with ads the delivery algorithm over-serves
/// listed before the rest. Otherwise keeps ranking order.
fn needs_attention(ranked: &[ScoringResult]) -> Vec<String> {
    let (over_served, rest): (Vec<&ScoringResult>, Vec<&ScoringResult>) = ranked
        .iter()
        .filter(|r| r.contribution == Some(Contribution::WeakContributor))
        .partition(|r| r.distribution == DistributionFlag::OverServed);

    over_served
        .into_iter()
        .chain(rest)
        .map(|r| r.ad.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adscore_core::{ConflictReason, LifecycleStatus};

    fn ad(id: &str, impressions: u64, clicks: u64, dwell: f64, spend: f64) -> AdMetrics {
        AdMetrics {
            id: id.to_string(),
            name: id.to_string(),
            status: LifecycleStatus::Active,
            ctr: clicks as f64 / impressions as f64 * 100.0,
            dwell_seconds: Some(dwell),
            cpc: (clicks > 0).then(|| spend / clicks as f64),
            cpm: Some(spend / impressions as f64 * 1000.0),
            impressions,
            clicks,
            age_days: 40,
            spend,
        }
    }

    #[test]
    fn test_roll_up_counts() {
        let mut paused = ad("paused", 3000, 30, 5.0, 10.0);
        paused.status = LifecycleStatus::Paused;
        let ads = vec![
            // Dominant, clicks poorly and costs more per click.
            ad("bulk", 80_000, 400, 5.0, 400.0),
            ad("gem", 15_000, 450, 9.0, 90.0),
            ad("tiny", 400, 4, 5.0, 2.0),
            paused,
        ];

        let card = score_campaign(&ads, &Classifier::default());

        assert_eq!(card.ads.len(), 4);
        assert_eq!(card.baseline.total_impressions, 98_400);
        assert_eq!(card.low_volume_ads, 1);
        assert_eq!(card.paused_ads, 1);
        assert!((card.total_spend - 502.0).abs() < 1e-9);
        assert_eq!(card.ads[0].ad.id, "gem");
        assert_eq!(
            card.contribution_counts.get(&Contribution::WeakContributor),
            Some(&1)
        );
        assert_eq!(
            card.recommendation_counts.get(&Recommendation::PauseOrReplace),
            Some(&1)
        );
        assert_eq!(card.needs_attention, vec!["bulk".to_string()]);
    }

    #[test]
    fn test_over_served_weak_ads_listed_first() {
        let weak = |id: &str,
                    distribution: DistributionFlag,
                    conflict: Option<ConflictReason>| ScoringResult {
            contribution: Some(Contribution::WeakContributor),
            distribution,
            conflict,
            ..ScoringResult::neutral(
                ad(id, 5000, 10, 2.0, 5.0),
                0.05,
                Recommendation::PauseOrOptimize,
            )
        };
        let ranked = vec![
            weak("a", DistributionFlag::Normal, None),
            weak(
                "b",
                DistributionFlag::OverServed,
                Some(ConflictReason::AlgorithmOverServingWeakAd),
            ),
            // Over-served, but the CTR/dwell conflict took the rule slot.
            weak(
                "c",
                DistributionFlag::OverServed,
                Some(ConflictReason::CuriosityClicks),
            ),
            ScoringResult {
                contribution: Some(Contribution::NeutralContributor),
                distribution: DistributionFlag::OverServed,
                ..ScoringResult::neutral(
                    ad("d", 5000, 10, 2.0, 5.0),
                    0.8,
                    Recommendation::KeepRunning,
                )
            },
        ];
        assert_eq!(
            needs_attention(&ranked),
            vec!["b".to_string(), "c".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn test_serializes_with_wire_labels() {
        // A single ad is its own baseline, so every delta is zero.
        let card = score_campaign(&[ad("solo", 15_000, 450, 9.0, 90.0)], &Classifier::default());
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["contribution_counts"]["neutral_contributor"], 1);
        assert_eq!(json["ads"][0]["recommendation"], "keep_running");
        assert_eq!(json["ads"][0]["distribution"], "over_served");
    }
}
