//! Batch ranking — scores every ad of a campaign and orders the results for
//! presentation, most valuable first.

use std::cmp::Reverse;

use adscore_core::{AdMetrics, CampaignBaseline, Contribution, ScoringResult};
use rayon::prelude::*;
use tracing::info;

use crate::classifier::Classifier;

/// Score and rank a campaign with the default thresholds.
pub fn rank_campaign(ads: &[AdMetrics], baseline: &CampaignBaseline) -> Vec<ScoringResult> {
    rank_with(&Classifier::default(), ads, baseline)
}

/// Score every ad with `classifier` and sort the results.
///
/// Scoring is data-parallel; results are collected in input order before the
/// stable sort, so ties keep their input order.
pub fn rank_with(
    classifier: &Classifier,
    ads: &[AdMetrics],
    baseline: &CampaignBaseline,
) -> Vec<ScoringResult> {
    let mut results: Vec<ScoringResult> = ads
        .par_iter()
        .map(|ad| classifier.score(ad, baseline))
        .collect();

    results.sort_by_key(|r| (contribution_priority(r.contribution), Reverse(r.ad.impressions)));

    metrics::counter!("scoring.campaigns_ranked").increment(1);
    metrics::counter!("scoring.ads_scored").increment(results.len() as u64);
    for result in &results {
        metrics::counter!(
            "scoring.recommendations",
            "recommendation" => result.recommendation.as_str()
        )
        .increment(1);
    }

    info!(
        ads = results.len(),
        baseline_ctr = baseline.ctr,
        total_impressions = baseline.total_impressions,
        "Campaign ranked"
    );

    results
}

/// Display priority of a contribution class; lower is shown first.
pub fn contribution_priority(contribution: Option<Contribution>) -> u8 {
    match contribution {
        Some(Contribution::HighContributor) => 0,
        Some(Contribution::NeutralContributor) => 1,
        Some(Contribution::WeakContributor) => 2,
        Some(Contribution::Learning) => 3,
        Some(Contribution::NotEvaluable) => 4,
        None => 5,
    }
}
