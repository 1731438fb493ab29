//! Campaign baseline aggregation — reduces per-ad delivery metrics into the
//! reference values every ad is scored against.

use adscore_core::{AdMetrics, CampaignBaseline};

/// Derive campaign baseline statistics from the current ad set.
///
/// The result depends only on the multiset of ads, never their order.
pub fn compute_baseline(ads: &[AdMetrics]) -> CampaignBaseline {
    let total_impressions: u64 = ads.iter().map(|a| a.impressions).sum();
    let total_clicks: u64 = ads.iter().map(|a| a.clicks).sum();
    let total_spend: f64 = ads.iter().map(|a| a.spend).sum();

    let ctr = if total_impressions > 0 {
        total_clicks as f64 / total_impressions as f64 * 100.0
    } else {
        0.0
    };

    let cpc = if total_clicks > 0 {
        Some(total_spend / total_clicks as f64)
    } else {
        None
    };

    let cpm = if total_impressions > 0 {
        Some(total_spend / total_impressions as f64 * 1000.0)
    } else {
        None
    };

    CampaignBaseline {
        ctr,
        dwell_seconds: weighted_dwell(ads),
        cpc,
        cpm,
        total_impressions,
    }
}

/// Impression-weighted dwell over ads with a measured, positive dwell.
fn weighted_dwell(ads: &[AdMetrics]) -> Option<f64> {
    let (weighted_sum, weight) = ads
        .iter()
        .filter_map(|a| match a.dwell_seconds {
            Some(dwell) if dwell > 0.0 => Some((dwell, a.impressions as f64)),
            _ => None,
        })
        .fold((0.0_f64, 0.0_f64), |(sum, total), (dwell, impressions)| {
            (sum + dwell * impressions, total + impressions)
        });

    if weight > 0.0 {
        Some(weighted_sum / weight)
    } else {
        None
    }
}

/// Fraction of the campaign's impressions delivered by one ad.
pub fn impression_share(ad: &AdMetrics, baseline: &CampaignBaseline) -> f64 {
    if baseline.total_impressions > 0 {
        ad.impressions as f64 / baseline.total_impressions as f64
    } else {
        0.0
    }
}
