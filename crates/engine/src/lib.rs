//! Ad performance scoring — campaign baselines, per-ad classification into
//! contribution classes and recommendations, and display ranking.

pub mod baseline;
pub mod classifier;
pub mod ranker;
pub mod rules;
pub mod scorecard;

pub use baseline::{compute_baseline, impression_share};
pub use classifier::{score_ad, Classifier};
pub use ranker::{rank_campaign, rank_with};
pub use scorecard::{score_campaign, CampaignScorecard};
