//! Conflict resolution — an ordered table of special cases that override the
//! default recommendation for a fully classified ad.

use adscore_core::{
    ConflictReason, Contribution, DistributionFlag, FatigueFlag, Recommendation, SignalStatus,
};

/// The classified signals of one ad that the rules are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signals {
    pub ctr: Option<SignalStatus>,
    pub dwell: Option<SignalStatus>,
    pub distribution: DistributionFlag,
    pub fatigue: FatigueFlag,
    pub contribution: Contribution,
}

impl Signals {
    fn ctr_is(&self, status: SignalStatus) -> bool {
        self.ctr == Some(status)
    }

    fn dwell_is(&self, status: SignalStatus) -> bool {
        self.dwell == Some(status)
    }

    fn over_served(&self) -> bool {
        self.distribution == DistributionFlag::OverServed
    }
}

/// A single special case: when `applies` holds, the ad gets this conflict
/// reason and recommendation.
#[derive(Clone, Copy)]
pub struct ConflictRule {
    pub name: &'static str,
    pub applies: fn(&Signals) -> bool,
    pub conflict: ConflictReason,
    pub recommendation: Recommendation,
}

/// Special cases in evaluation order. The first matching rule wins.
pub const CONFLICT_RULES: &[ConflictRule] = &[
    ConflictRule {
        name: "weak_ctr_strong_dwell",
        applies: |s| s.ctr_is(SignalStatus::Weak) && s.dwell_is(SignalStatus::Strong),
        conflict: ConflictReason::SeniorAudienceOrMessageDepth,
        recommendation: Recommendation::StrongMessageButCtaWeak,
    },
    ConflictRule {
        name: "strong_ctr_weak_dwell",
        applies: |s| s.ctr_is(SignalStatus::Strong) && s.dwell_is(SignalStatus::Weak),
        conflict: ConflictReason::CuriosityClicks,
        recommendation: Recommendation::ImprovePostClickExperience,
    },
    ConflictRule {
        name: "over_served_weak_contributor",
        applies: |s| s.over_served() && s.contribution == Contribution::WeakContributor,
        conflict: ConflictReason::AlgorithmOverServingWeakAd,
        recommendation: Recommendation::PauseOrReplace,
    },
    ConflictRule {
        name: "over_served_high_contributor",
        applies: |s| s.over_served() && s.contribution == Contribution::HighContributor,
        conflict: ConflictReason::TopAdOverServed,
        recommendation: Recommendation::CreateVariants,
    },
];

/// Resolve the conflict reason and recommendation for a fully classified ad.
pub fn resolve(signals: &Signals) -> (Option<ConflictReason>, Recommendation) {
    match CONFLICT_RULES.iter().find(|rule| (rule.applies)(signals)) {
        Some(rule) => {
            tracing::debug!(rule = rule.name, "conflict rule matched");
            (Some(rule.conflict), rule.recommendation)
        }
        None => (None, default_recommendation(signals)),
    }
}

/// Recommendation when no special case applies.
pub fn default_recommendation(signals: &Signals) -> Recommendation {
    match signals.contribution {
        Contribution::HighContributor => Recommendation::ScaleOrDuplicate,
        Contribution::NeutralContributor => Recommendation::KeepRunning,
        Contribution::WeakContributor => {
            if signals.fatigue == FatigueFlag::Fatigued {
                Recommendation::RefreshOrReplaceCreative
            } else if signals.over_served() {
                Recommendation::ReduceImpressionShareOrPause
            } else {
                Recommendation::PauseOrOptimize
            }
        }
        Contribution::Learning => Recommendation::AllowMoreTime,
        Contribution::NotEvaluable => Recommendation::InsufficientData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(contribution: Contribution) -> Signals {
        Signals {
            ctr: Some(SignalStatus::Neutral),
            dwell: Some(SignalStatus::Neutral),
            distribution: DistributionFlag::Normal,
            fatigue: FatigueFlag::NotFatigued,
            contribution,
        }
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let names: Vec<_> = CONFLICT_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "weak_ctr_strong_dwell",
                "strong_ctr_weak_dwell",
                "over_served_weak_contributor",
                "over_served_high_contributor",
            ]
        );
    }

    #[test]
    fn test_signal_conflict_beats_over_serving() {
        // Weak CTR makes this a weak contributor that is also over-served;
        // the CTR/dwell disagreement is reported first.
        let s = Signals {
            ctr: Some(SignalStatus::Weak),
            dwell: Some(SignalStatus::Strong),
            distribution: DistributionFlag::OverServed,
            ..signals(Contribution::WeakContributor)
        };
        assert_eq!(
            resolve(&s),
            (
                Some(ConflictReason::SeniorAudienceOrMessageDepth),
                Recommendation::StrongMessageButCtaWeak
            )
        );
    }

    #[test]
    fn test_curiosity_clicks() {
        let s = Signals {
            ctr: Some(SignalStatus::Strong),
            dwell: Some(SignalStatus::Weak),
            ..signals(Contribution::WeakContributor)
        };
        assert_eq!(
            resolve(&s),
            (
                Some(ConflictReason::CuriosityClicks),
                Recommendation::ImprovePostClickExperience
            )
        );
    }

    #[test]
    fn test_over_served_rules() {
        // Weak through an inefficient CPC, which the signals do not carry.
        let weak = Signals {
            distribution: DistributionFlag::OverServed,
            ..signals(Contribution::WeakContributor)
        };
        assert_eq!(
            resolve(&weak),
            (
                Some(ConflictReason::AlgorithmOverServingWeakAd),
                Recommendation::PauseOrReplace
            )
        );

        let high = Signals {
            ctr: Some(SignalStatus::Strong),
            dwell: Some(SignalStatus::Strong),
            distribution: DistributionFlag::OverServed,
            ..signals(Contribution::HighContributor)
        };
        assert_eq!(
            resolve(&high),
            (Some(ConflictReason::TopAdOverServed), Recommendation::CreateVariants)
        );

        let neutral = Signals {
            distribution: DistributionFlag::OverServed,
            ..signals(Contribution::NeutralContributor)
        };
        assert_eq!(resolve(&neutral), (None, Recommendation::KeepRunning));
    }

    #[test]
    fn test_weak_defaults() {
        let fatigued = Signals {
            fatigue: FatigueFlag::Fatigued,
            ..signals(Contribution::WeakContributor)
        };
        assert_eq!(
            default_recommendation(&fatigued),
            Recommendation::RefreshOrReplaceCreative
        );

        let over_served = Signals {
            distribution: DistributionFlag::OverServed,
            ..signals(Contribution::WeakContributor)
        };
        assert_eq!(
            default_recommendation(&over_served),
            Recommendation::ReduceImpressionShareOrPause
        );

        assert_eq!(
            default_recommendation(&signals(Contribution::WeakContributor)),
            Recommendation::PauseOrOptimize
        );
        assert_eq!(
            default_recommendation(&signals(Contribution::HighContributor)),
            Recommendation::ScaleOrDuplicate
        );
    }
}
