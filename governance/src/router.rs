//! Decidability routing.
//!
//! Maps (Channel A consensus, Channel B verdict, governance layer) to a
//! resolution route plus the friction the vote will carry. The table is
//! evaluated top to bottom; the first match wins:
//!
//! 1. L0 targets are rejected outright — the immutable layer cannot change.
//! 2. A Channel A failure is a hard gate.
//! 3. An AI interest conflict or Class IV sends the proposal to a
//!    human-majority jury.
//! 4. Class I goes to external formal verification.
//! 5. Class III goes to the constitutional jury.
//! 6. Class II is the standard voting path.

use concord_types::{
    ChannelAVerdict, ChannelBVerdict, DecidabilityClass, FrictionParams, GovernanceLayer,
    ProtocolParams,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a proposal goes after oracle review.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Rejected,
    StandardVoting,
    ConstitutionalJury,
    HumanMajorityJury,
    FormalVerification,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rejected => "rejected",
            Self::StandardVoting => "standard-voting",
            Self::ConstitutionalJury => "constitutional-jury",
            Self::HumanMajorityJury => "human-majority-jury",
            Self::FormalVerification => "formal-verification",
        };
        write!(f, "{s}")
    }
}

/// The router's output: route, friction, and a human-readable reason.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub route: Route,
    pub friction: FrictionParams,
    pub reason: String,
}

/// Route a proposal and compute its friction.
pub fn route_proposal(
    layer: GovernanceLayer,
    channel_a: &ChannelAVerdict,
    channel_b: &ChannelBVerdict,
    params: &ProtocolParams,
) -> RoutingDecision {
    let friction = compute_friction(layer, channel_b, params);

    if layer == GovernanceLayer::L0Immutable {
        return RoutingDecision {
            route: Route::Rejected,
            friction,
            reason: "the L0-Immutable layer cannot be modified".to_string(),
        };
    }
    if !channel_a.pass {
        return RoutingDecision {
            route: Route::Rejected,
            friction,
            reason: format!(
                "Channel A verification failed (complexity={}, paradox={}, cycle={})",
                channel_a.complexity_score, channel_a.paradox_found, channel_a.cycle_found
            ),
        };
    }
    if channel_b.ai_interest_conflict || channel_b.decidability_class == DecidabilityClass::IV {
        return RoutingDecision {
            route: Route::HumanMajorityJury,
            friction,
            reason: if channel_b.ai_interest_conflict {
                "AI interest conflict: the assessor recuses".to_string()
            } else {
                "Class IV: undecidable by AI, human majority required".to_string()
            },
        };
    }
    match channel_b.decidability_class {
        DecidabilityClass::I => RoutingDecision {
            route: Route::FormalVerification,
            friction,
            reason: "Class I: formally verifiable".to_string(),
        },
        DecidabilityClass::III => RoutingDecision {
            route: Route::ConstitutionalJury,
            friction,
            reason: "Class III: requires human judgment".to_string(),
        },
        _ => RoutingDecision {
            route: Route::StandardVoting,
            friction,
            reason: "Class II: standard voting".to_string(),
        },
    }
}

/// Compute friction for a proposal: base alignment friction, Class IV
/// overrides, then layer floors.
fn compute_friction(
    layer: GovernanceLayer,
    channel_b: &ChannelBVerdict,
    params: &ProtocolParams,
) -> FrictionParams {
    let mut friction = FrictionParams::from_alignment_score(channel_b.alignment_score);

    let class_iv =
        channel_b.ai_interest_conflict || channel_b.decidability_class == DecidabilityClass::IV;
    if class_iv {
        friction.quorum_multiplier *= 1.5;
        friction.timelock_multiplier *= 2.0;
        friction.required_quorum = FrictionParams::BASE_QUORUM * friction.quorum_multiplier;
        friction.timelock_duration_s =
            (FrictionParams::BASE_TIMELOCK_SECS as f64 * friction.timelock_multiplier) as u64;
        friction.required_quorum = friction.required_quorum.max(params.class_iv_min_quorum);
        friction.timelock_duration_s = friction
            .timelock_duration_s
            .max(params.class_iv_min_timelock_secs);
    }

    match layer {
        GovernanceLayer::L1Constitutional => {
            friction.required_quorum = friction.required_quorum.max(params.l1_min_quorum);
            friction.timelock_duration_s =
                friction.timelock_duration_s.max(params.l1_min_timelock_secs);
        }
        GovernanceLayer::L3Execution => {
            friction.required_quorum = friction.required_quorum.max(params.l3_min_quorum);
            friction.timelock_duration_s =
                friction.timelock_duration_s.max(params.l3_min_timelock_secs);
        }
        _ => {}
    }
    friction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing_a() -> ChannelAVerdict {
        ChannelAVerdict::pass(80)
    }

    fn b(score: f64, class: DecidabilityClass) -> ChannelBVerdict {
        ChannelBVerdict::new(score, class)
    }

    #[test]
    fn l0_always_rejects() {
        let params = ProtocolParams::default();
        let decision = route_proposal(
            GovernanceLayer::L0Immutable,
            &passing_a(),
            &b(1.0, DecidabilityClass::II),
            &params,
        );
        assert_eq!(decision.route, Route::Rejected);
    }

    #[test]
    fn channel_a_failure_is_a_hard_gate() {
        let params = ProtocolParams::default();
        let failed = ChannelAVerdict::fail(80, true, false);
        let decision = route_proposal(
            GovernanceLayer::L2Operational,
            &failed,
            &b(1.0, DecidabilityClass::II),
            &params,
        );
        assert_eq!(decision.route, Route::Rejected);
        assert!(decision.reason.contains("Channel A"));
    }

    #[test]
    fn class_ii_routes_to_standard_voting_with_expected_friction() {
        let params = ProtocolParams::default();
        let decision = route_proposal(
            GovernanceLayer::L2Operational,
            &passing_a(),
            &b(0.85, DecidabilityClass::II),
            &params,
        );
        assert_eq!(decision.route, Route::StandardVoting);
        assert!((decision.friction.required_quorum - 0.1075).abs() < 1e-9);
        assert_eq!(decision.friction.timelock_duration_s, 112_320);
    }

    #[test]
    fn class_i_routes_to_formal_verification() {
        let params = ProtocolParams::default();
        let decision = route_proposal(
            GovernanceLayer::L2Operational,
            &passing_a(),
            &b(0.9, DecidabilityClass::I),
            &params,
        );
        assert_eq!(decision.route, Route::FormalVerification);
    }

    #[test]
    fn class_iii_routes_to_jury() {
        let params = ProtocolParams::default();
        let decision = route_proposal(
            GovernanceLayer::L2Operational,
            &passing_a(),
            &b(0.6, DecidabilityClass::III),
            &params,
        );
        assert_eq!(decision.route, Route::ConstitutionalJury);
    }

    #[test]
    fn ai_conflict_forces_human_majority_with_floors() {
        let params = ProtocolParams::default();
        let verdict = b(0.95, DecidabilityClass::II).with_conflict();
        let decision = route_proposal(
            GovernanceLayer::L2Operational,
            &passing_a(),
            &verdict,
            &params,
        );
        assert_eq!(decision.route, Route::HumanMajorityJury);
        assert!(decision.friction.required_quorum >= 0.5);
        assert!(decision.friction.timelock_duration_s >= 7 * 86_400);
    }

    #[test]
    fn class_iv_overrides_scale_multipliers() {
        let params = ProtocolParams::default();
        let decision = route_proposal(
            GovernanceLayer::L2Operational,
            &passing_a(),
            &b(0.0, DecidabilityClass::IV),
            &params,
        );
        assert_eq!(decision.route, Route::HumanMajorityJury);
        // 1.5 × 1.5 and 3.0 × 2.0.
        assert!((decision.friction.quorum_multiplier - 2.25).abs() < 1e-9);
        assert!((decision.friction.timelock_multiplier - 6.0).abs() < 1e-9);
        assert_eq!(decision.friction.timelock_duration_s, 7 * 86_400);
    }

    #[test]
    fn l1_floors_apply() {
        let params = ProtocolParams::default();
        let decision = route_proposal(
            GovernanceLayer::L1Constitutional,
            &passing_a(),
            &b(1.0, DecidabilityClass::II),
            &params,
        );
        assert!(decision.friction.required_quorum >= 0.67);
        assert!(decision.friction.timelock_duration_s >= 30 * 86_400);
    }

    #[test]
    fn l3_floors_apply() {
        let params = ProtocolParams::default();
        let decision = route_proposal(
            GovernanceLayer::L3Execution,
            &passing_a(),
            &b(1.0, DecidabilityClass::II),
            &params,
        );
        assert!(decision.friction.required_quorum >= 0.05);
        assert!(decision.friction.timelock_duration_s >= 12 * 3_600);
    }
}
