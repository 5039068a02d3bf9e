//! Report assembly.
//!
//! `build()` is a pure function: the timestamp is injected by the
//! caller, so identical inputs always produce identical reports. The
//! recommendation table is total: every histogram shape maps to at
//! least one recommendation.

use vigil_core::{Report, RoundResult, SessionOutcome, StateHistogram};

/// Aggregate the final round of a session into a `Report`.
///
/// `generated_at` is epoch seconds, supplied by the caller.
pub fn build(last_round: &RoundResult, outcome: SessionOutcome, generated_at: u64) -> Report {
    let mut histogram = StateHistogram::default();
    for target in &last_round.targets {
        histogram.record(target.state);
    }

    Report {
        outcome,
        success_rate: last_round.success_rate(),
        recommendations: recommend(&histogram),
        histogram,
        rounds_completed: last_round.attempt,
        generated_at,
    }
}

/// The fixed recommendation table.
///
/// Rules fire independently so a mixed round collects every applicable
/// recommendation; the all-healthy and no-data shapes short-circuit.
fn recommend(histogram: &StateHistogram) -> Vec<String> {
    let total = histogram.total();
    let mut out = Vec::new();

    if total == 0 {
        out.push(
            "verification aborted before any round completed; re-run to gather results"
                .to_string(),
        );
        return out;
    }

    if histogram.healthy == total {
        out.push("deployment verified; all endpoints healthy, safe to proceed".to_string());
        return out;
    }

    if histogram.placeholder_build > 0 {
        out.push(
            "placeholder content detected; build likely still in progress, wait and re-poll"
                .to_string(),
        );
    }

    if histogram.unreachable == total {
        out.push("all endpoints unreachable; check service and network configuration".to_string());
    } else if histogram.unreachable > 0 {
        out.push("some endpoints unreachable; check routing for the failing paths".to_string());
    }

    if histogram.error > 0 && histogram.healthy > 0 {
        out.push(
            "mixed healthy and error responses; investigate failing endpoints individually"
                .to_string(),
        );
    } else if histogram.error > 0 {
        out.push("endpoints returning error status; check application logs".to_string());
    }

    if histogram.degraded > 0 {
        out.push(
            "endpoints reachable but content inconclusive; verify expected markers are configured"
                .to_string(),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{HealthState, ProbeError, ProbeOutcome, TargetReport};

    fn entry(path: &str, state: HealthState) -> TargetReport {
        let outcome = match state {
            HealthState::Unreachable => ProbeOutcome::failure(ProbeError::Timeout, 2000),
            HealthState::Error => ProbeOutcome::response(503, "upstream down".to_string(), 8),
            _ => ProbeOutcome::response(200, "body".to_string(), 8),
        };
        TargetReport {
            path: path.to_string(),
            outcome,
            state,
        }
    }

    fn round(attempt: u32, states: &[HealthState]) -> RoundResult {
        RoundResult {
            attempt,
            targets: states
                .iter()
                .enumerate()
                .map(|(i, state)| entry(&format!("/t{i}"), *state))
                .collect(),
        }
    }

    #[test]
    fn build_is_idempotent() {
        let last = round(2, &[HealthState::Healthy, HealthState::Degraded]);
        let a = build(&last, SessionOutcome::Exhausted, 1_700_000_000);
        let b = build(&last, SessionOutcome::Exhausted, 1_700_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn build_tallies_the_last_round() {
        let last = round(
            3,
            &[
                HealthState::Healthy,
                HealthState::Healthy,
                HealthState::Error,
                HealthState::Unreachable,
            ],
        );
        let report = build(&last, SessionOutcome::Exhausted, 42);

        assert_eq!(report.histogram.healthy, 2);
        assert_eq!(report.histogram.error, 1);
        assert_eq!(report.histogram.unreachable, 1);
        assert_eq!(report.histogram.total(), 4);
        assert_eq!(report.rounds_completed, 3);
        assert_eq!(report.generated_at, 42);
        assert!((report.success_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn all_healthy_recommends_proceeding() {
        let last = round(1, &[HealthState::Healthy, HealthState::Healthy]);
        let report = build(&last, SessionOutcome::Succeeded, 0);
        assert_eq!(report.recommendations.len(), 1);
        assert!(report.recommendations[0].contains("safe to proceed"));
    }

    #[test]
    fn placeholder_round_recommends_repolling() {
        // Mixed round: one healthy, one placeholder, one timed out.
        let last = round(
            1,
            &[
                HealthState::Healthy,
                HealthState::PlaceholderBuild,
                HealthState::Unreachable,
            ],
        );
        let report = build(&last, SessionOutcome::Exhausted, 0);

        assert!((report.success_rate - 1.0 / 3.0).abs() < 1e-9);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("wait and re-poll")));
    }

    #[test]
    fn all_unreachable_points_at_the_network() {
        let last = round(2, &[HealthState::Unreachable, HealthState::Unreachable]);
        let report = build(&last, SessionOutcome::Exhausted, 0);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("check service and network configuration")));
    }

    #[test]
    fn mixed_error_and_healthy_recommends_per_endpoint_investigation() {
        let last = round(1, &[HealthState::Error, HealthState::Healthy]);
        let report = build(&last, SessionOutcome::Exhausted, 0);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("investigate failing endpoints individually")));
    }

    #[test]
    fn aborted_before_any_round_still_gets_a_recommendation() {
        let report = build(&RoundResult::empty(), SessionOutcome::Aborted, 0);
        assert_eq!(report.rounds_completed, 0);
        assert_eq!(report.success_rate, 0.0);
        assert!(report.recommendations[0].contains("re-run"));
    }

    #[test]
    fn recommendation_table_is_total() {
        // Every histogram shape over a small grid yields at least one
        // recommendation.
        for unreachable in 0..=2u32 {
            for error in 0..=2u32 {
                for placeholder in 0..=2u32 {
                    for degraded in 0..=2u32 {
                        for healthy in 0..=2u32 {
                            let histogram = StateHistogram {
                                unreachable,
                                error,
                                placeholder_build: placeholder,
                                degraded,
                                healthy,
                            };
                            assert!(
                                !recommend(&histogram).is_empty(),
                                "no recommendation for {histogram:?}"
                            );
                        }
                    }
                }
            }
        }
    }
}
