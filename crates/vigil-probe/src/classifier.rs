//! Response classification.
//!
//! Maps one raw probe outcome to a `HealthState` using the target's
//! configured body markers. Pure and deterministic; the ladder below is
//! evaluated in order, first match wins:
//!
//! 1. probe failed            → `Unreachable`
//! 2. status outside 200-399  → `Error`
//! 3. any placeholder marker  → `PlaceholderBuild`
//! 4. all production markers  → `Healthy` (only if any are configured)
//! 5. otherwise               → `Degraded`
//!
//! Marker classification is opt-in per target: with no markers
//! configured, the best reachable verdict is `Degraded`.

use vigil_core::{HealthState, ProbeError, ProbeOutcome, ProbeTarget};

/// Classify one probe outcome against its target's markers.
pub fn classify(outcome: &ProbeOutcome, target: &ProbeTarget) -> HealthState {
    if outcome.error != ProbeError::None {
        return HealthState::Unreachable;
    }

    if !(200..=399).contains(&outcome.status) {
        return HealthState::Error;
    }

    if target
        .placeholder_markers
        .iter()
        .any(|m| outcome.body_snippet.contains(m.as_str()))
    {
        return HealthState::PlaceholderBuild;
    }

    if !target.production_markers.is_empty()
        && target
            .production_markers
            .iter()
            .all(|m| outcome.body_snippet.contains(m.as_str()))
    {
        return HealthState::Healthy;
    }

    HealthState::Degraded
}
