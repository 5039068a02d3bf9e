//! Domain types for deployment health verification.
//!
//! These types flow through the whole engine: a `ProbeTarget` describes
//! one endpoint to check, a `ProbeOutcome` records one HTTP attempt, a
//! `HealthState` classifies that attempt, and a `RoundResult` collects
//! one classified entry per target for a polling round. All types are
//! serializable so the final report can be written as a JSON artifact.

use serde::{Deserialize, Serialize};

/// Maximum number of characters of a response body kept in a snippet.
pub const BODY_SNIPPET_MAX: usize = 200;

// ── Targets ───────────────────────────────────────────────────────

/// One endpoint to probe, with optional body markers for classification.
///
/// Marker-based classification is opt-in per target: a target with no
/// markers can only resolve to `Unreachable`, `Error`, or `Degraded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTarget {
    /// URL suffix probed on the target service (e.g., "/healthz").
    pub path: String,
    /// Body substrings indicating a placeholder build is still deployed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placeholder_markers: Vec<String>,
    /// Body substrings that must all be present for a `Healthy` verdict.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub production_markers: Vec<String>,
}

impl ProbeTarget {
    /// A target with no body markers configured.
    pub fn bare(path: &str) -> Self {
        Self {
            path: path.to_string(),
            placeholder_markers: Vec::new(),
            production_markers: Vec::new(),
        }
    }
}

// ── Probe outcomes ────────────────────────────────────────────────

/// Failure mode of one probe attempt.
///
/// `None` means the HTTP exchange completed; the status code may still
/// be 4xx/5xx, which is the classifier's judgment, not the prober's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeError {
    None,
    Timeout,
    ConnectionFailed,
}

/// Raw result of one HTTP attempt against one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// HTTP status code; 0 when the attempt failed before a response.
    pub status: u16,
    /// Bounded-length prefix of the response body.
    pub body_snippet: String,
    /// Wall-clock time spent on the attempt.
    pub elapsed_ms: u64,
    /// Failure mode, if any.
    pub error: ProbeError,
}

impl ProbeOutcome {
    /// An outcome for a completed HTTP exchange.
    pub fn response(status: u16, body_snippet: String, elapsed_ms: u64) -> Self {
        Self {
            status,
            body_snippet,
            elapsed_ms,
            error: ProbeError::None,
        }
    }

    /// An outcome for an attempt that failed before a response arrived.
    pub fn failure(error: ProbeError, elapsed_ms: u64) -> Self {
        Self {
            status: 0,
            body_snippet: String::new(),
            elapsed_ms,
            error,
        }
    }
}

// ── Health states ─────────────────────────────────────────────────

/// Classification of one probe outcome.
///
/// Declaration order is the total order of goodness:
/// `Unreachable < Error < PlaceholderBuild < Degraded < Healthy`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// The probe never completed (timeout or connection failure).
    Unreachable,
    /// The endpoint responded outside the 200-399 range.
    Error,
    /// The body matched a configured placeholder marker.
    PlaceholderBuild,
    /// Reachable and in range, but content markers were inconclusive.
    Degraded,
    /// The body matched all configured production markers.
    Healthy,
}

impl HealthState {
    /// Stable lowercase label for rendering.
    pub fn label(&self) -> &'static str {
        match self {
            HealthState::Unreachable => "unreachable",
            HealthState::Error => "error",
            HealthState::PlaceholderBuild => "placeholder_build",
            HealthState::Degraded => "degraded",
            HealthState::Healthy => "healthy",
        }
    }
}

// ── Rounds ────────────────────────────────────────────────────────

/// One target's classified result within a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetReport {
    pub path: String,
    pub outcome: ProbeOutcome,
    pub state: HealthState,
}

/// The classified results of one polling round.
///
/// Entry order is configuration order, regardless of the completion
/// order of the underlying concurrent probes. Invariant: exactly one
/// entry per configured target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based attempt number; 0 only for the empty pre-round result.
    pub attempt: u32,
    pub targets: Vec<TargetReport>,
}

impl RoundResult {
    /// The result of a session that never completed a round.
    pub fn empty() -> Self {
        Self {
            attempt: 0,
            targets: Vec::new(),
        }
    }

    /// Number of targets classified `Healthy` this round.
    pub fn healthy_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| t.state == HealthState::Healthy)
            .count()
    }

    /// Whether every target classified `Healthy`. False for the empty round.
    pub fn all_healthy(&self) -> bool {
        !self.targets.is_empty() && self.healthy_count() == self.targets.len()
    }

    /// Healthy targets / total targets, 0.0 for the empty round.
    pub fn success_rate(&self) -> f64 {
        if self.targets.is_empty() {
            return 0.0;
        }
        self.healthy_count() as f64 / self.targets.len() as f64
    }
}

// ── Session terminal state ────────────────────────────────────────

/// How a polling session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Every target classified `Healthy` in the same round.
    Succeeded,
    /// `max_attempts` rounds completed without full success.
    Exhausted,
    /// External cancellation was observed.
    Aborted,
}

impl SessionOutcome {
    /// Stable lowercase label for rendering.
    pub fn label(&self) -> &'static str {
        match self {
            SessionOutcome::Succeeded => "succeeded",
            SessionOutcome::Exhausted => "exhausted",
            SessionOutcome::Aborted => "aborted",
        }
    }
}

// ── Report ────────────────────────────────────────────────────────

/// Count of targets per health state across the last round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHistogram {
    pub unreachable: u32,
    pub error: u32,
    pub placeholder_build: u32,
    pub degraded: u32,
    pub healthy: u32,
}

impl StateHistogram {
    /// Tally one classified target.
    pub fn record(&mut self, state: HealthState) {
        match state {
            HealthState::Unreachable => self.unreachable += 1,
            HealthState::Error => self.error += 1,
            HealthState::PlaceholderBuild => self.placeholder_build += 1,
            HealthState::Degraded => self.degraded += 1,
            HealthState::Healthy => self.healthy += 1,
        }
    }

    /// Total targets tallied.
    pub fn total(&self) -> u32 {
        self.unreachable + self.error + self.placeholder_build + self.degraded + self.healthy
    }
}

/// Final artifact of a verification session.
///
/// Immutable once built. `generated_at` is epoch seconds, injected by
/// the caller so report building stays a pure function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub outcome: SessionOutcome,
    /// Healthy targets / total targets in the last round.
    pub success_rate: f64,
    pub histogram: StateHistogram,
    /// Narrative next steps derived from the histogram.
    pub recommendations: Vec<String>,
    pub rounds_completed: u32,
    /// Unix timestamp (seconds) when this report was generated.
    pub generated_at: u64,
}
