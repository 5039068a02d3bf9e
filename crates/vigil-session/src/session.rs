//! The polling session state machine.
//!
//! One session = one bounded sequence of rounds. The driver owns the
//! session; probes never touch session state. Each round spawns one
//! probe task per target and awaits the handles in configuration order,
//! so concurrency affects timing but never the observable order of the
//! resulting `RoundResult`.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use vigil_core::{
    ConfigError, HealthState, ProbeError, ProbeOutcome, ProbeTarget, RoundResult,
    SessionOutcome, TargetReport, VerifyConfig,
};
use vigil_probe::{classify, probe, ProbeUrl};

/// Lifecycle state of a polling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Finished(SessionOutcome),
}

/// Terminal summary of a session run.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub outcome: SessionOutcome,
    /// The final round's classified results; the empty round when the
    /// session was cancelled before any round completed.
    pub last_round: RoundResult,
    pub rounds_completed: u32,
}

/// Bounded polling over a fixed set of endpoints.
pub struct PollingSession {
    base: ProbeUrl,
    targets: Vec<ProbeTarget>,
    max_attempts: u32,
    interval: Duration,
    timeout: Duration,
    attempt: u32,
    state: SessionState,
}

impl PollingSession {
    /// Build a session from a validated configuration.
    ///
    /// Fails fast on structural problems (no targets, zero attempt
    /// budget, duplicate paths) and on malformed URLs, before any
    /// polling begins.
    pub fn new(config: &VerifyConfig) -> Result<Self, ConfigError> {
        Self::with_timing(
            config,
            Duration::from_secs(config.poll.interval_secs),
            Duration::from_secs(config.poll.timeout_secs),
        )
    }

    /// Build a session with explicit durations.
    ///
    /// `vigil.toml` only expresses whole seconds; this constructor
    /// exists for drivers that need finer-grained intervals.
    pub fn with_timing(
        config: &VerifyConfig,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let base = ProbeUrl::parse(&config.service.base_url)?;
        for target in &config.targets {
            base.validate_target(target)?;
        }

        Ok(Self {
            base,
            targets: config.targets.clone(),
            max_attempts: config.poll.max_attempts,
            interval,
            timeout,
            attempt: 0,
            state: SessionState::Idle,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Rounds started so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Run the session to a terminal state.
    ///
    /// The cancellation signal is checked before each round and raced
    /// against the inter-round sleep. In-flight probes of the current
    /// round are always allowed to finish, so every observed round is a
    /// complete one.
    pub async fn run(&mut self, mut cancel: watch::Receiver<bool>) -> SessionResult {
        self.state = SessionState::Running;
        self.attempt = 0;
        let mut last_round = RoundResult::empty();

        info!(
            authority = self.base.authority(),
            targets = self.targets.len(),
            max_attempts = self.max_attempts,
            "verification session starting"
        );

        loop {
            if *cancel.borrow() {
                info!(rounds = self.attempt, "cancellation observed, aborting session");
                return self.finish(SessionOutcome::Aborted, last_round);
            }

            self.attempt += 1;
            let round = self.run_round(self.attempt).await;
            info!(
                attempt = round.attempt,
                healthy = round.healthy_count(),
                targets = round.targets.len(),
                "round complete"
            );

            let all_healthy = round.all_healthy();
            last_round = round;

            if all_healthy {
                return self.finish(SessionOutcome::Succeeded, last_round);
            }
            if self.attempt >= self.max_attempts {
                info!(attempts = self.attempt, "attempt budget exhausted");
                return self.finish(SessionOutcome::Exhausted, last_round);
            }

            // Sleep until the next round, racing cancellation. The
            // abort decision itself happens at the top of the loop.
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = cancel.changed() => {
                    if changed.is_err() {
                        // Sender dropped; cancellation can no longer arrive.
                        tokio::time::sleep(self.interval).await;
                    } else {
                        debug!("cancellation signal during inter-round sleep");
                    }
                }
            }
        }
    }

    /// One round: concurrent fan-out, ordered fan-in, classification.
    async fn run_round(&self, attempt: u32) -> RoundResult {
        let mut handles = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let base = self.base.clone();
            let target = target.clone();
            let timeout = self.timeout;
            handles.push(tokio::spawn(async move {
                let outcome = probe(&base, &target, timeout).await;
                let state = classify(&outcome, &target);
                debug!(
                    path = %target.path,
                    status = outcome.status,
                    elapsed_ms = outcome.elapsed_ms,
                    state = state.label(),
                    "target classified"
                );
                TargetReport {
                    path: target.path,
                    outcome,
                    state,
                }
            }));
        }

        let mut targets = Vec::with_capacity(handles.len());
        for (handle, target) in handles.into_iter().zip(&self.targets) {
            match handle.await {
                Ok(report) => targets.push(report),
                Err(e) => {
                    // A panicked probe task counts as unreachable.
                    warn!(path = %target.path, error = %e, "probe task failed");
                    targets.push(TargetReport {
                        path: target.path.clone(),
                        outcome: ProbeOutcome::failure(ProbeError::ConnectionFailed, 0),
                        state: HealthState::Unreachable,
                    });
                }
            }
        }

        RoundResult { attempt, targets }
    }

    fn finish(&mut self, outcome: SessionOutcome, last_round: RoundResult) -> SessionResult {
        self.state = SessionState::Finished(outcome);
        SessionResult {
            outcome,
            last_round,
            rounds_completed: self.attempt,
        }
    }
}
