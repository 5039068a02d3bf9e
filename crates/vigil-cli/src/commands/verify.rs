//! `vigil verify` — run one verification session to completion.
//!
//! Loads the configuration, applies command-line overrides, runs the
//! session with Ctrl-C wired to cooperative cancellation, then prints
//! the round detail and report summary and delivers the artifact.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::watch;
use tracing::info;

use vigil_core::{SessionOutcome, VerifyConfig};
use vigil_report::{build, render_round, ConsoleNotifier, FileSink, ReportSink};
use vigil_session::PollingSession;

/// Command-line overrides for `[poll]` values.
#[derive(Debug, Default, Clone, Copy)]
pub struct PollOverrides {
    pub max_attempts: Option<u32>,
    pub interval_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
}

impl PollOverrides {
    fn apply(&self, config: &mut VerifyConfig) {
        if let Some(v) = self.max_attempts {
            config.poll.max_attempts = v;
        }
        if let Some(v) = self.interval_secs {
            config.poll.interval_secs = v;
        }
        if let Some(v) = self.timeout_secs {
            config.poll.timeout_secs = v;
        }
    }
}

/// Run the `vigil verify` command. Returns the session's terminal state.
pub async fn run(
    config_path: &str,
    report_file: Option<&str>,
    overrides: PollOverrides,
) -> anyhow::Result<SessionOutcome> {
    let mut config = VerifyConfig::from_file(Path::new(config_path))?;
    overrides.apply(&mut config);

    let mut session = PollingSession::new(&config)?;

    // Ctrl-C cancels cooperatively: the current round finishes, no new
    // round starts.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, aborting after the current round");
            let _ = cancel_tx.send(true);
        }
    });

    let result = session.run(cancel_rx).await;
    let report = build(&result.last_round, result.outcome, epoch_secs());

    print!("{}", render_round(&result.last_round));
    ConsoleNotifier.deliver(&report)?;
    if let Some(path) = report_file {
        FileSink::new(path).deliver(&report)?;
    }

    Ok(result.outcome)
}

/// Map a terminal state to the process exit code.
pub fn exit_code(outcome: SessionOutcome) -> i32 {
    match outcome {
        SessionOutcome::Succeeded => 0,
        SessionOutcome::Exhausted => 1,
        SessionOutcome::Aborted => 2,
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
