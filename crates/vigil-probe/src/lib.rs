//! vigil-probe — endpoint probing and response classification.
//!
//! One probe is one bounded-timeout HTTP GET. The prober never raises
//! an error for network failure: timeouts and connection failures are
//! recorded inside the returned `ProbeOutcome`. The classifier is a
//! pure function from an outcome plus the target's configured body
//! markers to a `HealthState`.
//!
//! ```text
//! ProbeUrl::parse(base_url)            fail-fast URL validation
//!   └── probe(base, target, timeout) → ProbeOutcome
//!         └── classify(outcome, target) → HealthState
//! ```

pub mod classifier;
pub mod prober;

pub use classifier::classify;
pub use prober::{probe, ProbeUrl};
