//! vigil-core — shared types for deployment health verification.
//!
//! Defines the data model exchanged between the prober, the polling
//! session, and the report builder:
//!
//! ```text
//! VerifyConfig (vigil.toml)
//!   └── ProbeTarget (path + optional body markers)
//!
//! ProbeOutcome (one HTTP attempt)
//!   └── classified into a HealthState, paired per target
//!
//! RoundResult (one synchronized batch of probes)
//!   └── aggregated into a Report at session end
//! ```
//!
//! All failure modes of a probe live inside `ProbeOutcome`; the only
//! errors raised by this crate are configuration errors, which fail at
//! session construction time, before any polling begins.

pub mod config;
pub mod error;
pub mod types;

pub use config::{PollConfig, ServiceConfig, VerifyConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::*;
