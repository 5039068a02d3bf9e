//! vigil-report — turning a final round into a deliverable artifact.
//!
//! The builder is pure aggregation: it tallies the last round into a
//! histogram, computes the success rate, and derives narrative
//! recommendations from a fixed rule table. Rendering produces the
//! human-readable summary; sinks deliver the finished `Report` to the
//! outside world (a file artifact, a console notifier). The engine
//! stays agnostic to sink transport and format.
//!
//! # Components
//!
//! - **`builder`** — `build()` and the recommendation table
//! - **`render`** — text rendering of reports and rounds
//! - **`sink`** — the `ReportSink` contract, `FileSink`, `ConsoleNotifier`

pub mod builder;
pub mod render;
pub mod sink;

pub use builder::build;
pub use render::{render_round, render_text};
pub use sink::{ConsoleNotifier, FileSink, ReportSink};
