//! Process-wide accounting of LLM token usage.
//!
//! A [`UsageTracker`] accumulates prompt, completion and total token counts
//! plus a per-call history, and prints one greppable line per recorded call:
//!
//! ```text
//! TOKEN_USAGE: call_id=1 name=summarize prompt=10 completion=5 total=15
//! TOKEN_SUMMARY: total_calls=1 prompt=10 completion=5 total=15
//! ```
//!
//! Prefer passing a tracker explicitly; [`global_tracker`] exists for the
//! outermost composition point.

mod config;
mod error;
mod global;
mod protocol;
mod tracker;
mod types;

pub use config::TrackerConfig;
pub use error::ProtocolError;
pub use global::{global_tracker, reset_global_tracker, SharedTracker};
pub use protocol::{UsageLine, SUMMARY_MARKER, USAGE_MARKER};
pub use tracker::{UsageTracker, UsageWriter, DEFAULT_CALL_NAME};
pub use types::*;
