//! Usage report - rebuild token accounting from scraped logs.
//!
//! Scans log output for `TOKEN_USAGE:` lines, replays them into a
//! [`token_tracker::UsageTracker`] and prints the resulting summary as a
//! `TOKEN_SUMMARY:` line or as JSON.

pub mod config;
pub mod error;
pub mod report;

pub use config::{Config, ReportFormat};
pub use error::{ReportError, ReportResult};
pub use report::{render, replay, run, scan, ReplayStats};
