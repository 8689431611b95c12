//! Token usage accumulator.

use crate::config::TrackerConfig;
use crate::types::*;
use std::fmt;
use std::io::{self, Write};
use tracing::{debug, info, warn};

/// Label used when a caller does not name the call.
pub const DEFAULT_CALL_NAME: &str = "LLM Call";

/// Destination for the `TOKEN_USAGE:` / `TOKEN_SUMMARY:` lines.
pub type UsageWriter = Box<dyn Write + Send>;

/// Accumulates prompt/completion token counts and a per-call history.
///
/// A new tracker is inert: recording is a no-op until [`enable`] is called.
/// Protocol lines go to stdout unless another writer is installed.
///
/// [`enable`]: UsageTracker::enable
pub struct UsageTracker {
    enabled: bool,
    total_prompt_tokens: u64,
    total_completion_tokens: u64,
    total_tokens: u64,
    call_count: u64,
    call_history: Vec<CallRecord>,
    history_limit: Option<usize>,
    writer: UsageWriter,
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self {
            enabled: false,
            total_prompt_tokens: 0,
            total_completion_tokens: 0,
            total_tokens: 0,
            call_count: 0,
            call_history: Vec::new(),
            history_limit: None,
            writer: Box::new(io::stdout()),
        }
    }
}

impl fmt::Debug for UsageTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsageTracker")
            .field("enabled", &self.enabled)
            .field("call_count", &self.call_count)
            .field("total_prompt_tokens", &self.total_prompt_tokens)
            .field("total_completion_tokens", &self.total_completion_tokens)
            .field("total_tokens", &self.total_tokens)
            .field("history_len", &self.call_history.len())
            .field("history_limit", &self.history_limit)
            .finish_non_exhaustive()
    }
}

impl UsageTracker {
    /// Create an inert tracker with unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inert tracker from configuration.
    pub fn with_config(config: &TrackerConfig) -> Self {
        Self {
            history_limit: config.history_limit,
            ..Self::default()
        }
    }

    /// Create an inert tracker that writes protocol lines to `writer`.
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            ..Self::default()
        }
    }

    /// Install a new protocol writer, returning the previous one.
    pub fn set_writer(&mut self, writer: UsageWriter) -> UsageWriter {
        std::mem::replace(&mut self.writer, writer)
    }

    /// The writer protocol lines are sent to.
    pub fn writer(&mut self) -> &mut UsageWriter {
        &mut self.writer
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Change the retention cap, trimming existing history if needed.
    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        self.history_limit = limit;
        self.trim_history();
    }

    /// Record usage for one model call.
    ///
    /// Writes one `TOKEN_USAGE:` line when enabled. Returns whether
    /// the call was recorded.
    pub fn record_usage(
        &mut self,
        prompt_tokens: u64,
        completion_tokens: u64,
        call_name: &str,
    ) -> bool {
        if !self.enabled {
            return false;
        }

        let usage = TokenUsage::new(prompt_tokens, completion_tokens);

        self.total_prompt_tokens = self.total_prompt_tokens.saturating_add(prompt_tokens);
        self.total_completion_tokens = self
            .total_completion_tokens
            .saturating_add(completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(usage.total_tokens());
        self.call_count = self.call_count.saturating_add(1);

        let record = CallRecord::new(self.call_count, call_name, usage);

        debug!(
            call_id = record.call_number,
            name = %record.call_name,
            prompt = record.prompt_tokens,
            completion = record.completion_tokens,
            total = record.total_tokens,
            "Recorded token usage"
        );
        self.emit(&record);

        self.call_history.push(record);
        self.trim_history();

        true
    }

    /// Record usage under [`DEFAULT_CALL_NAME`].
    pub fn record_usage_default(&mut self, prompt_tokens: u64, completion_tokens: u64) -> bool {
        self.record_usage(prompt_tokens, completion_tokens, DEFAULT_CALL_NAME)
    }

    /// Record a provider-reported usage payload.
    pub fn record(&mut self, usage: &TokenUsage, call_name: &str) -> bool {
        self.record_usage(usage.prompt_tokens, usage.completion_tokens, call_name)
    }

    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    pub fn total_prompt_tokens(&self) -> u64 {
        self.total_prompt_tokens
    }

    pub fn total_completion_tokens(&self) -> u64 {
        self.total_completion_tokens
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    /// Retained call records, oldest first.
    pub fn history(&self) -> &[CallRecord] {
        &self.call_history
    }

    pub fn totals(&self) -> UsageTotals {
        UsageTotals {
            total_calls: self.call_count,
            total_prompt_tokens: self.total_prompt_tokens,
            total_completion_tokens: self.total_completion_tokens,
            total_tokens: self.total_tokens,
        }
    }

    /// Snapshot of counters and history. Works whether or not tracking is enabled.
    pub fn summary(&self) -> UsageSummary {
        UsageSummary {
            total_calls: self.call_count,
            total_prompt_tokens: self.total_prompt_tokens,
            total_completion_tokens: self.total_completion_tokens,
            total_tokens: self.total_tokens,
            call_history: self.call_history.clone(),
        }
    }

    /// Write the `TOKEN_SUMMARY:` line.
    pub fn print_summary(&mut self) {
        let totals = self.totals();
        self.emit(&totals);
    }

    /// Zero all counters and clear history. The enabled flag is left as is.
    pub fn reset(&mut self) {
        self.total_prompt_tokens = 0;
        self.total_completion_tokens = 0;
        self.total_tokens = 0;
        self.call_count = 0;
        self.call_history.clear();

        info!("Token usage tracker reset (enabled={})", self.enabled);
    }

    /// Recording never fails, so a broken writer is only logged.
    fn emit(&mut self, line: &dyn fmt::Display) {
        if let Err(e) = writeln!(self.writer, "{}", line) {
            warn!("Failed to write token usage line: {}", e);
        }
    }

    fn trim_history(&mut self) {
        if let Some(limit) = self.history_limit {
            if self.call_history.len() > limit {
                let excess = self.call_history.len() - limit;
                self.call_history.drain(..excess);
            }
        }
    }
}
