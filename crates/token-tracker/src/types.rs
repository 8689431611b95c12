//! Call record and summary types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token usage reported by a provider for a single completion.
///
/// Deserializes from an OpenAI-style `usage` object; the provider's own
/// `total_tokens` is ignored and recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

/// A single recorded model call.
///
/// Displays as the greppable `TOKEN_USAGE:` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub call_number: u64,
    pub call_name: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl CallRecord {
    pub fn new(call_number: u64, call_name: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            call_number,
            call_name: call_name.into(),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens(),
        }
    }

    pub fn usage(&self) -> TokenUsage {
        TokenUsage::new(self.prompt_tokens, self.completion_tokens)
    }
}

impl fmt::Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TOKEN_USAGE: call_id={} name={} prompt={} completion={} total={}",
            self.call_number,
            self.call_name,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens
        )
    }
}

/// Aggregate counters without the per-call history.
///
/// Displays as the greppable `TOKEN_SUMMARY:` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTotals {
    pub total_calls: u64,
    pub total_prompt_tokens: u64,
    pub total_completion_tokens: u64,
    pub total_tokens: u64,
}

impl fmt::Display for UsageTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TOKEN_SUMMARY: total_calls={} prompt={} completion={} total={}",
            self.total_calls,
            self.total_prompt_tokens,
            self.total_completion_tokens,
            self.total_tokens
        )
    }
}

/// Owned snapshot of a tracker's counters and history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub total_calls: u64,
    pub total_prompt_tokens: u64,
    pub total_completion_tokens: u64,
    pub total_tokens: u64,
    pub call_history: Vec<CallRecord>,
}

impl UsageSummary {
    pub fn totals(&self) -> UsageTotals {
        UsageTotals {
            total_calls: self.total_calls,
            total_prompt_tokens: self.total_prompt_tokens,
            total_completion_tokens: self.total_completion_tokens,
            total_tokens: self.total_tokens,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.totals(), f)
    }
}
