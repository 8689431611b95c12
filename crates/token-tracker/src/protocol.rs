//! Parsing of the `TOKEN_USAGE:` / `TOKEN_SUMMARY:` stdout lines.

use crate::error::ProtocolError;
use crate::types::*;

pub const USAGE_MARKER: &str = "TOKEN_USAGE:";
pub const SUMMARY_MARKER: &str = "TOKEN_SUMMARY:";

/// A parsed protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageLine {
    Usage(CallRecord),
    Summary(UsageTotals),
}

impl UsageLine {
    /// Parse a protocol line. The marker may appear anywhere in the line,
    /// so timestamps or other log prefixes are skipped.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        if let Some(idx) = line.find(USAGE_MARKER) {
            parse_usage(&line[idx + USAGE_MARKER.len()..]).map(UsageLine::Usage)
        } else if let Some(idx) = line.find(SUMMARY_MARKER) {
            parse_summary(&line[idx + SUMMARY_MARKER.len()..]).map(UsageLine::Summary)
        } else {
            Err(ProtocolError::MissingMarker)
        }
    }
}

/// `call_id=<n> name=<free text> prompt=<n> completion=<n> total=<n>`
///
/// The name may contain spaces, so the numeric fields after it are
/// split off from the right.
fn parse_usage(body: &str) -> Result<CallRecord, ProtocolError> {
    let body = body.trim();

    let rest = body
        .strip_prefix("call_id=")
        .ok_or(ProtocolError::MissingField("call_id"))?;
    let (call_id, rest) = rest
        .split_once(' ')
        .ok_or(ProtocolError::MissingField("name"))?;
    let rest = rest
        .strip_prefix("name=")
        .ok_or(ProtocolError::MissingField("name"))?;

    let (rest, total) = split_last_field(rest, "total")?;
    let (rest, completion) = split_last_field(rest, "completion")?;
    let (name, prompt) = split_last_field(rest, "prompt")?;

    let prompt_tokens = parse_number("prompt", prompt)?;
    let completion_tokens = parse_number("completion", completion)?;
    let total_tokens = parse_number("total", total)?;
    check_total(prompt_tokens, completion_tokens, total_tokens)?;

    Ok(CallRecord {
        call_number: parse_number("call_id", call_id)?,
        call_name: name.to_string(),
        prompt_tokens,
        completion_tokens,
        total_tokens,
    })
}

/// `total_calls=<n> prompt=<n> completion=<n> total=<n>`
fn parse_summary(body: &str) -> Result<UsageTotals, ProtocolError> {
    let mut total_calls = None;
    let mut prompt = None;
    let mut completion = None;
    let mut total = None;

    for pair in body.split_whitespace() {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            "total_calls" => total_calls = Some(parse_number("total_calls", value)?),
            "prompt" => prompt = Some(parse_number("prompt", value)?),
            "completion" => completion = Some(parse_number("completion", value)?),
            "total" => total = Some(parse_number("total", value)?),
            _ => {}
        }
    }

    let totals = UsageTotals {
        total_calls: total_calls.ok_or(ProtocolError::MissingField("total_calls"))?,
        total_prompt_tokens: prompt.ok_or(ProtocolError::MissingField("prompt"))?,
        total_completion_tokens: completion.ok_or(ProtocolError::MissingField("completion"))?,
        total_tokens: total.ok_or(ProtocolError::MissingField("total"))?,
    };
    check_total(
        totals.total_prompt_tokens,
        totals.total_completion_tokens,
        totals.total_tokens,
    )?;

    Ok(totals)
}

/// Split `"... key=value"` into `("...", "value")`.
fn split_last_field<'a>(
    input: &'a str,
    key: &'static str,
) -> Result<(&'a str, &'a str), ProtocolError> {
    let needle = format!(" {}=", key);
    let idx = input
        .rfind(&needle)
        .ok_or(ProtocolError::MissingField(key))?;
    Ok((&input[..idx], &input[idx + needle.len()..]))
}

fn parse_number(field: &'static str, value: &str) -> Result<u64, ProtocolError> {
    value
        .trim()
        .parse()
        .map_err(|_| ProtocolError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn check_total(prompt: u64, completion: u64, total: u64) -> Result<(), ProtocolError> {
    if prompt.saturating_add(completion) == total {
        Ok(())
    } else {
        Err(ProtocolError::InconsistentTotal {
            prompt,
            completion,
            total,
        })
    }
}
