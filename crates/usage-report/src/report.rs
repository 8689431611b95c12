//! Replay of scraped `TOKEN_USAGE:` lines into a tracker.

use crate::config::{Config, ReportFormat};
use crate::error::{ReportError, ReportResult};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use token_tracker::{CallRecord, UsageLine, UsageSummary, UsageTracker, USAGE_MARKER};
use tracing::{debug, info, instrument, warn};

/// Outcome of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Usage records fed into the tracker
    pub recorded: usize,
    /// Malformed usage lines that were skipped
    pub skipped: usize,
}

/// Scan a line stream for `TOKEN_USAGE:` records.
///
/// Lines without the marker and `TOKEN_SUMMARY:` lines are ignored. Each
/// item carries the 1-based line number it came from.
pub fn scan<R: BufRead>(reader: R) -> impl Iterator<Item = ReportResult<(usize, CallRecord)>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match line {
            Ok(line) => usage_record(idx + 1, &line),
            Err(e) => Some(Err(ReportError::Io(e))),
        })
}

fn usage_record(line_no: usize, line: &str) -> Option<ReportResult<(usize, CallRecord)>> {
    if !line.contains(USAGE_MARKER) {
        return None;
    }

    match UsageLine::parse(line) {
        Ok(UsageLine::Usage(record)) => Some(Ok((line_no, record))),
        Ok(UsageLine::Summary(_)) => None,
        Err(source) => Some(Err(ReportError::Malformed {
            line: line_no,
            source,
        })),
    }
}

/// Feed every scanned record into `tracker` under its original name.
///
/// In strict mode the first malformed line aborts the replay; otherwise it is
/// logged and counted as skipped. Read errors always abort. The tracker must
/// be enabled for records to count.
#[instrument(skip(reader, tracker))]
pub fn replay<R: BufRead>(
    reader: R,
    tracker: &mut UsageTracker,
    strict: bool,
) -> ReportResult<ReplayStats> {
    let mut stats = ReplayStats::default();

    for item in scan(reader) {
        match item {
            Ok((_, record)) => {
                if tracker.record_usage(
                    record.prompt_tokens,
                    record.completion_tokens,
                    &record.call_name,
                ) {
                    stats.recorded += 1;
                } else {
                    debug!("Tracker disabled, dropped call {}", record.call_number);
                }
            }
            Err(e @ ReportError::Malformed { .. }) if !strict => {
                warn!("Skipping {}", e);
                stats.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Replayed {} usage records ({} skipped)",
        stats.recorded, stats.skipped
    );

    Ok(stats)
}

/// Render a summary in the requested format.
pub fn render(summary: &UsageSummary, format: ReportFormat) -> ReportResult<String> {
    match format {
        ReportFormat::Text => Ok(summary.to_string()),
        ReportFormat::Json => Ok(summary.to_json_pretty()?),
    }
}

/// Replay the configured input into `tracker` and write the rendered summary.
///
/// Everything goes to the tracker's writer. In text mode that is the
/// replayed `TOKEN_USAGE:` lines followed by the `TOKEN_SUMMARY:` line; in
/// JSON mode the replayed lines are suppressed so the writer receives a single
/// JSON document. The tracker is enabled and its history limit taken from
/// `config.tracker`.
#[instrument(skip_all)]
pub fn run(config: &Config, tracker: &mut UsageTracker) -> ReportResult<ReplayStats> {
    tracker.set_history_limit(config.tracker.history_limit);
    tracker.enable();

    let stats = match config.report.format {
        ReportFormat::Text => replay_input(config, tracker)?,
        ReportFormat::Json => {
            let previous = tracker.set_writer(Box::new(io::sink()));
            let result = replay_input(config, tracker);
            tracker.set_writer(previous);
            result?
        }
    };

    let rendered = render(&tracker.summary(), config.report.format)?;
    let out = tracker.writer();
    writeln!(out, "{}", rendered)?;
    out.flush()?;

    Ok(stats)
}

fn replay_input(config: &Config, tracker: &mut UsageTracker) -> ReportResult<ReplayStats> {
    match &config.report.input {
        Some(path) => {
            info!("Reading usage lines from {}", path.display());
            let file = File::open(path)?;
            replay(BufReader::new(file), tracker, config.report.strict)
        }
        None => {
            info!("Reading usage lines from stdin");
            replay(io::stdin().lock(), tracker, config.report.strict)
        }
    }
}
