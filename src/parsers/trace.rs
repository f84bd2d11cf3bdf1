//! Trace configuration and trace-signal reconstruction.
//!
//! A trace config is a JSON list of named trigger specs. Each spec derives
//! one boolean 0/1 column from the log: a row whose test-string starts with
//! the high pattern raises the signal on a 0→1 edge, the low pattern (or the
//! `next` sentinel) drops it, and every other row carries the previous
//! row's value forward.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::table::{LogTable, Value};

/// Sentinel low pattern: the signal is forced low on every row that is not
/// itself a rising edge, so a high marker stays high for exactly one row.
pub const LOW_ON_NEXT: &str = "next";

/// One derived-signal definition; `name` becomes a table column name
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TraceSpec {
    pub name: String,
    pub high_msg: String,
    pub low_msg: String,
}

/// Keep only characters that can appear in a test-string (hex digits)
fn hex_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_hexdigit()).collect()
}

/// Parse and sanitize a trace configuration.
///
/// The `next` sentinel is detected case-insensitively before hex
/// sanitization; all other patterns are stripped down to hex characters.
pub fn parse_trace_config(contents: &str) -> Result<Vec<TraceSpec>, PipelineError> {
    let mut traces: Vec<TraceSpec> = serde_json::from_str(contents)?;
    for trace in &mut traces {
        trace.high_msg = hex_only(&trace.high_msg);
        if trace.low_msg.to_lowercase().contains(LOW_ON_NEXT) {
            trace.low_msg = LOW_ON_NEXT.to_string();
        } else {
            trace.low_msg = hex_only(&trace.low_msg);
        }
    }
    tracing::info!("Parsed trace configuration: {} traces", traces.len());
    Ok(traces)
}

/// Serialize a spec list back to the JSON config format
pub fn trace_config_to_json(traces: &[TraceSpec]) -> Result<String, PipelineError> {
    Ok(serde_json::to_string(traces)?)
}

/// Prefix comparison used for both trigger patterns; an empty pattern can
/// never match.
fn matches_marker(test: &str, pattern: &str) -> bool {
    !pattern.is_empty() && test.starts_with(pattern)
}

/// Rebuild all trace columns from the base table.
///
/// The table is first truncated to its base width, so repeated rebuilds are
/// idempotent. Trace names are validated against the base columns and each
/// other before anything is appended; a collision fails the whole rebuild
/// and leaves the table at its base width.
pub fn add_trace_points(table: &mut LogTable, traces: &[TraceSpec]) -> Result<(), PipelineError> {
    table.truncate_to_initial();

    for (i, trace) in traces.iter().enumerate() {
        let base_collision = table.column_names.iter().any(|c| *c == trace.name);
        let spec_collision = traces[..i].iter().any(|t| t.name == trace.name);
        if base_collision || spec_collision {
            return Err(PipelineError::TraceNameCollision(trace.name.clone()));
        }
    }

    let rows = table.row_count();
    for trace in traces {
        let mut values = vec![0i64; rows];
        for row in 0..rows {
            // Row 0 reads the last row as its predecessor. That index
            // wraps on purpose: the original viewer evaluated row -1, and
            // since the column starts all-zero the value read is 0. Kept
            // for compatibility, not as a circular-log feature.
            let prev = values[if row == 0 { rows - 1 } else { row - 1 }];
            let test = table.test_string(row);

            values[row] = if matches_marker(&test, &trace.high_msg) && prev == 0 {
                1
            } else if trace.low_msg == LOW_ON_NEXT {
                0
            } else if matches_marker(&test, &trace.low_msg) {
                0
            } else {
                prev
            };
        }
        table.push_column(trace.name.clone(), values.into_iter().map(Value::Int).collect());
    }

    tracing::info!("Rebuilt {} trace columns over {} rows", traces.len(), rows);
    Ok(())
}
