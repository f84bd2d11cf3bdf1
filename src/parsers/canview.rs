//! CanView message-log parser.
//!
//! CanView logs are fixed-width text files: a header block delimited by
//! `HEADER_BEGIN`/`HEADER_END`, with the 4th header line carrying four
//! comma-separated integers that describe the column widths of the data
//! section. Fields are sliced at byte offsets computed once from those
//! widths, never whitespace-split, so empty data bytes stay positional.

use regex::Regex;

use crate::error::PipelineError;
use crate::state::{base_column_names, DATA_BYTE_COUNT, DATA_BYTE_WIDTH};
use crate::table::{LogTable, Value};

/// Header line index (0-based) carrying the column-width spec
const WIDTH_SPEC_LINE: usize = 3;

/// Left margin of the data section; the delta field starts one byte later
const LEFT_MARGIN: usize = 2;

/// CanView log file parser
pub struct CanViewLog;

impl CanViewLog {
    /// Check whether the contents look like a CanView log
    pub fn detect(contents: &str) -> bool {
        contents
            .lines()
            .next()
            .is_some_and(|line| line.contains("HEADER_BEGIN"))
    }

    /// Parse the four column-width integers from the header
    fn parse_width_spec(line: &str) -> Option<[usize; 4]> {
        let spec_regex = Regex::new(r"^\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*$")
            .expect("Failed to compile regex");
        let captures = spec_regex.captures(line)?;
        let mut widths = [0usize; 4];
        for (i, width) in widths.iter_mut().enumerate() {
            *width = captures[i + 1].parse().ok()?;
        }
        Some(widths)
    }

    /// Compute the 11 (start, end) byte spans of a data line from the header
    /// widths: delta, description, message ID, then 8 data bytes spaced
    /// `widths[3]` apart and `DATA_BYTE_WIDTH` wide.
    fn column_spans(widths: [usize; 4]) -> Vec<(usize, usize)> {
        let mut spans = Vec::with_capacity(3 + DATA_BYTE_COUNT);
        spans.push((LEFT_MARGIN + 1, LEFT_MARGIN + widths[0]));
        spans.push((
            LEFT_MARGIN + widths[0],
            LEFT_MARGIN + widths[0] + widths[1],
        ));
        spans.push((
            LEFT_MARGIN + widths[0] + widths[1],
            LEFT_MARGIN + widths[0] + widths[1] + widths[2],
        ));
        let data_base = LEFT_MARGIN + widths[0] + widths[1] + widths[2];
        for byte in 0..DATA_BYTE_COUNT {
            let start = data_base + byte * widths[3];
            spans.push((start, start + DATA_BYTE_WIDTH));
        }
        spans
    }

    /// Slice one span out of a line, tolerating lines shorter than the span
    fn slice_span(line: &str, span: (usize, usize)) -> String {
        let bytes = line.as_bytes();
        let start = span.0.min(bytes.len());
        let end = span.1.min(bytes.len());
        String::from_utf8_lossy(&bytes[start..end]).trim().to_string()
    }

    /// Normalize a raw delta field: "-" is a placeholder for zero and the
    /// "ms" unit suffix is dropped before conversion.
    fn parse_delta(raw: &str) -> f64 {
        let cleaned = raw.replace('-', "0").replace("ms", "");
        cleaned.trim().parse().unwrap_or(0.0)
    }

    /// Parse a complete CanView log into a fresh table.
    ///
    /// Fails without side effects if the header markers are missing or the
    /// width spec does not parse; callers keep any previously held table.
    pub fn parse(contents: &str) -> Result<LogTable, PipelineError> {
        let lines: Vec<&str> = contents.lines().collect();

        if !Self::detect(contents) {
            return Err(PipelineError::LogHeaderMissing(
                "first line does not contain HEADER_BEGIN".to_string(),
            ));
        }

        let widths = lines
            .get(WIDTH_SPEC_LINE)
            .and_then(|line| Self::parse_width_spec(line))
            .ok_or_else(|| {
                PipelineError::LogHeaderMissing(
                    "header line 4 does not hold 4 column widths".to_string(),
                )
            })?;
        let spans = Self::column_spans(widths);

        // Data starts two lines past HEADER_END: the line right after the
        // marker is the column caption row.
        let header_end = lines
            .iter()
            .skip(WIDTH_SPEC_LINE + 1)
            .position(|line| line.contains("HEADER_END"))
            .map(|offset| WIDTH_SPEC_LINE + 1 + offset)
            .ok_or_else(|| {
                PipelineError::LogHeaderMissing("HEADER_END marker not found".to_string())
            })?;
        let data_start = header_end + 2;

        let mut table = LogTable::new(base_column_names());
        let mut time = 0.0;
        for line in lines.iter().skip(data_start) {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<String> = spans
                .iter()
                .map(|&span| Self::slice_span(line, span))
                .collect();

            let delta = Self::parse_delta(&fields[0]);
            time += delta;

            let mut row = Vec::with_capacity(table.initial_column_count());
            row.push(Value::Float(time));
            row.push(Value::Float(delta));
            row.extend(fields.into_iter().skip(1).map(Value::Str));
            row.push(Value::empty());
            table.rows.push(row);
        }

        tracing::info!("Parsed CanView log: {} rows", table.row_count());
        Ok(table)
    }
}
