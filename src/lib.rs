//! canscope - a CanView CAN-bus log analysis pipeline written in Rust
//!
//! This library parses CanView fixed-width message logs, annotates each
//! message through a hierarchical wildcard filter cascade, and reconstructs
//! boolean trace signals from high/low marker messages. A display layer
//! consumes the resulting row table and column names; nothing in here draws.
//!
//! ## Module Structure
//!
//! - [`pipeline`] - Orchestrator: file-kind detection, stage sequencing,
//!   status-message sink
//! - [`parsers`] - The three input-file loaders
//!   - `canview` - fixed-width log parser
//!   - `filter` - rule-file parser and the filter cascade
//!   - `trace` - trace-config load/save and signal reconstruction
//! - [`table`] - Row-oriented log table and cell values
//! - [`state`] - Column layout constants and the row-highlight color tags
//! - [`error`] - Load error taxonomy

pub mod error;
pub mod parsers;
pub mod pipeline;
pub mod state;
pub mod table;

pub use error::PipelineError;
pub use pipeline::{FileKind, Pipeline};
pub use table::{LogTable, Value};
