//! Row-oriented log table shared by all pipeline stages.
//!
//! The parser produces a [`LogTable`], the filter cascade rewrites its
//! Description/Colour cells in place, and the trace reconstructor appends
//! derived columns. Column identity is positional, addressed by name through
//! a parallel ordered name list.

use serde::Serialize;

use crate::state::{COL_COLOUR, COL_DESCRIPTION, COL_ID, DATA_BYTE_COUNT};

/// Value types for log table cells
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Float(f64),
    Int(i64),
    Str(String),
}

impl Value {
    /// Convert value to f64 for charting
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Float(f) => *f,
            Value::Int(i) => *i as f64,
            Value::Str(_) => 0.0,
        }
    }

    /// String view of the cell; numeric cells read as empty
    pub fn as_str(&self) -> &str {
        match self {
            Value::Str(s) => s,
            _ => "",
        }
    }

    pub fn empty() -> Value {
        Value::Str(String::new())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Str(v) => f.write_str(v),
        }
    }
}

/// Parsed log table: rows of cells plus a parallel ordered column-name list.
///
/// `initial_column_count` is fixed at construction; every column at or past
/// that index is a derived trace column and is discarded by
/// [`LogTable::truncate_to_initial`] before a trace rebuild.
#[derive(Clone, Debug)]
pub struct LogTable {
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    initial_column_count: usize,
}

impl LogTable {
    /// Create an empty table over the given base columns
    pub fn new(column_names: Vec<String>) -> Self {
        let initial_column_count = column_names.len();
        Self {
            column_names,
            rows: Vec::new(),
            initial_column_count,
        }
    }

    pub fn initial_column_count(&self) -> usize {
        self.initial_column_count
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    /// Find column index by name
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Concatenation of the ID and D0..D7 cells of a row, the unit of all
    /// filter and trace pattern matching. Empty cells contribute nothing.
    pub fn test_string(&self, row: usize) -> String {
        let mut s = String::new();
        for col in COL_ID..COL_ID + 1 + DATA_BYTE_COUNT {
            if let Some(cell) = self.rows[row].get(col) {
                s.push_str(cell.as_str());
            }
        }
        s
    }

    /// Clear the Description and Colour cells of every row
    pub fn clear_annotations(&mut self) {
        for row in &mut self.rows {
            row[COL_DESCRIPTION] = Value::empty();
            row[COL_COLOUR] = Value::empty();
        }
    }

    /// Drop all derived trace columns, restoring the table to its base width
    pub fn truncate_to_initial(&mut self) {
        self.column_names.truncate(self.initial_column_count);
        for row in &mut self.rows {
            row.truncate(self.initial_column_count);
        }
    }

    /// Append one derived column of per-row values, with its name
    pub fn push_column(&mut self, name: String, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.column_names.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Get a whole column as f64 for charting
    pub fn column_as_f64(&self, col: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(col).map(|v| v.as_f64()))
            .collect()
    }
}
