use std::env;
use std::path::Path;

use anyhow::{bail, Result};

// Import from the library
use canscope::{FileKind, Pipeline, PipelineError, Value};

/// Rows printed from the top of the table
const PREVIEW_ROWS: usize = 15;

fn format_cell(value: &Value) -> String {
    match value {
        Value::Float(f) => format!("{:.1}", f),
        other => other.to_string(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: dump_log <log/filter/trace files>...");
    }

    let mut pipeline = Pipeline::new();
    pipeline.set_status_sink(Box::new(|text| println!("{}", text)));

    for path in &args[1..] {
        let kind = pipeline.load(Path::new(path));
        if kind == FileKind::Unrecognized {
            return Err(PipelineError::UnrecognizedFile(path.clone()).into());
        }
        println!("{}: {}", path, kind.name());
    }

    let table = pipeline.table();
    println!("\n=== Pipeline Results ===");
    println!("Rows: {}", table.row_count());
    println!("Filters: {}", pipeline.filter_list().len());
    println!("Traces: {}", pipeline.traces().len());
    println!("Columns: {}", pipeline.column_names().join(", "));

    for trace in pipeline.traces() {
        if let Some(col) = table.find_column(&trace.name) {
            let highs = table
                .column_as_f64(col)
                .iter()
                .filter(|v| **v > 0.0)
                .count();
            println!("Trace '{}': high on {} of {} rows", trace.name, highs, table.row_count());
        }
    }

    println!("\n=== First {} Rows ===", PREVIEW_ROWS.min(table.row_count()));
    for row in table.rows.iter().take(PREVIEW_ROWS) {
        let cells: Vec<String> = row.iter().map(format_cell).collect();
        println!("{}", cells.join(" | "));
    }

    Ok(())
}
