//! Pipeline orchestration: file-kind detection, stage sequencing, and the
//! status-message sink.
//!
//! A [`Pipeline`] owns the row table, the filter rule list, and the trace
//! spec list. Every `load` auto-detects the file kind, runs the matching
//! loader, and then re-runs the dependent stages: filters and traces are
//! recomputed whenever a successfully parsed log is present, in that order.

use std::fs;
use std::path::Path;

use crate::error::PipelineError;
use crate::parsers::canview::CanViewLog;
use crate::parsers::filter::{self, FilterRule};
use crate::parsers::trace::{self, TraceSpec};
use crate::state::base_column_names;
use crate::table::LogTable;

/// The three recognized input file kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    LogFile,
    Filter,
    TraceConfig,
    Unrecognized,
}

impl FileKind {
    pub fn name(&self) -> &'static str {
        match self {
            FileKind::LogFile => "log_file",
            FileKind::Filter => "filter",
            FileKind::TraceConfig => "trace_config",
            FileKind::Unrecognized => "",
        }
    }
}

/// Receiver for human-readable load progress messages
pub type StatusSink = Box<dyn Fn(&str)>;

/// Owner of all pipeline state; loads run parse → filter → trace
pub struct Pipeline {
    table: LogTable,
    filter_list: Vec<FilterRule>,
    traces: Vec<TraceSpec>,
    log_file_loaded: bool,
    filter_loaded: bool,
    trace_config_loaded: bool,
    status_sink: Option<StatusSink>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            table: LogTable::new(base_column_names()),
            filter_list: Vec::new(),
            traces: Vec::new(),
            log_file_loaded: false,
            filter_loaded: false,
            trace_config_loaded: false,
            status_sink: None,
        }
    }

    /// Route status messages somewhere other than the log output
    pub fn set_status_sink(&mut self, sink: StatusSink) {
        self.status_sink = Some(sink);
    }

    fn print_status(&self, text: &str) {
        match &self.status_sink {
            Some(sink) => sink(text),
            None => tracing::info!("{}", text),
        }
    }

    /// The current table; base columns plus any rebuilt trace columns
    pub fn table(&self) -> &LogTable {
        &self.table
    }

    pub fn column_names(&self) -> &[String] {
        &self.table.column_names
    }

    pub fn filter_list(&self) -> &[FilterRule] {
        &self.filter_list
    }

    pub fn traces(&self) -> &[TraceSpec] {
        &self.traces
    }

    /// Detect the kind of a file and load it, then recompute whatever the
    /// new state allows. Failures are reported through the status sink; the
    /// previously held state stays in place.
    pub fn load(&mut self, path: &Path) -> FileKind {
        self.print_status(&format!("Loading {}", path.display()));

        let kind = self.load_one(path);

        if self.log_file_loaded {
            if self.filter_loaded {
                filter::apply_filters(&mut self.table, &self.filter_list);
            }
            if self.trace_config_loaded {
                if let Err(e) = trace::add_trace_points(&mut self.table, &self.traces) {
                    self.print_status(&format!("Failed to rebuild traces: {}", e));
                }
            }
        }

        kind
    }

    fn load_one(&mut self, path: &Path) -> FileKind {
        if path.extension().is_some_and(|ext| ext == "json") {
            match fs::read_to_string(path)
                .map_err(PipelineError::from)
                .and_then(|contents| trace::parse_trace_config(&contents))
            {
                Ok(traces) => {
                    self.print_status(&format!(
                        "Trace configuration loaded: {} traces",
                        traces.len()
                    ));
                    self.traces = traces;
                    self.trace_config_loaded = true;
                }
                Err(e) => {
                    self.print_status(&format!("Failed to load trace configuration: {}", e))
                }
            }
            return FileKind::TraceConfig;
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                self.print_status(&format!("Failed to read {}: {}", path.display(), e));
                return FileKind::Unrecognized;
            }
        };

        if CanViewLog::detect(&contents) {
            match CanViewLog::parse(&contents) {
                Ok(table) => {
                    self.print_status(&format!("CanView log loaded: {} lines", table.row_count()));
                    self.table = table;
                    self.log_file_loaded = true;
                }
                Err(e) => self.print_status(&format!("Failed to load CanView log: {}", e)),
            }
            FileKind::LogFile
        } else if filter::detect(&contents) {
            let rules = filter::parse_filter_file(&contents);
            self.print_status(&format!("CanView filter loaded: {} lines", rules.len()));
            self.filter_list = rules;
            self.filter_loaded = true;
            FileKind::Filter
        } else {
            self.print_status("File type not recognized");
            FileKind::Unrecognized
        }
    }

    /// Write the current trace specs back out as a JSON config
    pub fn save_trace_config(&self, path: &Path) -> Result<(), PipelineError> {
        let json = trace::trace_config_to_json(&self.traces)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    use crate::state::BASE_COLUMN_COUNT;
    use crate::table::Value;

    const SAMPLE_LOG: &str = "HEADER_BEGIN CanView V2.1
Message log

8,10,6,3
HEADER_END
   Delta  Descr.    ID    D0 D1 D2 D3 D4 D5 D6 D7
   1.0ms            123   01 17
   2.0ms            456   AA BB
   0.5ms            123   01 18
";

    const SAMPLE_FILTER: &str = "CanView filter definitions
// CanView Filter
FILTERS:
123 x 01 xx      \"Engine{s2}\"   RED
SUBFILTERS_2:
123 x 01 17      \"Start\"        GREEN
123 x 01 18      \"Stop\"         GREY
";

    const SAMPLE_TRACES: &str =
        r#"[{"name": "Running", "high_msg": "1230117", "low_msg": "1230118"}]"#;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn capture_sink(pipeline: &mut Pipeline) -> Rc<RefCell<Vec<String>>> {
        let messages = Rc::new(RefCell::new(Vec::new()));
        let sink_messages = Rc::clone(&messages);
        pipeline.set_status_sink(Box::new(move |text| {
            sink_messages.borrow_mut().push(text.to_string());
        }));
        messages
    }

    #[test]
    fn test_detection_by_content_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "capture.txt", SAMPLE_LOG);
        let filter = write_file(&dir, "rules.flt", SAMPLE_FILTER);
        let traces = write_file(&dir, "traces.json", SAMPLE_TRACES);
        let other = write_file(&dir, "notes.txt", "nothing to see\nhere\n");

        let mut pipeline = Pipeline::new();
        assert_eq!(pipeline.load(&log), FileKind::LogFile);
        assert_eq!(pipeline.load(&filter), FileKind::Filter);
        assert_eq!(pipeline.load(&traces), FileKind::TraceConfig);
        assert_eq!(pipeline.load(&other), FileKind::Unrecognized);
    }

    #[test]
    fn test_full_pipeline_in_any_load_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "capture.txt", SAMPLE_LOG);
        let filter = write_file(&dir, "rules.flt", SAMPLE_FILTER);
        let traces = write_file(&dir, "traces.json", SAMPLE_TRACES);

        // Filter and traces first, log last: everything recomputes when the
        // log arrives
        let mut pipeline = Pipeline::new();
        pipeline.load(&filter);
        pipeline.load(&traces);
        pipeline.load(&log);

        let table = pipeline.table();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), BASE_COLUMN_COUNT + 1);
        assert_eq!(table.rows[0][2].as_str(), "EngineStart");
        assert_eq!(table.rows[0][12].as_str(), "GREEN");
        assert_eq!(table.rows[2][2].as_str(), "EngineStop");

        let col = table.find_column("Running").unwrap();
        assert_eq!(table.rows[0][col], Value::Int(1));
        assert_eq!(table.rows[1][col], Value::Int(1));
        assert_eq!(table.rows[2][col], Value::Int(0));

        // Same files, log first: identical result
        let mut other = Pipeline::new();
        other.load(&log);
        other.load(&filter);
        other.load(&traces);
        assert_eq!(other.table().rows, pipeline.table().rows);
        assert_eq!(other.column_names(), pipeline.column_names());
    }

    #[test]
    fn test_configs_survive_log_reload() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "capture.txt", SAMPLE_LOG);
        let filter = write_file(&dir, "rules.flt", SAMPLE_FILTER);
        let traces = write_file(&dir, "traces.json", SAMPLE_TRACES);

        let mut pipeline = Pipeline::new();
        pipeline.load(&filter);
        pipeline.load(&traces);
        pipeline.load(&log);
        let first_rows = pipeline.table().rows.clone();

        // A second parse of the same log re-annotates without re-supplying
        // the filter or trace files
        pipeline.load(&log);
        assert_eq!(pipeline.table().rows, first_rows);
        assert_eq!(pipeline.filter_list().len(), 3);
        assert_eq!(pipeline.traces().len(), 1);
    }

    #[test]
    fn test_failed_parse_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "capture.txt", SAMPLE_LOG);
        let broken = write_file(&dir, "broken.txt", "HEADER_BEGIN\nno end\nx\nbad spec\n");

        let mut pipeline = Pipeline::new();
        let messages = capture_sink(&mut pipeline);
        pipeline.load(&log);
        assert_eq!(pipeline.table().row_count(), 3);

        assert_eq!(pipeline.load(&broken), FileKind::LogFile);
        assert_eq!(pipeline.table().row_count(), 3);
        assert!(messages
            .borrow()
            .iter()
            .any(|m| m.starts_with("Failed to load CanView log")));
    }

    #[test]
    fn test_status_messages() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "capture.txt", SAMPLE_LOG);
        let other = write_file(&dir, "notes.txt", "plain text\nfile\n");

        let mut pipeline = Pipeline::new();
        let messages = capture_sink(&mut pipeline);
        pipeline.load(&log);
        pipeline.load(&other);

        let messages = messages.borrow();
        assert!(messages.iter().any(|m| m.starts_with("Loading ")));
        assert!(messages.iter().any(|m| m == "CanView log loaded: 3 lines"));
        assert!(messages.iter().any(|m| m == "File type not recognized"));
    }

    #[test]
    fn test_save_trace_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let traces = write_file(&dir, "traces.json", SAMPLE_TRACES);

        let mut pipeline = Pipeline::new();
        pipeline.load(&traces);
        let saved = dir.path().join("saved.json");
        pipeline.save_trace_config(&saved).unwrap();

        let mut reloaded = Pipeline::new();
        reloaded.load(&saved);
        assert_eq!(reloaded.traces(), pipeline.traces());
    }

    #[test]
    fn test_trace_collision_reports_and_keeps_base_columns() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "capture.txt", SAMPLE_LOG);
        let bad = write_file(
            &dir,
            "bad.json",
            r#"[{"name": "ID", "high_msg": "123", "low_msg": "456"}]"#,
        );

        let mut pipeline = Pipeline::new();
        let messages = capture_sink(&mut pipeline);
        pipeline.load(&log);
        pipeline.load(&bad);

        assert_eq!(pipeline.table().column_count(), BASE_COLUMN_COUNT);
        assert!(messages
            .borrow()
            .iter()
            .any(|m| m.starts_with("Failed to rebuild traces")));
    }
}
