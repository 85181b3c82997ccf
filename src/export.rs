//! Persisted capture-log format and the labeling file pass.
//!
//! A capture log is a text CSV with two blocks: a `Metric,Value` header
//! block carrying the session metrics, a single blank line, then the event
//! table with one row per logged event in log order. The labeling pass
//! reads the event table back and appends two label columns, leaving every
//! original column and row untouched.

use crate::core::labeling::{label_record, LabelThresholds};
use crate::core::metrics::SessionMetrics;
use crate::core::session::{EventKind, LoggedEvent};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Errors from reading or writing capture-log files.
///
/// Fatal to the affected operation only; in-memory session state is not
/// touched by a failed export.
#[derive(Debug)]
pub enum ExportError {
    Io(String),
    Csv(String),
    MissingColumn(&'static str),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "IO error: {e}"),
            ExportError::Csv(e) => write!(f, "CSV error: {e}"),
            ExportError::MissingColumn(name) => {
                write!(f, "Input file is missing the '{name}' column")
            }
        }
    }
}

impl std::error::Error for ExportError {}

/// Fixed order of the metrics block rows.
const METRIC_ROWS: &[&str] = &[
    "Total Keystrokes",
    "Typing Speed (KPM)",
    "Typing Speed (WPM)",
    "Avg. Keypress Interval",
    "Avg. Mouse Click Interval",
    "Most Pressed Keys",
];

/// Write a session's metrics and event log to a capture-log file.
///
/// Consumers rely on the metrics block coming first and on event rows
/// keeping exact log order.
pub fn write_capture_log(
    path: &Path,
    metrics: &SessionMetrics,
    events: &[LoggedEvent],
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ExportError::Io(e.to_string()))?;
    }
    let mut file = File::create(path).map_err(|e| ExportError::Io(e.to_string()))?;

    write_metrics_block(&mut file, metrics)?;
    file.write_all(b"\n")
        .map_err(|e| ExportError::Io(e.to_string()))?;
    write_event_block(&mut file, events)?;

    Ok(())
}

fn write_metrics_block(file: &mut File, metrics: &SessionMetrics) -> Result<(), ExportError> {
    let key_counts_cell =
        serde_json::to_string(&metrics.key_counts).map_err(|e| ExportError::Csv(e.to_string()))?;
    let values = [
        metrics.total_keystrokes.to_string(),
        metrics.typing_speed_kpm.to_string(),
        metrics.typing_speed_wpm.to_string(),
        metrics.avg_keypress_interval.to_string(),
        metrics.avg_click_interval.to_string(),
        key_counts_cell,
    ];

    let mut writer = csv::Writer::from_writer(&mut *file);
    writer
        .write_record(["Metric", "Value"])
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    for (name, value) in METRIC_ROWS.iter().zip(values.iter()) {
        writer
            .write_record([*name, value.as_str()])
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }
    writer.flush().map_err(|e| ExportError::Io(e.to_string()))?;
    Ok(())
}

fn write_event_block(file: &mut File, events: &[LoggedEvent]) -> Result<(), ExportError> {
    let columns = event_columns(events);
    if columns.is_empty() {
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(&mut *file);
    writer
        .write_record(&columns)
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    for event in events {
        let row: Vec<String> = columns
            .iter()
            .map(|column| field_value(event, column).unwrap_or_default())
            .collect();
        writer
            .write_record(&row)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }
    writer.flush().map_err(|e| ExportError::Io(e.to_string()))?;
    Ok(())
}

/// Header of the event block: the union of field names across records, in
/// first-seen order.
fn event_columns(events: &[LoggedEvent]) -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = Vec::new();
    for event in events {
        for field in kind_fields(&event.kind) {
            if !columns.contains(field) {
                columns.push(field);
            }
        }
    }
    columns
}

fn kind_fields(kind: &EventKind) -> &'static [&'static str] {
    match kind {
        EventKind::Keystroke { .. } => &["timestamp", "event_type", "key", "interval"],
        EventKind::MouseMove { .. } => &["timestamp", "event_type", "x", "y"],
        EventKind::MouseClick { .. } => &["timestamp", "event_type", "x", "y", "button", "interval"],
    }
}

/// Cell value of one column for one event; `None` serializes as empty.
fn field_value(event: &LoggedEvent, column: &str) -> Option<String> {
    match column {
        "timestamp" => Some(epoch_seconds(event.timestamp)),
        "event_type" => Some(event.kind.type_name().to_string()),
        "key" => match &event.kind {
            EventKind::Keystroke { key, .. } => Some(key.clone()),
            _ => None,
        },
        "interval" => event.kind.interval().map(|i| i.to_string()),
        "x" => match &event.kind {
            EventKind::MouseMove { x, .. } | EventKind::MouseClick { x, .. } => Some(x.to_string()),
            _ => None,
        },
        "y" => match &event.kind {
            EventKind::MouseMove { y, .. } | EventKind::MouseClick { y, .. } => Some(y.to_string()),
            _ => None,
        },
        "button" => match &event.kind {
            EventKind::MouseClick { button, .. } => Some(button.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn epoch_seconds(timestamp: DateTime<Utc>) -> String {
    format!("{:.6}", timestamp.timestamp_micros() as f64 / 1_000_000.0)
}

/// Run the labeling pass over an exported event table.
///
/// The input needs at least an `event_type` column; a full capture log with
/// a leading metrics block is accepted and the block is skipped. The output
/// repeats every original column and row in order, with `Typing_Label` and
/// `Behavior_Label` columns appended.
pub fn label_file(
    input: &Path,
    output: &Path,
    thresholds: &LabelThresholds,
) -> Result<(), ExportError> {
    let content = std::fs::read_to_string(input).map_err(|e| ExportError::Io(e.to_string()))?;
    let table = event_table(&content);

    let mut reader = csv::Reader::from_reader(table.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| ExportError::Csv(e.to_string()))?
        .clone();
    let event_type_idx = headers
        .iter()
        .position(|h| h == "event_type")
        .ok_or(ExportError::MissingColumn("event_type"))?;
    let interval_idx = headers.iter().position(|h| h == "interval");

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ExportError::Io(e.to_string()))?;
    }
    let mut writer =
        csv::Writer::from_path(output).map_err(|e| ExportError::Csv(e.to_string()))?;

    let mut out_header = headers.clone();
    out_header.push_field("Typing_Label");
    out_header.push_field("Behavior_Label");
    writer
        .write_record(&out_header)
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for record in reader.records() {
        let record = record.map_err(|e| ExportError::Csv(e.to_string()))?;
        let event_type = record.get(event_type_idx).unwrap_or("");
        let interval = interval_idx
            .and_then(|idx| record.get(idx))
            .filter(|cell| !cell.is_empty())
            .and_then(|cell| cell.parse::<f64>().ok());

        let (typing, behavior) = label_record(event_type, interval, thresholds);

        let mut out = record.clone();
        out.push_field(typing.map(|l| l.as_str()).unwrap_or(""));
        out.push_field(behavior.map(|l| l.as_str()).unwrap_or(""));
        writer
            .write_record(&out)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    writer.flush().map_err(|e| ExportError::Io(e.to_string()))?;
    Ok(())
}

/// Strip a leading metrics block, if present, leaving the event table.
fn event_table(content: &str) -> &str {
    if content.starts_with("Metric,") {
        if let Some(split) = content.find("\n\n") {
            return &content[split + 2..];
        }
    }
    content
}
