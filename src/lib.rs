//! Input Trace - user input activity capture and labeling pipeline.
//!
//! This library instruments raw input activity (keystrokes, pointer motion,
//! clicks), converts the stream into timestamped, interval-annotated records,
//! aggregates summary metrics, and classifies exported records into coarse
//! behavioral categories via threshold rules.
//!
//! # Architecture
//!
//! ```text
//! EventSource ──▶ CaptureSession ──▶ MetricsSummarizer
//!  (OS hook /      (event log,            │
//!   replay)         counters)             ▼
//!                                    ExportWriter ──▶ capture log (CSV)
//!                                                          │
//!                                                          ▼
//!                                                   LabelingEngine
//!                                                          │
//!                                                          ▼
//!                                                   labeled log (CSV)
//! ```
//!
//! The OS input-hook mechanism is an external collaborator: it pushes raw
//! events through a [`source::SourceHandle`], and the embedding caller owns
//! the capture-window timer.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use input_trace::core::CaptureSession;
//! use input_trace::source::RawKey;
//!
//! let session = CaptureSession::new(Duration::from_secs(3));
//! session.on_keystroke(&RawKey::Char('a'));
//! let report = session.finish().expect("first finish");
//! println!("{} keystrokes", report.metrics.total_keystrokes);
//! ```

pub mod config;
pub mod core;
pub mod export;
pub mod source;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, SourceConfig};
pub use core::{
    key_name, label_record, summarize, BehaviorLabel, CaptureSession, EventKind, KeyCount,
    LabelThresholds, LoggedEvent, SessionError, SessionMetrics, SessionReport, TypingLabel,
};
pub use export::{label_file, write_capture_log, ExportError};
pub use source::{
    ChannelSource, MouseButton, NamedKey, RawEvent, RawKey, SourceError, SourceHandle,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
