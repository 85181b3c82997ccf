//! Core functionality of the input-trace pipeline.
//!
//! This module contains:
//! - Key-name resolution for raw key identifiers
//! - The capture session that builds the timestamped event log
//! - Metrics aggregation over a finished window
//! - Threshold-based labeling of exported records

pub mod keys;
pub mod labeling;
pub mod metrics;
pub mod session;

// Re-export commonly used types
pub use keys::key_name;
pub use labeling::{label_record, BehaviorLabel, LabelThresholds, TypingLabel};
pub use metrics::{summarize, KeyCount, SessionMetrics};
pub use session::{CaptureSession, EventKind, LoggedEvent, SessionError, SessionReport};
