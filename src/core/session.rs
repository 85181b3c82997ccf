//! Capture session: turns raw notifications into an ordered event log.
//!
//! One session owns the capture state for a single bounded window. Keyboard
//! and pointer notifications may arrive concurrently; a single mutex
//! serializes them so every handler sees a consistent prior state and log
//! appends keep arrival order.

use crate::core::keys::key_name;
use crate::core::metrics::{self, KeyCount, SessionMetrics};
use crate::source::types::{MouseButton, RawEvent, RawKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

/// One record in the capture log. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Per-class payload of a logged event.
///
/// Keystrokes and clicks carry the elapsed time since the previous event of
/// the same class; moves are logged at full fidelity with no interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventKind {
    Keystroke {
        key: String,
        interval: f64,
    },
    MouseMove {
        x: i32,
        y: i32,
    },
    MouseClick {
        x: i32,
        y: i32,
        button: String,
        interval: f64,
    },
}

impl EventKind {
    /// The `event_type` value this kind serializes as.
    pub fn type_name(&self) -> &'static str {
        match self {
            EventKind::Keystroke { .. } => "keystroke",
            EventKind::MouseMove { .. } => "mouse_move",
            EventKind::MouseClick { .. } => "mouse_click",
        }
    }

    /// Same-class interval, when this class tracks one.
    pub fn interval(&self) -> Option<f64> {
        match self {
            EventKind::Keystroke { interval, .. } => Some(*interval),
            EventKind::MouseMove { .. } => None,
            EventKind::MouseClick { interval, .. } => Some(*interval),
        }
    }
}

/// Errors from session lifecycle operations.
#[derive(Debug)]
pub enum SessionError {
    /// `finish()` was called on an already-finished session.
    Finished,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Finished => write!(f, "Capture session is already finished"),
        }
    }
}

impl std::error::Error for SessionError {}

/// The finalized output of one capture window.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub events: Vec<LoggedEvent>,
    pub metrics: SessionMetrics,
}

/// Mutable capture state, guarded as a unit.
struct SessionState {
    closed: bool,
    events: Vec<LoggedEvent>,
    key_counts: KeyCount,
    key_intervals: Vec<f64>,
    click_intervals: Vec<f64>,
    last_keystroke: DateTime<Utc>,
    last_click: DateTime<Utc>,
}

/// Capture state for one bounded time window.
///
/// Constructed in the running state; `finish()` closes it exactly once.
/// The session does not time itself out: the embedding caller owns the
/// wall-clock timer and calls `finish()` when the window ends.
pub struct CaptureSession {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    window: Duration,
    state: Mutex<SessionState>,
}

impl CaptureSession {
    /// Start a new session with the given window duration.
    pub fn new(window: Duration) -> Self {
        Self::starting_at(window, Utc::now())
    }

    /// Start a new session with an explicit start time (replay and tests).
    pub fn starting_at(window: Duration, start: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: start,
            window,
            state: Mutex::new(SessionState {
                closed: false,
                events: Vec::new(),
                key_counts: KeyCount::new(),
                key_intervals: Vec::new(),
                click_intervals: Vec::new(),
                // First-of-class intervals measure from session start.
                last_keystroke: start,
                last_click: start,
            }),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Dispatch a raw notification to the matching handler.
    pub fn handle(&self, event: &RawEvent) {
        match event {
            RawEvent::KeyPress { key } => self.on_keystroke(key),
            RawEvent::MouseMove { x, y } => self.on_mouse_move(*x, *y),
            RawEvent::MouseClick {
                x,
                y,
                button,
                pressed,
            } => self.on_mouse_click(*x, *y, *button, *pressed),
        }
    }

    /// Handle a key-press notification.
    pub fn on_keystroke(&self, key: &RawKey) {
        self.record_keystroke(key, Utc::now());
    }

    /// Handle a key-press notification with an explicit timestamp.
    pub fn record_keystroke(&self, key: &RawKey, now: DateTime<Utc>) {
        let name = key_name(key);
        let mut state = self.state();
        if state.closed {
            return;
        }

        *state.key_counts.entry(name.clone()).or_insert(0) += 1;

        let interval = seconds_between(state.last_keystroke, now);
        state.key_intervals.push(interval);
        state.last_keystroke = now;
        state.events.push(LoggedEvent {
            timestamp: now,
            kind: EventKind::Keystroke {
                key: name,
                interval,
            },
        });
    }

    /// Handle a pointer-move notification.
    pub fn on_mouse_move(&self, x: i32, y: i32) {
        self.record_mouse_move(x, y, Utc::now());
    }

    /// Handle a pointer-move notification with an explicit timestamp.
    ///
    /// Moves are logged at full fidelity; no interval baseline is tracked
    /// for this class.
    pub fn record_mouse_move(&self, x: i32, y: i32, now: DateTime<Utc>) {
        let mut state = self.state();
        if state.closed {
            return;
        }
        state.events.push(LoggedEvent {
            timestamp: now,
            kind: EventKind::MouseMove { x, y },
        });
    }

    /// Handle a pointer-click notification.
    pub fn on_mouse_click(&self, x: i32, y: i32, button: MouseButton, pressed: bool) {
        self.record_mouse_click(x, y, button, pressed, Utc::now());
    }

    /// Handle a pointer-click notification with an explicit timestamp.
    ///
    /// Button-release notifications are ignored.
    pub fn record_mouse_click(
        &self,
        x: i32,
        y: i32,
        button: MouseButton,
        pressed: bool,
        now: DateTime<Utc>,
    ) {
        if !pressed {
            return;
        }
        let mut state = self.state();
        if state.closed {
            return;
        }

        let interval = seconds_between(state.last_click, now);
        state.click_intervals.push(interval);
        state.last_click = now;
        state.events.push(LoggedEvent {
            timestamp: now,
            kind: EventKind::MouseClick {
                x,
                y,
                button: button.as_str().to_string(),
                interval,
            },
        });
    }

    /// Number of events logged so far.
    pub fn event_count(&self) -> usize {
        self.state().events.len()
    }

    /// Close the session and compute its metrics.
    ///
    /// Transitions Running -> Closed exactly once; later notifications are
    /// dropped and a second `finish()` is an error.
    pub fn finish(&self) -> Result<SessionReport, SessionError> {
        let mut state = self.state();
        if state.closed {
            return Err(SessionError::Finished);
        }
        state.closed = true;

        let events = std::mem::take(&mut state.events);
        let key_counts = std::mem::take(&mut state.key_counts);
        let total_keystrokes = state.key_intervals.len() as u64;
        let metrics = metrics::summarize(
            total_keystrokes,
            self.window.as_secs_f64(),
            &state.key_intervals,
            &state.click_intervals,
            key_counts,
        );

        Ok(SessionReport { events, metrics })
    }

    /// A poisoned lock still holds usable state; capture keeps going.
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Elapsed seconds between two timestamps, clamped at zero.
fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    ((later - earlier).num_milliseconds() as f64 / 1000.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn at_ms(offset_ms: i64) -> DateTime<Utc> {
        start_time() + chrono::Duration::milliseconds(offset_ms)
    }

    fn test_session() -> CaptureSession {
        CaptureSession::starting_at(Duration::from_secs(3), start_time())
    }

    #[test]
    fn test_key_counts_match_notifications() {
        let session = test_session();
        session.record_keystroke(&RawKey::Char('a'), at_ms(100));
        session.record_keystroke(&RawKey::Char('b'), at_ms(200));
        session.record_keystroke(&RawKey::Char('a'), at_ms(300));

        let report = session.finish().expect("finish");
        assert_eq!(report.metrics.key_counts.get("a"), Some(&2));
        assert_eq!(report.metrics.key_counts.get("b"), Some(&1));
        assert_eq!(report.metrics.total_keystrokes, 3);
    }

    #[test]
    fn test_first_keystroke_interval_from_session_start() {
        let session = test_session();
        session.record_keystroke(&RawKey::Char('a'), at_ms(500));

        let report = session.finish().expect("finish");
        assert_eq!(report.events[0].kind.interval(), Some(0.5));
    }

    #[test]
    fn test_keystroke_intervals_ignore_mouse_events() {
        let session = test_session();
        session.record_keystroke(&RawKey::Char('a'), at_ms(100));
        session.record_mouse_move(10, 20, at_ms(150));
        session.record_mouse_click(10, 20, MouseButton::Left, true, at_ms(200));
        session.record_keystroke(&RawKey::Char('b'), at_ms(400));

        let report = session.finish().expect("finish");
        let last = report.events.last().expect("events logged");
        // 400ms - 100ms, measured against the previous keystroke only
        assert_eq!(last.kind.interval(), Some(0.3));
    }

    #[test]
    fn test_click_interval_baseline() {
        let session = test_session();
        session.record_mouse_click(1, 1, MouseButton::Left, true, at_ms(1000));
        session.record_mouse_click(2, 2, MouseButton::Right, true, at_ms(1400));

        let report = session.finish().expect("finish");
        assert_eq!(report.events[0].kind.interval(), Some(1.0));
        assert_eq!(report.events[1].kind.interval(), Some(0.4));
    }

    #[test]
    fn test_button_release_ignored() {
        let session = test_session();
        session.record_mouse_click(1, 1, MouseButton::Left, false, at_ms(100));
        assert_eq!(session.event_count(), 0);
    }

    #[test]
    fn test_mouse_move_has_no_interval() {
        let session = test_session();
        session.record_mouse_move(5, 5, at_ms(100));

        let report = session.finish().expect("finish");
        assert_eq!(report.events[0].kind.interval(), None);
        assert_eq!(report.events[0].kind.type_name(), "mouse_move");
    }

    #[test]
    fn test_log_preserves_arrival_order() {
        let session = test_session();
        session.record_keystroke(&RawKey::Char('a'), at_ms(100));
        session.record_mouse_move(1, 1, at_ms(120));
        session.record_keystroke(&RawKey::Char('b'), at_ms(140));

        let report = session.finish().expect("finish");
        let types: Vec<&str> = report.events.iter().map(|e| e.kind.type_name()).collect();
        assert_eq!(types, vec!["keystroke", "mouse_move", "keystroke"]);
    }

    #[test]
    fn test_events_dropped_after_finish() {
        let session = test_session();
        session.record_keystroke(&RawKey::Char('a'), at_ms(100));
        session.finish().expect("finish");

        session.record_keystroke(&RawKey::Char('b'), at_ms(200));
        assert_eq!(session.event_count(), 0);
    }

    #[test]
    fn test_double_finish_is_error() {
        let session = test_session();
        session.finish().expect("first finish");
        assert!(matches!(session.finish(), Err(SessionError::Finished)));
    }

    #[test]
    fn test_metrics_use_window_duration() {
        let session = test_session();
        for i in 0..6 {
            session.record_keystroke(&RawKey::Char('x'), at_ms(100 * (i + 1)));
        }

        let report = session.finish().expect("finish");
        // 6 keystrokes over a 3 second window
        assert_eq!(report.metrics.typing_speed_kpm, 120.0);
        assert_eq!(report.metrics.typing_speed_wpm, 24.0);
    }

    #[test]
    fn test_concurrent_handlers() {
        use std::sync::Arc;

        let session = Arc::new(CaptureSession::new(Duration::from_secs(3)));
        let mut handles = Vec::new();

        for _ in 0..4 {
            let session = session.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..250 {
                    session.on_keystroke(&RawKey::Char('k'));
                    session.on_mouse_move(3, 4);
                }
            }));
        }
        for handle in handles {
            handle.join().expect("worker");
        }

        let report = session.finish().expect("finish");
        assert_eq!(report.metrics.total_keystrokes, 1000);
        assert_eq!(report.metrics.key_counts.get("k"), Some(&1000));
        assert_eq!(report.events.len(), 2000);
    }
}
