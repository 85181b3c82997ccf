//! Channel-backed event source.
//!
//! A platform input hook runs on its own thread(s) and pushes raw events
//! through a [`SourceHandle`]; the capture loop drains them from the
//! receiving side. The channel is bounded so a stalled consumer sheds events
//! instead of growing without limit.

use crate::source::types::{MouseButton, RawEvent, RawKey};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Which device classes the source forwards.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub keyboard: bool,
    pub mouse: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            keyboard: true,
            mouse: true,
        }
    }
}

/// Errors that can occur while operating an event source.
#[derive(Debug)]
pub enum SourceError {
    AlreadyRunning,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::AlreadyRunning => write!(f, "Event source is already running"),
        }
    }
}

impl std::error::Error for SourceError {}

/// The consumer side of an event source.
///
/// Hooks deliver events through handles obtained from [`ChannelSource::handle`];
/// delivery only happens between `start()` and `stop()`.
pub struct ChannelSource {
    options: SourceOptions,
    sender: Sender<RawEvent>,
    receiver: Receiver<RawEvent>,
    running: Arc<AtomicBool>,
}

impl ChannelSource {
    /// Create a new event source with the given device filter.
    pub fn new(options: SourceOptions) -> Self {
        let (sender, receiver) = bounded(10_000);
        Self {
            options,
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start accepting events from producers.
    pub fn start(&mut self) -> Result<(), SourceError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(SourceError::AlreadyRunning);
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Stop accepting events. Handles held by producers go inert.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the source is currently accepting events.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for raw events.
    pub fn receiver(&self) -> &Receiver<RawEvent> {
        &self.receiver
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&self) -> Option<RawEvent> {
        self.receiver.try_recv().ok()
    }

    /// Obtain a cloneable producer handle for a hook or replay driver.
    pub fn handle(&self) -> SourceHandle {
        SourceHandle {
            options: self.options.clone(),
            sender: self.sender.clone(),
            running: self.running.clone(),
        }
    }
}

/// The producer side of an event source.
#[derive(Clone)]
pub struct SourceHandle {
    options: SourceOptions,
    sender: Sender<RawEvent>,
    running: Arc<AtomicBool>,
}

impl SourceHandle {
    /// Deliver a key-press notification.
    pub fn key_press(&self, key: RawKey) {
        self.deliver(RawEvent::KeyPress { key });
    }

    /// Deliver a pointer-move notification.
    pub fn mouse_move(&self, x: i32, y: i32) {
        self.deliver(RawEvent::MouseMove { x, y });
    }

    /// Deliver a pointer-click notification.
    pub fn mouse_click(&self, x: i32, y: i32, button: MouseButton, pressed: bool) {
        self.deliver(RawEvent::MouseClick {
            x,
            y,
            button,
            pressed,
        });
    }

    /// Deliver a raw event, subject to the source filter and run state.
    ///
    /// Events sent while the source is stopped, filtered out, or arriving
    /// faster than the consumer can drain are dropped, never queued or
    /// blocked on.
    pub fn deliver(&self, event: RawEvent) {
        if !self.running.load(Ordering::SeqCst) {
            return;
        }
        let wanted = if event.is_keyboard() {
            self.options.keyboard
        } else {
            self.options.mouse
        };
        if wanted {
            let _ = self.sender.try_send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_lifecycle() {
        let mut source = ChannelSource::new(SourceOptions::default());
        assert!(!source.is_running());

        source.start().expect("first start should succeed");
        assert!(source.is_running());
        assert!(matches!(source.start(), Err(SourceError::AlreadyRunning)));

        source.stop();
        assert!(!source.is_running());
    }

    #[test]
    fn test_events_dropped_while_stopped() {
        let source = ChannelSource::new(SourceOptions::default());
        let handle = source.handle();

        handle.key_press(RawKey::Char('a'));
        assert!(source.try_recv().is_none());
    }

    #[test]
    fn test_device_filter() {
        let mut source = ChannelSource::new(SourceOptions {
            keyboard: true,
            mouse: false,
        });
        source.start().expect("start");
        let handle = source.handle();

        handle.mouse_move(10, 20);
        handle.key_press(RawKey::Char('a'));

        let event = source.try_recv().expect("keyboard event should pass");
        assert!(event.is_keyboard());
        assert!(source.try_recv().is_none());
    }
}
