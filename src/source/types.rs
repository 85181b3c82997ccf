//! Raw input event types delivered by an event source.
//!
//! These are the ephemeral notifications a platform input hook (or a replay
//! driver) pushes into the pipeline. They are never persisted directly; the
//! capture session converts them into timestamped log records.

use serde::{Deserialize, Serialize};

/// A key identifier as delivered by the event source.
///
/// The source representation may be a printable character, a control
/// character, or a named non-printable key. Unrecognized identifiers are
/// carried through verbatim as [`RawKey::Other`] so that resolution stays
/// total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawKey {
    /// A character key, including control characters (0x01-0x1F).
    Char(char),
    /// A named non-printable key.
    Named(NamedKey),
    /// Anything the source could not classify, kept as literal text.
    Other(String),
}

/// The fixed set of named non-printable keys the resolver knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedKey {
    Space,
    Backspace,
    Left,
    Right,
    Up,
    Down,
    Escape,
    Enter,
}

impl RawKey {
    /// Parse a textual source representation into a key.
    ///
    /// Strips the surrounding single quotes some sources put around
    /// character keys, then recognizes named-key spellings. Everything else
    /// falls through to [`RawKey::Other`] unchanged.
    pub fn from_text(text: &str) -> Self {
        let text = text
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .unwrap_or(text);

        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return RawKey::Char(c);
        }

        match text.to_lowercase().as_str() {
            "space" => RawKey::Named(NamedKey::Space),
            "backspace" => RawKey::Named(NamedKey::Backspace),
            "left" => RawKey::Named(NamedKey::Left),
            "right" => RawKey::Named(NamedKey::Right),
            "up" => RawKey::Named(NamedKey::Up),
            "down" => RawKey::Named(NamedKey::Down),
            "esc" | "escape" => RawKey::Named(NamedKey::Escape),
            "enter" | "return" => RawKey::Named(NamedKey::Enter),
            _ => RawKey::Other(text.to_string()),
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }
}

/// A raw input notification.
///
/// No ordering is guaranteed between the keyboard and pointer device
/// classes; ordering is established when the capture session timestamps and
/// appends the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RawEvent {
    KeyPress {
        key: RawKey,
    },
    MouseMove {
        x: i32,
        y: i32,
    },
    MouseClick {
        x: i32,
        y: i32,
        button: MouseButton,
        /// True for button-down, false for button-release.
        pressed: bool,
    },
}

impl RawEvent {
    /// Whether this event comes from the keyboard device class.
    pub fn is_keyboard(&self) -> bool {
        matches!(self, RawEvent::KeyPress { .. })
    }
}
