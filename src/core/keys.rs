//! Canonical key-name resolution.
//!
//! Maps a raw key identifier to the display name used in counts and log
//! records. The mapping is total: anything outside the control-character
//! range and the named-key set passes through as literal text.

use crate::source::types::{NamedKey, RawKey};

/// Resolve a raw key to its canonical display name.
///
/// Control characters 0x01-0x1F resolve to `ctrl-A` through `ctrl-_`;
/// named keys resolve to their fixed labels; everything else is returned
/// unchanged (e.g. `a`).
pub fn key_name(key: &RawKey) -> String {
    match key {
        RawKey::Char(c) => match *c as u32 {
            code @ 0x01..=0x1f => control_name(code as u8),
            _ => c.to_string(),
        },
        RawKey::Named(named) => named_label(*named).to_string(),
        RawKey::Other(text) => text.clone(),
    }
}

/// Display name for a control character.
///
/// Codes 0x01-0x1F line up with ASCII `A`-`_`, covering ctrl-A through
/// ctrl-_ (31 entries).
fn control_name(code: u8) -> String {
    format!("ctrl-{}", (0x40 + code) as char)
}

fn named_label(key: NamedKey) -> &'static str {
    match key {
        NamedKey::Space => "SPACE",
        NamedKey::Backspace => "BACKSPACE",
        NamedKey::Left => "LEFT_ARROW",
        NamedKey::Right => "RIGHT_ARROW",
        NamedKey::Up => "UP_ARROW",
        NamedKey::Down => "DOWN_ARROW",
        NamedKey::Escape => "ESC",
        NamedKey::Enter => "ENTER",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_character_range() {
        assert_eq!(key_name(&RawKey::Char('\x01')), "ctrl-A");
        assert_eq!(key_name(&RawKey::Char('\x03')), "ctrl-C");
        assert_eq!(key_name(&RawKey::Char('\x1a')), "ctrl-Z");
        assert_eq!(key_name(&RawKey::Char('\x1b')), "ctrl-[");
        assert_eq!(key_name(&RawKey::Char('\x1f')), "ctrl-_");
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(key_name(&RawKey::Named(NamedKey::Space)), "SPACE");
        assert_eq!(key_name(&RawKey::Named(NamedKey::Backspace)), "BACKSPACE");
        assert_eq!(key_name(&RawKey::Named(NamedKey::Left)), "LEFT_ARROW");
        assert_eq!(key_name(&RawKey::Named(NamedKey::Enter)), "ENTER");
    }

    #[test]
    fn test_printable_passthrough() {
        assert_eq!(key_name(&RawKey::Char('a')), "a");
        assert_eq!(key_name(&RawKey::Char('7')), "7");
    }

    #[test]
    fn test_unmapped_falls_through() {
        assert_eq!(
            key_name(&RawKey::Other("media_play".to_string())),
            "media_play"
        );
    }
}
