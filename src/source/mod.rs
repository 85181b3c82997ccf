//! Event source plumbing for the input-trace pipeline.
//!
//! A platform input hook is an external collaborator; this module provides
//! the raw event types it emits and the channel machinery that carries them
//! to the capture session.

pub mod channel;
pub mod types;

// Re-export commonly used types
pub use channel::{ChannelSource, SourceError, SourceHandle, SourceOptions};
pub use types::{MouseButton, NamedKey, RawEvent, RawKey};
