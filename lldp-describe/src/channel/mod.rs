//! Channel layer for prompt matching over a PTY shell.
//!
//! Output is accumulated in a [`PatternBuffer`] with terminal escape
//! sequences removed, and reads complete when a prompt pattern shows up
//! in the buffer tail.

mod buffer;
mod pty;

pub use buffer::PatternBuffer;
pub use pty::{PtyChannel, PtyConfig};
