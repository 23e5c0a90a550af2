//! Channel layer for prompt matching and PTY operations.
//!
//! This module handles the interactive shell, including pattern-based
//! prompt detection and ANSI stripping.

mod buffer;
mod pty;

pub use buffer::PatternBuffer;
pub use pty::{DEFAULT_SEARCH_DEPTH, PtyChannel};
