//! In-memory document storage for the open file.
//!
//! Provides a rope-backed text buffer with char-offset insertion,
//! line derivation and selection ranges.

mod buffer;

pub use buffer::{DocumentBuffer, Line, SelectionRange};
