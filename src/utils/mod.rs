//! Generic utility primitives with zero domain knowledge.
//!
//! - `args` - Flag token normalization
//! - `io` - File I/O with consistent error handling
//! - `parser` - Text extraction and line splitting
//! - `process` - Local command execution with shell errors

pub mod args;
pub mod io;
pub mod parser;
pub mod process;
