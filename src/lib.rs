//! Bookshelf application library
//!
//! Application modules mounted by the bookshelf HTTP server.

pub mod modules;

/// Re-export commonly used types
pub use modules::*;
