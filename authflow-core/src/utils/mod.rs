//! Utility functions

mod text;

pub use text::{strip_newlines, truncate_for_log};
