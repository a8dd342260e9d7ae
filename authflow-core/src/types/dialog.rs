//! Dialog content passed to the host

use serde::{Deserialize, Serialize};

/// Plain dialog content: a heading followed by text lines
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogContent {
    pub heading: String,
    pub lines: Vec<String>,
}

impl DialogContent {
    #[must_use]
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }
}
