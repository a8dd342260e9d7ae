//! Dialog for the stdio development host
//!
//! Stdin carries the protocol, so nothing can be typed in reply. Dialogs are
//! printed to stderr; confirmations answer with the configured default and
//! prompts are always dismissed. Only headings reach the log since dialog
//! bodies may hold passwords.

use async_trait::async_trait;
use authflow_core::error::CoreResult;
use authflow_core::traits::Dialog;
use authflow_core::types::DialogContent;

pub struct ConsoleDialog {
    auto_approve: bool,
}

impl ConsoleDialog {
    #[must_use]
    pub fn new(auto_approve: bool) -> Self {
        Self { auto_approve }
    }
}

fn render(content: &DialogContent) -> String {
    let mut out = format!("[{}]", content.heading);
    for line in &content.lines {
        out.push_str(" | ");
        out.push_str(line);
    }
    out
}

#[async_trait]
impl Dialog for ConsoleDialog {
    async fn confirm(&self, content: &DialogContent) -> CoreResult<bool> {
        let answer = if self.auto_approve { "approved" } else { "declined" };
        eprintln!("{} -> {answer}", render(content));
        tracing::debug!("Confirmation '{}' {answer}", content.heading);
        Ok(self.auto_approve)
    }

    async fn alert(&self, content: &DialogContent) -> CoreResult<()> {
        eprintln!("{}", render(content));
        tracing::debug!("Alert '{}' shown", content.heading);
        Ok(())
    }

    async fn prompt(&self, content: &DialogContent) -> CoreResult<Option<String>> {
        eprintln!("{} -> dismissed", render(content));
        tracing::debug!("Prompt '{}' dismissed", content.heading);
        Ok(None)
    }
}
