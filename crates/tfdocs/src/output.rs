//! Startup and failure messages on stderr.

use console::{Style, Term};

/// Width of the label column in the startup summary.
const LABEL_WIDTH: usize = 12;

/// Styled stderr writer for the `serve` command.
pub(crate) struct Output {
    term: Term,
    label: Style,
    link: Style,
    warn: Style,
    fail: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().dim(),
            link: Style::new().cyan().bold().underlined(),
            warn: Style::new().yellow(),
            fail: Style::new().red(),
        }
    }

    /// One `label  value` row of the startup summary.
    pub(crate) fn field(&self, label: &str, value: &str) {
        let label = format!("{label:<LABEL_WIDTH$}");
        let _ = self
            .term
            .write_line(&format!("{} {value}", self.label.apply_to(label)));
    }

    /// The local URL to open in a browser; printed last so it stays visible.
    pub(crate) fn preview_link(&self, url: &str) {
        let _ = self.term.write_line("");
        let _ = self
            .term
            .write_line(&format!("Preview link: {}", self.link.apply_to(url)));
    }

    /// Non-fatal problem the author should fix, e.g. a missing docs folder.
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.warn.apply_to(msg).to_string());
    }

    /// Fatal error before exit.
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.fail.apply_to(msg).to_string());
    }
}
