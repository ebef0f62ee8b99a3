//! Colored terminal output utilities.
//!
//! Everything goes to stderr; stdout is reserved for composed markup.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    tag: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            tag: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.red.apply_to(msg).to_string());
    }

    /// Print a component tag followed by a dimmed detail.
    pub(crate) fn component(&self, tag: &str, detail: &str) {
        let tag = self.tag.apply_to(format!("<{tag}>"));
        let detail = self.dim.apply_to(detail);
        self.line(&format!("{tag:<24} {detail}"));
    }

    fn line(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }
}
