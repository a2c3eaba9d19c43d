//! Structured diagnostics returned by every validate/operate/convert call
//!
//! A [`ProcessStatus`] holds three ordered lists. It is successful iff the
//! error list is empty. When a node embeds another node's diagnostics it
//! re-parents them with its own title, so an entry's target reads like a
//! breadcrumb (`"#2 Filter rows > And > Contains"`) while the leaf message
//! stays untouched.

use serde::Serialize;
use std::fmt;

const BREADCRUMB: &str = " > ";

/// One diagnostic line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    /// Breadcrumb of node titles, outermost first
    pub target: String,
    /// Name of the offending argument, if any
    pub argument: Option<String>,
    /// Human-readable description
    pub message: String,
}

impl StatusEntry {
    /// Create an entry with no target yet; the owning node fills it in
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            target: String::new(),
            argument: None,
            message: message.into(),
        }
    }

    /// Attach the argument the entry is about
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    /// Prefix the target with a parent title
    pub fn reparent(mut self, title: &str) -> Self {
        self.target = if self.target.is_empty() {
            title.to_string()
        } else {
            format!("{}{}{}", title, BREADCRUMB, self.target)
        };
        self
    }
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(argument) => write!(f, "{} [{}]: {}", self.target, argument, self.message),
            None => write!(f, "{}: {}", self.target, self.message),
        }
    }
}

/// Severity of an entry, used when iterating all entries together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Message,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Message => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Messages, warnings and errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessStatus {
    pub messages: Vec<StatusEntry>,
    pub warnings: Vec<StatusEntry>,
    pub errors: Vec<StatusEntry>,
}

impl ProcessStatus {
    /// Create an empty, successful status
    pub fn new() -> Self {
        Self::default()
    }

    /// Status holding a single error
    pub fn from_error(entry: StatusEntry) -> Self {
        let mut status = Self::new();
        status.errors.push(entry);
        status
    }

    /// True iff there are no errors
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// True if nothing at all was reported
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.warnings.is_empty() && self.errors.is_empty()
    }

    /// Record an informational message
    pub fn message(&mut self, message: impl Into<String>) {
        self.messages.push(StatusEntry::new(message));
    }

    /// Record a warning
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(StatusEntry::new(message));
    }

    /// Record an error
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(StatusEntry::new(message));
    }

    /// Record an error about a specific argument
    pub fn argument_error(&mut self, argument: &str, message: impl Into<String>) {
        self.errors
            .push(StatusEntry::new(message).with_argument(argument));
    }

    /// Record a prepared error entry
    pub fn push_error(&mut self, entry: StatusEntry) {
        self.errors.push(entry);
    }

    /// Append another status as-is
    pub fn merge(&mut self, other: ProcessStatus) {
        self.messages.extend(other.messages);
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }

    /// Prefix every entry's target with `title`
    pub fn reparent(self, title: &str) -> Self {
        let wrap = |entries: Vec<StatusEntry>| {
            entries
                .into_iter()
                .map(|e| e.reparent(title))
                .collect::<Vec<_>>()
        };
        Self {
            messages: wrap(self.messages),
            warnings: wrap(self.warnings),
            errors: wrap(self.errors),
        }
    }

    /// All entries tagged with their severity, errors first
    pub fn entries(&self) -> impl Iterator<Item = (Severity, &StatusEntry)> {
        self.errors
            .iter()
            .map(|e| (Severity::Error, e))
            .chain(self.warnings.iter().map(|e| (Severity::Warning, e)))
            .chain(self.messages.iter().map(|e| (Severity::Message, e)))
    }
}
