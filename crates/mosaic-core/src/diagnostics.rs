//! Compiler diagnostics and error sinks.
//!
//! Providers never decide on their own whether a diagnostic aborts
//! compilation: they report it to an [`ErrorSink`], and the sink either
//! returns an error (abort) or records it and lets the provider continue.

use std::fmt;

use parking_lot::Mutex;

use crate::error::CompilationError;
use crate::span::Span;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
    /// Compilation of the unit cannot continue.
    Fatal,
}

impl Severity {
    pub fn is_error(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
            Severity::Fatal => f.write_str("fatal"),
        }
    }
}

/// One message produced while compiling a source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Identity of the source unit, if known.
    pub source_id: Option<String>,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            source_id: None,
            span: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, message)
    }

    pub fn in_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source_id, &self.span) {
            (Some(id), Some(span)) => write!(f, "{}:{}: ", id, span)?,
            (Some(id), None) => write!(f, "{}: ", id)?,
            (None, Some(span)) => write!(f, "{}: ", span)?,
            (None, None) => {}
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Destination for diagnostics.
///
/// Returning `Err` from [`report`](ErrorSink::report) tells the provider to
/// stop compiling the current unit.
pub trait ErrorSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic) -> Result<(), CompilationError>;
}

/// Default sink: raises on the first error, logs warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct RaisingSink;

impl ErrorSink for RaisingSink {
    fn report(&self, diagnostic: Diagnostic) -> Result<(), CompilationError> {
        if diagnostic.severity.is_error() {
            Err(CompilationError::Reported(diagnostic))
        } else {
            log::warn!("{}", diagnostic);
            Ok(())
        }
    }
}

/// Records every diagnostic and only raises on fatal ones.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    /// Number of error or fatal diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .lock()
            .iter()
            .filter(|d| d.severity.is_error())
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

impl ErrorSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) -> Result<(), CompilationError> {
        let fatal = diagnostic.severity == Severity::Fatal;
        self.diagnostics.lock().push(diagnostic.clone());
        if fatal {
            Err(CompilationError::Reported(diagnostic))
        } else {
            Ok(())
        }
    }
}
