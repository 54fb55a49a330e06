//! Structured parse diagnostics and the reporter that collects them.

use std::collections::HashSet;
use std::fmt;

use crate::lexer::{SourceBuffer, Span, Token, TokenKind};
use crate::options::{ParseOptions, RecoveryMode};

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// The input could not be parsed as written.
    Error,
    /// Parsing continued, but something needs attention.
    Warning,
}

impl Severity {
    /// Returns the lowercase name used in rendered diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticCode {
    /// Input the lexer could not turn into a token.
    Lexical,
    /// A token sequence that does not fit the grammar.
    Syntax,
    /// The buffer is not valid UTF-8.
    Encoding,
    /// Nesting depth or node budget exceeded.
    Resource,
    /// The error limit was reached and parsing stopped.
    TooManyErrors,
}

impl DiagnosticCode {
    /// Returns the stable name of the code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Syntax => "syntax",
            Self::Encoding => "encoding",
            Self::Resource => "resource",
            Self::TooManyErrors => "too-many-errors",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic tied to a byte range of the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{severity}[{code}]: {message} at {span}")]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// The diagnostic category.
    pub code: DiagnosticCode,
    /// Human-readable description.
    pub message: String,
    /// The offending source range.
    pub span: Span,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    #[must_use]
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            span,
        }
    }

    /// Creates a warning diagnostic.
    #[must_use]
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            span,
        }
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::error(DiagnosticCode::Syntax, message, span)
    }

    /// Creates a resource error.
    #[must_use]
    pub fn resource(message: impl Into<String>, span: Span) -> Self {
        Self::error(DiagnosticCode::Resource, message, span)
    }

    /// Creates the error for finding `found` where `expected` was required.
    ///
    /// A lexer error token becomes a lexical error carrying the lexer's own
    /// message.
    #[must_use]
    pub fn unexpected(expected: &str, found: &Token<'_>) -> Self {
        match &found.kind {
            TokenKind::Error(message) => {
                Self::error(DiagnosticCode::Lexical, message.clone(), found.span)
            }
            kind => Self::syntax(
                format!("expected {expected}, found {}", kind.describe()),
                found.span,
            ),
        }
    }

    /// Returns true for error severity.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Renders the diagnostic as `line:col: severity[code]: message`.
    #[must_use]
    pub fn render(&self, source: &SourceBuffer<'_>) -> String {
        let (line, column) = source.line_col(self.span.start);
        format!(
            "{line}:{column}: {}[{}]: {}",
            self.severity, self.code, self.message
        )
    }
}

/// The error returned by [`ParseResult::into_result`](crate::ParseResult::into_result).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{} error(s) while parsing SQL; first: {}",
    error_count(.diagnostics),
    first_error(.diagnostics)
)]
pub struct ParseErrors {
    /// All diagnostics of the failed parse, warnings included.
    pub diagnostics: Vec<Diagnostic>,
}

fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|d| d.is_error()).count()
}

fn first_error(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .find(|d| d.is_error())
        .map_or_else(String::new, ToString::to_string)
}

/// Collects diagnostics for one parse call.
///
/// The reporter drops diagnostics that repeat an already reported
/// `(span, code)` pair, and decides when the parser has to stop: after the
/// first error in fail-fast mode, or once the error limit is reached.
#[derive(Debug)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
    seen: HashSet<(Span, DiagnosticCode)>,
    error_count: usize,
    mode: RecoveryMode,
    max_errors: Option<usize>,
    halted: bool,
}

impl Reporter {
    /// Creates a reporter configured from `options`.
    #[must_use]
    pub fn new(options: &ParseOptions) -> Self {
        Self {
            diagnostics: Vec::new(),
            seen: HashSet::new(),
            error_count: 0,
            mode: options.recovery,
            max_errors: options.max_errors,
            halted: false,
        }
    }

    /// Records a diagnostic.
    ///
    /// Ignored once the reporter has halted, or when the same span already
    /// has a diagnostic with the same code.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        if self.halted || !self.seen.insert((diagnostic.span, diagnostic.code)) {
            return;
        }
        let is_error = diagnostic.is_error();
        let span = diagnostic.span;
        self.diagnostics.push(diagnostic);
        if !is_error {
            return;
        }

        self.error_count += 1;
        if self.mode == RecoveryMode::FailFast {
            self.halted = true;
        } else if let Some(limit) = self.max_errors {
            // The error that reaches the limit is kept, so 0 acts as 1.
            if self.error_count >= limit.max(1) {
                self.diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::TooManyErrors,
                    format!("stopped after {} errors", self.error_count),
                    span,
                ));
                self.halted = true;
            }
        }
    }

    /// Stops accepting diagnostics.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Returns true once the parser must stop.
    #[must_use]
    pub const fn should_stop(&self) -> bool {
        self.halted
    }

    /// Returns the number of error-severity diagnostics recorded.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.error_count
    }

    /// Returns the diagnostics in source order.
    #[must_use]
    pub fn finish(mut self) -> Vec<Diagnostic> {
        // Stable: diagnostics at the same offset keep their report order.
        self.diagnostics.sort_by_key(|d| d.span.start);
        self.diagnostics
    }
}
