//! The value returned by a parse call.

use crate::ast::{Statement, AST_VERSION};
use crate::diagnostics::{Diagnostic, ParseErrors};

/// Statements, diagnostics and node accounting of one parse call.
///
/// The statements borrow from the [`Bump`](bumpalo::Bump) passed to the
/// parse call, which must outlive them. Statements that parsed cleanly are
/// kept even when other statements in the same buffer failed.
#[derive(Debug, Clone)]
pub struct ParseResult<'a> {
    /// Successfully parsed statements, in source order.
    pub statements: Vec<Statement<'a>>,
    /// Diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
    nodes: usize,
}

impl<'a> ParseResult<'a> {
    pub(crate) const fn new(
        statements: Vec<Statement<'a>>,
        diagnostics: Vec<Diagnostic>,
        nodes: usize,
    ) -> Self {
        Self {
            statements,
            diagnostics,
            nodes,
        }
    }

    /// Returns the layout version of the tree, [`AST_VERSION`].
    #[must_use]
    pub const fn version(&self) -> u32 {
        AST_VERSION
    }

    /// Returns true if no error-severity diagnostic was produced.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Returns the error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Returns the number of AST nodes built for this result.
    #[must_use]
    pub const fn allocated_nodes(&self) -> usize {
        self.nodes
    }

    /// Splits the result into statements and diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Statement<'a>>, Vec<Diagnostic>) {
        (self.statements, self.diagnostics)
    }

    /// Returns the statements, or all diagnostics if any error occurred.
    ///
    /// # Errors
    ///
    /// Returns [`ParseErrors`] when [`is_ok`](Self::is_ok) is false.
    pub fn into_result(self) -> Result<Vec<Statement<'a>>, ParseErrors> {
        if self.is_ok() {
            Ok(self.statements)
        } else {
            Err(ParseErrors {
                diagnostics: self.diagnostics,
            })
        }
    }
}
