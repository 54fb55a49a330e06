//! Parser configuration.

/// Default bound on expression, query and table-reference nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default bound on the number of AST nodes per parse call.
pub const DEFAULT_MAX_NODES: usize = 1_000_000;

/// Default bound on the height of a statement's tree.
pub const DEFAULT_MAX_HEIGHT: usize = 1024;

/// How the parser reacts to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecoveryMode {
    /// Record the error, skip to the next `;` and keep parsing.
    #[default]
    Recover,
    /// Stop at the first error.
    FailFast,
}

/// Options for [`parse_with`](crate::parse_with).
///
/// ```rust
/// use oxide_sql_parser::{ParseOptions, RecoveryMode};
///
/// let options = ParseOptions::new().max_errors(10).max_depth(32);
/// assert_eq!(options.recovery, RecoveryMode::Recover);
/// assert_eq!(options.max_errors, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseOptions {
    /// Error handling mode.
    pub recovery: RecoveryMode,
    /// Stop after this many errors; `None` means no limit. `Some(0)` behaves
    /// like `Some(1)`: the first error is always reported.
    pub max_errors: Option<usize>,
    /// Maximum nesting depth.
    pub max_depth: usize,
    /// Maximum number of AST nodes.
    pub max_nodes: usize,
    /// Maximum tree height: nesting depth plus the links of left-deep
    /// operator, set operation and join chains along one path.
    pub max_height: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            recovery: RecoveryMode::Recover,
            max_errors: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

impl ParseOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recovery mode.
    #[must_use]
    pub const fn recovery(mut self, recovery: RecoveryMode) -> Self {
        self.recovery = recovery;
        self
    }

    /// Stops at the first error.
    #[must_use]
    pub const fn fail_fast(self) -> Self {
        self.recovery(RecoveryMode::FailFast)
    }

    /// Stops after `max_errors` errors and adds a warning saying so.
    ///
    /// The error that reaches the limit is still reported, so a limit of 0
    /// reports one error, like a limit of 1.
    #[must_use]
    pub const fn max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = Some(max_errors);
        self
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum number of AST nodes.
    #[must_use]
    pub const fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Sets the maximum tree height.
    #[must_use]
    pub const fn max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }
}
