//! # oxide-sql-parser
//!
//! A recoverable SQL parser that turns a statement buffer into a
//! span-annotated AST.
//!
//! This crate provides:
//! - A hand-written lexer and a recursive descent parser with Pratt
//!   expression parsing
//! - An AST allocated in a caller-supplied [`Bump`], where every node
//!   records the byte range it came from
//! - Structured diagnostics with error recovery at statement boundaries
//! - Limits on nesting depth, tree height and node count, so hostile input
//!   fails with a diagnostic instead of exhausting the stack or memory
//!
//! ## Parsing
//!
//! ```rust
//! use oxide_sql_parser::{parse, Bump, Statement, AST_VERSION};
//!
//! let arena = Bump::new();
//! let result = parse(b"SELECT id FROM users WHERE active = TRUE;", &arena);
//! assert!(result.is_ok());
//! assert!(matches!(result.statements[0], Statement::Query(_)));
//! assert_eq!(result.version(), AST_VERSION);
//! ```
//!
//! The tree borrows from the arena, so it is freed when the arena is dropped
//! or reset. One arena can serve many parse calls.
//!
//! ## Recovery
//!
//! A bad statement is reported and skipped; the rest of the buffer is still
//! parsed:
//!
//! ```rust
//! use oxide_sql_parser::{parse_str, Bump, DiagnosticCode};
//!
//! let arena = Bump::new();
//! let result = parse_str("SELECT 1; SELEC 2; SELECT 3", &arena);
//! assert_eq!(result.statements.len(), 2);
//! assert_eq!(result.diagnostics.len(), 1);
//! assert_eq!(result.diagnostics[0].code, DiagnosticCode::Syntax);
//! ```

pub mod arena;
pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod result;

use tracing::{debug, warn};

pub use arena::{Arena, ArenaExhausted};
pub use ast::{Expr, Statement, AST_VERSION};
pub use bumpalo::Bump;
pub use diagnostics::{Diagnostic, DiagnosticCode, ParseErrors, Reporter, Severity};
pub use lexer::{Keyword, Lexer, SourceBuffer, Span, Token, TokenKind};
pub use options::{ParseOptions, RecoveryMode};
pub use parser::Parser;
pub use result::ParseResult;

/// Parses a buffer with the default options, allocating the tree in `arena`.
#[must_use]
pub fn parse<'a>(buffer: &[u8], arena: &'a Bump) -> ParseResult<'a> {
    parse_with(buffer, arena, &ParseOptions::default())
}

/// Parses a buffer with explicit options.
///
/// The buffer must be UTF-8; otherwise the result holds a single encoding
/// error and no statements.
#[must_use]
pub fn parse_with<'a>(buffer: &[u8], arena: &'a Bump, options: &ParseOptions) -> ParseResult<'a> {
    let mut reporter = Reporter::new(options);

    let sql = match core::str::from_utf8(buffer) {
        Ok(sql) => sql,
        Err(err) => {
            let start = err.valid_up_to();
            let end = err
                .error_len()
                .map_or(buffer.len(), |len| start + len);
            warn!(offset = start, "input is not valid UTF-8");
            reporter.report(Diagnostic::error(
                DiagnosticCode::Encoding,
                "invalid UTF-8 sequence",
                Span::new(start, end),
            ));
            return ParseResult::new(vec![], reporter.finish(), 0);
        }
    };

    run(sql, arena, options, reporter)
}

/// Parses a string with the default options.
#[must_use]
pub fn parse_str<'a>(sql: &str, arena: &'a Bump) -> ParseResult<'a> {
    let options = ParseOptions::default();
    run(sql, arena, &options, Reporter::new(&options))
}

fn run<'a>(
    sql: &str,
    arena: &'a Bump,
    options: &ParseOptions,
    mut reporter: Reporter,
) -> ParseResult<'a> {
    debug!(bytes = sql.len(), "parse started");

    let (statements, nodes) =
        Parser::with_options(sql, arena, options).parse_statements(&mut reporter);
    let diagnostics = reporter.finish();

    debug!(
        statements = statements.len(),
        diagnostics = diagnostics.len(),
        nodes,
        "parse finished"
    );
    ParseResult::new(statements, diagnostics, nodes)
}
