//! SQL Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for SQL that produces a lazy
//! stream of tokens over a [`SourceBuffer`].

mod source;
mod span;
mod token;
mod tokenizer;

pub use source::SourceBuffer;
pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
