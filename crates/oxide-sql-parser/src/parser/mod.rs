//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! Grammar rules fail on the first problem in a statement; the statement
//! loop reports it and resynchronizes at the next `;`.

mod lookahead;
mod parser;
mod pratt;

pub use parser::Parser;
