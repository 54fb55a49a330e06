//! Token types for the SQL lexer.

use super::Span;

macro_rules! keywords {
    (
        reserved { $($reserved:ident => $reserved_text:literal,)* }
        unreserved { $($unreserved:ident => $unreserved_text:literal,)* }
    ) => {
        /// SQL keywords.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($reserved,)*
            $($unreserved,)*
        }

        impl Keyword {
            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($reserved_text => Some(Self::$reserved),)*
                    $($unreserved_text => Some(Self::$unreserved),)*
                    _ => None,
                }
            }

            /// Returns the keyword as a string.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$reserved => $reserved_text,)*
                    $(Self::$unreserved => $unreserved_text,)*
                }
            }

            /// Returns true if the keyword can never be used as a bare
            /// identifier.
            ///
            /// Unreserved keywords (type names, aggregate names, DDL nouns
            /// and the like) are accepted wherever an identifier is expected.
            #[must_use]
            pub const fn is_reserved(&self) -> bool {
                matches!(self, $(Self::$reserved)|*)
            }
        }
    };
}

keywords! {
    reserved {
        // DQL
        Select => "SELECT",
        From => "FROM",
        Where => "WHERE",
        Order => "ORDER",
        By => "BY",
        Group => "GROUP",
        Having => "HAVING",
        Limit => "LIMIT",
        Offset => "OFFSET",
        Distinct => "DISTINCT",
        All => "ALL",

        // Joins
        Join => "JOIN",
        Inner => "INNER",
        Left => "LEFT",
        Right => "RIGHT",
        Full => "FULL",
        Outer => "OUTER",
        Cross => "CROSS",
        Natural => "NATURAL",
        On => "ON",
        Using => "USING",

        // Set operations
        Union => "UNION",
        Intersect => "INTERSECT",
        Except => "EXCEPT",

        // DML
        Insert => "INSERT",
        Into => "INTO",
        Values => "VALUES",
        Update => "UPDATE",
        Set => "SET",
        Delete => "DELETE",
        Returning => "RETURNING",

        // DDL
        Create => "CREATE",
        Drop => "DROP",
        Alter => "ALTER",
        Table => "TABLE",

        // Constraints
        Primary => "PRIMARY",
        Foreign => "FOREIGN",
        References => "REFERENCES",
        Unique => "UNIQUE",
        Check => "CHECK",
        Default => "DEFAULT",
        Constraint => "CONSTRAINT",

        // Logical operators
        And => "AND",
        Or => "OR",
        Not => "NOT",
        In => "IN",
        Between => "BETWEEN",
        Like => "LIKE",
        Ilike => "ILIKE",
        Is => "IS",
        Null => "NULL",
        True => "TRUE",
        False => "FALSE",
        Exists => "EXISTS",

        // Ordering
        Asc => "ASC",
        Desc => "DESC",

        // Upsert
        Do => "DO",

        // Common clauses
        As => "AS",
        Case => "CASE",
        When => "WHEN",
        Then => "THEN",
        Else => "ELSE",
        End => "END",
        Cast => "CAST",

        // Misc
        With => "WITH",
        Window => "WINDOW",
    }
    unreserved {
        // DDL
        Index => "INDEX",
        View => "VIEW",
        Database => "DATABASE",
        Schema => "SCHEMA",
        Trigger => "TRIGGER",

        // Constraints
        Key => "KEY",
        Cascade => "CASCADE",
        Restrict => "RESTRICT",
        No => "NO",
        Action => "ACTION",

        // Ordering
        Nulls => "NULLS",
        First => "FIRST",
        Last => "LAST",

        // Aggregates
        Count => "COUNT",
        Sum => "SUM",
        Avg => "AVG",
        Min => "MIN",
        Max => "MAX",

        // Data types
        Int => "INT",
        Integer => "INTEGER",
        Smallint => "SMALLINT",
        Bigint => "BIGINT",
        Real => "REAL",
        Double => "DOUBLE",
        Float => "FLOAT",
        Decimal => "DECIMAL",
        Numeric => "NUMERIC",
        Char => "CHAR",
        Varchar => "VARCHAR",
        Text => "TEXT",
        Blob => "BLOB",
        Boolean => "BOOLEAN",
        Date => "DATE",
        Time => "TIME",
        Timestamp => "TIMESTAMP",
        Datetime => "DATETIME",

        // Table options
        Autoincrement => "AUTOINCREMENT",
        If => "IF",
        Temporary => "TEMPORARY",
        Temp => "TEMP",
        Conflict => "CONFLICT",
        Replace => "REPLACE",
        Nothing => "NOTHING",

        // Common clauses
        Coalesce => "COALESCE",
        Nullif => "NULLIF",

        // Transaction
        Begin => "BEGIN",
        Commit => "COMMIT",
        Rollback => "ROLLBACK",
        Transaction => "TRANSACTION",

        // Misc
        Recursive => "RECURSIVE",
        Over => "OVER",
        Partition => "PARTITION",
        Rows => "ROWS",
        Range => "RANGE",
        Unbounded => "UNBOUNDED",
        Preceding => "PRECEDING",
        Following => "FOLLOWING",
        Current => "CURRENT",
        Row => "ROW",
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal (e.g., 42)
    Integer(i64),
    /// Float literal (e.g., 3.14)
    Float(f64),
    /// Integer literal too large for `i64`, kept as written.
    Numeric(String),
    /// String literal (e.g., 'hello'), unescaped.
    String(String),
    /// Blob literal (e.g., X'1234')
    Blob(Vec<u8>),

    // Identifiers and keywords
    /// Identifier (e.g., column_name), unescaped when quoted.
    Identifier(String),
    /// Quoted identifier (e.g., "Column Name"); never treated as a keyword.
    QuotedIdentifier(String),
    /// SQL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ^
    Caret,
    /// = or ==
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ::
    DoubleColon,
    /// ?
    Question,
    /// @
    At,
    /// $1, $2, ...
    DollarParam(u32),

    // Special
    /// End of input
    Eof,
    /// Unrecognized input; carries the lexer's message.
    Error(String),
}

impl TokenKind {
    /// Returns a short human-readable description used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Integer(n) => format!("integer {n}"),
            Self::Float(f) => format!("number {f}"),
            Self::Numeric(s) => format!("number {s}"),
            Self::String(_) => String::from("string literal"),
            Self::Blob(_) => String::from("blob literal"),
            Self::Identifier(name) | Self::QuotedIdentifier(name) => {
                format!("identifier \"{name}\"")
            }
            Self::Keyword(kw) => format!("keyword {}", kw.as_str()),
            Self::DollarParam(n) => format!("parameter ${n}"),
            Self::Eof => String::from("end of input"),
            Self::Error(message) => message.clone(),
            other => format!("\"{}\"", other.symbol()),
        }
    }

    /// Returns the source symbol for punctuation and operator tokens.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Caret => "^",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitNot => "~",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::DoubleColon => "::",
            Self::Question => "?",
            Self::At => "@",
            _ => "",
        }
    }
}

/// A token with its source text and span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The exact source text of the token, borrowed from the buffer.
    pub text: &'a str,
    /// The location in the source code.
    pub span: Span,
}

impl<'a> Token<'a> {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Creates the end-of-input token for a buffer of `len` bytes.
    #[must_use]
    pub const fn eof(len: usize) -> Self {
        Self::new(TokenKind::Eof, "", Span::new(len, len))
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is a lexical error token.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, TokenKind::Error(_))
    }

    /// Returns true if this is a keyword.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword(_))
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_as_str() {
        assert_eq!(Keyword::Select.as_str(), "SELECT");
        assert_eq!(Keyword::Returning.as_str(), "RETURNING");
        assert_eq!(Keyword::Ilike.as_str(), "ILIKE");
    }

    #[test]
    fn test_reserved_keywords() {
        assert!(Keyword::Select.is_reserved());
        assert!(Keyword::Where.is_reserved());
        assert!(!Keyword::Date.is_reserved());
        assert!(!Keyword::Count.is_reserved());
        assert!(!Keyword::Key.is_reserved());
    }

    #[test]
    fn test_token_is_eof() {
        let eof = Token::eof(6);
        let select = Token::new(TokenKind::Keyword(Keyword::Select), "SELECT", Span::new(0, 6));
        assert!(eof.is_eof());
        assert_eq!(eof.span, Span::point(6));
        assert!(!select.is_eof());
    }

    #[test]
    fn test_token_as_keyword() {
        let select = Token::new(TokenKind::Keyword(Keyword::Select), "select", Span::new(0, 6));
        let plus = Token::new(TokenKind::Plus, "+", Span::new(0, 1));
        assert_eq!(select.as_keyword(), Some(Keyword::Select));
        assert_eq!(plus.as_keyword(), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(TokenKind::Comma.describe(), "\",\"");
        assert_eq!(TokenKind::Eof.describe(), "end of input");
        assert_eq!(
            TokenKind::Keyword(Keyword::From).describe(),
            "keyword FROM"
        );
    }
}
