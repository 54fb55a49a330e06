//! SQL Tokenizer implementation.

use super::{Keyword, SourceBuffer, Span, Token, TokenKind};

/// A lexer that tokenizes SQL input.
///
/// The lexer is lazy: tokens are scanned one at a time on demand. It is
/// also cheap to [`Clone`], which is how the parser scans ahead without
/// consuming input, and it can be rewound to the start with [`Lexer::reset`].
///
/// On an unrecognized character the lexer yields a single
/// [`TokenKind::Error`] token covering that character and carries on after
/// it. In fail-fast mode it yields [`TokenKind::Eof`] after the first error.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// Stop scanning after the first error token.
    fail_fast: bool,
    /// Set once a fail-fast error has been emitted.
    halted: bool,
    /// Set once the iterator has yielded `Eof`.
    exhausted: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            fail_fast: false,
            halted: false,
            exhausted: false,
        }
    }

    /// Creates a lexer over a [`SourceBuffer`].
    #[must_use]
    pub const fn from_source(source: &SourceBuffer<'a>) -> Self {
        Self::new(source.text())
    }

    /// Makes the lexer halt at the first unrecognized input.
    #[must_use]
    pub const fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Returns the byte offset of the next unscanned character.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Rewinds the lexer to the beginning of the input.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.start = 0;
        self.halted = false;
        self.exhausted = false;
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and comments.
    ///
    /// Returns an error token if a block comment is left unterminated.
    fn skip_whitespace_and_comments(&mut self) -> Option<Token<'a>> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            // Single-line comments (-- ...)
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // Block comments (/* ... */), which nest.
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.start = self.pos;
                self.advance();
                self.advance();
                let mut depth = 1usize;
                while depth > 0 {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            depth -= 1;
                        }
                        Some('/') if self.peek() == Some('*') => {
                            self.advance();
                            depth += 1;
                        }
                        Some(_) => {}
                        None => {
                            return Some(self.error_token("Unterminated block comment"));
                        }
                    }
                }
                continue;
            }

            return None;
        }
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token<'a> {
        Token::new(kind, &self.input[self.start..self.pos], self.make_span())
    }

    /// Creates an error token and halts the lexer in fail-fast mode.
    fn error_token(&mut self, message: impl Into<String>) -> Token<'a> {
        if self.fail_fast {
            self.halted = true;
        }
        self.make_token(TokenKind::Error(message.into()))
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token<'a> {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];

        if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            self.make_token(TokenKind::Identifier(String::from(text)))
        }
    }

    /// Scans a quoted identifier (e.g., "column name" or `column name`).
    fn scan_quoted_identifier(&mut self, quote: char) -> Token<'a> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        value.push(quote);
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => return self.error_token("Unterminated quoted identifier"),
            }
        }

        if value.is_empty() {
            return self.error_token("Zero-length quoted identifier");
        }
        self.make_token(TokenKind::QuotedIdentifier(value))
    }

    /// Scans a number (integer or float).
    fn scan_number(&mut self) -> Token<'a> {
        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_none_or(|c| !c.is_ascii_alphabetic()) {
            is_float = true;
            self.advance(); // .
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent, only when digits actually follow.
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let rest = &self.input[self.pos + 1..];
            let digits = rest.strip_prefix(['+', '-']).unwrap_or(rest);
            if digits.starts_with(|c: char| c.is_ascii_digit()) {
                is_float = true;
                self.advance(); // e/E
                if self.peek().is_some_and(|c| c == '+' || c == '-') {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let text = &self.input[self.start..self.pos];

        if is_float {
            match text.parse::<f64>() {
                Ok(f) => self.make_token(TokenKind::Float(f)),
                Err(e) => self.error_token(format!("Invalid number {text}: {e}")),
            }
        } else {
            match text.parse::<i64>() {
                Ok(i) => self.make_token(TokenKind::Integer(i)),
                // Out of i64 range: keep the digits, like PostgreSQL's numeric.
                Err(_) => self.make_token(TokenKind::Numeric(String::from(text))),
            }
        }
    }

    /// Scans a string literal with `''` escaping.
    fn scan_string(&mut self) -> Token<'a> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('\'') => {
                    if self.peek() == Some('\'') {
                        value.push('\'');
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => return self.error_token("Unterminated string literal"),
            }
        }

        self.make_token(TokenKind::String(value))
    }

    /// Scans an escape string literal (E'...') with backslash escapes.
    fn scan_escape_string(&mut self) -> Token<'a> {
        self.advance(); // E/e
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('b') => value.push('\u{8}'),
                    Some('f') => value.push('\u{c}'),
                    Some(c) => value.push(c),
                    None => return self.error_token("Unterminated string literal"),
                },
                Some('\'') => {
                    if self.peek() == Some('\'') {
                        value.push('\'');
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => return self.error_token("Unterminated string literal"),
            }
        }

        self.make_token(TokenKind::String(value))
    }

    /// Scans a blob literal (X'...' or x'...').
    fn scan_blob(&mut self) -> Token<'a> {
        self.advance(); // X/x
        self.advance(); // opening quote

        let mut bytes = Vec::new();
        let mut pending: Option<u8> = None;
        let mut invalid = None;

        loop {
            match self.advance() {
                Some('\'') => break,
                Some(c) if c.is_ascii_whitespace() => {}
                Some(c) => match c.to_digit(16) {
                    // to_digit(16) is at most 15
                    #[allow(clippy::cast_possible_truncation)]
                    Some(nibble) => {
                        let nibble = nibble as u8;
                        match pending.take() {
                            Some(high) => bytes.push((high << 4) | nibble),
                            None => pending = Some(nibble),
                        }
                    }
                    None => {
                        invalid.get_or_insert(c);
                    }
                },
                None => return self.error_token("Unterminated blob literal"),
            }
        }

        if let Some(c) = invalid {
            return self.error_token(format!("Invalid character in blob literal: {c}"));
        }
        if pending.is_some() {
            return self.error_token("Odd number of hex digits in blob literal");
        }

        self.make_token(TokenKind::Blob(bytes))
    }

    /// Scans a `$n` positional parameter.
    fn scan_dollar_param(&mut self) -> Token<'a> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let digits = &self.input[self.start + 1..self.pos];
        match digits.parse::<u32>() {
            Ok(n) => self.make_token(TokenKind::DollarParam(n)),
            Err(_) => self.error_token(format!("Invalid parameter number: ${digits}")),
        }
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token<'a> {
        if self.halted {
            return Token::eof(self.input.len());
        }

        if let Some(error) = self.skip_whitespace_and_comments() {
            return error;
        }
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            // Single-character tokens
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),
            '^' => self.make_token(TokenKind::Caret),
            '~' => self.make_token(TokenKind::BitNot),
            '?' => self.make_token(TokenKind::Question),
            '@' => self.make_token(TokenKind::At),
            '&' => self.make_token(TokenKind::BitAnd),

            // Potentially multi-character tokens (longest match)
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.pos = self.start;
                self.scan_number()
            }
            '.' => self.make_token(TokenKind::Dot),
            ':' => {
                if self.peek() == Some(':') {
                    self.advance();
                    self.make_token(TokenKind::DoubleColon)
                } else {
                    self.make_token(TokenKind::Colon)
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                }
                self.make_token(TokenKind::Eq)
            }
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                }
                Some('>') => {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                }
                Some('<') => {
                    self.advance();
                    self.make_token(TokenKind::LeftShift)
                }
                _ => self.make_token(TokenKind::Lt),
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                }
                Some('>') => {
                    self.advance();
                    self.make_token(TokenKind::RightShift)
                }
                _ => self.make_token(TokenKind::Gt),
            },
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.error_token("Unexpected character: !")
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    self.make_token(TokenKind::Concat)
                } else {
                    self.make_token(TokenKind::BitOr)
                }
            }
            '$' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.scan_dollar_param(),

            // String literals
            '\'' => {
                self.pos = self.start;
                self.scan_string()
            }
            'E' | 'e' if self.peek() == Some('\'') => {
                self.pos = self.start;
                self.scan_escape_string()
            }

            // Quoted identifiers
            '"' | '`' => {
                self.pos = self.start;
                self.scan_quoted_identifier(c)
            }

            // Blob literals
            'X' | 'x' if self.peek() == Some('\'') => {
                self.pos = self.start;
                self.scan_blob()
            }

            // Numbers
            c if c.is_ascii_digit() => {
                self.pos = self.start;
                self.scan_number()
            }

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => {
                self.pos = self.start;
                self.scan_identifier()
            }

            // Only the offending character is consumed.
            _ => self.error_token(format!("Unexpected character: {c}")),
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending with `Eof`.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token<'a>> {
        self.by_ref().collect()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        if token.is_eof() {
            self.exhausted = true;
        }
        Some(token)
    }
}
