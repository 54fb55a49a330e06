//! Token lookahead for the places where a `(` has two readings.
//!
//! `((SELECT 1) UNION (SELECT 2))` is a query whose operands are
//! parenthesized, while `((SELECT 1) + 1)` is an expression around a
//! subquery. Which one applies depends only on the token after the `)`
//! that closes the inner group, so one pass over the remaining tokens
//! records that token for every `(` and the parser never has to retry.

use std::collections::HashMap;

use tracing::trace;

use super::parser::{starts_query, Parser};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};

/// The token that follows the `)` closing a parenthesized group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum GroupFollower {
    /// Another `)`.
    CloseParen,
    /// A set operator, ORDER, LIMIT or OFFSET: only a query goes on that way.
    QueryContinuation,
    /// Anything else, including the end of input and unclosed groups.
    Other,
}

impl GroupFollower {
    fn of(kind: &TokenKind) -> Self {
        match kind {
            TokenKind::RightParen => Self::CloseParen,
            TokenKind::Keyword(
                Keyword::Union
                | Keyword::Intersect
                | Keyword::Except
                | Keyword::Order
                | Keyword::Limit
                | Keyword::Offset,
            ) => Self::QueryContinuation,
            _ => Self::Other,
        }
    }
}

/// Followers of every group from some point to the end of input, keyed by
/// the byte offset of the opening `(`.
#[derive(Debug, Default)]
pub(super) struct GroupIndex {
    followers: HashMap<usize, GroupFollower>,
}

impl GroupIndex {
    /// Scans from `first` to the end of input. A `)` with no matching `(`
    /// after the starting point closes a group opened earlier and is skipped.
    pub(super) fn scan(first: Token<'_>, mut lexer: Lexer<'_>) -> Self {
        let mut followers = HashMap::new();
        let mut open = vec![];
        let mut closed = None;
        let mut token = first;
        loop {
            if let Some(start) = closed.take() {
                followers.insert(start, GroupFollower::of(&token.kind));
            }
            match token.kind {
                TokenKind::LeftParen => open.push(token.span.start),
                TokenKind::RightParen => closed = open.pop(),
                TokenKind::Eof => break,
                _ => {}
            }
            token = lexer.next_token();
        }
        trace!(groups = followers.len(), "indexed parenthesized groups");
        Self { followers }
    }

    pub(super) fn follower(&self, open: usize) -> GroupFollower {
        self.followers
            .get(&open)
            .copied()
            .unwrap_or(GroupFollower::Other)
    }
}

impl Parser<'_, '_> {
    /// Returns what follows the group opened by the `(` at byte `open`.
    ///
    /// The index is built on first use, from the current token on. The
    /// parser only moves forward, so every later `(` is covered too.
    pub(super) fn group_follower(&mut self, open: usize) -> GroupFollower {
        if self.groups.is_none() {
            self.groups = Some(GroupIndex::scan(self.current.clone(), self.lexer.clone()));
        }
        self.groups
            .as_ref()
            .map_or(GroupFollower::Other, |groups| groups.follower(open))
    }

    /// Returns true if the token after the current one opens only more
    /// parentheses before a query keyword. The scan stops after
    /// `max_depth + 1` parentheses, since anything deeper fails the depth
    /// guard anyway.
    pub(super) fn query_follows_parens(&self) -> bool {
        let mut lexer = self.lexer.clone();
        let mut token = lexer.next_token();
        let mut skipped = 0;
        while token.kind == TokenKind::LeftParen && skipped <= self.max_depth {
            token = lexer.next_token();
            skipped += 1;
        }
        starts_query(&token.kind)
    }
}
