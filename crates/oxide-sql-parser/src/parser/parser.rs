//! SQL Parser implementation.

use bumpalo::Bump;
use tracing::{debug, trace, warn};

use super::lookahead::{GroupFollower, GroupIndex};
use super::pratt::{
    infix_binding_power, is_non_associative, postfix_binding_power, prefix_binding_power,
    token_to_binary_op, token_to_unary_op, BETWEEN_BOUND_BP, COMPARISON_BP, IS_BP,
};
use crate::arena::Arena;
use crate::ast::{
    ColumnConstraint, ColumnConstraintKind, ColumnDef, ConflictAction, CreateIndexStatement,
    CreateTableStatement, CreateViewStatement, Cte, DataType, DeleteStatement, DropBehavior,
    DropStatement, Expr, ForeignKeyRef, FrameBound, FrameUnits, FunctionCall, InsertSource,
    InsertStatement, JoinClause, JoinType, Literal, NullOrdering, ObjectName, ObjectType,
    OnConflict, OrderBy, OrderDirection, ParameterStyle, Query, ReferentialAction, SelectColumn,
    SelectStatement, SetExpr, SetOperator, Statement, TableConstraint, TableConstraintKind,
    TableRef, UpdateAssignment, UpdateStatement, Values, ValuesRow, WindowFrame, WindowSpec, With,
};
use crate::diagnostics::{Diagnostic, DiagnosticCode, Reporter};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};
use crate::options::{ParseOptions, RecoveryMode};

/// SQL Parser.
///
/// Reads `'src` text and builds nodes in a [`Bump`] that lives for `'a`.
/// Grammar rules return `Err(Diagnostic)` on the first problem; only the
/// statement loop in [`Parser::parse_statements`] turns errors into
/// reported diagnostics and resynchronizes.
pub struct Parser<'src, 'a> {
    pub(super) lexer: Lexer<'src>,
    pub(super) current: Token<'src>,
    pub(super) previous: Token<'src>,
    /// Parameter counter for ? placeholders.
    param_counter: usize,
    depth: usize,
    pub(super) max_depth: usize,
    /// Height, in operator links, of the subtree built so far at this depth.
    chain: usize,
    max_height: usize,
    pub(super) groups: Option<GroupIndex>,
    arena: Arena<'a>,
}

impl<'src, 'a> Parser<'src, 'a> {
    /// Creates a new parser for the given input with default options.
    #[must_use]
    pub fn new(input: &'src str, bump: &'a Bump) -> Self {
        Self::with_options(input, bump, &ParseOptions::default())
    }

    /// Creates a new parser with explicit limits and recovery mode.
    #[must_use]
    pub fn with_options(input: &'src str, bump: &'a Bump, options: &ParseOptions) -> Self {
        let mut lexer =
            Lexer::new(input).fail_fast(options.recovery == RecoveryMode::FailFast);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Token::eof(0),
            param_counter: 0,
            depth: 0,
            max_depth: options.max_depth,
            chain: 0,
            max_height: options.max_height,
            groups: None,
            arena: Arena::new(bump, options.max_nodes),
        }
    }

    /// Returns the node accounting so far.
    #[must_use]
    pub const fn arena(&self) -> &Arena<'a> {
        &self.arena
    }

    /// Parses a single SQL statement.
    ///
    /// A trailing `;` is allowed; anything else after the statement is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns a `Diagnostic` if the input is not a valid SQL statement.
    pub fn parse_statement(&mut self) -> Result<Statement<'a>, Diagnostic> {
        let statement = self.parse_any_statement()?;
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if !self.current.is_eof() {
            return Err(self.unexpected("end of input"));
        }
        Ok(statement)
    }

    /// Parses every statement in the input.
    ///
    /// Errors go to `reporter`. After an error the parser skips to the next
    /// `;` and carries on, unless the reporter says to stop. Resource errors
    /// always end the call. Statements completed before that are returned,
    /// along with the number of nodes built.
    pub fn parse_statements(mut self, reporter: &mut Reporter) -> (Vec<Statement<'a>>, usize) {
        let mut statements = vec![];

        loop {
            while self.check(&TokenKind::Semicolon) {
                self.advance();
            }
            if self.current.is_eof() {
                break;
            }

            match self.parse_any_statement() {
                Ok(statement) if self.at_statement_end() => {
                    let span = statement.span();
                    trace!(start = span.start, end = span.end, "parsed statement");
                    statements.push(statement);
                }
                Ok(_) => {
                    reporter.report(self.unexpected("; or end of input"));
                    self.synchronize(reporter);
                }
                Err(diagnostic) if diagnostic.code == DiagnosticCode::Resource => {
                    warn!(
                        offset = diagnostic.span.start,
                        message = %diagnostic.message,
                        "parse aborted"
                    );
                    reporter.report(diagnostic);
                    reporter.halt();
                    break;
                }
                Err(diagnostic) => {
                    reporter.report(diagnostic);
                    if reporter.should_stop() {
                        break;
                    }
                    self.synchronize(reporter);
                }
            }

            if reporter.should_stop() {
                break;
            }
        }

        (statements, self.arena.allocated())
    }

    /// Skips to the next `;` or the end of input, reporting lexical errors
    /// on the way.
    fn synchronize(&mut self, reporter: &mut Reporter) {
        let from = self.current.span.start;
        let mut skipped = 0_usize;
        while !self.at_statement_end() && !reporter.should_stop() {
            if let TokenKind::Error(message) = &self.current.kind {
                reporter.report(Diagnostic::error(
                    DiagnosticCode::Lexical,
                    message.clone(),
                    self.current.span,
                ));
            }
            self.advance();
            skipped += 1;
        }
        debug!(from, to = self.current.span.start, skipped, "skipped to next statement");
    }

    fn at_statement_end(&self) -> bool {
        self.check(&TokenKind::Semicolon) || self.current.is_eof()
    }

    /// Parses one statement, without its terminator.
    fn parse_any_statement(&mut self) -> Result<Statement<'a>, Diagnostic> {
        self.chain = 0;
        let statement = match &self.current.kind {
            TokenKind::Keyword(Keyword::Select | Keyword::With | Keyword::Values)
            | TokenKind::LeftParen => {
                let query = self.parse_query()?;
                Statement::Query(self.alloc(query)?)
            }
            TokenKind::Keyword(Keyword::Insert) => {
                let insert = self.parse_insert_statement()?;
                Statement::Insert(self.alloc(insert)?)
            }
            TokenKind::Keyword(Keyword::Update) => {
                let update = self.parse_update_statement()?;
                Statement::Update(self.alloc(update)?)
            }
            TokenKind::Keyword(Keyword::Delete) => {
                let delete = self.parse_delete_statement()?;
                Statement::Delete(self.alloc(delete)?)
            }
            TokenKind::Keyword(Keyword::Create) => self.parse_create_statement()?,
            TokenKind::Keyword(Keyword::Drop) => {
                let drop = self.parse_drop_statement()?;
                Statement::Drop(self.alloc(drop)?)
            }
            TokenKind::Keyword(kw @ (Keyword::Begin | Keyword::Commit | Keyword::Rollback)) => {
                let kw = *kw;
                self.parse_transaction_statement(kw)
            }
            _ => {
                return Err(self.unexpected(
                    "SELECT, INSERT, UPDATE, DELETE, CREATE, DROP or a transaction statement",
                ))
            }
        };
        self.charge()?;
        Ok(statement)
    }

    // --- Queries ---

    /// Parses a full query: `[WITH ...] body [ORDER BY] [LIMIT] [OFFSET]`.
    fn parse_query(&mut self) -> Result<Query<'a>, Diagnostic> {
        self.nested(Self::parse_query_inner)
    }

    fn parse_query_inner(&mut self) -> Result<Query<'a>, Diagnostic> {
        let start = self.current.span.start;

        let with = if self.check_keyword(Keyword::With) {
            Some(self.parse_with_clause()?)
        } else {
            None
        };

        let body = self.parse_set_expr(0)?;

        // ORDER BY clause
        let order_by = if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            &[]
        };

        // LIMIT clause
        let limit = if self.eat_keyword(Keyword::Limit) {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        // OFFSET clause
        let offset = if self.eat_keyword(Keyword::Offset) {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        self.charge()?;
        Ok(Query {
            with,
            body,
            order_by,
            limit,
            offset,
            span: self.span_from(start),
        })
    }

    /// Parses `WITH [RECURSIVE] name [(cols)] AS (query), ...`.
    fn parse_with_clause(&mut self) -> Result<With<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::With)?;
        let recursive = self.eat_keyword(Keyword::Recursive);

        let mut ctes = vec![];
        loop {
            let cte_start = self.current.span.start;
            let name = self.expect_identifier()?;
            let columns = if self.check(&TokenKind::LeftParen) {
                self.parse_paren_identifier_list()?
            } else {
                &[]
            };
            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LeftParen)?;
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            self.charge()?;
            ctes.push(Cte {
                name,
                columns,
                query,
                span: self.span_from(cte_start),
            });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(With {
            recursive,
            ctes: self.arena.alloc_slice(ctes),
            span: self.span_from(start),
        })
    }

    /// Parses set operations by precedence: INTERSECT binds tighter than
    /// UNION and EXCEPT, and all of them are left-associative.
    fn parse_set_expr(&mut self, min_bp: u8) -> Result<SetExpr<'a>, Diagnostic> {
        let start = self.current.span.start;
        let mut left = self.parse_set_operand()?;

        loop {
            let (op, bp) = match self.current.as_keyword() {
                Some(Keyword::Union) => (SetOperator::Union, 1),
                Some(Keyword::Except) => (SetOperator::Except, 1),
                Some(Keyword::Intersect) => (SetOperator::Intersect, 3),
                _ => break,
            };
            if bp < min_bp {
                break;
            }
            self.advance();

            let all = if self.eat_keyword(Keyword::All) {
                true
            } else {
                self.eat_keyword(Keyword::Distinct);
                false
            };

            let right = self.parse_set_expr(bp + 1)?;
            self.extend_chain()?;
            self.charge()?;
            left = SetExpr::SetOperation {
                op,
                all,
                left: self.alloc(left)?,
                right: self.alloc(right)?,
                span: self.span_from(start),
            };
        }

        Ok(left)
    }

    /// Parses a SELECT block, a VALUES list or a parenthesized query.
    fn parse_set_operand(&mut self) -> Result<SetExpr<'a>, Diagnostic> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Select) => {
                let select = self.parse_select_statement()?;
                Ok(SetExpr::Select(self.alloc(select)?))
            }
            TokenKind::Keyword(Keyword::Values) => Ok(SetExpr::Values(self.parse_values()?)),
            TokenKind::LeftParen => {
                self.advance();
                let query = self.parse_query()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(SetExpr::Query(self.alloc(query)?))
            }
            _ => Err(self.unexpected("SELECT, VALUES or (")),
        }
    }

    /// Parses a SELECT block.
    fn parse_select_statement(&mut self) -> Result<SelectStatement<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Select)?;

        // DISTINCT or ALL
        let distinct = if self.eat_keyword(Keyword::Distinct) {
            true
        } else {
            self.eat_keyword(Keyword::All);
            false
        };

        // SELECT columns
        let columns = self.parse_select_columns()?;

        // FROM clause (optional for expressions like SELECT 1+1)
        let from = if self.eat_keyword(Keyword::From) {
            self.parse_from_list()?
        } else {
            &[]
        };

        // WHERE clause
        let where_clause = self.parse_optional_where()?;

        // GROUP BY clause
        let group_by = if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            self.parse_expression_list()?
        } else {
            &[]
        };

        // HAVING clause
        let having = if self.eat_keyword(Keyword::Having) {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        self.charge()?;
        Ok(SelectStatement {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            span: self.span_from(start),
        })
    }

    /// Parses `VALUES (...), (...)`.
    fn parse_values(&mut self) -> Result<Values<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Values)?;

        let mut rows = vec![];
        loop {
            let row_start = self.current.span.start;
            self.expect(&TokenKind::LeftParen)?;
            let values = self.parse_expression_list()?;
            self.expect(&TokenKind::RightParen)?;
            self.charge()?;
            rows.push(ValuesRow {
                values,
                span: self.span_from(row_start),
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.charge()?;
        Ok(Values {
            rows: self.arena.alloc_slice(rows),
            span: self.span_from(start),
        })
    }

    /// Parses SELECT columns.
    fn parse_select_columns(&mut self) -> Result<&'a [SelectColumn<'a>], Diagnostic> {
        let mut columns = vec![];

        loop {
            let start = self.current.span.start;
            let expr = self.parse_expression(0)?;
            let alias = self.parse_optional_alias()?;
            self.charge()?;
            columns.push(SelectColumn {
                expr,
                alias,
                span: self.span_from(start),
            });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(self.arena.alloc_slice(columns))
    }

    /// Parses the comma-separated entries of a FROM clause.
    fn parse_from_list(&mut self) -> Result<&'a [TableRef<'a>], Diagnostic> {
        let mut from = vec![self.parse_table_ref()?];
        while self.eat(&TokenKind::Comma) {
            from.push(self.parse_table_ref()?);
        }
        Ok(self.arena.alloc_slice(from))
    }

    /// Parses a table reference followed by any number of joins.
    fn parse_table_ref(&mut self) -> Result<TableRef<'a>, Diagnostic> {
        self.nested(Self::parse_table_ref_inner)
    }

    fn parse_table_ref_inner(&mut self) -> Result<TableRef<'a>, Diagnostic> {
        let start = self.current.span.start;
        let mut table_ref = self.parse_table_factor()?;

        // Parse joins
        while self.is_join_keyword() {
            let join_start = self.current.span.start;
            let (join_type, natural) = self.parse_join_type()?;
            let right = self.parse_table_factor()?;

            let no_condition = join_type == JoinType::Cross || natural;
            let (on, using): (Option<Expr<'a>>, &'a [&'a str]) = if no_condition {
                (None, &[])
            } else if self.eat_keyword(Keyword::On) {
                (Some(self.parse_expression(0)?), &[])
            } else if self.eat_keyword(Keyword::Using) {
                (None, self.parse_paren_identifier_list()?)
            } else {
                return Err(self.unexpected("ON or USING"));
            };

            self.extend_chain()?;
            self.charge()?;
            let join = JoinClause {
                join_type,
                natural,
                table: right,
                on,
                using,
                span: self.span_from(join_start),
            };
            table_ref = TableRef::Join {
                left: self.alloc(table_ref)?,
                join: self.alloc(join)?,
                span: self.span_from(start),
            };
        }

        Ok(table_ref)
    }

    /// Parses a table name, a derived table or a parenthesized join tree.
    fn parse_table_factor(&mut self) -> Result<TableRef<'a>, Diagnostic> {
        let start = self.current.span.start;

        if !self.check(&TokenKind::LeftParen) {
            // Simple table name
            let name = self.parse_object_name()?;
            let alias = self.parse_optional_alias()?;
            self.charge()?;
            return Ok(TableRef::Table {
                schema: name.schema,
                name: name.name,
                alias,
                span: self.span_from(start),
            });
        }

        if starts_query(&self.peek_token().kind) {
            self.advance();
            return self.parse_derived_table(start);
        }

        // `((SELECT ...) ...)`: the inner group decides between a derived
        // table with a parenthesized query and a nested join tree.
        if self.query_follows_parens() {
            let inner = self.peek_token().span.start;
            if matches!(
                self.group_follower(inner),
                GroupFollower::CloseParen | GroupFollower::QueryContinuation
            ) {
                self.advance();
                return self.parse_derived_table(start);
            }
        }

        self.expect(&TokenKind::LeftParen)?;
        let inner = self.parse_table_ref()?;
        self.expect(&TokenKind::RightParen)?;
        self.charge()?;
        Ok(TableRef::Nested {
            inner: self.alloc(inner)?,
            span: self.span_from(start),
        })
    }

    /// Parses `query ) [alias]` after the opening parenthesis.
    fn parse_derived_table(&mut self, start: usize) -> Result<TableRef<'a>, Diagnostic> {
        let query = self.parse_query()?;
        self.expect(&TokenKind::RightParen)?;
        let alias = self.parse_optional_alias()?;
        self.charge()?;
        Ok(TableRef::Subquery {
            query: self.alloc(query)?,
            alias,
            span: self.span_from(start),
        })
    }

    /// Checks if current token is a join keyword.
    fn is_join_keyword(&self) -> bool {
        matches!(
            self.current.as_keyword(),
            Some(
                Keyword::Join
                    | Keyword::Inner
                    | Keyword::Left
                    | Keyword::Right
                    | Keyword::Full
                    | Keyword::Cross
                    | Keyword::Natural
            )
        )
    }

    /// Parses the join keywords, returning the join type and NATURAL.
    fn parse_join_type(&mut self) -> Result<(JoinType, bool), Diagnostic> {
        let natural = self.eat_keyword(Keyword::Natural);

        let join_type = match self.current.as_keyword() {
            Some(Keyword::Join) => JoinType::Inner,
            Some(Keyword::Inner) => {
                self.advance();
                JoinType::Inner
            }
            Some(Keyword::Left) => {
                self.advance();
                self.eat_keyword(Keyword::Outer);
                JoinType::Left
            }
            Some(Keyword::Right) => {
                self.advance();
                self.eat_keyword(Keyword::Outer);
                JoinType::Right
            }
            Some(Keyword::Full) => {
                self.advance();
                self.eat_keyword(Keyword::Outer);
                JoinType::Full
            }
            Some(Keyword::Cross) if !natural => {
                self.advance();
                JoinType::Cross
            }
            _ => return Err(self.unexpected("JOIN")),
        };

        self.expect_keyword(Keyword::Join)?;
        Ok((join_type, natural))
    }

    /// Parses ORDER BY entries.
    fn parse_order_by_list(&mut self) -> Result<&'a [OrderBy<'a>], Diagnostic> {
        let mut items = vec![];
        loop {
            let start = self.current.span.start;
            let expr = self.parse_expression(0)?;

            let direction = if self.eat_keyword(Keyword::Desc) {
                OrderDirection::Desc
            } else {
                self.eat_keyword(Keyword::Asc);
                OrderDirection::Asc
            };

            let nulls = if self.eat_keyword(Keyword::Nulls) {
                if self.eat_keyword(Keyword::First) {
                    Some(NullOrdering::First)
                } else if self.eat_keyword(Keyword::Last) {
                    Some(NullOrdering::Last)
                } else {
                    return Err(self.unexpected("FIRST or LAST"));
                }
            } else {
                None
            };

            self.charge()?;
            items.push(OrderBy {
                expr,
                direction,
                nulls,
                span: self.span_from(start),
            });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(self.arena.alloc_slice(items))
    }

    // --- DML ---

    /// Parses an INSERT statement.
    fn parse_insert_statement(&mut self) -> Result<InsertStatement<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;

        let name = self.parse_object_name()?;

        // Column list, unless the parenthesis opens a query
        let columns =
            if self.check(&TokenKind::LeftParen) && !starts_query(&self.peek_token().kind) {
                self.parse_paren_identifier_list()?
            } else {
                &[]
            };

        let values = match &self.current.kind {
            TokenKind::Keyword(Keyword::Values) => InsertSource::Values(self.parse_values()?),
            TokenKind::Keyword(Keyword::Select | Keyword::With) | TokenKind::LeftParen => {
                let query = self.parse_query()?;
                InsertSource::Query(self.alloc(query)?)
            }
            TokenKind::Keyword(Keyword::Default) => {
                self.advance();
                self.expect_keyword(Keyword::Values)?;
                InsertSource::DefaultValues
            }
            _ => return Err(self.unexpected("VALUES, SELECT or DEFAULT VALUES")),
        };

        let on_conflict = if self.check_keyword(Keyword::On) {
            Some(self.parse_on_conflict()?)
        } else {
            None
        };

        let returning = self.parse_returning()?;

        Ok(InsertStatement {
            schema: name.schema,
            table: name.name,
            columns,
            values,
            on_conflict,
            returning,
            span: self.span_from(start),
        })
    }

    /// Parses `ON CONFLICT [(cols)] DO NOTHING | DO UPDATE SET ... [WHERE]`.
    fn parse_on_conflict(&mut self) -> Result<OnConflict<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::On)?;
        self.expect_keyword(Keyword::Conflict)?;

        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_paren_identifier_list()?
        } else {
            &[]
        };

        self.expect_keyword(Keyword::Do)?;
        let action = if self.eat_keyword(Keyword::Nothing) {
            ConflictAction::DoNothing
        } else if self.eat_keyword(Keyword::Update) {
            self.expect_keyword(Keyword::Set)?;
            let assignments = self.parse_assignments()?;
            let where_clause = self.parse_optional_where()?;
            ConflictAction::DoUpdate {
                assignments,
                where_clause,
            }
        } else {
            return Err(self.unexpected("NOTHING or UPDATE"));
        };

        self.charge()?;
        Ok(OnConflict {
            columns,
            action,
            span: self.span_from(start),
        })
    }

    /// Parses an UPDATE statement.
    fn parse_update_statement(&mut self) -> Result<UpdateStatement<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Update)?;

        let name = self.parse_object_name()?;
        let alias = self.parse_optional_alias()?;

        self.expect_keyword(Keyword::Set)?;
        let assignments = self.parse_assignments()?;

        let from = if self.eat_keyword(Keyword::From) {
            self.parse_from_list()?
        } else {
            &[]
        };

        let where_clause = self.parse_optional_where()?;
        let returning = self.parse_returning()?;

        Ok(UpdateStatement {
            schema: name.schema,
            table: name.name,
            alias,
            assignments,
            from,
            where_clause,
            returning,
            span: self.span_from(start),
        })
    }

    /// Parses `col = expr, ...`.
    fn parse_assignments(&mut self) -> Result<&'a [UpdateAssignment<'a>], Diagnostic> {
        let mut assignments = vec![];
        loop {
            let start = self.current.span.start;
            let column = self.expect_identifier()?;
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_expression(0)?;
            self.charge()?;
            assignments.push(UpdateAssignment {
                column,
                value,
                span: self.span_from(start),
            });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(self.arena.alloc_slice(assignments))
    }

    /// Parses a DELETE statement.
    fn parse_delete_statement(&mut self) -> Result<DeleteStatement<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;

        let name = self.parse_object_name()?;
        let alias = self.parse_optional_alias()?;
        let where_clause = self.parse_optional_where()?;
        let returning = self.parse_returning()?;

        Ok(DeleteStatement {
            schema: name.schema,
            table: name.name,
            alias,
            where_clause,
            returning,
            span: self.span_from(start),
        })
    }

    fn parse_optional_where(&mut self) -> Result<Option<Expr<'a>>, Diagnostic> {
        if self.eat_keyword(Keyword::Where) {
            Ok(Some(self.parse_expression(0)?))
        } else {
            Ok(None)
        }
    }

    fn parse_returning(&mut self) -> Result<&'a [SelectColumn<'a>], Diagnostic> {
        if self.eat_keyword(Keyword::Returning) {
            self.parse_select_columns()
        } else {
            Ok(&[])
        }
    }

    // --- DDL ---

    /// Parses CREATE TABLE, CREATE INDEX or CREATE VIEW.
    fn parse_create_statement(&mut self) -> Result<Statement<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Create)?;

        let or_replace = if self.eat_keyword(Keyword::Or) {
            self.expect_keyword(Keyword::Replace)?;
            true
        } else {
            false
        };
        let temporary = self.eat_keyword(Keyword::Temp) || self.eat_keyword(Keyword::Temporary);
        let unique = self.eat_keyword(Keyword::Unique);

        match self.current.as_keyword() {
            Some(Keyword::Table) if !or_replace && !unique => {
                let create = self.parse_create_table(start, temporary)?;
                Ok(Statement::CreateTable(self.alloc(create)?))
            }
            Some(Keyword::Index) if !or_replace && !temporary => {
                let create = self.parse_create_index(start, unique)?;
                Ok(Statement::CreateIndex(self.alloc(create)?))
            }
            Some(Keyword::View) if !temporary && !unique => {
                let create = self.parse_create_view(start, or_replace)?;
                Ok(Statement::CreateView(self.alloc(create)?))
            }
            _ if or_replace => Err(self.unexpected("VIEW")),
            _ if temporary => Err(self.unexpected("TABLE")),
            _ if unique => Err(self.unexpected("INDEX")),
            _ => Err(self.unexpected("TABLE, INDEX or VIEW")),
        }
    }

    /// Parses the rest of CREATE TABLE after the modifiers.
    fn parse_create_table(
        &mut self,
        start: usize,
        temporary: bool,
    ) -> Result<CreateTableStatement<'a>, Diagnostic> {
        self.expect_keyword(Keyword::Table)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_object_name()?;

        let mut columns = vec![];
        let mut constraints = vec![];
        let mut as_query = None;

        if self.eat_keyword(Keyword::As) {
            let query = self.parse_query()?;
            as_query = Some(self.alloc(query)?);
        } else {
            self.expect(&TokenKind::LeftParen)?;
            loop {
                if self.is_table_constraint_start() {
                    constraints.push(self.parse_table_constraint()?);
                } else {
                    columns.push(self.parse_column_def()?);
                }
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen)?;
        }

        Ok(CreateTableStatement {
            temporary,
            if_not_exists,
            name,
            columns: self.arena.alloc_slice(columns),
            constraints: self.arena.alloc_slice(constraints),
            as_query,
            span: self.span_from(start),
        })
    }

    fn is_table_constraint_start(&self) -> bool {
        matches!(
            self.current.as_keyword(),
            Some(
                Keyword::Constraint
                    | Keyword::Primary
                    | Keyword::Unique
                    | Keyword::Foreign
                    | Keyword::Check
            )
        )
    }

    /// Parses a column definition with its constraints.
    fn parse_column_def(&mut self) -> Result<ColumnDef<'a>, Diagnostic> {
        let start = self.current.span.start;
        let name = self.expect_identifier()?;
        let data_type = self.parse_data_type()?;

        let mut constraints = vec![];
        while let Some(constraint) = self.parse_column_constraint()? {
            constraints.push(constraint);
        }

        self.charge()?;
        Ok(ColumnDef {
            name,
            data_type,
            constraints: self.arena.alloc_slice(constraints),
            span: self.span_from(start),
        })
    }

    /// Parses one column constraint, or returns `None` at the end of them.
    fn parse_column_constraint(&mut self) -> Result<Option<ColumnConstraint<'a>>, Diagnostic> {
        let start = self.current.span.start;
        let name = if self.eat_keyword(Keyword::Constraint) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let kind = match self.current.as_keyword() {
            Some(Keyword::Not) => {
                self.advance();
                self.expect_keyword(Keyword::Null)?;
                ColumnConstraintKind::NotNull
            }
            Some(Keyword::Null) => {
                self.advance();
                ColumnConstraintKind::Null
            }
            Some(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                let order = if self.eat_keyword(Keyword::Asc) {
                    Some(OrderDirection::Asc)
                } else if self.eat_keyword(Keyword::Desc) {
                    Some(OrderDirection::Desc)
                } else {
                    None
                };
                let autoincrement = self.eat_keyword(Keyword::Autoincrement);
                ColumnConstraintKind::PrimaryKey {
                    order,
                    autoincrement,
                }
            }
            Some(Keyword::Unique) => {
                self.advance();
                ColumnConstraintKind::Unique
            }
            Some(Keyword::Default) => {
                self.advance();
                ColumnConstraintKind::Default(self.parse_expression(0)?)
            }
            Some(Keyword::Check) => {
                self.advance();
                ColumnConstraintKind::Check(self.parse_paren_expression()?)
            }
            Some(Keyword::References) => {
                self.advance();
                ColumnConstraintKind::References(self.parse_references()?)
            }
            _ if name.is_some() => return Err(self.unexpected("column constraint")),
            _ => return Ok(None),
        };

        self.charge()?;
        Ok(Some(ColumnConstraint {
            name,
            kind,
            span: self.span_from(start),
        }))
    }

    /// Parses a table-level constraint.
    fn parse_table_constraint(&mut self) -> Result<TableConstraint<'a>, Diagnostic> {
        let start = self.current.span.start;
        let name = if self.eat_keyword(Keyword::Constraint) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let kind = match self.current.as_keyword() {
            Some(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                TableConstraintKind::PrimaryKey(self.parse_paren_identifier_list()?)
            }
            Some(Keyword::Unique) => {
                self.advance();
                TableConstraintKind::Unique(self.parse_paren_identifier_list()?)
            }
            Some(Keyword::Foreign) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                let columns = self.parse_paren_identifier_list()?;
                self.expect_keyword(Keyword::References)?;
                TableConstraintKind::ForeignKey {
                    columns,
                    references: self.parse_references()?,
                }
            }
            Some(Keyword::Check) => {
                self.advance();
                TableConstraintKind::Check(self.parse_paren_expression()?)
            }
            _ => return Err(self.unexpected("PRIMARY KEY, UNIQUE, FOREIGN KEY or CHECK")),
        };

        self.charge()?;
        Ok(TableConstraint {
            name,
            kind,
            span: self.span_from(start),
        })
    }

    /// Parses the part of a foreign key after REFERENCES.
    fn parse_references(&mut self) -> Result<ForeignKeyRef<'a>, Diagnostic> {
        let table = self.parse_object_name()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_paren_identifier_list()?
        } else {
            &[]
        };

        let mut on_delete = None;
        let mut on_update = None;
        while self.eat_keyword(Keyword::On) {
            if self.eat_keyword(Keyword::Delete) {
                on_delete = Some(self.parse_referential_action()?);
            } else if self.eat_keyword(Keyword::Update) {
                on_update = Some(self.parse_referential_action()?);
            } else {
                return Err(self.unexpected("DELETE or UPDATE"));
            }
        }

        Ok(ForeignKeyRef {
            table,
            columns,
            on_delete,
            on_update,
        })
    }

    fn parse_referential_action(&mut self) -> Result<ReferentialAction, Diagnostic> {
        if self.eat_keyword(Keyword::Cascade) {
            Ok(ReferentialAction::Cascade)
        } else if self.eat_keyword(Keyword::Restrict) {
            Ok(ReferentialAction::Restrict)
        } else if self.eat_keyword(Keyword::Set) {
            if self.eat_keyword(Keyword::Null) {
                Ok(ReferentialAction::SetNull)
            } else if self.eat_keyword(Keyword::Default) {
                Ok(ReferentialAction::SetDefault)
            } else {
                Err(self.unexpected("NULL or DEFAULT"))
            }
        } else if self.eat_keyword(Keyword::No) {
            self.expect_keyword(Keyword::Action)?;
            Ok(ReferentialAction::NoAction)
        } else {
            Err(self.unexpected("CASCADE, RESTRICT, SET NULL, SET DEFAULT or NO ACTION"))
        }
    }

    /// Parses the rest of CREATE INDEX after the modifiers.
    fn parse_create_index(
        &mut self,
        start: usize,
        unique: bool,
    ) -> Result<CreateIndexStatement<'a>, Diagnostic> {
        self.expect_keyword(Keyword::Index)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.expect_identifier()?;
        self.expect_keyword(Keyword::On)?;
        let table = self.parse_object_name()?;

        self.expect(&TokenKind::LeftParen)?;
        let columns = self.parse_order_by_list()?;
        self.expect(&TokenKind::RightParen)?;

        let where_clause = self.parse_optional_where()?;

        Ok(CreateIndexStatement {
            unique,
            if_not_exists,
            name,
            table,
            columns,
            where_clause,
            span: self.span_from(start),
        })
    }

    /// Parses the rest of CREATE VIEW after the modifiers.
    fn parse_create_view(
        &mut self,
        start: usize,
        or_replace: bool,
    ) -> Result<CreateViewStatement<'a>, Diagnostic> {
        self.expect_keyword(Keyword::View)?;
        let name = self.parse_object_name()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_paren_identifier_list()?
        } else {
            &[]
        };
        self.expect_keyword(Keyword::As)?;
        let query = self.parse_query()?;

        Ok(CreateViewStatement {
            or_replace,
            name,
            columns,
            query: self.alloc(query)?,
            span: self.span_from(start),
        })
    }

    /// Parses `DROP TABLE|INDEX|VIEW [IF EXISTS] name, ... [CASCADE|RESTRICT]`.
    fn parse_drop_statement(&mut self) -> Result<DropStatement<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Drop)?;

        let object_type = match self.current.as_keyword() {
            Some(Keyword::Table) => ObjectType::Table,
            Some(Keyword::Index) => ObjectType::Index,
            Some(Keyword::View) => ObjectType::View,
            _ => return Err(self.unexpected("TABLE, INDEX or VIEW")),
        };
        self.advance();

        let if_exists = if self.eat_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };

        let mut names = vec![self.parse_object_name()?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.parse_object_name()?);
        }

        let behavior = if self.eat_keyword(Keyword::Cascade) {
            Some(DropBehavior::Cascade)
        } else if self.eat_keyword(Keyword::Restrict) {
            Some(DropBehavior::Restrict)
        } else {
            None
        };

        Ok(DropStatement {
            object_type,
            if_exists,
            names: self.arena.alloc_slice(names),
            behavior,
            span: self.span_from(start),
        })
    }

    /// Parses BEGIN, COMMIT or ROLLBACK with an optional TRANSACTION.
    fn parse_transaction_statement(&mut self, keyword: Keyword) -> Statement<'a> {
        let start = self.current.span.start;
        self.advance();
        self.eat_keyword(Keyword::Transaction);
        let span = self.span_from(start);
        match keyword {
            Keyword::Begin => Statement::Begin { span },
            Keyword::Commit => Statement::Commit { span },
            _ => Statement::Rollback { span },
        }
    }

    /// Parses `IF NOT EXISTS`, if present.
    fn parse_if_not_exists(&mut self) -> Result<bool, Diagnostic> {
        if self.eat_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // --- Expressions ---

    /// Parses an expression using Pratt parsing.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr<'a>, Diagnostic> {
        self.nested(|p| p.parse_expression_bp(min_bp))
    }

    fn parse_expression_bp(&mut self, min_bp: u8) -> Result<Expr<'a>, Diagnostic> {
        // Parse prefix (primary expression or unary operator)
        let mut lhs = self.parse_prefix()?;
        // Left binding power of the last non-associative operator applied
        let mut last_non_assoc = None;

        loop {
            if let Some(bp) = postfix_binding_power(&self.current.kind) {
                if bp < min_bp {
                    break;
                }
                lhs = self.parse_cast_suffix(lhs)?;
                self.extend_chain()?;
                continue;
            }

            // NOT BETWEEN, NOT IN, NOT LIKE, NOT ILIKE
            let negated = self.check_keyword(Keyword::Not) && self.negated_predicate_follows();
            let binding = if negated {
                infix_binding_power(&self.peek_token().kind)
            } else {
                infix_binding_power(&self.current.kind)
            };
            let Some((l_bp, r_bp)) = binding else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            if is_non_associative(l_bp) {
                if last_non_assoc == Some(l_bp) {
                    return Err(non_associative(l_bp, self.current.span));
                }
                last_non_assoc = Some(l_bp);
            } else {
                last_non_assoc = None;
            }

            if negated {
                self.advance();
            }

            // Handle special infix operators
            lhs = match self.current.as_keyword() {
                Some(Keyword::Is) => self.parse_is(lhs, r_bp)?,
                Some(Keyword::In) => self.parse_in(lhs, negated)?,
                Some(Keyword::Between) => self.parse_between(lhs, negated)?,
                Some(kw @ (Keyword::Like | Keyword::Ilike)) => {
                    self.advance();
                    let pattern = self.parse_expression(r_bp)?;
                    let span = lhs.span().merge(pattern.span());
                    Expr::Like {
                        expr: self.alloc(lhs)?,
                        pattern: self.alloc(pattern)?,
                        negated,
                        case_insensitive: kw == Keyword::Ilike,
                        span,
                    }
                }
                _ => {
                    // Standard binary operator
                    let Some(op) = token_to_binary_op(&self.current.kind) else {
                        break;
                    };
                    self.advance();
                    let rhs = self.parse_expression(r_bp)?;
                    let span = lhs.span().merge(rhs.span());
                    Expr::Binary {
                        left: self.alloc(lhs)?,
                        op,
                        right: self.alloc(rhs)?,
                        span,
                    }
                }
            };
            self.extend_chain()?;
        }

        Ok(lhs)
    }

    /// Returns true if the current `NOT` starts `NOT BETWEEN/IN/LIKE/ILIKE`.
    fn negated_predicate_follows(&self) -> bool {
        matches!(
            self.peek_token().kind,
            TokenKind::Keyword(Keyword::Between | Keyword::In | Keyword::Like | Keyword::Ilike)
        )
    }

    /// Parses `IS [NOT] NULL|TRUE|FALSE|DISTINCT FROM expr`.
    fn parse_is(&mut self, lhs: Expr<'a>, r_bp: u8) -> Result<Expr<'a>, Diagnostic> {
        self.expect_keyword(Keyword::Is)?;
        let negated = self.eat_keyword(Keyword::Not);

        match self.current.as_keyword() {
            Some(Keyword::Null) => {
                self.advance();
                let span = lhs.span().merge(self.previous.span);
                Ok(Expr::IsNull {
                    expr: self.alloc(lhs)?,
                    negated,
                    span,
                })
            }
            Some(kw @ (Keyword::True | Keyword::False)) => {
                self.advance();
                let span = lhs.span().merge(self.previous.span);
                Ok(Expr::IsBool {
                    expr: self.alloc(lhs)?,
                    value: kw == Keyword::True,
                    negated,
                    span,
                })
            }
            Some(Keyword::Distinct) => {
                self.advance();
                self.expect_keyword(Keyword::From)?;
                let right = self.parse_expression(r_bp)?;
                let span = lhs.span().merge(right.span());
                Ok(Expr::IsDistinctFrom {
                    left: self.alloc(lhs)?,
                    right: self.alloc(right)?,
                    negated,
                    span,
                })
            }
            _ => Err(self.unexpected("NULL, TRUE, FALSE or DISTINCT FROM")),
        }
    }

    /// Parses `IN (list)` or `IN (query)`.
    fn parse_in(&mut self, lhs: Expr<'a>, negated: bool) -> Result<Expr<'a>, Diagnostic> {
        self.expect_keyword(Keyword::In)?;
        self.expect(&TokenKind::LeftParen)?;

        if starts_query(&self.current.kind) {
            return self.finish_in_subquery(lhs, negated);
        }

        // `IN ((SELECT ...) ...)`: a parenthesized query or a list whose
        // first item is a scalar subquery.
        if self.check(&TokenKind::LeftParen)
            && self.query_follows_parens()
            && matches!(
                self.group_follower(self.current.span.start),
                GroupFollower::CloseParen | GroupFollower::QueryContinuation
            )
        {
            return self.finish_in_subquery(lhs, negated);
        }

        if self.check(&TokenKind::RightParen) {
            return Err(Diagnostic::syntax(
                "IN list cannot be empty",
                self.current.span,
            ));
        }
        let list = self.parse_expression_list()?;
        self.expect(&TokenKind::RightParen)?;
        let span = lhs.span().merge(self.previous.span);
        Ok(Expr::In {
            expr: self.alloc(lhs)?,
            list,
            negated,
            span,
        })
    }

    /// Parses `query )` after the opening parenthesis of `IN (`.
    fn finish_in_subquery(
        &mut self,
        lhs: Expr<'a>,
        negated: bool,
    ) -> Result<Expr<'a>, Diagnostic> {
        let query = self.parse_query()?;
        self.expect(&TokenKind::RightParen)?;
        let span = lhs.span().merge(self.previous.span);
        Ok(Expr::InSubquery {
            expr: self.alloc(lhs)?,
            query: self.alloc(query)?,
            negated,
            span,
        })
    }

    /// Parses `BETWEEN low AND high`.
    fn parse_between(&mut self, lhs: Expr<'a>, negated: bool) -> Result<Expr<'a>, Diagnostic> {
        self.expect_keyword(Keyword::Between)?;
        let low = self.parse_expression(BETWEEN_BOUND_BP)?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_expression(BETWEEN_BOUND_BP)?;
        let span = lhs.span().merge(high.span());
        Ok(Expr::Between {
            expr: self.alloc(lhs)?,
            low: self.alloc(low)?,
            high: self.alloc(high)?,
            negated,
            span,
        })
    }

    /// Parses the `::type` suffix.
    fn parse_cast_suffix(&mut self, lhs: Expr<'a>) -> Result<Expr<'a>, Diagnostic> {
        self.expect(&TokenKind::DoubleColon)?;
        let data_type = self.parse_data_type()?;
        let span = lhs.span().merge(self.previous.span);
        Ok(Expr::Cast {
            expr: self.alloc(lhs)?,
            data_type,
            span,
        })
    }

    /// Parses a prefix expression.
    fn parse_prefix(&mut self) -> Result<Expr<'a>, Diagnostic> {
        // Check for unary operators
        if let (Some(op), Some(bp)) = (
            token_to_unary_op(&self.current.kind),
            prefix_binding_power(&self.current.kind),
        ) {
            let start = self.current.span.start;
            self.advance();
            let operand = self.parse_expression(bp)?;
            let span = Span::new(start, operand.span().end);
            return Ok(Expr::Unary {
                op,
                operand: self.alloc(operand)?,
                span,
            });
        }

        self.parse_primary()
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr<'a>, Diagnostic> {
        self.charge()?;
        let span = self.current.span;

        let literal = match &self.current.kind {
            // Literals
            TokenKind::Integer(n) => Literal::Integer(*n),
            TokenKind::Float(f) => Literal::Float(*f),
            TokenKind::Numeric(digits) => Literal::Numeric(self.arena.alloc_str(digits)),
            TokenKind::String(s) => Literal::String(self.arena.alloc_str(s)),
            TokenKind::Blob(b) => Literal::Blob(self.arena.alloc_bytes(b)),
            TokenKind::Keyword(Keyword::True) => Literal::Boolean(true),
            TokenKind::Keyword(Keyword::False) => Literal::Boolean(false),
            TokenKind::Keyword(Keyword::Null) => Literal::Null,

            // Parameter placeholders
            TokenKind::Question
            | TokenKind::DollarParam(_)
            | TokenKind::Colon
            | TokenKind::At => return self.parse_parameter(),

            // Wildcard
            TokenKind::Star => {
                self.advance();
                return Ok(Expr::Wildcard { table: None, span });
            }

            // Parenthesized expression, tuple or subquery
            TokenKind::LeftParen => return self.parse_parenthesized(),

            TokenKind::Keyword(Keyword::Case) => return self.parse_case_expression(),
            TokenKind::Keyword(Keyword::Cast) => return self.parse_cast_expression(),
            TokenKind::Keyword(Keyword::Exists) => return self.parse_exists(),

            // Typed string literals: DATE '...', TIME '...', TIMESTAMP '...'
            TokenKind::Keyword(kw @ (Keyword::Date | Keyword::Time | Keyword::Timestamp))
                if matches!(self.peek_token().kind, TokenKind::String(_)) =>
            {
                let kw = *kw;
                return self.parse_typed_literal(kw);
            }

            // LEFT(...) and RIGHT(...) are functions despite being reserved
            TokenKind::Keyword(kw @ (Keyword::Left | Keyword::Right))
                if self.peek_token().kind == TokenKind::LeftParen =>
            {
                let name = kw.as_str();
                self.advance();
                return self.parse_function_call(name, span.start);
            }

            // Identifier (column reference or function call)
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                return self.parse_identifier_expression();
            }
            TokenKind::Keyword(kw) if !kw.is_reserved() => {
                return self.parse_identifier_expression();
            }

            _ => return Err(self.unexpected("expression")),
        };

        self.advance();
        Ok(Expr::Literal {
            value: literal,
            span,
        })
    }

    /// Parses `?`, `$n`, `:name` or `@name`.
    fn parse_parameter(&mut self) -> Result<Expr<'a>, Diagnostic> {
        let start = self.current.span.start;
        let (name, position, style) = match &self.current.kind {
            TokenKind::Question => {
                self.param_counter += 1;
                self.advance();
                (None, self.param_counter, ParameterStyle::Question)
            }
            TokenKind::DollarParam(n) => {
                let position = *n as usize;
                self.advance();
                (None, position, ParameterStyle::Dollar)
            }
            TokenKind::Colon => {
                self.advance();
                (Some(self.expect_identifier()?), 0, ParameterStyle::Colon)
            }
            TokenKind::At => {
                self.advance();
                (Some(self.expect_identifier()?), 0, ParameterStyle::At)
            }
            _ => return Err(self.unexpected("parameter")),
        };

        Ok(Expr::Parameter {
            name,
            position,
            style,
            span: self.span_from(start),
        })
    }

    /// Parses a column reference, `t.*` or a function call.
    fn parse_identifier_expression(&mut self) -> Result<Expr<'a>, Diagnostic> {
        let start = self.current.span.start;
        // Keyword function names take their canonical spelling
        let keyword_name = self.current.as_keyword().map(|kw| kw.as_str());
        let name = self.expect_identifier()?;

        // Check for function call
        if self.check(&TokenKind::LeftParen) {
            return self.parse_function_call(keyword_name.unwrap_or(name), start);
        }

        // Check for qualified name (table.column or table.*)
        if self.eat(&TokenKind::Dot) {
            if self.eat(&TokenKind::Star) {
                return Ok(Expr::Wildcard {
                    table: Some(name),
                    span: self.span_from(start),
                });
            }
            let column = self.expect_identifier()?;
            return Ok(Expr::Column {
                table: Some(name),
                name: column,
                span: self.span_from(start),
            });
        }

        Ok(Expr::Column {
            table: None,
            name,
            span: self.span_from(start),
        })
    }

    /// Parses a function call after its name.
    fn parse_function_call(
        &mut self,
        name: &'a str,
        start: usize,
    ) -> Result<Expr<'a>, Diagnostic> {
        self.expect(&TokenKind::LeftParen)?;

        let distinct = self.eat_keyword(Keyword::Distinct);

        let args: &'a [Expr<'a>] = if self.check(&TokenKind::RightParen) {
            &[]
        } else if self.check(&TokenKind::Star) {
            let span = self.current.span;
            self.advance();
            self.charge()?;
            self.arena
                .alloc_slice(vec![Expr::Wildcard { table: None, span }])
        } else {
            self.parse_expression_list()?
        };

        self.expect(&TokenKind::RightParen)?;

        let over = if self.eat_keyword(Keyword::Over) {
            Some(self.parse_window_spec()?)
        } else {
            None
        };

        Ok(Expr::Function(FunctionCall {
            name,
            args,
            distinct,
            over,
            span: self.span_from(start),
        }))
    }

    /// Parses `(PARTITION BY ... ORDER BY ... frame)` after OVER.
    fn parse_window_spec(&mut self) -> Result<WindowSpec<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LeftParen)?;

        let partition_by = if self.eat_keyword(Keyword::Partition) {
            self.expect_keyword(Keyword::By)?;
            self.parse_expression_list()?
        } else {
            &[]
        };

        let order_by = if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            &[]
        };

        let units = if self.eat_keyword(Keyword::Rows) {
            Some(FrameUnits::Rows)
        } else if self.eat_keyword(Keyword::Range) {
            Some(FrameUnits::Range)
        } else {
            None
        };
        let frame = match units {
            Some(units) if self.eat_keyword(Keyword::Between) => {
                let start = self.parse_frame_bound()?;
                self.expect_keyword(Keyword::And)?;
                let end = self.parse_frame_bound()?;
                Some(WindowFrame {
                    units,
                    start,
                    end: Some(end),
                })
            }
            Some(units) => Some(WindowFrame {
                units,
                start: self.parse_frame_bound()?,
                end: None,
            }),
            None => None,
        };

        self.expect(&TokenKind::RightParen)?;
        self.charge()?;
        Ok(WindowSpec {
            partition_by,
            order_by,
            frame,
            span: self.span_from(start),
        })
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound<'a>, Diagnostic> {
        if self.eat_keyword(Keyword::Unbounded) {
            if self.eat_keyword(Keyword::Preceding) {
                return Ok(FrameBound::UnboundedPreceding);
            }
            self.expect_keyword(Keyword::Following)?;
            return Ok(FrameBound::UnboundedFollowing);
        }
        if self.eat_keyword(Keyword::Current) {
            self.expect_keyword(Keyword::Row)?;
            return Ok(FrameBound::CurrentRow);
        }

        let offset = self.parse_expression(BETWEEN_BOUND_BP)?;
        if self.eat_keyword(Keyword::Preceding) {
            Ok(FrameBound::Preceding(self.alloc(offset)?))
        } else if self.eat_keyword(Keyword::Following) {
            Ok(FrameBound::Following(self.alloc(offset)?))
        } else {
            Err(self.unexpected("PRECEDING or FOLLOWING"))
        }
    }

    /// Parses `DATE '...'` and friends.
    fn parse_typed_literal(&mut self, keyword: Keyword) -> Result<Expr<'a>, Diagnostic> {
        let start = self.current.span.start;
        let data_type = match keyword {
            Keyword::Date => DataType::Date,
            Keyword::Time => DataType::Time,
            _ => DataType::Timestamp,
        };
        self.advance();

        let TokenKind::String(value) = &self.current.kind else {
            return Err(self.unexpected("string literal"));
        };
        let value = self.arena.alloc_str(value);
        self.advance();

        Ok(Expr::Literal {
            value: Literal::Typed { data_type, value },
            span: self.span_from(start),
        })
    }

    /// Parses `(`-led expressions: a scalar subquery, a parenthesized
    /// expression or a row tuple.
    ///
    /// When the parenthesis is followed by more parentheses and then a
    /// query keyword, the token after the inner group decides: a set
    /// operator, ORDER, LIMIT or OFFSET means the whole group is a query
    /// with a parenthesized operand, and anything else is an expression.
    fn parse_parenthesized(&mut self) -> Result<Expr<'a>, Diagnostic> {
        let start = self.current.span.start;

        if starts_query(&self.peek_token().kind) {
            self.advance();
            return self.finish_subquery(start);
        }

        if self.query_follows_parens() {
            let inner = self.peek_token().span.start;
            if self.group_follower(inner) == GroupFollower::QueryContinuation {
                self.advance();
                return self.finish_subquery(start);
            }
        }

        self.parse_paren_or_tuple()
    }

    /// Parses `query )` after the opening parenthesis of a scalar subquery.
    fn finish_subquery(&mut self, start: usize) -> Result<Expr<'a>, Diagnostic> {
        let query = self.parse_query()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::Subquery {
            query: self.alloc(query)?,
            span: self.span_from(start),
        })
    }

    /// Parses `(expr)` or `(expr, expr, ...)`.
    fn parse_paren_or_tuple(&mut self) -> Result<Expr<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LeftParen)?;
        let first = self.parse_expression(0)?;

        if self.eat(&TokenKind::Comma) {
            let mut items = vec![first];
            loop {
                items.push(self.parse_expression(0)?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::Tuple {
                items: self.arena.alloc_slice(items),
                span: self.span_from(start),
            });
        }

        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::Paren {
            expr: self.alloc(first)?,
            span: self.span_from(start),
        })
    }

    /// Parses `EXISTS (query)`.
    fn parse_exists(&mut self) -> Result<Expr<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Exists)?;
        self.expect(&TokenKind::LeftParen)?;
        let query = self.parse_query()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::Exists {
            query: self.alloc(query)?,
            span: self.span_from(start),
        })
    }

    /// Parses a CAST expression.
    fn parse_cast_expression(&mut self) -> Result<Expr<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(&TokenKind::RightParen)?;

        Ok(Expr::Cast {
            expr: self.alloc(expr)?,
            data_type,
            span: self.span_from(start),
        })
    }

    /// Parses a CASE expression.
    fn parse_case_expression(&mut self) -> Result<Expr<'a>, Diagnostic> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Case)?;

        // Check for simple CASE (CASE expr WHEN ...)
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            let operand = self.parse_expression(0)?;
            Some(self.alloc(operand)?)
        };

        // Parse WHEN/THEN clauses
        let mut when_clauses = vec![];
        while self.eat_keyword(Keyword::When) {
            let when_expr = self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            let then_expr = self.parse_expression(0)?;
            when_clauses.push((when_expr, then_expr));
        }
        if when_clauses.is_empty() {
            return Err(self.unexpected("WHEN"));
        }

        // Parse ELSE clause
        let else_clause = if self.eat_keyword(Keyword::Else) {
            let else_expr = self.parse_expression(0)?;
            Some(self.alloc(else_expr)?)
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case {
            operand,
            when_clauses: self.arena.alloc_slice(when_clauses),
            else_clause,
            span: self.span_from(start),
        })
    }

    /// Parses `(expr)`, as used by CHECK constraints.
    fn parse_paren_expression(&mut self) -> Result<Expr<'a>, Diagnostic> {
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression(0)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(expr)
    }

    // --- Types and names ---

    /// Parses a data type.
    fn parse_data_type(&mut self) -> Result<DataType<'a>, Diagnostic> {
        let data_type = match &self.current.kind {
            TokenKind::Keyword(Keyword::Int | Keyword::Integer) => {
                self.advance();
                DataType::Integer
            }
            TokenKind::Keyword(Keyword::Smallint) => {
                self.advance();
                DataType::Smallint
            }
            TokenKind::Keyword(Keyword::Bigint) => {
                self.advance();
                DataType::Bigint
            }
            TokenKind::Keyword(Keyword::Real) => {
                self.advance();
                DataType::Real
            }
            TokenKind::Keyword(Keyword::Double) => {
                self.advance();
                // DOUBLE PRECISION
                if self.current.text.eq_ignore_ascii_case("precision") {
                    self.advance();
                }
                DataType::Double
            }
            TokenKind::Keyword(Keyword::Float) => {
                self.advance();
                DataType::Double
            }
            TokenKind::Keyword(Keyword::Decimal) => {
                self.advance();
                let (precision, scale) = self.parse_optional_precision_scale()?;
                DataType::Decimal { precision, scale }
            }
            TokenKind::Keyword(Keyword::Numeric) => {
                self.advance();
                let (precision, scale) = self.parse_optional_precision_scale()?;
                DataType::Numeric { precision, scale }
            }
            TokenKind::Keyword(Keyword::Char) => {
                self.advance();
                let len = self.parse_optional_length()?;
                DataType::Char(len)
            }
            TokenKind::Keyword(Keyword::Varchar) => {
                self.advance();
                let len = self.parse_optional_length()?;
                DataType::Varchar(len)
            }
            TokenKind::Keyword(Keyword::Text) => {
                self.advance();
                DataType::Text
            }
            TokenKind::Keyword(Keyword::Blob) => {
                self.advance();
                DataType::Blob
            }
            TokenKind::Keyword(Keyword::Boolean) => {
                self.advance();
                DataType::Boolean
            }
            TokenKind::Keyword(Keyword::Date) => {
                self.advance();
                DataType::Date
            }
            TokenKind::Keyword(Keyword::Time) => {
                self.advance();
                DataType::Time
            }
            TokenKind::Keyword(Keyword::Timestamp) => {
                self.advance();
                DataType::Timestamp
            }
            TokenKind::Keyword(Keyword::Datetime) => {
                self.advance();
                DataType::Datetime
            }
            TokenKind::Identifier(name) => {
                let name = self.arena.alloc_str(name);
                self.advance();
                DataType::Custom(name)
            }
            _ => return Err(self.unexpected("data type")),
        };

        Ok(data_type)
    }

    /// Parses optional precision and scale (for DECIMAL/NUMERIC).
    fn parse_optional_precision_scale(
        &mut self,
    ) -> Result<(Option<u16>, Option<u16>), Diagnostic> {
        if !self.eat(&TokenKind::LeftParen) {
            return Ok((None, None));
        }

        let precision = self.expect_type_argument("precision")?;
        let scale = if self.eat(&TokenKind::Comma) {
            Some(self.expect_type_argument("scale")?)
        } else {
            None
        };

        self.expect(&TokenKind::RightParen)?;
        Ok((Some(precision), scale))
    }

    /// Parses optional length (for CHAR/VARCHAR).
    fn parse_optional_length(&mut self) -> Result<Option<u32>, Diagnostic> {
        if !self.eat(&TokenKind::LeftParen) {
            return Ok(None);
        }

        let length = self.expect_type_argument("length")?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Some(length))
    }

    /// Expects an integer type argument that fits `T`.
    fn expect_type_argument<T: TryFrom<i64>>(&mut self, what: &str) -> Result<T, Diagnostic> {
        let TokenKind::Integer(n) = self.current.kind else {
            return Err(self.unexpected("integer"));
        };
        let value = T::try_from(n).map_err(|_| {
            Diagnostic::syntax(format!("{what} {n} is out of range"), self.current.span)
        })?;
        self.advance();
        Ok(value)
    }

    /// Parses `name` or `schema.name`.
    fn parse_object_name(&mut self) -> Result<ObjectName<'a>, Diagnostic> {
        let start = self.current.span.start;
        let first = self.expect_identifier()?;
        let (schema, name) = if self.eat(&TokenKind::Dot) {
            (Some(first), self.expect_identifier()?)
        } else {
            (None, first)
        };
        Ok(ObjectName {
            schema,
            name,
            span: self.span_from(start),
        })
    }

    /// Parses `AS name` or an implicit alias.
    fn parse_optional_alias(&mut self) -> Result<Option<&'a str>, Diagnostic> {
        if self.eat_keyword(Keyword::As) {
            return Ok(Some(self.expect_identifier()?));
        }
        if matches!(
            self.current.kind,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
        ) {
            return Ok(Some(self.expect_identifier()?));
        }
        Ok(None)
    }

    /// Parses a comma-separated list of expressions.
    fn parse_expression_list(&mut self) -> Result<&'a [Expr<'a>], Diagnostic> {
        let mut exprs = vec![];
        loop {
            exprs.push(self.parse_expression(0)?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(self.arena.alloc_slice(exprs))
    }

    /// Parses a comma-separated list of identifiers.
    fn parse_identifier_list(&mut self) -> Result<&'a [&'a str], Diagnostic> {
        let mut idents = vec![];
        loop {
            idents.push(self.expect_identifier()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(self.arena.alloc_slice(idents))
    }

    /// Parses `(ident, ...)`.
    fn parse_paren_identifier_list(&mut self) -> Result<&'a [&'a str], Diagnostic> {
        self.expect(&TokenKind::LeftParen)?;
        let idents = self.parse_identifier_list()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(idents)
    }

    // --- Helper methods ---

    /// Advances to the next token.
    pub(super) fn advance(&mut self) {
        self.previous = core::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Scans the token after the current one without consuming anything.
    pub(super) fn peek_token(&self) -> Token<'src> {
        self.lexer.clone().next_token()
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Consumes the current token if it matches the given kind.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        let matched = self.check(kind);
        if matched {
            self.advance();
        }
        matched
    }

    /// Consumes the current token if it is the given keyword.
    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = self.check_keyword(keyword);
        if matched {
            self.advance();
        }
        matched
    }

    /// Expects the current token to be the given kind.
    fn expect(&mut self, kind: &TokenKind) -> Result<(), Diagnostic> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("\"{}\"", kind.symbol())))
        }
    }

    /// Expects the current token to be the given keyword.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), Diagnostic> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// Expects and returns an identifier.
    ///
    /// Quoted identifiers and non-reserved keywords are accepted; keywords
    /// keep the spelling of the source.
    fn expect_identifier(&mut self) -> Result<&'a str, Diagnostic> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => {
                self.arena.alloc_str(name)
            }
            TokenKind::Keyword(kw) if !kw.is_reserved() => self.arena.alloc_str(self.current.text),
            _ => return Err(self.unexpected("identifier")),
        };
        self.advance();
        Ok(name)
    }

    /// Builds the error for an unexpected current token.
    fn unexpected(&self, expected: &str) -> Diagnostic {
        Diagnostic::unexpected(expected, &self.current)
    }

    /// Returns the span from `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.previous.span.end.max(start))
    }

    /// Moves a node into the arena, counting it against the node budget.
    fn alloc<T>(&mut self, value: T) -> Result<&'a T, Diagnostic> {
        let span = self.current.span;
        self.arena
            .alloc(value)
            .map_err(|err| Diagnostic::resource(err.to_string(), span))
    }

    /// Counts one inline node against the node budget.
    fn charge(&mut self) -> Result<(), Diagnostic> {
        let span = self.current.span;
        self.arena
            .charge(1)
            .map_err(|err| Diagnostic::resource(err.to_string(), span))
    }

    /// Runs `rule` one nesting level deeper, failing once the depth limit
    /// is reached.
    ///
    /// The rule starts a fresh link count; on return the caller's count
    /// becomes the taller of its own subtree and the rule's.
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, Diagnostic>,
    ) -> Result<T, Diagnostic> {
        if self.depth >= self.max_depth {
            return Err(Diagnostic::resource(
                format!("nesting depth exceeds the limit of {}", self.max_depth),
                self.current.span,
            ));
        }
        let outer = core::mem::take(&mut self.chain);
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        self.chain = self.chain.max(outer);
        result
    }

    /// Records one more link of a left-deep chain: a binary operator,
    /// postfix test, set operation or join wrapping what came before.
    fn extend_chain(&mut self) -> Result<(), Diagnostic> {
        self.chain += 1;
        if self.depth + self.chain > self.max_height {
            return Err(Diagnostic::resource(
                format!("syntax tree height exceeds the limit of {}", self.max_height),
                self.previous.span,
            ));
        }
        Ok(())
    }
}

/// Returns true for the keywords that begin a query.
pub(super) fn starts_query(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Keyword(Keyword::Select | Keyword::With | Keyword::Values)
    )
}

/// The error for chaining two operators of the same non-associative level.
fn non_associative(left_bp: u8, span: Span) -> Diagnostic {
    let message = match left_bp {
        COMPARISON_BP => "comparison operators are non-associative; use parentheses to chain them",
        IS_BP => "IS tests are non-associative; use parentheses to chain them",
        _ => "BETWEEN, IN and LIKE are non-associative; use parentheses to chain them",
    };
    Diagnostic::syntax(message, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    /// A bump that lives for the rest of the test binary.
    fn bump() -> &'static Bump {
        Box::leak(Box::new(Bump::new()))
    }

    fn parse(sql: &str) -> Result<Statement<'static>, Diagnostic> {
        Parser::new(sql, bump()).parse_statement()
    }

    fn parse_with(sql: &str, options: &ParseOptions) -> Result<Statement<'static>, Diagnostic> {
        Parser::with_options(sql, bump(), options).parse_statement()
    }

    fn parse_query(sql: &str) -> &'static Query<'static> {
        match parse(sql).unwrap() {
            Statement::Query(query) => query,
            other => panic!("Expected query, got {other:?}"),
        }
    }

    fn first_column(sql: &str) -> Expr<'static> {
        let query = parse_query(sql);
        let select = query.as_select().expect("Expected SELECT block");
        select.columns[0].expr
    }

    #[test]
    fn test_simple_select() {
        let stmt = parse("SELECT id, name FROM users").unwrap();
        assert!(matches!(stmt, Statement::Query(_)));
    }

    #[test]
    fn test_select_with_where() {
        let query = parse_query("SELECT * FROM users WHERE id = 1");
        assert!(query.as_select().unwrap().where_clause.is_some());
    }

    #[test]
    fn test_select_with_join() {
        let query =
            parse_query("SELECT u.id, o.amount FROM users u JOIN orders o ON u.id = o.user_id");
        let select = query.as_select().unwrap();
        assert!(matches!(select.from[0], TableRef::Join { .. }));
    }

    #[test]
    fn test_expression_precedence() {
        // 1 + 2 * 3 should be parsed as 1 + (2 * 3)
        let Expr::Binary { op, right, .. } = first_column("SELECT 1 + 2 * 3") else {
            panic!("Expected binary expression");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(
            right,
            Expr::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_chained_comparison_is_rejected() {
        let err = parse("SELECT a < b < c").unwrap_err();
        assert_eq!(err.code, DiagnosticCode::Syntax);
        assert!(err.message.contains("non-associative"));
        assert_eq!(err.span, Span::new(13, 14));
    }

    #[test]
    fn test_not_between_uses_peek() {
        let expr = first_column("SELECT x NOT BETWEEN 1 AND 10");
        assert!(matches!(expr, Expr::Between { negated: true, .. }));
    }

    #[test]
    fn test_insert_values() {
        let stmt =
            parse("INSERT INTO users (name, email) VALUES ('Alice', 'alice@example.com')").unwrap();
        let Statement::Insert(insert) = stmt else {
            panic!("Expected INSERT statement");
        };
        assert_eq!(insert.table, "users");
        assert_eq!(insert.columns.len(), 2);
        assert!(matches!(insert.values, InsertSource::Values(_)));
    }

    #[test]
    fn test_update() {
        let stmt = parse("UPDATE users SET name = 'Bob' WHERE id = 1").unwrap();
        let Statement::Update(update) = stmt else {
            panic!("Expected UPDATE statement");
        };
        assert_eq!(update.table, "users");
        assert_eq!(update.assignments.len(), 1);
        assert!(update.where_clause.is_some());
    }

    #[test]
    fn test_delete() {
        let stmt = parse("DELETE FROM users WHERE id = 1").unwrap();
        let Statement::Delete(delete) = stmt else {
            panic!("Expected DELETE statement");
        };
        assert_eq!(delete.table, "users");
        assert!(delete.where_clause.is_some());
    }

    #[test]
    fn test_parameter_placeholders() {
        let query = parse_query("SELECT * FROM users WHERE id = ? AND name = :name");
        let Some(Expr::Binary { left, right, .. }) = &query.as_select().unwrap().where_clause
        else {
            panic!("Expected Binary expression in WHERE clause");
        };
        // First condition: id = ?
        let Expr::Binary { right: param1, .. } = left else {
            panic!("Expected comparison");
        };
        assert!(matches!(
            param1,
            Expr::Parameter {
                name: None,
                position: 1,
                style: ParameterStyle::Question,
                ..
            }
        ));
        // Second condition: name = :name
        let Expr::Binary { right: param2, .. } = right else {
            panic!("Expected comparison");
        };
        assert!(matches!(
            param2,
            Expr::Parameter { name: Some("name"), .. }
        ));
    }

    #[test]
    fn test_case_expression() {
        let expr =
            first_column("SELECT CASE WHEN status = 1 THEN 'active' ELSE 'inactive' END FROM users");
        assert!(matches!(expr, Expr::Case { .. }));
    }

    #[test]
    fn test_aggregate_functions() {
        let query = parse_query("SELECT COUNT(*), SUM(amount), AVG(price) FROM orders");
        let select = query.as_select().unwrap();
        assert_eq!(select.columns.len(), 3);
        assert!(matches!(&select.columns[0].expr, Expr::Function(f) if f.name == "COUNT"));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse("SELECT 1 2").unwrap_err();
        assert_eq!(err.message, "expected end of input, found integer 2");
        assert!(parse("SELECT 1;").is_ok());
    }

    #[test]
    fn test_empty_input() {
        let err = parse("").unwrap_err();
        assert_eq!(err.span, Span::new(0, 0));
        assert!(err.message.ends_with("found end of input"));
    }

    #[test]
    fn test_depth_limit() {
        let options = ParseOptions::new().max_depth(8);
        let sql = format!("SELECT {}1{}", "(".repeat(20), ")".repeat(20));
        let err = parse_with(&sql, &options).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::Resource);
        assert_eq!(err.message, "nesting depth exceeds the limit of 8");
    }

    #[test]
    fn test_node_budget() {
        let options = ParseOptions::new().max_nodes(5);
        let err = parse_with("SELECT 1, 2, 3, 4, 5, 6", &options).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::Resource);
        assert_eq!(err.message, "AST node budget of 5 exhausted");
    }

    #[test]
    fn test_grouped_union_operands_number_parameters_in_order() {
        let query = parse_query("SELECT ((SELECT ? ) UNION (SELECT ?))");
        let Expr::Subquery { query: inner, .. } = &query.as_select().unwrap().columns[0].expr
        else {
            panic!("Expected subquery");
        };
        let SetExpr::SetOperation { right, .. } = &inner.body else {
            panic!("Expected UNION");
        };
        let SetExpr::Query(right) = right else {
            panic!("Expected parenthesized operand");
        };
        let select = right.as_select().unwrap();
        assert!(matches!(
            select.columns[0].expr,
            Expr::Parameter { position: 2, .. }
        ));
    }

    #[test]
    fn test_group_follower_picks_the_reading() {
        let expr = first_column("SELECT ((SELECT 1) + 1)");
        let Expr::Paren { expr: inner, .. } = expr else {
            panic!("Expected parenthesized expression, got {expr:?}");
        };
        assert!(matches!(inner, Expr::Binary { .. }));

        let expr = first_column("SELECT ((SELECT 1) ORDER BY 1 LIMIT 1)");
        assert!(matches!(expr, Expr::Subquery { .. }));

        let expr = first_column("SELECT ((SELECT 1))");
        let Expr::Paren { expr: inner, .. } = expr else {
            panic!("Expected parenthesized expression, got {expr:?}");
        };
        assert!(matches!(inner, Expr::Subquery { .. }));
    }

    #[test]
    fn test_group_follower_in_lists_and_tables() {
        let expr = first_column("SELECT x IN ((SELECT 1), 2)");
        assert!(matches!(expr, Expr::In { list, .. } if list.len() == 2));

        let expr = first_column("SELECT x IN ((SELECT 1) UNION (SELECT 2))");
        assert!(matches!(expr, Expr::InSubquery { .. }));

        let query = parse_query("SELECT * FROM ((SELECT 1) AS a CROSS JOIN b)");
        let select = query.as_select().unwrap();
        assert!(matches!(select.from[0], TableRef::Nested { .. }));

        let query = parse_query("SELECT * FROM ((SELECT 1) EXCEPT (SELECT 2)) AS d");
        let select = query.as_select().unwrap();
        assert!(matches!(
            select.from[0],
            TableRef::Subquery { alias: Some("d"), .. }
        ));
    }

    #[test]
    fn test_deeply_grouped_subqueries_parse_in_linear_time() {
        // Each level has two readings and none of the groups is closed.
        let options = ParseOptions::new().max_depth(512);
        let sql = format!("SELECT {}1 +", "((SELECT ".repeat(40));
        let start = std::time::Instant::now();
        let result = parse_with(&sql, &options);
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
        let err = result.unwrap_err();
        assert_eq!(err.code, DiagnosticCode::Syntax);
        assert!(err.message.ends_with("found end of input"));
    }

    #[test]
    fn test_left_deep_chain_height_limit() {
        let options = ParseOptions::new().max_height(40);
        let sql = format!("SELECT 1{}", " + 1".repeat(50));
        let err = parse_with(&sql, &options).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::Resource);
        assert_eq!(err.message, "syntax tree height exceeds the limit of 40");

        let sql = format!("SELECT 1{}", " + 1".repeat(30));
        assert!(parse_with(&sql, &options).is_ok());
    }

    #[test]
    fn test_height_counts_the_taller_branch() {
        let options = ParseOptions::new().max_height(40);
        // The inner chain fits on its own; the outer links stack on top.
        let sql = format!("SELECT 1 + (1{}){}", " * 1".repeat(30), " + 1".repeat(10));
        let err = parse_with(&sql, &options).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::Resource);

        // Two chains side by side are as tall as the longer one.
        let sql = format!("SELECT 1{0}, 1{0}", " + 1".repeat(30));
        assert!(parse_with(&sql, &options).is_ok());
    }
}
