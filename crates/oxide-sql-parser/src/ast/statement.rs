//! SQL statement AST types.

use super::ddl::{
    CreateIndexStatement, CreateTableStatement, CreateViewStatement, DropStatement,
};
use super::expression::Expr;
use crate::lexer::Span;

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullOrdering {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OrderBy<'a> {
    /// The expression to order by.
    pub expr: Expr<'a>,
    /// The direction (ASC or DESC).
    pub direction: OrderDirection,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
    /// Source span.
    pub span: Span,
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT OUTER JOIN.
    Left,
    /// RIGHT OUTER JOIN.
    Right,
    /// FULL OUTER JOIN.
    Full,
    /// CROSS JOIN.
    Cross,
}

impl JoinType {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct JoinClause<'a> {
    /// The type of join.
    pub join_type: JoinType,
    /// Whether NATURAL was written.
    pub natural: bool,
    /// The table to join.
    pub table: TableRef<'a>,
    /// The join condition (for non-CROSS joins).
    pub on: Option<Expr<'a>>,
    /// USING columns (alternative to ON).
    pub using: &'a [&'a str],
    /// Source span, from the join keyword to the end of the condition.
    pub span: Span,
}

/// A table reference in FROM clause.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TableRef<'a> {
    /// A simple table name.
    Table {
        /// Schema name (optional).
        schema: Option<&'a str>,
        /// Table name.
        name: &'a str,
        /// Alias.
        alias: Option<&'a str>,
        /// Source span.
        span: Span,
    },
    /// A subquery.
    Subquery {
        /// The subquery.
        query: &'a Query<'a>,
        /// Alias.
        alias: Option<&'a str>,
        /// Source span.
        span: Span,
    },
    /// A joined table.
    Join {
        /// Left side of the join.
        left: &'a TableRef<'a>,
        /// The join clause.
        join: &'a JoinClause<'a>,
        /// Source span.
        span: Span,
    },
    /// A parenthesized join tree.
    Nested {
        /// The inner table reference.
        inner: &'a TableRef<'a>,
        /// Source span, including the parentheses.
        span: Span,
    },
}

impl TableRef<'_> {
    /// Returns the source span of the table reference.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Table { span, .. }
            | Self::Subquery { span, .. }
            | Self::Join { span, .. }
            | Self::Nested { span, .. } => *span,
        }
    }
}

/// A column in SELECT clause.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectColumn<'a> {
    /// The expression.
    pub expr: Expr<'a>,
    /// Column alias.
    pub alias: Option<&'a str>,
    /// Source span, including the alias.
    pub span: Span,
}

/// A SELECT block: everything from SELECT through HAVING.
///
/// ORDER BY, LIMIT and OFFSET belong to the enclosing [`Query`], since they
/// apply to the result of any set operation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectStatement<'a> {
    /// Whether to select DISTINCT values.
    pub distinct: bool,
    /// The columns to select.
    pub columns: &'a [SelectColumn<'a>],
    /// The FROM clause; comma-separated entries in order.
    pub from: &'a [TableRef<'a>],
    /// The WHERE clause.
    pub where_clause: Option<Expr<'a>>,
    /// GROUP BY expressions.
    pub group_by: &'a [Expr<'a>],
    /// HAVING clause.
    pub having: Option<Expr<'a>>,
    /// Source span.
    pub span: Span,
}

/// One parenthesized row of a `VALUES` list.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValuesRow<'a> {
    /// The row's expressions.
    pub values: &'a [Expr<'a>],
    /// Source span, including the parentheses.
    pub span: Span,
}

/// A `VALUES (...), (...)` list.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Values<'a> {
    /// The rows.
    pub rows: &'a [ValuesRow<'a>],
    /// Source span, from VALUES to the last row.
    pub span: Span,
}

/// Set operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SetOperator {
    /// UNION
    Union,
    /// INTERSECT
    Intersect,
    /// EXCEPT
    Except,
}

impl SetOperator {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// The body of a query.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SetExpr<'a> {
    /// A SELECT block.
    Select(&'a SelectStatement<'a>),
    /// A VALUES list.
    Values(Values<'a>),
    /// `left UNION|INTERSECT|EXCEPT [ALL] right`.
    SetOperation {
        /// The operator.
        op: SetOperator,
        /// Whether ALL was written.
        all: bool,
        /// Left operand.
        left: &'a SetExpr<'a>,
        /// Right operand.
        right: &'a SetExpr<'a>,
        /// Source span.
        span: Span,
    },
    /// A parenthesized query operand.
    Query(&'a Query<'a>),
}

impl SetExpr<'_> {
    /// Returns the source span of the query body.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Select(select) => select.span,
            Self::Values(values) => values.span,
            Self::SetOperation { span, .. } => *span,
            Self::Query(query) => query.span,
        }
    }
}

/// A common table expression: `name [(columns)] AS (query)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cte<'a> {
    /// The CTE name.
    pub name: &'a str,
    /// Column names (optional).
    pub columns: &'a [&'a str],
    /// The CTE body.
    pub query: Query<'a>,
    /// Source span.
    pub span: Span,
}

/// A WITH clause.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct With<'a> {
    /// Whether RECURSIVE was written.
    pub recursive: bool,
    /// The common table expressions, in order.
    pub ctes: &'a [Cte<'a>],
    /// Source span.
    pub span: Span,
}

/// A complete query: `[WITH ...] body [ORDER BY ...] [LIMIT ...] [OFFSET ...]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Query<'a> {
    /// WITH clause.
    pub with: Option<With<'a>>,
    /// The query body.
    pub body: SetExpr<'a>,
    /// ORDER BY clauses.
    pub order_by: &'a [OrderBy<'a>],
    /// LIMIT clause.
    pub limit: Option<Expr<'a>>,
    /// OFFSET clause.
    pub offset: Option<Expr<'a>>,
    /// Source span.
    pub span: Span,
}

impl<'a> Query<'a> {
    /// Returns the SELECT block when the body is a plain SELECT.
    #[must_use]
    pub const fn as_select(&self) -> Option<&'a SelectStatement<'a>> {
        match self.body {
            SetExpr::Select(select) => Some(select),
            _ => None,
        }
    }
}

/// An INSERT statement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InsertStatement<'a> {
    /// Schema name.
    pub schema: Option<&'a str>,
    /// Table name.
    pub table: &'a str,
    /// Column names (optional).
    pub columns: &'a [&'a str],
    /// Values to insert.
    pub values: InsertSource<'a>,
    /// ON CONFLICT clause (for UPSERT).
    pub on_conflict: Option<OnConflict<'a>>,
    /// RETURNING list.
    pub returning: &'a [SelectColumn<'a>],
    /// Source span.
    pub span: Span,
}

/// Source of data for INSERT.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum InsertSource<'a> {
    /// VALUES (...), (...), ...
    Values(Values<'a>),
    /// A query.
    Query(&'a Query<'a>),
    /// DEFAULT VALUES
    DefaultValues,
}

/// ON CONFLICT clause for UPSERT.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OnConflict<'a> {
    /// Conflict target columns.
    pub columns: &'a [&'a str],
    /// Action to take on conflict.
    pub action: ConflictAction<'a>,
    /// Source span.
    pub span: Span,
}

/// Action to take on conflict.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ConflictAction<'a> {
    /// DO NOTHING
    DoNothing,
    /// DO UPDATE SET ... [WHERE ...]
    DoUpdate {
        /// SET assignments.
        assignments: &'a [UpdateAssignment<'a>],
        /// WHERE clause.
        where_clause: Option<Expr<'a>>,
    },
}

/// An UPDATE statement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UpdateStatement<'a> {
    /// Schema name.
    pub schema: Option<&'a str>,
    /// Table name.
    pub table: &'a str,
    /// Alias.
    pub alias: Option<&'a str>,
    /// SET assignments.
    pub assignments: &'a [UpdateAssignment<'a>],
    /// FROM clause (for joins in UPDATE).
    pub from: &'a [TableRef<'a>],
    /// WHERE clause.
    pub where_clause: Option<Expr<'a>>,
    /// RETURNING list.
    pub returning: &'a [SelectColumn<'a>],
    /// Source span.
    pub span: Span,
}

/// An assignment in UPDATE SET.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UpdateAssignment<'a> {
    /// Column name.
    pub column: &'a str,
    /// Value expression.
    pub value: Expr<'a>,
    /// Source span.
    pub span: Span,
}

/// A DELETE statement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeleteStatement<'a> {
    /// Schema name.
    pub schema: Option<&'a str>,
    /// Table name.
    pub table: &'a str,
    /// Alias.
    pub alias: Option<&'a str>,
    /// WHERE clause.
    pub where_clause: Option<Expr<'a>>,
    /// RETURNING list.
    pub returning: &'a [SelectColumn<'a>],
    /// Source span.
    pub span: Span,
}

/// A SQL statement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Statement<'a> {
    /// A query (SELECT, VALUES or a set operation).
    Query(&'a Query<'a>),
    /// INSERT statement.
    Insert(&'a InsertStatement<'a>),
    /// UPDATE statement.
    Update(&'a UpdateStatement<'a>),
    /// DELETE statement.
    Delete(&'a DeleteStatement<'a>),
    /// CREATE TABLE statement.
    CreateTable(&'a CreateTableStatement<'a>),
    /// CREATE INDEX statement.
    CreateIndex(&'a CreateIndexStatement<'a>),
    /// CREATE VIEW statement.
    CreateView(&'a CreateViewStatement<'a>),
    /// DROP statement.
    Drop(&'a DropStatement<'a>),
    /// BEGIN [TRANSACTION]
    Begin {
        /// Source span.
        span: Span,
    },
    /// COMMIT [TRANSACTION]
    Commit {
        /// Source span.
        span: Span,
    },
    /// ROLLBACK [TRANSACTION]
    Rollback {
        /// Source span.
        span: Span,
    },
}

impl Statement<'_> {
    /// Returns the source span of the statement, excluding the terminating `;`.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Query(query) => query.span,
            Self::Insert(insert) => insert.span,
            Self::Update(update) => update.span,
            Self::Delete(delete) => delete.span,
            Self::CreateTable(create) => create.span,
            Self::CreateIndex(create) => create.span,
            Self::CreateView(create) => create.span,
            Self::Drop(drop) => drop.span,
            Self::Begin { span } | Self::Commit { span } | Self::Rollback { span } => *span,
        }
    }
}
