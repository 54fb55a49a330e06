//! DDL statement AST types: CREATE TABLE/INDEX/VIEW and DROP.

use super::{DataType, Expr, OrderBy, OrderDirection, Query};
use crate::lexer::Span;

/// A possibly schema-qualified object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ObjectName<'a> {
    /// Schema name (optional).
    pub schema: Option<&'a str>,
    /// Object name.
    pub name: &'a str,
    /// Source span.
    pub span: Span,
}

impl<'a> ObjectName<'a> {
    /// Creates an unqualified name with an empty span.
    #[must_use]
    pub const fn new(name: &'a str) -> Self {
        Self {
            schema: None,
            name,
            span: Span::new(0, 0),
        }
    }
}

/// Referential action for `ON DELETE` / `ON UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ReferentialAction {
    /// CASCADE
    Cascade,
    /// RESTRICT
    Restrict,
    /// SET NULL
    SetNull,
    /// SET DEFAULT
    SetDefault,
    /// NO ACTION
    NoAction,
}

impl ReferentialAction {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::NoAction => "NO ACTION",
        }
    }
}

/// The target of a foreign key: `REFERENCES table [(columns)] [actions]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ForeignKeyRef<'a> {
    /// Referenced table.
    pub table: ObjectName<'a>,
    /// Referenced columns (optional).
    pub columns: &'a [&'a str],
    /// ON DELETE action.
    pub on_delete: Option<ReferentialAction>,
    /// ON UPDATE action.
    pub on_update: Option<ReferentialAction>,
}

/// The kind of a column constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ColumnConstraintKind<'a> {
    /// NOT NULL
    NotNull,
    /// NULL
    Null,
    /// PRIMARY KEY [ASC|DESC] [AUTOINCREMENT]
    PrimaryKey {
        /// Explicit sort order.
        order: Option<OrderDirection>,
        /// Whether AUTOINCREMENT was written.
        autoincrement: bool,
    },
    /// UNIQUE
    Unique,
    /// DEFAULT expr
    Default(Expr<'a>),
    /// CHECK (expr)
    Check(Expr<'a>),
    /// REFERENCES ...
    References(ForeignKeyRef<'a>),
}

/// A column constraint, in the order written.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColumnConstraint<'a> {
    /// `CONSTRAINT name`, if given.
    pub name: Option<&'a str>,
    /// The constraint.
    pub kind: ColumnConstraintKind<'a>,
    /// Source span, including the CONSTRAINT prefix.
    pub span: Span,
}

/// A column definition for CREATE TABLE.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColumnDef<'a> {
    /// Column name.
    pub name: &'a str,
    /// Data type.
    pub data_type: DataType<'a>,
    /// Column constraints, in source order.
    pub constraints: &'a [ColumnConstraint<'a>],
    /// Source span.
    pub span: Span,
}

impl<'a> ColumnDef<'a> {
    /// Returns true if a PRIMARY KEY constraint is present.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| matches!(c.kind, ColumnConstraintKind::PrimaryKey { .. }))
    }

    /// Returns false if the column is NOT NULL or a primary key.
    ///
    /// When both NULL and NOT NULL are written, the last one wins.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        let mut nullable = true;
        for constraint in self.constraints {
            match constraint.kind {
                ColumnConstraintKind::NotNull | ColumnConstraintKind::PrimaryKey { .. } => {
                    nullable = false;
                }
                ColumnConstraintKind::Null => nullable = true,
                _ => {}
            }
        }
        nullable
    }

    /// Returns the DEFAULT expression, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&'a Expr<'a>> {
        self.constraints.iter().find_map(|c| match &c.kind {
            ColumnConstraintKind::Default(expr) => Some(expr),
            _ => None,
        })
    }
}

/// The kind of a table constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TableConstraintKind<'a> {
    /// PRIMARY KEY (columns)
    PrimaryKey(&'a [&'a str]),
    /// UNIQUE (columns)
    Unique(&'a [&'a str]),
    /// FOREIGN KEY (columns) REFERENCES ...
    ForeignKey {
        /// Referencing columns.
        columns: &'a [&'a str],
        /// Referenced table and actions.
        references: ForeignKeyRef<'a>,
    },
    /// CHECK (expr)
    Check(Expr<'a>),
}

/// A table-level constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableConstraint<'a> {
    /// `CONSTRAINT name`, if given.
    pub name: Option<&'a str>,
    /// The constraint.
    pub kind: TableConstraintKind<'a>,
    /// Source span.
    pub span: Span,
}

/// A CREATE TABLE statement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CreateTableStatement<'a> {
    /// TEMP or TEMPORARY.
    pub temporary: bool,
    /// IF NOT EXISTS.
    pub if_not_exists: bool,
    /// Table name.
    pub name: ObjectName<'a>,
    /// Column definitions.
    pub columns: &'a [ColumnDef<'a>],
    /// Table constraints.
    pub constraints: &'a [TableConstraint<'a>],
    /// `AS query`, in place of a column list.
    pub as_query: Option<&'a Query<'a>>,
    /// Source span.
    pub span: Span,
}

/// A CREATE INDEX statement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CreateIndexStatement<'a> {
    /// UNIQUE.
    pub unique: bool,
    /// IF NOT EXISTS.
    pub if_not_exists: bool,
    /// Index name.
    pub name: &'a str,
    /// Indexed table.
    pub table: ObjectName<'a>,
    /// Indexed columns or expressions, with optional direction.
    pub columns: &'a [OrderBy<'a>],
    /// Partial index predicate.
    pub where_clause: Option<Expr<'a>>,
    /// Source span.
    pub span: Span,
}

/// A CREATE VIEW statement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CreateViewStatement<'a> {
    /// OR REPLACE.
    pub or_replace: bool,
    /// View name.
    pub name: ObjectName<'a>,
    /// Column names (optional).
    pub columns: &'a [&'a str],
    /// The view query.
    pub query: &'a Query<'a>,
    /// Source span.
    pub span: Span,
}

/// The kind of object a DROP statement removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ObjectType {
    /// TABLE
    Table,
    /// INDEX
    Index,
    /// VIEW
    View,
}

impl ObjectType {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::Index => "INDEX",
            Self::View => "VIEW",
        }
    }
}

/// CASCADE or RESTRICT on DROP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DropBehavior {
    /// CASCADE
    Cascade,
    /// RESTRICT
    Restrict,
}

impl DropBehavior {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
        }
    }
}

/// A DROP TABLE/INDEX/VIEW statement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DropStatement<'a> {
    /// What is dropped.
    pub object_type: ObjectType,
    /// IF EXISTS.
    pub if_exists: bool,
    /// The dropped objects, in order.
    pub names: &'a [ObjectName<'a>],
    /// CASCADE or RESTRICT.
    pub behavior: Option<DropBehavior>,
    /// Source span.
    pub span: Span,
}
