//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! Every node carries the [`Span`](crate::lexer::Span) of the source text it
//! was parsed from. Nodes are allocated in a [`bumpalo::Bump`] supplied by the
//! caller: children are `&'a T`, lists are `&'a [T]` and names are `&'a str`,
//! all borrowed from that arena. Every node type is `Copy`. Traversal lives
//! in [`visit`].

mod ddl;
mod expression;
mod statement;
mod types;
pub mod visit;

pub use ddl::{
    ColumnConstraint, ColumnConstraintKind, ColumnDef, CreateIndexStatement,
    CreateTableStatement, CreateViewStatement, DropBehavior, DropStatement, ForeignKeyRef,
    ObjectName, ObjectType, ReferentialAction, TableConstraint, TableConstraintKind,
};
pub use expression::{
    BinaryOp, Expr, FrameBound, FrameUnits, FunctionCall, Literal, ParameterStyle, UnaryOp,
    WindowFrame, WindowSpec,
};
pub use statement::{
    ConflictAction, Cte, DeleteStatement, InsertSource, InsertStatement, JoinClause, JoinType,
    NullOrdering, OnConflict, OrderBy, OrderDirection, Query, SelectColumn, SelectStatement,
    SetExpr, SetOperator, Statement, TableRef, UpdateAssignment, UpdateStatement, Values,
    ValuesRow, With,
};
pub use types::DataType;

/// Version of the tree layout produced by this crate.
///
/// Bumped whenever a node type gains, loses or reshapes a field.
pub const AST_VERSION: u32 = 1;
