//! Read-only traversal of the AST.
//!
//! [`Node`] is a borrowed view over any node category. [`children`] lists a
//! node's direct children in source order, and [`walk`] does a depth-first,
//! pre-order traversal driven by a [`Visitor`].

use super::{
    ColumnConstraint, ColumnConstraintKind, ColumnDef, ConflictAction, Cte, Expr, FrameBound,
    InsertSource, JoinClause, OrderBy, Query, SelectColumn, SelectStatement, SetExpr, Statement,
    TableConstraint, TableConstraintKind, TableRef, UpdateAssignment, ValuesRow, WindowSpec,
};
use crate::lexer::Span;

/// A borrowed reference to any AST node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Statement(&'a Statement<'a>),
    Query(&'a Query<'a>),
    SetExpr(&'a SetExpr<'a>),
    Select(&'a SelectStatement<'a>),
    SelectColumn(&'a SelectColumn<'a>),
    ValuesRow(&'a ValuesRow<'a>),
    TableRef(&'a TableRef<'a>),
    Join(&'a JoinClause<'a>),
    Expr(&'a Expr<'a>),
    OrderBy(&'a OrderBy<'a>),
    Assignment(&'a UpdateAssignment<'a>),
    ColumnDef(&'a ColumnDef<'a>),
    ColumnConstraint(&'a ColumnConstraint<'a>),
    TableConstraint(&'a TableConstraint<'a>),
    Cte(&'a Cte<'a>),
    WindowSpec(&'a WindowSpec<'a>),
}

/// The category of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Statement,
    Query,
    SetExpr,
    Select,
    SelectColumn,
    ValuesRow,
    TableRef,
    Join,
    Expr,
    OrderBy,
    Assignment,
    ColumnDef,
    ColumnConstraint,
    TableConstraint,
    Cte,
    WindowSpec,
}

impl NodeKind {
    /// Returns a stable lowercase name for the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Statement => "statement",
            Self::Query => "query",
            Self::SetExpr => "set_expr",
            Self::Select => "select",
            Self::SelectColumn => "select_column",
            Self::ValuesRow => "values_row",
            Self::TableRef => "table_ref",
            Self::Join => "join",
            Self::Expr => "expr",
            Self::OrderBy => "order_by",
            Self::Assignment => "assignment",
            Self::ColumnDef => "column_def",
            Self::ColumnConstraint => "column_constraint",
            Self::TableConstraint => "table_constraint",
            Self::Cte => "cte",
            Self::WindowSpec => "window_spec",
        }
    }
}

impl<'a> Node<'a> {
    /// Returns the category of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Statement(_) => NodeKind::Statement,
            Self::Query(_) => NodeKind::Query,
            Self::SetExpr(_) => NodeKind::SetExpr,
            Self::Select(_) => NodeKind::Select,
            Self::SelectColumn(_) => NodeKind::SelectColumn,
            Self::ValuesRow(_) => NodeKind::ValuesRow,
            Self::TableRef(_) => NodeKind::TableRef,
            Self::Join(_) => NodeKind::Join,
            Self::Expr(_) => NodeKind::Expr,
            Self::OrderBy(_) => NodeKind::OrderBy,
            Self::Assignment(_) => NodeKind::Assignment,
            Self::ColumnDef(_) => NodeKind::ColumnDef,
            Self::ColumnConstraint(_) => NodeKind::ColumnConstraint,
            Self::TableConstraint(_) => NodeKind::TableConstraint,
            Self::Cte(_) => NodeKind::Cte,
            Self::WindowSpec(_) => NodeKind::WindowSpec,
        }
    }

    /// Returns the source span of this node.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Statement(n) => n.span(),
            Self::Query(n) => n.span,
            Self::SetExpr(n) => n.span(),
            Self::Select(n) => n.span,
            Self::SelectColumn(n) => n.span,
            Self::ValuesRow(n) => n.span,
            Self::TableRef(n) => n.span(),
            Self::Join(n) => n.span,
            Self::Expr(n) => n.span(),
            Self::OrderBy(n) => n.span,
            Self::Assignment(n) => n.span,
            Self::ColumnDef(n) => n.span,
            Self::ColumnConstraint(n) => n.span,
            Self::TableConstraint(n) => n.span,
            Self::Cte(n) => n.span,
            Self::WindowSpec(n) => n.span,
        }
    }

    /// Returns the direct children of this node in source order.
    #[must_use]
    pub fn children(&self) -> Vec<Node<'a>> {
        children(*self)
    }
}

/// What [`walk`] should do after [`Visitor::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    /// Visit the children, then continue.
    Continue,
    /// Skip this node's children, but continue with its siblings.
    SkipChildren,
    /// Stop the whole traversal.
    Stop,
}

/// A read-only AST visitor.
pub trait Visitor<'a> {
    /// Called before the children of `node` are visited.
    fn enter(&mut self, node: Node<'a>) -> VisitControl;

    /// Called after the children of `node` are visited.
    fn leave(&mut self, _node: Node<'a>) {}
}

/// Walks `node` and its descendants depth-first, pre-order.
///
/// Returns [`VisitControl::Stop`] if the visitor stopped the traversal.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(node: Node<'a>, visitor: &mut V) -> VisitControl {
    match visitor.enter(node) {
        VisitControl::Stop => return VisitControl::Stop,
        VisitControl::SkipChildren => {}
        VisitControl::Continue => {
            for child in children(node) {
                if walk(child, visitor) == VisitControl::Stop {
                    return VisitControl::Stop;
                }
            }
        }
    }
    visitor.leave(node);
    VisitControl::Continue
}

/// Walks a statement; see [`walk`].
pub fn walk_statement<'a, V: Visitor<'a> + ?Sized>(
    statement: &'a Statement<'a>,
    visitor: &mut V,
) -> VisitControl {
    walk(Node::Statement(statement), visitor)
}

/// Returns every node of `statement`, the statement first, in pre-order.
#[must_use]
pub fn collect_nodes<'a>(statement: &'a Statement<'a>) -> Vec<Node<'a>> {
    struct Collector<'a>(Vec<Node<'a>>);

    impl<'a> Visitor<'a> for Collector<'a> {
        fn enter(&mut self, node: Node<'a>) -> VisitControl {
            self.0.push(node);
            VisitControl::Continue
        }
    }

    let mut collector = Collector(Vec::new());
    walk_statement(statement, &mut collector);
    collector.0
}

/// Returns the direct children of `node` in source order.
#[must_use]
pub fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    match node {
        Node::Statement(stmt) => statement_children(stmt, &mut out),
        Node::Query(query) => {
            if let Some(with) = &query.with {
                out.extend(with.ctes.iter().map(Node::Cte));
            }
            out.push(Node::SetExpr(&query.body));
            out.extend(query.order_by.iter().map(Node::OrderBy));
            out.extend(query.limit.iter().map(Node::Expr));
            out.extend(query.offset.iter().map(Node::Expr));
        }
        Node::SetExpr(body) => match body {
            SetExpr::Select(select) => out.push(Node::Select(select)),
            SetExpr::Values(values) => out.extend(values.rows.iter().map(Node::ValuesRow)),
            SetExpr::SetOperation { left, right, .. } => {
                out.push(Node::SetExpr(left));
                out.push(Node::SetExpr(right));
            }
            SetExpr::Query(query) => out.push(Node::Query(query)),
        },
        Node::Select(select) => {
            out.extend(select.columns.iter().map(Node::SelectColumn));
            out.extend(select.from.iter().map(Node::TableRef));
            out.extend(select.where_clause.iter().map(Node::Expr));
            out.extend(select.group_by.iter().map(Node::Expr));
            out.extend(select.having.iter().map(Node::Expr));
        }
        Node::SelectColumn(column) => out.push(Node::Expr(&column.expr)),
        Node::ValuesRow(row) => out.extend(row.values.iter().map(Node::Expr)),
        Node::TableRef(table) => match table {
            TableRef::Table { .. } => {}
            TableRef::Subquery { query, .. } => out.push(Node::Query(query)),
            TableRef::Join { left, join, .. } => {
                out.push(Node::TableRef(left));
                out.push(Node::Join(join));
            }
            TableRef::Nested { inner, .. } => out.push(Node::TableRef(inner)),
        },
        Node::Join(join) => {
            out.push(Node::TableRef(&join.table));
            out.extend(join.on.iter().map(Node::Expr));
        }
        Node::Expr(expr) => expr_children(expr, &mut out),
        Node::OrderBy(order) => out.push(Node::Expr(&order.expr)),
        Node::Assignment(assignment) => out.push(Node::Expr(&assignment.value)),
        Node::ColumnDef(column) => {
            out.extend(column.constraints.iter().map(Node::ColumnConstraint));
        }
        Node::ColumnConstraint(constraint) => match &constraint.kind {
            ColumnConstraintKind::Default(expr) | ColumnConstraintKind::Check(expr) => {
                out.push(Node::Expr(expr));
            }
            _ => {}
        },
        Node::TableConstraint(constraint) => {
            if let TableConstraintKind::Check(expr) = &constraint.kind {
                out.push(Node::Expr(expr));
            }
        }
        Node::Cte(cte) => out.push(Node::Query(&cte.query)),
        Node::WindowSpec(spec) => {
            out.extend(spec.partition_by.iter().map(Node::Expr));
            out.extend(spec.order_by.iter().map(Node::OrderBy));
            if let Some(frame) = &spec.frame {
                for bound in core::iter::once(&frame.start).chain(frame.end.as_ref()) {
                    if let FrameBound::Preceding(expr) | FrameBound::Following(expr) = bound {
                        out.push(Node::Expr(expr));
                    }
                }
            }
        }
    }
    out
}

fn statement_children<'a>(stmt: &'a Statement<'a>, out: &mut Vec<Node<'a>>) {
    match stmt {
        Statement::Query(query) => out.push(Node::Query(query)),
        Statement::Insert(insert) => {
            match &insert.values {
                InsertSource::Values(values) => {
                    out.extend(values.rows.iter().map(Node::ValuesRow));
                }
                InsertSource::Query(query) => out.push(Node::Query(query)),
                InsertSource::DefaultValues => {}
            }
            if let Some(on_conflict) = &insert.on_conflict {
                if let ConflictAction::DoUpdate {
                    assignments,
                    where_clause,
                } = &on_conflict.action
                {
                    out.extend(assignments.iter().map(Node::Assignment));
                    out.extend(where_clause.iter().map(Node::Expr));
                }
            }
            out.extend(insert.returning.iter().map(Node::SelectColumn));
        }
        Statement::Update(update) => {
            out.extend(update.assignments.iter().map(Node::Assignment));
            out.extend(update.from.iter().map(Node::TableRef));
            out.extend(update.where_clause.iter().map(Node::Expr));
            out.extend(update.returning.iter().map(Node::SelectColumn));
        }
        Statement::Delete(delete) => {
            out.extend(delete.where_clause.iter().map(Node::Expr));
            out.extend(delete.returning.iter().map(Node::SelectColumn));
        }
        Statement::CreateTable(create) => {
            out.extend(create.columns.iter().map(Node::ColumnDef));
            out.extend(create.constraints.iter().map(Node::TableConstraint));
            out.extend(create.as_query.iter().map(|q| Node::Query(q)));
        }
        Statement::CreateIndex(create) => {
            out.extend(create.columns.iter().map(Node::OrderBy));
            out.extend(create.where_clause.iter().map(Node::Expr));
        }
        Statement::CreateView(create) => out.push(Node::Query(create.query)),
        Statement::Drop(_)
        | Statement::Begin { .. }
        | Statement::Commit { .. }
        | Statement::Rollback { .. } => {}
    }
}

fn expr_children<'a>(expr: &'a Expr<'a>, out: &mut Vec<Node<'a>>) {
    match expr {
        Expr::Literal { .. }
        | Expr::Column { .. }
        | Expr::Wildcard { .. }
        | Expr::Parameter { .. } => {}
        Expr::Binary { left, right, .. } | Expr::IsDistinctFrom { left, right, .. } => {
            out.push(Node::Expr(left));
            out.push(Node::Expr(right));
        }
        Expr::Unary { operand, .. } => out.push(Node::Expr(operand)),
        Expr::Function(call) => {
            out.extend(call.args.iter().map(Node::Expr));
            out.extend(call.over.iter().map(Node::WindowSpec));
        }
        Expr::Subquery { query, .. } | Expr::Exists { query, .. } => {
            out.push(Node::Query(query));
        }
        Expr::IsNull { expr, .. }
        | Expr::IsBool { expr, .. }
        | Expr::Cast { expr, .. }
        | Expr::Paren { expr, .. } => out.push(Node::Expr(expr)),
        Expr::In { expr, list, .. } => {
            out.push(Node::Expr(expr));
            out.extend(list.iter().map(Node::Expr));
        }
        Expr::InSubquery { expr, query, .. } => {
            out.push(Node::Expr(expr));
            out.push(Node::Query(query));
        }
        Expr::Between {
            expr, low, high, ..
        } => {
            out.push(Node::Expr(expr));
            out.push(Node::Expr(low));
            out.push(Node::Expr(high));
        }
        Expr::Like { expr, pattern, .. } => {
            out.push(Node::Expr(expr));
            out.push(Node::Expr(pattern));
        }
        Expr::Case {
            operand,
            when_clauses,
            else_clause,
            ..
        } => {
            out.extend(operand.iter().map(|e| Node::Expr(e)));
            for (when, then) in when_clauses.iter() {
                out.push(Node::Expr(when));
                out.push(Node::Expr(then));
            }
            out.extend(else_clause.iter().map(|e| Node::Expr(e)));
        }
        Expr::Tuple { items, .. } => out.extend(items.iter().map(Node::Expr)),
    }
}
