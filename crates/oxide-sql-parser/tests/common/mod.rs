#![allow(dead_code)]

use oxide_sql_parser::ast::{
    ColumnConstraint, ColumnConstraintKind, ConflictAction, DeleteStatement, Expr, ForeignKeyRef,
    FrameBound, FunctionCall, InsertSource, InsertStatement, Literal, ObjectName,
    ParameterStyle, Query, SelectColumn, SelectStatement, SetExpr, Statement, TableConstraint,
    TableConstraintKind, TableRef, UnaryOp, UpdateStatement, Values, WindowSpec,
};
use oxide_sql_parser::{parse_str, Bump, Diagnostic, Keyword, ParseResult, Parser};

/// A bump that lives for the rest of the test binary, so helpers can hand
/// out trees without threading an arena through every test.
pub fn bump() -> &'static Bump {
    Box::leak(Box::new(Bump::new()))
}

pub fn parse(sql: &str) -> Statement<'static> {
    Parser::new(sql, bump())
        .parse_statement()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_err(sql: &str) -> Diagnostic {
    Parser::new(sql, bump())
        .parse_statement()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

/// Parses a whole buffer and asserts that it produced no diagnostics.
pub fn parse_all(sql: &str) -> Vec<Statement<'static>> {
    let result = parse_str(sql, bump());
    assert!(
        result.diagnostics.is_empty(),
        "Unexpected diagnostics for: {sql}\n{:?}",
        result.diagnostics
    );
    result.statements
}

pub fn parse_query(sql: &str) -> &'static Query<'static> {
    match parse(sql) {
        Statement::Query(q) => q,
        other => panic!("Expected query, got {other:?}"),
    }
}

pub fn parse_select(sql: &str) -> &'static SelectStatement<'static> {
    match parse_query(sql).body {
        SetExpr::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_expr(sql: &str) -> Expr<'static> {
    parse_select(&format!("SELECT {sql}")).columns[0].expr
}

pub fn parse_insert(sql: &str) -> &'static InsertStatement<'static> {
    match parse(sql) {
        Statement::Insert(i) => i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> &'static UpdateStatement<'static> {
    match parse(sql) {
        Statement::Update(u) => u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> &'static DeleteStatement<'static> {
    match parse(sql) {
        Statement::Delete(d) => d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

/// Returns the source text a span points at.
pub fn text_of(sql: &str, span: oxide_sql_parser::Span) -> &str {
    span.slice(sql)
        .unwrap_or_else(|| panic!("Span {span:?} out of bounds for: {sql}"))
}

/// Returns the error-severity diagnostics of a result.
pub fn errors<'r>(result: &'r ParseResult<'_>) -> Vec<&'r Diagnostic> {
    result.errors().collect()
}

/// Verifies that the deparser produces a fixed point: rendering
/// parse(sql) can be re-parsed and yields the same string again.
pub fn round_trip(sql: &str) {
    let ast1 = parse(sql);
    let rendered1 = to_sql(&ast1);
    let ast2 = parse(&rendered1);
    let rendered2 = to_sql(&ast2);
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}

// ===================================================================
// Deparser
// ===================================================================

/// Renders a statement back to SQL text.
pub fn to_sql(stmt: &Statement) -> String {
    match stmt {
        Statement::Query(q) => query(q),
        Statement::Insert(i) => insert(i),
        Statement::Update(u) => {
            let mut out = format!("UPDATE {}", qualified(u.schema.as_deref(), &u.table));
            out.push_str(&alias(u.alias.as_deref()));
            out.push_str(" SET ");
            out.push_str(&assignments(&u.assignments));
            if !u.from.is_empty() {
                out.push_str(" FROM ");
                out.push_str(&join(&u.from, table_ref));
            }
            out.push_str(&where_clause(u.where_clause.as_ref()));
            out.push_str(&returning(&u.returning));
            out
        }
        Statement::Delete(d) => {
            let mut out = format!("DELETE FROM {}", qualified(d.schema.as_deref(), &d.table));
            out.push_str(&alias(d.alias.as_deref()));
            out.push_str(&where_clause(d.where_clause.as_ref()));
            out.push_str(&returning(&d.returning));
            out
        }
        Statement::CreateTable(c) => {
            let mut out = String::from("CREATE ");
            if c.temporary {
                out.push_str("TEMPORARY ");
            }
            out.push_str("TABLE ");
            if c.if_not_exists {
                out.push_str("IF NOT EXISTS ");
            }
            out.push_str(&object_name(&c.name));
            if let Some(q) = &c.as_query {
                out.push_str(" AS ");
                out.push_str(&query(q));
            } else {
                let mut elements: Vec<String> = c
                    .columns
                    .iter()
                    .map(|col| {
                        let mut s = format!("{} {}", ident(&col.name), col.data_type);
                        for constraint in col.constraints {
                            s.push(' ');
                            s.push_str(&column_constraint(constraint));
                        }
                        s
                    })
                    .collect();
                elements.extend(c.constraints.iter().map(table_constraint));
                out.push_str(&format!(" ({})", elements.join(", ")));
            }
            out
        }
        Statement::CreateIndex(c) => {
            let mut out = String::from("CREATE ");
            if c.unique {
                out.push_str("UNIQUE ");
            }
            out.push_str("INDEX ");
            if c.if_not_exists {
                out.push_str("IF NOT EXISTS ");
            }
            out.push_str(&format!(
                "{} ON {} ({})",
                ident(&c.name),
                object_name(&c.table),
                order_by(&c.columns)
            ));
            out.push_str(&where_clause(c.where_clause.as_ref()));
            out
        }
        Statement::CreateView(v) => {
            let mut out = String::from("CREATE ");
            if v.or_replace {
                out.push_str("OR REPLACE ");
            }
            out.push_str("VIEW ");
            out.push_str(&object_name(&v.name));
            out.push_str(&ident_list(&v.columns));
            out.push_str(" AS ");
            out.push_str(&query(&v.query));
            out
        }
        Statement::Drop(d) => {
            let mut out = format!("DROP {} ", d.object_type.as_str());
            if d.if_exists {
                out.push_str("IF EXISTS ");
            }
            out.push_str(&join(&d.names, object_name));
            if let Some(behavior) = d.behavior {
                out.push(' ');
                out.push_str(behavior.as_str());
            }
            out
        }
        Statement::Begin { .. } => String::from("BEGIN"),
        Statement::Commit { .. } => String::from("COMMIT"),
        Statement::Rollback { .. } => String::from("ROLLBACK"),
    }
}

fn join<T>(items: &[T], render: impl Fn(&T) -> String) -> String {
    items.iter().map(render).collect::<Vec<_>>().join(", ")
}

/// Quotes identifiers that would not lex back as the same identifier.
pub fn ident(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain && Keyword::from_str(name).is_none() {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

fn ident_list(names: &[&str]) -> String {
    if names.is_empty() {
        String::new()
    } else {
        format!(" ({})", join(names, |n| ident(n)))
    }
}

fn qualified(schema: Option<&str>, name: &str) -> String {
    match schema {
        Some(schema) => format!("{}.{}", ident(schema), ident(name)),
        None => ident(name),
    }
}

fn object_name(name: &ObjectName) -> String {
    qualified(name.schema.as_deref(), &name.name)
}

fn alias(alias: Option<&str>) -> String {
    alias.map_or_else(String::new, |a| format!(" AS {}", ident(a)))
}

fn where_clause(expr: Option<&Expr>) -> String {
    expr.map_or_else(String::new, |e| format!(" WHERE {}", expr_sql(e)))
}

fn returning(columns: &[SelectColumn]) -> String {
    if columns.is_empty() {
        String::new()
    } else {
        format!(" RETURNING {}", join(columns, select_column))
    }
}

fn assignments(items: &[oxide_sql_parser::ast::UpdateAssignment]) -> String {
    join(items, |a| format!("{} = {}", ident(&a.column), expr_sql(&a.value)))
}

fn query(q: &Query) -> String {
    let mut out = String::new();
    if let Some(with) = &q.with {
        out.push_str("WITH ");
        if with.recursive {
            out.push_str("RECURSIVE ");
        }
        out.push_str(&join(&with.ctes, |cte| {
            format!(
                "{}{} AS ({})",
                ident(&cte.name),
                ident_list(&cte.columns),
                query(&cte.query)
            )
        }));
        out.push(' ');
    }
    out.push_str(&set_expr(&q.body));
    if !q.order_by.is_empty() {
        out.push_str(" ORDER BY ");
        out.push_str(&order_by(&q.order_by));
    }
    if let Some(limit) = &q.limit {
        out.push_str(&format!(" LIMIT {}", expr_sql(limit)));
    }
    if let Some(offset) = &q.offset {
        out.push_str(&format!(" OFFSET {}", expr_sql(offset)));
    }
    out
}

fn set_expr(body: &SetExpr) -> String {
    match body {
        SetExpr::Select(s) => select(s),
        SetExpr::Values(v) => values(v),
        SetExpr::SetOperation {
            op,
            all,
            left,
            right,
            ..
        } => format!(
            "{} {}{} {}",
            set_expr(left),
            op.as_str(),
            if *all { " ALL" } else { "" },
            set_expr(right)
        ),
        SetExpr::Query(q) => format!("({})", query(q)),
    }
}

fn select(s: &SelectStatement) -> String {
    let mut out = String::from("SELECT ");
    if s.distinct {
        out.push_str("DISTINCT ");
    }
    out.push_str(&join(&s.columns, select_column));
    if !s.from.is_empty() {
        out.push_str(" FROM ");
        out.push_str(&join(&s.from, table_ref));
    }
    out.push_str(&where_clause(s.where_clause.as_ref()));
    if !s.group_by.is_empty() {
        out.push_str(" GROUP BY ");
        out.push_str(&join(&s.group_by, expr_sql));
    }
    if let Some(having) = &s.having {
        out.push_str(&format!(" HAVING {}", expr_sql(having)));
    }
    out
}

fn values(v: &Values) -> String {
    format!(
        "VALUES {}",
        join(v.rows, |row| format!("({})", join(row.values, expr_sql)))
    )
}

fn select_column(c: &SelectColumn) -> String {
    format!("{}{}", expr_sql(&c.expr), alias(c.alias.as_deref()))
}

fn table_ref(t: &TableRef) -> String {
    match t {
        TableRef::Table {
            schema,
            name,
            alias: a,
            ..
        } => format!("{}{}", qualified(schema.as_deref(), name), alias(a.as_deref())),
        TableRef::Subquery { query: q, alias: a, .. } => {
            format!("({}){}", query(q), alias(a.as_deref()))
        }
        TableRef::Join { left, join, .. } => {
            let mut out = format!("{} ", table_ref(left));
            if join.natural {
                out.push_str("NATURAL ");
            }
            out.push_str(join.join_type.as_str());
            out.push(' ');
            out.push_str(&table_ref(&join.table));
            if let Some(on) = &join.on {
                out.push_str(&format!(" ON {}", expr_sql(on)));
            }
            if !join.using.is_empty() {
                out.push_str(&format!(" USING{}", ident_list(&join.using)));
            }
            out
        }
        TableRef::Nested { inner, .. } => format!("({})", table_ref(inner)),
    }
}

fn order_by(items: &[oxide_sql_parser::ast::OrderBy]) -> String {
    join(items, |o| {
        let mut s = format!("{} {}", expr_sql(&o.expr), o.direction.as_str());
        if let Some(nulls) = o.nulls {
            s.push(' ');
            s.push_str(nulls.as_str());
        }
        s
    })
}

fn insert(i: &InsertStatement) -> String {
    let mut out = format!("INSERT INTO {}", qualified(i.schema.as_deref(), &i.table));
    out.push_str(&ident_list(&i.columns));
    match &i.values {
        InsertSource::Values(v) => {
            out.push(' ');
            out.push_str(&values(v));
        }
        InsertSource::Query(q) => {
            out.push(' ');
            out.push_str(&query(q));
        }
        InsertSource::DefaultValues => out.push_str(" DEFAULT VALUES"),
    }
    if let Some(conflict) = &i.on_conflict {
        out.push_str(" ON CONFLICT");
        out.push_str(&ident_list(&conflict.columns));
        match &conflict.action {
            ConflictAction::DoNothing => out.push_str(" DO NOTHING"),
            ConflictAction::DoUpdate {
                assignments: a,
                where_clause: w,
            } => {
                out.push_str(" DO UPDATE SET ");
                out.push_str(&assignments(a));
                out.push_str(&where_clause(w.as_ref()));
            }
        }
    }
    out.push_str(&returning(&i.returning));
    out
}

fn column_constraint(c: &ColumnConstraint) -> String {
    let mut out = c
        .name
        .as_ref()
        .map_or_else(String::new, |n| format!("CONSTRAINT {} ", ident(n)));
    let kind = match &c.kind {
        ColumnConstraintKind::NotNull => String::from("NOT NULL"),
        ColumnConstraintKind::Null => String::from("NULL"),
        ColumnConstraintKind::PrimaryKey {
            order,
            autoincrement,
        } => {
            let mut s = String::from("PRIMARY KEY");
            if let Some(order) = order {
                s.push(' ');
                s.push_str(order.as_str());
            }
            if *autoincrement {
                s.push_str(" AUTOINCREMENT");
            }
            s
        }
        ColumnConstraintKind::Unique => String::from("UNIQUE"),
        ColumnConstraintKind::Default(e) => format!("DEFAULT {}", expr_sql(e)),
        ColumnConstraintKind::Check(e) => format!("CHECK ({})", expr_sql(e)),
        ColumnConstraintKind::References(r) => format!("REFERENCES {}", references(r)),
    };
    out.push_str(&kind);
    out
}

fn table_constraint(c: &TableConstraint) -> String {
    let mut out = c
        .name
        .as_ref()
        .map_or_else(String::new, |n| format!("CONSTRAINT {} ", ident(n)));
    let kind = match &c.kind {
        TableConstraintKind::PrimaryKey(cols) => format!("PRIMARY KEY{}", ident_list(cols)),
        TableConstraintKind::Unique(cols) => format!("UNIQUE{}", ident_list(cols)),
        TableConstraintKind::ForeignKey {
            columns,
            references: r,
        } => format!(
            "FOREIGN KEY{} REFERENCES {}",
            ident_list(columns),
            references(r)
        ),
        TableConstraintKind::Check(e) => format!("CHECK ({})", expr_sql(e)),
    };
    out.push_str(&kind);
    out
}

fn references(r: &ForeignKeyRef) -> String {
    let mut out = object_name(&r.table);
    out.push_str(&ident_list(&r.columns));
    if let Some(action) = r.on_delete {
        out.push_str(&format!(" ON DELETE {}", action.as_str()));
    }
    if let Some(action) = r.on_update {
        out.push_str(&format!(" ON UPDATE {}", action.as_str()));
    }
    out
}

fn literal(value: &Literal) -> String {
    match value {
        Literal::Integer(n) => n.to_string(),
        Literal::Float(f) => f.to_string(),
        Literal::Numeric(digits) => (*digits).to_string(),
        Literal::String(s) => format!("'{}'", s.replace('\'', "''")),
        Literal::Blob(bytes) => {
            let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
            format!("X'{hex}'")
        }
        Literal::Boolean(true) => String::from("TRUE"),
        Literal::Boolean(false) => String::from("FALSE"),
        Literal::Null => String::from("NULL"),
        Literal::Typed { data_type, value } => {
            format!("{data_type} '{}'", value.replace('\'', "''"))
        }
    }
}

fn not(negated: bool) -> &'static str {
    if negated {
        "NOT "
    } else {
        ""
    }
}

/// Renders an expression back to SQL text.
pub fn expr_sql(expr: &Expr) -> String {
    match expr {
        Expr::Literal { value, .. } => literal(value),
        Expr::Column { table, name, .. } => qualified(table.as_deref(), name),
        Expr::Wildcard { table: None, .. } => String::from("*"),
        Expr::Wildcard { table: Some(t), .. } => format!("{}.*", ident(t)),
        Expr::Parameter {
            name,
            position,
            style,
            ..
        } => match style {
            ParameterStyle::Question => String::from("?"),
            ParameterStyle::Dollar => format!("${position}"),
            ParameterStyle::Colon => format!(":{}", ident(name.as_deref().unwrap_or_default())),
            ParameterStyle::At => format!("@{}", ident(name.as_deref().unwrap_or_default())),
        },
        Expr::Binary {
            left, op, right, ..
        } => format!("{} {} {}", expr_sql(left), op.as_str(), expr_sql(right)),
        Expr::Unary { op, operand, .. } => {
            let inner = expr_sql(operand);
            match op {
                UnaryOp::Not => format!("NOT {inner}"),
                // Keep `- -1` from turning into a comment
                _ if inner.starts_with(['-', '+', '~']) => format!("{} {inner}", op.as_str()),
                _ => format!("{}{inner}", op.as_str()),
            }
        }
        Expr::Function(f) => function(f),
        Expr::Subquery { query: q, .. } => format!("({})", query(q)),
        Expr::Exists { query: q, .. } => format!("EXISTS ({})", query(q)),
        Expr::IsNull { expr, negated, .. } => {
            format!("{} IS {}NULL", expr_sql(expr), not(*negated))
        }
        Expr::IsBool {
            expr,
            value,
            negated,
            ..
        } => format!(
            "{} IS {}{}",
            expr_sql(expr),
            not(*negated),
            if *value { "TRUE" } else { "FALSE" }
        ),
        Expr::IsDistinctFrom {
            left,
            right,
            negated,
            ..
        } => format!(
            "{} IS {}DISTINCT FROM {}",
            expr_sql(left),
            not(*negated),
            expr_sql(right)
        ),
        Expr::In {
            expr,
            list,
            negated,
            ..
        } => format!(
            "{} {}IN ({})",
            expr_sql(expr),
            not(*negated),
            join(list, expr_sql)
        ),
        Expr::InSubquery {
            expr,
            query: q,
            negated,
            ..
        } => format!("{} {}IN ({})", expr_sql(expr), not(*negated), query(q)),
        Expr::Between {
            expr,
            low,
            high,
            negated,
            ..
        } => format!(
            "{} {}BETWEEN {} AND {}",
            expr_sql(expr),
            not(*negated),
            expr_sql(low),
            expr_sql(high)
        ),
        Expr::Like {
            expr,
            pattern,
            negated,
            case_insensitive,
            ..
        } => format!(
            "{} {}{} {}",
            expr_sql(expr),
            not(*negated),
            if *case_insensitive { "ILIKE" } else { "LIKE" },
            expr_sql(pattern)
        ),
        Expr::Case {
            operand,
            when_clauses,
            else_clause,
            ..
        } => {
            let mut out = String::from("CASE");
            if let Some(operand) = operand {
                out.push_str(&format!(" {}", expr_sql(operand)));
            }
            for (when, then) in when_clauses.iter() {
                out.push_str(&format!(" WHEN {} THEN {}", expr_sql(when), expr_sql(then)));
            }
            if let Some(else_clause) = else_clause {
                out.push_str(&format!(" ELSE {}", expr_sql(else_clause)));
            }
            out.push_str(" END");
            out
        }
        Expr::Cast {
            expr, data_type, ..
        } => format!("CAST({} AS {data_type})", expr_sql(expr)),
        Expr::Paren { expr, .. } => format!("({})", expr_sql(expr)),
        Expr::Tuple { items, .. } => format!("({})", join(items, expr_sql)),
    }
}

fn function(f: &FunctionCall) -> String {
    let mut out = format!("{}(", f.name);
    if f.distinct {
        out.push_str("DISTINCT ");
    }
    out.push_str(&join(&f.args, expr_sql));
    out.push(')');
    if let Some(over) = &f.over {
        out.push_str(&format!(" OVER ({})", window(over)));
    }
    out
}

fn window(w: &WindowSpec) -> String {
    let mut parts = vec![];
    if !w.partition_by.is_empty() {
        parts.push(format!("PARTITION BY {}", join(&w.partition_by, expr_sql)));
    }
    if !w.order_by.is_empty() {
        parts.push(format!("ORDER BY {}", order_by(&w.order_by)));
    }
    if let Some(frame) = &w.frame {
        let units = match frame.units {
            oxide_sql_parser::ast::FrameUnits::Rows => "ROWS",
            oxide_sql_parser::ast::FrameUnits::Range => "RANGE",
        };
        parts.push(match &frame.end {
            Some(end) => format!(
                "{units} BETWEEN {} AND {}",
                frame_bound(&frame.start),
                frame_bound(end)
            ),
            None => format!("{units} {}", frame_bound(&frame.start)),
        });
    }
    parts.join(" ")
}

fn frame_bound(bound: &FrameBound) -> String {
    match bound {
        FrameBound::UnboundedPreceding => String::from("UNBOUNDED PRECEDING"),
        FrameBound::Preceding(e) => format!("{} PRECEDING", expr_sql(e)),
        FrameBound::CurrentRow => String::from("CURRENT ROW"),
        FrameBound::Following(e) => format!("{} FOLLOWING", expr_sql(e)),
        FrameBound::UnboundedFollowing => String::from("UNBOUNDED FOLLOWING"),
    }
}
