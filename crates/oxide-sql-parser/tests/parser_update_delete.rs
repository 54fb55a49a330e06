//! Tests for UPDATE and DELETE statements.

mod common;
use common::*;

use oxide_sql_parser::ast::{BinaryOp, Expr, TableRef};

// ===================================================================
// UPDATE
// ===================================================================

#[test]
fn update_single_column() {
    let update = parse_update("UPDATE users SET name = 'Bob' WHERE id = 1");
    assert_eq!(update.table, "users");
    assert_eq!(update.assignments.len(), 1);
    assert_eq!(update.assignments[0].column, "name");
    assert!(update.where_clause.is_some());
    round_trip("UPDATE users SET name = 'Bob' WHERE id = 1");
}

#[test]
fn update_multiple_columns() {
    let update = parse_update("UPDATE users SET name = 'Bob', age = age + 1, active = TRUE");
    let columns: Vec<_> = update
        .assignments
        .iter()
        .map(|a| a.column)
        .collect();
    assert_eq!(columns, ["name", "age", "active"]);
    assert!(matches!(
        update.assignments[1].value,
        Expr::Binary {
            op: BinaryOp::Add,
            ..
        }
    ));
    assert!(update.where_clause.is_none());
    round_trip("UPDATE users SET name = 'Bob', age = age + 1, active = TRUE");
}

#[test]
fn update_with_alias() {
    let update = parse_update("UPDATE users AS u SET name = 'x' WHERE u.id = 1");
    assert_eq!(update.alias, Some("u"));
    let bare = parse_update("UPDATE users u SET name = 'x'");
    assert_eq!(bare.alias, Some("u"));
    round_trip("UPDATE users AS u SET name = 'x' WHERE u.id = 1");
}

#[test]
fn update_schema_qualified() {
    let update = parse_update("UPDATE app.users SET a = 1");
    assert_eq!(update.schema, Some("app"));
    round_trip("UPDATE app.users SET a = 1");
}

#[test]
fn update_from() {
    let sql = "UPDATE orders SET total = p.price FROM prices AS p WHERE orders.product_id = p.id";
    let update = parse_update(sql);
    assert!(matches!(
        update.from,
        [TableRef::Table { name: "prices", alias: Some("p"), .. }]
    ));
    round_trip(sql);
}

#[test]
fn update_with_subquery_value() {
    let update = parse_update("UPDATE t SET n = (SELECT MAX(n) FROM u) WHERE id = 1");
    assert!(matches!(update.assignments[0].value, Expr::Subquery { .. }));
}

#[test]
fn update_returning() {
    let update = parse_update("UPDATE t SET a = 1 RETURNING id, a");
    assert_eq!(update.returning.len(), 2);
    round_trip("UPDATE t SET a = 1 RETURNING id, a");
}

#[test]
fn update_assignment_spans() {
    let sql = "UPDATE t SET a = 1, b = c + 2";
    let update = parse_update(sql);
    assert_eq!(text_of(sql, update.assignments[1].span), "b = c + 2");
    assert_eq!(text_of(sql, update.span), sql);
}

#[test]
fn update_without_set_is_an_error() {
    let err = parse_err("UPDATE t WHERE a = 1");
    assert_eq!(err.message, "expected SET, found keyword WHERE");
}

#[test]
fn update_with_comparison_instead_of_assignment_is_an_error() {
    let err = parse_err("UPDATE t SET a < 1");
    assert_eq!(err.message, "expected \"=\", found \"<\"");
}

// ===================================================================
// DELETE
// ===================================================================

#[test]
fn delete_with_where() {
    let delete = parse_delete("DELETE FROM users WHERE id = 1");
    assert_eq!(delete.table, "users");
    assert!(delete.where_clause.is_some());
    round_trip("DELETE FROM users WHERE id = 1");
}

#[test]
fn delete_all_rows() {
    let delete = parse_delete("DELETE FROM sessions");
    assert!(delete.where_clause.is_none());
    round_trip("DELETE FROM sessions");
}

#[test]
fn delete_with_alias_and_schema() {
    let delete = parse_delete("DELETE FROM app.sessions s WHERE s.expired");
    assert_eq!(delete.schema, Some("app"));
    assert_eq!(delete.alias, Some("s"));
    round_trip("DELETE FROM app.sessions AS s WHERE s.expired");
}

#[test]
fn delete_with_subquery_condition() {
    let delete =
        parse_delete("DELETE FROM users WHERE id IN (SELECT user_id FROM bans WHERE permanent)");
    assert!(matches!(delete.where_clause, Some(Expr::InSubquery { .. })));
    round_trip("DELETE FROM users WHERE id IN (SELECT user_id FROM bans WHERE permanent)");
}

#[test]
fn delete_returning() {
    let delete = parse_delete("DELETE FROM t WHERE a = 1 RETURNING *");
    assert_eq!(delete.returning.len(), 1);
    round_trip("DELETE FROM t WHERE a = 1 RETURNING *");
}

#[test]
fn delete_without_from_is_an_error() {
    let err = parse_err("DELETE users");
    assert_eq!(err.message, "expected FROM, found identifier \"users\"");
}

#[test]
fn delete_span() {
    let sql = "DELETE FROM t WHERE a = 1;";
    let delete = parse_delete(sql);
    assert_eq!(text_of(sql, delete.span), "DELETE FROM t WHERE a = 1");
}
