//! Tests for data type parsing via CAST expressions and column
//! definitions.

mod common;
use common::*;

use oxide_sql_parser::ast::{DataType, Expr, Statement};

fn cast_type(sql_type: &str) -> DataType<'static> {
    match parse_expr(&format!("CAST(x AS {sql_type})")) {
        Expr::Cast { data_type, .. } => data_type,
        other => panic!("Expected CAST, got {other:?}"),
    }
}

#[test]
fn datatype_integers() {
    assert_eq!(cast_type("INT"), DataType::Integer);
    assert_eq!(cast_type("integer"), DataType::Integer);
    assert_eq!(cast_type("SMALLINT"), DataType::Smallint);
    assert_eq!(cast_type("BIGINT"), DataType::Bigint);
    round_trip("SELECT CAST(x AS INT), CAST(y AS BIGINT) FROM t");
}

#[test]
fn datatype_floats() {
    assert_eq!(cast_type("REAL"), DataType::Real);
    assert_eq!(cast_type("DOUBLE"), DataType::Double);
    assert_eq!(cast_type("DOUBLE PRECISION"), DataType::Double);
    assert_eq!(cast_type("FLOAT"), DataType::Double);
    round_trip("SELECT CAST(x AS DOUBLE PRECISION) FROM t");
}

#[test]
fn datatype_decimal_and_numeric() {
    assert_eq!(
        cast_type("DECIMAL"),
        DataType::Decimal {
            precision: None,
            scale: None
        }
    );
    assert_eq!(
        cast_type("DECIMAL(10)"),
        DataType::Decimal {
            precision: Some(10),
            scale: None
        }
    );
    assert_eq!(
        cast_type("NUMERIC(12, 4)"),
        DataType::Numeric {
            precision: Some(12),
            scale: Some(4)
        }
    );
    round_trip("SELECT CAST(x AS NUMERIC(12, 4)) FROM t");
}

#[test]
fn datatype_strings() {
    assert_eq!(cast_type("CHAR"), DataType::Char(None));
    assert_eq!(cast_type("CHAR(3)"), DataType::Char(Some(3)));
    assert_eq!(cast_type("VARCHAR(255)"), DataType::Varchar(Some(255)));
    assert_eq!(cast_type("TEXT"), DataType::Text);
    round_trip("SELECT CAST(x AS VARCHAR(255)) FROM t");
}

#[test]
fn datatype_other_builtins() {
    assert_eq!(cast_type("BLOB"), DataType::Blob);
    assert_eq!(cast_type("BOOLEAN"), DataType::Boolean);
    assert_eq!(cast_type("DATE"), DataType::Date);
    assert_eq!(cast_type("TIME"), DataType::Time);
    assert_eq!(cast_type("TIMESTAMP"), DataType::Timestamp);
    assert_eq!(cast_type("DATETIME"), DataType::Datetime);
}

#[test]
fn datatype_custom_name() {
    assert_eq!(cast_type("uuid"), DataType::Custom("uuid"));
    assert_eq!(cast_type("JSONB"), DataType::Custom("JSONB"));
    round_trip("SELECT CAST(x AS jsonb) FROM t");
}

#[test]
fn datatype_in_column_definitions() {
    let Statement::CreateTable(create) =
        parse("CREATE TABLE t (a SMALLINT, b DOUBLE PRECISION NOT NULL, c VARCHAR(20), d uuid)")
    else {
        panic!("Expected CREATE TABLE");
    };
    let types: Vec<_> = create.columns.iter().map(|c| c.data_type).collect();
    assert_eq!(
        types,
        [
            DataType::Smallint,
            DataType::Double,
            DataType::Varchar(Some(20)),
            DataType::Custom("uuid"),
        ]
    );
    assert_eq!(create.columns[1].constraints.len(), 1);
}

#[test]
fn datatype_missing_is_an_error() {
    let err = parse_err("SELECT CAST(x AS 5)");
    assert_eq!(err.message, "expected data type, found integer 5");
}

#[test]
fn datatype_negative_length_is_an_error() {
    let err = parse_err("SELECT CAST(x AS VARCHAR(-1))");
    assert_eq!(err.message, "expected integer, found \"-\"");
}

#[test]
fn datatype_length_out_of_range() {
    let err = parse_err("SELECT CAST(x AS VARCHAR(99999999999))");
    assert_eq!(err.message, "length 99999999999 is out of range");
    let err = parse_err("SELECT CAST(x AS DECIMAL(70000, 2))");
    assert_eq!(err.message, "precision 70000 is out of range");
}
