//! Parameterized statement builders.
//!
//! Table and column names come from the closed [`Table`] description, never from
//! caller text, so only values are bound; identifiers are pushed verbatim.

use core_types::{Condition, Table, Value};
use sqlx::{Postgres, QueryBuilder};

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: Value) {
    match value {
        Value::Int(v) => builder.push_bind(v),
        Value::Text(v) => builder.push_bind(v),
        Value::Date(v) => builder.push_bind(v),
        Value::Null => builder.push("NULL"),
    };
}

fn push_conditions(builder: &mut QueryBuilder<'static, Postgres>, conditions: Vec<Condition>) {
    builder.push(" WHERE ");
    for (i, condition) in conditions.into_iter().enumerate() {
        if i > 0 {
            builder.push(" AND ");
        }
        builder.push(condition.column()).push(" = ");
        push_value(builder, condition.into_value());
    }
}

/// `INSERT INTO table (c1, c2, ...) VALUES ($1, $2, ...)` naming only the given fields.
pub fn insert(table: Table, fields: Vec<(&'static str, Value)>) -> QueryBuilder<'static, Postgres> {
    let (columns, values): (Vec<_>, Vec<_>) = fields.into_iter().unzip();
    let mut builder = QueryBuilder::new(format!("INSERT INTO {} (", table.ident()));
    builder.push(columns.join(", ")).push(") VALUES (");
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        push_value(&mut builder, value);
    }
    builder.push(")");
    builder
}

/// `UPDATE table SET c1 = $1, ... WHERE col = $n`.
pub fn update(
    table: Table,
    fields: Vec<(&'static str, Value)>,
    condition: Condition,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", table.ident()));
    for (i, (column, value)) in fields.into_iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push(column).push(" = ");
        push_value(&mut builder, value);
    }
    push_conditions(&mut builder, vec![condition]);
    builder
}

/// `DELETE FROM table WHERE c1 = $1 AND c2 = $2 ...`.
pub fn delete(table: Table, conditions: Vec<Condition>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("DELETE FROM {}", table.ident()));
    push_conditions(&mut builder, conditions);
    builder
}

/// `SELECT <declared columns> FROM table ORDER BY <primary key>`.
pub fn select_all(table: Table) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        table.column_list(),
        table.ident(),
        table.primary_key().join(", ")
    )
}
