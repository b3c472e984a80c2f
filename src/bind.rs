//! Binding converter output onto a sqlx PostgreSQL query.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

use crate::ast::{List, Value};

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Bind `args` in order, so `args[0]` fills `$1`.
pub fn bind_args<'q>(mut query: PgQuery<'q>, args: &'q [Value]) -> PgQuery<'q> {
    for arg in args {
        query = match arg {
            Value::Null => query.bind(None::<String>),
            Value::Bool(v) => query.bind(*v),
            Value::Int(v) => query.bind(*v),
            Value::Float(v) => query.bind(*v),
            Value::String(v) => query.bind(v.as_str()),
            Value::List(List::Int(v)) => query.bind(v.as_slice()),
            Value::List(List::Float(v)) => query.bind(v.as_slice()),
            Value::List(List::Bool(v)) => query.bind(v.as_slice()),
            Value::List(List::String(v)) => query.bind(v.as_slice()),
        };
    }
    query
}

/// Create a query for `sql` with `args` already bound.
pub fn query<'q>(sql: &'q str, args: &'q [Value]) -> PgQuery<'q> {
    bind_args(sqlx::query(sql), args)
}
