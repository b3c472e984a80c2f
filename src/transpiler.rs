//! PostgreSQL converter for filter criteria.
//!
//! Turns a [`Criteria`] into a `WHERE` / `ORDER BY` / `LIMIT` fragment with `$N`
//! placeholders, plus the argument list those placeholders bind to, in order.

use serde::Serialize;
use tracing::{debug, trace};

use crate::ast::*;
use crate::config::ConverterConfig;
use crate::error::{DafiError, DafiResult};

/// SQL text and the arguments for its placeholders (`args[0]` binds `$1`).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SqlQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Trait for turning criteria into a parameterized SQL fragment.
pub trait SqlConverter {
    fn to_sql(&self, criteria: &Criteria) -> DafiResult<SqlQuery>;
}

/// PostgreSQL keyword for each operator.
const PG_OPERATORS: &[(FilterOperator, &str)] = &[
    (FilterOperator::Equal, "="),
    (FilterOperator::NotEqual, "<>"),
    (FilterOperator::Greater, ">"),
    (FilterOperator::GreaterOrEqual, ">="),
    (FilterOperator::Less, "<"),
    (FilterOperator::LessOrEqual, "<="),
    (FilterOperator::Contains, "ILIKE"),
    (FilterOperator::NotContains, "NOT ILIKE"),
    (FilterOperator::Is, "IS"),
    (FilterOperator::IsNot, "IS NOT"),
    (FilterOperator::In, "IN"),
    (FilterOperator::NotIn, "NOT IN"),
];

/// Look up the PostgreSQL keyword for `op`.
pub fn pg_operator(op: FilterOperator) -> DafiResult<&'static str> {
    PG_OPERATORS
        .iter()
        .find(|(o, _)| *o == op)
        .map(|(_, kw)| *kw)
        .ok_or_else(|| DafiError::InvalidOperator(op.to_string()))
}

/// Converter emitting PostgreSQL placeholder syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PsqlConverter {
    /// Page size used when the criteria carry none. 0 disables the default.
    pub max_page_size: u64,
}

/// Right-hand side of one emitted predicate.
enum Operand {
    Scalar(Value),
    List(Vec<Value>),
}

/// A predicate that survives into the `WHERE` clause.
struct Predicate<'a> {
    filter: &'a Filter,
    operand: Operand,
    open: usize,
    close: usize,
    /// Connective to the next emitted predicate and the group depth it joins at.
    key: ChainingKey,
    key_depth: isize,
}

impl PsqlConverter {
    pub fn new(max_page_size: u64) -> Self {
        Self { max_page_size }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.max_page_size)
    }

    /// Build `WHERE ...` and its arguments. Empty filters give an empty string.
    ///
    /// `IN` / `NOT_IN` items with no elements are left out. Their parentheses are
    /// carried to the neighbouring predicates and, of the connectives around them,
    /// the one at the outermost group depth is kept.
    pub fn build_where(&self, filters: &[Filter]) -> DafiResult<(String, Vec<Value>)> {
        let predicates = resolve_predicates(filters)?;
        if predicates.is_empty() {
            return Ok((String::new(), Vec::new()));
        }

        let mut sql = String::from("WHERE ");
        let mut args: Vec<Value> = Vec::new();

        for (i, p) in predicates.iter().enumerate() {
            sql.push_str(&"(".repeat(p.open));
            sql.push_str(&p.filter.field);
            sql.push(' ');
            sql.push_str(pg_operator(p.filter.operator)?);
            sql.push(' ');

            match &p.operand {
                Operand::Scalar(value) => {
                    sql.push_str(&placeholder(args.len()));
                    args.push(value.clone());
                }
                Operand::List(elements) => {
                    let mut marks = Vec::with_capacity(elements.len());
                    for element in elements {
                        marks.push(placeholder(args.len()));
                        args.push(element.clone());
                    }
                    sql.push('(');
                    sql.push_str(&marks.join(", "));
                    sql.push(')');
                }
            }

            sql.push_str(&")".repeat(p.close));

            if i + 1 < predicates.len() {
                sql.push(' ');
                sql.push_str(p.key.as_str());
                sql.push(' ');
            }
        }

        trace!(predicates = predicates.len(), args = args.len(), "built where clause");
        Ok((sql, args))
    }

    /// Build `ORDER BY ...`. Direction is omitted when a sort leaves it unspecified.
    pub fn build_sort(&self, sorts: &[Sort]) -> String {
        if sorts.is_empty() {
            return String::new();
        }

        let items: Vec<String> = sorts
            .iter()
            .map(|s| match s.direction {
                Some(dir) => format!("{} {}", s.field, dir),
                None => s.field.clone(),
            })
            .collect();

        format!("ORDER BY {}", items.join(", "))
    }

    /// Build `LIMIT n OFFSET m`, filling a missing page size with `max_page_size`.
    pub fn build_pagination(&self, pagination: &Pagination) -> String {
        match pagination.effective(self.max_page_size) {
            Some(p) => format!("LIMIT {} OFFSET {}", p.page_size, p.offset()),
            None => String::new(),
        }
    }
}

impl SqlConverter for PsqlConverter {
    fn to_sql(&self, criteria: &Criteria) -> DafiResult<SqlQuery> {
        let (where_sql, args) = self.build_where(&criteria.filters)?;
        let sort_sql = self.build_sort(&criteria.sorts);
        let pagination_sql = self.build_pagination(&criteria.pagination);

        let sql = [where_sql, sort_sql, pagination_sql]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        debug!(sql = %sql, args = args.len(), "converted criteria");
        Ok(SqlQuery { sql, args })
    }
}

/// `$N` for the argument about to be appended after `emitted` others.
fn placeholder(emitted: usize) -> String {
    format!("${}", emitted + 1)
}

fn operand(filter: &Filter) -> DafiResult<Option<Operand>> {
    if filter.operator.is_list() {
        let elements = filter.value.in_elements();
        if elements.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Operand::List(elements)));
    }

    if let Value::List(list) = &filter.value {
        return Err(DafiError::InvalidValue(format!(
            "{} on '{}' takes a single value, got a {} list",
            filter.operator,
            filter.field,
            list.kind()
        )));
    }

    Ok(Some(Operand::Scalar(filter.value.clone())))
}

/// Pair each filter with its operand and drop empty `IN` items.
///
/// Never touches `filters`; defaults and carried parentheses live on the
/// returned predicates only.
fn resolve_predicates(filters: &[Filter]) -> DafiResult<Vec<Predicate<'_>>> {
    let mut predicates: Vec<Predicate<'_>> = Vec::with_capacity(filters.len());
    let mut pending_open = 0usize;
    let mut depth: isize = 0;

    for filter in filters {
        // validates the operator before anything is emitted
        pg_operator(filter.operator)?;

        depth += filter.group_open as isize - filter.group_close as isize;
        let key = filter.connective();

        match operand(filter)? {
            Some(operand) => {
                predicates.push(Predicate {
                    filter,
                    operand,
                    open: pending_open + filter.group_open,
                    close: filter.group_close,
                    key,
                    key_depth: depth,
                });
                pending_open = 0;
            }
            None => {
                debug!(field = %filter.field, "skipping IN predicate without elements");

                pending_open += filter.group_open;
                let cancelled = pending_open.min(filter.group_close);
                pending_open -= cancelled;
                let leftover = filter.group_close - cancelled;

                if let Some(last) = predicates.last_mut() {
                    last.close += leftover;
                    if depth < last.key_depth {
                        last.key = key;
                        last.key_depth = depth;
                    }
                }
            }
        }
    }

    Ok(predicates)
}
