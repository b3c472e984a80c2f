//! # dafi: filter criteria to parameterized SQL
//!
//! dafi turns a description of *what* a query wants (filters, sort order and
//! pagination) into a PostgreSQL `WHERE` / `ORDER BY` / `LIMIT` fragment plus the
//! arguments for its `$N` placeholders.
//!
//! ## Quick Example
//!
//! ```
//! use dafi::prelude::*;
//!
//! let filters = dafi::parse_filters(&[
//!     "( @email = [a@b.com] OR",
//!     "@nickname = [hernan] ) AND",
//!     "@id IN [1, 2, 3]",
//! ])
//! .unwrap();
//!
//! let criteria = Criteria::new().filters(filters).paginate(10, 2);
//! let out = PsqlConverter::new(20).to_sql(&criteria).unwrap();
//!
//! assert_eq!(
//!     out.sql,
//!     "WHERE (email = $1 OR nickname = $2) AND id IN ($3, $4, $5) LIMIT 10 OFFSET 10"
//! );
//! assert_eq!(out.args.len(), 5);
//! ```
//!
//! ## Filter language
//!
//! | Part       | Example             | Meaning                          |
//! |------------|---------------------|----------------------------------|
//! | `(`        | `((`                | Open groups before the predicate |
//! | `@field`   | `@email`            | Column, passed through verbatim  |
//! | operator   | `>=`, `CONTAINS`    | Comparison                       |
//! | `[value]`  | `[1, 2, 3]`         | Value, comma list for `IN`       |
//! | `)`        | `))`                | Close groups after the predicate |
//! | `AND`/`OR` | `OR`                | Connective to the next line      |

pub mod ast;
pub mod bind;
pub mod config;
pub mod error;
pub mod infer;
pub mod parser;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::{ConverterConfig, DafiConfig};
    pub use crate::error::*;
    pub use crate::parser::{parse_criteria, parse_filters, parse_pagination, parse_sorts};
    pub use crate::transpiler::{PsqlConverter, SqlConverter, SqlQuery};
}

/// Parse filter lines into a filter sequence.
///
/// # Example
///
/// ```
/// let filters = dafi::parse_filters(&["@age > [30] AND", "@name CONTAINS [John]"]).unwrap();
/// assert_eq!(filters.len(), 2);
/// assert_eq!(filters[0].field, "age");
/// ```
pub fn parse_filters<S: AsRef<str>>(lines: &[S]) -> Result<ast::Filters, error::DafiError> {
    parser::parse_filters(lines)
}
