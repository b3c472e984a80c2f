//! Filter model: what a query asks for, independent of any SQL dialect.

pub mod criteria;
pub mod filter;
pub mod operators;
pub mod values;

pub use self::criteria::{Criteria, Pagination, Sort, Sorts};
pub use self::filter::{Filter, Filters};
pub use self::operators::{ChainingKey, FilterOperator, SortDirection};
pub use self::values::{List, Value};
