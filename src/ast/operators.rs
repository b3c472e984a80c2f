use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{DafiError, DafiResult};

/// Comparison operator of a filter item.
///
/// Callers spell operators in several vocabularies (`>=`, `CONTAINS`, `gte`...).
/// Every accepted spelling lands on one variant here before any SQL is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterOperator {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    /// Case-insensitive pattern match (`ILIKE`)
    Contains,
    NotContains,
    Is,
    IsNot,
    In,
    NotIn,
}

/// Surface token table: `(token, operator)`. Lookups are case-insensitive.
const OPERATOR_TOKENS: &[(&str, FilterOperator)] = &[
    // Symbolic
    ("=", FilterOperator::Equal),
    ("!=", FilterOperator::NotEqual),
    ("<>", FilterOperator::NotEqual),
    (">", FilterOperator::Greater),
    (">=", FilterOperator::GreaterOrEqual),
    ("<", FilterOperator::Less),
    ("<=", FilterOperator::LessOrEqual),
    // Words
    ("CONTAINS", FilterOperator::Contains),
    ("NOT_CONTAINS", FilterOperator::NotContains),
    ("LIKE", FilterOperator::Contains),
    ("NOT_LIKE", FilterOperator::NotContains),
    ("ILIKE", FilterOperator::Contains),
    ("NOT_ILIKE", FilterOperator::NotContains),
    ("IS", FilterOperator::Is),
    ("IS_NOT", FilterOperator::IsNot),
    ("IN", FilterOperator::In),
    ("NOT_IN", FilterOperator::NotIn),
    // Short codes
    ("eq", FilterOperator::Equal),
    ("ne", FilterOperator::NotEqual),
    ("gt", FilterOperator::Greater),
    ("gte", FilterOperator::GreaterOrEqual),
    ("lt", FilterOperator::Less),
    ("lte", FilterOperator::LessOrEqual),
    ("contains", FilterOperator::Contains),
    ("ncontains", FilterOperator::NotContains),
    ("is", FilterOperator::Is),
    ("isn", FilterOperator::IsNot),
    ("in", FilterOperator::In),
    ("nin", FilterOperator::NotIn),
];

impl FilterOperator {
    pub const ALL: [FilterOperator; 12] = [
        FilterOperator::Equal,
        FilterOperator::NotEqual,
        FilterOperator::Greater,
        FilterOperator::GreaterOrEqual,
        FilterOperator::Less,
        FilterOperator::LessOrEqual,
        FilterOperator::Contains,
        FilterOperator::NotContains,
        FilterOperator::Is,
        FilterOperator::IsNot,
        FilterOperator::In,
        FilterOperator::NotIn,
    ];

    /// Resolve any accepted surface token.
    pub fn from_token(token: &str) -> DafiResult<Self> {
        let token = token.trim();
        OPERATOR_TOKENS
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(token))
            .map(|(_, op)| *op)
            .ok_or_else(|| DafiError::InvalidOperator(token.to_string()))
    }

    /// Canonical token of the textual filter language.
    pub fn dsl_token(&self) -> &'static str {
        match self {
            FilterOperator::Equal => "=",
            FilterOperator::NotEqual => "!=",
            FilterOperator::Greater => ">",
            FilterOperator::GreaterOrEqual => ">=",
            FilterOperator::Less => "<",
            FilterOperator::LessOrEqual => "<=",
            FilterOperator::Contains => "CONTAINS",
            FilterOperator::NotContains => "NOT_CONTAINS",
            FilterOperator::Is => "IS",
            FilterOperator::IsNot => "IS_NOT",
            FilterOperator::In => "IN",
            FilterOperator::NotIn => "NOT_IN",
        }
    }

    /// Short code used by query-string surfaces.
    pub fn short_code(&self) -> &'static str {
        match self {
            FilterOperator::Equal => "eq",
            FilterOperator::NotEqual => "ne",
            FilterOperator::Greater => "gt",
            FilterOperator::GreaterOrEqual => "gte",
            FilterOperator::Less => "lt",
            FilterOperator::LessOrEqual => "lte",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "ncontains",
            FilterOperator::Is => "is",
            FilterOperator::IsNot => "isn",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "nin",
        }
    }

    /// True for operators whose value is a list expanded into several placeholders.
    pub fn is_list(&self) -> bool {
        matches!(self, FilterOperator::In | FilterOperator::NotIn)
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dsl_token())
    }
}

impl FromStr for FilterOperator {
    type Err = DafiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s)
    }
}

impl TryFrom<String> for FilterOperator {
    type Error = DafiError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_token(&s)
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.dsl_token().to_string()
    }
}

/// Boolean connective joining a filter item to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChainingKey {
    #[default]
    #[serde(alias = "and")]
    And,
    #[serde(alias = "or")]
    Or,
}

impl ChainingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainingKey::And => "AND",
            ChainingKey::Or => "OR",
        }
    }
}

impl std::fmt::Display for ChainingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainingKey {
    type Err = DafiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("AND") {
            Ok(ChainingKey::And)
        } else if s.eq_ignore_ascii_case("OR") {
            Ok(ChainingKey::Or)
        } else {
            Err(DafiError::InvalidChainingKey(s.to_string()))
        }
    }
}

/// Sort order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Asc,
    #[serde(alias = "desc")]
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}
