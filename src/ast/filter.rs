use serde::{Deserialize, Serialize};

use super::operators::{ChainingKey, FilterOperator};
use super::values::Value;

/// One predicate of a query.
///
/// `group_open` / `group_close` hold how many literal parentheses are emitted
/// before / after the predicate. `chaining_key` joins this item to the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub group_open: usize,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub group_close: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chaining_key: Option<ChainingKey>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

pub type Filters = Vec<Filter>;

impl Filter {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            group_open: 0,
            group_close: 0,
            chaining_key: None,
        }
    }

    /// Join to the next item with `AND`.
    pub fn and(self) -> Self {
        self.chain(ChainingKey::And)
    }

    /// Join to the next item with `OR`.
    pub fn or(self) -> Self {
        self.chain(ChainingKey::Or)
    }

    pub fn chain(mut self, key: ChainingKey) -> Self {
        self.chaining_key = Some(key);
        self
    }

    /// Open `n` groups before this predicate.
    pub fn open(mut self, n: usize) -> Self {
        self.group_open = n;
        self
    }

    /// Close `n` groups after this predicate.
    pub fn close(mut self, n: usize) -> Self {
        self.group_close = n;
        self
    }

    pub fn is_group_open(&self) -> bool {
        self.group_open > 0
    }

    pub fn is_group_close(&self) -> bool {
        self.group_close > 0
    }

    /// Connective joining this item to the next one; a missing key means `AND`.
    ///
    /// The item itself is never modified.
    pub fn connective(&self) -> ChainingKey {
        self.chaining_key.unwrap_or_default()
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", "(".repeat(self.group_open))?;
        let raw = match &self.value {
            Value::String(s) => s.clone(),
            Value::List(list) => list
                .to_values()
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        };
        write!(f, "@{} {} [{}]", self.field, self.operator, raw)?;
        write!(f, "{}", ")".repeat(self.group_close))?;
        if let Some(key) = self.chaining_key {
            write!(f, " {}", key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connective_defaults_without_mutation() {
        let filter = Filter::new("email", FilterOperator::Equal, "a@b.com");
        assert_eq!(filter.connective(), ChainingKey::And);
        assert_eq!(filter.chaining_key, None);
        assert_eq!(filter.or().connective(), ChainingKey::Or);
    }

    #[test]
    fn test_display_as_dsl_line() {
        let filter = Filter::new("id", FilterOperator::In, vec![1i64, 2])
            .open(2)
            .close(1)
            .or();
        assert_eq!(filter.to_string(), "((@id IN [1, 2]) OR");
    }

    #[test]
    fn test_deserialize_rejects_unknown_operator() {
        let err = serde_json::from_str::<Filter>(r#"{"field":"a","operator":"~","value":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid operator"));
    }
}
