use serde::{Deserialize, Serialize};

/// A value attached to a filter item, and the element type of converter args.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// NULL value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    String(String),
    /// Homogeneous list, used by `IN` / `NOT_IN`
    List(List),
}

/// Homogeneous list of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum List {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
    String(Vec<String>),
}

impl List {
    /// Flatten into scalar values, order preserved.
    pub fn to_values(&self) -> Vec<Value> {
        match self {
            List::Int(v) => v.iter().copied().map(Value::Int).collect(),
            List::Float(v) => v.iter().copied().map(Value::Float).collect(),
            List::Bool(v) => v.iter().copied().map(Value::Bool).collect(),
            List::String(v) => v.iter().cloned().map(Value::String).collect(),
        }
    }

    /// Name of the element type.
    pub fn kind(&self) -> &'static str {
        match self {
            List::Int(_) => "integer",
            List::Float(_) => "float",
            List::Bool(_) => "boolean",
            List::String(_) => "string",
        }
    }
}

impl Value {
    /// Elements bound for an `IN` predicate.
    ///
    /// Lists flatten element-wise, strings split on `,` (pieces kept verbatim),
    /// any other scalar is a single element. `Null` and empty lists yield nothing.
    pub fn in_elements(&self) -> Vec<Value> {
        match self {
            Value::Null => Vec::new(),
            Value::List(list) => list.to_values(),
            Value::String(s) => s.split(',').map(|p| Value::String(p.to_string())).collect(),
            scalar => vec![scalar.clone()],
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s),
            Value::List(list) => {
                write!(f, "[")?;
                for (i, v) in list.to_values().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::List(List::Int(v))
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::List(List::Float(v))
    }
}

impl From<Vec<bool>> for Value {
    fn from(v: Vec<bool>) -> Self {
        Value::List(List::Bool(v))
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::List(List::String(v))
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::List(List::String(v.into_iter().map(String::from).collect()))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
