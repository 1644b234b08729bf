//! Trial values and their literal rendering.
//!
//! Every message the matcher builds shows values in literal form, so a
//! reader can tell the string `"123"` apart from the integer `123`:
//!
//! | value                      | rendered  |
//! |----------------------------|-----------|
//! | `Value::Str("abc")`        | `"abc"`   |
//! | `Value::symbol("abc")`     | `:abc`    |
//! | `Value::Nil`               | `nil`     |
//! | `Value::Int(123)`          | `123`     |
//! | `Value::Float(1.0)`        | `1.0`     |
//! | `Value::List(..)`          | `[1, :a]` |

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value assigned to the attribute under test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    List(Vec<Value>),
}

impl Value {
    /// Create a symbolic value, rendered with a leading `:`.
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Borrow the inner text of a string or symbol.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write_float(f, *x),
            Value::Str(s) => write_quoted(f, s),
            Value::Symbol(s) => write_symbol(f, s),
            Value::List(items) => write!(f, "[{}]", join_literals(items)),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        f.write_str("NaN")
    } else if x.is_infinite() {
        f.write_str(if x > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        // `{}` never switches to exponent form; whole numbers still need `.0`
        let text = x.to_string();
        if text.contains('.') {
            f.write_str(&text)
        } else {
            write!(f, "{}.0", text)
        }
    }
}

/// Plain identifiers render bare (`:abc`, `:valid?`), anything else quoted.
fn write_symbol(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str(":")?;
    if is_plain_symbol(s) {
        f.write_str(s)
    } else {
        write_quoted(f, s)
    }
}

fn is_plain_symbol(s: &str) -> bool {
    let body = s.strip_suffix(['?', '!', '=']).unwrap_or(s);
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

/// Render values in literal form, separated by `", "`.
pub fn join_literals(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Int(i64::from(i))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Nil)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Nil),
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            object @ serde_json::Value::Object(_) => Value::Str(object.to_string()),
        }
    }
}

/// Build a `Vec<Value>` from heterogeneous literals.
///
/// ```
/// use valid_attribute::{values, Value};
///
/// let trial = values!["abc", 123, Value::symbol("abc"), Value::Nil];
/// assert_eq!(trial.len(), 4);
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_render_quoted() {
        assert_eq!(Value::from("abc").to_string(), "\"abc\"");
        assert_eq!(Value::from("say \"hi\"").to_string(), r#""say \"hi\"""#);
        assert_eq!(Value::from("a\\b\n").to_string(), r#""a\\b\n""#);
    }

    #[test]
    fn symbols_and_nil_render_as_literals() {
        assert_eq!(Value::symbol("abc").to_string(), ":abc");
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::from(None::<i32>).to_string(), "nil");
    }

    #[test]
    fn symbols_that_are_not_identifiers_render_quoted() {
        assert_eq!(Value::symbol("valid?").to_string(), ":valid?");
        assert_eq!(Value::symbol("_id").to_string(), ":_id");
        assert_eq!(Value::symbol("a b").to_string(), ":\"a b\"");
        assert_eq!(Value::symbol("1st").to_string(), ":\"1st\"");
        assert_eq!(Value::symbol("?").to_string(), ":\"?\"");
        assert_eq!(Value::symbol("").to_string(), ":\"\"");
    }

    #[test]
    fn numbers_render_naturally() {
        assert_eq!(Value::from(123).to_string(), "123");
        assert_eq!(Value::from(-7i64).to_string(), "-7");
        assert_eq!(Value::from(1.0).to_string(), "1.0");
        assert_eq!(Value::from(2.5f32).to_string(), "2.5");
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::from(1e16).to_string(), "10000000000000000.0");
        assert_eq!(Value::from(1e-7).to_string(), "0.0000001");
        assert_eq!(Value::from(-3.0).to_string(), "-3.0");
    }

    #[test]
    fn lists_render_nested_literals() {
        let list = Value::List(vec![Value::from(1), Value::symbol("a"), Value::from("b")]);
        assert_eq!(list.to_string(), "[1, :a, \"b\"]");
    }

    #[test]
    fn join_literals_uses_comma_space() {
        assert_eq!(join_literals(&values!["abc", 123]), "\"abc\", 123");
        assert_eq!(join_literals(&[]), "");
    }

    #[test]
    fn values_macro_accepts_mixed_types() {
        let trial = values!["abc", 123, true, Value::Nil, Some(4)];
        assert_eq!(
            trial,
            vec![
                Value::Str("abc".to_string()),
                Value::Int(123),
                Value::Bool(true),
                Value::Nil,
                Value::Int(4),
            ]
        );
        assert!(values![].is_empty());
    }

    #[test]
    fn json_values_convert() {
        let json = serde_json::json!([null, 1, 1.5, "x", {"k": 1}]);
        assert_eq!(
            Value::from(json).to_string(),
            r#"[nil, 1, 1.5, "x", "{\"k\":1}"]"#
        );
    }
}
