//! Closed runtime value union.
//!
//! Every value that flows through the marshaler, unmarshaler, or a cache slot
//! is one of these variants. `Null` doubles as "absent" for nullable types
//! and unpopulated cache slots.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    Text(String),
    Bytes(Vec<u8>),
    /// Enumeration constant: the enum's type name plus its declared wire
    /// value.
    Enum { name: String, value: String },
    /// Reference to a remote entity. Proxies holding the same `id_ref` are
    /// equivalent; a concrete proxy is constructed from this on demand.
    Ref { interface: String, id_ref: String },
    /// Ordered sequence, used for both arrays and collections.
    List(Vec<Value>),
    /// Name-keyed mapping in encounter order.
    Map(IndexMap<String, Value>),
    /// Composite object: type name plus fields in declaration order.
    Composite {
        name: String,
        fields: Vec<(String, Value)>,
    },
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn reference(interface: impl Into<String>, id_ref: impl Into<String>) -> Self {
        Value::Ref {
            interface: interface.into(),
            id_ref: id_ref.into(),
        }
    }

    pub fn enumeration(name: impl Into<String>, value: impl Into<String>) -> Self {
        Value::Enum {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_ref_string(&self) -> Option<&str> {
        match self {
            Value::Ref { id_ref, .. } => Some(id_ref),
            _ => None,
        }
    }

    /// Textual form used when the wire mapping requires a string rendering
    /// (typed-primitive overrides, enum content, reference strings).
    pub fn wire_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(bytes) => {
                use base64::Engine;
                f.write_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            Value::Enum { value, .. } => f.write_str(value),
            Value::Ref { id_ref, .. } => f.write_str(id_ref),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                Ok(())
            }
            Value::Composite { name, fields } => {
                write!(f, "{}{{", name)?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_text_for_scalars() {
        assert_eq!(Value::from(42i32).wire_text(), "42");
        assert_eq!(Value::from(true).wire_text(), "true");
        assert_eq!(Value::from("abc").wire_text(), "abc");
        assert_eq!(Value::Null.wire_text(), "");
    }

    #[test]
    fn wire_text_for_bytes_is_base64() {
        assert_eq!(Value::Bytes(vec![1, 2, 3]).wire_text(), "AQID");
    }

    #[test]
    fn wire_text_for_enum_and_ref() {
        assert_eq!(
            Value::enumeration("MachineState", "Running").wire_text(),
            "Running"
        );
        assert_eq!(
            Value::reference("IMachine", "obj-1234").wire_text(),
            "obj-1234"
        );
    }
}
