//! Generic property bag.
//!
//! A decoded response body is an ordered sequence of entries, each optionally
//! tagged with a name. Entries are addressable by index and by name; nested
//! bags represent composite objects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The wire's canonical textual marker for "no value". Distinct from
/// protocol-level absence: an entry may be present but carry this string
/// form (an empty nested element renders to it).
pub const EMPTY_SENTINEL: &str = "anyType{}";

/// One decoded value inside a bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BagValue {
    /// Protocol-level null entry.
    Null,
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    Text(String),
    /// Nested property bag (a composite element).
    Bag(PropertyBag),
}

impl BagValue {
    pub fn text(s: impl Into<String>) -> Self {
        BagValue::Text(s.into())
    }

    /// String form of the entry, the way the wire library renders it. Nested
    /// bags render as `anyType{...}`, an empty one to the empty sentinel.
    pub fn string_form(&self) -> String {
        self.to_string()
    }

    /// Whether the entry carries the wire's empty sentinel.
    pub fn is_empty_sentinel(&self) -> bool {
        self.string_form() == EMPTY_SENTINEL
    }

    pub fn is_null(&self) -> bool {
        matches!(self, BagValue::Null)
    }
}

impl fmt::Display for BagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BagValue::Null => f.write_str("null"),
            BagValue::Bool(v) => write!(f, "{}", v),
            BagValue::I16(v) => write!(f, "{}", v),
            BagValue::I32(v) => write!(f, "{}", v),
            BagValue::I64(v) => write!(f, "{}", v),
            BagValue::Text(s) => f.write_str(s),
            BagValue::Bag(bag) => {
                f.write_str("anyType{")?;
                for entry in bag.iter() {
                    write!(
                        f,
                        "{}={}; ",
                        entry.name.as_deref().unwrap_or("item"),
                        entry.value
                    )?;
                }
                f.write_str("}")
            }
        }
    }
}

/// One bag entry: an optional tag name plus a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BagEntry {
    pub name: Option<String>,
    pub value: BagValue,
}

/// Ordered, name-taggable container of decoded response values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyBag {
    entries: Vec<BagEntry>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&BagEntry> {
        self.entries.get(index)
    }

    /// First entry tagged `name`, if any.
    pub fn by_name(&self, name: &str) -> Option<&BagEntry> {
        self.entries
            .iter()
            .find(|e| e.name.as_deref() == Some(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BagEntry> {
        self.entries.iter()
    }

    pub fn push(&mut self, name: Option<String>, value: BagValue) {
        self.entries.push(BagEntry { name, value });
    }

    /// Builder-style named entry.
    pub fn with(mut self, name: &str, value: BagValue) -> Self {
        self.push(Some(name.to_string()), value);
        self
    }

    /// Builder-style unnamed entry.
    pub fn with_unnamed(mut self, value: BagValue) -> Self {
        self.push(None, value);
        self
    }
}

impl FromIterator<BagValue> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = BagValue>>(iter: I) -> Self {
        let mut bag = PropertyBag::new();
        for value in iter {
            bag.push(None, value);
        }
        bag
    }
}
