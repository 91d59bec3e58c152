use std::collections::HashSet;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::arena::{Arena, BlockIter, BlockList, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A parsed JSON value. Strings and containers refer into the [`Arena`] that
/// produced them; pair a value with its arena through [`Node`] to read them.
///
/// Objects are stored as a flat list alternating key and value, in input
/// order. Duplicate keys are all retained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(Span),
    Array(BlockList),
    Object(BlockList),
}

impl Value {
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_span(&self) -> Option<Span> {
        match self {
            Value::String(span) => Some(*span),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<BlockList> {
        match self {
            Value::Array(list) | Value::Object(list) => Some(*list),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }
}

/// Read-only view of a [`Value`] together with the arena that backs it.
///
/// Every accessor is checked: asking for the wrong variant or an index past
/// the end yields `None`. A value parsed before the arena was reset reads as
/// empty, since its spans and blocks belong to an earlier generation.
///
/// Objects keep duplicate keys. `field`, `to_json` and `Serialize` all use the
/// first value stored under a key, while `entries` and `slot` expose every pair.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    arena: &'a Arena,
    value: Value,
}

impl<'a> Node<'a> {
    pub fn new(arena: &'a Arena, value: Value) -> Self {
        Self { arena, value }
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    pub fn is_array(&self) -> bool {
        matches!(self.value, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.value, Value::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    /// The number as an integer, if it has no fractional part and fits.
    pub fn as_i64(&self) -> Option<i64> {
        let n = self.as_f64()?;
        let i = n as i64;
        if i as f64 == n && n.fract() == 0.0 {
            Some(i)
        } else {
            None
        }
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        self.arena.bytes(self.value.as_span()?)
    }

    /// String contents, if they are valid UTF-8. Input bytes are not validated
    /// during parsing.
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.as_bytes()?).ok()
    }

    /// Element count for arrays, pair count for objects, zero otherwise.
    pub fn len(&self) -> usize {
        match self.value {
            Value::Array(list) if list.is_readable(self.arena) => list.len(),
            Value::Object(list) if list.is_readable(self.arena) => list.len() / 2,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw slot in the underlying block list. For objects, even indices are
    /// keys and odd indices are values.
    pub fn slot(&self, index: usize) -> Option<Node<'a>> {
        let list = self.value.as_list()?;
        list.get(self.arena, index)
            .map(|value| Node::new(self.arena, value))
    }

    /// Array element at `index`.
    pub fn get(&self, index: usize) -> Option<Node<'a>> {
        match self.value {
            Value::Array(_) => self.slot(index),
            _ => None,
        }
    }

    pub fn iter(&self) -> Elements<'a> {
        let inner = match self.value {
            Value::Array(list) => Some(list.iter(self.arena)),
            _ => None,
        };
        Elements {
            arena: self.arena,
            inner,
        }
    }

    pub fn entries(&self) -> Entries<'a> {
        let inner = match self.value {
            Value::Object(list) => Some(list.iter(self.arena)),
            _ => None,
        };
        Entries {
            arena: self.arena,
            inner,
        }
    }

    /// First value stored under `key`, found by linear scan.
    pub fn field(&self, key: &str) -> Option<Node<'a>> {
        self.entries()
            .find(|(candidate, _)| candidate.as_bytes() == Some(key.as_bytes()))
            .map(|(_, value)| value)
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self.value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => match self.as_i64() {
                Some(i) => serde_json::Value::from(i),
                None => serde_json::Number::from_f64(n)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number),
            },
            Value::String(_) => serde_json::Value::String(self.lossy_string()),
            Value::Array(_) => serde_json::Value::Array(self.iter().map(|n| n.to_json()).collect()),
            Value::Object(_) => {
                let mut map = serde_json::Map::new();
                for (key, value) in self.entries() {
                    map.entry(key.lossy_string())
                        .or_insert_with(|| value.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }

    fn lossy_string(&self) -> String {
        String::from_utf8_lossy(self.as_bytes().unwrap_or_default()).into_owned()
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::String(_) => write!(f, "{:?}", self.lossy_string()),
            Value::Array(_) => f.debug_list().entries(self.iter()).finish(),
            Value::Object(_) => f.debug_map().entries(self.entries()).finish(),
            other => write!(f, "{other:?}"),
        }
    }
}

pub struct Elements<'a> {
    arena: &'a Arena,
    inner: Option<BlockIter<'a>>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        let value = self.inner.as_mut()?.next()?;
        Some(Node::new(self.arena, value))
    }
}

pub struct Entries<'a> {
    arena: &'a Arena,
    inner: Option<BlockIter<'a>>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (Node<'a>, Node<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let inner = self.inner.as_mut()?;
        let key = inner.next()?;
        let value = inner.next()?;
        Some((Node::new(self.arena, key), Node::new(self.arena, value)))
    }
}

impl Serialize for Node<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(b),
            Value::Number(n) => match self.as_i64() {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(n),
            },
            Value::String(_) => match self.as_str() {
                Some(s) => serializer.serialize_str(s),
                None => serializer.serialize_str(&self.lossy_string()),
            },
            Value::Array(_) => {
                let mut seq = serializer.serialize_seq(Some(self.len()))?;
                for element in self.iter() {
                    seq.serialize_element(&element)?;
                }
                seq.end()
            }
            Value::Object(_) => {
                let mut seen = HashSet::new();
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in self.entries() {
                    if seen.insert(key.as_bytes().unwrap_or_default()) {
                        map.serialize_entry(&key, &value)?;
                    }
                }
                map.end()
            }
        }
    }
}
