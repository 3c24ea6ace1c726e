//! Resolved values.
//!
//! Every declaration resolves to a [`Value`]. Literals are stored as
//! values directly, factories produce them, nested containers resolve to
//! [`Value::Scope`], and deferred expressions walk them with attribute
//! and item access.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use wiring_support::rendering::{shorten_type_name, suggest_similar};

use crate::error::{AttributeNotFoundError, Result, WiringError};
use crate::key::Key;
use crate::scope::Scope;

/// A plain constructed instance with named attributes.
///
/// Implement this for the types your factories build so deferred
/// expressions can read their attributes.
///
/// # Examples
/// ```
/// use std::any::Any;
/// use wiring_container::value::{Object, Value};
///
/// #[derive(Debug)]
/// struct Point { x: i64 }
///
/// impl Object for Point {
///     fn attribute(&self, name: &str) -> Option<Value> {
///         (name == "x").then(|| Value::Int(self.x))
///     }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// let point = Value::object(Point { x: 3 });
/// assert_eq!(point.attr("x").unwrap(), Value::Int(3));
/// assert_eq!(point.downcast_ref::<Point>().unwrap().x, 3);
/// ```
pub trait Object: Any + Send + Sync + fmt::Debug {
    /// Name used in "no such attribute" messages.
    fn type_name(&self) -> String {
        shorten_type_name(std::any::type_name::<Self>())
    }

    fn attribute(&self, name: &str) -> Option<Value>;

    /// Attribute names offered as suggestions when a lookup misses.
    fn attribute_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn item(&self, key: &Key) -> Result<Value> {
        Err(WiringError::NotSubscriptable {
            type_name: self.type_name(),
            key_kind: key.kind(),
        })
    }

    fn as_any(&self) -> &dyn Any;
}

/// A ready-made [`Object`]: a type name plus ordered attributes.
///
/// ```
/// use wiring_container::value::{Record, Value};
///
/// let bar = Record::new("Bar").with("y", Value::map([("foo", 1)]));
/// let value = Value::from(bar);
/// assert_eq!(value.attr("y").unwrap().item(&"foo".into()).unwrap(), Value::Int(1));
/// ```
#[derive(Debug, Clone)]
pub struct Record {
    type_name: String,
    attributes: IndexMap<String, Value>,
    items: Option<IndexMap<Key, Value>>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attributes: IndexMap::new(),
            items: None,
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Makes the record subscriptable and adds one item.
    pub fn with_item(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.items
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }
}

impl Object for Record {
    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }

    fn attribute_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    fn item(&self, key: &Key) -> Result<Value> {
        match &self.items {
            Some(items) => items
                .get(key)
                .cloned()
                .ok_or_else(|| WiringError::KeyNotFound { key: key.clone() }),
            None => Err(WiringError::NotSubscriptable {
                type_name: self.type_name.clone(),
                key_kind: key.kind(),
            }),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A resolved value.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(IndexMap<Key, Value>),
    Object(Arc<dyn Object>),
    /// A resolved sub-container.
    Scope(Scope),
}

impl Value {
    pub fn object(object: impl Object) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn tuple<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn map<K: Into<Key>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Type name as reported in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::None => "NoneType".into(),
            Value::Bool(_) => "bool".into(),
            Value::Int(_) => "int".into(),
            Value::Float(_) => "float".into(),
            Value::Str(_) => "str".into(),
            Value::List(_) => "list".into(),
            Value::Tuple(_) => "tuple".into(),
            Value::Map(_) => "dict".into(),
            Value::Object(object) => object.type_name(),
            Value::Scope(scope) => scope.name().to_string(),
        }
    }

    /// Attribute access.
    ///
    /// On a [`Value::Scope`] this resolves `name` in that scope; on an
    /// object it reads the attribute. Anything else has no attributes.
    pub fn attr(&self, name: &str) -> Result<Value> {
        match self {
            Value::Scope(scope) => scope.resolve(name),
            Value::Object(object) => object.attribute(name).ok_or_else(|| {
                WiringError::AttributeNotFound(AttributeNotFoundError {
                    owner: object.type_name(),
                    attribute: name.to_string(),
                    suggestions: suggest_similar(name, &object.attribute_names(), 3),
                })
            }),
            other => Err(WiringError::AttributeNotFound(AttributeNotFoundError {
                owner: other.type_name(),
                attribute: name.to_string(),
                suggestions: Vec::new(),
            })),
        }
    }

    /// Item access.
    pub fn item(&self, key: &Key) -> Result<Value> {
        match (self, key.as_index()) {
            (Value::Map(entries), _) => entries
                .get(key)
                .cloned()
                .ok_or_else(|| WiringError::KeyNotFound { key: key.clone() }),
            (Value::List(items), Some(index)) => {
                sequence_get(items, index, "list").cloned()
            }
            (Value::Tuple(items), Some(index)) => {
                sequence_get(items, index, "tuple").cloned()
            }
            (Value::Str(s), Some(index)) => {
                let chars: Vec<char> = s.chars().collect();
                sequence_get(&chars, index, "string").map(|c| Value::Str(c.to_string()))
            }
            (Value::Object(object), _) => object.item(key),
            (other, _) => Err(WiringError::NotSubscriptable {
                type_name: other.type_name(),
                key_kind: key.kind(),
            }),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            Value::Scope(scope) => Some(scope),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<dyn Object>> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Borrows the object as its concrete type.
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_object()
            .and_then(|object| object.as_any().downcast_ref::<T>())
    }
}

/// Negative indices count from the end.
fn sequence_get<'a, T>(items: &'a [T], index: i64, kind: &'static str) -> Result<&'a T> {
    let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
    let position = if index < 0 { len + index } else { index };

    usize::try_from(position)
        .ok()
        .and_then(|p| items.get(p))
        .ok_or(WiringError::IndexNotFound { kind, index })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (Value::Scope(a), Value::Scope(b)) => a.same_as(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<IndexMap<Key, Value>> for Value {
    fn from(value: IndexMap<Key, Value>) -> Self {
        Value::Map(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::object(value)
    }
}

impl From<Scope> for Value {
    fn from(value: Scope) -> Self {
        Value::Scope(value)
    }
}
