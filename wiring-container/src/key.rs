//! Item-access keys.
//!
//! A [`Key`] selects an element of a [`Value::Map`](crate::value::Value::Map),
//! [`Value::List`](crate::value::Value::List) or
//! [`Value::Tuple`](crate::value::Value::Tuple). Besides the usual scalar
//! keys it supports tuples and opaque keys that are compared by identity
//! and have no textual form.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Key of an item-access step.
///
/// # Examples
/// ```
/// use wiring_container::key::Key;
///
/// let key = Key::from(("x", 1));
/// assert_eq!(key.to_string(), "('x', 1)");
/// assert_eq!(Key::from("one").to_string(), "'one'");
/// ```
///
/// `Bool` keys are interchangeable with the `Int` keys `0` and `1`: they
/// compare and hash alike, and index sequences like integers.
#[derive(Debug, Clone)]
pub enum Key {
    Bool(bool),
    Int(i64),
    Str(String),
    Tuple(Vec<Key>),
    Opaque(OpaqueKey),
}

impl Key {
    /// Human-readable kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Key::Bool(_) => "bool",
            Key::Int(_) => "int",
            Key::Str(_) => "str",
            Key::Tuple(_) => "tuple",
            Key::Opaque(_) => "object",
        }
    }

    /// The key as a sequence index, for `Int` and `Bool` keys.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Bool(b) => Some(i64::from(*b)),
            Key::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Str(a), Key::Str(b)) => a == b,
            (Key::Tuple(a), Key::Tuple(b)) => a == b,
            (Key::Opaque(a), Key::Opaque(b)) => a == b,
            _ => matches!(
                (self.as_index(), other.as_index()),
                (Some(a), Some(b)) if a == b
            ),
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Key::Bool(_) | Key::Int(_) => {
                0u8.hash(state);
                self.as_index().hash(state);
            }
            Key::Str(s) => {
                1u8.hash(state);
                s.hash(state);
            }
            Key::Tuple(items) => {
                2u8.hash(state);
                items.hash(state);
            }
            Key::Opaque(key) => {
                3u8.hash(state);
                key.hash(state);
            }
        }
    }
}

/// A key compared and hashed by identity.
///
/// Clones of the same `OpaqueKey` are equal; two keys built from equal
/// payloads are not. The payload is never formatted.
///
/// ```
/// use wiring_container::key::{Key, OpaqueKey};
///
/// let boom = OpaqueKey::new(vec![1u8, 2, 3]);
/// assert_eq!(Key::from(boom.clone()), Key::from(boom.clone()));
/// assert_ne!(Key::from(boom), Key::from(OpaqueKey::new(vec![1u8, 2, 3])));
/// ```
#[derive(Clone)]
pub struct OpaqueKey(Arc<dyn Any + Send + Sync>);

impl OpaqueKey {
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self(Arc::new(payload))
    }

    /// Borrows the payload if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    #[inline]
    fn address(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for OpaqueKey {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl Eq for OpaqueKey {}

impl Hash for OpaqueKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl fmt::Debug for OpaqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueKey({:#x})", self.address())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(true) => write!(f, "True"),
            Key::Bool(false) => write!(f, "False"),
            Key::Int(n) => write!(f, "{n}"),
            Key::Str(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Key::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Key::Opaque(_) => write!(f, "<opaque key>"),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Int(i64::from(value))
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Key::Bool(value)
    }
}

impl From<OpaqueKey> for Key {
    fn from(value: OpaqueKey) -> Self {
        Key::Opaque(value)
    }
}

impl From<Vec<Key>> for Key {
    fn from(value: Vec<Key>) -> Self {
        Key::Tuple(value)
    }
}

impl<A: Into<Key>, B: Into<Key>> From<(A, B)> for Key {
    fn from((a, b): (A, B)) -> Self {
        Key::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Key>, B: Into<Key>, C: Into<Key>> From<(A, B, C)> for Key {
    fn from((a, b, c): (A, B, C)) -> Self {
        Key::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn string_key_display() {
        assert_eq!(Key::from("one").to_string(), "'one'");
        assert_eq!(Key::from("it's").to_string(), "'it\\'s'");
    }

    #[test]
    fn tuple_key_display() {
        assert_eq!(Key::from(("x", 1)).to_string(), "('x', 1)");
        assert_eq!(Key::Tuple(vec![Key::Int(1)]).to_string(), "(1,)");
    }

    #[test]
    fn bool_key_display() {
        assert_eq!(Key::from(true).to_string(), "True");
    }

    #[test]
    fn bool_keys_alias_integers() {
        assert_eq!(Key::from(true), Key::from(1));
        assert_eq!(Key::from(false), Key::from(0));
        assert_ne!(Key::from(true), Key::from(2));
        assert_eq!(Key::from((true, "x")), Key::from((1, "x")));

        let mut map = HashMap::new();
        map.insert(Key::from(1), "one");
        assert_eq!(map.get(&Key::from(true)), Some(&"one"));
        assert_eq!(Key::from(false).as_index(), Some(0));
        assert_eq!(Key::from("1").as_index(), None);
    }

    #[test]
    fn tuple_keys_equal_by_value() {
        assert_eq!(Key::from(("x", 1)), Key::from(("x", 1)));
        assert_ne!(Key::from(("x", 1)), Key::from(("x", 2)));
    }

    #[test]
    fn opaque_key_identity() {
        let a = OpaqueKey::new("hello");
        let b = OpaqueKey::new("hello");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.downcast_ref::<&str>(), Some(&"hello"));
        assert_eq!(Key::from(a).to_string(), "<opaque key>");
    }

    #[test]
    fn keys_in_hashmap() {
        let boom = OpaqueKey::new(42u32);
        let mut map = HashMap::new();
        map.insert(Key::from("one"), 1);
        map.insert(Key::from(2), 2);
        map.insert(Key::from(boom.clone()), 3);

        assert_eq!(map.get(&Key::from("one")), Some(&1));
        assert_eq!(map.get(&Key::Int(2)), Some(&2));
        assert_eq!(map.get(&Key::Opaque(boom)), Some(&3));
        assert_eq!(map.get(&Key::from("two")), None);
    }
}
