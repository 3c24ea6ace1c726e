//! Declaration registry — stores the declarations of one container.
//!
//! The registry maps names to [`Declaration`]s in declaration order.
//! It is populated by the builder and becomes immutable once the
//! container is built; composition copies it instead of mutating it.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::declaration::Declaration;
use crate::error::{AlreadyRegisteredError, WiringError};

/// Stores all declarations of a container.
#[derive(Debug, Clone, Default)]
pub(crate) struct Registry {
    declarations: IndexMap<String, Declaration>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name`.
    ///
    /// # Errors
    /// Returns [`WiringError::AlreadyRegistered`] if the name is
    /// already declared and `allow_override` is false.
    pub fn register(
        &mut self,
        name: String,
        declaration: Declaration,
        allow_override: bool,
    ) -> Result<(), WiringError> {
        if !allow_override && self.declarations.contains_key(&name) {
            return Err(WiringError::AlreadyRegistered(AlreadyRegisteredError {
                name,
            }));
        }

        debug!(name = %name, kind = declaration.kind(), "Declared");
        self.declarations.insert(name, declaration);
        Ok(())
    }

    /// Looks up a declaration by name.
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        let found = self.declarations.get(name);
        trace!(name, found = found.is_some(), "Registry lookup");
        found
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    /// Returns the declared names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.declarations.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Declaration)> {
        self.declarations.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::this;
    use crate::value::Value;

    #[test]
    fn register_and_get() {
        let mut reg = Registry::new();
        reg.register("foo".into(), Value::Int(1).into(), false).unwrap();
        assert!(reg.get("foo").is_some());
        assert!(reg.get("bar").is_none());
        assert!(reg.contains("foo"));
    }

    #[test]
    fn duplicate_fails() {
        let mut reg = Registry::new();
        reg.register("foo".into(), Value::Int(1).into(), false).unwrap();
        let err = reg
            .register("foo".into(), Value::Int(2).into(), false)
            .unwrap_err();
        assert!(matches!(err, WiringError::AlreadyRegistered(_)));
    }

    #[test]
    fn duplicate_with_override_replaces() {
        let mut reg = Registry::new();
        reg.register("foo".into(), Value::Int(1).into(), false).unwrap();
        reg.register("foo".into(), this().attr("bar").into(), true).unwrap();

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("foo").map(Declaration::kind), Some("expression"));
    }

    #[test]
    fn names_keep_declaration_order() {
        let mut reg = Registry::new();
        for name in ["zeta", "alpha", "mid"] {
            reg.register(name.into(), Value::None.into(), false).unwrap();
        }
        assert_eq!(reg.names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn clone_is_independent() {
        let mut base = Registry::new();
        base.register("foo".into(), Value::Int(1).into(), false).unwrap();

        let mut copy = base.clone();
        copy.register("foo".into(), Value::Int(2).into(), true).unwrap();
        copy.register("bar".into(), Value::Int(3).into(), false).unwrap();

        assert_eq!(base.len(), 1);
        assert!(matches!(base.get("foo"), Some(Declaration::Value(Value::Int(1)))));
    }
}
