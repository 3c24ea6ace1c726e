//! Declarations: the recipe for producing a name's value.
//!
//! A container definition maps each name to one [`Declaration`]:
//! - [`Declaration::Value`]: a literal, returned as-is
//! - [`Declaration::Factory`]: a closure called with resolved dependencies
//! - [`Declaration::Nested`]: a sub-container, resolved to a child scope
//! - [`Declaration::Expression`]: a deferred `this` expression

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::container::Container;
use crate::error::{Result, WiringError};
use crate::expression::Expression;
use crate::value::Value;

/// Type alias for factory closures.
///
/// # Why `Arc` and not `Box`?
/// Definitions are cloned on every composition and shared between
/// threads. `Arc` allows cloning without copying the closure.
pub type FactoryFn = Arc<dyn Fn(&Arguments) -> Result<Value> + Send + Sync>;

/// A constructible declaration: dependency names plus a closure.
///
/// Dependencies are resolved in declared order against the same scope
/// before the closure runs. A dependency with a default is only looked
/// up if the scope declares that name.
///
/// # Examples
/// ```
/// use wiring_container::declaration::Factory;
/// use wiring_container::value::Value;
///
/// let add = Factory::new(["one", "two"], |args| {
///     let one = args.get("one")?.as_int().unwrap_or(0);
///     let two = args.get("two")?.as_int().unwrap_or(0);
///     Ok(Value::Int(one + two))
/// })
/// .with_default("two", 2);
///
/// assert_eq!(add.dependencies(), ["one", "two"]);
/// ```
#[derive(Clone)]
pub struct Factory {
    dependencies: Vec<String>,
    defaults: IndexMap<String, Value>,
    build: FactoryFn,
}

impl Factory {
    pub fn new<I, S, F>(dependencies: I, build: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            defaults: IndexMap::new(),
            build: Arc::new(build),
        }
    }

    /// Gives a dependency a fallback value, declaring it if needed.
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if !self.dependencies.contains(&name) {
            self.dependencies.push(name.clone());
        }
        self.defaults.insert(name, value.into());
        self
    }

    #[inline]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    #[inline]
    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.defaults.get(name)
    }

    pub(crate) fn call(&self, arguments: &Arguments) -> Result<Value> {
        (self.build)(arguments)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("dependencies", &self.dependencies)
            .field("defaults", &self.defaults.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolved dependencies handed to a factory closure.
#[derive(Debug)]
pub struct Arguments {
    owner: String,
    values: IndexMap<String, Value>,
}

impl Arguments {
    pub(crate) fn new(owner: impl Into<String>, values: IndexMap<String, Value>) -> Self {
        Self {
            owner: owner.into(),
            values,
        }
    }

    /// Returns the resolved value of a declared dependency.
    ///
    /// # Errors
    /// [`WiringError::MissingArgument`] if the factory never declared `name`.
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| WiringError::MissingArgument {
                factory: self.owner.clone(),
                argument: name.to_string(),
            })
    }

    /// Name of the declaration being constructed.
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

/// The recorded recipe for one name.
#[derive(Debug, Clone)]
pub enum Declaration {
    Value(Value),
    Factory(Factory),
    Nested(Container),
    Expression(Expression),
}

impl Declaration {
    pub fn kind(&self) -> &'static str {
        match self {
            Declaration::Value(_) => "value",
            Declaration::Factory(_) => "factory",
            Declaration::Nested(_) => "container",
            Declaration::Expression(_) => "expression",
        }
    }
}

impl From<Value> for Declaration {
    fn from(value: Value) -> Self {
        Declaration::Value(value)
    }
}

impl From<Factory> for Declaration {
    fn from(value: Factory) -> Self {
        Declaration::Factory(value)
    }
}

impl From<Container> for Declaration {
    fn from(value: Container) -> Self {
        Declaration::Nested(value)
    }
}

impl From<Expression> for Declaration {
    fn from(value: Expression) -> Self {
        Declaration::Expression(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::this;

    fn args(pairs: &[(&str, i64)]) -> Arguments {
        Arguments::new(
            "sum",
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), Value::Int(*v)))
                .collect(),
        )
    }

    #[test]
    fn factory_calls_closure_with_arguments() {
        let factory = Factory::new(["a", "b"], |args| {
            let a = args.get("a")?.as_int().unwrap_or_default();
            let b = args.get("b")?.as_int().unwrap_or_default();
            Ok(Value::Int(a + b))
        });

        let result = factory.call(&args(&[("a", 1), ("b", 2)])).unwrap();
        assert_eq!(result, Value::Int(3));
    }

    #[test]
    fn undeclared_argument_is_reported() {
        let factory = Factory::new(["a"], |args| args.get("c").cloned());

        match factory.call(&args(&[("a", 1)])).unwrap_err() {
            WiringError::MissingArgument { factory, argument } => {
                assert_eq!(factory, "sum");
                assert_eq!(argument, "c");
            }
            other => panic!("Expected MissingArgument, got: {other:?}"),
        }
    }

    #[test]
    fn default_declares_dependency_once() {
        let factory = Factory::new(["a"], |_| Ok(Value::None))
            .with_default("a", 1)
            .with_default("b", 2);

        assert_eq!(factory.dependencies(), ["a", "b"]);
        assert_eq!(factory.default_for("b"), Some(&Value::Int(2)));
        assert_eq!(factory.default_for("c"), None);
    }

    #[test]
    fn declaration_kinds() {
        assert_eq!(Declaration::from(Value::Int(1)).kind(), "value");
        assert_eq!(Declaration::from(this().attr("x")).kind(), "expression");
        assert_eq!(
            Declaration::from(Factory::new(Vec::<String>::new(), |_| Ok(Value::None))).kind(),
            "factory"
        );
    }
}
