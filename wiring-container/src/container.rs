//! # The Container — heart of Wiring
//!
//! A container is an immutable definition: an ordered set of named
//! declarations. Nothing is constructed until a name is resolved, and
//! every resolution starts from a fresh root [`Scope`].
//!
//! # Architecture
//! ```text
//! ContainerBuilder  ──build()──>  Container  ──extend()──>  ContainerBuilder
//!                                    │
//!                                 root()
//!                                    │
//!                                    ▼
//!                                  Scope  ──resolve("sub")──>  child Scope
//! ```
//!
//! # Examples
//! ```rust
//! use wiring_container::prelude::*;
//!
//! let sub = Container::builder()
//!     .named("SubContainer")
//!     .link("bar", this().up(1).unwrap().attr("foo"))
//!     .build()
//!     .expect("Failed to build sub container");
//!
//! let container = Container::builder()
//!     .named("Container")
//!     .value("foo", Value::map([("one", 1)]))
//!     .link("one", this().attr("foo").item("one"))
//!     .nested("SubContainer", sub)
//!     .build()
//!     .expect("Failed to build container");
//!
//! assert_eq!(container.resolve("one").unwrap(), Value::Int(1));
//!
//! let bar = container.resolve_path(&["SubContainer", "bar"]).unwrap();
//! assert_eq!(bar, Value::map([("one", 1)]));
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::declaration::{Arguments, Declaration, Factory};
use crate::error::{Result, WiringError};
use crate::expression::Expression;
use crate::provider::{DeclarationSink, Provider};
use crate::registry::Registry;
use crate::scope::Scope;
use crate::value::Value;

/// Name given to containers built without [`ContainerBuilder::named`].
pub const DEFAULT_NAME: &str = "Injector";

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`] from named declarations.
///
/// Declare every name, then call [`build()`](ContainerBuilder::build)
/// to validate the definition and freeze it.
///
/// # Examples
/// ```rust,ignore
/// let container = Container::builder()
///     .named("App")
///     .value("url", "postgres://localhost")
///     .factory("db", ["url"], |args| Ok(connect(args.get("url")?)))
///     .link("timeout", this().attr("settings").item("timeout"))
///     .nested("settings", settings)
///     .build()?;
/// ```
pub struct ContainerBuilder {
    name: String,
    registry: Registry,
    allow_override: bool,
    error: Option<WiringError>,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            registry: Registry::new(),
            allow_override: false,
            error: None,
        }
    }

    /// Name reported in error messages.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Allow re-declaring names that are already declared.
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.allow_override = allow;
        self
    }

    // ── Literals ──

    /// Declare a literal value, returned as-is on every resolve.
    pub fn value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.declare(name, Declaration::Value(value.into()))
    }

    // ── Factories ──

    /// Declare a factory called with its resolved dependencies.
    ///
    /// Called on EVERY resolve; results are not cached.
    pub fn factory<I, S, F>(self, name: impl Into<String>, dependencies: I, build: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        self.declare(name, Declaration::Factory(Factory::new(dependencies, build)))
    }

    // ── Nested containers ──

    /// Declare a sub-container. Its expressions can reach this
    /// container with `this().up(1)`.
    pub fn nested(self, name: impl Into<String>, container: Container) -> Self {
        self.declare(name, Declaration::Nested(container))
    }

    // ── Deferred expressions ──

    /// Declare a name as a deferred `this` expression.
    pub fn link(self, name: impl Into<String>, expression: Expression) -> Self {
        self.declare(name, Declaration::Expression(expression))
    }

    /// Declare any [`Declaration`].
    pub fn declare(mut self, name: impl Into<String>, declaration: impl Into<Declaration>) -> Self {
        self.declare_internal(name.into(), declaration.into());
        self
    }

    // ── Provider modules ──

    /// Add a [`Provider`] module.
    pub fn add_provider(mut self, provider: &dyn Provider) -> Self {
        debug!(provider = provider.name(), "Adding provider");
        provider.register(&mut self);
        self
    }

    // ── Build ──

    /// Build the container, validating the definition.
    ///
    /// # Errors
    /// - the first [`WiringError::AlreadyRegistered`] hit while declaring
    /// - [`WiringError::BareProxy`] if a name is declared as a placeholder
    ///   without any attribute or item access
    #[instrument(skip(self), fields(container = %self.name), name = "container_build")]
    pub fn build(self) -> Result<Container> {
        if let Some(error) = self.error {
            return Err(error);
        }

        info!(declared = self.registry.len(), "Building container");

        for (name, declaration) in self.registry.iter() {
            if let Declaration::Expression(expression) = declaration {
                if expression.is_bare() {
                    debug!(name, %expression, "Rejecting bare placeholder");
                    return Err(WiringError::BareProxy);
                }
            }
        }

        info!("Container built successfully ✓");
        Ok(Container {
            name: self.name.into(),
            registry: Arc::new(self.registry),
        })
    }

    // ── Internal ──

    fn declare_internal(&mut self, name: String, declaration: Declaration) {
        if let Err(error) = self.registry.register(name, declaration, self.allow_override) {
            self.error.get_or_insert(error);
        }
    }
}

// Providers declare into the builder
impl DeclarationSink for ContainerBuilder {
    fn declare(&mut self, name: &str, declaration: Declaration) {
        self.declare_internal(name.to_string(), declaration);
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Immutable, thread-safe container definition.
///
/// Created by [`ContainerBuilder::build()`]. Cloning is cheap and clones
/// share the same declarations.
#[derive(Clone)]
pub struct Container {
    name: Arc<str>,
    registry: Arc<Registry>,
}

impl Container {
    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Name reported in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a fresh root scope.
    ///
    /// Use one root for several lookups that should share nested
    /// sub-container scopes.
    pub fn root(&self) -> Scope {
        Scope::root(self.clone())
    }

    /// Resolve a name in a fresh root scope.
    ///
    /// ```rust,ignore
    /// let db = container.resolve("db")?;
    /// ```
    pub fn resolve(&self, name: &str) -> Result<Value> {
        self.root().resolve(name)
    }

    /// Resolve a chain of names starting at a fresh root scope.
    ///
    /// ```rust,ignore
    /// let bar = container.resolve_path(&["SubContainer", "bar"])?;
    /// ```
    pub fn resolve_path(&self, path: &[&str]) -> Result<Value> {
        self.root().resolve_path(path)
    }

    /// The declaration of `name`, if declared.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.registry.get(name)
    }

    /// True if `name` is declared.
    pub fn declares(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// The sub-container declared as `name`, if any.
    pub fn nested(&self, name: &str) -> Option<&Container> {
        match self.registry.get(name) {
            Some(Declaration::Nested(container)) => Some(container),
            _ => None,
        }
    }

    /// Declared names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // ── Composition ──

    /// Start a new definition from this one.
    ///
    /// The builder is seeded with every declaration and allows
    /// overriding. This container is left untouched.
    pub fn extend(&self) -> ContainerBuilder {
        ContainerBuilder {
            name: self.name.to_string(),
            registry: (*self.registry).clone(),
            allow_override: true,
            error: None,
        }
    }

    /// Compose this definition with named overrides.
    ///
    /// Overriding a sub-container replaces it wholesale; to change only
    /// part of it, pass `self.nested(name)` composed with its own
    /// overrides.
    ///
    /// # Errors
    /// Same as [`ContainerBuilder::build`].
    pub fn with_overrides<I, S, D>(&self, overrides: I) -> Result<Container>
    where
        I: IntoIterator<Item = (S, D)>,
        S: Into<String>,
        D: Into<Declaration>,
    {
        overrides
            .into_iter()
            .fold(self.extend(), |builder, (name, declaration)| {
                builder.declare(name, declaration)
            })
            .build()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.name())
            .field("declared", &self.registry.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::declaration::{Arguments, Declaration, Factory};
    pub use crate::error::{Result, WiringError};
    pub use crate::expression::{Expression, this};
    pub use crate::key::{Key, OpaqueKey};
    pub use crate::provider::{DeclarationSink, Provider};
    pub use crate::scope::Scope;
    pub use crate::value::{Object, Record, Value};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
