//! Error types for Wiring resolution and definition.
//!
//! Messages follow the conventions users of the declarative container
//! already know: `'Container' object has no attribute 'bar'`,
//! `'foo' is a circle link in the 'Container' injector`, and so on.
//! Structured data (suggestions, the full cycle chain) lives on the
//! payload structs rather than in the message.

use std::fmt;

use wiring_support::rendering::render_chain;

use crate::key::Key;

/// Message of [`WiringError::InvalidArgument`] for a bad ascend count.
pub const POSITIVE_INTEGER_REQUIRED: &str = "Positive integer argument is required";

/// Message of [`WiringError::InvalidArgument`] for an ascend after other steps.
pub const ASCEND_NOT_FIRST: &str = "Ascend must be the first operation of an expression";

/// Main error type for all Wiring operations.
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    /// An expression builder was given an unusable argument.
    #[error("{0}")]
    InvalidArgument(&'static str),

    /// A placeholder that points at a container rather than a value.
    #[error("You can not use 'this' directly in the 'Injector'")]
    BareProxy,

    /// An expression ascends more levels than the scope has parents.
    #[error("You tries to shift this more times that Injector has levels")]
    InsufficientScope,

    /// Attribute lookup on a container or plain object failed.
    #[error("{}", .0)]
    AttributeNotFound(AttributeNotFoundError),

    /// Item lookup on a map failed. The message is the key's repr.
    #[error("{key}")]
    KeyNotFound { key: Key },

    /// Item lookup on a sequence was out of range.
    #[error("{kind} index out of range")]
    IndexNotFound { kind: &'static str, index: i64 },

    /// Item lookup on a value that does not support that key.
    #[error("'{type_name}' object is not subscriptable by {key_kind} keys")]
    NotSubscriptable {
        type_name: String,
        key_kind: &'static str,
    },

    /// A name was re-entered while it was still being resolved.
    #[error("{}", .0)]
    CircularReference(CircularReferenceError),

    /// A factory failed with a foreign error.
    #[error("Failed to construct '{name}': {source}")]
    ConstructionFailed {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A factory asked for an argument it did not declare.
    #[error("'{factory}' did not declare a dependency named '{argument}'")]
    MissingArgument { factory: String, argument: String },

    /// A name was declared twice while overriding was disabled.
    #[error("{}", .0)]
    AlreadyRegistered(AlreadyRegisteredError),
}

impl WiringError {
    /// Wraps a foreign factory error.
    pub fn construction(
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        WiringError::ConstructionFailed {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Error when an attribute is not declared on its target.
#[derive(Debug)]
pub struct AttributeNotFoundError {
    /// Container name or plain object type name
    pub owner: String,
    /// The attribute that was requested
    pub attribute: String,
    /// Declared names close to the requested one
    pub suggestions: Vec<String>,
}

impl fmt::Display for AttributeNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' object has no attribute '{}'",
            self.owner, self.attribute
        )
    }
}

/// Error when resolution re-enters a name that is still being resolved.
///
/// `chain` holds every `Container.attribute` hop from the first
/// occurrence of the repeated pair to its re-entry.
#[derive(Debug)]
pub struct CircularReferenceError {
    pub attribute: String,
    /// Container where the cycle closed
    pub container: String,
    pub chain: Vec<String>,
}

impl CircularReferenceError {
    /// The cycle as `A.foo → B.bar → A.foo`.
    pub fn render_chain(&self) -> String {
        render_chain(&self.chain)
    }
}

impl fmt::Display for CircularReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is a circle link in the '{}' injector",
            self.attribute, self.container
        )
    }
}

/// Error when a name is declared twice.
#[derive(Debug)]
pub struct AlreadyRegisteredError {
    pub name: String,
}

impl fmt::Display for AlreadyRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name already declared: '{}'", self.name)?;
        write!(
            f,
            "\n  Hint: Use .extend() or .allow_override(true) to replace a declaration"
        )
    }
}

/// Convenient Result type for Wiring operations.
pub type Result<T> = std::result::Result<T, WiringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_messages() {
        assert_eq!(
            WiringError::InvalidArgument(POSITIVE_INTEGER_REQUIRED).to_string(),
            "Positive integer argument is required"
        );
        assert_eq!(
            WiringError::BareProxy.to_string(),
            "You can not use 'this' directly in the 'Injector'"
        );
        assert_eq!(
            WiringError::InsufficientScope.to_string(),
            "You tries to shift this more times that Injector has levels"
        );
    }

    #[test]
    fn attribute_not_found_display() {
        let err = WiringError::AttributeNotFound(AttributeNotFoundError {
            owner: "Container".into(),
            attribute: "bar".into(),
            suggestions: vec!["baz".into()],
        });

        assert_eq!(err.to_string(), "'Container' object has no attribute 'bar'");
    }

    #[test]
    fn circular_reference_display() {
        let err = CircularReferenceError {
            attribute: "foo".into(),
            container: "Container".into(),
            chain: vec![
                "Container.foo".into(),
                "SubContainer.bar".into(),
                "Container.foo".into(),
            ],
        };

        assert_eq!(err.to_string(), "'foo' is a circle link in the 'Container' injector");
        assert_eq!(err.render_chain(), "Container.foo → SubContainer.bar → Container.foo");
    }

    #[test]
    fn key_not_found_is_key_repr() {
        let err = WiringError::KeyNotFound { key: Key::from("one") };
        assert_eq!(err.to_string(), "'one'");
    }

    #[test]
    fn index_not_found_display() {
        let err = WiringError::IndexNotFound { kind: "list", index: 5 };
        assert_eq!(err.to_string(), "list index out of range");
    }

    #[test]
    fn construction_failed_keeps_source() {
        use std::error::Error;

        let err = WiringError::construction("db", "connection refused");
        assert_eq!(err.to_string(), "Failed to construct 'db': connection refused");
        assert!(err.source().is_some());
    }
}
