//! Provider trait — a module of related declarations.
//!
//! Providers group related declarations together so a large
//! definition can be split by concern.
//!
//! # Examples
//! ```rust
//! use wiring_container::prelude::*;
//!
//! struct DatabaseProvider;
//!
//! impl Provider for DatabaseProvider {
//!     fn register(&self, sink: &mut dyn DeclarationSink) {
//!         sink.declare("url", Value::from("postgres://localhost").into());
//!         sink.declare("database", this().attr("url").into());
//!     }
//! }
//!
//! let container = Container::builder()
//!     .add_provider(&DatabaseProvider)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(container.resolve("database").unwrap(), Value::from("postgres://localhost"));
//! ```

use crate::declaration::Declaration;

/// A module that declares related names into a container builder.
///
/// # Design Philosophy
/// Instead of one giant definition, split declarations by domain:
///
/// ```rust,ignore
/// Container::builder()
///     .add_provider(&DatabaseProvider)
///     .add_provider(&AuthProvider)
///     .add_provider(&EmailProvider)
///     .build()?;
/// ```
pub trait Provider: Send + Sync {
    /// Declare names into the sink.
    ///
    /// Called once per builder the provider is added to.
    fn register(&self, sink: &mut dyn DeclarationSink);

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Where providers send their declarations.
///
/// Implemented by [`ContainerBuilder`](crate::container::ContainerBuilder);
/// the indirection lets providers be tested without building a container.
pub trait DeclarationSink {
    fn declare(&mut self, name: &str, declaration: Declaration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::expression::this;
    use crate::value::Value;

    // Records what a provider declares
    #[derive(Default)]
    struct RecordingSink {
        names: Vec<String>,
    }

    impl DeclarationSink for RecordingSink {
        fn declare(&mut self, name: &str, _declaration: Declaration) {
            self.names.push(name.to_string());
        }
    }

    struct SettingsProvider;

    impl Provider for SettingsProvider {
        fn register(&self, sink: &mut dyn DeclarationSink) {
            sink.declare("settings", Value::map([("timeout", 30)]).into());
            sink.declare("timeout", this().attr("settings").item("timeout").into());
        }
    }

    #[test]
    fn provider_declares_names() {
        let mut sink = RecordingSink::default();
        SettingsProvider.register(&mut sink);
        assert_eq!(sink.names, vec!["settings", "timeout"]);
    }

    #[test]
    fn provider_has_name() {
        assert!(SettingsProvider.name().contains("SettingsProvider"));
    }

    #[test]
    fn builder_accepts_providers() {
        let container = Container::builder()
            .add_provider(&SettingsProvider)
            .build()
            .unwrap();

        assert_eq!(container.resolve("timeout").unwrap(), Value::Int(30));
    }

    #[test]
    fn conflicting_providers_fail_build() {
        let result = Container::builder()
            .add_provider(&SettingsProvider)
            .add_provider(&SettingsProvider)
            .build();

        assert!(matches!(result, Err(crate::error::WiringError::AlreadyRegistered(_))));
    }
}
