//! # Wiring — Declarative Dependency Injection for Rust
//!
//! Describe a graph of named values as data, then resolve names lazily.
//! Deferred `this` expressions let a declaration point at another name
//! in the same container or in any enclosing one.
//!
//! ```rust
//! use wiring::prelude::*;
//!
//! let container = Container::builder()
//!     .named("Container")
//!     .value("foo", 1)
//!     .nested(
//!         "SubContainer",
//!         Container::builder()
//!             .link("bar", this().up(1).unwrap().attr("foo"))
//!             .build()
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(container.resolve_path(&["SubContainer", "bar"]).unwrap(), Value::Int(1));
//! ```

pub use wiring_container::*;
pub use wiring_support::*;
