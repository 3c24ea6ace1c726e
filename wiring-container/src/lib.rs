//! Core resolution engine for Wiring DI.

pub mod container;
pub mod declaration;
pub mod error;
pub mod expression;
pub mod key;
pub mod provider;
pub mod registry;
pub mod scope;
pub mod value;

mod guard;
mod resolver;

pub use container::prelude;
pub use error::{Result, WiringError};
pub use expression::{Expression, this};
pub use key::Key;
pub use scope::Scope;
pub use value::Value;
