//! The resolver: turns a `(scope, name)` pair into a value.
//!
//! # Algorithm
//! 1. Look the name up in the scope's container, else `AttributeNotFound`.
//! 2. Enter `(scope, name)` on this thread's resolution path, else
//!    `CircularReference`.
//! 3. Evaluate the declaration:
//!    - literal: cloned as-is
//!    - factory: dependencies resolved in declared order in the same scope,
//!      then the closure is called
//!    - nested container: the (cached) child scope
//!    - expression: ascend, then replay each step
//! 4. Leave the path on every exit, success or error.
//!
//! A resolution started while another is active on the same thread (a
//! factory closure reading a sub-container it was handed) joins the
//! active path.

use indexmap::IndexMap;
use tracing::{instrument, trace};
use wiring_support::rendering::suggest_similar;

use crate::declaration::{Arguments, Declaration, Factory};
use crate::error::{AttributeNotFoundError, Result, WiringError};
use crate::expression::{Expression, Step};
use crate::guard;
use crate::scope::Scope;
use crate::value::Value;

/// Resolves `name` in `scope`.
#[instrument(skip(scope), fields(container = %scope.name(), depth = scope.depth()), name = "resolve")]
pub(crate) fn resolve(scope: &Scope, name: &str) -> Result<Value> {
    resolve_in(scope, name, None)
}

fn resolve_in(scope: &Scope, name: &str, via: Option<&Expression>) -> Result<Value> {
    let declaration = scope
        .container()
        .declaration(name)
        .ok_or_else(|| not_found(scope, name))?;

    let _entered = guard::enter(scope, name, via)?;
    trace!(
        container = scope.name(),
        name,
        kind = declaration.kind(),
        depth = guard::depth(),
        "Resolving"
    );

    evaluate(scope, name, declaration)
}

fn evaluate(scope: &Scope, name: &str, declaration: &Declaration) -> Result<Value> {
    match declaration {
        Declaration::Value(value) => Ok(value.clone()),
        Declaration::Factory(factory) => construct(scope, name, factory),
        Declaration::Nested(container) => Ok(Value::Scope(scope.child(name, container))),
        Declaration::Expression(expression) => replay(scope, expression),
    }
}

/// Resolves each dependency, then calls the factory.
///
/// The first failing dependency wins; errors are not wrapped.
fn construct(scope: &Scope, name: &str, factory: &Factory) -> Result<Value> {
    let mut values = IndexMap::with_capacity(factory.dependencies().len());

    for dependency in factory.dependencies() {
        let value = match factory.default_for(dependency) {
            Some(default) if !scope.container().declares(dependency) => default.clone(),
            _ => resolve_in(scope, dependency, None)?,
        };
        values.insert(dependency.clone(), value);
    }

    factory.call(&Arguments::new(name, values))
}

/// Replays a deferred expression against `scope`.
fn replay(scope: &Scope, expression: &Expression) -> Result<Value> {
    if expression.is_bare() {
        return Err(WiringError::BareProxy);
    }

    let target = scope
        .ancestor(expression.levels())
        .ok_or(WiringError::InsufficientScope)?;

    let mut base = Value::Scope(target);
    for step in expression.steps() {
        let next = match (step, &base) {
            (Step::Attribute(attribute), Value::Scope(inner)) => {
                resolve_in(inner, attribute, Some(expression))?
            }
            (Step::Attribute(attribute), other) => other.attr(attribute)?,
            (Step::Item(key), other) => other.item(key)?,
        };
        base = next;
    }

    Ok(base)
}

fn not_found(scope: &Scope, name: &str) -> WiringError {
    let names = scope.container().names();
    WiringError::AttributeNotFound(AttributeNotFoundError {
        owner: scope.name().to_string(),
        attribute: name.to_string(),
        suggestions: suggest_similar(name, &names, 3),
    })
}
