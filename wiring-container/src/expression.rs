//! Deferred expressions: `this`, `this << n`, `.attr`, `[key]`.
//!
//! An [`Expression`] is an immutable record of where a value lives
//! relative to the container that declares it. Building one never
//! evaluates anything; the resolver replays it later against a
//! [`Scope`](crate::scope::Scope).
//!
//! ```text
//! this().attr("foo").item("one")          this.foo['one']
//! this().up(1)?.attr("foo")               (this << 1).foo
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{ASCEND_NOT_FIRST, POSITIVE_INTEGER_REQUIRED, Result, WiringError};
use crate::key::Key;

/// One accessor step of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Attribute(String),
    Item(Key),
}

/// Declare attribute and item access during dependency injection.
///
/// Every builder method returns a new expression, so one placeholder can
/// start any number of independent chains.
///
/// # Examples
/// ```
/// use wiring_container::expression::this;
///
/// let base = this();
/// let foo = base.attr("foo");
/// let bar = base.attr("bar");
///
/// assert_eq!(foo.to_string(), "this.foo");
/// assert_eq!(bar.to_string(), "this.bar");
/// assert!(base.is_bare());
///
/// let outer = this().up(2).unwrap().attr("config").item("url");
/// assert_eq!(outer.to_string(), "(this << 2).config['url']");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Expression {
    levels: usize,
    steps: Arc<[Step]>,
}

/// The placeholder for "the container being resolved".
pub fn this() -> Expression {
    Expression {
        levels: 0,
        steps: Vec::<Step>::new().into(),
    }
}

impl Expression {
    /// Ascends `levels` containers before replaying the steps.
    ///
    /// # Errors
    /// [`WiringError::InvalidArgument`] when `levels` is not positive, or
    /// when this expression already ascends or already has steps.
    pub fn up(&self, levels: i64) -> Result<Expression> {
        let levels = usize::try_from(levels)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(WiringError::InvalidArgument(POSITIVE_INTEGER_REQUIRED))?;

        if self.levels > 0 || !self.steps.is_empty() {
            return Err(WiringError::InvalidArgument(ASCEND_NOT_FIRST));
        }

        Ok(Expression {
            levels,
            steps: self.steps.clone(),
        })
    }

    pub fn attr(&self, name: impl Into<String>) -> Expression {
        self.push(Step::Attribute(name.into()))
    }

    pub fn item(&self, key: impl Into<Key>) -> Expression {
        self.push(Step::Item(key.into()))
    }

    /// Number of containers to ascend.
    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    #[inline]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// True when the expression names a container instead of a value.
    #[inline]
    pub fn is_bare(&self) -> bool {
        self.steps.is_empty()
    }

    fn push(&self, step: Step) -> Expression {
        let mut steps = self.steps.to_vec();
        steps.push(step);
        Expression {
            levels: self.levels,
            steps: steps.into(),
        }
    }
}

impl Default for Expression {
    fn default() -> Self {
        this()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.levels > 0 {
            write!(f, "(this << {})", self.levels)?;
        } else {
            write!(f, "this")?;
        }

        for step in self.steps.iter() {
            match step {
                Step::Attribute(name) => write!(f, ".{name}")?,
                Step::Item(key) => write!(f, "[{key}]")?,
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expression({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_bare() {
        assert!(this().is_bare());
        assert_eq!(this().levels(), 0);
        assert_eq!(this().to_string(), "this");
    }

    #[test]
    fn ascended_placeholder_is_still_bare() {
        let parent = this().up(1).unwrap();
        assert!(parent.is_bare());
        assert_eq!(parent.levels(), 1);
    }

    #[test]
    fn steps_are_recorded_in_order() {
        let expr = this().attr("foo").item("one").attr("x");
        assert_eq!(
            expr.steps(),
            &[
                Step::Attribute("foo".into()),
                Step::Item(Key::from("one")),
                Step::Attribute("x".into()),
            ]
        );
    }

    #[test]
    fn builders_never_mutate_the_receiver() {
        let base = this().attr("foo");
        let one = base.item("one");
        let two = base.item("two");

        assert_eq!(base.steps().len(), 1);
        assert_ne!(one, two);
        assert_eq!(one.to_string(), "this.foo['one']");
    }

    #[test]
    fn up_rejects_zero_and_negative() {
        for levels in [0, -1, -100, i64::MIN] {
            let err = this().up(levels).unwrap_err();
            assert_eq!(err.to_string(), "Positive integer argument is required");
        }
    }

    #[test]
    fn up_only_at_the_head() {
        let err = this().attr("foo").up(1).unwrap_err();
        assert_eq!(err.to_string(), ASCEND_NOT_FIRST);

        let err = this().up(1).unwrap().up(1).unwrap_err();
        assert!(matches!(err, WiringError::InvalidArgument(_)));
    }

    #[test]
    fn display_renders_the_chain() {
        let expr = this().up(2).unwrap().attr("foo").item(("x", 1)).item(0);
        assert_eq!(expr.to_string(), "(this << 2).foo[('x', 1)][0]");
    }
}
