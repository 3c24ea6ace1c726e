//! Cycle guard: the set of names currently being resolved.
//!
//! Each thread owns one [`ResolutionPath`]. Every resolution on that
//! thread joins it, including lookups a factory closure makes on the
//! values it was handed, so a cycle routed through user code is caught
//! like any other. It detects re-entry into a `(scope, name)` pair that
//! is still on the call stack, which is the only way resolution can
//! recurse forever.
//!
//! Pairs are keyed by frame identity rather than by container definition,
//! so two scopes built from the same nested container never share state.

use std::cell::RefCell;
use std::collections::HashSet;

use tracing::warn;
use wiring_support::rendering::{PathEntry, render_path_vertical};

use crate::error::{CircularReferenceError, WiringError};
use crate::expression::Expression;
use crate::scope::{FrameId, Scope};

thread_local! {
    static ACTIVE: RefCell<ResolutionPath> = RefCell::new(ResolutionPath::new());
}

/// Enters `(scope, name)` on this thread's path.
///
/// The pair stays on the path until the returned [`Entered`] is dropped,
/// so it is removed on every exit, including unwinding out of a factory.
///
/// # Errors
/// [`WiringError::CircularReference`] if the pair is already being resolved.
pub(crate) fn enter(
    scope: &Scope,
    name: &str,
    via: Option<&Expression>,
) -> Result<Entered, WiringError> {
    ACTIVE.with(|path| path.borrow_mut().enter(scope, name, via))?;
    Ok(Entered { _private: () })
}

/// Number of names being resolved on this thread.
pub(crate) fn depth() -> usize {
    ACTIVE.with(|path| path.borrow().depth())
}

/// Keeps one pair on the active path.
#[must_use]
pub(crate) struct Entered {
    _private: (),
}

impl Drop for Entered {
    fn drop(&mut self) {
        // The slot is gone only during thread teardown
        let _ = ACTIVE.try_with(|path| path.borrow_mut().leave());
    }
}

/// One `(scope, name)` pair on the active path.
#[derive(Debug)]
struct Hop {
    frame: FrameId,
    container: String,
    attribute: String,
    /// Expression whose replay requested this hop
    via: Option<Expression>,
}

/// Names currently being resolved, innermost last.
#[derive(Debug, Default)]
pub(crate) struct ResolutionPath {
    active: HashSet<(FrameId, String)>,
    stack: Vec<Hop>,
}

impl ResolutionPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `(scope, name)` onto the path.
    ///
    /// # Errors
    /// [`WiringError::CircularReference`] if the pair is already on the
    /// path. The path is left unchanged in that case.
    pub fn enter(
        &mut self,
        scope: &Scope,
        name: &str,
        via: Option<&Expression>,
    ) -> Result<(), WiringError> {
        let key = (scope.id(), name.to_string());

        if self.active.contains(&key) {
            let start = self
                .stack
                .iter()
                .position(|hop| hop.frame == key.0 && hop.attribute == name)
                .unwrap_or(0);

            let mut entries: Vec<PathEntry> = self.stack[start..]
                .iter()
                .map(|hop| PathEntry {
                    container: hop.container.clone(),
                    attribute: hop.attribute.clone(),
                    via: hop.via.as_ref().map(ToString::to_string),
                })
                .collect();
            entries.push(PathEntry {
                container: scope.name().to_string(),
                attribute: name.to_string(),
                via: via.map(ToString::to_string),
            });

            warn!(
                attribute = name,
                container = scope.name(),
                "Circular reference detected!\n{}",
                render_path_vertical(&entries)
            );

            return Err(WiringError::CircularReference(CircularReferenceError {
                attribute: name.to_string(),
                container: scope.name().to_string(),
                chain: entries
                    .into_iter()
                    .map(|e| format!("{}.{}", e.container, e.attribute))
                    .collect(),
            }));
        }

        self.active.insert(key);
        self.stack.push(Hop {
            frame: scope.id(),
            container: scope.name().to_string(),
            attribute: name.to_string(),
            via: via.cloned(),
        });
        Ok(())
    }

    /// Pops the innermost pair.
    pub fn leave(&mut self) {
        if let Some(hop) = self.stack.pop() {
            self.active.remove(&(hop.frame, hop.attribute));
        }
    }

    /// Number of pairs on the path.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::expression::this;

    fn scope(name: &str) -> Scope {
        Container::builder().named(name).build().unwrap().root()
    }

    #[test]
    fn enter_and_leave() {
        let root = scope("Container");
        let mut path = ResolutionPath::new();

        path.enter(&root, "foo", None).unwrap();
        path.enter(&root, "bar", None).unwrap();
        assert_eq!(path.depth(), 2);

        path.leave();
        path.leave();
        assert_eq!(path.depth(), 0);

        // Leaving cleared the pair, so it can be entered again
        path.enter(&root, "foo", None).unwrap();
    }

    #[test]
    fn reentry_is_a_cycle() {
        let root = scope("Container");
        let mut path = ResolutionPath::new();

        path.enter(&root, "foo", None).unwrap();
        let err = path.enter(&root, "foo", Some(&this().attr("foo"))).unwrap_err();

        match err {
            WiringError::CircularReference(e) => {
                assert_eq!(e.attribute, "foo");
                assert_eq!(e.container, "Container");
                assert_eq!(e.chain, vec!["Container.foo", "Container.foo"]);
            }
            other => panic!("Expected CircularReference, got: {other:?}"),
        }
        assert_eq!(path.depth(), 1);
    }

    #[test]
    fn chain_starts_at_first_occurrence() {
        let root = scope("Container");
        let mut path = ResolutionPath::new();

        path.enter(&root, "entry", None).unwrap();
        path.enter(&root, "foo", None).unwrap();
        path.enter(&root, "bar", None).unwrap();

        match path.enter(&root, "foo", None).unwrap_err() {
            WiringError::CircularReference(e) => {
                assert_eq!(
                    e.render_chain(),
                    "Container.foo → Container.bar → Container.foo"
                );
            }
            other => panic!("Expected CircularReference, got: {other:?}"),
        }
    }

    #[test]
    fn entered_pair_leaves_on_drop() {
        let root = scope("Container");
        let before = depth();

        {
            let _entered = enter(&root, "foo", None).unwrap();
            assert_eq!(depth(), before + 1);
            assert!(matches!(
                enter(&root, "foo", None),
                Err(WiringError::CircularReference(_))
            ));
        }

        assert_eq!(depth(), before);
        drop(enter(&root, "foo", None).unwrap());
    }

    #[test]
    fn same_name_in_distinct_scopes_is_not_a_cycle() {
        let container = Container::builder().named("Sub").build().unwrap();
        let a = container.root();
        let b = container.root();
        let mut path = ResolutionPath::new();

        path.enter(&a, "foo", None).unwrap();
        assert!(path.enter(&b, "foo", None).is_ok());
    }
}
