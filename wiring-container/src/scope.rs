//! Scope frames: resolution-time instances of containers.
//!
//! A [`Scope`] is what a container becomes while names are being
//! resolved in it. Each scope knows its container definition and owns a
//! link to the scope that contains it, which is how `this << n` finds
//! its target.
//!
//! # Ownership
//! ```text
//! root ◄──── parent ──── SubContainer ◄──── parent ──── SubSubContainer
//!      ····· weak child ···►           ····· weak child ···►
//! ```
//! Children own their parents. Parents only cache weak links to the
//! children they produced, so a nested declaration resolves to the same
//! child scope for as long as anyone holds it, and dropping the last
//! handle frees the whole chain.

use std::fmt;
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tracing::debug;

use crate::container::Container;
use crate::error::Result;
use crate::value::Value;

/// Identity of a frame, used by the cycle guard.
pub(crate) type FrameId = usize;

pub(crate) struct Frame {
    container: Container,
    parent: Option<Arc<Frame>>,
    children: DashMap<String, Weak<Frame>>,
    depth: usize,
}

/// A handle to one container instance in the nesting hierarchy.
///
/// Cloning a scope clones the handle, not the frame. Two roots created
/// from the same container never share frames.
///
/// # Examples
/// ```
/// use wiring_container::prelude::*;
///
/// let sub = Container::builder()
///     .named("SubContainer")
///     .link("bar", this().up(1).unwrap().attr("foo"))
///     .build()
///     .unwrap();
///
/// let container = Container::builder()
///     .named("Container")
///     .value("foo", 1)
///     .nested("SubContainer", sub)
///     .build()
///     .unwrap();
///
/// let root = container.root();
/// let sub = root.resolve("SubContainer").unwrap();
/// let sub = sub.as_scope().unwrap();
///
/// assert_eq!(sub.depth(), 1);
/// assert_eq!(sub.resolve("bar").unwrap(), Value::Int(1));
/// ```
#[derive(Clone)]
pub struct Scope {
    frame: Arc<Frame>,
}

impl Scope {
    /// Creates a fresh root scope for `container`.
    pub(crate) fn root(container: Container) -> Self {
        debug!(container = container.name(), "Creating root scope");
        Self {
            frame: Arc::new(Frame {
                container,
                parent: None,
                children: DashMap::new(),
                depth: 0,
            }),
        }
    }

    /// Returns the child scope for the nested declaration `name`.
    ///
    /// Reuses the cached child while it is alive.
    pub(crate) fn child(&self, name: &str, container: &Container) -> Scope {
        let mut slot = self.frame.children.entry(name.to_string()).or_default();
        if let Some(frame) = slot.upgrade() {
            return Scope { frame };
        }

        debug!(
            parent = self.name(),
            name,
            depth = self.frame.depth + 1,
            "Creating child scope"
        );

        let frame = Arc::new(Frame {
            container: container.clone(),
            parent: Some(self.frame.clone()),
            children: DashMap::new(),
            depth: self.frame.depth + 1,
        });
        *slot = Arc::downgrade(&frame);

        Scope { frame }
    }

    #[inline]
    pub(crate) fn id(&self) -> FrameId {
        Arc::as_ptr(&self.frame) as FrameId
    }

    /// Name of the container this scope instantiates.
    pub fn name(&self) -> &str {
        self.frame.container.name()
    }

    pub fn container(&self) -> &Container {
        &self.frame.container
    }

    /// The enclosing scope, `None` at the root.
    pub fn parent(&self) -> Option<Scope> {
        self.frame
            .parent
            .as_ref()
            .map(|frame| Scope { frame: frame.clone() })
    }

    /// The scope `levels` steps up, `None` if there are not enough parents.
    pub fn ancestor(&self, levels: usize) -> Option<Scope> {
        let mut frame = &self.frame;
        for _ in 0..levels {
            frame = frame.parent.as_ref()?;
        }
        Some(Scope { frame: frame.clone() })
    }

    /// Nesting depth; the root is 0.
    pub fn depth(&self) -> usize {
        self.frame.depth
    }

    /// Resolves `name` in this scope.
    ///
    /// # Errors
    /// Any [`WiringError`](crate::error::WiringError) raised while
    /// resolving the name or its dependencies.
    pub fn resolve(&self, name: &str) -> Result<Value> {
        crate::resolver::resolve(self, name)
    }

    /// Resolves a chain of names, each in the value of the previous one.
    ///
    /// `scope.resolve_path(&["SubContainer", "bar"])` is
    /// `scope.resolve("SubContainer")?.attr("bar")`.
    pub fn resolve_path(&self, path: &[&str]) -> Result<Value> {
        let mut value = Value::Scope(self.clone());
        for name in path {
            value = value.attr(name)?;
        }
        Ok(value)
    }

    /// True when both handles point at the same frame.
    pub fn same_as(&self, other: &Scope) -> bool {
        Arc::ptr_eq(&self.frame, &other.frame)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("container", &self.name())
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> Container {
        Container::builder().named(name).value("x", 1).build().unwrap()
    }

    #[test]
    fn root_has_no_parent() {
        let root = leaf("Container").root();
        assert!(root.parent().is_none());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.name(), "Container");
    }

    #[test]
    fn child_links_to_parent() {
        let root = leaf("Container").root();
        let child = root.child("sub", &leaf("Sub"));

        assert_eq!(child.depth(), 1);
        assert!(child.parent().unwrap().same_as(&root));
        assert!(child.ancestor(1).unwrap().same_as(&root));
        assert!(child.ancestor(0).unwrap().same_as(&child));
        assert!(child.ancestor(2).is_none());
    }

    #[test]
    fn live_child_is_reused() {
        let root = leaf("Container").root();
        let sub = leaf("Sub");

        let first = root.child("sub", &sub);
        let second = root.child("sub", &sub);
        assert!(first.same_as(&second));
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn dropped_child_is_freed() {
        let root = leaf("Container").root();
        let weak = {
            let child = root.child("sub", &leaf("Sub"));
            Arc::downgrade(&child.frame)
        };
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn distinct_roots_do_not_share_frames() {
        let container = leaf("Container");
        let a = container.root();
        let b = container.root();
        assert!(!a.same_as(&b));

        let sub = leaf("Sub");
        assert!(!a.child("sub", &sub).same_as(&b.child("sub", &sub)));
    }

    #[test]
    fn debug_output() {
        let debug = format!("{:?}", leaf("Container").root());
        assert!(debug.contains("Container"));
        assert!(debug.contains("depth"));
    }
}
