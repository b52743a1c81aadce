//! Concurrent combinator.
//!
//! [`Concurrent`] advances several nodes within the same tick and folds their
//! latest values into one through a resolution function.

use tracing::trace;

use crate::error::Result;
use crate::state::{Node, apply_all};

/// Stateless function folding the members' latest values into one value.
///
/// A plain function pointer rather than a closure, so it cannot capture state.
pub type Resolve<T, R> = fn(&[T]) -> R;

/// Ticks every member on every update and resolves their values.
///
/// # Semantics
///
/// - Every member is updated every tick, in list order, regardless of what
///   the others report. There is no short-circuiting.
/// - [`value`](Node::value) applies the resolution function to the values of
///   the members that currently have one. Members without a value are left
///   out; when none has a value the group has none either.
/// - The group runs while any member runs.
/// - Reset and dispose reach every member, in list order.
///
/// Finished members are kept and keep being updated, which is a no-op for
/// finished coroutines.
pub struct Concurrent<T, R> {
    children: Vec<Box<dyn Node<T>>>,
    resolve: Resolve<T, R>,
}

impl<T, R> Concurrent<T, R> {
    /// Creates a group from a resolution function and its members.
    pub fn new(resolve: Resolve<T, R>, children: Vec<Box<dyn Node<T>>>) -> Self {
        Self { children, resolve }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Latest values of the members, in list order, `None` where a member has
    /// no value.
    pub fn member_values(&self) -> Vec<Option<T>> {
        self.children.iter().map(|child| child.value()).collect()
    }
}

impl<T, R> Node<R> for Concurrent<T, R> {
    fn value(&self) -> Option<R> {
        let values: Vec<T> = self.children.iter().filter_map(|child| child.value()).collect();
        if values.is_empty() {
            return None;
        }
        Some((self.resolve)(&values))
    }

    fn is_running(&self) -> bool {
        self.children.iter().any(|child| child.is_running())
    }

    fn update(&mut self) -> Result<()> {
        trace!(members = self.children.len(), "concurrent update");
        apply_all(&mut self.children, |child| child.update())
    }

    fn reset(&mut self) -> Result<()> {
        apply_all(&mut self.children, |child| child.reset())
    }

    fn dispose(&mut self) -> Result<()> {
        apply_all(&mut self.children, |child| child.dispose())
    }
}
