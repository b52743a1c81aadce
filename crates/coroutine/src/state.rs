//! Polling state contract.
//!
//! This module defines the [`Node`] trait, the minimal contract every tickable
//! piece of the system satisfies: coroutine drivers, combinators and behavior
//! nodes alike. Nodes are advanced by an external caller, one tick at a time.

use crate::control_flow::{Adapt, TrueWhileRunning};
use crate::error::{FirstError, Result};

/// A node that is polled once per external tick.
///
/// # Contract
///
/// - [`value`](Node::value) is the latest value the node produced, if any.
/// - [`update`](Node::update) advances the node by exactly one tick. It is not
///   reentrant; `&mut self` rules out ticking a node from inside its own tick.
/// - [`reset`](Node::reset) aborts in-flight work, running pending cleanup,
///   and returns the node to its initial state.
/// - [`dispose`](Node::dispose) permanently releases the node, running pending
///   cleanup. Calling it more than once is a no-op.
pub trait Node<T> {
    /// Returns the node's latest value, or `None` if it has none.
    fn value(&self) -> Option<T>;

    /// Returns `true` if [`value`](Node::value) would return `Some`.
    fn has_value(&self) -> bool {
        self.value().is_some()
    }

    /// Returns `true` while the node still has work to do.
    ///
    /// A node embedded through a call instruction is considered complete once
    /// this returns `false`.
    fn is_running(&self) -> bool;

    /// Advances the node by one tick.
    fn update(&mut self) -> Result<()>;

    /// Aborts in-flight work and restarts from the beginning on the next tick.
    fn reset(&mut self) -> Result<()>;

    /// Permanently releases the node, running all pending cleanup.
    fn dispose(&mut self) -> Result<()>;
}

/// Blanket implementation for boxed nodes.
///
/// This allows `Box<dyn Node<T>>` to also implement `Node<T>`, enabling
/// heterogeneous child lists in combinators.
impl<T> Node<T> for Box<dyn Node<T>> {
    #[inline]
    fn value(&self) -> Option<T> {
        (**self).value()
    }

    #[inline]
    fn has_value(&self) -> bool {
        (**self).has_value()
    }

    #[inline]
    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    #[inline]
    fn update(&mut self) -> Result<()> {
        (**self).update()
    }

    #[inline]
    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    #[inline]
    fn dispose(&mut self) -> Result<()> {
        (**self).dispose()
    }
}

/// Combinator methods available on every node.
pub trait NodeExt<T: 'static>: Node<T> + Sized + 'static {
    /// Re-expresses this node's values through `transform`.
    fn adapt<B, F>(self, transform: F) -> Adapt<T, B>
    where
        F: Fn(T) -> B + 'static,
    {
        Adapt::new(self, transform)
    }

    /// Produces `true` while this node runs and `false` once it has stopped.
    fn true_while_running(self) -> TrueWhileRunning<T> {
        TrueWhileRunning::new(self)
    }

    /// Erases the node's concrete type.
    fn boxed(self) -> Box<dyn Node<T>> {
        Box::new(self)
    }
}

impl<T: 'static, N: Node<T> + 'static> NodeExt<T> for N {}

/// Applies `op` to every node in order, even if some of them fail.
///
/// Returns the first failure; later failures are logged.
pub fn apply_all<N, F>(nodes: &mut [N], mut op: F) -> Result<()>
where
    F: FnMut(&mut N) -> Result<()>,
{
    let mut errors = FirstError::default();
    for node in nodes.iter_mut() {
        errors.record(op(node));
    }
    errors.finish()
}
