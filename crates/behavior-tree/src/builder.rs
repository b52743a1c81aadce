//! Builder utilities for ergonomic behavior graph construction.
//!
//! This module provides helper functions to reduce boilerplate when building
//! behavior graphs. Instead of writing verbose
//! `Box::new(FixedPriorityNode::new(vec![...]))`, you can use shorter functions
//! like `fixed_priority(vec![...])`.

use coroutine::{Resolve, Sequence};

use crate::{Behavior, BehaviorCoroutine, BehaviorValue, ConcurrentNode, FixedPriorityNode};

/// Creates a coroutine-backed behavior.
///
/// Shorthand for `Box::new(BehaviorCoroutine::new(factory))`.
#[inline]
pub fn behavior<S, F>(factory: F) -> Box<dyn Behavior>
where
    S: Sequence<BehaviorValue> + 'static,
    F: FnMut() -> S + 'static,
{
    Box::new(BehaviorCoroutine::new(factory))
}

/// Creates a fixed-priority node.
///
/// Shorthand for `Box::new(FixedPriorityNode::new(children))`.
#[inline]
pub fn fixed_priority(children: Vec<Box<dyn Behavior>>) -> Box<dyn Behavior> {
    Box::new(FixedPriorityNode::new(children))
}

/// Creates a concurrent node.
///
/// Shorthand for `Box::new(ConcurrentNode::new(resolve, children))`.
#[inline]
pub fn concurrent(
    resolve: Resolve<BehaviorValue, BehaviorValue>,
    children: Vec<Box<dyn Behavior>>,
) -> Box<dyn Behavior> {
    Box::new(ConcurrentNode::new(resolve, children))
}
