//! Core behavior trait.
//!
//! This module defines the [`Behavior`] trait, the specialization of
//! [`Node`] that every behavior-graph node implements. A behavior always has a
//! value: anything that would otherwise report "no value" reads as
//! [`BehaviorValue::Waiting`].

use coroutine::{Instruction, Node, Result};

use crate::BehaviorValue;

/// Instruction yielded by behavior sequences.
pub type BehaviorState = Instruction<BehaviorValue>;

/// A node producing a [`BehaviorValue`] every tick.
pub trait Behavior: Node<BehaviorValue> {
    /// The node's current state. Never undefined.
    fn state(&self) -> BehaviorValue {
        self.value().unwrap_or_default()
    }
}

/// Blanket implementation for boxed behaviors.
///
/// This allows `Box<dyn Behavior>` to also implement `Node<BehaviorValue>`,
/// so behavior lists can be handed to the generic combinators.
impl Node<BehaviorValue> for Box<dyn Behavior> {
    #[inline]
    fn value(&self) -> Option<BehaviorValue> {
        Some((**self).state())
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

impl Behavior for Box<dyn Behavior> {
    #[inline]
    fn state(&self) -> BehaviorValue {
        (**self).state()
    }
}
