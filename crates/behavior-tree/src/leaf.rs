//! Sequence-backed behavior leaves.
//!
//! [`BehaviorCoroutine`] turns an author-written sequence of [`BehaviorState`]
//! instructions into a [`Behavior`]. It is the leaf every behavior graph
//! bottoms out in.
//!
//! [`BehaviorState`]: crate::BehaviorState

use coroutine::{Coroutine, Node, Result, Sequence};

use crate::{Behavior, BehaviorValue};

/// A behavior driven by a coroutine.
///
/// # Semantics
///
/// - Before the sequence emits anything it reads as `Waiting`.
/// - After each `Emit` it reads as the emitted value until the next one.
/// - Once the sequence completes, or faults, it stays `Waiting` forever. A
///   finished sequence is never rebuilt on its own; only
///   [`reset`](Node::reset) starts it again.
///
/// Behavior sequences may call untyped helpers such as
/// [`wait_ticks`](coroutine::wait_ticks) directly, or foreign-typed nodes
/// through [`Instruction::call_detached`](coroutine::Instruction::call_detached).
pub struct BehaviorCoroutine {
    driver: Coroutine<BehaviorValue>,
}

impl BehaviorCoroutine {
    /// Creates a behavior from a sequence factory.
    ///
    /// The factory runs on the first update and again after every reset.
    pub fn new<S, F>(factory: F) -> Self
    where
        S: Sequence<BehaviorValue> + 'static,
        F: FnMut() -> S + 'static,
    {
        Self {
            driver: Coroutine::new(factory).with_label("behavior"),
        }
    }

    /// Names this behavior in log output.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.driver = self.driver.with_label(label);
        self
    }

    /// Returns the underlying driver.
    pub fn driver(&self) -> &Coroutine<BehaviorValue> {
        &self.driver
    }
}

impl Node<BehaviorValue> for BehaviorCoroutine {
    fn value(&self) -> Option<BehaviorValue> {
        Some(self.state())
    }

    fn has_value(&self) -> bool {
        true
    }

    fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    fn update(&mut self) -> Result<()> {
        self.driver.update()
    }

    fn reset(&mut self) -> Result<()> {
        self.driver.reset()
    }

    fn dispose(&mut self) -> Result<()> {
        self.driver.dispose()
    }
}

impl Behavior for BehaviorCoroutine {
    fn state(&self) -> BehaviorValue {
        self.driver.value().unwrap_or_default()
    }
}
