//! Call-stack frames.
//!
//! A [`Coroutine`](crate::Coroutine) keeps an explicit stack of frames. Each
//! frame is one resumable unit: an author-written sequence, a node embedded
//! through a call, or a wrapper that hides a foreign-typed callee's values
//! from the driver.

use crate::error::Result;
use crate::instruction::{Instruction, Returned};
use crate::sequence::Sequence;
use crate::state::Node;

/// Outcome of resuming a frame by one step.
pub(crate) enum Step<T> {
    /// Pause until the next tick.
    Suspend,
    /// Record a value on the driver and pause until the next tick.
    Emit(T),
    /// Push a nested frame and keep driving within the same tick.
    Push(Box<dyn Frame<T>>),
    /// The frame ran to completion.
    Done,
}

/// One entry on a driver's call stack.
pub(crate) trait Frame<T> {
    /// Advances the frame by one step.
    fn resume(&mut self) -> Result<Step<T>>;

    /// Runs the frame's cleanup. Only the first call has any effect.
    fn unwind(&mut self) -> Result<()>;
}

/// Frame driving an author-written sequence.
pub(crate) struct SequenceFrame<S> {
    sequence: S,
    closed: bool,
}

impl<S> SequenceFrame<S> {
    pub(crate) fn new(sequence: S) -> Self {
        Self {
            sequence,
            closed: false,
        }
    }
}

impl<T, S: Sequence<T>> Frame<T> for SequenceFrame<S> {
    fn resume(&mut self) -> Result<Step<T>> {
        let step = match self.sequence.resume()? {
            None => Step::Done,
            Some(Instruction::Suspend) => Step::Suspend,
            Some(Instruction::Emit(value)) => Step::Emit(value),
            Some(Instruction::Call(call)) => Step::Push(call.into_frame()),
        };
        Ok(step)
    }

    fn unwind(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.sequence.cleanup()
    }
}

/// Frame ticking an embedded node until it stops running.
///
/// The node's current value is emitted every tick it has one.
pub(crate) struct NodeFrame<N> {
    node: N,
    closed: bool,
}

impl<N> NodeFrame<N> {
    pub(crate) fn new(node: N) -> Self {
        Self { node, closed: false }
    }
}

impl<T, N: Node<T>> Frame<T> for NodeFrame<N> {
    fn resume(&mut self) -> Result<Step<T>> {
        self.node.update()?;
        if !self.node.is_running() {
            return Ok(Step::Done);
        }
        Ok(match self.node.value() {
            Some(value) => Step::Emit(value),
            None => Step::Suspend,
        })
    }

    fn unwind(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.node.dispose()
    }
}

/// Hosts a callee of value type `U` on a stack of value type `T`.
///
/// Values the callee (or anything it calls in turn) emits never reach the
/// driver. When a slot is attached, the latest one is stored there instead.
pub(crate) struct Detached<U> {
    inner: Box<dyn Frame<U>>,
    slot: Option<Returned<U>>,
}

impl<U> Detached<U> {
    pub(crate) fn new(inner: Box<dyn Frame<U>>, slot: Option<Returned<U>>) -> Self {
        Self { inner, slot }
    }
}

impl<T, U: 'static> Frame<T> for Detached<U> {
    fn resume(&mut self) -> Result<Step<T>> {
        let step = match self.inner.resume()? {
            Step::Suspend => Step::Suspend,
            Step::Emit(value) => {
                if let Some(slot) = &self.slot {
                    slot.set(value);
                }
                Step::Suspend
            }
            Step::Push(nested) => Step::Push(Box::new(Detached::new(nested, self.slot.clone()))),
            Step::Done => Step::Done,
        };
        Ok(step)
    }

    fn unwind(&mut self) -> Result<()> {
        self.inner.unwind()
    }
}
