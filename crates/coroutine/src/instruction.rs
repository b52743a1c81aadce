//! Instructions yielded by author-written sequences.
//!
//! Every step of a [`Sequence`] produces one [`Instruction`]: suspend until
//! the next tick, emit a value, or call a nested sequence or node and block
//! until it completes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::frame::{Detached, Frame, NodeFrame, SequenceFrame};
use crate::sequence::Sequence;
use crate::state::Node;

/// One step of a sequence.
pub enum Instruction<T> {
    /// Pause until the next tick without producing a value.
    Suspend,

    /// Make `T` the driver's current value and pause until the next tick.
    ///
    /// The value stays visible until the next `Emit`, until the driver
    /// completes, or until it is reset.
    Emit(T),

    /// Run a nested callee to completion before resuming this sequence.
    ///
    /// The callee starts within the same tick; a call adds no latency.
    Call(Call<T>),
}

impl<T: 'static> Instruction<T> {
    /// Calls a nested sequence of the same value type.
    ///
    /// Values the nested sequence emits become the driver's value.
    pub fn call<S>(sequence: S) -> Self
    where
        S: Sequence<T> + 'static,
    {
        Self::Call(Call::new(Callee::sequence(sequence).frame))
    }

    /// Calls a node of the same value type until it stops running.
    ///
    /// The node's value is forwarded to the driver every tick it has one.
    pub fn call_node<N>(node: N) -> Self
    where
        N: Node<T> + 'static,
    {
        Self::Call(Call::new(Callee::node(node).frame))
    }

    /// Calls a callee of any value type, ignoring what it emits.
    pub fn call_detached<U: 'static>(callee: Callee<U>) -> Self {
        Self::Call(Call::new(Box::new(Detached::new(callee.frame, None))))
    }

    /// Calls a callee of any value type and captures its last emitted value.
    ///
    /// The returned handle holds `None` until the callee emits something. Read
    /// it once the call has completed to get the callee's final value.
    pub fn call_returning<U: 'static>(callee: Callee<U>) -> (Self, Returned<U>) {
        let slot = Returned::new();
        let frame = Detached::new(callee.frame, Some(slot.clone()));
        (Self::Call(Call::new(Box::new(frame))), slot)
    }
}

impl<T: fmt::Debug> fmt::Debug for Instruction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Suspend => f.write_str("Suspend"),
            Instruction::Emit(value) => f.debug_tuple("Emit").field(value).finish(),
            Instruction::Call(_) => f.write_str("Call(..)"),
        }
    }
}

/// A pending call, ready to be pushed on the caller's stack.
pub struct Call<T> {
    frame: Box<dyn Frame<T>>,
}

impl<T> Call<T> {
    fn new(frame: Box<dyn Frame<T>>) -> Self {
        Self { frame }
    }

    pub(crate) fn into_frame(self) -> Box<dyn Frame<T>> {
        self.frame
    }
}

/// Something that can be called: a sequence or a node producing `U`.
pub struct Callee<U> {
    frame: Box<dyn Frame<U>>,
}

impl<U: 'static> Callee<U> {
    /// Wraps a sequence as a callee.
    pub fn sequence<S>(sequence: S) -> Self
    where
        S: Sequence<U> + 'static,
    {
        Self {
            frame: Box::new(SequenceFrame::new(sequence)),
        }
    }

    /// Wraps a node as a callee. The call completes once the node stops
    /// running; the node is disposed when its frame is popped.
    pub fn node<N>(node: N) -> Self
    where
        N: Node<U> + 'static,
    {
        Self {
            frame: Box::new(NodeFrame::new(node)),
        }
    }
}

/// Shared slot receiving the values emitted by a returning call.
pub struct Returned<U> {
    slot: Rc<RefCell<Option<U>>>,
}

impl<U> Returned<U> {
    fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    pub(crate) fn set(&self, value: U) {
        *self.slot.borrow_mut() = Some(value);
    }

    /// Returns a copy of the last value the callee emitted.
    pub fn get(&self) -> Option<U>
    where
        U: Clone,
    {
        self.slot.borrow().clone()
    }

    /// Moves the last emitted value out of the slot.
    pub fn take(&self) -> Option<U> {
        self.slot.borrow_mut().take()
    }
}

impl<U> Clone for Returned<U> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<U: fmt::Debug> fmt::Debug for Returned<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Returned").field(&self.slot.borrow()).finish()
    }
}
