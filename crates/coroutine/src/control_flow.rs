//! Control-flow combinators.
//!
//! The composition vocabulary sequences are written against:
//!
//! - [`call`]: run a nested sequence to completion.
//! - [`concurrent_call`] / [`concurrent_call_with`]: run several nodes side
//!   by side.
//! - [`execute_while`], [`execute_while_running`], [`execute_while_condition`]:
//!   run subordinates only while a master allows it ([`Gate`]).
//! - [`adapt`]: re-express a node's values in another domain ([`Adapt`]).

use tracing::debug;

use crate::arbitration;
use crate::concurrent::{Concurrent, Resolve};
use crate::error::{FirstError, Result};
use crate::instruction::{Callee, Instruction};
use crate::sequence::Sequence;
use crate::state::{Node, apply_all};

/// Calls a nested sequence; the caller resumes once it completes.
pub fn call<T, S>(sequence: S) -> Instruction<T>
where
    T: 'static,
    S: Sequence<T> + 'static,
{
    Instruction::call(sequence)
}

/// Runs every node side by side and resumes the caller once all of them have
/// finished.
pub fn concurrent_call<T, U>(children: Vec<Box<dyn Node<U>>>) -> Instruction<T>
where
    T: 'static,
    U: 'static,
{
    Instruction::call_detached(Callee::node(Concurrent::new(arbitration::discard, children)))
}

/// Builds a group whose value is `resolve` applied to its members' values.
///
/// Embed it with [`Instruction::call_node`], or wrap it with [`adapt`] first.
pub fn concurrent_call_with<T, R>(
    resolve: Resolve<T, R>,
    children: Vec<Box<dyn Node<T>>>,
) -> Concurrent<T, R> {
    Concurrent::new(resolve, children)
}

/// Runs `subordinates` while `predicate` holds for the master's latest value.
pub fn execute_while<T, M, S, P>(
    master: impl Node<M> + 'static,
    predicate: P,
    subordinates: Vec<Box<dyn Node<S>>>,
) -> Instruction<T>
where
    T: 'static,
    M: 'static,
    S: 'static,
    P: Fn(&M) -> bool + 'static,
{
    Instruction::call_detached(Callee::node(Gate::new(master, predicate, subordinates)))
}

/// Runs `subordinates` for as long as `master` is running.
pub fn execute_while_running<T, M, S>(
    master: impl Node<M> + 'static,
    subordinates: Vec<Box<dyn Node<S>>>,
) -> Instruction<T>
where
    T: 'static,
    M: 'static,
    S: 'static,
{
    execute_while(TrueWhileRunning::new(master), |running: &bool| *running, subordinates)
}

/// Runs `subordinates` while `condition` returns `true`.
///
/// The condition is evaluated once per tick, before the subordinates run.
pub fn execute_while_condition<T, S, F>(
    condition: F,
    subordinates: Vec<Box<dyn Node<S>>>,
) -> Instruction<T>
where
    T: 'static,
    S: 'static,
    F: FnMut() -> bool + 'static,
{
    execute_while(Condition::new(condition), |holds: &bool| *holds, subordinates)
}

/// Re-expresses `source`'s values through `transform`.
pub fn adapt<A, B, F>(source: impl Node<A> + 'static, transform: F) -> Adapt<A, B>
where
    A: 'static,
    F: Fn(A) -> B + 'static,
{
    Adapt::new(source, transform)
}

/// Produces `true` while `source` runs, then `false`.
pub fn true_while_running<U: 'static>(source: impl Node<U> + 'static) -> TrueWhileRunning<U> {
    TrueWhileRunning::new(source)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GatePhase {
    /// The master has not produced a value yet.
    Pending,
    /// The predicate held on the last tick.
    Open,
    /// The predicate failed; subordinates were reset.
    Closed,
}

/// Gated execution: subordinates run only while a master-derived predicate
/// holds.
///
/// # Semantics
///
/// Each tick the master is updated once and the predicate is evaluated on
/// its latest value.
/// - Before the master produces its first value the predicate counts as
///   false: subordinates do not start, and the gate keeps waiting.
/// - While the predicate holds, every subordinate is updated, in list order.
/// - Once it fails (or the master stops running without a value) the gate
///   closes: subordinates and master are reset, so their cleanup runs, and
///   the gate stops running. Embedded through a call, this returns control to
///   the caller.
///
/// The gate's value is `Some(())` while open.
pub struct Gate<M, S = ()> {
    master: Box<dyn Node<M>>,
    predicate: Box<dyn Fn(&M) -> bool>,
    subordinates: Vec<Box<dyn Node<S>>>,
    phase: GatePhase,
}

impl<M: 'static, S> Gate<M, S> {
    pub fn new<P>(
        master: impl Node<M> + 'static,
        predicate: P,
        subordinates: Vec<Box<dyn Node<S>>>,
    ) -> Self
    where
        P: Fn(&M) -> bool + 'static,
    {
        Self {
            master: Box::new(master),
            predicate: Box::new(predicate),
            subordinates,
            phase: GatePhase::Pending,
        }
    }

    /// Returns `true` while subordinates are being run.
    pub fn is_open(&self) -> bool {
        self.phase == GatePhase::Open
    }

    fn close(&mut self) -> Result<()> {
        debug!(subordinates = self.subordinates.len(), "gate closed");
        self.phase = GatePhase::Closed;
        let mut errors = FirstError::default();
        errors.record(apply_all(&mut self.subordinates, |node| node.reset()));
        errors.record(self.master.reset());
        errors.finish()
    }
}

impl<M: 'static, S> Node<()> for Gate<M, S> {
    fn value(&self) -> Option<()> {
        self.is_open().then_some(())
    }

    fn is_running(&self) -> bool {
        self.phase != GatePhase::Closed
    }

    fn update(&mut self) -> Result<()> {
        if self.phase == GatePhase::Closed {
            return Ok(());
        }

        if let Err(fault) = self.master.update() {
            if let Err(err) = self.close() {
                tracing::error!(error = %err, "cleanup failed while closing a faulted gate");
            }
            return Err(fault);
        }

        let holds = self.master.value().map(|value| (self.predicate)(&value));
        match holds {
            Some(true) => {
                if self.phase == GatePhase::Pending {
                    debug!(subordinates = self.subordinates.len(), "gate opened");
                }
                self.phase = GatePhase::Open;
                apply_all(&mut self.subordinates, |node| node.update())
            }
            None if self.phase == GatePhase::Pending && self.master.is_running() => Ok(()),
            _ => self.close(),
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.phase = GatePhase::Pending;
        let mut errors = FirstError::default();
        errors.record(apply_all(&mut self.subordinates, |node| node.reset()));
        errors.record(self.master.reset());
        errors.finish()
    }

    fn dispose(&mut self) -> Result<()> {
        self.phase = GatePhase::Closed;
        let mut errors = FirstError::default();
        errors.record(apply_all(&mut self.subordinates, |node| node.dispose()));
        errors.record(self.master.dispose());
        errors.finish()
    }
}

/// A node of type `B` mirroring a node of type `A` through a transform.
///
/// `has_value` follows the source; `value` is the transform applied to the
/// source's latest value. Lifecycle calls go straight to the source.
pub struct Adapt<A, B> {
    source: Box<dyn Node<A>>,
    transform: Box<dyn Fn(A) -> B>,
}

impl<A: 'static, B> Adapt<A, B> {
    pub fn new<F>(source: impl Node<A> + 'static, transform: F) -> Self
    where
        F: Fn(A) -> B + 'static,
    {
        Self {
            source: Box::new(source),
            transform: Box::new(transform),
        }
    }
}

impl<A, B> Node<B> for Adapt<A, B> {
    fn value(&self) -> Option<B> {
        self.source.value().map(&self.transform)
    }

    fn has_value(&self) -> bool {
        self.source.has_value()
    }

    fn is_running(&self) -> bool {
        self.source.is_running()
    }

    fn update(&mut self) -> Result<()> {
        self.source.update()
    }

    fn reset(&mut self) -> Result<()> {
        self.source.reset()
    }

    fn dispose(&mut self) -> Result<()> {
        self.source.dispose()
    }
}

/// Reports whether a wrapped node is still running.
///
/// Has no value until its first update; afterwards its value is the source's
/// running state as of the last update.
pub struct TrueWhileRunning<U> {
    source: Box<dyn Node<U>>,
    polled: bool,
}

impl<U: 'static> TrueWhileRunning<U> {
    pub fn new(source: impl Node<U> + 'static) -> Self {
        Self {
            source: Box::new(source),
            polled: false,
        }
    }
}

impl<U> Node<bool> for TrueWhileRunning<U> {
    fn value(&self) -> Option<bool> {
        self.polled.then(|| self.source.is_running())
    }

    fn is_running(&self) -> bool {
        self.source.is_running()
    }

    fn update(&mut self) -> Result<()> {
        self.polled = true;
        self.source.update()
    }

    fn reset(&mut self) -> Result<()> {
        self.polled = false;
        self.source.reset()
    }

    fn dispose(&mut self) -> Result<()> {
        self.source.dispose()
    }
}

/// Samples a closure once per tick.
pub struct Condition<F> {
    condition: F,
    last: Option<bool>,
}

impl<F: FnMut() -> bool> Condition<F> {
    pub fn new(condition: F) -> Self {
        Self {
            condition,
            last: None,
        }
    }
}

impl<F: FnMut() -> bool> Node<bool> for Condition<F> {
    fn value(&self) -> Option<bool> {
        self.last
    }

    fn is_running(&self) -> bool {
        true
    }

    fn update(&mut self) -> Result<()> {
        self.last = Some((self.condition)());
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.last = None;
        Ok(())
    }

    fn dispose(&mut self) -> Result<()> {
        Ok(())
    }
}
