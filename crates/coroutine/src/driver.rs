//! Coroutine driver.
//!
//! [`Coroutine`] turns a sequence factory into a tickable [`Node`]. It keeps
//! an explicit call stack: a call instruction pushes a frame, a completed
//! frame is popped and its caller resumes within the same tick.

use tracing::{debug, error, trace};

use crate::error::{CoroutineError, FirstError, Result};
use crate::frame::{Frame, SequenceFrame, Step};
use crate::sequence::Sequence;
use crate::state::Node;

type Factory<T> = Box<dyn FnMut() -> Box<dyn Frame<T>>>;

/// Lifecycle of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Not started yet; the next update builds the top-level sequence.
    Pending,
    /// At least one frame is live.
    Running,
    /// Completed normally or faulted. Updates are no-ops.
    Finished,
    /// Released for good.
    Disposed,
}

/// Drives one sequence, one tick per [`update`](Node::update).
///
/// # Semantics
///
/// - `Suspend` ends the tick; the frame resumes on the next update.
/// - `Call` pushes the callee and keeps driving within the same tick.
/// - `Emit` records the value (see [`Node::value`]) and ends the tick.
/// - When the bottom frame completes the driver is finished: it has no value
///   and further updates do nothing.
///
/// Reset and dispose unwind every live frame top-down, running each frame's
/// cleanup exactly once before returning. Reset then rebuilds the top-level
/// sequence from the factory on the next update.
pub struct Coroutine<T> {
    factory: Factory<T>,
    stack: Vec<Box<dyn Frame<T>>>,
    value: Option<T>,
    phase: Phase,
    label: &'static str,
}

impl<T: 'static> Coroutine<T> {
    /// Creates a driver that builds its top-level sequence with `factory`.
    ///
    /// The factory runs lazily, on the first update after construction or
    /// after each reset.
    pub fn new<S, F>(mut factory: F) -> Self
    where
        S: Sequence<T> + 'static,
        F: FnMut() -> S + 'static,
    {
        Self {
            factory: Box::new(move || Box::new(SequenceFrame::new(factory())) as Box<dyn Frame<T>>),
            stack: Vec::new(),
            value: None,
            phase: Phase::Pending,
            label: "coroutine",
        }
    }

    /// Names this driver in log output.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Returns the label used in log output.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Number of live frames on the call stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` once the driver has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.phase == Phase::Disposed
    }

    fn drive(&mut self) -> Result<()> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                self.phase = Phase::Finished;
                self.value = None;
                debug!(label = self.label, "coroutine finished");
                return Ok(());
            };

            match frame.resume()? {
                Step::Suspend => return Ok(()),
                Step::Emit(value) => {
                    trace!(label = self.label, depth = self.stack.len(), "value emitted");
                    self.value = Some(value);
                    return Ok(());
                }
                Step::Push(callee) => {
                    self.stack.push(callee);
                    trace!(label = self.label, depth = self.stack.len(), "frame pushed");
                }
                Step::Done => {
                    if let Some(mut done) = self.stack.pop() {
                        trace!(label = self.label, depth = self.stack.len(), "frame popped");
                        done.unwind()?;
                    }
                }
            }
        }
    }

    /// Pops and cleans up every frame, innermost first.
    fn unwind_all(&mut self) -> Result<()> {
        let mut errors = FirstError::default();
        while let Some(mut frame) = self.stack.pop() {
            errors.record(frame.unwind());
        }
        errors.finish()
    }
}

impl<T: Clone + 'static> Node<T> for Coroutine<T> {
    fn value(&self) -> Option<T> {
        self.value.clone()
    }

    fn has_value(&self) -> bool {
        self.value.is_some()
    }

    fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Pending | Phase::Running)
    }

    fn update(&mut self) -> Result<()> {
        match self.phase {
            Phase::Disposed => return Err(CoroutineError::Disposed),
            Phase::Finished => return Ok(()),
            Phase::Pending => {
                debug!(label = self.label, "coroutine started");
                let top = (self.factory)();
                self.stack.push(top);
                self.phase = Phase::Running;
            }
            Phase::Running => {}
        }

        if let Err(fault) = self.drive() {
            debug!(label = self.label, error = %fault, "coroutine faulted");
            if let Err(err) = self.unwind_all() {
                error!(label = self.label, error = %err, "cleanup failed while unwinding a fault");
            }
            self.value = None;
            self.phase = Phase::Finished;
            return Err(fault);
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        if self.phase == Phase::Disposed {
            return Err(CoroutineError::Disposed);
        }
        debug!(label = self.label, depth = self.stack.len(), "coroutine reset");
        let unwound = self.unwind_all();
        self.value = None;
        self.phase = Phase::Pending;
        unwound
    }

    fn dispose(&mut self) -> Result<()> {
        if self.phase == Phase::Disposed {
            return Ok(());
        }
        debug!(label = self.label, depth = self.stack.len(), "coroutine disposed");
        let unwound = self.unwind_all();
        self.value = None;
        self.phase = Phase::Disposed;
        unwound
    }
}

impl<T> Drop for Coroutine<T> {
    fn drop(&mut self) {
        let mut errors = FirstError::default();
        while let Some(mut frame) = self.stack.pop() {
            errors.record(frame.unwind());
        }
        if let Err(err) = errors.finish() {
            error!(label = self.label, error = %err, "cleanup failed while dropping coroutine");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::instruction::{Callee, Instruction};
    use crate::sequence::{SequenceExt, from_fn, from_iter};
    use crate::wait::wait_ticks;

    type Log = Rc<RefCell<Vec<String>>>;

    fn push(log: &Log, entry: &str) {
        log.borrow_mut().push(entry.to_string());
    }

    /// Suspends forever, logging its cleanup.
    fn idle(log: &Log, name: &'static str) -> impl Sequence<u32> + use<> {
        let log = Rc::clone(log);
        from_iter(std::iter::repeat_with(|| Instruction::Suspend))
            .on_cleanup(move || push(&log, &format!("{name} cleanup")))
    }

    #[test]
    fn emits_after_two_suspends() {
        let mut routine = Coroutine::new(|| {
            from_iter([Instruction::Suspend, Instruction::Suspend, Instruction::Emit(5)])
        });

        routine.update().unwrap();
        routine.update().unwrap();
        assert!(!routine.has_value());

        routine.update().unwrap();
        assert_eq!(routine.value(), Some(5));
        assert!(routine.is_running());

        routine.update().unwrap();
        assert!(!routine.has_value());
        assert!(!routine.is_running());
    }

    #[test]
    fn value_is_sticky_between_emits() {
        let mut routine = Coroutine::new(|| {
            from_iter([
                Instruction::Emit(1),
                Instruction::Suspend,
                Instruction::Suspend,
                Instruction::Emit(2),
            ])
        });

        routine.update().unwrap();
        routine.update().unwrap();
        routine.update().unwrap();
        assert_eq!(routine.value(), Some(1));

        routine.update().unwrap();
        assert_eq!(routine.value(), Some(2));
    }

    #[test]
    fn call_starts_within_same_tick() {
        let mut routine = Coroutine::new(|| {
            from_iter([
                Instruction::call(from_iter([Instruction::Emit(1)])),
                Instruction::Emit(2),
            ])
        });

        routine.update().unwrap();
        assert_eq!(routine.value(), Some(1));
        assert_eq!(routine.depth(), 2);

        // Nested sequence completes and the caller resumes in the same tick.
        routine.update().unwrap();
        assert_eq!(routine.value(), Some(2));
        assert_eq!(routine.depth(), 1);
    }

    #[test]
    fn detached_call_hides_values_and_returning_call_captures_last() {
        let observed = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&observed);

        let mut routine = Coroutine::new(move || {
            let (call, result) = Instruction::<u8>::call_returning(Callee::sequence(from_iter([
                Instruction::Emit("first"),
                Instruction::Emit("last"),
            ])));
            let sink = Rc::clone(&sink);
            let mut read = false;
            let mut call = Some(call);
            from_fn(move || {
                if let Some(call) = call.take() {
                    return Ok(Some(call));
                }
                if !read {
                    read = true;
                    *sink.borrow_mut() = result.get();
                }
                Ok(None)
            })
        });

        routine.update().unwrap();
        assert!(!routine.has_value());
        routine.update().unwrap();
        routine.update().unwrap();

        assert_eq!(*observed.borrow(), Some("last"));
        assert!(!routine.is_running());
    }

    #[test]
    fn dispose_unwinds_innermost_first() {
        let log: Log = Rc::default();
        let (outer, middle, inner) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));

        let mut routine = Coroutine::new(move || {
            let (middle, inner) = (Rc::clone(&middle), Rc::clone(&inner));
            let leaf = idle(&inner, "inner");
            let middle_seq = from_iter([Instruction::call(leaf)])
                .on_cleanup(move || push(&middle, "middle cleanup"));
            let outer = Rc::clone(&outer);
            from_iter([Instruction::call(middle_seq)])
                .on_cleanup(move || push(&outer, "outer cleanup"))
        });

        routine.update().unwrap();
        assert_eq!(routine.depth(), 3);

        routine.dispose().unwrap();
        routine.dispose().unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["inner cleanup", "middle cleanup", "outer cleanup"]
        );
        assert!(matches!(routine.update(), Err(CoroutineError::Disposed)));
        assert!(matches!(routine.reset(), Err(CoroutineError::Disposed)));
        assert!(routine.is_disposed());
    }

    /// Three nested frames; the middle one's cleanup fails.
    fn failing_middle(log: &Log) -> Coroutine<u32> {
        let log = Rc::clone(log);
        Coroutine::new(move || {
            let (inner, middle, outer) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
            let leaf = from_iter(std::iter::repeat_with(|| Instruction::Suspend))
                .on_cleanup(move || push(&inner, "inner"));
            let middle_seq = from_iter([Instruction::call(leaf)]).try_on_cleanup(move || {
                push(&middle, "middle");
                Err(CoroutineError::fault("middle cleanup"))
            });
            from_iter([Instruction::call(middle_seq)]).on_cleanup(move || push(&outer, "outer"))
        })
        .with_label("failing-middle")
    }

    #[test]
    fn cleanup_error_surfaces_after_full_unwind() {
        let log: Log = Rc::default();
        let mut routine = failing_middle(&log);
        assert_eq!(routine.label(), "failing-middle");

        routine.update().unwrap();
        assert_eq!(routine.depth(), 3);

        let disposed = routine.dispose();
        assert!(matches!(disposed, Err(CoroutineError::Fault(ref msg)) if msg == "middle cleanup"));
        assert_eq!(*log.borrow(), vec!["inner", "middle", "outer"]);
        assert!(routine.is_disposed());
        assert_eq!(routine.depth(), 0);

        // Already released: nothing runs a second time.
        routine.dispose().unwrap();
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn cleanup_error_on_reset_still_restarts() {
        let log: Log = Rc::default();
        let mut routine = failing_middle(&log);

        routine.update().unwrap();
        let reset = routine.reset();

        assert!(matches!(reset, Err(CoroutineError::Fault(ref msg)) if msg == "middle cleanup"));
        assert_eq!(*log.borrow(), vec!["inner", "middle", "outer"]);
        assert!(!routine.is_disposed());
        assert!(routine.is_running());

        routine.update().unwrap();
        assert_eq!(routine.depth(), 3);
    }

    #[test]
    fn natural_completion_runs_cleanup_once() {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let mut routine = Coroutine::new(move || {
            let sink = Rc::clone(&sink);
            from_iter([Instruction::<u32>::Suspend]).on_cleanup(move || push(&sink, "cleanup"))
        });

        routine.update().unwrap();
        routine.update().unwrap();
        routine.dispose().unwrap();

        assert_eq!(*log.borrow(), vec!["cleanup"]);
    }

    #[test]
    fn reset_restarts_from_factory() {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let mut routine = Coroutine::new(move || {
            push(&sink, "start");
            idle(&sink, "body")
        });

        routine.update().unwrap();
        routine.reset().unwrap();
        assert!(routine.is_running());
        assert_eq!(routine.depth(), 0);

        routine.update().unwrap();
        assert_eq!(*log.borrow(), vec!["start", "body cleanup", "start"]);
    }

    #[test]
    fn fault_unwinds_and_terminates() {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let mut routine = Coroutine::new(move || {
            let mut steps = 0;
            let failing = from_fn(move || {
                steps += 1;
                if steps > 1 {
                    return Err(CoroutineError::fault("lost target"));
                }
                Ok(Some(Instruction::Suspend))
            });
            let sink = Rc::clone(&sink);
            from_iter([Instruction::<u32>::call(failing), Instruction::Emit(1)])
                .on_cleanup(move || push(&sink, "outer cleanup"))
        });

        routine.update().unwrap();
        let fault = routine.update();
        assert!(matches!(fault, Err(CoroutineError::Fault(_))));
        assert_eq!(*log.borrow(), vec!["outer cleanup"]);

        // Faulted drivers stay terminated.
        routine.update().unwrap();
        assert!(!routine.has_value());
        assert!(!routine.is_running());
    }

    #[test]
    fn drop_runs_pending_cleanup() {
        let log: Log = Rc::default();
        {
            let sink = Rc::clone(&log);
            let mut routine = Coroutine::new(move || idle(&sink, "leaf"));
            routine.update().unwrap();
        }
        assert_eq!(*log.borrow(), vec!["leaf cleanup"]);
    }

    #[test]
    fn waits_count_ticks_inside_call() {
        let mut routine = Coroutine::new(|| {
            from_iter([Instruction::call(wait_ticks(3)), Instruction::Emit(1u8)])
        });

        for _ in 0..3 {
            routine.update().unwrap();
            assert!(!routine.has_value());
        }
        routine.update().unwrap();
        assert_eq!(routine.value(), Some(1));
    }
}
