//! Author-written sequences.
//!
//! A [`Sequence`] is a resumable body producing one [`Instruction`] per step.
//! Rust has no stable generators, so sequences are either hand-written state
//! machines, closures ([`from_fn`]) or iterators of instructions
//! ([`from_iter`]). Cleanup that must run when the sequence completes or is
//! interrupted is attached with [`SequenceExt::on_cleanup`].

use crate::error::{FirstError, Result};
use crate::instruction::Instruction;

/// A resumable body of instructions.
pub trait Sequence<T> {
    /// Produces the next instruction, or `None` once the sequence is complete.
    ///
    /// Returning an error faults the sequence: the driver unwinds its whole
    /// call stack and stops.
    fn resume(&mut self) -> Result<Option<Instruction<T>>>;

    /// Releases whatever the sequence holds.
    ///
    /// Called exactly once, either after `resume` returned `None` or when the
    /// frame is unwound by a reset, a dispose or a fault.
    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T> Sequence<T> for Box<dyn Sequence<T>> {
    #[inline]
    fn resume(&mut self) -> Result<Option<Instruction<T>>> {
        (**self).resume()
    }

    #[inline]
    fn cleanup(&mut self) -> Result<()> {
        (**self).cleanup()
    }
}

/// Sequence backed by a closure. See [`from_fn`].
pub struct FromFn<F>(F);

/// Creates a sequence that calls `step` for each instruction.
///
/// ```rust,ignore
/// let mut remaining = 3;
/// let countdown = from_fn(move || {
///     if remaining == 0 {
///         return Ok(None);
///     }
///     remaining -= 1;
///     Ok(Some(Instruction::Emit(remaining)))
/// });
/// ```
pub fn from_fn<T, F>(step: F) -> FromFn<F>
where
    F: FnMut() -> Result<Option<Instruction<T>>>,
{
    FromFn(step)
}

impl<T, F> Sequence<T> for FromFn<F>
where
    F: FnMut() -> Result<Option<Instruction<T>>>,
{
    fn resume(&mut self) -> Result<Option<Instruction<T>>> {
        (self.0)()
    }
}

/// Sequence backed by an iterator. See [`from_iter`].
pub struct FromIter<I>(I);

/// Creates a sequence yielding the instructions of `iter` in order.
///
/// Iterator adapters such as `repeat_with`, `chain` and `iter::once` cover
/// most straight-line and looping sequences.
pub fn from_iter<T, I>(iter: I) -> FromIter<I::IntoIter>
where
    I: IntoIterator<Item = Instruction<T>>,
{
    FromIter(iter.into_iter())
}

/// Creates a sequence yielding a single instruction.
///
/// Mostly useful to wrap one call, e.g. `once(Instruction::call(wait_ticks(3)))`.
pub fn once<T>(instruction: Instruction<T>) -> FromIter<std::iter::Once<Instruction<T>>> {
    FromIter(std::iter::once(instruction))
}

impl<T, I> Sequence<T> for FromIter<I>
where
    I: Iterator<Item = Instruction<T>>,
{
    fn resume(&mut self) -> Result<Option<Instruction<T>>> {
        Ok(self.0.next())
    }
}

type Cleanup = Box<dyn FnOnce() -> Result<()>>;

/// Sequence with an attached cleanup routine. See [`SequenceExt::on_cleanup`].
pub struct OnCleanup<S> {
    inner: S,
    cleanup: Option<Cleanup>,
}

impl<T, S: Sequence<T>> Sequence<T> for OnCleanup<S> {
    fn resume(&mut self) -> Result<Option<Instruction<T>>> {
        self.inner.resume()
    }

    fn cleanup(&mut self) -> Result<()> {
        let mut errors = FirstError::default();
        errors.record(self.inner.cleanup());
        if let Some(cleanup) = self.cleanup.take() {
            errors.record(cleanup());
        }
        errors.finish()
    }
}

/// Combinator methods available on every sequence.
pub trait SequenceExt<T>: Sequence<T> + Sized {
    /// Runs `cleanup` once when the sequence completes or is interrupted.
    fn on_cleanup<F>(self, cleanup: F) -> OnCleanup<Self>
    where
        F: FnOnce() + 'static,
    {
        self.try_on_cleanup(move || {
            cleanup();
            Ok(())
        })
    }

    /// Like [`on_cleanup`](SequenceExt::on_cleanup), for cleanup that can fail.
    fn try_on_cleanup<F>(self, cleanup: F) -> OnCleanup<Self>
    where
        F: FnOnce() -> Result<()> + 'static,
    {
        OnCleanup {
            inner: self,
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// Erases the sequence's concrete type.
    fn boxed(self) -> Box<dyn Sequence<T>>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T, S: Sequence<T>> SequenceExt<T> for S {}
