//! Cooperative, instruction-driven coroutines.
//!
//! This library drives author-written sequences one external tick at a time,
//! without an async runtime or language generators. The embedder constructs a
//! root node, calls [`Node::update`] once per frame, and calls
//! [`Node::dispose`] or [`Node::reset`] at lifecycle boundaries.
//!
//! - **Explicit ticking**: nothing advances unless the embedder updates it
//! - **Call-stack semantics**: nested sequences block their caller, with no
//!   extra tick of latency
//! - **Guaranteed cleanup**: reset, dispose, faults and preemption unwind
//!   pending frames innermost first, exactly once
//! - **Single-threaded**: "concurrent" means several nodes advanced within the
//!   same tick, in a fixed order
//!
//! # Architecture
//!
//! - [`Node`]: polling-state contract shared by every tickable piece
//! - [`Instruction`]: what a [`Sequence`] yields at each step
//! - [`Coroutine`]: drives a sequence with an explicit call stack
//! - [`Concurrent`]: advances several nodes and resolves their values
//! - [`control_flow`]: `call`, `concurrent_call`, `execute_while`, `adapt`, ...
//! - [`wait`]: tick- and duration-counting leaves

pub mod arbitration;
pub mod concurrent;
pub mod config;
pub mod control_flow;
pub mod driver;
pub mod error;
mod frame;
pub mod instruction;
pub mod sequence;
pub mod state;
pub mod wait;

// Re-export core types for ergonomic API
pub use concurrent::{Concurrent, Resolve};
pub use config::TickConfig;
pub use control_flow::{
    Adapt, Condition, Gate, TrueWhileRunning, adapt, call, concurrent_call, concurrent_call_with,
    execute_while, execute_while_condition, execute_while_running, true_while_running,
};
pub use driver::Coroutine;
pub use error::{CoroutineError, Result};
pub use instruction::{Call, Callee, Instruction, Returned};
pub use sequence::{
    FromFn, FromIter, OnCleanup, Sequence, SequenceExt, from_fn, from_iter, once,
};
pub use state::{Node, NodeExt, apply_all};
pub use wait::{WaitElapsed, WaitTicks, wait_elapsed, wait_for, wait_ticks};
