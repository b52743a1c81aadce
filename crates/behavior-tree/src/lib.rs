//! Behavior graphs built on tick-driven coroutines.
//!
//! This library specializes the [`coroutine`] crate to a two-valued behavior
//! vocabulary and adds the arbitration nodes used to compose agents out of
//! long-running routines.
//!
//! - **Always defined**: a behavior reports `Active` or `Waiting` on every
//!   tick, never "no value"
//! - **Priority with preemption**: a higher-priority routine becoming active
//!   resets the one it displaces, running its cleanup
//! - **Frozen losers**: routines below the current winner are not ticked
//! - **Concurrent composition**: every child runs, a resolution function
//!   decides the node's state
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes
//! - [`BehaviorValue`]: Active or Waiting
//! - [`BehaviorCoroutine`]: leaf driven by a behavior sequence
//! - Composite nodes: [`FixedPriorityNode`], [`ConcurrentNode`]

pub mod arbitration;
pub mod behavior;
pub mod builder;
pub mod composite;
pub mod leaf;
pub mod status;

// Re-export core types for ergonomic API
pub use behavior::{Behavior, BehaviorState};
pub use composite::{ConcurrentNode, FixedPriorityNode};
pub use leaf::BehaviorCoroutine;
pub use status::BehaviorValue;
