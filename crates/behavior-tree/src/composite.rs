//! Composite behavior nodes.
//!
//! Composite nodes arbitrate between several child behaviors. This module
//! provides the two building blocks of a behavior graph:
//! [`FixedPriorityNode`] (first active child wins, the rest are frozen) and
//! [`ConcurrentNode`] (every child runs, a resolution function decides).

use coroutine::{Concurrent, Node, Resolve, Result, apply_all};
use tracing::{debug, error, trace};

use crate::{Behavior, BehaviorValue};

/// Runs the highest-priority active child.
///
/// # Semantics
///
/// Children are listed from highest to lowest priority. On every update the
/// node scans them in order:
/// - Each scanned child is updated
/// - The first child reporting `Active` becomes the winner and the scan stops;
///   children after it are **not** updated, so their timers and side effects
///   stay frozen
/// - If the winner has a higher priority than the previous tick's winner, the
///   previous winner is reset (preemption)
/// - If no child is active the node is `Waiting` and has no winner
///
/// A lower-priority winner never triggers a reset: the previous winner was
/// scanned earlier in the same tick and already reported `Waiting` itself.
pub struct FixedPriorityNode {
    children: Vec<Box<dyn Behavior>>,
    winner: Option<usize>,
}

impl FixedPriorityNode {
    /// Creates a priority node. The first child has the highest priority.
    ///
    /// A node without children never has a winner and stays `Waiting`.
    pub fn new(children: Vec<Box<dyn Behavior>>) -> Self {
        Self {
            children,
            winner: None,
        }
    }

    /// Index of the child that won the last update, if any.
    pub fn winner_index(&self) -> Option<usize> {
        self.winner
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the node has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Updates children in priority order until one is active.
    ///
    /// A child that fails counts as not active and the scan moves on; the
    /// first failure is returned once the tick is settled.
    fn scan(&mut self) -> (Option<usize>, Result<()>) {
        let mut outcome = Ok(());
        for (index, child) in self.children.iter_mut().enumerate() {
            if let Err(err) = child.update() {
                if outcome.is_ok() {
                    outcome = Err(err);
                } else {
                    error!(index, error = %err, "priority child failed");
                }
                continue;
            }
            if child.state().is_active() {
                return (Some(index), outcome);
            }
        }
        (None, outcome)
    }
}

impl Node<BehaviorValue> for FixedPriorityNode {
    fn value(&self) -> Option<BehaviorValue> {
        Some(self.state())
    }

    fn has_value(&self) -> bool {
        true
    }

    fn is_running(&self) -> bool {
        self.children.iter().any(|child| child.is_running())
    }

    fn update(&mut self) -> Result<()> {
        let (winner, scanned) = self.scan();
        let previous = std::mem::replace(&mut self.winner, winner);

        if winner != previous {
            debug!(?previous, ?winner, "priority winner changed");
        }

        // Preemption: a higher-priority child displaced the running one.
        if let (Some(new), Some(old)) = (winner, previous)
            && new < old
        {
            debug!(preempted = old, by = new, "resetting preempted behavior");
            let reset = self.children[old].reset();
            if let Err(err) = &reset
                && scanned.is_err()
            {
                error!(index = old, error = %err, "preempted behavior failed to reset");
            }
            return scanned.and(reset);
        }

        trace!(?winner, "priority update");
        scanned
    }

    fn reset(&mut self) -> Result<()> {
        self.winner = None;
        apply_all(&mut self.children, |child| child.reset())
    }

    fn dispose(&mut self) -> Result<()> {
        self.winner = None;
        apply_all(&mut self.children, |child| child.dispose())
    }
}

impl Behavior for FixedPriorityNode {
    fn state(&self) -> BehaviorValue {
        BehaviorValue::from_active(self.winner.is_some())
    }
}

/// Runs every child each tick and resolves their states.
///
/// # Semantics
///
/// Unlike [`FixedPriorityNode`], no child is ever frozen or preempted: every
/// child is updated on every tick, in list order, whatever the others report.
/// The node's state is the resolution function applied to all children's
/// states, e.g. [`any_active`](crate::arbitration::any_active).
pub struct ConcurrentNode {
    group: Concurrent<BehaviorValue, BehaviorValue>,
}

impl ConcurrentNode {
    /// Creates a concurrent node.
    ///
    /// A node without children resolves to `Waiting`.
    pub fn new(
        resolve: Resolve<BehaviorValue, BehaviorValue>,
        children: Vec<Box<dyn Behavior>>,
    ) -> Self {
        let members = children
            .into_iter()
            .map(|child| Box::new(child) as Box<dyn Node<BehaviorValue>>)
            .collect();
        Self {
            group: Concurrent::new(resolve, members),
        }
    }

    /// Current states of the children, in list order.
    pub fn child_states(&self) -> Vec<BehaviorValue> {
        self.group
            .member_values()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect()
    }
}

impl Node<BehaviorValue> for ConcurrentNode {
    fn value(&self) -> Option<BehaviorValue> {
        Some(self.state())
    }

    fn has_value(&self) -> bool {
        true
    }

    fn is_running(&self) -> bool {
        self.group.is_running()
    }

    fn update(&mut self) -> Result<()> {
        self.group.update()
    }

    fn reset(&mut self) -> Result<()> {
        self.group.reset()
    }

    fn dispose(&mut self) -> Result<()> {
        self.group.dispose()
    }
}

impl Behavior for ConcurrentNode {
    fn state(&self) -> BehaviorValue {
        // Children always have a value; only an empty group has none.
        self.group.value().unwrap_or_default()
    }
}
