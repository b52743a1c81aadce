//! Value reported by behavior nodes.

/// What a behavior node is doing on the current tick.
///
/// # Tick-driven Semantics
///
/// Behaviors keep running across ticks. Instead of succeeding or failing they
/// report, every tick, whether they are doing something observable:
/// - An attack routine that is mid-swing is `Active`
/// - A patrol routine that only watches for intruders is `Waiting`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorValue {
    /// The node is actively doing something.
    Active,

    /// The node is idle, only running to silently monitor conditions.
    ///
    /// Also reported by nodes that have not produced a value yet and by nodes
    /// whose sequence has terminated.
    #[default]
    Waiting,
}

impl BehaviorValue {
    /// Returns `true` if this value is `Active`.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, BehaviorValue::Active)
    }

    /// Returns `true` if this value is `Waiting`.
    #[inline]
    pub fn is_waiting(self) -> bool {
        matches!(self, BehaviorValue::Waiting)
    }

    /// `Active` if `active` holds, `Waiting` otherwise.
    #[inline]
    pub fn from_active(active: bool) -> Self {
        if active {
            BehaviorValue::Active
        } else {
            BehaviorValue::Waiting
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_waiting() {
        assert_eq!(BehaviorValue::default(), BehaviorValue::Waiting);
    }

    #[test]
    fn predicates_match_variants() {
        assert!(BehaviorValue::Active.is_active());
        assert!(!BehaviorValue::Active.is_waiting());
        assert!(BehaviorValue::Waiting.is_waiting());
        assert_eq!(BehaviorValue::from_active(true), BehaviorValue::Active);
        assert_eq!(BehaviorValue::from_active(false), BehaviorValue::Waiting);
    }
}
