//! Resolution functions over behavior values, for [`ConcurrentNode`].
//!
//! [`ConcurrentNode`]: crate::ConcurrentNode

use crate::BehaviorValue;

/// State of the first child; `Waiting` if there is none.
pub fn first_or_default(values: &[BehaviorValue]) -> BehaviorValue {
    coroutine::arbitration::first_or_default(values)
}

/// `Active` if at least one child is active.
pub fn any_active(values: &[BehaviorValue]) -> BehaviorValue {
    BehaviorValue::from_active(values.iter().any(|value| value.is_active()))
}

/// `Active` only if every child is active.
pub fn all_active(values: &[BehaviorValue]) -> BehaviorValue {
    BehaviorValue::from_active(!values.is_empty() && values.iter().all(|value| value.is_active()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BehaviorValue::{Active, Waiting};

    #[test]
    fn first_or_default_follows_first_child() {
        assert_eq!(first_or_default(&[Active, Waiting]), Active);
        assert_eq!(first_or_default(&[Waiting, Active]), Waiting);
        assert_eq!(first_or_default(&[]), Waiting);
    }

    #[test]
    fn any_and_all_active() {
        assert_eq!(any_active(&[Waiting, Active]), Active);
        assert_eq!(any_active(&[Waiting, Waiting]), Waiting);
        assert_eq!(all_active(&[Active, Active]), Active);
        assert_eq!(all_active(&[Active, Waiting]), Waiting);
        assert_eq!(all_active(&[]), Waiting);
    }
}
