//! Ready-made resolution functions for [`Concurrent`](crate::Concurrent).

/// Values that compare with themselves; drops NaN and the like.
fn comparable<T: PartialOrd + Copy>(values: &[T]) -> impl Iterator<Item = T> + '_ {
    values
        .iter()
        .copied()
        .filter(|value| value.partial_cmp(value).is_some())
}

/// Smallest value, e.g. fusing independent scores so that any low score wins.
///
/// Incomparable values (NaN) are skipped over, wherever they appear. Returns
/// `T::default()` when no comparable value is left.
pub fn min<T: PartialOrd + Copy + Default>(values: &[T]) -> T {
    comparable(values)
        .reduce(|best, value| if value < best { value } else { best })
        .unwrap_or_default()
}

/// Largest value. Same conventions as [`min`].
pub fn max<T: PartialOrd + Copy + Default>(values: &[T]) -> T {
    comparable(values)
        .reduce(|best, value| if value > best { value } else { best })
        .unwrap_or_default()
}

/// First value in member order.
pub fn first_or_default<T: Copy + Default>(values: &[T]) -> T {
    values.first().copied().unwrap_or_default()
}

/// Ignores member values. Used when only completion matters.
pub fn discard<T>(_values: &[T]) {}
