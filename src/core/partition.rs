//! Width-aligned partitioning of a batch

/// Split `items` into a prefix whose length is a multiple of `divisor` and
/// the remaining tail. Inputs shorter than `divisor` are all tail.
///
/// Concatenating the two halves yields `items` unchanged.
///
/// # Panics
///
/// Panics if `divisor` is zero.
pub fn align_slice<T>(items: &[T], divisor: usize) -> (&[T], &[T]) {
    assert!(divisor > 0, "alignment divisor must be positive");

    if items.len() < divisor {
        return (&[], items);
    }

    let extra = items.len() % divisor;
    items.split_at(items.len() - extra)
}

/// Owned counterpart of [`align_slice`]
///
/// # Panics
///
/// Panics if `divisor` is zero.
pub fn align_vec<T>(mut items: Vec<T>, divisor: usize) -> (Vec<T>, Vec<T>) {
    assert!(divisor > 0, "alignment divisor must be positive");

    if items.len() < divisor {
        return (Vec::new(), items);
    }

    let extra = items.len() % divisor;
    let tail = items.split_off(items.len() - extra);
    (items, tail)
}
