//! Partition Sort Engine
//!
//! In-place, divide-and-conquer partition sort driven by a caller-supplied
//! comparison rule.
//!
//! Each pass takes the last element of the range as pivot, scans the range
//! once moving every element `<=` pivot to the left of a boundary, then swaps
//! the pivot onto that boundary. Both sides are then sorted independently.
//!
//! Best and average cases are O(n log n). Already-sorted input degrades to
//! O(n²) because of the fixed pivot choice. The sort is not stable.

use std::cmp::Ordering;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{panic_message, ComparatorError, SortError};

/// Outcome of a single comparison.
pub type CompareResult = std::result::Result<Ordering, ComparatorError>;

// == Comparator ==
/// A comparison rule over `T`.
///
/// Implementations must describe a strict weak ordering; otherwise the
/// relative order of the affected elements is unspecified.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, left: &T, right: &T) -> CompareResult;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> CompareResult,
{
    fn compare(&self, left: &T, right: &T) -> CompareResult {
        self(left, right)
    }
}

/// Adapts an infallible ordering function into a [`Comparator`].
pub fn infallible<T: ?Sized>(
    order: impl Fn(&T, &T) -> Ordering,
) -> impl Fn(&T, &T) -> CompareResult {
    move |left: &T, right: &T| Ok(order(left, right))
}

// == Sort ==
/// Sorts `items` in place according to `comparator`.
///
/// Fails with [`SortError::EmptySequence`] on an empty slice and with
/// [`SortError::ComparisonFailed`] if the comparator errors or panics, in
/// which case `items` is left as a permutation of the input in unspecified
/// order.
pub fn sort<T, C>(items: &mut [T], comparator: &C) -> Result<(), SortError>
where
    C: Comparator<T> + ?Sized,
{
    if items.is_empty() {
        return Err(SortError::EmptySequence);
    }

    sort_range(items, 0, items.len() - 1, comparator)
}

/// Sorts the inclusive range `low..=high`.
///
/// Recurses into the smaller side and loops over the larger one so stack
/// depth stays logarithmic even when partitions are maximally unbalanced.
fn sort_range<T, C>(
    items: &mut [T],
    mut low: usize,
    mut high: usize,
    comparator: &C,
) -> Result<(), SortError>
where
    C: Comparator<T> + ?Sized,
{
    while low < high {
        let pivot = partition(items, low, high, comparator)?;

        let left_len = pivot - low;
        let right_len = high - pivot;

        if left_len < right_len {
            if left_len > 1 {
                sort_range(items, low, pivot - 1, comparator)?;
            }
            low = pivot + 1;
        } else {
            if right_len > 1 {
                sort_range(items, pivot + 1, high, comparator)?;
            }
            // The range holds at least two elements and left_len >= right_len,
            // so pivot > low.
            high = pivot - 1;
        }
    }

    Ok(())
}

/// Partitions `low..=high` around `items[high]` and returns the pivot's
/// final index.
fn partition<T, C>(items: &mut [T], low: usize, high: usize, comparator: &C) -> Result<usize, SortError>
where
    C: Comparator<T> + ?Sized,
{
    validate_indices(items, low, high)?;

    // Everything left of `boundary` compares <= pivot.
    let mut boundary = low;
    for cursor in low..high {
        let ordering = compare_guarded(comparator, &items[cursor], &items[high])
            .map_err(|source| SortError::ComparisonFailed { source })?;

        if ordering != Ordering::Greater {
            swap(items, boundary, cursor)?;
            boundary += 1;
        }
    }

    swap(items, boundary, high)?;
    Ok(boundary)
}

/// Runs one comparison, turning a panic inside the rule into an error.
fn compare_guarded<T, C>(comparator: &C, left: &T, right: &T) -> CompareResult
where
    C: Comparator<T> + ?Sized,
{
    panic::catch_unwind(AssertUnwindSafe(|| comparator.compare(left, right))).unwrap_or_else(
        |payload| {
            Err(format!("comparator panicked: {}", panic_message(payload.as_ref())).into())
        },
    )
}

fn swap<T>(items: &mut [T], left: usize, right: usize) -> Result<(), SortError> {
    validate_indices(items, left, right)?;
    items.swap(left, right);
    Ok(())
}

fn validate_indices<T>(items: &[T], left: usize, right: usize) -> Result<(), SortError> {
    let len = items.len();
    if left >= len || right >= len {
        return Err(SortError::IndexOutOfRange { left, right, len });
    }
    Ok(())
}
