//! Canonical key order required by the automaton builder.
//!
//! Words are compared code point by code point up to the shorter length; if
//! they agree there, the shorter word (a strict prefix of the other) comes
//! first. Keys handed to the builder must be ascending in this order, which is
//! what lets a word that prefixes a later word keep its own terminal state.

use std::cmp::Ordering;
use std::ops::Deref;

/// Compares two words in key order.
pub fn compare<C: Ord>(left: &[C], right: &[C]) -> Ordering {
    left.iter()
        .zip(right)
        .map(|(l, r)| l.cmp(r))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| left.len().cmp(&right.len()))
}

/// True if `left` sorts strictly before `right`. Equal words are never less
/// than each other, in either direction.
#[inline]
pub fn less<C: Ord>(left: &[C], right: &[C]) -> bool {
    compare(left, right) == Ordering::Less
}

/// Sorts keys into key order. The sort is stable, so equal keys keep their
/// insertion order.
pub fn sort_keys<C: Ord, K: Deref<Target = [C]>>(keys: &mut [K]) {
    keys.sort_by(|a, b| compare(a, b));
}

/// True if the keys are ascending (duplicates allowed).
pub fn is_sorted<C: Ord, K: Deref<Target = [C]>>(keys: &[K]) -> bool {
    keys.windows(2)
        .all(|pair| !less(&pair[1], &pair[0]))
}
