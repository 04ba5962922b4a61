use std::fmt::Debug;
use std::hash::Hash;

/// Trait for types that can serve as code points of a dictionary word.
///
/// This trait is automatically implemented for any type satisfying all the
/// required bounds (`char`, `u8`, `u16`, `u32`, etc.).
///
/// - `Copy`: transitions store labels by value
/// - `Eq + Ord`: comparing and ordering labels and whole words
/// - `Hash`: state deduplication during construction
/// - `Debug`: debug printing of states and results
/// - `Default`: sentinel label for the builder's root entry
pub trait DictChar: Copy + Eq + Ord + Hash + Debug + Default {}

impl<T: Copy + Eq + Ord + Hash + Debug + Default> DictChar for T {}
