//! A flat, index-addressed table of automaton states.
//!
//! States refer to each other through [`StateId`]s instead of references, so the
//! finished table can be moved, shared behind an `Arc` and read from any thread.

use std::ops::Index;

use super::char_trait::DictChar;
use super::children::State;

/// Index of a state inside a [`StateArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    pub(crate) const fn new(index: u32) -> Self {
        StateId(index)
    }

    /// Position of the state in its table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An append-only table of states.
#[derive(Clone, Debug)]
pub(crate) struct StateArena<C: DictChar> {
    states: Vec<State<C>>,
}

impl<C: DictChar> StateArena<C> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        StateArena { states: Vec::new() }
    }

    /// Appends a state and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` states.
    pub fn alloc(&mut self, state: State<C>) -> StateId {
        let index = u32::try_from(self.states.len()).expect("state table overflow");
        self.states.push(state);
        StateId(index)
    }

    /// Returns the number of states allocated in this arena.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Releases spare capacity and hands the states over to the finished automaton.
    pub fn into_boxed_slice(self) -> Box<[State<C>]> {
        self.states.into_boxed_slice()
    }
}

impl<C: DictChar> Index<StateId> for StateArena<C> {
    type Output = State<C>;

    #[inline]
    fn index(&self, id: StateId) -> &State<C> {
        &self.states[id.index()]
    }
}
