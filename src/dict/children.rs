use super::char_trait::DictChar;
use super::state_arena::StateId;

/// A compact representation of the outgoing transitions of a [`State`] that doesn't
/// allocate until there are at least three of them.
///
/// Labels are unique per state. When built from sorted keys they are also in
/// ascending order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Children<C: DictChar> {
    /// No transitions.
    None,
    /// Exactly one transition (label, target).
    One((C, StateId)),
    /// Exactly two transitions (label1, target1, label2, target2).
    Two((C, StateId, C, StateId)),
    /// Three or more transitions stored in a vector.
    Many(Vec<(C, StateId)>),
}

impl<C: DictChar> Children<C> {
    /// Gets the transition at the specified index.
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<(C, StateId)> {
        match self {
            Children::None => None,
            Children::One(child) => match index {
                0 => Some(*child),
                _ => None,
            },
            Children::Two((c1, s1, c2, s2)) => match index {
                0 => Some((*c1, *s1)),
                1 => Some((*c2, *s2)),
                _ => None,
            },
            Children::Many(children) => children.get(index).copied(),
        }
    }

    /// Returns the number of transitions.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Two(_) => 2,
            Children::Many(children) => children.len(),
        }
    }

    /// Returns true if there are no transitions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Children::None)
    }
}

/// An iterator over the transitions of a [`State`].
#[derive(Clone)]
pub struct ChildIter<'a, C: DictChar> {
    children: &'a Children<C>,
    index: usize,
}

impl<C: DictChar> Iterator for ChildIter<'_, C> {
    type Item = (C, StateId);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let next_child = self.children.get(self.index)?;
        self.index += 1;
        Some(next_child)
    }

    /// Since we know the exact size, we can do better than the default implementation.
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.children.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<C: DictChar> ExactSizeIterator for ChildIter<'_, C> {}

/// A state of the word automaton.
///
/// Equality and hashing are structural over the terminal flag and the
/// transitions. Transition targets are compared by id, which is exact as long
/// as every target is already frozen (states are frozen bottom-up).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State<C: DictChar> {
    children: Children<C>,
    word: bool,
}

impl<C: DictChar> State<C> {
    /// Creates a new state without transitions.
    ///
    /// # Arguments
    ///
    /// * `word` - Whether this state marks the end of an inserted word
    pub fn new(word: bool) -> Self {
        State {
            children: Children::None,
            word,
        }
    }

    /// Returns the state that the `letter` transition leads to, or None if no such
    /// transition exists.
    #[inline]
    pub fn get(&self, letter: C) -> Option<StateId> {
        match &self.children {
            Children::None => None,
            Children::One((ch, target)) => (*ch == letter).then_some(*target),
            Children::Two((c1, s1, c2, s2)) => {
                if letter == *c1 {
                    Some(*s1)
                } else if letter == *c2 {
                    Some(*s2)
                } else {
                    None
                }
            }
            Children::Many(children) => {
                // Unrolling by 2 exposes load-level parallelism and beats both
                // binary search and a scalar loop on the short lists seen here.
                let chunks = children.chunks_exact(2);
                let remainder = chunks.remainder();
                for chunk in chunks {
                    if chunk[0].0 == letter {
                        return Some(chunk[0].1);
                    }
                    if chunk[1].0 == letter {
                        return Some(chunk[1].1);
                    }
                }
                remainder
                    .iter()
                    .find(|&&(ch, _)| ch == letter)
                    .map(|&(_, target)| target)
            }
        }
    }

    /// True if an inserted word ends at this state.
    #[inline]
    pub fn is_word(&self) -> bool {
        self.word
    }

    pub(crate) fn set_word(&mut self) {
        self.word = true;
    }

    /// Appends a transition.
    ///
    /// Labels must arrive in ascending order and must not repeat; the builder
    /// guarantees both for sorted input.
    pub fn insert(&mut self, letter: C, target: StateId) {
        debug_assert!(self.children().all(|(ch, _)| ch != letter));
        let c = (letter, target);
        match &mut self.children {
            Children::None => self.children = Children::One(c),
            Children::One((c1, s1)) => self.children = Children::Two((*c1, *s1, c.0, c.1)),
            Children::Two((c1, s1, c2, s2)) => {
                self.children = Children::Many(vec![(*c1, *s1), (*c2, *s2), c])
            }
            Children::Many(children) => children.push(c),
        };
    }

    /// Returns an iterator over all transitions of this state.
    #[inline]
    pub fn children(&self) -> ChildIter<'_, C> {
        ChildIter {
            children: &self.children,
            index: 0,
        }
    }

    /// Returns the number of transitions.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn id(n: u32) -> StateId {
        StateId::new(n)
    }

    #[test]
    fn no_children() {
        let s = State::<char>::new(false);
        assert_eq!(s.children().next(), None);
        assert_eq!(s.child_count(), 0);
        assert_eq!(s.get('a'), None);
    }

    #[test]
    fn one_child() {
        let mut s = State::new(false);
        s.insert('a', id(1));
        let mut children = s.children();
        assert_eq!(children.next(), Some(('a', id(1))));
        assert_eq!(children.next(), None);
        assert_eq!(s.get('a'), Some(id(1)));
        assert_eq!(s.get('b'), None);
    }

    #[test]
    fn two_children() {
        let mut s = State::new(true);
        s.insert('a', id(1));
        s.insert('b', id(2));
        assert_eq!(s.children().collect::<Vec<_>>(), [('a', id(1)), ('b', id(2))]);
        assert_eq!(s.get('b'), Some(id(2)));
        assert_eq!(s.child_count(), 2);
        assert!(s.is_word());
    }

    #[test]
    fn three_children_spill_into_vec() {
        let mut s = State::new(false);
        s.insert('a', id(1));
        s.insert('b', id(2));
        s.insert('c', id(3));
        assert!(matches!(s.children, Children::Many(_)));
        assert_eq!(s.get('c'), Some(id(3)));
        assert_eq!(s.children().len(), 3);
    }

    #[test]
    fn a_thousand_children() {
        let mut s = State::new(false);
        let letters = (0..).filter_map(char::from_u32).take(1000);
        for (n, ch) in letters.clone().enumerate() {
            s.insert(ch, id(n as u32));
        }
        for (n, ch) in letters.enumerate() {
            assert_eq!(s.get(ch), Some(id(n as u32)));
        }
        assert_eq!(s.get('\u{10FFFF}'), None);
        assert_eq!(s.child_count(), 1000);
    }

    #[test]
    fn structural_equality() {
        let mut a = State::new(true);
        a.insert('x', id(7));
        let mut b = State::new(true);
        b.insert('x', id(7));
        assert_eq!(a, b);
        b.insert('y', id(8));
        assert_ne!(a, b);
        assert_ne!(State::<char>::new(true), State::new(false));
    }
}
