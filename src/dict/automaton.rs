use smallvec::SmallVec;

use super::char_trait::DictChar;
use super::children::State;
use super::matcher::{MatchPosition, MatchResult, WordMatch};
use super::state_arena::StateId;

/// A compiled, immutable word automaton.
///
/// States live in one flat table and refer to each other by [`StateId`]. Nothing
/// is mutated after construction, so an `Automaton` can be shared between
/// threads (usually behind the `Arc` of a [`Matcher`](super::matcher::Matcher))
/// without any locking.
///
/// # Examples
///
/// ```
/// use libdictmatch::dict::builder::build_sorted;
/// use libdictmatch::{MatchResult, WordMatch};
///
/// let automaton = build_sorted(["原", "原神"]);
/// let query: Vec<char> = "原神启动".chars().collect();
/// let mut res = MatchResult::default();
/// assert!(automaton.common_prefix_search(&query, Some(&mut res)));
/// assert_eq!(res.matched_words(), ["原", "原神"]);
/// ```
#[derive(Clone)]
pub struct Automaton<C: DictChar> {
    states: Box<[State<C>]>,
    root: StateId,
    words: usize,
}

impl<C: DictChar> Automaton<C> {
    pub(crate) fn from_parts(states: Box<[State<C>]>, root: StateId, words: usize) -> Self {
        Automaton {
            states,
            root,
            words,
        }
    }

    /// Id of the root state.
    #[inline]
    pub fn root(&self) -> StateId {
        self.root
    }

    /// Returns the state with the given id.
    #[inline]
    pub fn state(&self, id: StateId) -> &State<C> {
        &self.states[id.index()]
    }

    /// Follows the `letter` transition out of `from`.
    #[inline]
    pub fn transition(&self, from: StateId, letter: C) -> Option<StateId> {
        self.state(from).get(letter)
    }

    /// Follows `word` from the root. Returns the state reached, or `None` as soon
    /// as a code point has no transition.
    #[inline]
    pub fn walk(&self, word: impl IntoIterator<Item = C>) -> Option<StateId> {
        word.into_iter()
            .try_fold(self.root, |id, ch| self.transition(id, ch))
    }

    /// Returns `true` if the given word is in the dictionary.
    pub fn contains(&self, word: impl IntoIterator<Item = C>) -> bool {
        self.walk(word).is_some_and(|id| self.state(id).is_word())
    }

    /// Lengths `k` (ascending) of the dictionary words that equal `word[..k]`.
    ///
    /// The walk goes as far as transitions allow; `k = 0` is never reported.
    pub fn prefix_lengths<'a>(&'a self, word: &'a [C]) -> impl Iterator<Item = usize> + 'a {
        word.iter()
            .scan(self.root, move |id, &ch| {
                *id = self.transition(*id, ch)?;
                Some(*id)
            })
            .enumerate()
            .filter(move |&(_, id)| self.state(id).is_word())
            .map(|(i, _)| i + 1)
    }

    /// Returns the number of unique states in the automaton.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of distinct words in the dictionary.
    pub fn word_count(&self) -> usize {
        self.words
    }

    /// Returns all distinct words in key order.
    pub fn words(&self) -> Vec<Vec<C>> {
        let mut words = Vec::with_capacity(self.words);
        let mut prefix = Vec::new();
        self.collect_words(self.root, &mut prefix, &mut words);
        words
    }

    fn collect_words(&self, id: StateId, prefix: &mut Vec<C>, words: &mut Vec<Vec<C>>) {
        let state = self.state(id);
        if state.is_word() {
            words.push(prefix.clone());
        }
        for (ch, child) in state.children() {
            prefix.push(ch);
            self.collect_words(child, prefix, words);
            prefix.pop();
        }
    }
}

impl<C: DictChar> WordMatch<C> for Automaton<C> {
    fn exact_match_search(&self, word: &[C]) -> bool {
        self.contains(word.iter().copied())
    }

    fn common_prefix_search(&self, word: &[C], res: Option<&mut MatchResult<C>>) -> bool {
        // Always walk the whole way, with or without a sink.
        let lengths: SmallVec<[usize; 8]> = self.prefix_lengths(word).collect();
        if let Some(res) = res {
            res.origin_word = word.to_vec();
            res.positions = lengths
                .iter()
                .map(|&length| MatchPosition { begin: 0, length })
                .collect();
        }
        !lengths.is_empty()
    }

    fn fuzzy_match_search(&self, word: &[C], res: Option<&mut MatchResult<C>>) -> bool {
        match res {
            Some(res) => {
                res.origin_word = word.to_vec();
                res.positions.clear();
                for begin in 0..word.len() {
                    res.positions.extend(
                        self.prefix_lengths(&word[begin..])
                            .map(|length| MatchPosition { begin, length }),
                    );
                }
                !res.positions.is_empty()
            }
            // Without a sink only the first offset with a match matters.
            None => (0..word.len()).any(|begin| self.prefix_lengths(&word[begin..]).next().is_some()),
        }
    }
}

impl<C: DictChar> std::fmt::Debug for Automaton<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Automaton")
            .field("word_count", &self.word_count())
            .field("state_count", &self.state_count())
            .finish()
    }
}
