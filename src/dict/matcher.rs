//! The query contract and the two engines that implement it.
//!
//! [`Builder::build`](super::builder::Builder::build) picks the engine once: an
//! [`Automaton`] for a non-empty dictionary, [`EmptyMatch`] otherwise. Callers
//! hold the result as a [`Matcher`] and never need to special-case "no words".

use std::ops::Range;
use std::sync::Arc;

use super::automaton::Automaton;
use super::builder::Builder;
use super::char_trait::DictChar;

/// A matched span of the queried word, in code points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MatchPosition {
    /// Offset of the first matched code point.
    pub begin: usize,
    /// Length of the matched dictionary word.
    pub length: usize,
}

impl MatchPosition {
    /// Offset one past the last matched code point.
    #[inline]
    pub fn end(&self) -> usize {
        self.begin + self.length
    }

    /// The matched code points as a range into the origin word.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.begin..self.end()
    }
}

/// Output sink of the prefix and substring searches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult<C: DictChar = char> {
    /// The queried word.
    pub origin_word: Vec<C>,
    /// Matches in the order the search discovered them.
    pub positions: Vec<MatchPosition>,
}

impl<C: DictChar> Default for MatchResult<C> {
    fn default() -> Self {
        MatchResult {
            origin_word: Vec::new(),
            positions: Vec::new(),
        }
    }
}

impl<C: DictChar> MatchResult<C> {
    fn for_query(origin_word: Vec<C>) -> Self {
        MatchResult {
            origin_word,
            positions: Vec::new(),
        }
    }

    /// Each matched span as a slice of the origin word.
    ///
    /// # Panics
    ///
    /// Panics if a position lies outside the origin word, which can only happen
    /// if the fields were edited by hand.
    pub fn matches(&self) -> impl Iterator<Item = &[C]> + '_ {
        self.positions
            .iter()
            .map(|pos| &self.origin_word[pos.range()])
    }

    /// True if no position was recorded.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl MatchResult<char> {
    /// Decodes every matched span back into a string.
    pub fn matched_words(&self) -> Vec<String> {
        self.matches().map(|m| m.iter().collect()).collect()
    }
}

/// Read-only queries against a compiled dictionary.
///
/// All operations are total. Implementations must not mutate shared state, so
/// any number of threads may query one engine concurrently.
pub trait WordMatch<C: DictChar> {
    /// True if `word` is exactly one of the dictionary words.
    fn exact_match_search(&self, word: &[C]) -> bool;

    /// Finds every dictionary word that is a prefix of `word` (including `word`
    /// itself), shortest first.
    ///
    /// Returns true if at least one was found. When `res` is given, it receives
    /// `word` and one `{begin: 0, length}` position per match.
    fn common_prefix_search(&self, word: &[C], res: Option<&mut MatchResult<C>>) -> bool;

    /// Finds every dictionary word occurring as a contiguous run anywhere in `word`.
    ///
    /// When `res` is given, every start offset is scanned and matches are recorded
    /// ordered by `begin`, then by `length`. Without `res`, the scan stops at the
    /// first start offset that has a match.
    fn fuzzy_match_search(&self, word: &[C], res: Option<&mut MatchResult<C>>) -> bool;
}

/// Engine used for an empty dictionary.
///
/// Every query returns false and leaves the sink, if any, untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmptyMatch;

impl<C: DictChar> WordMatch<C> for EmptyMatch {
    fn exact_match_search(&self, _word: &[C]) -> bool {
        false
    }

    fn common_prefix_search(&self, _word: &[C], _res: Option<&mut MatchResult<C>>) -> bool {
        false
    }

    fn fuzzy_match_search(&self, _word: &[C], _res: Option<&mut MatchResult<C>>) -> bool {
        false
    }
}

/// A built dictionary: either empty or a shared compiled automaton.
///
/// Cloning is cheap and shares the automaton.
#[derive(Clone, Debug)]
pub enum Matcher<C: DictChar = char> {
    /// Built from an empty dictionary.
    Empty(EmptyMatch),
    /// Built from at least one word.
    Compiled(Arc<Automaton<C>>),
}

impl<C: DictChar> Matcher<C> {
    /// Starts a new dictionary.
    pub fn builder() -> Builder<C> {
        Builder::new()
    }

    /// True if the dictionary was empty at build time.
    pub fn is_empty(&self) -> bool {
        matches!(self, Matcher::Empty(_))
    }

    /// The compiled automaton, if there is one.
    pub fn automaton(&self) -> Option<&Automaton<C>> {
        match self {
            Matcher::Empty(_) => None,
            Matcher::Compiled(automaton) => Some(automaton),
        }
    }

    fn engine(&self) -> &dyn WordMatch<C> {
        match self {
            Matcher::Empty(empty) => empty,
            Matcher::Compiled(automaton) => automaton.as_ref(),
        }
    }
}

impl<C: DictChar> WordMatch<C> for Matcher<C> {
    fn exact_match_search(&self, word: &[C]) -> bool {
        self.engine().exact_match_search(word)
    }

    fn common_prefix_search(&self, word: &[C], res: Option<&mut MatchResult<C>>) -> bool {
        self.engine().common_prefix_search(word, res)
    }

    fn fuzzy_match_search(&self, word: &[C], res: Option<&mut MatchResult<C>>) -> bool {
        self.engine().fuzzy_match_search(word, res)
    }
}

impl Matcher<char> {
    /// True if `text` is exactly one of the dictionary words.
    pub fn is_word(&self, text: &str) -> bool {
        self.automaton()
            .is_some_and(|automaton| automaton.contains(text.chars()))
    }

    /// All dictionary words that prefix `text`, shortest first.
    pub fn find_prefixes(&self, text: &str) -> MatchResult<char> {
        let query: Vec<char> = text.chars().collect();
        let mut res = MatchResult::for_query(query.clone());
        self.common_prefix_search(&query, Some(&mut res));
        res
    }

    /// All dictionary words occurring in `text`, by start offset then length.
    pub fn find_all(&self, text: &str) -> MatchResult<char> {
        let query: Vec<char> = text.chars().collect();
        let mut res = MatchResult::for_query(query.clone());
        self.fuzzy_match_search(&query, Some(&mut res));
        res
    }
}
