use hashbrown::{DefaultHashBuilder, HashTable};
use mark_last::MarkLastIterator;
use smallvec::SmallVec;
use tracing::{debug, trace};

use std::error::Error;
use std::fs::File;
use std::hash::BuildHasher;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use super::automaton::Automaton;
use super::char_trait::DictChar;
use super::children::State;
use super::matcher::{EmptyMatch, Matcher};
use super::order;
use super::state_arena::{StateArena, StateId};

/// A word as stored by the builder: its code points, inline up to 32 of them.
pub type Word<C> = SmallVec<[C; 32]>;

/// Trait for types that can be used as a word when building a dictionary.
///
/// Implemented for common string and sequence types so that [`Builder::insert`]
/// and [`Builder::add_word`] accept them directly without manual conversion.
/// Strings are decoded into their `char`s (Unicode scalar values).
pub trait IntoWord<C: DictChar> {
    /// Collects this word into a code point buffer.
    fn collect_word(self) -> Word<C>;
}

// String types → char

impl IntoWord<char> for &str {
    fn collect_word(self) -> Word<char> {
        self.chars().collect()
    }
}

impl IntoWord<char> for &&str {
    fn collect_word(self) -> Word<char> {
        self.chars().collect()
    }
}

impl IntoWord<char> for String {
    fn collect_word(self) -> Word<char> {
        self.chars().collect()
    }
}

impl IntoWord<char> for &String {
    fn collect_word(self) -> Word<char> {
        self.chars().collect()
    }
}

// Generic sequence types → C

impl<C: DictChar> IntoWord<C> for &[C] {
    fn collect_word(self) -> Word<C> {
        self.iter().copied().collect()
    }
}

impl<C: DictChar> IntoWord<C> for Vec<C> {
    fn collect_word(self) -> Word<C> {
        self.into_iter().collect()
    }
}

impl<C: DictChar> IntoWord<C> for &Vec<C> {
    fn collect_word(self) -> Word<C> {
        self.iter().copied().collect()
    }
}

impl<C: DictChar, const N: usize> IntoWord<C> for [C; N] {
    fn collect_word(self) -> Word<C> {
        self.into_iter().collect()
    }
}

impl<C: DictChar, const N: usize> IntoWord<C> for &[C; N] {
    fn collect_word(self) -> Word<C> {
        self.iter().copied().collect()
    }
}

/// Single-pass automaton construction over sorted keys.
///
/// The path of the previous key is kept on `build_state`. When the next key
/// arrives, everything past the common prefix is frozen bottom-up: each state
/// is looked up in `register` and replaced by an existing equal state when
/// there is one, so suffixes are shared as well as prefixes.
///
/// Keys **must** arrive in the order defined by [`order::compare`]. This is not
/// validated outside of debug builds; out-of-order keys give an automaton that
/// may be missing words.
pub(crate) struct BuilderCore<C: DictChar> {
    arena: StateArena<C>,
    build_state: Vec<BuildState<C>>,
    register: HashTable<StateId>,
    hasher: DefaultHashBuilder,
    words: usize,
}

struct BuildState<C: DictChar> {
    ch: C,
    state: State<C>,
}

impl<C: DictChar> BuilderCore<C> {
    pub(crate) fn new() -> Self {
        BuilderCore {
            arena: StateArena::new(),
            build_state: vec![BuildState {
                ch: C::default(),
                state: State::new(false),
            }],
            register: HashTable::new(),
            hasher: DefaultHashBuilder::default(),
            words: 0,
        }
    }

    /// Adds the next key. An empty key marks the root as terminal; a key equal
    /// to the previous one changes nothing.
    pub(crate) fn add_word_slice(&mut self, word: &[C]) {
        let prefix_length = self.prefix_length(word);
        self.canonicalize_suffix(prefix_length);
        if prefix_length == word.len() {
            let last = &mut self.last_build_state().state;
            if !last.is_word() {
                last.set_word();
                self.words += 1;
            }
            return;
        }
        self.words += 1;
        self.build_state.extend(
            word[prefix_length..]
                .iter()
                .copied()
                .mark_last()
                .map(|(last, ch)| BuildState {
                    ch,
                    state: State::new(last),
                }),
        );
    }

    fn prefix_length(&self, word: &[C]) -> usize {
        let prefix_len = word
            .iter()
            .zip(&self.build_state[1..])
            .take_while(|&(&ch, prev)| ch == prev.ch)
            .count();
        debug_assert!(
            self.follows_previous(word, prefix_len),
            "keys out of order: {:?} came before {:?}",
            self.previous_word(),
            word
        );
        prefix_len
    }

    fn follows_previous(&self, word: &[C], prefix_len: usize) -> bool {
        match (word.get(prefix_len), self.build_state.get(prefix_len + 1)) {
            (Some(&ch), Some(prev)) => ch > prev.ch,
            // A strict prefix of the previous key.
            (None, Some(_)) => false,
            (_, None) => true,
        }
    }

    fn previous_word(&self) -> Vec<C> {
        self.build_state[1..].iter().map(|e| e.ch).collect()
    }

    fn canonicalize_suffix(&mut self, target_length: usize) {
        debug_assert!(self.build_state.len() > target_length);
        while self.build_state.len() > target_length + 1 {
            let entry = self.pop_build_state();
            let child = self.canonicalize(entry.state);
            self.last_build_state().state.insert(entry.ch, child);
        }
    }

    fn pop_build_state(&mut self) -> BuildState<C> {
        self.build_state
            .pop()
            .expect("Build state will always have at least one entry")
    }

    fn last_build_state(&mut self) -> &mut BuildState<C> {
        self.build_state
            .last_mut()
            .expect("Build state will always have at least one entry")
    }

    fn canonicalize(&mut self, state: State<C>) -> StateId {
        debug_assert!(
            state
                .children()
                .all(|(_, target)| target.index() < self.arena.len()),
            "Cannot canonicalize unless all children are frozen"
        );

        let hash = self.hasher.hash_one(&state);
        if let Some(&id) = self.register.find(hash, |&id| self.arena[id] == state) {
            return id;
        }
        let Self {
            arena,
            register,
            hasher,
            ..
        } = self;
        let id = arena.alloc(state);
        register.insert_unique(hash, id, |&id| hasher.hash_one(&arena[id]));
        id
    }

    /// Freezes the remaining path and returns the finished automaton.
    pub(crate) fn build(mut self) -> Automaton<C> {
        self.canonicalize_suffix(0);
        let root = self.pop_build_state().state;
        let root = self.canonicalize(root);
        Automaton::from_parts(self.arena.into_boxed_slice(), root, self.words)
    }
}

/// Builds an automaton directly from keys that are already in key order.
///
/// This skips the sort that [`Builder::build`] performs. Sorting the keys is the
/// caller's responsibility: out-of-order keys are not reported (debug builds
/// panic) and the resulting automaton may be missing words. Duplicates are fine.
///
/// # Examples
///
/// ```
/// use libdictmatch::dict::builder::build_sorted;
///
/// let automaton = build_sorted(["APPLE", "APPLET", "BANANA"]);
/// assert!(automaton.contains("APPLE".chars()));
/// assert!(!automaton.contains("APP".chars()));
/// ```
pub fn build_sorted<C, W>(words: impl IntoIterator<Item = W>) -> Automaton<C>
where
    C: DictChar,
    W: IntoWord<C>,
{
    let mut core = BuilderCore::new();
    for word in words {
        core.add_word_slice(&word.collect_word());
    }
    core.build()
}

/// Accumulates dictionary words and compiles them into a [`Matcher`].
///
/// Words can be inserted in any order and may repeat. [`build`](Builder::build)
/// sorts them into key order before construction.
///
/// # Examples
///
/// ```
/// use libdictmatch::{new_builder, WordMatch};
///
/// let matcher = new_builder().insert(["中华人民共和国", "原神", "星穹铁道"]).build();
/// let query: Vec<char> = "原神".chars().collect();
/// assert!(matcher.exact_match_search(&query));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder<C: DictChar = char> {
    keys: Vec<Word<C>>,
}

/// Creates a builder for `char` words with an empty dictionary.
pub fn new_builder() -> Builder<char> {
    Builder::new()
}

impl<C: DictChar> Builder<C> {
    /// Creates a builder with an empty dictionary.
    pub fn new() -> Self {
        Builder { keys: Vec::new() }
    }

    /// Creates an empty builder with room for `capacity` words.
    pub fn with_capacity(capacity: usize) -> Self {
        Builder {
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Appends every word of `words` to the dictionary and returns the builder,
    /// so calls can be chained.
    pub fn insert<W: IntoWord<C>>(mut self, words: impl IntoIterator<Item = W>) -> Self {
        for word in words {
            self.add_word(word);
        }
        self
    }

    /// Appends a single word to the dictionary.
    ///
    /// The word is stored as-is: no validation and no deduplication.
    pub fn add_word(&mut self, word: impl IntoWord<C>) -> &mut Self {
        self.keys.push(word.collect_word());
        self
    }

    /// Number of words inserted so far, duplicates included.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if no word has been inserted.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sorts the dictionary and compiles it.
    ///
    /// An empty dictionary yields [`Matcher::Empty`] without running the
    /// construction at all.
    pub fn build(mut self) -> Matcher<C> {
        if self.keys.is_empty() {
            debug!(target: "libdictmatch::build", "no words inserted, using the empty matcher");
            return Matcher::Empty(EmptyMatch);
        }

        order::sort_keys(&mut self.keys);
        let mut core = BuilderCore::new();
        for key in &self.keys {
            core.add_word_slice(key);
        }
        let automaton = core.build();
        debug!(
            target: "libdictmatch::build",
            words = self.keys.len(),
            distinct = automaton.word_count(),
            states = automaton.state_count(),
            "compiled dictionary automaton"
        );
        Matcher::Compiled(Arc::new(automaton))
    }
}

impl Builder<char> {
    /// Inserts the words of a text source, one word per line.
    ///
    /// Trailing whitespace is trimmed. Empty lines and lines whose first
    /// non-blank character is `#` are skipped. Lines need not be sorted.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdictmatch::new_builder;
    ///
    /// let text = "# games\n原神\n\n星穹铁道\n";
    /// let builder = new_builder().insert_from_reader(text.as_bytes()).unwrap();
    /// assert_eq!(builder.len(), 2);
    /// ```
    pub fn insert_from_reader<R: BufRead>(mut self, mut reader: R) -> Result<Self, DictError> {
        // read_line into a single buffer avoids allocating a String per line.
        let mut buf = String::with_capacity(80);
        let mut line = 0;
        loop {
            buf.clear();
            line += 1;
            let bytes_read = reader
                .read_line(&mut buf)
                .map_err(|source| DictError::Read { line, source })?;
            if bytes_read == 0 {
                break;
            }
            let word = buf.trim_end();
            if word.is_empty() {
                continue;
            }
            if is_comment(word) {
                trace!(target: "libdictmatch::load", line, "skipping comment line");
                continue;
            }
            self.add_word(word);
        }
        Ok(self)
    }

    /// Inserts the words of a dictionary file. See
    /// [`insert_from_reader`](Builder::insert_from_reader) for the format.
    ///
    /// ```no_run
    /// use libdictmatch::new_builder;
    ///
    /// let matcher = new_builder().insert_from_file("dictionary.txt").unwrap().build();
    /// ```
    pub fn insert_from_file(self, path: impl AsRef<Path>) -> Result<Self, DictError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let before = self.len();
        let builder = self.insert_from_reader(BufReader::new(file))?;
        debug!(
            target: "libdictmatch::load",
            path = %path.display(),
            words = builder.len() - before,
            "loaded word file"
        );
        Ok(builder)
    }
}

/// Returns true if this line is a comment.
pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Errors that can occur while loading dictionary words from text.
#[derive(Debug)]
pub enum DictError {
    /// The source could not be opened.
    Io(io::Error),
    /// Reading failed at the given 1-based line, e.g. on invalid UTF-8.
    Read {
        /// Line being read when the error occurred.
        line: usize,
        /// The underlying error.
        source: io::Error,
    },
}

impl std::fmt::Display for DictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DictError::Io(e) => write!(f, "I/O error: {e}"),
            DictError::Read { line, source } => write!(f, "failed to read line {line}: {source}"),
        }
    }
}

impl Error for DictError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DictError::Io(e) => Some(e),
            DictError::Read { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for DictError {
    fn from(e: io::Error) -> Self {
        DictError::Io(e)
    }
}
