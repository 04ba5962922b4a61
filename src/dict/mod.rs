/// Dictionary builder: word store, automaton construction and text loading.
pub mod builder;
/// Trait for types that can serve as code points of a word.
pub mod char_trait;
/// Automaton states and their transition lists.
pub mod children;
/// The compiled, immutable word automaton.
pub mod automaton;
/// Query contract, match results and the engine selected at build time.
pub mod matcher;
/// Canonical key order the builder requires.
pub mod order;
/// Flat table of states addressed by index.
pub mod state_arena;

pub use automaton::Automaton;
pub use builder::{new_builder, Builder, DictError, IntoWord};
pub use char_trait::DictChar;
pub use children::State;
pub use matcher::{EmptyMatch, MatchPosition, MatchResult, Matcher, WordMatch};
pub use state_arena::StateId;
