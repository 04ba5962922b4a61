//! # libdictmatch
//!
//! Multi-pattern dictionary matching over Unicode code points.
//!
//! Words are inserted in any order, then compiled once into an immutable,
//! minimal acyclic automaton (a trie whose equal suffixes are shared). The
//! compiled dictionary answers three kinds of queries:
//!
//! - **exact**: is the query one of the words?
//! - **common prefix**: which words does the query start with?
//! - **fuzzy**: which words occur anywhere inside the query, as a contiguous run?
//!
//! "Fuzzy" means substring containment, not edit distance. Positions and
//! lengths are counted in code points, never bytes.
//!
//! ## Quick Start
//!
//! ```
//! use libdictmatch::new_builder;
//!
//! let matcher = new_builder()
//!     .insert(["崩坏", "崩坏·星穹铁道", "星穹铁道", "周年庆"])
//!     .build();
//!
//! assert!(matcher.is_word("星穹铁道"));
//! assert_eq!(
//!     matcher.find_all("崩坏·星穹铁道周年庆").matched_words(),
//!     ["崩坏", "崩坏·星穹铁道", "星穹铁道", "周年庆"]
//! );
//! ```
//!
//! ## Code point slices and sinks
//!
//! The [`WordMatch`] trait works on code point slices and takes an optional
//! [`MatchResult`] sink. Without a sink only the boolean is computed:
//!
//! ```
//! use libdictmatch::{new_builder, MatchResult, WordMatch};
//!
//! let matcher = new_builder().insert(["原", "原神", "礼包"]).build();
//! let query: Vec<char> = "原神".chars().collect();
//!
//! assert!(matcher.fuzzy_match_search(&query, None));
//!
//! let mut res = MatchResult::default();
//! assert!(matcher.fuzzy_match_search(&query, Some(&mut res)));
//! assert_eq!(res.matched_words(), ["原", "原神"]);
//! ```
//!
//! ## Generic Usage
//!
//! The code point type is generic; anything implementing [`DictChar`] works:
//!
//! ```
//! use libdictmatch::{Builder, WordMatch};
//!
//! let matcher = Builder::<u8>::new().insert([b"he".to_vec(), b"hello".to_vec()]).build();
//! assert!(matcher.common_prefix_search(b"hello world", None));
//! assert!(!matcher.exact_match_search(b"hell"));
//! ```
//!
//! An empty dictionary builds into [`Matcher::Empty`], which answers `false`
//! to everything. A compiled [`Matcher`] is cheap to clone and safe to query
//! from many threads at once.

#![warn(missing_docs)]

/// Dictionary construction and queries.
pub mod dict;

pub use dict::{
    new_builder, Automaton, Builder, DictChar, DictError, EmptyMatch, IntoWord, MatchPosition,
    MatchResult, Matcher, WordMatch,
};

#[cfg(test)]
mod test {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn matched_words<C: DictChar>(res: &MatchResult<C>) -> Vec<Vec<C>> {
        res.matches().map(<[C]>::to_vec).collect()
    }

    const GAMES: [&str; 10] = [
        "中华人民共和国",
        "原神",
        "崩坏·星穹铁道",
        "崩铁",
        "崩坏",
        "原",
        "礼包",
        "周年庆",
        "星穹铁道",
        "福利",
    ];

    #[test]
    fn build_empty() {
        let matcher = new_builder().build();
        assert!(!matcher.common_prefix_search(&chars("测试"), None));
        assert!(!matcher.exact_match_search(&[]));
        assert!(!matcher.common_prefix_search(&[], None));
        assert!(!matcher.fuzzy_match_search(&[], None));
    }

    #[test]
    fn exact_match_search() {
        let matcher = new_builder()
            .insert(["中华人民共和国", "原神", "星穹铁道"])
            .build();
        assert!(matcher.exact_match_search(&chars("原神")));
        assert!(!matcher.exact_match_search(&chars("崩坏·星穹铁道")));
    }

    #[test]
    fn fuzzy_match_search() {
        let matcher = new_builder()
            .insert(["中华人民共和国", "原神", "星穹铁道"])
            .build();
        assert!(matcher.fuzzy_match_search(&chars("星穹铁道"), None));
        assert!(matcher.fuzzy_match_search(&chars("崩坏·星穹铁道"), None));
    }

    #[test]
    fn fuzzy_match_search_sub_words() {
        let matcher = new_builder().insert(GAMES).build();
        let mut res = MatchResult::default();
        assert!(matcher.fuzzy_match_search(&chars("原神"), Some(&mut res)));
        assert_eq!(res.matched_words(), ["原", "原神"]);

        assert!(matcher.fuzzy_match_search(&chars("崩坏·星穹铁道周年庆福利礼包"), Some(&mut res)));
        assert_eq!(
            res.matched_words(),
            ["崩坏", "崩坏·星穹铁道", "星穹铁道", "周年庆", "福利", "礼包"]
        );
    }

    #[test]
    fn common_prefix_search_sub_words() {
        let matcher = new_builder().insert(GAMES).build();
        let mut res = MatchResult::default();
        assert!(matcher.common_prefix_search(&chars("崩坏·星穹铁道周年庆"), Some(&mut res)));
        assert_eq!(res.matched_words(), ["崩坏", "崩坏·星穹铁道"]);
        assert!(res.positions.iter().all(|p| p.begin == 0));

        assert!(!matcher.common_prefix_search(&chars("星穹"), Some(&mut res)));
        assert!(res.positions.is_empty());
    }

    #[test]
    fn every_inserted_word_is_found_by_all_searches() {
        let matcher = new_builder().insert(GAMES).insert(["原神"]).build();
        for word in GAMES {
            let word = chars(word);
            assert!(matcher.exact_match_search(&word));

            let mut res = MatchResult::default();
            assert!(matcher.common_prefix_search(&word, Some(&mut res)));
            assert!(matched_words(&res).contains(&word));

            assert!(matcher.fuzzy_match_search(&word, Some(&mut res)));
            assert!(res
                .positions
                .contains(&MatchPosition { begin: 0, length: word.len() }));
        }
    }

    mod properties {
        use super::super::*;
        use quickcheck::{quickcheck, TestResult};

        // Small alphabet so that random queries actually hit random words.
        fn shrink_alphabet(words: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
            words
                .into_iter()
                .map(|w| w.into_iter().map(|b| b % 4).take(6).collect())
                .collect()
        }

        fn query(q: Vec<u8>) -> Vec<u8> {
            q.into_iter().map(|b| b % 4).take(12).collect()
        }

        fn reference_prefixes(words: &[Vec<u8>], q: &[u8]) -> Vec<usize> {
            let mut lengths: Vec<usize> = words
                .iter()
                .filter(|w| !w.is_empty() && q.starts_with(w))
                .map(Vec::len)
                .collect();
            lengths.sort_unstable();
            lengths.dedup();
            lengths
        }

        fn reference_substrings(words: &[Vec<u8>], q: &[u8]) -> Vec<MatchPosition> {
            (0..q.len())
                .flat_map(|begin| {
                    reference_prefixes(words, &q[begin..])
                        .into_iter()
                        .map(move |length| MatchPosition { begin, length })
                })
                .collect()
        }

        quickcheck! {
            fn exact_matches_membership(words: Vec<Vec<u8>>, q: Vec<u8>) -> TestResult {
                let words = shrink_alphabet(words);
                let q = query(q);
                if words.is_empty() {
                    return TestResult::discard();
                }
                let matcher = Builder::<u8>::new().insert(&words).build();
                let all_found = words.iter().all(|w| matcher.exact_match_search(w));
                TestResult::from_bool(
                    all_found && matcher.exact_match_search(&q) == words.contains(&q),
                )
            }

            fn common_prefix_matches_reference(words: Vec<Vec<u8>>, q: Vec<u8>) -> bool {
                let words = shrink_alphabet(words);
                let q = query(q);
                let matcher = Builder::<u8>::new().insert(&words).build();
                let expected = reference_prefixes(&words, &q);

                let mut res = MatchResult::default();
                let found = matcher.common_prefix_search(&q, Some(&mut res));
                let lengths: Vec<usize> = res.positions.iter().map(|p| p.length).collect();
                let sinkless = matcher.common_prefix_search(&q, None);
                if words.is_empty() {
                    return !found && !sinkless;
                }
                found == !expected.is_empty()
                    && sinkless == found
                    && lengths == expected
                    && res.origin_word == q
            }

            fn fuzzy_matches_reference(words: Vec<Vec<u8>>, q: Vec<u8>) -> bool {
                let words = shrink_alphabet(words);
                let q = query(q);
                let matcher = Builder::<u8>::new().insert(&words).build();
                let expected = reference_substrings(&words, &q);

                let mut res = MatchResult::default();
                let found = matcher.fuzzy_match_search(&q, Some(&mut res));
                let sinkless = matcher.fuzzy_match_search(&q, None);
                if words.is_empty() {
                    return !found && !sinkless;
                }
                found == !expected.is_empty() && sinkless == found && res.positions == expected
            }

            fn insertion_order_is_irrelevant(words: Vec<Vec<u8>>, q: Vec<u8>) -> bool {
                let words = shrink_alphabet(words);
                let q = query(q);
                let mut reversed = words.clone();
                reversed.reverse();
                let a = Builder::<u8>::new().insert(&words).build();
                let b = Builder::<u8>::new().insert(&reversed).build();
                let mut ra = MatchResult::default();
                let mut rb = MatchResult::default();
                a.fuzzy_match_search(&q, Some(&mut ra)) == b.fuzzy_match_search(&q, Some(&mut rb))
                    && ra == rb
            }
        }
    }
}
