//! Token-keyed interval index
//!
//! [`TimelineIndex`] is the public surface of the crate. It keeps the
//! range each token was registered with in a hash map (the source of truth
//! for [`has`](TimelineIndex::has) and
//! [`get_range`](TimelineIndex::get_range)) and mirrors those ranges into
//! an [`IntervalTree`] for spatial queries.
//!
//! The index performs no internal locking. Share it across threads behind
//! a `Mutex` or `RwLock` covering every call.

mod error;

pub use error::{IndexError, IndexResult};

use crate::config::IndexPreferences;
use crate::logging::codes;
use crate::tree::{Fragments, IntervalTree};
use crate::utils::{Coordinate, Span};
use crate::{log_debug, log_error, log_info, log_warning};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Maps tokens to half-open ranges and answers overlap queries
#[derive(Debug, Clone)]
pub struct TimelineIndex<K, C> {
    tree: IntervalTree<K, C>,
    ranges: HashMap<K, Span<C>>,
    preferences: IndexPreferences,
}

impl<K, C> Default for TimelineIndex<K, C>
where
    K: Eq + Hash + Clone,
    C: Coordinate,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> TimelineIndex<K, C>
where
    K: Eq + Hash + Clone,
    C: Coordinate,
{
    /// Create an empty index using environment preferences
    pub fn new() -> Self {
        Self::with_preferences(IndexPreferences::default())
    }

    /// Create an empty index with explicit preferences
    pub fn with_preferences(preferences: IndexPreferences) -> Self {
        Self {
            tree: IntervalTree::new().with_structure_logging(preferences.log_structure),
            ranges: HashMap::new(),
            preferences,
        }
    }

    pub fn preferences(&self) -> &IndexPreferences {
        &self.preferences
    }

    /// Number of registered tokens
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of distinct fragments the registered ranges are split into
    pub fn fragment_count(&self) -> usize {
        self.tree.fragment_count()
    }

    pub fn has(&self, token: &K) -> bool {
        self.ranges.contains_key(token)
    }

    /// The range `token` was registered with
    pub fn get_range(&self, token: &K) -> Option<Span<C>> {
        self.ranges.get(token).copied()
    }

    /// Whether any registered range intersects `[start, end)`
    pub fn filled(&self, start: C, end: C) -> IndexResult<bool> {
        let span = self.checked_span(start, end)?;
        Ok(self.tree.filled(&span))
    }

    /// Whether any registered range covers the point `at`
    pub fn filled_at(&self, at: C) -> bool {
        self.tree.filled(&Span::point(at))
    }

    /// Tokens whose ranges intersect `[start, end)`
    pub fn get_keys(&self, start: C, end: C) -> IndexResult<HashSet<&K>> {
        let span = self.checked_span(start, end)?;
        Ok(self.tree.keys(&span))
    }

    /// Tokens whose ranges cover the point `at`
    pub fn get_keys_at(&self, at: C) -> HashSet<&K> {
        self.tree.keys(&Span::point(at))
    }

    /// Register `token` over `[start, end)`.
    ///
    /// Setting a token to the range it already has is a no-op; a different
    /// range replaces the old one. Fails without touching the index when
    /// `end < start`.
    pub fn set(&mut self, token: K, start: C, end: C) -> IndexResult<&mut Self> {
        let span = self.checked_span(start, end)?;
        self.register(token, span);
        Ok(self)
    }

    /// Register `token` at the single point `at`
    pub fn set_at(&mut self, token: K, at: C) -> &mut Self {
        self.register(token, Span::point(at));
        self
    }

    /// Unregister `token`. Returns `false` if it was not registered.
    pub fn remove(&mut self, token: &K) -> bool {
        let Some(span) = self.ranges.remove(token) else {
            return false;
        };

        self.tree.remove(token, &span);
        log_debug!(
            codes::index::TOKEN_REMOVED,
            "Token removed",
            "span" => span,
            "fragments" => self.tree.fragment_count()
        );
        self.after_mutation("remove");
        true
    }

    /// Unregister every token
    pub fn clear(&mut self) {
        let cleared = self.tree.fragment_count();
        self.tree.clear();
        self.ranges.clear();
        log_info!(codes::index::INDEX_CLEARED, "Index cleared", "fragments" => cleared);
    }

    /// Every `(token, fragment)` pair, left to right
    pub fn iter(&self) -> Fragments<'_, K, C> {
        self.tree.iter()
    }

    /// Registered tokens and their ranges, in no particular order
    pub fn ranges(&self) -> impl Iterator<Item = (&K, Span<C>)> + '_ {
        self.ranges.iter().map(|(token, span)| (token, *span))
    }

    /// Read-only view of the underlying tree
    pub fn tree(&self) -> &IntervalTree<K, C> {
        &self.tree
    }

    /// Verify every structural invariant and that the fragments agree with
    /// the registered ranges.
    pub fn check_invariants(&self) -> IndexResult<()> {
        self.tree.validate()?;

        for node in self.tree.iter_nodes() {
            let fragment = node.span();
            for token in node.tokens() {
                match self.ranges.get(token) {
                    Some(range) if range.contains(&fragment) => {}
                    Some(range) => {
                        return Err(IndexError::invariant_violation(&format!(
                            "fragment {} holds a token registered over {}",
                            fragment, range
                        )))
                    }
                    None => {
                        return Err(IndexError::invariant_violation(&format!(
                            "fragment {} holds an unregistered token",
                            fragment
                        )))
                    }
                }
            }
            for (token, range) in &self.ranges {
                if range.contains(&fragment) && !node.tokens().contains(token) {
                    return Err(IndexError::invariant_violation(&format!(
                        "fragment {} is missing a token registered over {}",
                        fragment, range
                    )));
                }
            }
        }

        for (token, range) in &self.ranges {
            self.check_tiling(token, range)?;
        }
        Ok(())
    }

    /// The fragments holding `token` must tile its registered range exactly
    fn check_tiling(&self, token: &K, range: &Span<C>) -> IndexResult<()> {
        if range.is_point() {
            return match self.tree.tokens_of(range) {
                Some(tokens) if tokens.contains(token) => Ok(()),
                _ => Err(IndexError::invariant_violation(&format!(
                    "no point fragment holds a token registered at {}",
                    range
                ))),
            };
        }

        let mut cursor = range.start;
        for node in self.tree.nodes_intersecting(range) {
            let fragment = node.span();
            if fragment.is_point() || !node.tokens().contains(token) {
                continue;
            }
            if fragment.start != cursor {
                return Err(IndexError::invariant_violation(&format!(
                    "coverage of {} breaks at {}",
                    range, cursor
                )));
            }
            cursor = fragment.end;
        }

        if cursor != range.end {
            return Err(IndexError::invariant_violation(&format!(
                "coverage of {} stops at {}",
                range, cursor
            )));
        }
        Ok(())
    }

    fn register(&mut self, token: K, span: Span<C>) {
        match self.ranges.get(&token).copied() {
            Some(existing) if existing == span => {
                log_debug!(codes::index::TOKEN_UNCHANGED, "Token already registered", "span" => span);
                return;
            }
            Some(existing) => {
                // TODO: shrink/extend the existing fragments in place instead of a full remove
                self.tree.remove(&token, &existing);
                log_debug!(
                    codes::index::TOKEN_RELOCATED,
                    "Token moved",
                    "from" => existing,
                    "to" => span
                );
            }
            None => {
                log_debug!(codes::index::TOKEN_REGISTERED, "Token registered", "span" => span);
            }
        }

        self.tree.insert(token.clone(), span);
        self.ranges.insert(token, span);
        self.after_mutation("set");
    }

    fn checked_span(&self, start: C, end: C) -> IndexResult<Span<C>> {
        Span::checked(start, end).map_err(|error| {
            log_warning!(
                error.error_code(),
                "Rejected range",
                "start" => start,
                "end" => end
            );
            error
        })
    }

    fn after_mutation(&self, operation: &str) {
        if !self.preferences.verify_invariants {
            return;
        }
        if let Err(error) = self.check_invariants() {
            log_error!(
                error.error_code(),
                "Invariant check failed after mutation",
                "operation" => operation,
                "detail" => error
            );
        }
    }
}

impl<'a, K, C> IntoIterator for &'a TimelineIndex<K, C>
where
    K: Eq + Hash + Clone,
    C: Coordinate,
{
    type Item = (&'a K, Span<C>);
    type IntoIter = Fragments<'a, K, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn index() -> TimelineIndex<&'static str, i64> {
        TimelineIndex::with_preferences(IndexPreferences::quiet())
    }

    fn sorted<'a>(keys: HashSet<&&'a str>) -> Vec<&'a str> {
        let mut keys: Vec<_> = keys.into_iter().copied().collect();
        keys.sort();
        keys
    }

    fn scenario() -> TimelineIndex<&'static str, i64> {
        let mut index = index();
        index.set("one", 10, 20).unwrap();
        index.set("two", 30, 40).unwrap();
        index.set("three", 15, 35).unwrap();
        index
    }

    #[test]
    fn test_overlapping_tokens() {
        let index = scenario();

        assert_eq!(index.len(), 3);
        assert_eq!(sorted(index.get_keys(16, 19).unwrap()), vec!["one", "three"]);
        assert_eq!(sorted(index.get_keys(10, 35).unwrap()), vec!["one", "three", "two"]);
        assert_eq!(sorted(index.get_keys_at(17)), vec!["one", "three"]);
        assert_eq!(sorted(index.get_keys(17, 17).unwrap()), vec!["one", "three"]);
        assert!(index.check_invariants().is_ok());
    }

    #[test]
    fn test_filled_gap_between_ranges() {
        let mut index = index();
        index.set("one", 10, 20).unwrap();
        index.set("two", 30, 40).unwrap();
        assert_eq!(index.filled(20, 30), Ok(false));
        assert!(!index.filled_at(25));
        assert!(index.filled_at(30));

        index.set("three", 15, 35).unwrap();
        assert_eq!(index.filled(20, 30), Ok(true));
    }

    #[test]
    fn test_remove_only_token() {
        let mut index = index();
        index.set("one", 10, 20).unwrap();

        assert!(index.remove(&"one"));
        assert_eq!(index.len(), 0);
        assert!(index.is_empty());
        assert!(!index.has(&"one"));
        assert_eq!(index.get_range(&"one"), None);
        assert!(index.get_keys(10, 20).unwrap().is_empty());
        assert!(index.get_keys(i64::MIN, i64::MAX).unwrap().is_empty());
        assert_eq!(index.iter().count(), 0);
        assert_eq!(index.fragment_count(), 0);
        assert!(!index.remove(&"one"));
    }

    #[test]
    fn test_invalid_ranges_do_not_mutate() {
        let mut index = scenario();
        let before: Vec<_> = index.iter().map(|(t, s)| (*t, s)).collect();

        assert_matches!(index.set("four", 50, 40), Err(IndexError::InvalidRange { .. }));
        assert_matches!(index.set("one", 5, 1), Err(IndexError::InvalidRange { .. }));
        assert_matches!(index.filled(20, 10), Err(IndexError::InvalidRange { .. }));
        assert_matches!(index.get_keys(20, 10), Err(IndexError::InvalidRange { .. }));

        assert!(!index.has(&"four"));
        assert_eq!(index.get_range(&"one"), Some(Span::new(10, 20)));
        let after: Vec<_> = index.iter().map(|(t, s)| (*t, s)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_set_twice_is_noop() {
        let mut index = scenario();
        let before: Vec<_> = index.iter().map(|(t, s)| (*t, s)).collect();
        let fragments = index.fragment_count();

        index.set("three", 15, 35).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.get_range(&"three"), Some(Span::new(15, 35)));
        assert_eq!(index.fragment_count(), fragments);
        let after: Vec<_> = index.iter().map(|(t, s)| (*t, s)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_set_moves_token() -> IndexResult<()> {
        let mut index = index();
        index.set("a", 0, 10)?.set("b", 5, 15)?.set("a", 20, 30)?;

        assert_eq!(index.len(), 2);
        assert_eq!(index.get_range(&"a"), Some(Span::new(20, 30)));
        assert_eq!(sorted(index.get_keys(0, 10)?), vec!["b"]);
        assert_eq!(sorted(index.get_keys_at(25)), vec!["a"]);
        assert_eq!(index.fragment_count(), 2);
        index.check_invariants()
    }

    #[test]
    fn test_point_tokens() {
        let mut index = index();
        index.set_at("dot", 15).set("one", 10, 20).unwrap();

        assert_eq!(index.get_range(&"dot"), Some(Span::point(15)));
        assert_eq!(sorted(index.get_keys_at(15)), vec!["dot", "one"]);
        assert_eq!(sorted(index.get_keys(12, 18).unwrap()), vec!["dot", "one"]);
        assert_eq!(sorted(index.get_keys(16, 18).unwrap()), vec!["one"]);
        assert!(index.check_invariants().is_ok());

        let mut reported: Vec<_> = index.iter().map(|(t, s)| (*t, s.start, s.end)).collect();
        reported.sort_by_key(|&(token, start, end)| (start, end, token));
        assert_eq!(reported, vec![("one", 10, 15), ("dot", 15, 15), ("one", 15, 20)]);

        assert!(index.remove(&"dot"));
        assert_eq!(index.fragment_count(), 1);
        assert!(index.check_invariants().is_ok());
    }

    #[test]
    fn test_empty_range_at_edge() {
        let mut index = index();
        index.set("one", 10, 20).unwrap();

        assert_eq!(sorted(index.get_keys_at(10)), vec!["one"]);
        assert!(index.get_keys_at(20).is_empty());
        assert_eq!(index.filled(20, 20), Ok(false));
    }

    #[test]
    fn test_clear() {
        let mut index = scenario();
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.fragment_count(), 0);
        assert_eq!(index.filled(0, 100), Ok(false));
    }

    #[test]
    fn test_into_iterator_matches_iter() {
        let index = scenario();
        let mut count = 0;
        for (token, span) in &index {
            assert!(index.get_range(token).is_some_and(|range| range.contains(&span)));
            count += 1;
        }
        assert_eq!(count, index.iter().count());
        assert_eq!(count, 7);
    }

    /// xorshift64, so the workload is reproducible without extra dependencies
    #[test]
    fn test_structure_logging_and_invariant_checks() {
        let memory = crate::logging::test_memory_logger();
        let preferences = IndexPreferences::quiet()
            .with_structure_logging()
            .with_invariant_checks();
        let mut index: TimelineIndex<&str, i64> = TimelineIndex::with_preferences(preferences);

        index.set("outer", 7000, 7100).unwrap();
        index.set("inner", 7040, 7060).unwrap();
        index.set_at("dot", 7050);
        assert!(index.remove(&"dot"));
        assert!(index.remove(&"inner"));
        assert_matches!(index.set("bad", 7005, 7001), Err(IndexError::InvalidRange { .. }));

        let events = memory.events();
        // structure events only come from indexes with structure logging on
        let count = |code: &str| events.iter().filter(|e| e.code.as_str() == code).count();
        assert_eq!(count("D100"), 3);
        assert_eq!(count("D101"), 2);
        assert_eq!(count("D102"), 3);
        assert_eq!(count("D103"), 4);
        assert_eq!(count("D104"), 1);

        let count_spans = |code: &str, spans: &[&str]| {
            events
                .iter()
                .filter(|e| e.code.as_str() == code)
                .filter(|e| e.context_value("span").is_some_and(|span| spans.contains(&span)))
                .count()
        };
        assert_eq!(count_spans("I010", &["[7000, 7100)", "[7040, 7060)", "[7050, 7050)"]), 3);
        assert_eq!(count_spans("I013", &["[7040, 7060)", "[7050, 7050)"]), 2);
        assert!(events.iter().any(|e| e.code.as_str() == "E001"
            && e.context_value("start") == Some("7005")
            && e.context_value("end") == Some("7001")));
        assert_eq!(count("E010"), 0);
        assert_eq!(index.fragment_count(), 1);

        // a registration with no fragments behind it fails the next check
        index.ranges.insert("ghost", Span::new(7200, 7300));
        index.set("late", 7500, 7600).unwrap();
        let failures: Vec<_> = memory
            .events()
            .into_iter()
            .filter(|e| e.code.as_str() == "E010")
            .collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].level, crate::logging::LogLevel::Error);
        assert_eq!(failures[0].context_value("operation"), Some("set"));
        assert_matches!(index.check_invariants(), Err(IndexError::InvariantViolation { .. }));
    }

    struct Rng(u64);

    impl Rng {
        fn next(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        fn below(&mut self, bound: u64) -> i64 {
            (self.next() % bound) as i64
        }
    }

    fn overlaps(range: Span<i64>, query: Span<i64>) -> bool {
        match (range.is_point(), query.is_point()) {
            (true, true) => range.start == query.start,
            (true, false) => query.start <= range.start && range.start < query.end,
            (false, true) => range.start <= query.start && query.start < range.end,
            (false, false) => range.start.max(query.start) < range.end.min(query.end),
        }
    }

    #[test]
    fn test_random_workload_matches_brute_force() {
        let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
        let mut index: TimelineIndex<u32, i64> = TimelineIndex::with_preferences(IndexPreferences::quiet());
        let mut model: HashMap<u32, Span<i64>> = HashMap::new();

        for step in 0..600 {
            let token = rng.below(40) as u32;
            match rng.below(5) {
                0 => {
                    assert_eq!(index.remove(&token), model.remove(&token).is_some());
                }
                1 => {
                    let at = rng.below(120);
                    index.set_at(token, at);
                    model.insert(token, Span::point(at));
                }
                _ => {
                    let start = rng.below(120);
                    let end = start + 1 + rng.below(30);
                    index.set(token, start, end).unwrap();
                    model.insert(token, Span::new(start, end));
                }
            }

            assert_eq!(index.len(), model.len());
            if let Err(error) = index.check_invariants() {
                panic!("step {}: {}", step, error);
            }

            if step % 10 != 0 {
                continue;
            }
            for _ in 0..20 {
                let start = rng.below(160) - 10;
                let end = if rng.below(4) == 0 { start } else { start + rng.below(40) };
                let query = Span::new(start, end);

                let mut expected: Vec<u32> = model
                    .iter()
                    .filter(|(_, range)| overlaps(**range, query))
                    .map(|(token, _)| *token)
                    .collect();
                expected.sort();
                let mut actual: Vec<u32> = index.get_keys(start, end).unwrap().into_iter().copied().collect();
                actual.sort();

                assert_eq!(actual, expected, "step {} query {}", step, query);
                assert_eq!(index.filled(start, end), Ok(!expected.is_empty()));
            }
        }

        for token in model.keys() {
            assert!(index.remove(token));
        }
        assert!(index.is_empty());
        assert_eq!(index.fragment_count(), 0);
    }
}
