//! LRU Tracker Module
//!
//! Keeps cache keys in access order for least-recently-used eviction.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently accessed
/// - Back = Least recently accessed
///
/// The order is by touch, not by timestamp. The store picks its eviction
/// victim by `last_accessed_at` and uses this order only to break ties, so
/// keys touched within the same millisecond leave in the order they came.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as most recently accessed (moves to front).
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Oldest First ==
    /// Iterates tracked keys from least to most recently touched.
    pub fn oldest_first(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().rev().map(String::as_str)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn order(lru: &LruTracker) -> Vec<&str> {
        lru.oldest_first().collect()
    }

    #[test]
    fn test_lru_new() {
        let lru = LruTracker::new();
        assert!(order(&lru).is_empty());
    }

    #[test]
    fn test_lru_first_touched_is_oldest() {
        let mut lru = LruTracker::new();

        lru.touch("students:1");
        lru.touch("students:2");
        lru.touch("students:3");

        assert_eq!(order(&lru), vec!["students:1", "students:2", "students:3"]);
    }

    #[test]
    fn test_lru_touch_existing_key_moves_to_front() {
        let mut lru = LruTracker::new();

        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        lru.touch("a");

        assert_eq!(order(&lru), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_lru_remove() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key2");
        lru.touch("key3");

        lru.remove("key2");
        lru.remove("nonexistent");

        assert_eq!(order(&lru), vec!["key1", "key3"]);
    }

    #[test]
    fn test_lru_touch_same_key_multiple_times() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key1");
        lru.touch("key1");

        assert_eq!(order(&lru), vec!["key1"]);
    }

    #[test]
    fn test_lru_order_after_interleaved_touches() {
        let mut lru = LruTracker::new();

        // [c, b, a] -> touch a: [a, c, b] -> touch c: [c, a, b] -> touch b: [b, c, a]
        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        lru.touch("a");
        lru.touch("c");
        lru.touch("b");

        assert_eq!(order(&lru), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_lru_clear() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");

        lru.clear();

        assert_eq!(lru.oldest_first().count(), 0);
    }
}
