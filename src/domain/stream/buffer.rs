//! Fixed-capacity, most-recent-first buffer.

use std::collections::VecDeque;

/// Ordered items, newest at the front, never longer than `capacity`.
///
/// Insertion is always at the front; anything beyond capacity is evicted
/// from the back. Duplicates are kept: a telemetry stream is append-only
/// and identical readings are still distinct readings.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> StreamBuffer<T> {
    /// Creates an empty buffer. A capacity of zero is legal and keeps nothing.
    ///
    /// Storage grows with the items held, not with `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity,
        }
    }

    /// Replaces the contents with `items`, kept in the order supplied
    /// (first item is the most recent) and truncated to capacity.
    pub fn seed<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.clear();
        self.items.extend(items.into_iter().take(self.capacity));
    }

    /// Prepends `item`, evicting from the back while over capacity.
    pub fn push(&mut self, item: T) {
        self.items.push_front(item);
        self.items.truncate(self.capacity);
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// The most recent item.
    pub fn latest(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> StreamBuffer<T> {
    /// Copies the items out, most recent first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn push_before_seed_starts_from_empty() {
        let mut buffer = StreamBuffer::new(3);
        buffer.push("A");
        assert_eq!(buffer.to_vec(), vec!["A"]);
        assert_eq!(buffer.latest(), Some(&"A"));
    }

    #[test]
    fn push_evicts_oldest_beyond_capacity() {
        let mut buffer = StreamBuffer::new(3);
        for item in ["A", "B", "C", "D"] {
            buffer.push(item);
        }
        assert_eq!(buffer.to_vec(), vec!["D", "C", "B"]);
    }

    #[test]
    fn seed_keeps_supplied_order_and_truncates() {
        let mut buffer = StreamBuffer::new(2);
        buffer.push(99);
        buffer.seed(vec![5, 4, 3, 2]);
        assert_eq!(buffer.to_vec(), vec![5, 4]);
    }

    #[test]
    fn seed_then_clear_is_empty() {
        let mut buffer = StreamBuffer::new(10);
        buffer.seed(1..=5);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 10);
    }

    #[test]
    fn zero_capacity_never_holds_anything() {
        let mut buffer = StreamBuffer::new(0);
        buffer.push(1);
        buffer.seed(vec![1, 2]);
        buffer.push(3);
        assert!(buffer.is_empty());
        assert_eq!(buffer.latest(), None);
    }

    #[test]
    fn huge_capacity_allocates_only_for_held_items() {
        let mut buffer = StreamBuffer::new(usize::MAX);
        buffer.push(1u32);
        buffer.seed(vec![3, 2, 1]);
        buffer.push(4);
        assert_eq!(buffer.to_vec(), vec![4, 3, 2, 1]);
        assert_eq!(buffer.capacity(), usize::MAX);
    }

    #[test]
    fn duplicates_are_not_deduplicated() {
        let mut buffer = StreamBuffer::new(5);
        buffer.push("same");
        buffer.push("same");
        assert_eq!(buffer.len(), 2);
    }

    proptest! {
        #[test]
        fn length_never_exceeds_capacity(
            capacity in 0usize..16,
            pushes in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let mut buffer = StreamBuffer::new(capacity);
            for item in pushes {
                buffer.push(item);
                prop_assert!(buffer.len() <= capacity);
            }
        }

        #[test]
        fn buffer_holds_most_recent_pushes_newest_first(
            capacity in 0usize..16,
            pushes in proptest::collection::vec(any::<u16>(), 0..64),
        ) {
            let mut buffer = StreamBuffer::new(capacity);
            for item in &pushes {
                buffer.push(*item);
            }
            let expected: Vec<u16> = pushes.iter().rev().take(capacity).copied().collect();
            prop_assert_eq!(buffer.to_vec(), expected);
        }

        #[test]
        fn seed_then_clear_always_empties(
            capacity in 0usize..16,
            items in proptest::collection::vec(any::<i32>(), 0..32),
        ) {
            let mut buffer = StreamBuffer::new(capacity);
            buffer.seed(items);
            prop_assert!(buffer.len() <= capacity);
            buffer.clear();
            prop_assert!(buffer.is_empty());
        }
    }
}
