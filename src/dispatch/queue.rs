//! Stop queue
//!
//! A deduplicated set of floors awaiting service. Reads always yield
//! ascending order, and the next stop is the lowest pending floor.

use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Pending stops shared by every request handler
///
/// Writers take the lock exclusively; readers share it. The set stays valid
/// after any panic inside a critical section, so a poisoned lock is recovered
/// instead of propagated.
#[derive(Debug, Default)]
pub struct StopQueue {
    pending: RwLock<BTreeSet<i32>>,
}

impl StopQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a floor for service.
    ///
    /// Accepts any integer; range checks belong to the caller.
    /// Returns `true` if the floor was not already pending.
    pub fn add_stop(&self, floor: i32) -> bool {
        self.write().insert(floor)
    }

    /// All pending floors in ascending order, each exactly once
    pub fn list_stops(&self) -> Vec<i32> {
        self.read().iter().copied().collect()
    }

    /// Lowest pending floor, or `None` when nothing is queued
    pub fn next_stop(&self) -> Option<i32> {
        self.read().first().copied()
    }

    /// Mark a floor as serviced.
    ///
    /// Returns `true` if the floor was pending.
    pub fn remove_stop(&self, floor: i32) -> bool {
        self.write().remove(&floor)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeSet<i32>> {
        self.pending.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeSet<i32>> {
        self.pending.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_empty_queue() {
        let queue = StopQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.list_stops(), Vec::<i32>::new());
        assert_eq!(queue.next_stop(), None);
    }

    #[test]
    fn test_list_is_sorted_and_distinct() {
        let queue = StopQueue::new();
        for floor in [7, 2, 9, 2, 5, 9, 1] {
            queue.add_stop(floor);
        }
        assert_eq!(queue.list_stops(), vec![1, 2, 5, 7, 9]);
        assert_eq!(queue.len(), 5);
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let queue = StopQueue::new();
        assert!(queue.add_stop(10));
        assert!(queue.add_stop(3));
        assert!(!queue.add_stop(10));
        assert_eq!(queue.list_stops(), vec![3, 10]);
    }

    #[test]
    fn test_next_stop_is_minimum_regardless_of_order() {
        let queue = StopQueue::new();
        queue.add_stop(10);
        queue.add_stop(3);
        queue.add_stop(7);
        assert_eq!(queue.next_stop(), Some(3));
    }

    #[test]
    fn test_store_accepts_any_integer() {
        // Range validation happens at the HTTP boundary, not here
        let queue = StopQueue::new();
        queue.add_stop(0);
        queue.add_stop(-5);
        queue.add_stop(i32::MAX);
        assert_eq!(queue.list_stops(), vec![-5, 0, i32::MAX]);
        assert_eq!(queue.next_stop(), Some(-5));
    }

    #[test]
    fn test_remove_stop_advances_next() {
        let queue = StopQueue::new();
        queue.add_stop(4);
        queue.add_stop(8);

        assert!(queue.remove_stop(4));
        assert_eq!(queue.next_stop(), Some(8));
        assert!(!queue.remove_stop(4));
        assert!(queue.remove_stop(8));
        assert_eq!(queue.next_stop(), None);
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let queue = Arc::new(StopQueue::new());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..250 {
                        queue.add_stop(worker * 250 + i + 1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker thread panicked");
        }

        let stops = queue.list_stops();
        assert_eq!(stops.len(), 2000);
        assert_eq!(stops, (1..=2000).collect::<Vec<_>>());
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let queue = Arc::new(StopQueue::new());
        queue.add_stop(2);

        let poisoner = Arc::clone(&queue);
        let result = thread::spawn(move || {
            let _guard = poisoner.pending.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(result.is_err());

        queue.add_stop(1);
        assert_eq!(queue.list_stops(), vec![1, 2]);
    }
}
