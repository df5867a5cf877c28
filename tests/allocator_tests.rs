//! Tests for IdAllocator
//!
//! These tests verify:
//! - Sequential allocation from the seed
//! - Re-initialization before first use
//! - Refusing to wrap past `u64::MAX`
//! - Linearizable allocation under concurrent callers

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use dsregistry::{IdAllocator, RegistryError};

// =============================================================================
// Sequential Tests
// =============================================================================

#[test]
fn test_new_allocator_starts_at_one() {
    let allocator = IdAllocator::new();

    assert_eq!(allocator.last_allocated(), 0);
    assert_eq!(allocator.allocate().unwrap(), 1);
    assert_eq!(allocator.allocate().unwrap(), 2);
    assert_eq!(allocator.last_allocated(), 2);
}

#[test]
fn test_initialize_sets_seed() {
    let mut allocator = IdAllocator::new();
    allocator.initialize(7);

    assert_eq!(allocator.last_allocated(), 7);
    assert_eq!(allocator.allocate().unwrap(), 8);
}

#[test]
fn test_initialize_twice_keeps_last_seed() {
    let mut allocator = IdAllocator::new();
    allocator.initialize(41);
    allocator.initialize(3);

    assert_eq!(allocator.allocate().unwrap(), 4);
}

// =============================================================================
// Overflow Tests
// =============================================================================

#[test]
fn test_allocate_up_to_max_then_fail() {
    let mut allocator = IdAllocator::new();
    allocator.initialize(u64::MAX - 1);

    assert_eq!(allocator.allocate().unwrap(), u64::MAX);

    let result = allocator.allocate();
    assert!(matches!(
        result,
        Err(RegistryError::IdSpaceExhausted { last: u64::MAX })
    ));

    // Never wraps back to 0
    assert_eq!(allocator.last_allocated(), u64::MAX);
    assert!(allocator.allocate().is_err());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_allocation_is_gapless_and_unique() {
    const SEED: u64 = 100;
    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 500;

    let mut allocator = IdAllocator::new();
    allocator.initialize(SEED);
    let allocator = Arc::new(allocator);

    let mut handles = vec![];
    for _ in 0..THREADS {
        let allocator_clone = Arc::clone(&allocator);
        handles.push(thread::spawn(move || {
            (0..PER_THREAD)
                .map(|_| allocator_clone.allocate().unwrap())
                .collect::<Vec<u64>>()
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "duplicate id {}", id);
        }
    }

    let expected: HashSet<u64> = (SEED + 1..=SEED + THREADS * PER_THREAD).collect();
    assert_eq!(seen, expected);
    assert_eq!(allocator.last_allocated(), SEED + THREADS * PER_THREAD);
}

#[test]
fn test_ids_strictly_increase_per_thread() {
    let allocator = Arc::new(IdAllocator::new());

    let mut handles = vec![];
    for _ in 0..4 {
        let allocator_clone = Arc::clone(&allocator);
        handles.push(thread::spawn(move || {
            let ids: Vec<u64> = (0..200).map(|_| allocator_clone.allocate().unwrap()).collect();
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
