use super::*;
use crossbeam::scope;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Droppable(Arc<AtomicUsize>);

impl Drop for Droppable {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_push_and_index() {
    let mut v = SlotBuffer::with_capacity(4).unwrap();
    v.push(1).unwrap();
    v.push(2).unwrap();
    v.push(3).unwrap();
    assert_eq!(v.len(), 3);
    assert_eq!(v[0], 1);
    assert_eq!(v[1], 2);
    assert_eq!(v[2], 3);
    assert_eq!(v.capacity(), 4);
}

#[test]
fn test_zero_capacity_rejected() {
    let v: Result<SlotBuffer<i32>, _> = SlotBuffer::with_capacity(0);
    assert_eq!(v.unwrap_err(), SlotError::ZeroCapacity);
}

#[test]
fn test_zero_sized_type_rejected() {
    let v: Result<SlotBuffer<()>, _> = SlotBuffer::with_capacity(4);
    assert_eq!(v.unwrap_err(), SlotError::ZeroSizedType);
}

#[test]
fn test_capacity_overflow_rejected() {
    let v: Result<SlotBuffer<u64>, _> = SlotBuffer::with_capacity(usize::MAX);
    assert!(matches!(v, Err(SlotError::CapacityOverflow { .. })));
}

#[test]
fn test_insert_remove() {
    let mut v = SlotBuffer::with_capacity(2).unwrap();
    v.push(1).unwrap();
    v.push(3).unwrap();
    v.insert(1, 2).unwrap();
    assert_eq!(&v[..], &[1, 2, 3]);
    assert_eq!(v.remove(1).unwrap(), 2);
    assert_eq!(&v[..], &[1, 3]);
    v.insert(0, 0).unwrap();
    assert_eq!(&v[..], &[0, 1, 3]);
}

#[test]
fn test_growth_doubles_exactly() {
    let mut v = SlotBuffer::with_capacity(3).unwrap();
    let mut caps = Vec::new();
    for i in 0..13 {
        v.push(i).unwrap();
        caps.push(v.capacity());
    }
    assert_eq!(caps, vec![3, 3, 3, 6, 6, 6, 12, 12, 12, 12, 12, 12, 24]);
    assert_eq!(&v[..], (0..13).collect::<Vec<_>>().as_slice());
}

#[test]
fn test_growth_keeps_string_heap_data_in_place() {
    let mut v = SlotBuffer::with_capacity(1).unwrap();
    v.push(String::from("first")).unwrap();
    let before = v[0].as_ptr();
    for i in 0..64 {
        v.push(i.to_string()).unwrap();
    }
    // The String handle moved, the bytes it owns did not.
    assert_eq!(v[0].as_ptr(), before);
    assert_eq!(v[0], "first");
}

#[test]
fn test_out_of_bounds_insert() {
    let mut v: SlotBuffer<i32> = SlotBuffer::with_capacity(1).unwrap();
    assert_eq!(v.insert(1, 10), Err(SlotError::OutOfBounds { index: 1, len: 0 }));
    assert_eq!(v.len(), 0);
    assert_eq!(v.capacity(), 1);
}

#[test]
fn test_out_of_bounds_remove() {
    let mut v: SlotBuffer<i32> = SlotBuffer::with_capacity(1).unwrap();
    assert_eq!(v.remove(0), Err(SlotError::OutOfBounds { index: 0, len: 0 }));
}

#[test]
fn test_raii_drop() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let mut v = SlotBuffer::with_capacity(1).unwrap();
        for _ in 0..10 {
            v.push(Droppable(counter.clone())).unwrap();
        }
        // Growth must not drop anything.
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 10);
}

#[test]
fn test_remove_transfers_ownership() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut v = SlotBuffer::with_capacity(2).unwrap();
    v.push(Droppable(counter.clone())).unwrap();
    v.push(Droppable(counter.clone())).unwrap();

    let taken = v.remove(0).unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    drop(taken);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    drop(v);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_reset_releases_values_and_reallocates() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut v = SlotBuffer::with_capacity(1).unwrap();
    for _ in 0..5 {
        v.push(Droppable(counter.clone())).unwrap();
    }
    assert_eq!(v.capacity(), 8);

    v.reset(1).unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 5);
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 1);

    v.push(Droppable(counter.clone())).unwrap();
    v.push(Droppable(counter.clone())).unwrap();
    assert_eq!(v.capacity(), 2);
}

#[test]
fn test_reset_rejects_zero_capacity_without_touching_values() {
    let mut v = SlotBuffer::with_capacity(2).unwrap();
    v.push(7).unwrap();
    assert_eq!(v.reset(0), Err(SlotError::ZeroCapacity));
    assert_eq!(&v[..], &[7]);
}

#[test]
fn test_clone_is_deep() {
    let mut v = SlotBuffer::with_capacity(3).unwrap();
    v.push(String::from("a")).unwrap();
    v.push(String::from("b")).unwrap();

    let mut copy = v.clone();
    assert_eq!(copy.capacity(), 3);
    assert_eq!(copy.len(), 2);
    assert_ne!(copy[0].as_ptr(), v[0].as_ptr());

    copy[0].push('!');
    assert_eq!(v[0], "a");
    assert_eq!(copy[0], "a!");
}

#[test]
fn test_iterators() {
    let mut v = SlotBuffer::with_capacity(2).unwrap();
    v.push(10).unwrap();
    v.push(20).unwrap();
    v.push(30).unwrap();

    let mut sum = 0;
    for &x in &v {
        sum += x;
    }
    assert_eq!(sum, 60);

    for x in &mut v {
        *x += 1;
    }
    assert_eq!(v[0], 11);

    let collected: Vec<i32> = v.into_iter().collect();
    assert_eq!(collected, vec![11, 21, 31]);
}

#[test]
fn test_into_iter_drops_unconsumed() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut v = SlotBuffer::with_capacity(4).unwrap();
    for _ in 0..4 {
        v.push(Droppable(counter.clone())).unwrap();
    }

    let mut iter = v.into_iter();
    assert_eq!(iter.len(), 4);
    drop(iter.next());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    drop(iter);
    assert_eq!(counter.load(Ordering::SeqCst), 4);
}

#[test]
fn test_shared_reads_across_threads() {
    let mut v = SlotBuffer::with_capacity(1).unwrap();
    for i in 0..100 {
        v.push(i.to_string()).unwrap();
    }

    scope(|s| {
        s.spawn(|_| {
            let total: usize = v.iter().map(|x| x.len()).sum();
            assert_eq!(total, 190);
        });
        s.spawn(|_| {
            assert_eq!(v.iter().filter(|x| x.starts_with('9')).count(), 11);
        });
    })
    .unwrap();
}
