//! Lock-free observation of root slots
//!
//! The writer owns the container behind a mutex; observer threads only hold
//! a `SlotWatch` and never take the lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use rust_cartesian_heaps::cartesian::{CartesianTree, OrderedNode};
use rust_cartesian_heaps::link::SlotWatch;
use rust_cartesian_heaps::pairing::{PairingHeap, PairingNode};

const NODES: usize = 256;
const ROUNDS: usize = 20;

/// Spins on the watch until `done` is set, checking that every observed
/// occupant is a real node. Returns how many non-empty peeks it saw.
fn observe(watch: SlotWatch<usize>, done: Arc<AtomicBool>) -> usize {
    let mut seen = 0;
    while !done.load(Ordering::Acquire) {
        if let Some(id) = watch.peek() {
            assert!(id < NODES);
            seen += 1;
        }
        thread::yield_now();
    }
    seen
}

#[test]
fn test_pairing_root_observed_from_another_thread() {
    let state = Arc::new(Mutex::new((
        PairingHeap::<usize>::new(),
        (0..NODES)
            .map(|i| PairingNode::new((i * 7919 % NODES) as u32))
            .collect::<Vec<_>>(),
    )));
    let watch = state.lock().0.watch();
    let done = Arc::new(AtomicBool::new(false));

    let observer = {
        let watch = watch.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || observe(watch, done))
    };

    let writer = {
        let state = Arc::clone(&state);
        let watch = watch.clone();
        thread::spawn(move || {
            for _ in 0..ROUNDS {
                let mut guard = state.lock();
                let (heap, nodes) = &mut *guard;
                for id in 0..NODES {
                    heap.insert(nodes, id);
                }
                assert_eq!(watch.peek(), heap.top());
                while heap.pop(nodes).is_some() {}
                assert!(watch.is_empty());
            }
        })
    };

    writer.join().unwrap();
    done.store(true, Ordering::Release);
    observer.join().unwrap();
    assert!(watch.is_empty());
}

#[test]
fn test_cartesian_root_observed_from_another_thread() {
    let state = Arc::new(Mutex::new((
        CartesianTree::<usize>::new(),
        (0..NODES)
            .map(|i| OrderedNode::new((i * 31 % 97) as u32))
            .collect::<Vec<_>>(),
    )));
    let watch = state.lock().0.watch();
    let done = Arc::new(AtomicBool::new(false));

    let observers: Vec<_> = (0..2)
        .map(|_| {
            let watch = watch.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || observe(watch, done))
        })
        .collect();

    for _ in 0..ROUNDS {
        let mut guard = state.lock();
        let (tree, nodes) = &mut *guard;
        for id in 0..NODES {
            tree.insert(nodes, id);
        }
        for id in 0..NODES {
            tree.remove(nodes, id);
        }
        assert!(watch.is_empty());
    }

    done.store(true, Ordering::Release);
    for observer in observers {
        observer.join().unwrap();
    }
}

#[test]
fn test_watch_outlives_container() {
    let watch = {
        let mut nodes = vec![PairingNode::new(1u8)];
        let mut heap = PairingHeap::new();
        heap.insert(&mut nodes, 0);
        heap.watch()
    };

    // The slot is shared, so the last published value stays readable.
    assert_eq!(watch.peek(), Some(0));
}

#[test]
fn test_pairing_child_slot_is_observable() {
    let mut nodes: Vec<_> = [1u32, 2, 3].into_iter().map(PairingNode::new).collect();
    let mut heap = PairingHeap::new();
    for id in 0..nodes.len() {
        heap.insert(&mut nodes, id);
    }

    let nodes = Arc::new(nodes);
    let reader = {
        let nodes = Arc::clone(&nodes);
        thread::spawn(move || nodes[0].child())
    };
    assert_eq!(reader.join().unwrap(), nodes[0].child());
    assert!(nodes[0].child().is_some());
}
