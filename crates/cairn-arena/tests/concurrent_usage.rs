//! Integration test: reading memory usage from another thread.
//!
//! One thread owns the arena and allocates; a second thread polls a
//! `UsageCounter` until told to stop. The reader must never observe the
//! value going backwards, and its final read must match the arena.

use std::thread;

use cairn_arena::Arena;

#[test]
fn reader_never_sees_usage_decrease() {
    let mut arena = Arena::new();
    let counter = arena.usage_counter();
    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);

    let reader = thread::spawn(move || {
        let mut last = 0usize;
        let mut reads = 0u64;
        loop {
            let now = counter.get();
            assert!(now >= last, "usage went backwards: {last} -> {now}");
            last = now;
            reads += 1;
            if done_rx.try_recv().is_ok() {
                return (counter.get(), reads);
            }
        }
    });

    for i in 0..10_000usize {
        let size = 1 + (i * 37) % 1500;
        if i % 3 == 0 {
            let _ = arena.allocate_aligned(size);
        } else {
            let _ = arena.allocate(size);
        }
    }
    done_tx.send(()).unwrap();

    let (final_seen, reads) = reader.join().unwrap();
    assert!(reads > 0);
    // Thread join synchronises, so the last read is current.
    assert_eq!(final_seen, arena.memory_usage());
}

#[test]
fn arena_moves_to_worker_thread() {
    let arena = Arena::new();
    let counter = arena.usage_counter();
    let (tx, rx) = crossbeam_channel::unbounded();

    let worker = thread::spawn(move || {
        let mut arena = arena;
        for _ in 0..100 {
            let span = arena.allocate_copy(b"node");
            tx.send(span).unwrap();
        }
        arena
    });

    let spans: Vec<_> = rx.iter().take(100).collect();
    let arena = worker.join().unwrap();
    assert_eq!(counter.get(), arena.memory_usage());
    for span in spans {
        assert_eq!(arena.get(span).unwrap(), b"node");
    }
}
