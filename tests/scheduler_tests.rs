use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use ulp::scheduler::{for_each_parallel, worker_count, WorkerPool};

#[test]
fn worker_count_is_bounded_by_items() {
    assert_eq!(worker_count(8, 3), 3);
    assert_eq!(worker_count(2, 100), 2);
    assert_eq!(worker_count(4, 0), 1);
    assert_eq!(worker_count(0, 5), 1);
}

#[test]
fn every_item_is_processed_exactly_once() {
    let items: Vec<(usize, OnceCell<usize>)> = (0..200).map(|i| (i, OnceCell::new())).collect();
    let calls = AtomicUsize::new(0);
    for_each_parallel(&items, 4, |(i, cell)| {
        calls.fetch_add(1, Ordering::SeqCst);
        cell.set(i * 2).expect("item visited twice");
    })
    .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 200);
    assert!(items.iter().all(|(i, cell)| cell.get() == Some(&(i * 2))));
}

#[test]
fn single_worker_runs_inline() {
    let items = [1u64, 2, 3, 4];
    let sum = AtomicUsize::new(0);
    for_each_parallel(&items, 1, |n| {
        sum.fetch_add(*n as usize, Ordering::SeqCst);
    })
    .unwrap();
    assert_eq!(sum.load(Ordering::SeqCst), 10);
}

#[test]
fn empty_input_is_a_no_op() {
    let items: [u8; 0] = [];
    for_each_parallel(&items, 8, |_| panic!("no items to process")).unwrap();
}

#[test]
#[should_panic]
fn job_panic_reaches_the_caller() {
    let items: Vec<usize> = (0..16).collect();
    let _ = for_each_parallel(&items, 4, |&i| {
        if i == 7 {
            panic!("worker failed on item 7");
        }
    });
}

#[test]
fn pool_serves_many_batches() {
    let pool = WorkerPool::new(4).unwrap();
    assert_eq!(pool.threads(), 4);
    let calls = AtomicUsize::new(0);
    for batch in 0..5 {
        let items: Vec<usize> = (0..50 + batch).collect();
        pool.for_each(&items, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }
    assert_eq!(calls.load(Ordering::SeqCst), 50 + 51 + 52 + 53 + 54);
}

#[test]
fn zero_workers_means_one() {
    let pool = WorkerPool::new(0).unwrap();
    assert_eq!(pool.threads(), 1);
    let sum = AtomicUsize::new(0);
    pool.for_each(&[3usize, 4], |n| {
        sum.fetch_add(*n, Ordering::SeqCst);
    });
    assert_eq!(sum.load(Ordering::SeqCst), 7);
}
