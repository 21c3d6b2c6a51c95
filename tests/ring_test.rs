use dining_table::model::{AcquireOrder, ResourcePair};
use dining_table::ring::ResourceRing;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Many tasks hammering one fork never overlap while holding it.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fork_is_mutually_exclusive() {
    let ring = Arc::new(ResourceRing::new(2).unwrap());
    let holders = Arc::new(AtomicUsize::new(0));
    let entries = Arc::new(AtomicUsize::new(0));
    ring.release_all().unwrap();

    let mut handles = vec![];
    for _ in 0..8 {
        let ring = ring.clone();
        let holders = holders.clone();
        let entries = entries.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..200 {
                ring.acquire(0).await.unwrap();
                let before = holders.fetch_add(1, Ordering::SeqCst);
                assert_eq!(before, 0, "two holders of fork 0");
                entries.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                holders.fetch_sub(1, Ordering::SeqCst);
                ring.release(0).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(entries.load(Ordering::SeqCst), 8 * 200);
    assert!(ring.is_available(0).unwrap());
}

/// Low-first acquisition stays deadlock-free whichever order forks are
/// released in.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_release_order_does_not_matter() {
    let seats = 6;
    let ring = Arc::new(ResourceRing::new(seats).unwrap());
    ring.release_all().unwrap();

    let mut handles = vec![];
    for seat in 0..seats {
        let ring = ring.clone();
        let pair = ResourcePair::for_seat(seat, seats).unwrap();
        handles.push(tokio::spawn(async move {
            let [first, second] = pair.acquisition(AcquireOrder::LowFirst);
            for cycle in 0..300 {
                ring.acquire(first).await.unwrap();
                ring.acquire(second).await.unwrap();
                tokio::task::yield_now().await;
                // Alternate the release order across seats and cycles.
                if (seat + cycle) % 2 == 0 {
                    ring.release(second).unwrap();
                    ring.release(first).unwrap();
                } else {
                    ring.release(first).unwrap();
                    ring.release(second).unwrap();
                }
            }
        }));
    }

    let all = async {
        for handle in handles {
            handle.await.unwrap();
        }
    };
    tokio::time::timeout(Duration::from_secs(20), all)
        .await
        .expect("low-first acquisition deadlocked");

    for fork in 0..seats {
        assert!(ring.is_available(fork).unwrap());
    }
}
