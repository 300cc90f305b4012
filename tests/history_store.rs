use parkify::history::{HISTORY_CAPACITY, HistoryStore, Sample};
use parkify::prediction::linear::predict_available;
use std::sync::{Arc, RwLock};

#[test]
fn concurrent_writers_keep_buffer_bounded_and_ordered() {
    let store = Arc::new(RwLock::new(HistoryStore::new(["a", "b"], HISTORY_CAPACITY)));

    let handles: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|id| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for t in 0..400i64 {
                    let mut guard = store.write().expect("write lock");
                    guard.add_sample(Sample::new(id, t, (t % 100) as u32, 0));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread");
    }

    let guard = store.read().expect("read lock");
    for id in ["a", "b"] {
        let history = guard.get_history(id);
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert!(history.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(history.last().map(|s| s.timestamp), Some(399));
    }
}

#[test]
fn predictor_runs_against_full_buffer() {
    let mut store = HistoryStore::new(["g"], HISTORY_CAPACITY);
    for step in 0..(HISTORY_CAPACITY as i64 + 20) {
        store.add_sample(Sample::new("g", step * 60, 500 - step as u32, 0));
    }

    let history = store.get_history("g");
    // oldest kept sample is step 20, newest is step 199: one space lost per minute
    assert_eq!(history[0].available, 480);
    assert_eq!(predict_available(&history, Some(600), 30), Some(271));
}
