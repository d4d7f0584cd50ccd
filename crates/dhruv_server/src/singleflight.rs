//! Request coalescing: at most one concurrent compute per fingerprint.
//!
//! The in-flight map and the cache read must be probed and updated
//! atomically with respect to each other; [`Slot`] exposes exactly the two
//! outcomes the Orchestrator needs to keep that check-then-act sequence
//! race-free, all under the single mutex owned by [`SingleFlight`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::error::ApiError;
use crate::fingerprint::Fingerprint;

#[derive(Clone)]
pub enum SharedResult<T> {
    Ok(Arc<T>),
    /// Carries the leader's actual error so followers see the same
    /// taxonomy code the leader would have returned directly, rather than
    /// a single generic failure (see DESIGN.md).
    Failed(ApiError),
}

pub struct SingleFlight<T> {
    in_flight: Mutex<HashMap<Fingerprint, broadcast::Sender<SharedResult<T>>>>,
}

pub enum Slot<T> {
    /// This caller is the leader: it must compute the value and call
    /// [`SingleFlight::complete`] when done. The receiver lets the leader
    /// await its own spawned computation the same way a follower does.
    Leader(broadcast::Receiver<SharedResult<T>>),
    /// Another caller is already computing; await this receiver.
    Follower(broadcast::Receiver<SharedResult<T>>),
}

impl<T: Clone + Send + Sync + 'static> SingleFlight<T> {
    pub fn new() -> Self {
        Self { in_flight: Mutex::new(HashMap::new()) }
    }

    /// Register interest in `fingerprint`. Callers should call this while
    /// still holding whatever lock guarded the preceding cache-miss check,
    /// so the combined check is atomic (the Orchestrator does this by
    /// calling [`crate::cache::ResponseCache::lookup`] and this method
    /// from within the same fingerprint-scoped critical section).
    pub fn register(&self, fingerprint: &Fingerprint) -> Slot<T> {
        let mut map = self.in_flight.lock().unwrap();
        if let Some(sender) = map.get(fingerprint) {
            return Slot::Follower(sender.subscribe());
        }
        let (tx, rx) = broadcast::channel(1);
        map.insert(fingerprint.clone(), tx);
        Slot::Leader(rx)
    }

    /// The leader calls this exactly once, whether it succeeded or failed.
    pub fn complete(&self, fingerprint: &Fingerprint, result: SharedResult<T>) {
        let sender = self.in_flight.lock().unwrap().remove(fingerprint);
        if let Some(sender) = sender {
            let _ = sender.send(result);
        }
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().unwrap().len()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn second_registration_is_a_follower() {
        let sf: SingleFlight<String> = SingleFlight::new();
        let key = "fp1".to_string();

        assert!(matches!(sf.register(&key), Slot::Leader(_)));
        match sf.register(&key) {
            Slot::Follower(_) => {}
            Slot::Leader(_) => panic!("expected follower"),
        }
    }

    #[tokio::test]
    async fn follower_observes_leaders_result() {
        let sf: SingleFlight<String> = SingleFlight::new();
        let key = "fp1".to_string();

        assert!(matches!(sf.register(&key), Slot::Leader(_)));
        let mut follower_rx = match sf.register(&key) {
            Slot::Follower(rx) => rx,
            Slot::Leader(_) => panic!("expected follower"),
        };

        sf.complete(&key, SharedResult::Ok(Arc::new("result".to_string())));

        let result = tokio::time::timeout(Duration::from_secs(1), follower_rx.recv())
            .await
            .unwrap()
            .unwrap();
        match result {
            SharedResult::Ok(value) => assert_eq!(*value, "result"),
            SharedResult::Failed(_) => panic!("expected ok"),
        }
    }

    #[tokio::test]
    async fn follower_observes_leaders_specific_error_code() {
        let sf: SingleFlight<String> = SingleFlight::new();
        let key = "fp1".to_string();

        assert!(matches!(sf.register(&key), Slot::Leader(_)));
        let mut follower_rx = match sf.register(&key) {
            Slot::Follower(rx) => rx,
            Slot::Leader(_) => panic!("expected follower"),
        };

        sf.complete(&key, SharedResult::Failed(ApiError::RangeEphemerisOutside));

        let result = tokio::time::timeout(Duration::from_secs(1), follower_rx.recv())
            .await
            .unwrap()
            .unwrap();
        match result {
            SharedResult::Failed(err) => assert_eq!(err.code(), "RANGE.EPHEMERIS_OUTSIDE"),
            SharedResult::Ok(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn registration_is_freed_after_completion() {
        let sf: SingleFlight<String> = SingleFlight::new();
        let key = "fp1".to_string();
        assert!(matches!(sf.register(&key), Slot::Leader(_)));
        sf.complete(&key, SharedResult::Ok(Arc::new("x".to_string())));
        assert!(matches!(sf.register(&key), Slot::Leader(_)));
    }
}
