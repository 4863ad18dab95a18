//! In-flight publish deduplication

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Single-flight guard for publish submissions.
///
/// Many callers may conclude a publish is warranted at once; only the
/// one that wins `begin` submits. Attempts carry a monotonic sequence
/// so redundant or out-of-order submissions are identifiable in logs.
#[derive(Debug, Default)]
pub struct PublishGuard {
    in_flight: AtomicBool,
    sequence: AtomicU64,
}

/// Token for one granted publish attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishAttempt {
    pub sequence: u64,
}

impl PublishGuard {
    /// Create a guard with no attempt in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the right to submit; `None` while another attempt is in
    /// flight
    pub fn begin(&self) -> Option<PublishAttempt> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        let sequence = self.sequence.fetch_add(1, Ordering::AcqRel) + 1;
        Some(PublishAttempt { sequence })
    }

    /// Release the guard once the submission settled (success or not)
    pub fn finish(&self, attempt: PublishAttempt) {
        tracing::debug!(sequence = attempt.sequence, "publish attempt settled");
        self.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_begin_finish_cycle() {
        let guard = PublishGuard::new();
        let attempt = guard.begin().unwrap();
        assert_eq!(attempt.sequence, 1);
        guard.finish(attempt);
        let next = guard.begin().unwrap();
        assert_eq!(next.sequence, 2);
    }

    #[test]
    fn test_second_begin_blocked_while_in_flight() {
        let guard = PublishGuard::new();
        let attempt = guard.begin().unwrap();
        assert!(guard.begin().is_none());
        guard.finish(attempt);
        assert!(guard.begin().is_some());
    }

    #[test]
    fn test_sequences_monotonic() {
        let guard = PublishGuard::new();
        let mut last = 0;
        for _ in 0..10 {
            let attempt = guard.begin().unwrap();
            assert!(attempt.sequence > last);
            last = attempt.sequence;
            guard.finish(attempt);
        }
    }

    #[tokio::test]
    async fn test_concurrent_begin_admits_one() {
        let guard = Arc::new(PublishGuard::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let guard = Arc::clone(&guard);
            handles.push(tokio::spawn(async move { guard.begin().is_some() }));
        }
        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                granted += 1;
            }
        }
        assert_eq!(granted, 1);
    }
}
