//! One-shot barrier
//!
//! A barrier starts closed and is opened by a single signal. Opening releases
//! every current waiter, and every later `wait` returns immediately. A barrier
//! is never closed again; each pipeline run arms a fresh pair.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct OneShotBarrier {
    name: &'static str,
    tx: Arc<watch::Sender<bool>>,
}

impl OneShotBarrier {
    pub fn new(name: &'static str) -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            name,
            tx: Arc::new(tx),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Open the barrier. Returns true only for the call that opened it.
    pub fn signal(&self) -> bool {
        let was_open = self.tx.send_replace(true);
        if !was_open {
            debug!("Barrier '{}' signalled", self.name);
        }
        !was_open
    }

    pub fn is_signalled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the barrier has been signalled
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel
        let _ = rx.wait_for(|open| *open).await;
    }

    /// Guard that signals this barrier when dropped, including during unwind
    pub fn signal_on_drop(&self) -> SignalOnDrop {
        SignalOnDrop {
            barrier: self.clone(),
        }
    }
}

/// Signals its barrier on drop
#[derive(Debug)]
pub struct SignalOnDrop {
    barrier: OneShotBarrier,
}

impl Drop for SignalOnDrop {
    fn drop(&mut self) {
        self.barrier.signal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_after_signal_returns_immediately() {
        let barrier = OneShotBarrier::new("test");
        assert!(barrier.signal());
        assert!(!barrier.signal());

        tokio::time::timeout(Duration::from_millis(100), barrier.wait())
            .await
            .expect("signalled barrier must not block");
        assert!(barrier.is_signalled());
    }

    #[tokio::test]
    async fn test_signal_releases_all_waiters() {
        let barrier = OneShotBarrier::new("test");
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let barrier = barrier.clone();
                tokio::spawn(async move { barrier.wait().await })
            })
            .collect();

        tokio::task::yield_now().await;
        barrier.signal();

        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("waiter released")
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_guard_signals_on_panic() {
        let barrier = OneShotBarrier::new("test");
        let guarded = barrier.clone();

        let result = tokio::spawn(async move {
            let _release = guarded.signal_on_drop();
            panic!("stage blew up");
        })
        .await;

        assert!(result.unwrap_err().is_panic());
        assert!(barrier.is_signalled());
    }
}
