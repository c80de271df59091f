//! One-shot readiness signal.
//!
//! Resolves once, after the first successful scene initialization, and
//! never fails: if the signal is dropped before it resolves, every waiter
//! stays pending.

use futures::channel::oneshot;
use futures::future::{self, BoxFuture, FutureExt, Shared};

/// Clonable future that completes when the scene is ready.
pub type ReadyFuture = Shared<BoxFuture<'static, ()>>;

pub struct ReadySignal {
    sender: Option<oneshot::Sender<()>>,
    future: ReadyFuture,
}

impl ReadySignal {
    pub fn new() -> Self {
        let (sender, receiver) = oneshot::channel::<()>();
        let future = async move {
            if receiver.await.is_err() {
                future::pending::<()>().await;
            }
        }
        .boxed()
        .shared();
        Self {
            sender: Some(sender),
            future,
        }
    }

    /// Complete the signal. Returns `false` if it was already resolved.
    pub fn resolve(&mut self) -> bool {
        match self.sender.take() {
            Some(sender) => {
                // Waiters may all be gone; the signal still counts as resolved.
                let _ = sender.send(());
                true
            }
            None => false,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.sender.is_none()
    }

    /// A future for this signal. Any number may be taken, before or after
    /// resolution.
    pub fn wait(&self) -> ReadyFuture {
        self.future.clone()
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReadySignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadySignal")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
