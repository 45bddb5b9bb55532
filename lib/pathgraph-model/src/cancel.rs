use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheaply-cloneable handle used to cooperatively stop a long-running scan
/// or delta application partway through.
///
/// Cloning shares the same underlying flag: calling [`CancellationToken::cancel`]
/// on any clone is observed by every other clone's [`CancellationToken::is_cancelled`].
/// A fresh token starts uncancelled and never trips on its own — something
/// else has to call `cancel`.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
