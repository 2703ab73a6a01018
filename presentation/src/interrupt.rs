//! Ctrl-C handling for in-flight requests

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels a token when Ctrl-C arrives, for as long as the guard lives.
///
/// Arm one per request so an interrupt aborts only the work in flight;
/// dropping the guard stops listening.
pub struct InterruptGuard {
    handle: JoinHandle<()>,
}

impl InterruptGuard {
    pub fn arm(token: &CancellationToken) -> Self {
        let token = token.clone();
        let handle = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });
        Self { handle }
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
