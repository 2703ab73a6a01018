//! Shared utilities for use cases.
//!
//! Cancellation helpers used by every stage that performs network I/O.

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Run `operation` unless `token` is cancelled first.
///
/// Returns `on_cancel()` if the token is already cancelled or becomes
/// cancelled while the operation is in flight. The in-flight future is
/// dropped on cancellation.
pub(crate) async fn cancellable<T, E, F>(
    token: &CancellationToken,
    operation: F,
    on_cancel: impl FnOnce() -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    if token.is_cancelled() {
        return Err(on_cancel());
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(on_cancel()),
        result = operation => result,
    }
}
