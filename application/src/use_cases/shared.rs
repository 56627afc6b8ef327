//! Shared utilities for use cases.
//!
//! Cancellation checking and racing used by the completion client and the
//! agent loop.

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Marker returned when a cancellation token fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cancelled;

/// Check if cancellation has been requested.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), Cancelled> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(Cancelled);
    }
    Ok(())
}

/// Await `fut` unless the token fires first.
///
/// The token is polled first, so an already-cancelled token never lets `fut`
/// start. When it wins, `fut` is dropped.
pub(crate) async fn cancellable<F>(
    token: &Option<CancellationToken>,
    fut: F,
) -> Result<F::Output, Cancelled>
where
    F: Future,
{
    match token {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(Cancelled),
            value = fut => Ok(value),
        },
        None => Ok(fut.await),
    }
}
