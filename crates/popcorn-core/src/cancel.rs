use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Drive `fut` to completion unless `token` is cancelled first.
///
/// Returns `None` on cancellation; `fut` is dropped without being polled
/// again.
pub async fn run_cancellable<F>(token: &CancellationToken, fut: F) -> Option<F::Output>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        output = fut => Some(output),
    }
}

/// Wait `delay`, then drive `fut`. Cancelling during the wait means `fut` is
/// never polled, so no request goes out.
pub async fn run_debounced<F>(token: &CancellationToken, delay: Duration, fut: F) -> Option<F::Output>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => return None,
        _ = tokio::time::sleep(delay) => {}
    }
    run_cancellable(token, fut).await
}
