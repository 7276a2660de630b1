//! Native (browser-mode) adapter: notification subscription lifetime and request settlement.

use fullscreen_host::{
    FullscreenFuture, FullscreenHost, FullscreenHostError, FullscreenListener, ListenerId,
};
use futures::{
    channel::oneshot,
    future::{self, Either},
};

#[derive(Debug, Default)]
/// Change/error subscription held for the lifetime of a browser-mode session.
///
/// Release is idempotent: the listener id is taken on the first release, so a second release
/// (teardown after an out-of-band exit, drop after teardown) never reaches the host.
pub(crate) struct NativeSubscription {
    id: Option<ListenerId>,
}

impl NativeSubscription {
    pub(crate) fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Installs `listener` unless a subscription is already held.
    pub(crate) fn install<H: FullscreenHost>(&mut self, host: &H, listener: FullscreenListener) {
        if self.id.is_none() {
            self.id = Some(host.subscribe(listener));
        }
    }

    /// Releases the subscription, returning whether one was held.
    pub(crate) fn release<H: FullscreenHost>(&mut self, host: &H) -> bool {
        match self.id.take() {
            Some(id) => {
                host.unsubscribe(id);
                true
            }
            None => false,
        }
    }
}

/// Waits for a native request, rejecting early when an error notification arrives first.
///
/// A closed error channel means nobody will report an asynchronous error any more, so the
/// request alone decides the outcome.
pub(crate) async fn settle(
    request: FullscreenFuture<'_, Result<(), FullscreenHostError>>,
    error_signal: oneshot::Receiver<FullscreenHostError>,
) -> Result<(), FullscreenHostError> {
    match future::select(request, error_signal).await {
        Either::Left((result, _)) => result,
        Either::Right((Ok(err), _)) => Err(err),
        Either::Right((Err(oneshot::Canceled), request)) => request.await,
    }
}
