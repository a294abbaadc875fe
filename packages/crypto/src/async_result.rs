//! Settlement future shared by streaming sinks.

use crate::{CryptoError, Digest, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

type SharedSettlement = Shared<BoxFuture<'static, Result<Digest>>>;

/// Asynchronous result of a streaming hash or sign operation.
///
/// Resolves when the sink settles and is cloneable: every clone observes
/// the identical outcome, so a settled sink can keep answering queries
/// after the fact. Querying before settlement suspends.
#[derive(Clone)]
pub struct DigestFuture {
    inner: SharedSettlement,
}

impl DigestFuture {
    /// Wrap a settlement channel receiver.
    pub(crate) fn from_receiver(receiver: oneshot::Receiver<Result<Digest>>) -> Self {
        let inner = async move {
            receiver
                .await
                .unwrap_or_else(|_| Err(CryptoError::internal("sink dropped before settling")))
        }
        .boxed()
        .shared();
        Self { inner }
    }

    /// A future that is already settled.
    pub(crate) fn ready(result: Result<Digest>) -> Self {
        Self {
            inner: async move { result }.boxed().shared(),
        }
    }
}

impl Future for DigestFuture {
    type Output = Result<Digest>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

/// Create a settlement channel: the sender settles, the future observes.
pub(crate) fn settlement() -> (oneshot::Sender<Result<Digest>>, DigestFuture) {
    let (tx, rx) = oneshot::channel();
    (tx, DigestFuture::from_receiver(rx))
}
