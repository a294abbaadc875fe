//! The built-in software backend over the `quill_digest` cores.
//!
//! Always available; the resolution fallback when no native backend is
//! registered. Streaming sinks buffer the whole input and run the pure
//! core at close time, so `write` never suspends and settlement happens
//! within the closing call.

use crate::async_result::settlement;
use crate::{
    Chunk, CryptoError, CryptoProvider, Digest, DigestFuture, HashAlgorithm, HashBackend,
    ProviderProbe, Result, SignAlgorithm, SignBackend, SigningKey, Sink, TextCodec,
};
use futures::future::{BoxFuture, FutureExt};
use quill_digest::DigestAlgorithm;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

/// Hash and sign implementations computed in-process.
#[derive(Debug, Default)]
pub struct SoftwareProvider;

impl SoftwareProvider {
    /// Create the software provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CryptoProvider for SoftwareProvider {
    fn name(&self) -> &str {
        "software"
    }

    fn get_hash(&self, algorithm: &str) -> Result<Arc<dyn HashBackend>> {
        let algorithm: HashAlgorithm = algorithm.parse()?;
        Ok(Arc::new(SoftwareHash { algorithm }))
    }

    fn get_sign(&self, algorithm: &str) -> Result<Arc<dyn SignBackend>> {
        let _: SignAlgorithm = algorithm.parse()?;
        Ok(Arc::new(SoftwareSign))
    }
}

/// Probe for the software fallback; available everywhere.
#[derive(Debug, Default)]
pub struct SoftwareProbe;

impl ProviderProbe for SoftwareProbe {
    fn name(&self) -> &str {
        "software"
    }

    fn available(&self) -> bool {
        true
    }

    fn build(&self) -> BoxFuture<'static, Result<Arc<dyn CryptoProvider>>> {
        futures::future::ready(Ok(Arc::new(SoftwareProvider) as Arc<dyn CryptoProvider>)).boxed()
    }
}

struct SoftwareHash {
    algorithm: HashAlgorithm,
}

impl HashBackend for SoftwareHash {
    fn algorithm(&self) -> &str {
        self.algorithm.name()
    }

    fn digest(&self, data: Vec<u8>) -> BoxFuture<'static, Result<Digest>> {
        let core = self.algorithm.core();
        async move {
            let digest = Digest::new(core.digest(&data));
            // Hand the scheduler a turn; the cores run synchronously.
            tokio::task::yield_now().await;
            Ok(digest)
        }
        .boxed()
    }

    fn create(&self, codec: TextCodec) -> Arc<dyn Sink> {
        let core = self.algorithm.core();
        Arc::new(BufferedSink::pending(
            codec,
            Box::new(move |buffer| Ok(Digest::new(core.digest(buffer)))),
        ))
    }
}

struct SoftwareSign;

impl SignBackend for SoftwareSign {
    fn algorithm(&self) -> &str {
        SignAlgorithm::Hmac.name()
    }

    fn sign(&self, key: &SigningKey, data: Vec<u8>) -> BoxFuture<'static, Result<Digest>> {
        let prepared = prepare_key(key);
        async move {
            let (core, key_bytes) = prepared?;
            let digest = Digest::new(quill_digest::hmac(core, &data, &key_bytes));
            tokio::task::yield_now().await;
            Ok(digest)
        }
        .boxed()
    }

    fn create(&self, key: SigningKey, codec: TextCodec) -> Arc<dyn Sink> {
        match prepare_key(&key) {
            Ok((core, key_bytes)) => Arc::new(BufferedSink::pending(
                codec,
                Box::new(move |buffer| Ok(Digest::new(quill_digest::hmac(core, buffer, &key_bytes)))),
            )),
            // Deferred construction cannot throw; a bad key settles the sink.
            Err(err) => Arc::new(BufferedSink::settled(codec, err)),
        }
    }
}

/// Validate key material and pick the inner hash core by the key's
/// declared algorithm.
fn prepare_key(key: &SigningKey) -> Result<(&'static DigestAlgorithm, Vec<u8>)> {
    if key.data().is_empty() {
        return Err(CryptoError::InvalidKey(
            "key data must be non-empty".to_string(),
        ));
    }
    let core = quill_digest::by_name(key.algorithm()).ok_or_else(|| {
        CryptoError::InvalidKey(format!("unknown hash algorithm {:?}", key.algorithm()))
    })?;
    Ok((core, key.data().to_vec()))
}

type Finalize = Box<dyn Fn(&[u8]) -> Result<Digest> + Send + Sync>;

enum SinkState {
    Pending {
        buffer: Vec<u8>,
        tx: oneshot::Sender<Result<Digest>>,
    },
    Settled(Result<Digest>),
}

/// Settle-once buffering sink shared by the software hasher and signer.
///
/// Pending until `close` or `abort` (or a codec failure during `write`);
/// the buffer is released the moment the sink settles.
struct BufferedSink {
    codec: TextCodec,
    state: Mutex<SinkState>,
    settled: DigestFuture,
    finalize: Finalize,
}

impl BufferedSink {
    fn pending(codec: TextCodec, finalize: Finalize) -> Self {
        let (tx, settled) = settlement();
        Self {
            codec,
            state: Mutex::new(SinkState::Pending {
                buffer: Vec::new(),
                tx,
            }),
            settled,
            finalize,
        }
    }

    /// A sink born settled with an error (failed deferred construction).
    fn settled(codec: TextCodec, err: CryptoError) -> Self {
        Self {
            codec,
            state: Mutex::new(SinkState::Settled(Err(err.clone()))),
            settled: DigestFuture::ready(Err(err)),
            finalize: Box::new(|_| {
                Err(CryptoError::internal("finalize called on a settled sink"))
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_sync(&self, chunk: Chunk) -> Result<()> {
        let mut state = self.lock_state();
        let encoded = match &*state {
            SinkState::Settled(Ok(_)) => return Ok(()),
            SinkState::Settled(Err(err)) => return Err(err.clone()),
            SinkState::Pending { .. } => chunk.into_bytes(self.codec),
        };
        match encoded {
            Ok(bytes) => {
                if let SinkState::Pending { buffer, .. } = &mut *state {
                    buffer.extend_from_slice(&bytes);
                }
                Ok(())
            }
            Err(err) => {
                settle(&mut state, Err(err.clone()));
                Err(err)
            }
        }
    }

    fn close_sync(&self) -> Result<Digest> {
        let mut state = self.lock_state();
        match take_state(&mut state) {
            SinkState::Pending { buffer, tx } => {
                let result = (self.finalize)(&buffer);
                drop(buffer);
                let _ = tx.send(result.clone());
                *state = SinkState::Settled(result.clone());
                result
            }
            SinkState::Settled(result) => {
                *state = SinkState::Settled(result.clone());
                result
            }
        }
    }

    fn abort_sync(&self, reason: CryptoError) -> Result<()> {
        let mut state = self.lock_state();
        if matches!(&*state, SinkState::Pending { .. }) {
            tracing::trace!(%reason, "aborting sink");
            settle(&mut state, Err(reason));
        }
        Ok(())
    }
}

/// Move the state out, leaving a placeholder that is immediately replaced.
fn take_state(state: &mut SinkState) -> SinkState {
    std::mem::replace(
        state,
        SinkState::Settled(Err(CryptoError::internal("sink is settling"))),
    )
}

/// Transition Pending to Settled, notifying the settlement future and
/// dropping the buffer in the same step.
fn settle(state: &mut SinkState, result: Result<Digest>) {
    if let SinkState::Pending { tx, .. } =
        std::mem::replace(state, SinkState::Settled(result.clone()))
    {
        let _ = tx.send(result);
    }
}

impl Sink for BufferedSink {
    fn write(&self, chunk: Chunk) -> BoxFuture<'static, Result<()>> {
        futures::future::ready(self.write_sync(chunk)).boxed()
    }

    fn close(&self) -> BoxFuture<'static, Result<Digest>> {
        futures::future::ready(self.close_sync()).boxed()
    }

    fn abort(&self, reason: CryptoError) -> BoxFuture<'static, Result<()>> {
        futures::future::ready(self.abort_sync(reason)).boxed()
    }

    fn settlement(&self) -> DigestFuture {
        self.settled.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha256_sink() -> Arc<dyn Sink> {
        SoftwareProvider
            .get_hash("sha256")
            .unwrap()
            .create(TextCodec::Utf8)
    }

    #[tokio::test]
    async fn close_twice_returns_the_identical_digest() {
        let sink = sha256_sink();
        sink.write(Chunk::from("abc")).await.unwrap();
        let first = sink.close().await.unwrap();
        let second = sink.close().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn write_after_close_does_not_change_the_digest() {
        let sink = sha256_sink();
        sink.write(Chunk::from("abc")).await.unwrap();
        let digest = sink.close().await.unwrap();
        sink.write(Chunk::from("more")).await.unwrap();
        assert_eq!(sink.close().await.unwrap(), digest);
    }

    #[tokio::test]
    async fn abort_is_terminal_and_idempotent() {
        let sink = sha256_sink();
        sink.write(Chunk::from("abc")).await.unwrap();
        sink.abort(CryptoError::aborted("gone")).await.unwrap();
        assert!(matches!(
            sink.close().await,
            Err(CryptoError::Aborted(reason)) if reason == "gone"
        ));
        // A second abort with a different reason is a no-op.
        sink.abort(CryptoError::aborted("other")).await.unwrap();
        assert!(matches!(
            sink.settlement().await,
            Err(CryptoError::Aborted(reason)) if reason == "gone"
        ));
    }

    #[tokio::test]
    async fn malformed_text_settles_the_sink() {
        let backend = SoftwareProvider.get_hash("md5").unwrap();
        let sink = backend.create(TextCodec::Hex);
        let err = sink.write(Chunk::from("zz")).await.unwrap_err();
        assert!(matches!(err, CryptoError::Encoding(_)));
        assert!(matches!(sink.close().await, Err(CryptoError::Encoding(_))));
    }

    #[tokio::test]
    async fn invalid_key_settles_the_signer() {
        let backend = SoftwareProvider.get_sign("hmac").unwrap();
        let empty = backend.create(SigningKey::new("sha256", Vec::new()), TextCodec::Utf8);
        assert!(matches!(
            empty.close().await,
            Err(CryptoError::InvalidKey(_))
        ));

        let unknown = backend.create(SigningKey::new("sha3", "key"), TextCodec::Utf8);
        assert!(matches!(
            unknown.settlement().await,
            Err(CryptoError::InvalidKey(_))
        ));
    }
}
