//! Deferred resolution behavior: queuing, ordering, memoization, rebinding.

use futures::future::{BoxFuture, FutureExt};
use quill_crypto::{
    Chunk, CryptoContext, CryptoError, CryptoProvider, Digest, HashBackend, ProviderProbe, Result,
    SigningKey, Sink, SoftwareProvider, TextCodec,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

/// A context whose resolution blocks until the returned sender fires.
fn gated_context() -> (CryptoContext, oneshot::Sender<()>) {
    let ctx = CryptoContext::with_probes(Vec::new());
    let (tx, rx) = oneshot::channel::<()>();
    ctx.set_provider_future(async move {
        rx.await
            .map_err(|_| CryptoError::internal("resolution gate dropped"))?;
        Ok(Arc::new(SoftwareProvider) as Arc<dyn CryptoProvider>)
    });
    (ctx, tx)
}

#[tokio::test]
async fn writes_issued_before_resolution_are_applied_in_order() {
    let (ctx, release) = gated_context();
    let hash = ctx.get_hash("sha256").unwrap();
    let hasher = hash.create();

    let work = async {
        hasher.write("a").await?;
        hasher.write("b").await?;
        hasher.write("c").await?;
        hasher.close().await
    };
    let (digest, ()) = tokio::join!(work, async {
        release.send(()).ok();
    });

    assert_eq!(
        digest.unwrap().to_hex(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[tokio::test]
async fn one_shot_calls_queue_on_the_resolution() {
    let (ctx, release) = gated_context();
    let hash = ctx.get_hash("md5").unwrap();

    let (digest, ()) = tokio::join!(hash.compute("abc"), async {
        release.send(()).ok();
    });
    assert_eq!(digest.unwrap().to_hex(), "900150983cd24fb0d6963f7d28e17f72");
}

#[tokio::test]
async fn deferred_signer_applies_queued_chunks_in_order() {
    let (ctx, release) = gated_context();
    let sign = ctx.get_sign("hmac").unwrap();
    let signer = sign.create(SigningKey::new("sha256", "key"));

    let work = async {
        signer
            .write("The quick brown fox jumps ")
            .await?;
        signer.write("over the lazy dog").await?;
        signer.close().await
    };
    let (signature, ()) = tokio::join!(work, async {
        release.send(()).ok();
    });

    assert_eq!(
        signature.unwrap().to_hex(),
        "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cda"
    );
}

#[tokio::test]
async fn digest_query_suspends_until_settlement() {
    let ctx = CryptoContext::new();
    let hash = ctx.get_hash("sha1").unwrap();
    let hasher = hash.create();

    let observer = hasher.digest();
    let driver = async {
        hasher.write("abc").await?;
        hasher.close().await
    };
    let (observed, closed) = tokio::join!(observer, driver);
    assert_eq!(observed.unwrap(), closed.unwrap());
}

struct CountingProbe {
    builds: Arc<AtomicUsize>,
}

impl ProviderProbe for CountingProbe {
    fn name(&self) -> &str {
        "counting"
    }

    fn available(&self) -> bool {
        true
    }

    fn build(&self) -> BoxFuture<'static, Result<Arc<dyn CryptoProvider>>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        futures::future::ready(Ok(Arc::new(SoftwareProvider) as Arc<dyn CryptoProvider>)).boxed()
    }
}

#[tokio::test]
async fn concurrent_handles_trigger_backend_selection_once() {
    let builds = Arc::new(AtomicUsize::new(0));
    let ctx = CryptoContext::with_probes(vec![Arc::new(CountingProbe {
        builds: builds.clone(),
    })]);

    let sha256 = ctx.get_hash("sha256").unwrap();
    let md5 = ctx.get_hash("md5").unwrap();
    let sign = ctx.get_sign("hmac").unwrap();

    let key = SigningKey::new("sha1", "key");
    let (a, b, c) = tokio::join!(
        sha256.compute("abc"),
        md5.compute("abc"),
        sign.sign(&key, "abc")
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn handles_rebind_permanently_once_resolved() {
    let ctx = CryptoContext::new();
    let hash = ctx.get_hash("sha256").unwrap();
    let before = hash.compute("abc").await.unwrap();

    // The handle is bound to its backend now; resetting the context must
    // not reach back into it.
    ctx.clear_provider();
    let after = hash.compute("abc").await.unwrap();
    assert_eq!(before, after);

    let hasher = hash.create();
    hasher.write("abc").await.unwrap();
    assert_eq!(hasher.close().await.unwrap(), before);
}

#[tokio::test]
async fn settle_once_holds_through_the_deferred_wrapper() {
    let (ctx, release) = gated_context();
    let hash = ctx.get_hash("sha256").unwrap();
    let hasher = hash.create();

    let work = async {
        hasher.write("abc").await?;
        let first = hasher.close().await?;
        let second = hasher.close().await?;
        assert_eq!(first, second);
        hasher.write("ignored").await?;
        let third = hasher.close().await?;
        assert_eq!(first, third);
        Ok::<Digest, CryptoError>(first)
    };
    let (result, ()) = tokio::join!(work, async {
        release.send(()).ok();
    });
    result.unwrap();
}

#[tokio::test]
async fn abort_before_resolution_settles_with_the_reason() {
    let (ctx, release) = gated_context();
    let hash = ctx.get_hash("sha512").unwrap();
    let hasher = hash.create();

    let work = async {
        hasher.write("abc").await?;
        hasher.abort("caller went away").await?;
        hasher.close().await
    };
    let (closed, ()) = tokio::join!(work, async {
        release.send(()).ok();
    });
    assert!(matches!(
        closed,
        Err(CryptoError::Aborted(reason)) if reason == "caller went away"
    ));
}

#[tokio::test]
async fn no_backend_fails_every_operation_until_an_override() {
    let ctx = CryptoContext::with_probes(Vec::new());
    let hash = ctx.get_hash("sha256").unwrap();
    let hasher = hash.create();

    assert!(matches!(
        hash.compute("abc").await,
        Err(CryptoError::NoBackend(_))
    ));
    assert!(matches!(
        hasher.write("abc").await,
        Err(CryptoError::NoBackend(_))
    ));

    // Handles created after the override resolve normally; the failed
    // ones stay failed.
    ctx.set_provider(Arc::new(SoftwareProvider));
    let fresh = ctx.get_hash("sha256").unwrap();
    fresh.compute("abc").await.unwrap();
    assert!(matches!(
        hash.compute("abc").await,
        Err(CryptoError::NoBackend(_))
    ));
}

#[tokio::test]
async fn invalid_key_settles_after_deferred_construction() {
    let (ctx, release) = gated_context();
    let sign = ctx.get_sign("hmac").unwrap();
    let signer = sign.create(SigningKey::new("sha256", Vec::<u8>::new()));

    let work = async { signer.close().await };
    let (closed, ()) = tokio::join!(work, async {
        release.send(()).ok();
    });
    assert!(matches!(closed, Err(CryptoError::InvalidKey(_))));
}

#[tokio::test]
async fn malformed_text_written_before_resolution_settles_the_sink() {
    let (ctx, release) = gated_context();
    let hash = ctx.get_hash("sha256").unwrap();
    let hasher = hash.create_with(TextCodec::Hex);

    let work = async {
        let err = hasher.write("not hex").await.unwrap_err();
        assert!(matches!(err, CryptoError::Encoding(_)));
        hasher.close().await
    };
    let (closed, ()) = tokio::join!(work, async {
        release.send(()).ok();
    });
    assert!(matches!(closed, Err(CryptoError::Encoding(_))));
}

/// A stand-in for a platform-native provider with its own algorithm set.
struct EchoProvider;

struct EchoBackend;

impl HashBackend for EchoBackend {
    fn algorithm(&self) -> &str {
        "echo"
    }

    fn digest(&self, data: Vec<u8>) -> BoxFuture<'static, Result<Digest>> {
        futures::future::ready(Ok(Digest::new(data))).boxed()
    }

    fn create(&self, _codec: TextCodec) -> Arc<dyn Sink> {
        unimplemented!("streaming is not part of this test double")
    }
}

impl CryptoProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn get_hash(&self, algorithm: &str) -> Result<Arc<dyn HashBackend>> {
        // Accepts a name the static set does not know.
        if algorithm == "echo" {
            Ok(Arc::new(EchoBackend))
        } else {
            Err(CryptoError::UnsupportedAlgorithm {
                requested: algorithm.to_string(),
                available: "'echo'",
            })
        }
    }

    fn get_sign(&self, algorithm: &str) -> Result<Arc<dyn quill_crypto::SignBackend>> {
        Err(CryptoError::UnsupportedAlgorithm {
            requested: algorithm.to_string(),
            available: "",
        })
    }
}

#[tokio::test]
async fn resolved_providers_own_algorithm_validation() {
    let ctx = CryptoContext::new();
    // Before resolution the static set rejects "echo".
    assert!(ctx.get_hash("echo").is_err());

    ctx.set_provider(Arc::new(EchoProvider));
    let echo = ctx.get_hash("echo").unwrap();
    let digest = echo.compute(Chunk::Bytes(vec![1, 2, 3])).await.unwrap();
    assert_eq!(digest.as_bytes(), &[1, 2, 3]);

    // And the provider now rejects names the static set would accept.
    assert!(ctx.get_hash("sha256").is_err());
}

struct NamedProbe {
    name: &'static str,
    available: bool,
    provider: fn() -> Arc<dyn CryptoProvider>,
}

impl ProviderProbe for NamedProbe {
    fn name(&self) -> &str {
        self.name
    }

    fn available(&self) -> bool {
        self.available
    }

    fn build(&self) -> BoxFuture<'static, Result<Arc<dyn CryptoProvider>>> {
        futures::future::ready(Ok((self.provider)())).boxed()
    }
}

#[tokio::test]
async fn probes_are_consulted_in_preference_order() {
    let ctx = CryptoContext::new();
    ctx.register_probe(Arc::new(NamedProbe {
        name: "native",
        available: false,
        provider: || Arc::new(EchoProvider),
    }));

    // The unavailable native probe is skipped; software wins.
    let provider = ctx.provider().await.unwrap();
    assert_eq!(provider.name(), "software");

    // A fresh context with an available native probe prefers it.
    let ctx = CryptoContext::new();
    ctx.register_probe(Arc::new(NamedProbe {
        name: "native",
        available: true,
        provider: || Arc::new(EchoProvider),
    }));
    let provider = ctx.provider().await.unwrap();
    assert_eq!(provider.name(), "echo");
}
