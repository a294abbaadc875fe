//! Public hash/sign handles and their deferred streaming wrappers.
//!
//! A handle obtained before provider resolution holds the shared
//! resolution future; the first operation awaits it, asks the provider
//! for the concrete backend (or sink) and caches it in the binding. Every
//! later call short-circuits through the cached variant, so the one-time
//! resolution cost never recurs on the hot path. Operations awaited in
//! sequence against one handle are applied in call order across the
//! resolution boundary.

use crate::context::ProviderFuture;
use crate::{
    Chunk, CryptoError, CryptoProvider, Digest, HashBackend, Result, SignBackend, SigningKey, Sink,
    TextCodec,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Deferred-or-direct dispatch state.
///
/// Once `Bound` or `Failed`, a binding never changes again.
enum Binding<T> {
    Unresolved(ProviderFuture),
    Bound(T),
    Failed(CryptoError),
}

/// Await the resolution behind `binding` if necessary and cache the value
/// produced by `bind`. Fast path: a bound (or failed) binding returns
/// without touching the future.
async fn resolve<T: Clone>(
    binding: &Mutex<Binding<T>>,
    bind: impl FnOnce(Arc<dyn CryptoProvider>) -> Result<T>,
) -> Result<T> {
    let resolution = {
        match &*lock(binding) {
            Binding::Bound(value) => return Ok(value.clone()),
            Binding::Failed(err) => return Err(err.clone()),
            Binding::Unresolved(future) => future.clone(),
        }
    };

    match resolution.await {
        Ok(provider) => {
            let mut guard = lock(binding);
            match &*guard {
                // Another task bound while this one awaited.
                Binding::Bound(value) => Ok(value.clone()),
                Binding::Failed(err) => Err(err.clone()),
                Binding::Unresolved(_) => match bind(provider) {
                    Ok(value) => {
                        *guard = Binding::Bound(value.clone());
                        Ok(value)
                    }
                    Err(err) => {
                        *guard = Binding::Failed(err.clone());
                        Err(err)
                    }
                },
            }
        }
        Err(err) => {
            let mut guard = lock(binding);
            if matches!(&*guard, Binding::Unresolved(_)) {
                *guard = Binding::Failed(err.clone());
            }
            Err(err)
        }
    }
}

fn lock<T>(mutex: &Mutex<Binding<T>>) -> MutexGuard<'_, Binding<T>> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Hash function handle for one algorithm.
///
/// Obtained from [`CryptoContext::get_hash`](crate::CryptoContext::get_hash);
/// usable immediately even while the backend is still being selected.
pub struct HashFunction {
    name: String,
    binding: Mutex<Binding<Arc<dyn HashBackend>>>,
}

impl std::fmt::Debug for HashFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl HashFunction {
    pub(crate) fn bound(backend: Arc<dyn HashBackend>) -> Self {
        Self {
            name: backend.algorithm().to_string(),
            binding: Mutex::new(Binding::Bound(backend)),
        }
    }

    pub(crate) fn deferred(name: &str, resolution: ProviderFuture) -> Self {
        Self {
            name: name.to_string(),
            binding: Mutex::new(Binding::Unresolved(resolution)),
        }
    }

    /// The algorithm this handle computes.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.name
    }

    async fn backend(&self) -> Result<Arc<dyn HashBackend>> {
        let name = self.name.clone();
        resolve(&self.binding, move |provider| provider.get_hash(&name)).await
    }

    /// Hash `data` in one call, treating text as UTF-8.
    ///
    /// # Errors
    ///
    /// Fails on resolution failure or if a resolved provider rejects the
    /// algorithm.
    pub async fn compute(&self, data: impl Into<Chunk>) -> Result<Digest> {
        self.compute_with(data, TextCodec::default()).await
    }

    /// Hash `data` in one call with an explicit text codec.
    ///
    /// # Errors
    ///
    /// As [`compute`](Self::compute), plus codec failures on text input.
    pub async fn compute_with(&self, data: impl Into<Chunk>, codec: TextCodec) -> Result<Digest> {
        let chunk = data.into();
        let backend = self.backend().await?;
        let bytes = chunk.into_bytes(codec)?;
        backend.digest(bytes).await
    }

    /// Start a streaming hash operation, treating text chunks as UTF-8.
    #[must_use]
    pub fn create(&self) -> Hasher {
        self.create_with(TextCodec::default())
    }

    /// Start a streaming hash operation with an explicit text codec.
    #[must_use]
    pub fn create_with(&self, codec: TextCodec) -> Hasher {
        let binding = match &*lock(&self.binding) {
            Binding::Bound(backend) => Binding::Bound(backend.create(codec)),
            Binding::Failed(err) => Binding::Failed(err.clone()),
            Binding::Unresolved(future) => Binding::Unresolved(future.clone()),
        };
        Hasher {
            name: self.name.clone(),
            codec,
            binding: Mutex::new(binding),
        }
    }
}

/// One streaming hash operation.
///
/// Writes issued before the backend resolves suspend on the shared
/// resolution, then the concrete sink is cached and all further calls go
/// straight to it.
pub struct Hasher {
    name: String,
    codec: TextCodec,
    binding: Mutex<Binding<Arc<dyn Sink>>>,
}

impl Hasher {
    async fn sink(&self) -> Result<Arc<dyn Sink>> {
        let name = self.name.clone();
        let codec = self.codec;
        resolve(&self.binding, move |provider| {
            Ok(provider.get_hash(&name)?.create(codec))
        })
        .await
    }

    /// Append a chunk of input.
    ///
    /// # Errors
    ///
    /// Fails on resolution failure, codec failure, or when the sink
    /// already settled with an error.
    pub async fn write(&self, chunk: impl Into<Chunk>) -> Result<()> {
        self.sink().await?.write(chunk.into()).await
    }

    /// Finalize and return the digest. Idempotent after settlement.
    ///
    /// # Errors
    ///
    /// Returns the settlement error if the sink settled unsuccessfully.
    pub async fn close(&self) -> Result<Digest> {
        self.sink().await?.close().await
    }

    /// Abort the operation; terminal and idempotent.
    ///
    /// # Errors
    ///
    /// Fails only on resolution failure.
    pub async fn abort(&self, reason: impl Into<String>) -> Result<()> {
        self.sink().await?.abort(CryptoError::aborted(reason)).await
    }

    /// The digest, settling when the operation does.
    ///
    /// # Errors
    ///
    /// Returns the abort or failure reason if the sink settled
    /// unsuccessfully.
    pub async fn digest(&self) -> Result<Digest> {
        self.sink().await?.settlement().await
    }
}

/// Sign function handle for one algorithm.
pub struct SignFunction {
    name: String,
    binding: Mutex<Binding<Arc<dyn SignBackend>>>,
}

impl std::fmt::Debug for SignFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl SignFunction {
    pub(crate) fn bound(backend: Arc<dyn SignBackend>) -> Self {
        Self {
            name: backend.algorithm().to_string(),
            binding: Mutex::new(Binding::Bound(backend)),
        }
    }

    pub(crate) fn deferred(name: &str, resolution: ProviderFuture) -> Self {
        Self {
            name: name.to_string(),
            binding: Mutex::new(Binding::Unresolved(resolution)),
        }
    }

    /// The algorithm this handle signs with.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.name
    }

    async fn backend(&self) -> Result<Arc<dyn SignBackend>> {
        let name = self.name.clone();
        resolve(&self.binding, move |provider| provider.get_sign(&name)).await
    }

    /// Sign `data` under `key` in one call, treating text as UTF-8.
    ///
    /// # Errors
    ///
    /// Fails on resolution failure or invalid key material.
    pub async fn sign(&self, key: &SigningKey, data: impl Into<Chunk>) -> Result<Digest> {
        self.sign_with(key, data, TextCodec::default()).await
    }

    /// Sign `data` under `key` with an explicit text codec.
    ///
    /// # Errors
    ///
    /// As [`sign`](Self::sign), plus codec failures on text input.
    pub async fn sign_with(
        &self,
        key: &SigningKey,
        data: impl Into<Chunk>,
        codec: TextCodec,
    ) -> Result<Digest> {
        let chunk = data.into();
        let backend = self.backend().await?;
        let bytes = chunk.into_bytes(codec)?;
        backend.sign(key, bytes).await
    }

    /// Start a streaming sign operation, treating text chunks as UTF-8.
    #[must_use]
    pub fn create(&self, key: SigningKey) -> Signer {
        self.create_with(key, TextCodec::default())
    }

    /// Start a streaming sign operation with an explicit text codec.
    #[must_use]
    pub fn create_with(&self, key: SigningKey, codec: TextCodec) -> Signer {
        let binding = match &*lock(&self.binding) {
            Binding::Bound(backend) => Binding::Bound(backend.create(key.clone(), codec)),
            Binding::Failed(err) => Binding::Failed(err.clone()),
            Binding::Unresolved(future) => Binding::Unresolved(future.clone()),
        };
        Signer {
            name: self.name.clone(),
            key,
            codec,
            binding: Mutex::new(binding),
        }
    }
}

/// One streaming sign operation.
pub struct Signer {
    name: String,
    key: SigningKey,
    codec: TextCodec,
    binding: Mutex<Binding<Arc<dyn Sink>>>,
}

impl Signer {
    async fn sink(&self) -> Result<Arc<dyn Sink>> {
        let name = self.name.clone();
        let key = self.key.clone();
        let codec = self.codec;
        resolve(&self.binding, move |provider| {
            Ok(provider.get_sign(&name)?.create(key, codec))
        })
        .await
    }

    /// Append a chunk of input.
    ///
    /// # Errors
    ///
    /// Fails on resolution failure, codec failure, invalid key material,
    /// or when the sink already settled with an error.
    pub async fn write(&self, chunk: impl Into<Chunk>) -> Result<()> {
        self.sink().await?.write(chunk.into()).await
    }

    /// Finalize and return the signature. Idempotent after settlement.
    ///
    /// # Errors
    ///
    /// Returns the settlement error if the sink settled unsuccessfully.
    pub async fn close(&self) -> Result<Digest> {
        self.sink().await?.close().await
    }

    /// Abort the operation; terminal and idempotent.
    ///
    /// # Errors
    ///
    /// Fails only on resolution failure.
    pub async fn abort(&self, reason: impl Into<String>) -> Result<()> {
        self.sink().await?.abort(CryptoError::aborted(reason)).await
    }

    /// The signature, settling when the operation does.
    ///
    /// # Errors
    ///
    /// Returns the abort or failure reason if the sink settled
    /// unsuccessfully.
    pub async fn signature(&self) -> Result<Digest> {
        self.sink().await?.settlement().await
    }
}
