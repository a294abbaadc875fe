//! Provider registry: memoized asynchronous backend resolution.
//!
//! A [`CryptoContext`] owns at most one resolved provider. The first
//! request starts a probe chain; concurrent requests share the in-flight
//! future so selection runs exactly once. `set_provider` overrides
//! auto-selection, and an auto-resolution that loses the race to an
//! explicit override never clobbers it.

use crate::software::SoftwareProbe;
use crate::{
    CryptoError, CryptoProvider, HashAlgorithm, HashFunction, ProviderProbe, Result, SignAlgorithm,
    SignFunction,
};
use futures::future::{BoxFuture, FutureExt, Shared};
use once_cell::sync::Lazy;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to an in-flight provider resolution.
pub type ProviderFuture = Shared<BoxFuture<'static, Result<Arc<dyn CryptoProvider>>>>;

enum SlotState {
    Empty,
    Resolving(ProviderFuture),
    Resolved(Arc<dyn CryptoProvider>),
}

struct Slot {
    state: SlotState,
    /// Bumped by every explicit override/reset; a completed resolution
    /// only writes back if the epoch it started under is still current.
    epoch: u64,
}

struct ContextInner {
    slot: Mutex<Slot>,
    probes: Mutex<Vec<Arc<dyn ProviderProbe>>>,
}

/// Registry selecting and caching the crypto backend for its handles.
///
/// Cloning yields another handle to the same registry. Independent
/// registries are fully isolated; [`CryptoContext::global`] is the shared
/// process-default.
#[derive(Clone)]
pub struct CryptoContext {
    inner: Arc<ContextInner>,
}

impl Default for CryptoContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoContext {
    /// Create a registry with the default probe chain (software fallback).
    #[must_use]
    pub fn new() -> Self {
        Self::with_probes(vec![Arc::new(SoftwareProbe)])
    }

    /// Create a registry with an explicit probe chain, consulted in order.
    ///
    /// An empty chain makes resolution fail until a provider is set
    /// explicitly; useful for exercising the no-backend path.
    #[must_use]
    pub fn with_probes(probes: Vec<Arc<dyn ProviderProbe>>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                slot: Mutex::new(Slot {
                    state: SlotState::Empty,
                    epoch: 0,
                }),
                probes: Mutex::new(probes),
            }),
        }
    }

    /// The process-default registry.
    #[must_use]
    pub fn global() -> &'static CryptoContext {
        static GLOBAL: Lazy<CryptoContext> = Lazy::new(CryptoContext::new);
        &GLOBAL
    }

    /// Register a preferred probe, consulted before existing ones.
    ///
    /// Native backends register here so auto-selection favors them over
    /// the software fallback. Takes effect for resolutions started later.
    pub fn register_probe(&self, probe: Arc<dyn ProviderProbe>) {
        lock(&self.inner.probes).insert(0, probe);
    }

    /// The resolved provider, if resolution has completed.
    #[must_use]
    pub fn resolved_provider(&self) -> Option<Arc<dyn CryptoProvider>> {
        match &lock(&self.inner.slot).state {
            SlotState::Resolved(provider) => Some(provider.clone()),
            _ => None,
        }
    }

    /// The current or newly started provider resolution.
    ///
    /// Memoized: while a resolution is outstanding every caller receives
    /// the same shared future, and once resolved the provider is returned
    /// immediately.
    pub fn provider(&self) -> ProviderFuture {
        let mut slot = lock(&self.inner.slot);
        match &slot.state {
            SlotState::Resolved(provider) => {
                let provider = provider.clone();
                futures::future::ready(Ok(provider)).boxed().shared()
            }
            SlotState::Resolving(future) => future.clone(),
            SlotState::Empty => {
                let probes = lock(&self.inner.probes).clone();
                self.install_resolution(&mut slot, resolve_from_probes(probes))
            }
        }
    }

    /// Store a resolved provider, overriding auto-selection.
    pub fn set_provider(&self, provider: Arc<dyn CryptoProvider>) {
        let mut slot = lock(&self.inner.slot);
        slot.epoch += 1;
        tracing::debug!(backend = provider.name(), "crypto provider set explicitly");
        slot.state = SlotState::Resolved(provider);
    }

    /// Adopt a not-yet-resolved provider, overriding auto-selection.
    ///
    /// Pending and future handles share this future; on success the
    /// provider is cached like an auto-resolved one.
    pub fn set_provider_future<F>(&self, future: F)
    where
        F: Future<Output = Result<Arc<dyn CryptoProvider>>> + Send + 'static,
    {
        let mut slot = lock(&self.inner.slot);
        slot.epoch += 1;
        tracing::debug!("crypto provider future set explicitly");
        let _ = self.install_resolution(&mut slot, future);
    }

    /// Clear any cached or in-flight provider; the next request probes anew.
    pub fn clear_provider(&self) {
        let mut slot = lock(&self.inner.slot);
        slot.epoch += 1;
        tracing::debug!("crypto provider cleared");
        slot.state = SlotState::Empty;
    }

    /// Get the hash function for `algorithm`.
    ///
    /// With a resolved provider this delegates immediately; before
    /// resolution the name is validated against the static set and a
    /// deferred handle is returned.
    ///
    /// # Errors
    ///
    /// Fails synchronously for unknown names (listing the valid set) or
    /// when a resolved provider rejects the algorithm.
    pub fn get_hash(&self, algorithm: &str) -> Result<HashFunction> {
        if let Some(provider) = self.resolved_provider() {
            let backend = provider.get_hash(algorithm)?;
            return Ok(HashFunction::bound(backend));
        }
        let parsed: HashAlgorithm = algorithm.parse()?;
        Ok(HashFunction::deferred(parsed.name(), self.provider()))
    }

    /// Get the sign function for `algorithm`.
    ///
    /// # Errors
    ///
    /// Same contract as [`get_hash`](Self::get_hash).
    pub fn get_sign(&self, algorithm: &str) -> Result<SignFunction> {
        if let Some(provider) = self.resolved_provider() {
            let backend = provider.get_sign(algorithm)?;
            return Ok(SignFunction::bound(backend));
        }
        let parsed: SignAlgorithm = algorithm.parse()?;
        Ok(SignFunction::deferred(parsed.name(), self.provider()))
    }

    /// Wrap `future` with the write-back step, store it in the slot and
    /// return the shared handle.
    fn install_resolution<F>(&self, slot: &mut MutexGuard<'_, Slot>, future: F) -> ProviderFuture
    where
        F: Future<Output = Result<Arc<dyn CryptoProvider>>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let epoch = slot.epoch;
        let shared = async move {
            let result = future.await;
            let mut slot = lock(&inner.slot);
            if slot.epoch == epoch {
                match &result {
                    Ok(provider) => {
                        tracing::debug!(backend = provider.name(), "crypto provider resolved");
                        slot.state = SlotState::Resolved(provider.clone());
                    }
                    // Keep the failed shared future in place so every
                    // later request observes the same resolution error
                    // until an explicit override.
                    Err(err) => tracing::warn!(%err, "crypto provider resolution failed"),
                }
            }
            result
        }
        .boxed()
        .shared();
        slot.state = SlotState::Resolving(shared.clone());
        shared
    }
}

/// Probe the environment: first available backend wins.
async fn resolve_from_probes(probes: Vec<Arc<dyn ProviderProbe>>) -> Result<Arc<dyn CryptoProvider>> {
    for probe in probes {
        if probe.available() {
            tracing::debug!(backend = probe.name(), "selecting crypto backend");
            return probe.build().await;
        }
    }
    Err(CryptoError::NoBackend(
        "no usable backend was identified".to_string(),
    ))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
