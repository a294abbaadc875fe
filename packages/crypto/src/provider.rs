//! Backend traits: what a crypto provider must supply.
//!
//! A provider is a bundle of hash and sign implementations. The built-in
//! [`SoftwareProvider`](crate::SoftwareProvider) is one; a platform-native
//! backend satisfies the same traits from outside this crate. Methods that
//! may be genuinely asynchronous on hardware-backed providers return
//! `BoxFuture` so the traits stay object-safe without `async_trait`.

use crate::{Chunk, CryptoError, Digest, DigestFuture, Result, SigningKey, TextCodec};
use futures::future::BoxFuture;
use std::sync::Arc;

/// A concrete source of hash and sign implementations.
pub trait CryptoProvider: Send + Sync {
    /// Short backend name for diagnostics.
    fn name(&self) -> &str;

    /// Resolve a hash implementation by algorithm name.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedAlgorithm`] for names this
    /// provider does not implement.
    fn get_hash(&self, algorithm: &str) -> Result<Arc<dyn HashBackend>>;

    /// Resolve a sign implementation by algorithm name.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedAlgorithm`] for names this
    /// provider does not implement.
    fn get_sign(&self, algorithm: &str) -> Result<Arc<dyn SignBackend>>;
}

/// One hash algorithm as implemented by a provider.
pub trait HashBackend: Send + Sync {
    /// Algorithm name this backend implements.
    fn algorithm(&self) -> &str;

    /// Hash a complete message.
    fn digest(&self, data: Vec<u8>) -> BoxFuture<'static, Result<Digest>>;

    /// Start a streaming hash operation.
    fn create(&self, codec: TextCodec) -> Arc<dyn Sink>;
}

/// One signing algorithm as implemented by a provider.
pub trait SignBackend: Send + Sync {
    /// Algorithm name this backend implements.
    fn algorithm(&self) -> &str;

    /// Sign a complete message under `key`.
    fn sign(&self, key: &SigningKey, data: Vec<u8>) -> BoxFuture<'static, Result<Digest>>;

    /// Start a streaming sign operation.
    ///
    /// Key validation happens here or later, never synchronously: a bad
    /// key yields a sink that is already settled with the error.
    fn create(&self, key: SigningKey, codec: TextCodec) -> Arc<dyn Sink>;
}

/// A streaming operation instance: write incrementally, settle exactly once.
///
/// State machine: Pending, then exactly one of Settled-Ok or
/// Settled-Error. Calls after settlement are no-ops that report the
/// settled outcome; buffered input is released at settlement.
pub trait Sink: Send + Sync {
    /// Append a chunk. Text is converted with the sink's codec; a codec
    /// failure settles the sink with the error.
    fn write(&self, chunk: Chunk) -> BoxFuture<'static, Result<()>>;

    /// Finalize: compute the digest/signature and settle.
    fn close(&self) -> BoxFuture<'static, Result<Digest>>;

    /// Terminate with an error. Terminal and idempotent.
    fn abort(&self, reason: CryptoError) -> BoxFuture<'static, Result<()>>;

    /// The settlement future; suspends until the sink settles.
    fn settlement(&self) -> DigestFuture;
}

/// Capability probe consulted during automatic provider resolution.
///
/// Probes are tried in registration order (native candidates before the
/// software fallback); the first available probe supplies the provider.
pub trait ProviderProbe: Send + Sync {
    /// Short backend name for diagnostics.
    fn name(&self) -> &str;

    /// Whether this backend can run in the current environment.
    fn available(&self) -> bool;

    /// Construct the provider. Only called when [`available`](Self::available)
    /// returned true.
    fn build(&self) -> BoxFuture<'static, Result<Arc<dyn CryptoProvider>>>;
}
