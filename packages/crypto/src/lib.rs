//! Pluggable hashing and HMAC signing.
//!
//! Callers request an operation by algorithm name and receive a uniform,
//! streaming-capable handle regardless of which backend ends up servicing
//! it. Backends are selected asynchronously by a [`CryptoContext`]; a
//! handle obtained before selection completes queues its work on the
//! shared resolution and rebinds permanently to the concrete backend once
//! it exists. The built-in [`SoftwareProvider`] computes everything
//! in-process with the `quill_digest` cores; platform-native backends
//! plug in through the [`CryptoProvider`] trait.
//!
//! ```rust,no_run
//! # async fn demo() -> quill_crypto::Result<()> {
//! let sha256 = quill_crypto::get_hash("sha256")?;
//! let digest = sha256.compute("abc").await?;
//! println!("{digest}");
//!
//! let hasher = sha256.create();
//! hasher.write("ab").await?;
//! hasher.write("c").await?;
//! assert_eq!(hasher.close().await?, digest);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod algorithm;
pub mod async_result;
pub mod codec;
pub mod context;
pub mod digest;
pub mod error;
pub mod handle;
pub mod key;
pub mod provider;
pub mod software;

pub use algorithm::{HashAlgorithm, SignAlgorithm, HASH_NAMES, SIGN_NAMES};
pub use async_result::DigestFuture;
pub use codec::{Chunk, TextCodec};
pub use context::{CryptoContext, ProviderFuture};
pub use digest::Digest;
pub use error::{CryptoError, Result};
pub use handle::{HashFunction, Hasher, SignFunction, Signer};
pub use key::SigningKey;
pub use provider::{CryptoProvider, HashBackend, ProviderProbe, SignBackend, Sink};
pub use software::{SoftwareProbe, SoftwareProvider};

// The software primitives, re-exported for direct use.
pub use quill_digest as primitives;

use std::sync::Arc;

/// Get the hash function for `algorithm` from the process-default context.
///
/// # Errors
///
/// Fails synchronously for unknown algorithm names, listing the valid set.
pub fn get_hash(algorithm: &str) -> Result<HashFunction> {
    CryptoContext::global().get_hash(algorithm)
}

/// Get the sign function for `algorithm` from the process-default context.
///
/// # Errors
///
/// Fails synchronously for unknown algorithm names, listing the valid set.
pub fn get_sign(algorithm: &str) -> Result<SignFunction> {
    CryptoContext::global().get_sign(algorithm)
}

/// Set the process-default context's provider explicitly.
pub fn set_provider(provider: Arc<dyn CryptoProvider>) {
    CryptoContext::global().set_provider(provider);
}

/// Clear the process-default context's provider; the next request probes
/// anew.
pub fn clear_provider() {
    CryptoContext::global().clear_provider();
}
