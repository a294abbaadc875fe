//! HMAC signing key material.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Key material for a signing operation.
///
/// `algorithm` names the hash used inside HMAC (`"sha256"`, ...), not the
/// signing algorithm itself. Validation is deferred to sink construction
/// so that a bad key settles the operation instead of panicking; see the
/// signer implementations. Material is wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    algorithm: String,
    data: Vec<u8>,
}

impl SigningKey {
    /// Create a key for the given inner hash algorithm.
    pub fn new(algorithm: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm: algorithm.into(),
            data: data.into(),
        }
    }

    /// The hash algorithm this key selects for HMAC.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Raw key bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .field("data", &format_args!("[{} bytes]", self.data.len()))
            .finish()
    }
}
