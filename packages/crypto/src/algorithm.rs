//! Statically known algorithm name sets.
//!
//! Before a provider is resolved, handle construction validates names
//! against these sets so bad requests fail fast and synchronously. After
//! resolution the concrete provider owns validation and may accept more.

use crate::{CryptoError, Result};
use quill_digest::DigestAlgorithm;

/// Names accepted by [`HashAlgorithm::from_str`].
pub const HASH_NAMES: &str = "'md5', 'sha1', 'sha224', 'sha256', 'sha384', 'sha512'";

/// Names accepted by [`SignAlgorithm::from_str`].
pub const SIGN_NAMES: &str = "'hmac'";

/// A hash algorithm in the statically supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// MD5.
    Md5,
    /// SHA-1.
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl HashAlgorithm {
    /// API name of this algorithm.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.core().name()
    }

    /// The software core backing this algorithm.
    #[must_use]
    pub const fn core(self) -> &'static DigestAlgorithm {
        match self {
            Self::Md5 => &quill_digest::MD5,
            Self::Sha1 => &quill_digest::SHA1,
            Self::Sha224 => &quill_digest::SHA224,
            Self::Sha256 => &quill_digest::SHA256,
            Self::Sha384 => &quill_digest::SHA384,
            Self::Sha512 => &quill_digest::SHA512,
        }
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = CryptoError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(CryptoError::UnsupportedAlgorithm {
                requested: name.to_string(),
                available: HASH_NAMES,
            }),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A signing algorithm in the statically supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignAlgorithm {
    /// HMAC; the digest function is selected per-key, not by this name.
    Hmac,
}

impl SignAlgorithm {
    /// API name of this algorithm.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hmac => "hmac",
        }
    }
}

impl std::str::FromStr for SignAlgorithm {
    type Err = CryptoError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "hmac" => Ok(Self::Hmac),
            _ => Err(CryptoError::UnsupportedAlgorithm {
                requested: name.to_string(),
                available: SIGN_NAMES,
            }),
        }
    }
}

impl std::fmt::Display for SignAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
