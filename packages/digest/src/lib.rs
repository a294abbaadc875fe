//! Software hash cores: MD5, SHA-1, SHA-224/256, SHA-384/512 and HMAC.
//!
//! Every core is a pure whole-message function `(&[u8]) -> Vec<u8>`
//! described by a [`DigestAlgorithm`] entry carrying its name, block size
//! and output length. The descriptors are the lookup surface used by
//! providers and by [`hmac::hmac`], which selects its inner hash through
//! the signing key's declared algorithm.

#![forbid(unsafe_code)]

pub mod hmac;
pub mod md5;
pub mod sha1;
pub mod sha32;
pub mod sha64;
pub mod word;

pub use hmac::hmac;
pub use word::{add_words, bytes_to_words, words_to_bytes, Endian};

/// Descriptor for one hash core: identity, geometry and the digest function.
#[derive(Clone, Copy)]
pub struct DigestAlgorithm {
    name: &'static str,
    block_bits: usize,
    output_len: usize,
    digest_fn: fn(&[u8]) -> Vec<u8>,
}

impl DigestAlgorithm {
    /// Algorithm name as used at the API boundary (`"md5"`, `"sha256"`, ...).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Compression block size in bits.
    #[must_use]
    pub const fn block_bits(&self) -> usize {
        self.block_bits
    }

    /// Compression block size in bytes.
    #[must_use]
    pub const fn block_len(&self) -> usize {
        self.block_bits / 8
    }

    /// Digest length in bytes.
    #[must_use]
    pub const fn output_len(&self) -> usize {
        self.output_len
    }

    /// Compute this algorithm's digest of `bytes`.
    #[must_use]
    pub fn digest(&self, bytes: &[u8]) -> Vec<u8> {
        (self.digest_fn)(bytes)
    }
}

impl std::fmt::Debug for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestAlgorithm")
            .field("name", &self.name)
            .field("block_bits", &self.block_bits)
            .field("output_len", &self.output_len)
            .finish()
    }
}

/// MD5 descriptor.
pub const MD5: DigestAlgorithm = DigestAlgorithm {
    name: "md5",
    block_bits: md5::BLOCK_BITS,
    output_len: md5::OUTPUT_LEN,
    digest_fn: md5::md5,
};

/// SHA-1 descriptor.
pub const SHA1: DigestAlgorithm = DigestAlgorithm {
    name: "sha1",
    block_bits: sha1::BLOCK_BITS,
    output_len: sha1::OUTPUT_LEN,
    digest_fn: sha1::sha1,
};

/// SHA-224 descriptor.
pub const SHA224: DigestAlgorithm = DigestAlgorithm {
    name: "sha224",
    block_bits: sha32::BLOCK_BITS,
    output_len: sha32::SHA224_OUTPUT_LEN,
    digest_fn: sha32::sha224,
};

/// SHA-256 descriptor.
pub const SHA256: DigestAlgorithm = DigestAlgorithm {
    name: "sha256",
    block_bits: sha32::BLOCK_BITS,
    output_len: sha32::SHA256_OUTPUT_LEN,
    digest_fn: sha32::sha256,
};

/// SHA-384 descriptor.
pub const SHA384: DigestAlgorithm = DigestAlgorithm {
    name: "sha384",
    block_bits: sha64::BLOCK_BITS,
    output_len: sha64::SHA384_OUTPUT_LEN,
    digest_fn: sha64::sha384,
};

/// SHA-512 descriptor.
pub const SHA512: DigestAlgorithm = DigestAlgorithm {
    name: "sha512",
    block_bits: sha64::BLOCK_BITS,
    output_len: sha64::SHA512_OUTPUT_LEN,
    digest_fn: sha64::sha512,
};

/// Every supported hash core, in canonical order.
pub const ALGORITHMS: [&DigestAlgorithm; 6] = [&MD5, &SHA1, &SHA224, &SHA256, &SHA384, &SHA512];

/// Look up a hash core by its API name.
#[must_use]
pub fn by_name(name: &str) -> Option<&'static DigestAlgorithm> {
    ALGORITHMS.iter().copied().find(|alg| alg.name == name)
}
