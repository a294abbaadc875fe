//! HMAC keyed-hash construction (RFC 2104), generic over any hash core.

use crate::DigestAlgorithm;

/// Compute the HMAC of `data` under `key` using `algorithm` as the inner
/// and outer hash.
///
/// Keys longer than the algorithm's block size are replaced by their
/// digest; shorter keys are zero-padded to block length before the
/// `0x36`/`0x5c` pads are derived.
#[must_use]
pub fn hmac(algorithm: &DigestAlgorithm, data: &[u8], key: &[u8]) -> Vec<u8> {
    let block_len = algorithm.block_len();
    let key = if key.len() > block_len {
        algorithm.digest(key)
    } else {
        key.to_vec()
    };

    let mut ipad = vec![0x36u8; block_len];
    let mut opad = vec![0x5cu8; block_len];
    for (i, byte) in key.iter().enumerate() {
        ipad[i] ^= byte;
        opad[i] ^= byte;
    }

    let mut inner = ipad;
    inner.extend_from_slice(data);
    let inner_digest = algorithm.digest(&inner);

    let mut outer = opad;
    outer.extend_from_slice(&inner_digest);
    algorithm.digest(&outer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MD5, SHA256};

    #[test]
    fn long_key_is_hashed_first() {
        // A key one byte over the block size must behave like its digest.
        let long_key = vec![0xaau8; SHA256.block_len() + 1];
        let hashed_key = SHA256.digest(&long_key);
        assert_eq!(
            hmac(&SHA256, b"data", &long_key),
            hmac(&SHA256, b"data", &hashed_key)
        );
    }

    #[test]
    fn block_length_key_is_used_verbatim() {
        let key = vec![0x0bu8; MD5.block_len()];
        let hashed = MD5.digest(&key);
        assert_ne!(hmac(&MD5, b"data", &key), hmac(&MD5, b"data", &hashed));
    }
}
