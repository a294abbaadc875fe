//! SHA-1 message digest (FIPS 180-4).
//!
//! Big-endian word packing, 80 rounds with a round-dependent mixing
//! function and constant, 64-bit big-endian bit-length trailer.

use crate::word::{add_words, bytes_to_words, words_to_bytes, Endian};

/// Block size in bits.
pub const BLOCK_BITS: usize = 512;

/// Digest length in bytes.
pub const OUTPUT_LEN: usize = 20;

#[inline]
fn mix(round: usize, b: u32, c: u32, d: u32) -> u32 {
    match round {
        0..=19 => (b & c) | (!b & d),
        20..=39 | 60..=79 => b ^ c ^ d,
        _ => (b & c) | (b & d) | (c & d),
    }
}

#[inline]
fn round_constant(round: usize) -> u32 {
    match round {
        0..=19 => 0x5a82_7999,
        20..=39 => 0x6ed9_eba1,
        40..=59 => 0x8f1b_bcdc,
        _ => 0xca62_c1d6,
    }
}

/// Compute the SHA-1 digest of `bytes`.
#[must_use]
pub fn sha1(bytes: &[u8]) -> Vec<u8> {
    let num_bits = (bytes.len() as u64) * 8;
    let mut words = bytes_to_words(bytes, Endian::Big);

    let total_words = (((num_bits + 64) >> 9) as usize) * 16 + 16;
    words.resize(total_words, 0);
    words[(num_bits >> 5) as usize] |= 0x80u32 << (24 - num_bits % 32);
    words[total_words - 2] = (num_bits >> 32) as u32;
    words[total_words - 1] = num_bits as u32;

    let mut state = [
        0x6745_2301u32,
        0xefcd_ab89,
        0x98ba_dcfe,
        0x1032_5476,
        0xc3d2_e1f0,
    ];

    let mut schedule = [0u32; 80];
    for block in words.chunks_exact(16) {
        let [mut a, mut b, mut c, mut d, mut e] = state;

        for t in 0..80 {
            schedule[t] = if t < 16 {
                block[t]
            } else {
                (schedule[t - 3] ^ schedule[t - 8] ^ schedule[t - 14] ^ schedule[t - 16])
                    .rotate_left(1)
            };
            let temp = add_words(&[
                a.rotate_left(5),
                mix(t, b, c, d),
                e,
                schedule[t],
                round_constant(t),
            ]);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = temp;
        }

        state[0] = add_words(&[state[0], a]);
        state[1] = add_words(&[state[1], b]);
        state[2] = add_words(&[state[2], c]);
        state[3] = add_words(&[state[3], d]);
        state[4] = add_words(&[state[4], e]);
    }

    words_to_bytes(&state, Endian::Big)
}
