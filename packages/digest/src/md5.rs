//! MD5 message digest (RFC 1321).
//!
//! Little-endian word packing, 64 rounds over four state words, 64-bit
//! little-endian bit-length trailer.

use crate::word::{add_words, bytes_to_words, words_to_bytes, Endian};

/// Block size in bits.
pub const BLOCK_BITS: usize = 512;

/// Digest length in bytes.
pub const OUTPUT_LEN: usize = 16;

/// Additive constants, in application order.
const K: [u32; 64] = [
    0xd76a_a478, 0xe8c7_b756, 0x2420_70db, 0xc1bd_ceee, 0xf57c_0faf, 0x4787_c62a,
    0xa830_4613, 0xfd46_9501, 0x6980_98d8, 0x8b44_f7af, 0xffff_5bb1, 0x895c_d7be,
    0x6b90_1122, 0xfd98_7193, 0xa679_438e, 0x49b4_0821, 0xf61e_2562, 0xc040_b340,
    0x265e_5a51, 0xe9b6_c7aa, 0xd62f_105d, 0x0244_1453, 0xd8a1_e681, 0xe7d3_fbc8,
    0x21e1_cde6, 0xc337_07d6, 0xf4d5_0d87, 0x455a_14ed, 0xa9e3_e905, 0xfcef_a3f8,
    0x676f_02d9, 0x8d2a_4c8a, 0xfffa_3942, 0x8771_f681, 0x6d9d_6122, 0xfde5_380c,
    0xa4be_ea44, 0x4bde_cfa9, 0xf6bb_4b60, 0xbebf_bc70, 0x289b_7ec6, 0xeaa1_27fa,
    0xd4ef_3085, 0x0488_1d05, 0xd9d4_d039, 0xe6db_99e5, 0x1fa2_7cf8, 0xc4ac_5665,
    0xf429_2244, 0x432a_ff97, 0xab94_23a7, 0xfc93_a039, 0x655b_59c3, 0x8f0c_cc92,
    0xffef_f47d, 0x8584_5dd1, 0x6fa8_7e4f, 0xfe2c_e6e0, 0xa301_4314, 0x4e08_11a1,
    0xf753_7e82, 0xbd3a_f235, 0x2ad7_d2bb, 0xeb86_d391,
];

/// Per-round left-rotation amounts.
const S: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, //
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, //
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, //
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// Compute the MD5 digest of `bytes`.
#[must_use]
pub fn md5(bytes: &[u8]) -> Vec<u8> {
    let num_bits = (bytes.len() as u64) * 8;
    let mut words = bytes_to_words(bytes, Endian::Little);

    // Pad: a single 1 bit, zeros, then the bit length as a little-endian
    // 64-bit trailer filling the final 512-bit block.
    let total_words = (((num_bits + 64) >> 9) as usize) * 16 + 16;
    words.resize(total_words, 0);
    words[(num_bits >> 5) as usize] |= 0x80u32 << (num_bits % 32);
    words[total_words - 2] = num_bits as u32;
    words[total_words - 1] = (num_bits >> 32) as u32;

    let mut state = [0x6745_2301u32, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

    for block in words.chunks_exact(16) {
        let [mut a, mut b, mut c, mut d] = state;

        for i in 0..64 {
            let (f, g) = match i {
                0..=15 => ((b & c) | (!b & d), i),
                16..=31 => ((b & d) | (c & !d), (5 * i + 1) % 16),
                32..=47 => (b ^ c ^ d, (3 * i + 5) % 16),
                _ => (c ^ (b | !d), (7 * i) % 16),
            };
            let rotated = add_words(&[a, f, K[i], block[g]]).rotate_left(S[i]);
            a = d;
            d = c;
            c = b;
            b = add_words(&[b, rotated]);
        }

        state[0] = add_words(&[state[0], a]);
        state[1] = add_words(&[state[1], b]);
        state[2] = add_words(&[state[2], c]);
        state[3] = add_words(&[state[3], d]);
    }

    words_to_bytes(&state, Endian::Little)
}
