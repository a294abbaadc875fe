//! Byte/word conversion with explicit endianness, plus modular word addition.
//!
//! The hash cores are defined over 32-bit words; this module is the single
//! place where byte order is decided. MD5 packs little-endian, the SHA
//! family packs big-endian, and both directions must agree on the endian
//! value to round-trip.

/// Byte order of a 32-bit word: which byte occupies the high-order position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Low-order bytes at lower indices.
    Little,
    /// High-order bytes at lower indices.
    Big,
}

/// Convert a byte sequence to 32-bit words.
///
/// A trailing partial word is zero-extended: unused high bytes of the final
/// word are zero.
#[must_use]
pub fn bytes_to_words(bytes: &[u8], endian: Endian) -> Vec<u32> {
    bytes
        .chunks(4)
        .map(|chunk| {
            let mut quad = [0u8; 4];
            quad[..chunk.len()].copy_from_slice(chunk);
            match endian {
                Endian::Little => u32::from_le_bytes(quad),
                Endian::Big => u32::from_be_bytes(quad),
            }
        })
        .collect()
}

/// Convert 32-bit words back to bytes, four per word.
///
/// Exact inverse of [`bytes_to_words`] for whole-word input when the same
/// endian value is used on both sides.
#[must_use]
pub fn words_to_bytes(words: &[u32], endian: Endian) -> Vec<u8> {
    words
        .iter()
        .flat_map(|word| match endian {
            Endian::Little => word.to_le_bytes(),
            Endian::Big => word.to_be_bytes(),
        })
        .collect()
}

/// Sum any number of words modulo 2^32.
#[must_use]
pub fn add_words(words: &[u32]) -> u32 {
    words.iter().fold(0u32, |sum, word| sum.wrapping_add(*word))
}
