//! Text codecs and the chunk type accepted by handles and sinks.
//!
//! Callers may supply either raw bytes or text; text is converted with a
//! named codec at the point it enters a hash or sign operation, and a
//! malformed text chunk is the one way a software sink can fail.

use crate::{CryptoError, Result};

/// A named scheme converting text into a byte sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextCodec {
    /// Strict 7-bit ASCII.
    Ascii,
    /// UTF-8 (the default).
    #[default]
    Utf8,
    /// Standard base64; the text is the encoded form of the bytes.
    Base64,
    /// Lowercase or uppercase hex; the text is the encoded form of the bytes.
    Hex,
}

impl TextCodec {
    /// Codec name as used at the API boundary.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Utf8 => "utf8",
            Self::Base64 => "base64",
            Self::Hex => "hex",
        }
    }

    /// Look up a codec by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "ascii" => Some(Self::Ascii),
            "utf8" => Some(Self::Utf8),
            "base64" => Some(Self::Base64),
            "hex" => Some(Self::Hex),
            _ => None,
        }
    }

    /// Convert `text` to bytes under this codec.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encoding`] for non-ASCII input to the ascii
    /// codec and for malformed base64 or hex text.
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Ascii => {
                if text.is_ascii() {
                    Ok(text.as_bytes().to_vec())
                } else {
                    Err(CryptoError::Encoding(
                        "non-ASCII character in ascii text".to_string(),
                    ))
                }
            }
            Self::Base64 => {
                use base64::{engine::general_purpose, Engine as _};
                general_purpose::STANDARD
                    .decode(text)
                    .map_err(|err| CryptoError::Encoding(format!("malformed base64 text: {err}")))
            }
            Self::Hex => hex::decode(text)
                .map_err(|err| CryptoError::Encoding(format!("malformed hex text: {err}"))),
        }
    }
}

/// One unit of input: raw bytes, or text to be run through a codec.
#[derive(Debug, Clone)]
pub enum Chunk {
    /// Raw bytes, passed through unchanged.
    Bytes(Vec<u8>),
    /// Text, converted with the operation's codec.
    Text(String),
}

impl Chunk {
    /// Convert this chunk to bytes, applying `codec` to text.
    ///
    /// # Errors
    ///
    /// Propagates the codec's encoding failure.
    pub fn into_bytes(self, codec: TextCodec) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Text(text) => codec.encode(&text),
        }
    }
}

impl From<Vec<u8>> for Chunk {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Chunk {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Chunk {
    fn from(bytes: &[u8; N]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<String> for Chunk {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Chunk {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}
