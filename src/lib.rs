//! # utf-recode - Streaming Unicode Transcoder
//!
//! Converts a byte stream between the five Unicode encoding forms
//! (UTF-8, UTF-16BE/LE, UTF-32BE/LE). The source encoding is detected from a
//! leading byte order mark; the destination encoding is chosen by the caller
//! and its BOM is written once at the start of the output.
//!
//! ## Features
//!
//! - **BOM sniffing** with the UTF-32LE / UTF-16LE tie-break handled
//! - **Incremental decoding** that carries incomplete sequences across reads
//! - **Full encoders** for every form, including surrogate pairs and 4-byte UTF-8
//! - **Bounded memory**: three fixed-capacity buffers reused for every chunk
//!
//! ## Quick Start
//!
//! ```rust
//! use utf_recode::{Encoding, StreamingTranscoder};
//!
//! let input: &[u8] = b"Hi";
//! let mut output = Vec::new();
//!
//! let report = StreamingTranscoder::new(Encoding::UTF16BE)
//!     .run(input, &mut output)
//!     .unwrap();
//!
//! assert_eq!(output, [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]);
//! assert_eq!(report.source, "UTF-8");
//! ```

#![deny(missing_docs)]

use std::fmt;
use std::str::FromStr;

pub mod decoder;
pub mod detection;
pub mod encoder;
pub mod stream;

pub use decoder::{Decoder, decode};
pub use detection::{BomDetection, bom_to_encoding};
pub use encoder::{Encoder, emit_leading_bom, encode};
pub use stream::{State, StreamingTranscoder, TranscodeOptions, TranscodeReport, detect_source};

/// A Unicode scalar value as it flows from the decoder to the encoder.
///
/// Values are not checked against the legal Unicode range or the surrogate
/// block; whatever the decoder assembles is handed to the encoder as is.
pub type Scalar = u32;

/// Result type for transcoding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while transcoding
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Destination encoding name is not one of the five canonical names
    #[error("invalid destination encoding: {0}")]
    InvalidDestinationEncoding(String),

    /// Reading the source or writing the destination failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended in the middle of an encoded sequence
    #[error("truncated input: {} undecoded byte(s) at end of stream", .pending.len())]
    TruncatedInput {
        /// The bytes left over after the last complete unit
        pending: Vec<u8>,
    },

    /// Buffer capacity cannot hold a full carry plus fresh input
    #[error("buffer size {0} is too small (minimum {min})", min = stream::MIN_BUFFER_SIZE)]
    InvalidBufferSize(usize),
}

/// Supported Unicode encoding forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// UTF-8 (variable length, 1-4 bytes)
    UTF8,
    /// UTF-16 big endian
    UTF16BE,
    /// UTF-16 little endian
    UTF16LE,
    /// UTF-32 big endian
    UTF32BE,
    /// UTF-32 little endian
    UTF32LE,
}

impl Encoding {
    /// Every supported encoding, in canonical order.
    pub const ALL: [Encoding; 5] = [
        Encoding::UTF8,
        Encoding::UTF16BE,
        Encoding::UTF16LE,
        Encoding::UTF32BE,
        Encoding::UTF32LE,
    ];

    /// Get the canonical name of this encoding
    pub fn name(self) -> &'static str {
        match self {
            Encoding::UTF8 => "UTF-8",
            Encoding::UTF16BE => "UTF-16BE",
            Encoding::UTF16LE => "UTF-16LE",
            Encoding::UTF32BE => "UTF-32BE",
            Encoding::UTF32LE => "UTF-32LE",
        }
    }

    /// Look up an encoding by its canonical name.
    ///
    /// Matching is exact and case-sensitive: `"utf-8"` is rejected.
    pub fn from_name(name: &str) -> Result<Self> {
        Encoding::ALL
            .into_iter()
            .find(|encoding| encoding.name() == name)
            .ok_or_else(|| Error::InvalidDestinationEncoding(name.to_string()))
    }

    /// Get the byte order mark written ahead of output in this encoding.
    ///
    /// UTF-8 output carries no BOM.
    pub fn bom(self) -> Option<&'static [u8]> {
        match self {
            Encoding::UTF8 => None,
            Encoding::UTF16BE => Some(&[0xFE, 0xFF]),
            Encoding::UTF16LE => Some(&[0xFF, 0xFE]),
            Encoding::UTF32BE => Some(&[0x00, 0x00, 0xFE, 0xFF]),
            Encoding::UTF32LE => Some(&[0xFF, 0xFE, 0x00, 0x00]),
        }
    }

    /// Size in bytes of the smallest unit this encoding decodes
    pub fn min_unit_size(self) -> usize {
        match self {
            Encoding::UTF8 => 1,
            Encoding::UTF16BE | Encoding::UTF16LE => 2,
            Encoding::UTF32BE | Encoding::UTF32LE => 4,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Encoding::from_name(s)
    }
}
