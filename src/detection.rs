//! Source encoding detection from a leading byte order mark
//!
//! Only the first four bytes of a stream are inspected. Streams without a
//! recognised UTF-16 or UTF-32 BOM are treated as UTF-8.

use crate::Encoding;

/// Number of bytes examined when sniffing a BOM
pub const BOM_LOOKAHEAD: usize = 4;

/// Result of BOM detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BomDetection {
    /// Encoding the stream is assumed to be in
    pub encoding: Encoding,
    /// Number of leading bytes taken up by the BOM (0 when none was found)
    pub bom_len: usize,
}

impl BomDetection {
    /// Whether a byte order mark was present
    pub fn bom_detected(&self) -> bool {
        self.bom_len > 0
    }
}

/// Detect the source encoding from up to four leading bytes.
///
/// Patterns are checked in a fixed order. `FF FE 00 00` is tried before
/// `FF FE` so that a UTF-32LE BOM is never mistaken for UTF-16LE. Fewer than
/// four bytes may be passed at the end of a short stream; a pattern only
/// matches when all of its bytes are present.
pub fn bom_to_encoding(first4: &[u8]) -> BomDetection {
    let head = &first4[..first4.len().min(BOM_LOOKAHEAD)];

    let (encoding, bom_len) = if head.starts_with(&[0xFE, 0xFF]) {
        (Encoding::UTF16BE, 2)
    } else if head.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
        (Encoding::UTF32BE, 4)
    } else if head.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
        (Encoding::UTF32LE, 4)
    } else if head.starts_with(&[0xFF, 0xFE]) {
        (Encoding::UTF16LE, 2)
    } else {
        (Encoding::UTF8, 0)
    };

    BomDetection { encoding, bom_len }
}
