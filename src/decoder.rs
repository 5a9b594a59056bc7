//! Decoding of UTF-8, UTF-16 and UTF-32 byte streams into scalar values
//!
//! The decoder works on whatever bytes it is given and stops at the first unit
//! that is not fully present. The length of that unconsumed tail is returned so
//! the caller can prepend it to the next chunk.

use crate::{Encoding, Scalar};

/// Incremental decoder for a single source encoding
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    encoding: Encoding,
}

impl Decoder {
    /// Create a decoder for the given source encoding
    pub fn new(encoding: Encoding) -> Self {
        Self { encoding }
    }

    /// Get source encoding
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Decode every complete unit of `input`, appending the scalars to `out`.
    ///
    /// Returns the number of trailing bytes that did not form a complete unit.
    /// Those bytes are always a suffix of `input`.
    pub fn decode_into(&self, input: &[u8], out: &mut Vec<Scalar>) -> usize {
        let mut pos = 0;

        while let Some((scalar, len)) = self.decode_unit(&input[pos..]) {
            out.push(scalar);
            pos += len;
        }

        input.len() - pos
    }

    /// Decode the unit at the start of `bytes`, or `None` if it is incomplete.
    fn decode_unit(&self, bytes: &[u8]) -> Option<(Scalar, usize)> {
        match self.encoding {
            Encoding::UTF8 => decode_utf8(bytes),
            Encoding::UTF16BE => decode_utf16(bytes, u16::from_be_bytes),
            Encoding::UTF16LE => decode_utf16(bytes, u16::from_le_bytes),
            Encoding::UTF32BE => decode_utf32(bytes, u32::from_be_bytes),
            Encoding::UTF32LE => decode_utf32(bytes, u32::from_le_bytes),
        }
    }
}

/// Decode `input` in one call.
///
/// Returns the decoded scalars and the number of unconsumed trailing bytes.
pub fn decode(encoding: Encoding, input: &[u8]) -> (Vec<Scalar>, usize) {
    let mut scalars = Vec::with_capacity(input.len());
    let pending = Decoder::new(encoding).decode_into(input, &mut scalars);
    (scalars, pending)
}

/// Sequence length announced by a UTF-8 lead byte.
///
/// Stray continuation bytes are classified by the same bit tests and consumed
/// as if they were lead bytes.
#[inline]
fn utf8_sequence_len(lead: u8) -> usize {
    if lead & 0x80 == 0 {
        1
    } else if lead & 0x20 == 0 {
        2
    } else if lead & 0x10 == 0 {
        3
    } else {
        4
    }
}

fn decode_utf8(bytes: &[u8]) -> Option<(Scalar, usize)> {
    let &lead = bytes.first()?;
    let len = utf8_sequence_len(lead);
    if bytes.len() < len {
        return None;
    }

    let payload = match len {
        1 => lead,
        2 => lead & 0x1F,
        3 => lead & 0x0F,
        _ => lead & 0x07,
    };

    let scalar = bytes[1..len]
        .iter()
        .fold(Scalar::from(payload), |cp, &b| (cp << 6) | Scalar::from(b & 0x3F));

    Some((scalar, len))
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<(Scalar, usize)> {
    let &[b0, b1, ref rest @ ..] = bytes else {
        return None;
    };
    let high = Scalar::from(unit([b0, b1]));

    if (0xD800..=0xDBFF).contains(&high) {
        // Need the following unit before deciding whether this is a pair
        let &[b2, b3, ..] = rest else {
            return None;
        };
        let low = Scalar::from(unit([b2, b3]));
        if (0xDC00..=0xDFFF).contains(&low) {
            let scalar = (((high - 0xD800) << 10) | (low - 0xDC00)) + 0x10000;
            return Some((scalar, 4));
        }
    }

    Some((high, 2))
}

fn decode_utf32(bytes: &[u8], unit: fn([u8; 4]) -> u32) -> Option<(Scalar, usize)> {
    let &[b0, b1, b2, b3, ..] = bytes else {
        return None;
    };
    Some((unit([b0, b1, b2, b3]), 4))
}
