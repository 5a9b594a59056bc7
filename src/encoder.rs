//! Encoding of scalar values into UTF-8, UTF-16 and UTF-32 bytes
//!
//! Scalars are encoded as given. Values outside the Unicode range are not
//! rejected: UTF-32 writes them verbatim, while UTF-8 and UTF-16 keep only the
//! bits their longest form can hold.

use crate::{Encoding, Scalar};

/// Encoder for a single destination encoding
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    encoding: Encoding,
}

impl Encoder {
    /// Create an encoder for the given destination encoding
    pub fn new(encoding: Encoding) -> Self {
        Self { encoding }
    }

    /// Get destination encoding
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Append the destination BOM to `out`, returning its length.
    ///
    /// UTF-8 has no BOM and appends nothing.
    pub fn push_bom(&self, out: &mut Vec<u8>) -> usize {
        let bom = self.encoding.bom().unwrap_or_default();
        out.extend_from_slice(bom);
        bom.len()
    }

    /// Encode `scalars` in order, appending the bytes to `out`.
    ///
    /// Returns the number of bytes appended. At most four bytes are produced
    /// per scalar.
    pub fn encode_into(&self, scalars: &[Scalar], out: &mut Vec<u8>) -> usize {
        let start = out.len();

        for &scalar in scalars {
            match self.encoding {
                Encoding::UTF8 => push_utf8(scalar, out),
                Encoding::UTF16BE => push_utf16(scalar, out, u16::to_be_bytes),
                Encoding::UTF16LE => push_utf16(scalar, out, u16::to_le_bytes),
                Encoding::UTF32BE => out.extend_from_slice(&scalar.to_be_bytes()),
                Encoding::UTF32LE => out.extend_from_slice(&scalar.to_le_bytes()),
            }
        }

        out.len() - start
    }
}

/// Encode `scalars` in one call, without a BOM.
pub fn encode(encoding: Encoding, scalars: &[Scalar]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(scalars.len() * 4);
    Encoder::new(encoding).encode_into(scalars, &mut bytes);
    bytes
}

/// Prefix `bytes` with the BOM of `encoding`.
///
/// Intended for the first chunk of output only. UTF-8 gets no prefix. This
/// allocates; code reusing an output buffer calls [`Encoder::push_bom`].
pub fn emit_leading_bom(encoding: Encoding, bytes: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(4 + bytes.len());
    Encoder::new(encoding).push_bom(&mut output);
    output.extend_from_slice(bytes);
    output
}

fn push_utf8(scalar: Scalar, out: &mut Vec<u8>) {
    let cont = |shift: u32| 0x80 | ((scalar >> shift) & 0x3F) as u8;

    if scalar <= 0x7F {
        out.push(scalar as u8);
    } else if scalar <= 0x7FF {
        out.extend_from_slice(&[0xC0 | (scalar >> 6) as u8, cont(0)]);
    } else if scalar <= 0xFFFF {
        out.extend_from_slice(&[0xE0 | (scalar >> 12) as u8, cont(6), cont(0)]);
    } else {
        out.extend_from_slice(&[
            0xF0 | ((scalar >> 18) & 0x07) as u8,
            cont(12),
            cont(6),
            cont(0),
        ]);
    }
}

fn push_utf16(scalar: Scalar, out: &mut Vec<u8>, unit: fn(u16) -> [u8; 2]) {
    if scalar <= 0xFFFF {
        out.extend_from_slice(&unit(scalar as u16));
    } else {
        let offset = scalar - 0x10000;
        let high = 0xD800 + ((offset >> 10) & 0x3FF) as u16;
        let low = 0xDC00 + (offset & 0x3FF) as u16;
        out.extend_from_slice(&unit(high));
        out.extend_from_slice(&unit(low));
    }
}
