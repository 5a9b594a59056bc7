//! Streaming transcoder driving bounded reads through the decoder and encoder
//!
//! The pipeline owns three buffers (input bytes, decoded scalars, output
//! bytes) sized once from [`TranscodeOptions::buffer_size`] and reused for
//! every chunk. A chunk is fully written before the next read is issued.

use std::io::{ErrorKind, Read, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::detection::{BOM_LOOKAHEAD, BomDetection, bom_to_encoding};
use crate::{Decoder, Encoder, Encoding, Error, Result, Scalar};

/// Smallest accepted input buffer: a maximal carry (3 bytes) plus one fresh byte
pub const MIN_BUFFER_SIZE: usize = 4;

/// Default input buffer size in bytes
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Tunables for [`StreamingTranscoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeOptions {
    /// Capacity of the input buffer in bytes
    pub buffer_size: usize,
    /// Report a truncated final sequence in [`TranscodeReport`] instead of failing
    pub allow_truncated_tail: bool,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            allow_truncated_tail: false,
        }
    }
}

impl TranscodeOptions {
    /// Set the input buffer capacity in bytes
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Tolerate a stream that ends inside an encoded sequence
    pub fn allow_truncated_tail(mut self, allow: bool) -> Self {
        self.allow_truncated_tail = allow;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.buffer_size < MIN_BUFFER_SIZE {
            return Err(Error::InvalidBufferSize(self.buffer_size));
        }
        Ok(())
    }
}

/// Summary of a completed transcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscodeReport {
    /// Detected source encoding
    pub source: &'static str,
    /// Length of the source BOM (0 if none)
    pub bom_len: usize,
    /// Destination encoding
    pub destination: &'static str,
    /// Bytes read from the source, BOM included
    pub bytes_read: u64,
    /// Bytes written to the destination, BOM included
    pub bytes_written: u64,
    /// Scalar values decoded
    pub scalars: u64,
    /// Chunks pushed through the decoder
    pub chunks: u64,
    /// Trailing bytes dropped because the stream ended mid-sequence
    pub truncated_bytes: u64,
}

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the leading bytes that identify the source encoding
    AwaitingBom,
    /// Reading, converting and writing chunks
    Streaming,
    /// End of input reached; nothing more is read or written
    Drained,
}

/// Streaming converter from any BOM-identified Unicode stream to a fixed
/// destination encoding
#[derive(Debug, Clone)]
pub struct StreamingTranscoder {
    destination: Encoding,
    options: TranscodeOptions,
    state: State,
}

impl StreamingTranscoder {
    /// Create a transcoder with the default 64KB buffer
    pub fn new(destination: Encoding) -> Self {
        Self {
            destination,
            options: TranscodeOptions::default(),
            state: State::AwaitingBom,
        }
    }

    /// Create a transcoder with explicit options
    pub fn with_options(destination: Encoding, options: TranscodeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            destination,
            options,
            state: State::AwaitingBom,
        })
    }

    /// Get destination encoding
    pub fn destination(&self) -> Encoding {
        self.destination
    }

    /// Get the options in effect
    pub fn options(&self) -> &TranscodeOptions {
        &self.options
    }

    /// Current pipeline state.
    ///
    /// After an I/O failure this is the state the pipeline failed in.
    pub fn state(&self) -> State {
        self.state
    }

    /// Transcode everything `reader` yields into `writer`.
    ///
    /// The first four bytes select the source encoding. The destination BOM
    /// is written ahead of the first chunk that carries any input past the
    /// source BOM. Output already written is not rolled back on error.
    pub fn run<R: Read, W: Write>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> Result<TranscodeReport> {
        let capacity = self.options.buffer_size;
        let mut input = vec![0u8; capacity];
        let mut scalars: Vec<Scalar> = Vec::with_capacity(capacity);
        let mut output: Vec<u8> = Vec::with_capacity(capacity * 4 + BOM_LOOKAHEAD);

        self.state = State::AwaitingBom;
        let lookahead = read_full(&mut reader, &mut input[..BOM_LOOKAHEAD])?;
        let detection = bom_to_encoding(&input[..lookahead]);
        debug!(
            source = %detection.encoding,
            bom_len = detection.bom_len,
            destination = %self.destination,
            "detected source encoding"
        );

        // Bytes after the BOM are the start of the first chunk
        input.copy_within(detection.bom_len..lookahead, 0);
        let mut filled = lookahead - detection.bom_len;
        let mut fresh = filled > 0;
        let mut eof = lookahead < BOM_LOOKAHEAD;
        let mut bom_pending = true;

        let decoder = Decoder::new(detection.encoding);
        let encoder = Encoder::new(self.destination);
        let mut report = TranscodeReport {
            source: detection.encoding.name(),
            bom_len: detection.bom_len,
            destination: self.destination.name(),
            bytes_read: lookahead as u64,
            bytes_written: 0,
            scalars: 0,
            chunks: 0,
            truncated_bytes: 0,
        };

        self.state = State::Streaming;
        loop {
            let n = if eof || filled == capacity {
                0
            } else {
                let n = read_some(&mut reader, &mut input[filled..])?;
                eof = n == 0;
                n
            };
            if n == 0 && !fresh {
                break;
            }
            fresh = false;
            filled += n;

            scalars.clear();
            let pending = decoder.decode_into(&input[..filled], &mut scalars);

            output.clear();
            if bom_pending {
                encoder.push_bom(&mut output);
                bom_pending = false;
            }
            encoder.encode_into(&scalars, &mut output);
            writer.write_all(&output)?;

            trace!(
                read = n,
                scalars = scalars.len(),
                written = output.len(),
                carry = pending,
                "chunk transcoded"
            );
            report.bytes_read += n as u64;
            report.bytes_written += output.len() as u64;
            report.scalars += scalars.len() as u64;
            report.chunks += 1;

            input.copy_within(filled - pending..filled, 0);
            filled = pending;
        }

        writer.flush()?;
        self.state = State::Drained;

        if filled > 0 {
            let pending = input[..filled].to_vec();
            if !self.options.allow_truncated_tail {
                return Err(Error::TruncatedInput { pending });
            }
            warn!(
                source = %detection.encoding,
                pending = ?pending,
                "input ended inside an encoded sequence, dropping trailing bytes"
            );
            report.truncated_bytes = filled as u64;
        }

        Ok(report)
    }
}

/// Read the leading bytes of `reader` and detect its encoding.
///
/// Consumes up to four bytes from the reader.
pub fn detect_source<R: Read>(mut reader: R) -> Result<BomDetection> {
    let mut head = [0u8; BOM_LOOKAHEAD];
    let n = read_full(&mut reader, &mut head)?;
    Ok(bom_to_encoding(&head[..n]))
}

/// Read once, retrying interrupted reads.
fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

/// Fill `buf` unless the reader hits end of input first; returns bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match read_some(reader, &mut buf[total..])? {
            0 => break,
            n => total += n,
        }
    }
    Ok(total)
}
