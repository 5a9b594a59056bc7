//! Shared readers, writers and generators for the integration tests.

#![allow(dead_code)]

use std::io::{self, ErrorKind, Read, Write};

use quickcheck::{Arbitrary, Gen};
use utf_recode::{Encoding, Scalar};

/// Reader that hands out its data in the given chunk sizes, cycling through
/// them. A size of zero is read as one so the reader always makes progress.
pub struct ChunkedReader<'a> {
    data: &'a [u8],
    sizes: Vec<usize>,
    calls: usize,
}

impl<'a> ChunkedReader<'a> {
    pub fn new(data: &'a [u8], sizes: &[usize]) -> Self {
        let sizes = if sizes.is_empty() { vec![1] } else { sizes.to_vec() };
        Self {
            data,
            sizes,
            calls: 0,
        }
    }

    pub fn one_byte(data: &'a [u8]) -> Self {
        Self::new(data, &[1])
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let size = self.sizes[self.calls % self.sizes.len()].max(1);
        self.calls += 1;
        let n = size.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Reader that fails with `Interrupted` before every successful read.
pub struct InterruptingReader<R> {
    inner: R,
    interrupt: bool,
}

impl<R> InterruptingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            interrupt: true,
        }
    }
}

impl<R: Read> Read for InterruptingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if !self.interrupt {
            return Err(io::Error::from(ErrorKind::Interrupted));
        }
        self.inner.read(buf)
    }
}

/// Writer accepting at most `max` bytes per call, interrupting every other call.
#[derive(Default)]
pub struct ShortWriter {
    pub data: Vec<u8>,
    pub max: usize,
    pub calls: usize,
}

impl ShortWriter {
    pub fn new(max: usize) -> Self {
        Self {
            data: Vec::new(),
            max,
            calls: 0,
        }
    }
}

impl Write for ShortWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.calls += 1;
        if self.calls % 2 == 0 {
            return Err(io::Error::from(ErrorKind::Interrupted));
        }
        let n = buf.len().min(self.max);
        self.data.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer whose every call fails
pub struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reader that yields some bytes and then fails
pub struct FailingReader {
    pub prefix: Vec<u8>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.prefix.is_empty() {
            return Err(io::Error::other("device gone"));
        }
        let n = buf.len().min(self.prefix.len());
        buf[..n].copy_from_slice(&self.prefix[..n]);
        self.prefix.drain(..n);
        Ok(n)
    }
}

/// Encode text with the standard library, BOM first, for cross-checking.
pub fn reference_bytes(encoding: Encoding, text: &str) -> Vec<u8> {
    let mut bytes = encoding.bom().unwrap_or_default().to_vec();
    match encoding {
        Encoding::UTF8 => bytes.extend_from_slice(text.as_bytes()),
        Encoding::UTF16BE => text
            .encode_utf16()
            .for_each(|u| bytes.extend_from_slice(&u.to_be_bytes())),
        Encoding::UTF16LE => text
            .encode_utf16()
            .for_each(|u| bytes.extend_from_slice(&u.to_le_bytes())),
        Encoding::UTF32BE => text
            .chars()
            .for_each(|c| bytes.extend_from_slice(&u32::from(c).to_be_bytes())),
        Encoding::UTF32LE => text
            .chars()
            .for_each(|c| bytes.extend_from_slice(&u32::from(c).to_le_bytes())),
    }
    bytes
}

#[derive(Debug, Clone, Copy)]
pub struct ArbEncoding(pub Encoding);

impl Arbitrary for ArbEncoding {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(*g.choose(&Encoding::ALL).unwrap_or(&Encoding::UTF8))
    }
}

/// Unicode scalar values of every UTF-8 width, surrogates excluded.
///
/// U+0000 never leads the sequence: a UTF-16LE BOM followed by NUL reads as
/// a UTF-32LE BOM. NUL anywhere else is kept.
#[derive(Debug, Clone)]
pub struct Scalars(pub Vec<Scalar>);

impl Scalars {
    fn sanitize(scalars: Vec<Scalar>) -> Self {
        Self(
            scalars
                .into_iter()
                .enumerate()
                .map(|(i, s)| match s {
                    0 if i == 0 => 1,
                    0xD800..=0xDFFF => s + 0x800,
                    _ => s,
                })
                .collect(),
        )
    }
}

impl Arbitrary for Scalars {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 64;
        let scalars = (0..len)
            .map(|_| {
                let raw = u32::arbitrary(g);
                match raw % 4 {
                    0 => raw % 0x80,
                    1 => raw % 0x800,
                    2 => raw % 0x10000,
                    _ => 0x10000 + raw % 0x100000,
                }
            })
            .collect();
        Self::sanitize(scalars)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self::sanitize))
    }
}
