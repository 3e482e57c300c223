//! Lazy, encoding-aware line reader for listings.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use encoding_rs::{CoderResult, Decoder, UTF_8, UTF_16LE, WINDOWS_1252};
use tracing::warn;

use spool_model::Encoding;

const CHUNK_SIZE: usize = 64 * 1024;

/// Yields the lines of a listing without their terminators.
///
/// Bytes are decoded chunk by chunk, so memory use does not grow with the
/// listing. Malformed sequences are replaced with U+FFFD.
pub struct ListingReader<R = File> {
    reader: Option<R>,
    encoding: Encoding,
    decoder: Decoder,
    buffer: Vec<u8>,
    pending: String,
    cursor: usize,
    finished: bool,
    replaced: bool,
}

impl ListingReader<File> {
    /// Opens `path` for reading with `encoding`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, encoding: Encoding) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?, encoding))
    }
}

impl<R: Read> ListingReader<R> {
    pub fn new(reader: R, encoding: Encoding) -> Self {
        Self {
            reader: Some(reader),
            encoding,
            decoder: decoder(encoding),
            buffer: vec![0; CHUNK_SIZE],
            pending: String::new(),
            cursor: 0,
            finished: false,
            replaced: false,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn fill(&mut self) -> io::Result<()> {
        let Some(reader) = self.reader.as_mut() else {
            self.finished = true;
            return Ok(());
        };
        let read = loop {
            match reader.read(&mut self.buffer) {
                Ok(read) => break read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        };
        let last = read == 0;

        self.pending.drain(..self.cursor);
        self.cursor = 0;

        let mut input = &self.buffer[..read];
        let needed = self
            .decoder
            .max_utf8_buffer_length(input.len())
            .unwrap_or(input.len() * 3);
        self.pending.reserve(needed);
        loop {
            let (result, consumed, replaced) =
                self.decoder
                    .decode_to_string(input, &mut self.pending, last);
            self.replaced |= replaced;
            input = &input[consumed..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => self.pending.reserve(input.len() * 3 + 4),
            }
        }

        if last {
            self.finished = true;
            self.reader = None;
            if self.replaced {
                warn!(
                    encoding = %self.encoding,
                    "listing contains malformed byte sequences, replaced with U+FFFD"
                );
            }
        }
        Ok(())
    }
}

impl<R: Read> Iterator for ListingReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(offset) = self.pending[self.cursor..].find('\n') {
                let end = self.cursor + offset;
                let line = strip_cr(&self.pending[self.cursor..end]).to_string();
                self.cursor = end + 1;
                return Some(Ok(line));
            }
            if self.finished {
                if self.cursor >= self.pending.len() {
                    return None;
                }
                let line = strip_cr(&self.pending[self.cursor..]).to_string();
                self.cursor = self.pending.len();
                return Some(Ok(line));
            }
            if let Err(err) = self.fill() {
                self.finished = true;
                self.reader = None;
                self.pending.clear();
                self.cursor = 0;
                return Some(Err(err));
            }
        }
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn decoder(encoding: Encoding) -> Decoder {
    match encoding {
        Encoding::Utf8 => UTF_8.new_decoder_with_bom_removal(),
        // ascii is a subset; windows-1252 maps every byte.
        Encoding::Ascii | Encoding::Latin1 => WINDOWS_1252.new_decoder_without_bom_handling(),
        Encoding::Utf16 => UTF_16LE.new_decoder(),
        Encoding::Utf16Le => UTF_16LE.new_decoder_without_bom_handling(),
    }
}
