use std::io::{self, Read};

use encoding_rs::{CoderResult, Decoder, Encoding};

use crate::tnef::{TnefError, TnefReader};


const CHUNK_SIZE: usize = 4096;


/// Reads the bytes of one property value straight from the TNEF stream.
///
/// Everything read passes through the attribute checksum.
pub struct RawValueReader<'a, R> {
    reader: &'a mut TnefReader<R>,
    remaining: u64,
}
impl<'a, R: Read> RawValueReader<'a, R> {
    pub(crate) fn new(reader: &'a mut TnefReader<R>, length: u64) -> Self {
        Self { reader, remaining: length }
    }

    /// How many bytes of the value have not been read yet.
    pub fn remaining(&self) -> u64 { self.remaining }
}
impl<'a, R: Read> Read for RawValueReader<'a, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let wanted = self.remaining.min(buf.len() as u64) as usize;
        let count = self.reader.read_some(&mut buf[..wanted])?;
        if count == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("TNEF stream ends with {} bytes of the value unread", self.remaining),
            ));
        }
        self.remaining -= count as u64;
        Ok(count)
    }
}


/// Incrementally decodes a text property value.
pub struct TextValueReader<'a, R> {
    raw: RawValueReader<'a, R>,
    decoder: Decoder,
    buf: Box<[u8]>,
    finished: bool,
}
impl<'a, R: Read> TextValueReader<'a, R> {
    pub(crate) fn new(raw: RawValueReader<'a, R>, encoding: &'static Encoding) -> Self {
        Self {
            raw,
            decoder: encoding.new_decoder_without_bom_handling(),
            buf: vec![0u8; CHUNK_SIZE].into_boxed_slice(),
            finished: false,
        }
    }

    /// Decodes the next piece of the value, appending it to `out`.
    ///
    /// Returns false once the value is exhausted and the decoder has been flushed.
    pub fn read_chunk(&mut self, out: &mut String) -> Result<bool, TnefError> {
        if self.finished {
            return Ok(false);
        }

        let result = self.raw.read(&mut self.buf).map_err(TnefError::from);
        let count = self.raw.reader.recover_truncation(result, "text value")?.unwrap_or(0);
        let last = count == 0;

        let mut input = &self.buf[..count];
        loop {
            let needed = self.decoder.max_utf8_buffer_length(input.len())
                .unwrap_or(input.len() * 3 + 4);
            out.reserve(needed);
            let (result, read, _had_replacements) = self.decoder.decode_to_string(input, out, last);
            input = &input[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }

        if last {
            self.finished = true;
        }
        Ok(!last)
    }

    /// Decodes the rest of the value. Trailing NUL characters are dropped.
    pub fn read_to_string(mut self) -> Result<String, TnefError> {
        let mut text = String::new();
        while self.read_chunk(&mut text)? {}
        let trimmed_len = text.trim_end_matches('\0').len();
        text.truncate(trimmed_len);
        Ok(text)
    }
}
