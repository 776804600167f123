use std::io::{self, Read};


/// Size of the read-ahead window. Also the largest amount that can be peeked at once.
pub const BUFFER_SIZE: usize = 4096;


/// A read-ahead window over a byte source.
///
/// Bytes are pulled from the source in large chunks and handed out in small pieces;
/// `position` always refers to the first byte that has not been consumed yet.
pub struct ReadBuffer<R> {
    source: R,
    buf: Box<[u8]>,
    start: usize,
    end: usize,
    position: u64,
    eof: bool,
}
impl<R: Read> ReadBuffer<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            buf: vec![0u8; BUFFER_SIZE].into_boxed_slice(),
            start: 0,
            end: 0,
            position: 0,
            eof: false,
        }
    }

    /// Absolute offset of the next unconsumed byte.
    pub fn position(&self) -> u64 { self.position }

    /// Number of bytes buffered but not yet consumed.
    pub fn available(&self) -> usize { self.end - self.start }

    /// True once the source is exhausted and every buffered byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.eof && self.available() == 0
    }

    /// Tries to have at least `needed` bytes buffered; returns how many are.
    ///
    /// Fewer than `needed` are only returned at the end of the source.
    pub fn fill(&mut self, needed: usize) -> Result<usize, io::Error> {
        debug_assert!(needed <= BUFFER_SIZE);
        if self.available() >= needed || self.eof {
            return Ok(self.available());
        }

        // shift the leftovers to the front
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }

        while self.end < needed && !self.eof {
            match self.source.read(&mut self.buf[self.end..]) {
                Ok(0) => self.eof = true,
                Ok(n) => self.end += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(self.available())
    }

    /// The buffered bytes, without consuming them.
    pub fn peek(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }

    /// Consumes up to `count` buffered bytes and returns them.
    pub fn consume(&mut self, count: usize) -> &[u8] {
        let count = count.min(self.available());
        let begin = self.start;
        self.start += count;
        self.position += count as u64;
        &self.buf[begin..begin + count]
    }

    pub fn into_inner(self) -> R { self.source }
}
