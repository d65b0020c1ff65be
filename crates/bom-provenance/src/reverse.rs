//! Backward line reader

use std::io::{self, Read, Seek, SeekFrom};

const BLOCK_SIZE: u64 = 8 * 1024;

/// Yields the lines of a seekable reader from last to first
///
/// Lines are returned without their terminating `\n`. A trailing newline at
/// the end of the input produces one empty line first; callers that care
/// about blank lines filter them.
pub struct ReverseLines<R> {
    reader: R,
    pos: u64,
    buf: Vec<u8>,
    block_size: u64,
    done: bool,
}

impl<R: Read + Seek> ReverseLines<R> {
    /// Start reading from the end of `reader`
    pub fn new(reader: R) -> io::Result<Self> {
        Self::with_block_size(reader, BLOCK_SIZE)
    }

    /// Start reading from the end of `reader` with a custom block size
    pub fn with_block_size(mut reader: R, block_size: u64) -> io::Result<Self> {
        let pos = reader.seek(SeekFrom::End(0))?;
        Ok(Self {
            reader,
            pos,
            buf: Vec::new(),
            block_size: block_size.max(1),
            done: false,
        })
    }

    /// Prepend the previous block to the buffer; `false` at start of input
    fn fill(&mut self) -> io::Result<bool> {
        if self.pos == 0 {
            return Ok(false);
        }
        let n = self.block_size.min(self.pos);
        self.pos -= n;
        self.reader.seek(SeekFrom::Start(self.pos))?;

        let mut block = vec![0u8; n as usize];
        self.reader.read_exact(&mut block)?;
        block.extend_from_slice(&self.buf);
        self.buf = block;
        Ok(true)
    }
}

impl<R: Read + Seek> Iterator for ReverseLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            // Bytes after the last newline in the buffer form a complete line.
            if let Some(idx) = self.buf.iter().rposition(|&b| b == b'\n') {
                let line = self.buf.split_off(idx + 1);
                self.buf.truncate(idx);
                return Some(Ok(line));
            }
            match self.fill() {
                Ok(true) => continue,
                Ok(false) => {
                    self.done = true;
                    return Some(Ok(std::mem::take(&mut self.buf)));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
