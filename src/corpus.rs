//! Newline-delimited token corpus held in memory.
use std::fs;
use std::path::Path;

use crate::error::{BenchError, Result};

/// A token as an `(offset, len)` view into the corpus buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSpan {
    pub offset: usize,
    pub len: usize,
}

/// Immutable text blob plus the token statistics fixed by its initial scan.
///
/// Bytes after the last newline do not form a token.
#[derive(Clone, Debug)]
pub struct Corpus {
    buffer: Vec<u8>,
    token_count: usize,
    total_token_bytes: usize,
}

impl Corpus {
    pub fn from_bytes(buffer: Vec<u8>) -> Self {
        let mut token_count = 0;
        let mut total_token_bytes = 0;
        for token in Tokens::new(&buffer) {
            token_count += 1;
            total_token_bytes += token.len();
        }
        Self {
            buffer,
            token_count,
            total_token_bytes,
        }
    }

    /// Reads the whole file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let buffer = fs::read(path).map_err(|source| BenchError::CorpusRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(buffer))
    }

    pub fn tokens(&self) -> Tokens<'_> {
        Tokens::new(&self.buffer)
    }

    pub fn spans(&self) -> impl Iterator<Item = TokenSpan> + '_ {
        let base = self.buffer.as_ptr() as usize;
        self.tokens().map(move |token| TokenSpan {
            offset: token.as_ptr() as usize - base,
            len: token.len(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len_bytes(&self) -> usize {
        self.buffer.len()
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn total_token_bytes(&self) -> usize {
        self.total_token_bytes
    }

    /// Length of the unterminated tail that is not counted as a token.
    pub fn trailing_bytes(&self) -> usize {
        match self.buffer.iter().rposition(|&b| b == b'\n') {
            Some(last) => self.buffer.len() - last - 1,
            None => self.buffer.len(),
        }
    }
}

/// Zero-copy iterator over newline-terminated tokens.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    rest: &'a [u8],
}

impl<'a> Tokens<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { rest: buffer }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let end = self.rest.iter().position(|&b| b == b'\n')?;
        let token = &self.rest[..end];
        self.rest = &self.rest[end + 1..];
        Some(token)
    }
}
