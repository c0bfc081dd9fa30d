//! Multipart content digests.
//!
//! Reproduces the ETag that S3-compatible stores assign to multipart uploads,
//! so uploaded artifacts can be verified against the store's listing:
//!
//! 1. split the content into `chunk_size` chunks (the last may be shorter)
//! 2. MD5 each chunk and concatenate the raw 16-byte digests
//! 3. MD5 the concatenation and append `-<chunk count>`
//!
//! Content that fits in one chunk gets the plain hex MD5 with no suffix.
//! Empty content is treated as one empty chunk.

use std::io::{self, Read};

use md5::{Digest, Md5};

use crate::Error;

/// Part size used by the platform's uploader.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// Computes the multipart ETag of `content`.
///
/// # Errors
///
/// Returns `InvalidArgument` if `chunk_size` is zero.
///
/// # Example
///
/// ```
/// use gantry::digest::multipart_etag;
///
/// assert_eq!(
///     multipart_etag(b"hello world", 5).unwrap(),
///     "df349a9519959b17a605009540f4b31d-3",
/// );
/// ```
pub fn multipart_etag(content: &[u8], chunk_size: usize) -> Result<String, Error> {
    let mut digest = MultipartDigest::new(chunk_size)?;
    digest.update(content);
    Ok(digest.finalize())
}

/// Computes the multipart ETag of everything `reader` yields.
///
/// The reader is consumed in fixed-size reads; the content is never held in
/// memory as a whole.
pub fn multipart_etag_reader<R: Read>(mut reader: R, chunk_size: usize) -> Result<String, Error> {
    let mut digest = MultipartDigest::new(chunk_size)?;
    io::copy(&mut reader, &mut digest)?;
    Ok(digest.finalize())
}

/// Incremental multipart ETag hasher.
///
/// Produces the same result as [`multipart_etag`] no matter how the input is
/// split across [`update`](Self::update) calls.
#[derive(Clone)]
pub struct MultipartDigest {
    chunk_size: usize,
    chunk: Md5,
    chunk_len: usize,
    // MD5 over the digests of every closed chunk.
    parts: Md5,
    first: Option<[u8; 16]>,
    count: usize,
}

impl MultipartDigest {
    /// Creates a hasher for the given chunk size.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Result<Self, Error> {
        if chunk_size == 0 {
            return Err(Error::invalid_argument("chunk_size must be greater than zero"));
        }
        Ok(Self {
            chunk_size,
            chunk: Md5::new(),
            chunk_len: 0,
            parts: Md5::new(),
            first: None,
            count: 0,
        })
    }

    /// Returns the configured chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Feeds more content into the hasher.
    pub fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            // A full chunk is only closed once more data arrives, so content
            // ending on a boundary does not produce a trailing empty chunk.
            if self.chunk_len == self.chunk_size {
                self.close_chunk();
            }
            let take = (self.chunk_size - self.chunk_len).min(data.len());
            self.chunk.update(&data[..take]);
            self.chunk_len += take;
            data = &data[take..];
        }
    }

    /// Consumes the hasher and returns the ETag.
    pub fn finalize(mut self) -> String {
        if self.chunk_len > 0 || self.count == 0 {
            self.close_chunk();
        }
        match (self.count, self.first) {
            (1, Some(first)) => hex::encode(first),
            (count, _) => format!("{}-{}", hex::encode(self.parts.finalize()), count),
        }
    }

    fn close_chunk(&mut self) {
        let mut digest = [0u8; 16];
        digest.copy_from_slice(&std::mem::replace(&mut self.chunk, Md5::new()).finalize());
        self.parts.update(digest);
        if self.count == 0 {
            self.first = Some(digest);
        }
        self.count += 1;
        self.chunk_len = 0;
    }
}

impl io::Write for MultipartDigest {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for MultipartDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultipartDigest")
            .field("chunk_size", &self.chunk_size)
            .field("chunks", &self.count)
            .field("pending", &self.chunk_len)
            .finish()
    }
}
