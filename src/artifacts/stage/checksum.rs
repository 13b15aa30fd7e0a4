//! Stream adapter that keeps a running SHA-1 of the stage bytes
//!
//! Reads and writes go through [`Checksummed`] so the trailer can be produced
//! (or checked) without buffering the whole stage in memory.

use crate::artifacts::stage::CHECKSUM_SIZE;
use anyhow::anyhow;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

pub struct Checksummed<S> {
    inner: S,
    digest: Sha1,
}

impl<S> Checksummed<S> {
    pub fn new(inner: S) -> Self {
        Checksummed {
            inner,
            digest: Sha1::new(),
        }
    }

    fn current(&self) -> [u8; CHECKSUM_SIZE] {
        let mut checksum = [0u8; CHECKSUM_SIZE];
        checksum.copy_from_slice(&self.digest.clone().finalize());
        checksum
    }
}

impl<S: Read> Checksummed<S> {
    /// Read exactly `size` bytes, failing on a truncated stage
    pub fn read_chunk(&mut self, size: usize) -> anyhow::Result<Vec<u8>> {
        let mut buffer = vec![0; size];
        self.read_exact(&mut buffer)
            .map_err(|_| anyhow!("Stage file ends unexpectedly"))?;

        Ok(buffer)
    }

    /// Compare the trailer against the digest of everything read so far
    pub fn verify_trailer(mut self) -> anyhow::Result<()> {
        let expected = self.current();

        let mut stored = [0u8; CHECKSUM_SIZE];
        self.inner
            .read_exact(&mut stored)
            .map_err(|_| anyhow!("Stage file is missing its checksum"))?;

        if stored != expected {
            return Err(anyhow!("Stage file is corrupt: checksum mismatch"));
        }

        Ok(())
    }
}

impl<S: Write> Checksummed<S> {
    /// Append the digest of everything written so far
    pub fn finish(mut self) -> anyhow::Result<S> {
        let trailer = self.current();
        self.inner.write_all(&trailer)?;
        self.inner.flush()?;

        Ok(self.inner)
    }
}

impl<S: Read> Read for Checksummed<S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let count = self.inner.read(buf)?;
        self.digest.update(&buf[..count]);
        Ok(count)
    }
}

impl<S: Write> Write for Checksummed<S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let count = self.inner.write(buf)?;
        self.digest.update(&buf[..count]);
        Ok(count)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
