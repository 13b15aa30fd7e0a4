use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::stage::{HEADER_SIZE, SIGNATURE, VERSION};
use anyhow::anyhow;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::io::{BufRead, Write};

/// Fixed-size prefix of the stage file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageHeader {
    pub(crate) additions_count: u32,
    pub(crate) removals_count: u32,
}

impl StageHeader {
    pub(crate) fn with_counts(additions_count: usize, removals_count: usize) -> Self {
        StageHeader {
            additions_count: additions_count as u32,
            removals_count: removals_count as u32,
        }
    }
}

impl Packable for StageHeader {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(SIGNATURE.as_bytes())?;
        bytes.write_u32::<NetworkEndian>(VERSION)?;
        bytes.write_u32::<NetworkEndian>(self.additions_count)?;
        bytes.write_u32::<NetworkEndian>(self.removals_count)?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for StageHeader {
    /// Parse the header, rejecting foreign or newer stage files
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut signature = [0u8; 4];
        reader
            .read_exact(&mut signature)
            .map_err(|_| anyhow!("Stage header is truncated"))?;
        if signature != SIGNATURE.as_bytes() {
            return Err(anyhow!("Invalid stage file signature"));
        }

        let version = reader.read_u32::<NetworkEndian>()?;
        if version != VERSION {
            return Err(anyhow!("Unsupported stage file version: {}", version));
        }

        Ok(StageHeader {
            additions_count: reader.read_u32::<NetworkEndian>()?,
            removals_count: reader.read_u32::<NetworkEndian>()?,
        })
    }
}
