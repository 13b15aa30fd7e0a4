//! Stage entry representation
//!
//! One pending change: a file name and the blob ID recorded for it. Whether
//! the entry is an addition or a removal is given by its position in the file.

use crate::artifacts::objects::OBJECT_ID_BYTES;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// Size of the fixed part of an entry: blob ID and name length
pub const ENTRY_FIXED_SIZE: usize = OBJECT_ID_BYTES + 2;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StageEntry {
    pub name: String,
    pub oid: ObjectId,
}

impl StageEntry {
    /// Length of the variable-size name that follows the fixed part
    pub fn name_length(fixed_part: &[u8]) -> usize {
        byteorder::NetworkEndian::read_u16(&fixed_part[OBJECT_ID_BYTES..ENTRY_FIXED_SIZE]) as usize
    }
}

impl Packable for StageEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let name_length = u16::try_from(self.name.len())
            .map_err(|_| anyhow!("File name too long for the stage: {}", self.name))?;

        let mut entry_bytes = Vec::with_capacity(ENTRY_FIXED_SIZE + self.name.len());
        self.oid.write_raw(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(name_length)?;
        entry_bytes.write_all(self.name.as_bytes())?;

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for StageEntry {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        if bytes.len() < ENTRY_FIXED_SIZE {
            return Err(anyhow!("Invalid stage entry size"));
        }

        let oid = ObjectId::read_raw(&mut &bytes[..OBJECT_ID_BYTES])?;
        let name_length = Self::name_length(&bytes);
        let name = bytes
            .get(ENTRY_FIXED_SIZE..ENTRY_FIXED_SIZE + name_length)
            .ok_or_else(|| anyhow!("Truncated stage entry name"))?;
        let name = std::str::from_utf8(name)
            .map_err(|_| anyhow!("Invalid UTF-8 in stage entry name"))?
            .to_string();

        Ok(StageEntry { name, oid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn entry_layout_is_oid_length_then_name() {
        let oid = ObjectId::hash_of(b"blob 0\0");
        let entry = StageEntry::new("dir/file.txt".to_string(), oid.clone());

        let bytes = entry.serialize().unwrap();

        assert_eq!(bytes.len(), ENTRY_FIXED_SIZE + "dir/file.txt".len());
        assert_eq!(StageEntry::name_length(&bytes), 12);
        assert_eq!(StageEntry::deserialize(Cursor::new(bytes)).unwrap(), entry);
    }

    #[test]
    fn truncated_names_are_rejected() {
        let oid = ObjectId::hash_of(b"blob 0\0");
        let bytes = StageEntry::new("file.txt".to_string(), oid)
            .serialize()
            .unwrap();

        assert!(StageEntry::deserialize(Cursor::new(bytes.slice(..bytes.len() - 1))).is_err());
    }
}
