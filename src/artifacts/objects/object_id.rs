//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings representing SHA-1 hashes
//! of serialized objects. They are the only identity blobs and commits have.
//!
//! ## Format
//!
//! - Full: 40 hex characters (e.g., "abc123...def")
//! - Short: First 7 characters (e.g., "abc123")
//!
//! ## Storage
//!
//! Objects are stored in `.twig/objects/<namespace>/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_BYTES, OBJECT_ID_LENGTH};
use sha1::{Digest, Sha1};
use std::io;
use std::path::PathBuf;

/// Object identifier (SHA-1 hash, lowercase hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Validate a 40-character hex ID
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        anyhow::ensure!(
            id.len() == OBJECT_ID_LENGTH && id.bytes().all(|b| b.is_ascii_hexdigit()),
            "Not a valid object ID: {:?}",
            id
        );

        Ok(Self(id.to_ascii_lowercase()))
    }

    /// SHA-1 of an already serialized object.
    pub fn hash_of(content: &[u8]) -> Self {
        Self::from_raw(&Sha1::digest(content))
    }

    fn from_raw(raw: &[u8]) -> Self {
        Self(raw.iter().map(|byte| format!("{:02x}", byte)).collect())
    }

    /// Raw 20-byte form, as kept in the stage file
    pub fn write_raw(&self, writer: &mut impl io::Write) -> io::Result<()> {
        let mut raw = [0u8; OBJECT_ID_BYTES];
        for (byte, pair) in raw.iter_mut().zip(self.0.as_bytes().chunks(2)) {
            *byte = (hex_value(pair[0]) << 4) | hex_value(pair[1]);
        }

        writer.write_all(&raw)
    }

    pub fn read_raw(reader: &mut impl io::Read) -> io::Result<Self> {
        let mut raw = [0u8; OBJECT_ID_BYTES];
        reader.read_exact(&mut raw)?;

        Ok(Self::from_raw(&raw))
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

// only called on validated IDs
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
