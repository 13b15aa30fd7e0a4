use anyhow::{Context, anyhow};
use std::io::BufRead;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Commit,
}

impl ObjectType {
    pub const ALL: [ObjectType; 2] = [ObjectType::Blob, ObjectType::Commit];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Commit => "commit",
        }
    }

    /// Directory of the content store holding objects of this type.
    pub fn namespace(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blobs",
            ObjectType::Commit => "commits",
        }
    }

    pub(crate) fn header(&self, content_len: usize) -> String {
        format!("{} {}\0", self.as_str(), content_len)
    }

    /// Consume a `<type> <size>\0` header, returning the type and declared size
    pub fn read_header(reader: &mut impl BufRead) -> anyhow::Result<(ObjectType, usize)> {
        let mut header = Vec::new();
        reader.read_until(b'\0', &mut header)?;

        if header.pop() != Some(b'\0') {
            return Err(anyhow!("Object header is not terminated"));
        }

        let header = std::str::from_utf8(&header).context("Object header is not UTF-8")?;
        let (name, size) = header
            .split_once(' ')
            .ok_or_else(|| anyhow!("Malformed object header: {:?}", header))?;
        let size = size
            .parse::<usize>()
            .with_context(|| format!("Invalid object size: {:?}", size))?;

        Ok((name.parse()?, size))
    }
}

impl FromStr for ObjectType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|object_type| object_type.as_str() == value)
            .ok_or_else(|| anyhow!("Unknown object type: {}", value))
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
