//! Durable key-value slots.
//!
//! [`FileStore`] keeps one file per key. Each file is a 14-byte header
//! (magic, format version, CRC32 of the payload, payload length) followed by
//! the payload. A file that fails any header or checksum test reads as absent.

use anyhow::{Context, Result};
use crc32fast::Hasher;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Key-value persistence boundary with last-write-wins semantics.
pub trait KvStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete `key`; deleting a missing key succeeds.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store that counts writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, Vec<u8>>,
    writes: usize,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.values.insert(key.to_string(), value.to_vec());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Magic number for slot files ("BSKV" = blockstack key-value).
const SLOT_MAGIC: u32 = 0x4253_4B56;

/// Current slot file format version.
const SLOT_VERSION: u16 = 1;

const HEADER_LEN: usize = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
struct SlotHeader {
    magic: u32,
    version: u16,
    crc32: u32,
    payload_len: u32,
}

impl SlotHeader {
    fn for_payload(payload: &[u8]) -> Self {
        Self {
            magic: SLOT_MAGIC,
            version: SLOT_VERSION,
            crc32: checksum(payload),
            payload_len: payload.len() as u32,
        }
    }

    fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..10].copy_from_slice(&self.crc32.to_le_bytes());
        bytes[10..14].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            anyhow::bail!("Slot header too short");
        }

        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != SLOT_MAGIC {
            anyhow::bail!(
                "Invalid slot magic: expected 0x{:08X}, got 0x{:08X}",
                SLOT_MAGIC,
                magic
            );
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != SLOT_VERSION {
            anyhow::bail!("Unsupported slot version {version}");
        }

        Ok(Self {
            magic,
            version,
            crc32: u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]),
            payload_len: u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]),
        })
    }
}

fn checksum(payload: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(payload);
    hasher.finalize()
}

/// Parse a slot file into its payload.
fn decode_slot(bytes: &[u8]) -> Result<Vec<u8>> {
    let header = SlotHeader::from_bytes(bytes)?;
    let payload = &bytes[HEADER_LEN..];
    if payload.len() != header.payload_len as usize {
        anyhow::bail!(
            "Slot payload length mismatch: header says {}, found {}",
            header.payload_len,
            payload.len()
        );
    }

    let computed = checksum(payload);
    if computed != header.crc32 {
        anyhow::bail!(
            "CRC32 mismatch: expected {:08X}, got {:08X}",
            header.crc32,
            computed
        );
    }
    Ok(payload.to_vec())
}

/// Directory-backed store with one checksummed file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create store directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Directory holding the slot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// Bytes outside `[A-Za-z0-9._-]` are written as `%XX`, so distinct keys
    /// always map to distinct files.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len() + 3);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
                file_name.push(char::from(byte));
            } else {
                file_name.push_str(&format!("%{byte:02X}"));
            }
        }
        file_name.push_str(".kv");
        self.dir.join(file_name)
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.slot_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read slot {}", path.display()));
            }
        };

        match decode_slot(&bytes) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) => {
                warn!(path = %path.display(), "Ignoring corrupt slot: {err:#}");
                Ok(None)
            }
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.slot_path(key);
        let tmp_path = path.with_extension("kv.tmp");

        let mut bytes = Vec::with_capacity(HEADER_LEN + value.len());
        bytes.extend_from_slice(&SlotHeader::for_payload(value).to_bytes());
        bytes.extend_from_slice(value);

        fs::write(&tmp_path, &bytes)
            .with_context(|| format!("Failed to write slot {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to move slot into place at {}", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove slot {}", path.display()))
            }
        }
    }
}
