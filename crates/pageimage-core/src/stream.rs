use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared, immutable bytes of a source document.
///
/// Cloning is cheap; every page of a document and every image rendered from
/// it refers to the same buffer. The optional path records where the bytes
/// came from so rasterizers that prefer files can use it.
#[derive(Clone)]
pub struct DocumentStream {
    bytes: Arc<[u8]>,
    path: Option<PathBuf>,
}

impl DocumentStream {
    /// Wrap in-memory document bytes.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
            path: None,
        }
    }

    /// Read a document from disk, remembering its path.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(Self {
            bytes: bytes.into(),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when both handles share the same underlying buffer.
    pub fn same_source(&self, other: &DocumentStream) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

impl fmt::Debug for DocumentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStream")
            .field("len", &self.bytes.len())
            .field("path", &self.path)
            .finish()
    }
}
