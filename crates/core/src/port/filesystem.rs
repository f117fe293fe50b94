// Filesystem inspection port
use async_trait::async_trait;
use std::path::Path;

/// What a path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Nothing there, or metadata unreadable
    Missing,
    Directory,
    /// Unix-domain socket
    Socket,
    /// Regular file
    File,
    /// FIFO, device node, ...
    Other,
}

/// Read-only view of filesystem metadata
///
/// Symlinks are followed, so a link to a socket reports `Socket`.
#[async_trait]
pub trait FileSystemInspector: Send + Sync {
    async fn entry_kind(&self, path: &Path) -> EntryKind;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// In-memory filesystem; unknown paths are `Missing`
    #[derive(Default)]
    pub struct MockFileSystem {
        entries: HashMap<PathBuf, EntryKind>,
        inspected: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl MockFileSystem {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(mut self, path: impl Into<PathBuf>, kind: EntryKind) -> Self {
            self.entries.insert(path.into(), kind);
            self
        }

        /// Paths looked at so far, in order
        pub fn inspected(&self) -> Vec<PathBuf> {
            self.inspected.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FileSystemInspector for MockFileSystem {
        async fn entry_kind(&self, path: &Path) -> EntryKind {
            self.inspected.lock().unwrap().push(path.to_path_buf());
            self.entries
                .get(path)
                .copied()
                .unwrap_or(EntryKind::Missing)
        }
    }
}
