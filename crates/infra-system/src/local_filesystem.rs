// Filesystem inspector backed by tokio::fs
use async_trait::async_trait;
use std::fs::FileType;
use std::path::Path;
use tracing::debug;

use healthcheck_core::port::filesystem::{EntryKind, FileSystemInspector};

/// Reads metadata from the local filesystem, following symlinks
pub struct LocalFileSystem;

fn classify(file_type: FileType) -> EntryKind {
    if file_type.is_dir() {
        return EntryKind::Directory;
    }
    if file_type.is_file() {
        return EntryKind::File;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;

        if file_type.is_socket() {
            return EntryKind::Socket;
        }
    }

    EntryKind::Other
}

#[async_trait]
impl FileSystemInspector for LocalFileSystem {
    async fn entry_kind(&self, path: &Path) -> EntryKind {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => classify(metadata.file_type()),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Metadata unavailable");
                EntryKind::Missing
            }
        }
    }
}
