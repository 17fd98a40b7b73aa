//! Directory-backed session storage.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use run_from_cats_core::SessionId;
use run_from_cats_world::{SessionStore, StoreError};
use tracing::debug;

/// File name suffix of stored sessions.
const SESSION_EXTENSION: &str = "session";

/// Keeps one `<id>.session` file per session inside a directory.
#[derive(Clone, Debug)]
pub(crate) struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens the store rooted at `root`, creating the directory when missing.
    pub(crate) fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory holding the session files.
    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: SessionId) -> PathBuf {
        self.root.join(format!("{id}.{SESSION_EXTENSION}"))
    }
}

impl SessionStore for FileStore {
    /// Writes through a temporary file so a crash never leaves half a blob.
    fn save(&mut self, id: SessionId, blob: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(id);
        let staging = path.with_extension(format!("{SESSION_EXTENSION}.tmp"));
        fs::write(&staging, blob)?;
        fs::rename(&staging, &path)?;
        debug!(session = %id, path = %path.display(), bytes = blob.len(), "session saved");
        Ok(())
    }

    fn load(&self, id: SessionId) -> Result<Vec<u8>, StoreError> {
        match fs::read(self.path_for(id)) {
            Ok(blob) => Ok(blob),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(id)),
            Err(error) => Err(StoreError::Io(error)),
        }
    }
}
