//! Artifact store on the local filesystem.

use crate::collab::{ArtifactStore, CollabResult, CollaboratorError};
use serde_json::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Stores `(location, key)` at `<root>/<location>/<key>`.
///
/// Content types are not persisted; the key's extension carries that
/// information on disk.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve an artifact path, refusing anything that would leave the root.
    pub fn path_for(&self, location: &str, key: &str) -> CollabResult<PathBuf> {
        let location_path = relative_path(location)
            .ok_or_else(|| CollaboratorError::store(location, key, "invalid storage location"))?;
        let key_path = relative_path(key)
            .ok_or_else(|| CollaboratorError::store(location, key, "invalid artifact key"))?;
        Ok(self.root.join(location_path).join(key_path))
    }

    fn write(&self, location: &str, key: &str, bytes: &[u8]) -> CollabResult<()> {
        let path = self.path_for(location, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| CollaboratorError::store(location, key, err))?;
        }
        fs::write(&path, bytes).map_err(|err| CollaboratorError::store(location, key, err))?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
        Ok(())
    }
}

/// Accept only plain relative paths made of normal components.
fn relative_path(raw: &str) -> Option<&Path> {
    let path = Path::new(raw);
    if raw.is_empty() {
        return None;
    }
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
        .then_some(path)
}

impl ArtifactStore for FsArtifactStore {
    fn put_text(&self, location: &str, key: &str, text: &str) -> CollabResult<()> {
        self.write(location, key, text.as_bytes())
    }

    fn get_text(&self, location: &str, key: &str) -> CollabResult<String> {
        let path = self.path_for(location, key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(CollaboratorError::NotFound {
                    location: location.to_string(),
                    key: key.to_string(),
                })
            }
            Err(err) => Err(CollaboratorError::store(location, key, err)),
        }
    }

    fn put_json(&self, location: &str, key: &str, value: &Value) -> CollabResult<()> {
        let mut bytes = serde_json::to_vec_pretty(value)
            .map_err(|err| CollaboratorError::store(location, key, err))?;
        bytes.push(b'\n');
        self.write(location, key, &bytes)
    }

    fn put_bytes(
        &self,
        location: &str,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> CollabResult<()> {
        self.write(location, key, bytes)
    }
}
