//! Image identifiers and the flat on-disk store they name.
//!
//! Every stored image lives directly inside one storage root as
//! `{identifier}.jpg`. Identifiers coming from callers go through
//! [`ImageStore::resolve`] before anything touches the filesystem.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::constants::IMAGE_EXTENSION;

/// Subdirectory of the root where writes are staged before the rename.
const STAGING_DIR: &str = ".incoming";

/// Opaque token naming one stored image.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ImageId(String);

impl ImageId {
    /// Mints a fresh random identifier.
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The canonical text form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why an identifier was refused.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolveError {
    /// Contains separators, parent references or disallowed characters.
    Malformed,
    /// Passed validation but still resolved outside the storage root.
    OutsideRoot,
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "Malformed image identifier"),
            Self::OutsideRoot => write!(f, "Image identifier resolves outside the storage root"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Checks the shape of a caller-supplied identifier.
fn validate_identifier(identifier: &str) -> Result<(), ResolveError> {
    if identifier.contains("..") || identifier.contains('/') || identifier.contains('\\') {
        return Err(ResolveError::Malformed);
    }
    let mut core = identifier.chars().filter(|c| *c != '-' && *c != '_').peekable();
    if core.peek().is_none() {
        return Err(ResolveError::Malformed);
    }
    if core.all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ResolveError::Malformed)
    }
}

/// Flat directory of stored images.
#[derive(Clone, Debug)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Creates the storage root if needed and pins its canonical form.
    pub async fn open(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref();
        tokio::fs::create_dir_all(root).await?;
        let root = tokio::fs::canonicalize(root).await?;
        tokio::fs::create_dir_all(root.join(STAGING_DIR)).await?;
        debug!("Image store at {}", root.display());
        Ok(Self { root })
    }

    /// The canonical storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps an identifier to its file inside the root without touching the filesystem.
    pub fn resolve(&self, identifier: &str) -> Result<PathBuf, ResolveError> {
        validate_identifier(identifier)?;
        let candidate = self
            .root
            .join(format!("{identifier}.{IMAGE_EXTENSION}"));
        if candidate.parent() != Some(self.root.as_path()) || !candidate.starts_with(&self.root) {
            warn!("Identifier {identifier:?} escaped {}", self.root.display());
            return Err(ResolveError::OutsideRoot);
        }
        Ok(candidate)
    }

    /// Writes a new image.
    ///
    /// The bytes are staged under the root's staging directory and renamed
    /// into place, so `{id}.jpg` is either absent or complete.
    pub async fn save(&self, id: &ImageId, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = self
            .resolve(id.as_str())
            .map_err(|err| std::io::Error::new(ErrorKind::InvalidInput, err))?;
        let staging = self.root.join(STAGING_DIR);
        tokio::fs::create_dir_all(&staging).await?;
        let staged = staging.join(format!("{id}.part"));

        let written = match tokio::fs::write(&staged, bytes).await {
            Ok(()) => tokio::fs::rename(&staged, &path).await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&staged).await
                && cleanup.kind() != ErrorKind::NotFound
            {
                warn!("Failed to remove staged image {}: {}", staged.display(), cleanup);
            }
            return Err(err);
        }
        Ok(path)
    }

    /// Identifiers of every regular file directly inside the root, sorted.
    pub async fn list(&self) -> std::io::Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            if let Some(stem) = path.file_stem() {
                ids.push(stem.to_string_lossy().into_owned());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
