//! Model artifacts on disk
//!
//! Each artifact is a pretty-printed JSON document with a `<file>.sha256`
//! sidecar holding the hex digest. The sidecar is optional on load; when it
//! exists it must match.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::ModelError;

/// Sidecar path for an artifact
pub fn checksum_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".sha256");
    PathBuf::from(name)
}

/// Hex-encoded SHA-256 of bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Write an artifact and its checksum
pub fn save_artifact<T: Serialize>(path: &Path, artifact: &T) -> Result<(), ModelError> {
    let io_err = |source| ModelError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let bytes = serde_json::to_vec_pretty(artifact)?;
    fs::write(path, &bytes).map_err(io_err)?;
    fs::write(checksum_path(path), sha256_hex(&bytes)).map_err(io_err)?;

    log::info!("Saved model artifact: {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Read an artifact, verifying the checksum sidecar when present.
///
/// A missing file is `ModelError::NotLoaded`.
pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    if !path.exists() {
        return Err(ModelError::NotLoaded(format!(
            "artifact not found at '{}'; train the model first",
            path.display()
        )));
    }

    let bytes = fs::read(path).map_err(|source| ModelError::Io { path: path.to_path_buf(), source })?;

    let sidecar = checksum_path(path);
    if sidecar.exists() {
        let expected = fs::read_to_string(&sidecar)
            .map_err(|source| ModelError::Io { path: sidecar.clone(), source })?
            .trim()
            .to_lowercase();
        let actual = sha256_hex(&bytes);
        if expected != actual {
            return Err(ModelError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }
    } else {
        log::warn!("No checksum sidecar for {}; loading unverified", path.display());
    }

    let artifact = serde_json::from_slice(&bytes)?;
    log::info!("Loaded model artifact: {}", path.display());
    Ok(artifact)
}
