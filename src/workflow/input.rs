//! Input stage: file selection and media type validation.

use std::fs;
use std::path::{Path, PathBuf};

use super::WorkflowError;

/// Media type prefix every accepted file must carry.
pub const AUDIO_MEDIA_PREFIX: &str = "audio/";

/// A user-chosen file and its declared media type.
///
/// The payload itself is never read; only metadata is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    path: PathBuf,
    name: String,
    media_type: String,
    size: u64,
}

impl SelectedFile {
    /// Creates a handle from already known metadata.
    pub fn new(path: impl Into<PathBuf>, media_type: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            path,
            name,
            media_type: media_type.into(),
            size,
        }
    }

    /// Builds a handle for a file on disk.
    ///
    /// The media type is declared from the file extension, the same way a
    /// browser fills `File.type`. File contents are not inspected.
    ///
    /// # Errors
    /// - If the path does not exist or cannot be read
    /// - If the path is not a regular file
    pub fn from_path(path: &Path) -> Result<Self, WorkflowError> {
        let metadata = fs::metadata(path).map_err(|e| WorkflowError::FileUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if !metadata.is_file() {
            return Err(WorkflowError::FileUnavailable {
                path: path.display().to_string(),
                reason: "not a regular file".to_string(),
            });
        }

        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(path, media_type, metadata.len()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Human readable size, e.g. `12.4 KB`.
    pub fn size_label(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
        let mut value = self.size as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} {}", self.size, UNITS[0])
        } else {
            format!("{value:.1} {}", UNITS[unit])
        }
    }
}

/// Checks that a declared media type names an audio format.
pub fn validate_media_type(media_type: &str) -> Result<(), WorkflowError> {
    if media_type.starts_with(AUDIO_MEDIA_PREFIX) {
        Ok(())
    } else {
        Err(WorkflowError::InvalidMediaType {
            media_type: media_type.to_string(),
        })
    }
}

/// Expands a leading `~` to the home directory for typed paths.
pub fn expand_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    if trimmed == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(trimmed)
}
