//! Storage of the inference API key.
//!
//! The key lives in `~/.local/share/rheumassist/credentials`, readable only by
//! the owner on Unix. `RHEUMASSIST_API_KEY` takes precedence when set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the stored key.
pub const API_KEY_ENV: &str = "RHEUMASSIST_API_KEY";

/// A bearer credential. Its `Debug` output never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key, trimming whitespace. Returns `None` for an empty key.
    pub fn new(key: impl AsRef<str>) -> Option<Self> {
        let trimmed = key.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw value, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Serialize, Deserialize)]
struct Credentials {
    api_key: String,
}

/// File-backed store for the API key.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("credentials"),
        }
    }

    /// The store in `~/.local/share/rheumassist`.
    ///
    /// # Errors
    /// - If the home directory cannot be determined
    pub fn default_location() -> anyhow::Result<Self> {
        let data_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join(".local")
            .join("share")
            .join("rheumassist");
        Ok(Self::new(&data_dir))
    }

    /// Reads the stored key, if any.
    ///
    /// # Errors
    /// - If the credentials file exists but cannot be read or parsed
    pub fn load(&self) -> anyhow::Result<Option<ApiKey>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| anyhow::anyhow!("Failed to read credentials: {e}"))?;
        let credentials: Credentials = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Credentials file is corrupted: {e}"))?;
        Ok(ApiKey::new(credentials.api_key))
    }

    /// Writes the key, replacing any previous one.
    ///
    /// # Errors
    /// - If the data directory cannot be created
    /// - If the file cannot be written or its permissions restricted
    pub fn save(&self, key: &ApiKey) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(&Credentials {
            api_key: key.expose().to_string(),
        })?;
        fs::write(&self.path, content)?;

        #[cfg(unix)]
        restrict_permissions(&self.path)?;

        tracing::info!("API key saved");
        Ok(())
    }

    /// Removes the stored key. Missing files are not an error.
    pub fn clear(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            tracing::info!("API key removed");
        }
        Ok(())
    }
}

/// Makes the credentials file readable only by its owner.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

/// Returns the key from the environment, falling back to `store`.
///
/// # Errors
/// - If the stored credentials cannot be read
pub fn resolve_api_key(store: &CredentialStore) -> anyhow::Result<Option<ApiKey>> {
    if let Some(key) = std::env::var(API_KEY_ENV).ok().and_then(ApiKey::new) {
        tracing::debug!("Using API key from {API_KEY_ENV}");
        return Ok(Some(key));
    }
    store.load()
}
