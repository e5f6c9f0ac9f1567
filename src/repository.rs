//! Registry and snapshot persistence
//!
//! Hosts load scenario data before any player exists, so these are the only
//! async APIs in the crate.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::runtime::CursorSnapshot;
use crate::storage;
use crate::types::TimelineRegistry;

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Registry not found: {name}")]
    NotFound {
        name: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Save data not found for registry: {name}")]
    SaveDataNotFound { name: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    #[error("Invalid data format: {message}")]
    InvalidFormat { message: String },

    #[error("Repository unavailable: {reason}")]
    Unavailable { reason: String },
}

impl RepositoryError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            source: Some(Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Registry not found",
            ))),
        }
    }
}

/// Storage of named timeline registries
#[async_trait]
pub trait RegistryRepository: Send + Sync {
    async fn load_registry(&self, name: &str) -> Result<TimelineRegistry, RepositoryError>;

    async fn save_registry(
        &self,
        name: &str,
        registry: &TimelineRegistry,
    ) -> Result<(), RepositoryError>;

    async fn registry_exists(&self, name: &str) -> Result<bool, RepositoryError>;

    /// Names of every stored registry, sorted
    async fn list_registries(&self) -> Result<Vec<String>, RepositoryError>;
}

/// Storage of one cursor snapshot per registry
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn save_snapshot(
        &self,
        name: &str,
        snapshot: &CursorSnapshot,
    ) -> Result<(), RepositoryError>;

    async fn load_snapshot(&self, name: &str) -> Result<Option<CursorSnapshot>, RepositoryError>;

    async fn delete_snapshot(&self, name: &str) -> Result<(), RepositoryError>;
}

const SAVE_SUFFIX: &str = ".save";

/// `<base>/<name>.json` registries and `<base>/<name>.save.json` snapshots
pub struct FileSystemRepository {
    base_path: PathBuf,
}

impl FileSystemRepository {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn registry_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{name}.json"))
    }

    fn save_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{name}{SAVE_SUFFIX}.json"))
    }
}

#[async_trait]
impl RegistryRepository for FileSystemRepository {
    async fn load_registry(&self, name: &str) -> Result<TimelineRegistry, RepositoryError> {
        let path = self.registry_path(name);

        if !path.exists() {
            return Err(RepositoryError::not_found(name));
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| RepositoryError::IoError {
                message: format!("Failed to read registry file {}: {}", path.display(), e),
            })?;

        storage::load_registry(&bytes).map_err(|e| RepositoryError::InvalidFormat {
            message: format!("Failed to parse registry {}: {e}", path.display()),
        })
    }

    async fn save_registry(
        &self,
        name: &str,
        registry: &TimelineRegistry,
    ) -> Result<(), RepositoryError> {
        let path = self.registry_path(name);

        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| RepositoryError::IoError {
                message: format!("Failed to create registry directory: {e}"),
            })?;

        let bytes =
            storage::save_registry(registry).map_err(|e| RepositoryError::SerializationError {
                message: format!("Failed to serialize registry: {e}"),
            })?;

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| RepositoryError::IoError {
                message: format!("Failed to write registry file {}: {}", path.display(), e),
            })
    }

    async fn registry_exists(&self, name: &str) -> Result<bool, RepositoryError> {
        Ok(self.registry_path(name).exists())
    }

    async fn list_registries(&self) -> Result<Vec<String>, RepositoryError> {
        let mut names = Vec::new();

        let mut entries =
            tokio::fs::read_dir(&self.base_path)
                .await
                .map_err(|e| RepositoryError::IoError {
                    message: format!(
                        "Failed to read directory {}: {}",
                        self.base_path.display(),
                        e
                    ),
                })?;

        while let Some(entry) =
            entries
                .next_entry()
                .await
                .map_err(|e| RepositoryError::IoError {
                    message: format!("Failed to read directory entry: {e}"),
                })?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && !stem.ends_with(SAVE_SUFFIX)
            {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl SnapshotRepository for FileSystemRepository {
    async fn save_snapshot(
        &self,
        name: &str,
        snapshot: &CursorSnapshot,
    ) -> Result<(), RepositoryError> {
        let path = self.save_path(name);

        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| RepositoryError::IoError {
                message: format!("Failed to create save directory: {e}"),
            })?;

        let bytes =
            storage::save_snapshot(snapshot).map_err(|e| RepositoryError::SerializationError {
                message: format!("Failed to serialize snapshot: {e}"),
            })?;

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| RepositoryError::IoError {
                message: format!("Failed to write save file {}: {}", path.display(), e),
            })
    }

    async fn load_snapshot(&self, name: &str) -> Result<Option<CursorSnapshot>, RepositoryError> {
        let path = self.save_path(name);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| RepositoryError::IoError {
                message: format!("Failed to read save file {}: {}", path.display(), e),
            })?;

        let snapshot =
            storage::load_snapshot(&bytes).map_err(|e| RepositoryError::SerializationError {
                message: format!("Failed to deserialize snapshot: {e}"),
            })?;

        Ok(Some(snapshot))
    }

    async fn delete_snapshot(&self, name: &str) -> Result<(), RepositoryError> {
        let path = self.save_path(name);

        if !path.exists() {
            return Err(RepositoryError::SaveDataNotFound {
                name: name.to_string(),
            });
        }

        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| RepositoryError::IoError {
                message: format!("Failed to delete save file {}: {}", path.display(), e),
            })
    }
}

/// In-memory implementation for testing
pub struct InMemoryRepository {
    registries: HashMap<String, TimelineRegistry>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            registries: HashMap::new(),
        }
    }

    pub fn add_registry(&mut self, name: impl Into<String>, registry: TimelineRegistry) {
        self.registries.insert(name.into(), registry);
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryRepository for InMemoryRepository {
    async fn load_registry(&self, name: &str) -> Result<TimelineRegistry, RepositoryError> {
        self.registries
            .get(name)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(name))
    }

    async fn save_registry(
        &self,
        _name: &str,
        _registry: &TimelineRegistry,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable {
            reason: "In-memory repository is read-only".to_string(),
        })
    }

    async fn registry_exists(&self, name: &str) -> Result<bool, RepositoryError> {
        Ok(self.registries.contains_key(name))
    }

    async fn list_registries(&self) -> Result<Vec<String>, RepositoryError> {
        let mut names: Vec<String> = self.registries.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
