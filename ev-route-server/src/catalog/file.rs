//! JSON file persistence for the catalog.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{PendingRegistration, Review, Station};

use super::error::CatalogError;

/// Everything the catalog persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    pub stations: Vec<Station>,
    #[serde(default)]
    pub pending: Vec<PendingRegistration>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// On-disk layouts accepted when loading.
///
/// A bare array of stations is accepted so that a plain station export can
/// seed the catalog.
#[derive(Deserialize)]
#[serde(untagged)]
enum OnDisk {
    Full(CatalogData),
    Stations(Vec<Station>),
}

/// Location of the catalog file.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    path: PathBuf,
}

impl CatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalog.
    ///
    /// Returns `Ok(None)` if the file does not exist yet. A file that exists
    /// but cannot be parsed is an error rather than an empty catalog.
    pub fn load(&self) -> Result<Option<CatalogData>, CatalogError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CatalogError::Persist {
                    message: format!("failed to read {:?}: {}", self.path, e),
                });
            }
        };

        let data = match serde_json::from_str(&contents) {
            Ok(OnDisk::Full(data)) => data,
            Ok(OnDisk::Stations(stations)) => CatalogData {
                stations,
                ..CatalogData::default()
            },
            Err(e) => {
                return Err(CatalogError::Persist {
                    message: format!("failed to parse {:?}: {}", self.path, e),
                });
            }
        };

        Ok(Some(data))
    }

    /// Save the catalog.
    ///
    /// Creates parent directories if they don't exist. The file is written to
    /// a sibling temp file first and renamed into place.
    pub fn save(&self, data: &CatalogData) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::Persist {
                message: format!("failed to create catalog directory: {}", e),
            })?;
        }

        let json = serde_json::to_string_pretty(data).map_err(|e| CatalogError::Persist {
            message: format!("failed to serialize catalog: {}", e),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| CatalogError::Persist {
            message: format!("failed to write catalog file: {}", e),
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| CatalogError::Persist {
            message: format!("failed to replace catalog file: {}", e),
        })?;

        Ok(())
    }
}
