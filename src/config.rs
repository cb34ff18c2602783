//! TOML host description.
//!
//! ```toml
//! name = "com.example.host"
//! description = "Example host"
//! path = "bin/example-host"          # relative to this file
//! allowed_origins = ["chrome-extension://aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa/"]
//! allowed_extensions = ["host@example.org"]
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::install::manifest::default_kind;
use crate::install::{HostIdentity, Manifest, RegistrarError, Result};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HostConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub path: PathBuf,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub allowed_extensions: Vec<String>,
}

impl HostConfig {
    /// Reads `file`; a relative `path` is taken relative to the file's directory
    /// and made absolute, since browsers only launch hosts by absolute path.
    pub fn load(file: &Path) -> Result<Self> {
        let raw = fs::read_to_string(file).map_err(|source| RegistrarError::ConfigRead {
            path: file.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&raw).map_err(|source| RegistrarError::ConfigParse {
            path: file.to_path_buf(),
            message: source.to_string(),
        })?;
        if config.path.is_relative() {
            let base = file.parent().unwrap_or_else(|| Path::new("."));
            config.path = std::path::absolute(base.join(&config.path)).map_err(|source| {
                RegistrarError::ConfigRead {
                    path: file.to_path_buf(),
                    source,
                }
            })?;
        }
        Ok(config)
    }

    pub fn parse(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn identity(&self) -> HostIdentity {
        HostIdentity::new(self.name.clone(), self.path.clone())
    }

    /// Empty allowlists are left out of the manifest.
    pub fn manifest(&self) -> Manifest {
        let non_empty = |v: &Vec<String>| (!v.is_empty()).then(|| v.clone());
        Manifest {
            name: self.name.clone(),
            description: self.description.clone(),
            path: self.path.clone(),
            kind: self.kind.clone(),
            allowed_origins: non_empty(&self.allowed_origins),
            allowed_extensions: non_empty(&self.allowed_extensions),
        }
    }
}
