//! Catalog load sources
//!
//! The on-disk dataset is produced offline; the store only needs its bytes.
//! This module defines the load-source seam and the raw shapes the dataset
//! deserializes into before ingestion.

use rust_embed::RustEmbed;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::PathBuf;

use crate::errors::{CatalogError, Result};

/// Where catalog bytes come from.
pub trait CatalogSource {
    /// Human-readable name used in error messages and logs
    fn describe(&self) -> String;

    /// The raw dataset
    ///
    /// # Errors
    /// Implementation specific; file-backed sources return
    /// `CatalogError::FileSystem`.
    fn read(&self) -> Result<Cow<'_, [u8]>>;
}

const BUNDLED_CATALOG_FILE: &str = "iam-definition.json";

/// Embedded catalog data
#[derive(RustEmbed)]
#[folder = "resources/catalog"]
#[include = "*.json"]
struct EmbeddedCatalogData;

/// The catalog snapshot bundled with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalog;

impl CatalogSource for EmbeddedCatalog {
    fn describe(&self) -> String {
        format!("embedded {BUNDLED_CATALOG_FILE}")
    }

    fn read(&self) -> Result<Cow<'_, [u8]>> {
        EmbeddedCatalogData::get(BUNDLED_CATALOG_FILE)
            .map(|file| file.data)
            .ok_or_else(|| {
                CatalogError::configuration(format!(
                    "Embedded catalog file '{BUNDLED_CATALOG_FILE}' not found"
                ))
            })
    }
}

/// A catalog file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<Cow<'_, [u8]>> {
        std::fs::read(&self.path)
            .map(Cow::Owned)
            .map_err(|e| CatalogError::file_system("read", &self.path, e))
    }
}

/// Catalog bytes the caller already holds.
#[derive(Debug, Clone)]
pub struct JsonBytesSource {
    name: String,
    bytes: Vec<u8>,
}

impl JsonBytesSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl CatalogSource for JsonBytesSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn read(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(&self.bytes))
    }
}

/// Dataset root
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawCatalog {
    pub(crate) services: Vec<RawService>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawService {
    pub(crate) prefix: String,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) authorization_url: String,
    #[serde(default)]
    pub(crate) actions: Vec<RawAction>,
    #[serde(default)]
    pub(crate) resources: Vec<RawResource>,
    #[serde(default)]
    pub(crate) condition_keys: Vec<RawConditionKey>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawAction {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: String,
    /// Free-form in the dataset, normalized during ingestion
    pub(crate) access_level: String,
    /// Resource bindings; an empty name (or `*`) is the wildcard binding and a
    /// trailing `*` on a name marks the resource as required
    #[serde(default)]
    pub(crate) resources: Vec<RawBinding>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawBinding {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) condition_keys: Vec<String>,
    #[serde(default)]
    pub(crate) dependent_actions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawResource {
    pub(crate) name: String,
    pub(crate) arn_format: String,
    #[serde(default)]
    pub(crate) condition_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawConditionKey {
    pub(crate) name: String,
    #[serde(rename = "Type", default)]
    pub(crate) value_type: String,
    #[serde(default)]
    pub(crate) description: String,
}
