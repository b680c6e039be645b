// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document serialization and deserialization.
//!
//! This module handles exporting and importing annotation documents (and
//! any other serde type, such as the engine configuration) in YAML and JSON
//! formats, picked by file extension.

use crate::error::Error;
use crate::models::document::Document;
use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(Error::UnsupportedFormat(path.to_path_buf()).into()),
    }
}

/// Write any serializable value, choosing the format from the extension.
pub fn write_by_extension<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let text = match format_of(path)? {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)?,
    };
    std::fs::write(path, text)?;
    Ok(())
}

/// Read any deserializable value, choosing the format from the extension.
pub fn read_by_extension<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = format_of(path)?;
    let text = std::fs::read_to_string(path)?;
    let value = match format {
        Format::Yaml => serde_yaml::from_str(&text)?,
        Format::Json => serde_json::from_str(&text)?,
    };
    Ok(value)
}

/// Export a document to YAML or JSON.
pub fn export_document(data: &Document, path: &Path) -> Result<()> {
    write_by_extension(data, path)?;
    log::info!(
        "Exported {} elements to {}",
        data.elements.len(),
        path.display()
    );
    Ok(())
}

/// Import a document from YAML or JSON.
pub fn import_document(path: &Path) -> Result<Document> {
    let data: Document = read_by_extension(path)?;
    log::info!(
        "Imported {} elements from {}",
        data.elements.len(),
        path.display()
    );
    Ok(data)
}
