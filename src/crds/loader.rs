// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Loading CRD manifests from files and directories

use crate::constants::{CRD_KIND, MANIFEST_EXTENSIONS};
use crate::error::{CrdError, Result};
use crate::types::CrdDescriptor;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Load every CRD found under `paths`.
///
/// Directories are read non-recursively: only manifest files directly inside
/// them are loaded, in file name order. A path naming a file is loaded as-is.
/// Missing paths are skipped unless `error_if_path_missing` is set.
///
/// When two manifests declare the same group and plural, the one seen last
/// replaces the earlier one at the earlier one's position.
#[instrument]
pub fn load_descriptors<P>(paths: &[P], error_if_path_missing: bool) -> Result<Vec<CrdDescriptor>>
where
    P: AsRef<Path> + std::fmt::Debug,
{
    let mut loaded = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            if error_if_path_missing {
                return Err(CrdError::PathNotFound {
                    path: path.to_path_buf(),
                });
            }
            debug!("Skipping missing CRD path {}", path.display());
            continue;
        }

        for file in manifest_files(path)? {
            loaded.extend(read_manifest_file(&file)?);
        }
    }

    Ok(dedup_last_wins(loaded))
}

/// Merge descriptor lists with the same last-seen-wins rule as loading
pub fn dedup_last_wins(descriptors: Vec<CrdDescriptor>) -> Vec<CrdDescriptor> {
    let mut unique: Vec<CrdDescriptor> = Vec::with_capacity(descriptors.len());
    let mut positions = HashMap::new();

    for crd in descriptors {
        match positions.get(&crd.id()) {
            Some(&index) => {
                debug!("CRD {} declared more than once, keeping the last one", crd.id());
                unique[index] = crd;
            }
            None => {
                positions.insert(crd.id(), unique.len());
                unique.push(crd);
            }
        }
    }

    unique
}

fn manifest_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| CrdError::Io {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        if entry.file_type().is_file() && has_manifest_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn has_manifest_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}

fn read_manifest_file(file: &Path) -> Result<Vec<CrdDescriptor>> {
    let content = fs::read_to_string(file).map_err(|source| CrdError::Io {
        path: file.to_path_buf(),
        source,
    })?;

    let parse_error = |reason: String| CrdError::Parse {
        file: file.to_path_buf(),
        reason,
    };

    let mut descriptors = Vec::new();
    for document in serde_yaml::Deserializer::from_str(&content) {
        let value = serde_yaml::Value::deserialize(document).map_err(|e| parse_error(e.to_string()))?;
        if value.is_null() {
            continue;
        }

        let manifest: Value = serde_json::to_value(value).map_err(|e| parse_error(e.to_string()))?;
        if manifest.get("kind").and_then(Value::as_str) != Some(CRD_KIND) {
            debug!("Skipping non-CRD document in {}", file.display());
            continue;
        }

        descriptors.push(CrdDescriptor::from_manifest(manifest).map_err(parse_error)?);
    }

    debug!("Loaded {} CRDs from {}", descriptors.len(), file.display());
    Ok(descriptors)
}
