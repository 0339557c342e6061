// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed view of a CustomResourceDefinition manifest.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::constants::{CRD_API_VERSION, CRD_KIND};

/// Identity of a CRD: its API group and plural resource name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrdId {
    pub group: String,
    pub plural: String,
}

impl CrdId {
    pub fn new(group: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            plural: plural.into(),
        }
    }
}

impl fmt::Display for CrdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.plural, self.group)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VersionEntry {
    pub name: String,
    #[serde(default)]
    pub served: bool,
    #[serde(default)]
    pub storage: bool,
}

impl VersionEntry {
    pub fn new(name: impl Into<String>, served: bool, storage: bool) -> Self {
        Self {
            name: name.into(),
            served,
            storage,
        }
    }
}

/// A CRD loaded from disk (or built in code), ready to be submitted.
///
/// Only the fields needed for identity and readiness are typed. The complete
/// manifest is kept in `manifest` and sent to the API server as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct CrdDescriptor {
    pub name: String,
    pub api_version: String,
    pub group: String,
    pub plural: String,
    pub kind: String,
    pub versions: Vec<VersionEntry>,
    /// Legacy single version (`apiextensions.k8s.io/v1beta1` only).
    pub version: Option<String>,
    pub manifest: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrdManifest {
    api_version: String,
    #[serde(default)]
    metadata: ManifestMetadata,
    spec: ManifestSpec,
}

#[derive(Deserialize, Default)]
struct ManifestMetadata {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct ManifestSpec {
    group: String,
    #[serde(default)]
    version: Option<String>,
    names: ManifestNames,
    #[serde(default)]
    versions: Vec<VersionEntry>,
}

#[derive(Deserialize)]
struct ManifestNames {
    plural: String,
    kind: String,
}

impl CrdDescriptor {
    /// Build an `apiextensions.k8s.io/v1` CRD accepting any object shape.
    pub fn new(
        group: impl Into<String>,
        plural: impl Into<String>,
        kind: impl Into<String>,
        versions: Vec<VersionEntry>,
    ) -> Self {
        let group = group.into();
        let plural = plural.into();
        let kind = kind.into();
        let name = format!("{}.{}", plural, group);

        let manifest = json!({
            "apiVersion": CRD_API_VERSION,
            "kind": CRD_KIND,
            "metadata": { "name": name },
            "spec": {
                "group": group,
                "scope": "Namespaced",
                "names": {
                    "plural": plural,
                    "singular": kind.to_lowercase(),
                    "kind": kind,
                },
                "versions": versions.iter().map(|v| json!({
                    "name": v.name,
                    "served": v.served,
                    "storage": v.storage,
                    "schema": {
                        "openAPIV3Schema": {
                            "type": "object",
                            "x-kubernetes-preserve-unknown-fields": true,
                        }
                    },
                })).collect::<Vec<_>>(),
            },
        });

        Self {
            name,
            api_version: CRD_API_VERSION.to_string(),
            group,
            plural,
            kind,
            versions,
            version: None,
            manifest,
        }
    }

    /// Read the identity and version metadata out of a CRD manifest and
    /// validate it. Returns a human readable reason on failure.
    pub fn from_manifest(manifest: Value) -> Result<Self, String> {
        let parsed: CrdManifest =
            serde_json::from_value(manifest.clone()).map_err(|e| e.to_string())?;

        let name = parsed
            .metadata
            .name
            .unwrap_or_else(|| format!("{}.{}", parsed.spec.names.plural, parsed.spec.group));

        let descriptor = Self {
            name,
            api_version: parsed.api_version,
            group: parsed.spec.group,
            plural: parsed.spec.names.plural,
            kind: parsed.spec.names.kind,
            versions: parsed.spec.versions,
            version: parsed.spec.version.filter(|v| !v.is_empty()),
            manifest,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn id(&self) -> CrdId {
        CrdId::new(&self.group, &self.plural)
    }

    /// Versions the API server should start serving for this CRD.
    pub fn served_versions(&self) -> Vec<&str> {
        match &self.version {
            Some(version) => vec![version.as_str()],
            None => self
                .versions
                .iter()
                .filter(|v| v.served)
                .map(|v| v.name.as_str())
                .collect(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.group.is_empty() {
            return Err("spec.group must not be empty".to_string());
        }
        if self.plural.is_empty() {
            return Err("spec.names.plural must not be empty".to_string());
        }
        if self.kind.is_empty() {
            return Err("spec.names.kind must not be empty".to_string());
        }

        match (&self.version, self.versions.is_empty()) {
            (Some(_), false) => Err(format!(
                "CRD {} sets both spec.version and spec.versions",
                self.id()
            )),
            (None, true) => Err(format!("CRD {} declares no versions", self.id())),
            (Some(_), true) => Ok(()),
            (None, false) => {
                let storage = self.versions.iter().filter(|v| v.storage).count();
                if storage == 1 {
                    Ok(())
                } else {
                    Err(format!(
                        "CRD {} must have exactly one storage version, found {}",
                        self.id(),
                        storage
                    ))
                }
            }
        }
    }
}
