// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use serde::{Deserialize, Serialize};
use std::fmt;

use super::crd::CrdDescriptor;

/// A (group, version, plural) triple that must show up in API discovery.
///
/// Matching is literal: an empty group or version only matches a discovery
/// entry with the same empty value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Expectation {
    pub group: String,
    pub version: String,
    pub plural: String,
}

impl Expectation {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            plural: plural.into(),
        }
    }

    /// One expectation per version the descriptor asks to be served
    pub fn for_descriptor(crd: &CrdDescriptor) -> Vec<Self> {
        crd.served_versions()
            .into_iter()
            .map(|version| Self::new(&crd.group, version, &crd.plural))
            .collect()
    }

    pub fn group_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group_version(), self.plural)
    }
}
