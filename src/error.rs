// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{CrdDescriptor, CrdId, Expectation};

#[derive(Error, Debug)]
pub enum CrdError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("CRD path does not exist: {}", .path.display())]
    PathNotFound { path: PathBuf },

    #[error("Failed to parse CRD manifest {}: {reason}", .file.display())]
    Parse { file: PathBuf, reason: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to apply CRD {crd}: {source}")]
    Apply {
        crd: CrdId,
        #[source]
        source: StoreError,
    },

    #[error("Failed to delete CRD {crd}: {source}")]
    Delete {
        crd: CrdId,
        #[source]
        source: StoreError,
    },

    #[error("Timed out waiting for {}", format_pending(.pending))]
    Timeout { pending: Vec<Expectation> },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Errors reported by a [`crate::kubernetes::CrdStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Install failed part way through.
///
/// `submitted` holds every descriptor sent to the store before the failure,
/// including the one that failed, so callers can still tear them down.
#[derive(Error, Debug)]
#[error("Install failed after submitting {} CRDs", .submitted.len())]
pub struct InstallFailure {
    pub submitted: Vec<CrdDescriptor>,
    #[source]
    pub source: CrdError,
}

impl From<CrdError> for InstallFailure {
    fn from(source: CrdError) -> Self {
        InstallFailure {
            submitted: Vec::new(),
            source,
        }
    }
}

fn format_pending(pending: &[Expectation]) -> String {
    pending
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, CrdError>;
