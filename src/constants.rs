// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Field manager used for server-side apply
pub const FIELD_MANAGER: &str = "crdenv";

pub const CRD_KIND: &str = "CustomResourceDefinition";
pub const CRD_GROUP: &str = "apiextensions.k8s.io";
/// apiVersion used for CRDs built in code
pub const CRD_API_VERSION: &str = "apiextensions.k8s.io/v1";

/// Manifest file extensions picked up by the loader
pub const MANIFEST_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Readiness polling defaults
pub mod wait {
    /// Maximum time to wait for CRDs to be served
    pub const DEFAULT_MAX_WAIT_MS: u64 = 10_000;
    /// Time between two discovery queries
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
}

/// Environment variables read by [`crate::config::Config::from_env`]
pub mod env {
    pub const PATHS: &str = "CRD_PATHS";
    pub const ERROR_IF_PATH_MISSING: &str = "CRD_ERROR_IF_PATH_MISSING";
    pub const MAX_WAIT_MS: &str = "CRD_MAX_WAIT_MS";
    pub const POLL_INTERVAL_MS: &str = "CRD_POLL_INTERVAL_MS";
    pub const KUBE_CONTEXT: &str = "KUBE_CONTEXT";
}
