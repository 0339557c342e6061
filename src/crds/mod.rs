// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD lifecycle: load, install, wait until served, uninstall.

pub mod installer;
pub mod loader;
pub mod poller;
pub mod uninstaller;

pub use installer::{install, install_descriptors, InstallOutcome};
pub use loader::load_descriptors;
pub use poller::{wait_for_descriptors, wait_until_ready, wait_until_removed};
pub use uninstaller::{uninstall, uninstall_descriptors};

use crate::constants::wait::{DEFAULT_MAX_WAIT_MS, DEFAULT_POLL_INTERVAL_MS};
use crate::error::{CrdError, Result};
use crate::types::CrdDescriptor;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct InstallOptions {
    /// Files or directories to load CRD manifests from
    pub paths: Vec<String>,
    pub error_if_path_missing: bool,
    /// CRDs to install in addition to the ones found under `paths`
    pub crds: Vec<CrdDescriptor>,
    /// Not read by [`install`]; carried for the caller's follow-up
    /// [`wait_for_descriptors`] via [`InstallOptions::wait_options`].
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

impl InstallOptions {
    /// Timing for waiting on the installed CRDs
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            max_wait: self.max_wait,
            poll_interval: self.poll_interval,
        }
    }
}

impl Default for InstallOptions {
    fn default() -> Self {
        let wait = WaitOptions::default();
        Self {
            paths: Vec::new(),
            error_if_path_missing: false,
            crds: Vec::new(),
            max_wait: wait.max_wait,
            poll_interval: wait.poll_interval,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UninstallOptions {
    pub paths: Vec<String>,
    pub error_if_path_missing: bool,
    pub crds: Vec<CrdDescriptor>,
}

/// Deadline and tick for the readiness poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

impl WaitOptions {
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(CrdError::InvalidOptions(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval > self.max_wait {
            return Err(CrdError::InvalidOptions(format!(
                "poll interval {:?} exceeds maximum wait {:?}",
                self.poll_interval, self.max_wait
            )));
        }
        Ok(())
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            max_wait: Duration::from_millis(DEFAULT_MAX_WAIT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}
