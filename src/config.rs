// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{env as keys, wait};
use crate::crds::{InstallOptions, UninstallOptions, WaitOptions};

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Files or directories holding CRD manifests
    pub paths: Vec<String>,
    pub error_if_path_missing: bool,
    pub max_wait: Duration,
    pub poll_interval: Duration,
    /// Kubeconfig context to use instead of the current one
    pub kube_context: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_paths = lookup(keys::PATHS)
            .with_context(|| format!("{} environment variable not set", keys::PATHS))?;
        let paths: Vec<String> = raw_paths
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        if paths.is_empty() {
            bail!("{} does not name any path", keys::PATHS);
        }

        let error_if_path_missing =
            parse_or(&lookup, keys::ERROR_IF_PATH_MISSING, false)?;
        let max_wait = Duration::from_millis(parse_or(
            &lookup,
            keys::MAX_WAIT_MS,
            wait::DEFAULT_MAX_WAIT_MS,
        )?);
        let poll_interval = Duration::from_millis(parse_or(
            &lookup,
            keys::POLL_INTERVAL_MS,
            wait::DEFAULT_POLL_INTERVAL_MS,
        )?);
        let kube_context = lookup(keys::KUBE_CONTEXT).filter(|c| !c.is_empty());

        Ok(Config {
            paths,
            error_if_path_missing,
            max_wait,
            poll_interval,
            kube_context,
        })
    }

    pub fn install_options(&self) -> InstallOptions {
        InstallOptions {
            paths: self.paths.clone(),
            error_if_path_missing: self.error_if_path_missing,
            crds: Vec::new(),
            max_wait: self.max_wait,
            poll_interval: self.poll_interval,
        }
    }

    pub fn uninstall_options(&self) -> UninstallOptions {
        UninstallOptions {
            paths: self.paths.clone(),
            error_if_path_missing: self.error_if_path_missing,
            crds: Vec::new(),
        }
    }

    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            max_wait: self.max_wait,
            poll_interval: self.poll_interval,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, value)),
        None => Ok(default),
    }
}
