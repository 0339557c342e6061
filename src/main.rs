// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crdenv::config::Config;
use crdenv::crds::{
    install, uninstall, uninstall_descriptors, wait_for_descriptors, wait_until_removed,
};
use crdenv::kubernetes::{create_client, KubeStore};
use crdenv::types::Expectation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Install,
    Uninstall,
}

impl std::str::FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "install" => Ok(Action::Install),
            "uninstall" => Ok(Action::Uninstall),
            other => bail!("Unknown command '{}', expected 'install' or 'uninstall'", other),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let action: Action = std::env::args()
        .nth(1)
        .context("Usage: crdenv <install|uninstall>")?
        .parse()?;

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: paths={:?}", config.paths);

    // Create Kubernetes client
    let client = create_client(&config).await?;
    let store = KubeStore::new(client);
    info!("Connected to Kubernetes cluster");

    match action {
        Action::Install => {
            let options = config.install_options();
            let installed = match install(&store, &options).await {
                Ok(installed) => installed,
                Err(failure) => {
                    warn!(
                        "Install failed, removing {} submitted CRDs",
                        failure.submitted.len()
                    );
                    if let Err(e) = uninstall_descriptors(&store, &failure.submitted).await {
                        warn!("Cleanup after failed install also failed: {}", e);
                    }
                    return Err(failure.into());
                }
            };

            info!("Waiting for {} CRDs to be served...", installed.len());
            wait_for_descriptors(&store, &installed, &options.wait_options())
                .await
                .context("CRDs did not become ready")?;
            info!("All CRDs are served");
        }
        Action::Uninstall => {
            let descriptors = uninstall(&store, &config.uninstall_options()).await?;

            let expectations: Vec<Expectation> = descriptors
                .iter()
                .flat_map(Expectation::for_descriptor)
                .collect();
            wait_until_removed(&store, &expectations, &config.wait_options())
                .await
                .context("CRDs were not removed in time")?;
            info!("All CRDs removed");
        }
    }

    Ok(())
}
