// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation

use crate::config::Config;
use crate::error::{CrdError, Result};
use kube::{
    config::{KubeConfigOptions, Kubeconfig},
    Client, Config as KConfig,
};
use tracing::{info, instrument};

/// Create a client for the API server the CRDs are managed in.
///
/// Uses the inferred configuration (in-cluster or `KUBECONFIG`) unless a
/// kubeconfig context is configured.
#[instrument(skip(config))]
pub async fn create_client(config: &Config) -> Result<Client> {
    let Some(context) = config.kube_context.as_deref() else {
        return Ok(Client::try_default().await?);
    };

    let kubeconfig = Kubeconfig::read()
        .map_err(|e| CrdError::KubeconfigError(format!("Failed to read kubeconfig: {}", e)))?;
    create_client_for_context(kubeconfig, context).await
}

async fn create_client_for_context(kubeconfig: Kubeconfig, context: &str) -> Result<Client> {
    info!("Using kubeconfig context '{}'", context);

    let options = KubeConfigOptions {
        context: Some(context.to_string()),
        ..Default::default()
    };
    let client_config = KConfig::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|e| CrdError::KubeconfigError(format!("Failed to create config: {}", e)))?;

    Client::try_from(client_config)
        .map_err(|e| CrdError::KubeconfigError(format!("Failed to create client: {}", e)))
}
