// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Applying CRDs to the API server

use crate::crds::loader::{dedup_last_wins, load_descriptors};
use crate::crds::InstallOptions;
use crate::error::{CrdError, InstallFailure};
use crate::kubernetes::CrdStore;
use crate::types::CrdDescriptor;
use tracing::{info, instrument};

/// Descriptors that were submitted to the store
pub type InstallOutcome = Vec<CrdDescriptor>;

/// Load the CRDs named by `options` and apply them.
///
/// `options.crds` come first, followed by everything loaded from
/// `options.paths`; duplicates resolve last-seen-wins.
#[instrument(skip(store, options), fields(paths = ?options.paths))]
pub async fn install<S: CrdStore>(
    store: &S,
    options: &InstallOptions,
) -> Result<InstallOutcome, InstallFailure> {
    let mut descriptors = options.crds.clone();
    descriptors.extend(load_descriptors(options.paths.as_slice(), options.error_if_path_missing)?);

    install_descriptors(store, dedup_last_wins(descriptors)).await
}

/// Create or update each CRD, in order.
///
/// Stops at the first failure. The failure still carries every descriptor
/// submitted so far, the failing one included.
pub async fn install_descriptors<S: CrdStore>(
    store: &S,
    descriptors: Vec<CrdDescriptor>,
) -> Result<InstallOutcome, InstallFailure> {
    let mut submitted = Vec::with_capacity(descriptors.len());

    for crd in descriptors {
        info!("Installing CRD {}", crd.name);
        let result = store.apply(&crd).await;
        let id = crd.id();
        submitted.push(crd);

        if let Err(source) = result {
            return Err(InstallFailure {
                submitted,
                source: CrdError::Apply { crd: id, source },
            });
        }
    }

    info!("Installed {} CRDs", submitted.len());
    Ok(submitted)
}
