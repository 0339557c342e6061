// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Removing CRDs from the API server

use crate::crds::loader::{dedup_last_wins, load_descriptors};
use crate::crds::UninstallOptions;
use crate::error::{CrdError, Result};
use crate::kubernetes::CrdStore;
use crate::types::CrdDescriptor;
use tracing::{debug, info, instrument};

/// Load the CRDs named by `options` and delete them.
///
/// Returns the descriptors that were processed, for a later
/// [`crate::crds::wait_until_removed`].
#[instrument(skip(store, options), fields(paths = ?options.paths))]
pub async fn uninstall<S: CrdStore>(
    store: &S,
    options: &UninstallOptions,
) -> Result<Vec<CrdDescriptor>> {
    let mut descriptors = options.crds.clone();
    descriptors.extend(load_descriptors(
        options.paths.as_slice(),
        options.error_if_path_missing,
    )?);

    let descriptors = dedup_last_wins(descriptors);
    uninstall_descriptors(store, &descriptors).await?;
    Ok(descriptors)
}

/// Delete each CRD, in order.
///
/// CRDs that are already gone are skipped. Any other failure stops the run.
/// Deletion is not awaited; see [`crate::crds::wait_until_removed`].
pub async fn uninstall_descriptors<S: CrdStore>(
    store: &S,
    descriptors: &[CrdDescriptor],
) -> Result<()> {
    for crd in descriptors {
        match store.delete(crd).await {
            Ok(()) => info!("Deleted CRD {}", crd.name),
            Err(e) if e.is_not_found() => debug!("CRD {} already absent", crd.name),
            Err(source) => {
                return Err(CrdError::Delete {
                    crd: crd.id(),
                    source,
                })
            }
        }
    }

    Ok(())
}
