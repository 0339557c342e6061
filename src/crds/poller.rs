// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Polling API discovery until expected resources are (or are no longer) served

use crate::crds::WaitOptions;
use crate::error::{CrdError, Result};
use crate::kubernetes::CrdStore;
use crate::types::{CrdDescriptor, Expectation};
use std::collections::BTreeSet;
use std::fmt;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, warn};

/// What makes an expectation satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Served,
    Removed,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Served => write!(f, "served"),
            Target::Removed => write!(f, "removed"),
        }
    }
}

/// Wait until every expectation shows up in API discovery.
///
/// Discovery errors are not fatal: they count as "nothing new is served yet"
/// and the next tick tries again. A group or version that never appears
/// (a typo, for instance) therefore times out rather than failing early.
#[instrument(skip(store, expectations), fields(expected = expectations.len()))]
pub async fn wait_until_ready<S: CrdStore>(
    store: &S,
    expectations: &[Expectation],
    options: &WaitOptions,
) -> Result<()> {
    poll(store, expectations, options, Target::Served).await
}

/// Wait until every served version of the descriptors shows up in discovery
pub async fn wait_for_descriptors<S: CrdStore>(
    store: &S,
    descriptors: &[CrdDescriptor],
    options: &WaitOptions,
) -> Result<()> {
    let expectations: Vec<Expectation> = descriptors
        .iter()
        .flat_map(Expectation::for_descriptor)
        .collect();
    wait_until_ready(store, &expectations, options).await
}

/// Wait until none of the expectations is served any more.
///
/// On timeout the error lists the triples that are still served.
#[instrument(skip(store, expectations), fields(expected = expectations.len()))]
pub async fn wait_until_removed<S: CrdStore>(
    store: &S,
    expectations: &[Expectation],
    options: &WaitOptions,
) -> Result<()> {
    poll(store, expectations, options, Target::Removed).await
}

async fn poll<S: CrdStore>(
    store: &S,
    expectations: &[Expectation],
    options: &WaitOptions,
    target: Target,
) -> Result<()> {
    let mut pending: BTreeSet<Expectation> = expectations.iter().cloned().collect();
    if pending.is_empty() {
        return Ok(());
    }
    options.validate()?;

    let deadline = Instant::now() + options.max_wait;

    loop {
        let groups: Vec<String> = pending
            .iter()
            .map(|e| e.group.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        match store.served_resources(&groups).await {
            Ok(served) => pending.retain(|e| match target {
                Target::Served => !served.contains(e),
                Target::Removed => served.contains(e),
            }),
            Err(e) => warn!("Discovery failed, retrying: {}", e),
        }

        if pending.is_empty() {
            info!("All {} expected resources are {}", expectations.len(), target);
            return Ok(());
        }

        if Instant::now() >= deadline {
            return Err(CrdError::Timeout {
                pending: pending.into_iter().collect(),
            });
        }

        debug!(
            "{} resources not yet {}, next check in {:?}",
            pending.len(),
            target,
            options.poll_interval
        );
        sleep(options.poll_interval).await;
    }
}
