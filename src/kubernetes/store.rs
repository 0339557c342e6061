// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Remote store abstraction and its Kubernetes implementation

use crate::constants::{CRD_GROUP, CRD_KIND, FIELD_MANAGER};
use crate::error::StoreError;
use crate::types::{CrdDescriptor, Expectation};
use kube::{
    api::{DeleteParams, DynamicObject, Patch, PatchParams},
    core::GroupVersionKind,
    discovery::{ApiResource, Discovery},
    Api, Client,
};
use std::collections::BTreeSet;
use std::future::Future;
use tracing::{debug, instrument};

const CRD_PLURAL: &str = "customresourcedefinitions";

/// Operations the CRD lifecycle needs from the API server.
pub trait CrdStore {
    /// Create the CRD, or update it in place if it already exists
    fn apply(&self, crd: &CrdDescriptor) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete the CRD. Returns [`StoreError::NotFound`] if it does not exist.
    fn delete(&self, crd: &CrdDescriptor) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Every (group, version, plural) currently served for the given groups
    fn served_resources(
        &self,
        groups: &[String],
    ) -> impl Future<Output = Result<BTreeSet<Expectation>, StoreError>> + Send;
}

/// [`CrdStore`] backed by a Kubernetes API server
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// CRD API for the apiextensions version the manifest was written against
    fn crd_api(&self, crd: &CrdDescriptor) -> Result<Api<DynamicObject>, StoreError> {
        let version = crd
            .api_version
            .strip_prefix(CRD_GROUP)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| {
                StoreError::Other(format!(
                    "unsupported apiVersion {} for CRD {}",
                    crd.api_version, crd.name
                ))
            })?;

        let gvk = GroupVersionKind::gvk(CRD_GROUP, version, CRD_KIND);
        let resource = ApiResource::from_gvk_with_plural(&gvk, CRD_PLURAL);
        Ok(Api::all_with(self.client.clone(), &resource))
    }
}

impl CrdStore for KubeStore {
    #[instrument(skip(self, crd), fields(crd = %crd.name))]
    async fn apply(&self, crd: &CrdDescriptor) -> Result<(), StoreError> {
        let api = self.crd_api(crd)?;
        let pp = PatchParams::apply(FIELD_MANAGER).force();

        api.patch(&crd.name, &pp, &Patch::Apply(&crd.manifest))
            .await
            .map_err(|e| from_kube_error(&crd.name, e))?;

        debug!("Applied CRD {}", crd.name);
        Ok(())
    }

    #[instrument(skip(self, crd), fields(crd = %crd.name))]
    async fn delete(&self, crd: &CrdDescriptor) -> Result<(), StoreError> {
        let api = self.crd_api(crd)?;

        api.delete(&crd.name, &DeleteParams::default())
            .await
            .map_err(|e| from_kube_error(&crd.name, e))?;

        debug!("Deleted CRD {}", crd.name);
        Ok(())
    }

    async fn served_resources(&self, groups: &[String]) -> Result<BTreeSet<Expectation>, StoreError> {
        let filter: Vec<&str> = groups.iter().map(String::as_str).collect();
        let discovery = Discovery::new(self.client.clone())
            .filter(&filter)
            .run()
            .await?;

        let mut served = BTreeSet::new();
        for group in discovery.groups() {
            for version in group.versions() {
                for (resource, _) in group.versioned_resources(version) {
                    served.insert(Expectation::new(group.name(), version, resource.plural));
                }
            }
        }

        Ok(served)
    }
}

fn from_kube_error(name: &str, error: kube::Error) -> StoreError {
    match error {
        kube::Error::Api(err) if err.code == 404 => StoreError::NotFound(name.to_string()),
        e => StoreError::Kube(e),
    }
}
