// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: a mocked Kubernetes API and an in-memory CRD store.

use crate::error::StoreError;
use crate::kubernetes::CrdStore;
use crate::types::{CrdDescriptor, CrdId, Expectation};
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A mock HTTP service that returns predefined responses based on method and path.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for requests matching the method and exact path
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Method and path of every request received so far
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.requests
            .lock()
            .unwrap()
            .push((method.to_string(), path.to_string()));
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let (status, body) = self
            .find_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json("path", &path)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// A CRD object as returned by the API server
pub fn crd_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "apiextensions.k8s.io/v1",
        "kind": "CustomResourceDefinition",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Discovery response for `/apis`, built from (group, version) pairs
pub fn api_group_list_json(group_versions: &[(&str, &str)]) -> String {
    let mut by_group: BTreeMap<&str, Vec<serde_json::Value>> = BTreeMap::new();
    for (group, version) in group_versions {
        by_group.entry(*group).or_default().push(serde_json::json!({
            "groupVersion": format!("{}/{}", group, version),
            "version": version
        }));
    }

    let groups: Vec<_> = by_group
        .into_iter()
        .map(|(name, versions)| {
            serde_json::json!({
                "name": name,
                "preferredVersion": versions[0].clone(),
                "versions": versions,
            })
        })
        .collect();

    serde_json::json!({
        "kind": "APIGroupList",
        "apiVersion": "v1",
        "groups": groups
    })
    .to_string()
}

/// Discovery response for `/apis/<group>/<version>`
pub fn api_resource_list_json(group_version: &str, resources: &[(&str, &str)]) -> String {
    let resources: Vec<_> = resources
        .iter()
        .map(|(plural, kind)| {
            serde_json::json!({
                "name": plural,
                "singularName": kind.to_lowercase(),
                "namespaced": true,
                "kind": kind,
                "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]
            })
        })
        .collect();

    serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": group_version,
        "resources": resources
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Directory holding the fixture CRD manifests
pub fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

#[derive(Default)]
struct FakeState {
    crds: BTreeMap<CrdId, CrdDescriptor>,
    applied: Vec<CrdId>,
    deleted: Vec<CrdId>,
    discovery_calls: usize,
    failing_applies: HashSet<CrdId>,
    failing_deletes: HashSet<CrdId>,
    failing_discoveries: usize,
    extra_served: BTreeSet<Expectation>,
}

/// In-memory [`CrdStore`].
///
/// Installed CRDs stay out of discovery for the first `ready_after` discovery
/// calls, like an API server that needs a few ticks to establish new types.
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<FakeState>>,
    ready_after: usize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide installed CRDs from the first `calls` discovery calls
    pub fn ready_after(mut self, calls: usize) -> Self {
        self.ready_after = calls;
        self
    }

    pub fn fail_apply(self, id: CrdId) -> Self {
        self.state.lock().unwrap().failing_applies.insert(id);
        self
    }

    pub fn fail_delete(self, id: CrdId) -> Self {
        self.state.lock().unwrap().failing_deletes.insert(id);
        self
    }

    /// The next `count` discovery calls fail
    pub fn fail_discoveries(self, count: usize) -> Self {
        self.state.lock().unwrap().failing_discoveries = count;
        self
    }

    /// Serve a triple regardless of installed CRDs
    pub fn serve(self, expectation: Expectation) -> Self {
        self.state.lock().unwrap().extra_served.insert(expectation);
        self
    }

    pub fn insert(&self, crd: CrdDescriptor) {
        self.state.lock().unwrap().crds.insert(crd.id(), crd);
    }

    pub fn get(&self, id: &CrdId) -> Option<CrdDescriptor> {
        self.state.lock().unwrap().crds.get(id).cloned()
    }

    pub fn installed(&self) -> Vec<CrdId> {
        self.state.lock().unwrap().crds.keys().cloned().collect()
    }

    pub fn applied(&self) -> Vec<CrdId> {
        self.state.lock().unwrap().applied.clone()
    }

    pub fn deleted(&self) -> Vec<CrdId> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn discovery_calls(&self) -> usize {
        self.state.lock().unwrap().discovery_calls
    }
}

impl CrdStore for FakeStore {
    async fn apply(&self, crd: &CrdDescriptor) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let id = crd.id();
        state.applied.push(id.clone());
        if state.failing_applies.contains(&id) {
            return Err(StoreError::Other(format!("admission webhook denied {}", id)));
        }
        state.crds.insert(id, crd.clone());
        Ok(())
    }

    async fn delete(&self, crd: &CrdDescriptor) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let id = crd.id();
        state.deleted.push(id.clone());
        if state.failing_deletes.contains(&id) {
            return Err(StoreError::Other(format!("forbidden: {}", id)));
        }
        match state.crds.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(crd.name.clone())),
        }
    }

    async fn served_resources(&self, groups: &[String]) -> Result<BTreeSet<Expectation>, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.discovery_calls += 1;
        if state.failing_discoveries > 0 {
            state.failing_discoveries -= 1;
            return Err(StoreError::Other("the server is currently unable to handle the request".to_string()));
        }

        let mut served: BTreeSet<Expectation> = state.extra_served.clone();
        if state.discovery_calls > self.ready_after {
            served.extend(state.crds.values().flat_map(Expectation::for_descriptor));
        }
        served.retain(|e| groups.contains(&e.group));
        Ok(served)
    }
}
