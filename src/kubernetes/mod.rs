// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation and the CRD store backed by it.

pub mod client;
pub mod store;

pub use client::create_client;
pub use store::{CrdStore, KubeStore};
