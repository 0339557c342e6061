// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD descriptors and readiness expectations.

pub mod crd;
pub mod expectation;

pub use crd::{CrdDescriptor, CrdId, VersionEntry};
pub use expectation::Expectation;
