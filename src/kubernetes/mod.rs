// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for credential sessions and resource calls.

pub mod api;
pub mod session;

pub use api::{resource_api, Reply, ResourceApi};
pub use session::{ClusterSession, CredentialBroker};
