// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Replica updates through the scale subresource.

use crate::constants::FIELD_MANAGER;
use crate::error::{FacadeError, Result};
use crate::kubernetes::resource_api;
use crate::types::{ReconcileOutcome, ResourceDescriptor, Verb};
use kube::api::{Patch, PatchParams};
use kube::Client;
use serde_json::json;
use tracing::{info, instrument};

/// Set the replica count of a workload without touching the rest of its spec
#[instrument(skip(client, descriptor), fields(resource = %descriptor))]
pub async fn scale(
    client: &Client,
    descriptor: &ResourceDescriptor,
    replicas: i64,
) -> Result<ReconcileOutcome> {
    let replicas = i32::try_from(replicas)
        .ok()
        .filter(|r| *r >= 0)
        .ok_or_else(|| {
            FacadeError::InvalidRequest(format!(
                "replicas must be a non-negative 32-bit integer, got {}",
                replicas
            ))
        })?;
    let name = descriptor.require_name()?;
    let api = resource_api(client, descriptor, Verb::Scale)?;

    let pp = PatchParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..Default::default()
    };
    let patch = json!({ "spec": { "replicas": replicas } });

    match api.patch_scale(name, &pp, &Patch::Merge(&patch)).await? {
        Ok(scale) => {
            info!("Scaled {} to {} replicas", name, replicas);
            Ok(ReconcileOutcome::Updated(scale))
        }
        Err(err) => Ok(ReconcileOutcome::Failed(err)),
    }
}
