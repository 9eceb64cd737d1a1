// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-or-patch reconciliation, reads, and gated deletes.

use crate::config::ProbePolicy;
use crate::constants::FIELD_MANAGER;
use crate::error::{FacadeError, Result};
use crate::kubernetes::{resource_api, ResourceApi};
use crate::types::descriptor::PatchStrategy;
use crate::types::{ReconcileOutcome, ResourceDescriptor, UpstreamError, Verb};
use kube::api::{DeleteParams, Patch, PatchParams, PostParams};
use kube::Client;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// What the read step learned about the target
#[derive(Debug)]
enum Probe {
    Exists,
    NotFound,
    Other(UpstreamError),
}

/// One reconciliation algorithm for every kind a descriptor can address
#[derive(Debug, Clone, Default)]
pub struct ReconcileEngine {
    probe_policy: ProbePolicy,
}

impl ReconcileEngine {
    pub fn new(probe_policy: ProbePolicy) -> Self {
        Self { probe_policy }
    }

    /// Create the resource if absent, patch it with `body` if present.
    ///
    /// The stored object is never compared with `body`; existence alone picks
    /// the branch. `body` is sent as given on both branches.
    #[instrument(skip(self, client, descriptor, body), fields(resource = %descriptor))]
    pub async fn apply(
        &self,
        client: &Client,
        descriptor: &ResourceDescriptor,
        body: &Value,
    ) -> Result<ReconcileOutcome> {
        let name = apply_name(descriptor, body)?;

        let reader = resource_api(client, descriptor, Verb::Read)?;
        let creator = resource_api(client, descriptor, Verb::Create)?;
        let patcher = resource_api(client, descriptor, Verb::Patch)?;

        match self.probe(&reader, &name).await? {
            Probe::Exists => {
                debug!("{} exists, patching", name);
                patch(&patcher, descriptor.patch_strategy(), &name, body).await
            }
            Probe::NotFound => {
                debug!("{} not found, creating", name);
                create(&creator, &name, body).await
            }
            Probe::Other(err) => match self.probe_policy {
                ProbePolicy::Strict => {
                    warn!("Existence check for {} failed: {}", name, err);
                    Ok(ReconcileOutcome::Failed(err))
                }
                ProbePolicy::Legacy => {
                    warn!(
                        "Existence check for {} failed ({}), attempting create",
                        name, err
                    );
                    create(&creator, &name, body).await
                }
            },
        }
    }

    /// Read the named resource, or list the collection when no name is given
    #[instrument(skip(self, client, descriptor), fields(resource = %descriptor))]
    pub async fn get(
        &self,
        client: &Client,
        descriptor: &ResourceDescriptor,
    ) -> Result<ReconcileOutcome> {
        let reply = match descriptor.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => resource_api(client, descriptor, Verb::Read)?.get(name).await?,
            None => resource_api(client, descriptor, Verb::List)?.list().await?,
        };

        Ok(match reply {
            Ok(body) => ReconcileOutcome::Found(body),
            Err(err) => ReconcileOutcome::Failed(err),
        })
    }

    /// Delete the named resource, but only after a read confirms it exists
    #[instrument(skip(self, client, descriptor), fields(resource = %descriptor))]
    pub async fn delete(
        &self,
        client: &Client,
        descriptor: &ResourceDescriptor,
    ) -> Result<ReconcileOutcome> {
        let name = descriptor.require_name()?;
        let deleter = resource_api(client, descriptor, Verb::Delete)?;

        match self.get(client, descriptor).await? {
            ReconcileOutcome::Found(_) => {}
            ReconcileOutcome::Failed(err) if err.is_not_found() => {
                info!("{} not present, skipping delete", name);
                return Ok(ReconcileOutcome::Skipped(err));
            }
            other => return Ok(other),
        }

        match deleter.delete(name, &DeleteParams::default()).await? {
            Ok(body) => {
                info!("{} deleted", name);
                Ok(ReconcileOutcome::Deleted(body))
            }
            Err(err) => Ok(ReconcileOutcome::Failed(err)),
        }
    }

    async fn probe(&self, api: &ResourceApi, name: &str) -> Result<Probe> {
        Ok(match api.get(name).await? {
            Ok(_) => Probe::Exists,
            Err(err) if err.is_not_found() => Probe::NotFound,
            Err(err) => Probe::Other(err),
        })
    }
}

async fn create(api: &ResourceApi, name: &str, body: &Value) -> Result<ReconcileOutcome> {
    let pp = PostParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..Default::default()
    };

    match api.create(&pp, body).await? {
        Ok(created) => {
            info!("Created {}", name);
            Ok(ReconcileOutcome::Created(created))
        }
        Err(err) => Ok(ReconcileOutcome::Failed(err)),
    }
}

async fn patch(
    api: &ResourceApi,
    strategy: PatchStrategy,
    name: &str,
    body: &Value,
) -> Result<ReconcileOutcome> {
    let pp = PatchParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..Default::default()
    };
    let patch = match strategy {
        PatchStrategy::Strategic => Patch::Strategic(body),
        PatchStrategy::Merge => Patch::Merge(body),
    };

    match api.patch(name, &pp, &patch).await? {
        Ok(updated) => {
            info!("Updated {}", name);
            Ok(ReconcileOutcome::Updated(updated))
        }
        Err(err) => Ok(ReconcileOutcome::Failed(err)),
    }
}

/// The name both the existence check and the write address.
///
/// Taken from the descriptor, or from `metadata.name` when the descriptor has
/// none. When both are set they must agree.
fn apply_name(descriptor: &ResourceDescriptor, body: &Value) -> Result<String> {
    if !body.is_object() {
        return Err(FacadeError::InvalidRequest(
            "apply requires a JSON object body".to_string(),
        ));
    }
    let body_name = body["metadata"]["name"].as_str().filter(|n| !n.is_empty());

    match (descriptor.name.as_deref().filter(|n| !n.is_empty()), body_name) {
        (Some(named), Some(in_body)) if named != in_body => {
            Err(FacadeError::InvalidRequest(format!(
                "descriptor names {} but metadata.name is {}",
                named, in_body
            )))
        }
        (Some(name), _) | (None, Some(name)) => Ok(name.to_string()),
        (None, None) => Err(FacadeError::InvalidRequest(format!(
            "no name for {}: set it on the descriptor or in metadata.name",
            descriptor.plural()
        ))),
    }
}
