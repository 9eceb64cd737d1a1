// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Executes inbound operations: acquire a session, reconcile, render, release.

use crate::config::Config;
use crate::error::{FacadeError, Result};
use crate::kubernetes::CredentialBroker;
use crate::reconcilers::{scale, ReconcileEngine};
use crate::response::Envelope;
use crate::types::{Operation, OperationVerb, ReconcileOutcome, Verb};
use kube::Client;
use tracing::{error, info, instrument, warn};

pub struct Facade {
    broker: CredentialBroker,
    engine: ReconcileEngine,
}

impl Facade {
    pub fn new(config: &Config) -> Self {
        Self {
            broker: CredentialBroker::new(config),
            engine: ReconcileEngine::new(config.probe_policy),
        }
    }

    /// Run one operation against the cluster named by its credential.
    ///
    /// The session is released on every path out of here; if this future is
    /// dropped mid-flight the session's drop erases the credential instead.
    #[instrument(skip(self, op), fields(verb = %op.verb, resource = %op.descriptor))]
    pub async fn execute(&self, op: Operation) -> Envelope {
        if let Err(e) = preflight(&op) {
            warn!("Rejected operation: {}", e);
            return Envelope::from_error(&e);
        }

        let mut session = match self.broker.acquire(&op.credential).await {
            Ok(session) => session,
            Err(e) => {
                error!("Failed to acquire cluster session: {}", e);
                return Envelope::from_error(&e);
            }
        };

        let result = self.run(session.client(), &op).await;

        if let Err(e) = session.release() {
            error!("Failed to release cluster session: {}", e);
        }

        let envelope = match result {
            Ok(outcome) => {
                if !outcome.is_success() {
                    warn!("Upstream rejected the operation");
                }
                Envelope::from_outcome(outcome, &op.descriptor)
            }
            Err(e) => Envelope::from_error(&e),
        };
        info!("Operation finished with code {}", envelope.code);
        envelope
    }

    /// Dispatch `op` on an already established client
    pub async fn run(&self, client: &Client, op: &Operation) -> Result<ReconcileOutcome> {
        preflight(op)?;

        match op.verb {
            OperationVerb::Apply => {
                let body = op.body.as_ref().ok_or_else(missing_body)?;
                self.engine.apply(client, &op.descriptor, body).await
            }
            OperationVerb::Get => self.engine.get(client, &op.descriptor).await,
            OperationVerb::Delete => self.engine.delete(client, &op.descriptor).await,
            OperationVerb::Scale => {
                let replicas = op.replicas.ok_or_else(missing_replicas)?;
                scale(client, &op.descriptor, replicas).await
            }
        }
    }
}

/// Checks that need no cluster and no credential
fn preflight(op: &Operation) -> Result<()> {
    let descriptor = &op.descriptor;
    match op.verb {
        OperationVerb::Apply => {
            if op.body.is_none() {
                return Err(missing_body());
            }
            descriptor.validate(Verb::Create)?;
            descriptor.validate(Verb::Patch)
        }
        OperationVerb::Get => {
            let verb = if descriptor.name.as_deref().is_some_and(|n| !n.is_empty()) {
                Verb::Read
            } else {
                Verb::List
            };
            descriptor.validate(verb)
        }
        OperationVerb::Delete => {
            descriptor.require_name()?;
            descriptor.validate(Verb::Delete)
        }
        OperationVerb::Scale => {
            if op.replicas.is_none() {
                return Err(missing_replicas());
            }
            descriptor.require_name()?;
            descriptor.validate(Verb::Scale)
        }
    }
}

fn missing_body() -> FacadeError {
    FacadeError::InvalidRequest("apply requires a body".to_string())
}

fn missing_replicas() -> FacadeError {
    FacadeError::InvalidRequest("scale requires replicas".to_string())
}
