// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The caller-facing result envelope.

use crate::constants::codes;
use crate::error::FacadeError;
use crate::types::{ReconcileOutcome, ResourceDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    /// Render an outcome; upstream failures keep the upstream body verbatim in `data`
    pub fn from_outcome(outcome: ReconcileOutcome, descriptor: &ResourceDescriptor) -> Self {
        match outcome {
            ReconcileOutcome::Created(body) => Envelope {
                code: codes::CREATED,
                message: format!("{} Create succeed", object_name(&body, descriptor)),
                data: Some(body),
            },
            ReconcileOutcome::Updated(body) => Envelope {
                code: codes::UPDATED,
                message: format!("{} Update succeed", object_name(&body, descriptor)),
                data: Some(body),
            },
            ReconcileOutcome::Found(body) => Envelope {
                code: codes::FOUND,
                message: "Read succeed".to_string(),
                data: Some(body),
            },
            ReconcileOutcome::Deleted(body) => Envelope {
                code: codes::DELETED,
                message: format!("{} Delete succeed", object_name(&body, descriptor)),
                data: Some(body),
            },
            ReconcileOutcome::Skipped(err) => Envelope {
                code: codes::SKIPPED,
                message: format!(
                    "{} not present, delete skipped",
                    descriptor.name.as_deref().unwrap_or_default()
                ),
                data: Some(err.body),
            },
            ReconcileOutcome::Failed(err) => Envelope {
                code: codes::UPSTREAM_FAILURE,
                message: err.message(),
                data: Some(err.body),
            },
        }
    }

    pub fn from_error(err: &FacadeError) -> Self {
        let code = match err {
            FacadeError::Credential(_) => codes::CREDENTIAL_ERROR,
            FacadeError::InvalidRequest(_) | FacadeError::Serialization(_) => {
                codes::INVALID_REQUEST
            }
        };
        Envelope {
            code,
            message: err.to_string(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code < 2000
    }
}

fn object_name<'a>(body: &'a Value, descriptor: &'a ResourceDescriptor) -> &'a str {
    body["metadata"]["name"]
        .as_str()
        .or(descriptor.name.as_deref())
        .unwrap_or_default()
}
