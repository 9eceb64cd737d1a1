// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::descriptor::ResourceDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationVerb {
    Apply,
    Get,
    Delete,
    Scale,
}

impl fmt::Display for OperationVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            OperationVerb::Apply => "apply",
            OperationVerb::Get => "get",
            OperationVerb::Delete => "delete",
            OperationVerb::Scale => "scale",
        };
        f.write_str(verb)
    }
}

/// One inbound request against one cluster
#[derive(Clone, Serialize, Deserialize)]
pub struct Operation {
    pub verb: OperationVerb,
    /// Kubeconfig document for the target cluster
    pub credential: String,
    pub descriptor: ResourceDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i64>,
}

// Keeps the credential out of logs
impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("verb", &self.verb)
            .field("credential", &"<redacted>")
            .field("descriptor", &self.descriptor)
            .field("body", &self.body.as_ref().map(|_| "<body>"))
            .field("replicas", &self.replicas)
            .finish()
    }
}
