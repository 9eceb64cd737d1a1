// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation outcomes and upstream failures.

use serde_json::Value;
use std::fmt;

/// A failure reported by (or on the way to) the cluster API server
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamError {
    /// HTTP status of the upstream response; absent when no response was received
    pub status: Option<u16>,
    /// The upstream response body: parsed JSON, or its text when not JSON
    pub body: Value,
}

impl UpstreamError {
    /// A call that never produced an HTTP response
    pub fn unreachable(err: impl fmt::Display) -> Self {
        UpstreamError {
            status: None,
            body: Value::String(err.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// The human readable part of the upstream body
    pub fn message(&self) -> String {
        match &self.body {
            Value::String(s) => s.clone(),
            Value::Object(map) => match map.get("message").and_then(Value::as_str) {
                Some(m) if !m.is_empty() => m.to_string(),
                _ => self.body.to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "upstream returned {}: {}", code, self.message()),
            None => write!(f, "upstream unreachable: {}", self.message()),
        }
    }
}

/// Exactly one outcome per operation
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    Created(Value),
    Updated(Value),
    /// A single object, or a list when the descriptor had no name
    Found(Value),
    Deleted(Value),
    /// The delete gate did not find the resource, so nothing was deleted
    Skipped(UpstreamError),
    Failed(UpstreamError),
}

impl ReconcileOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, ReconcileOutcome::Failed(_))
    }
}
