// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

/// Failures raised before or around a cluster call.
///
/// Upstream API failures are not errors at this level: they are carried as
/// values in [`crate::types::ReconcileOutcome`] so they reach the caller verbatim.
#[derive(Error, Debug)]
pub enum FacadeError {
    #[error("Credential unusable: {0}")]
    Credential(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to encode request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FacadeError>;
