// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Addressing, request and outcome types.

pub mod descriptor;
pub mod operation;
pub mod outcome;

pub use descriptor::{BuiltinKind, ResourceDescriptor, ResourceTarget, Verb, VerbVersions};
pub use operation::{Operation, OperationVerb};
pub use outcome::{ReconcileOutcome, UpstreamError};
