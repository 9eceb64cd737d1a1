// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! One-shot reconciliation against a cluster session.

pub mod engine;
pub mod scale;

pub use engine::ReconcileEngine;
pub use scale::scale;
