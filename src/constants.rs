// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The field manager recorded on create and patch calls
pub const FIELD_MANAGER: &str = "kubefacade";

/// Result envelope codes
pub mod codes {
    pub const CREATED: i32 = 1000;
    pub const UPDATED: i32 = 1001;
    pub const FOUND: i32 = 1002;
    /// Delete gate did not find the resource, nothing was deleted
    pub const SKIPPED: i32 = 1003;
    pub const DELETED: i32 = 1004;
    pub const INVALID_REQUEST: i32 = 2001;
    pub const CREDENTIAL_ERROR: i32 = 2002;
    /// Any failure reported by the cluster API server
    pub const UPSTREAM_FAILURE: i32 = 2999;
}

/// Custom networking kinds served by the mesh control plane
pub mod networking {
    pub const GROUP: &str = "networking.istio.io";
    pub const VIRTUAL_SERVICES: &str = "virtualservices";
    pub const DESTINATION_RULES: &str = "destinationrules";
    /// Version used to read, list and delete
    pub const READ_VERSION: &str = "v1alpha3";
    /// Version used to create, patch and scale
    pub const WRITE_VERSION: &str = "v1beta1";
}

/// Client defaults
pub mod client {
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;
    pub const READ_TIMEOUT_SECS: u64 = 30;
    /// Prefix of materialized credential files
    pub const CREDENTIAL_FILE_PREFIX: &str = "kubefacade-";
}
