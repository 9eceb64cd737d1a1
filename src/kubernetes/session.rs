// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-request cluster sessions built from caller-supplied kubeconfigs.
//!
//! Every acquisition materializes its credential into its own uniquely named,
//! owner-only file. The file lives exactly as long as the session: it is
//! removed on [`ClusterSession::release`], or on drop if the owning operation
//! panicked or was cancelled before releasing.

use crate::config::Config;
use crate::constants::client::CREDENTIAL_FILE_PREFIX;
use crate::error::{FacadeError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, instrument, warn};

/// Turns credential blobs into isolated, disposable cluster sessions
#[derive(Debug, Clone)]
pub struct CredentialBroker {
    credential_dir: PathBuf,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl CredentialBroker {
    pub fn new(config: &Config) -> Self {
        Self {
            credential_dir: config.credential_dir.clone(),
            connect_timeout: config.connect_timeout,
            read_timeout: config.read_timeout,
        }
    }

    /// Materialize `blob` and build a client from it.
    ///
    /// Only local failures (unparseable kubeconfig, missing context, bad
    /// certificates) are reported here. A credential the server rejects fails
    /// on the first cluster call instead.
    #[instrument(skip(self, blob))]
    pub async fn acquire(&self, blob: &str) -> Result<ClusterSession> {
        if blob.trim().is_empty() {
            return Err(FacadeError::Credential("credential is empty".to_string()));
        }

        let material = self.materialize(blob)?;
        // On error `material` is dropped here, which removes the file.
        let client = self.client_from_file(material.path()).await?;

        debug!("Materialized credential at {}", material.path().display());

        Ok(ClusterSession {
            client,
            material: Some(material),
        })
    }

    fn materialize(&self, blob: &str) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix(CREDENTIAL_FILE_PREFIX)
            .suffix(".kubeconfig")
            .tempfile_in(&self.credential_dir)
            .map_err(|e| {
                FacadeError::Credential(format!(
                    "Failed to create credential file in {}: {}",
                    self.credential_dir.display(),
                    e
                ))
            })?;

        file.write_all(blob.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| FacadeError::Credential(format!("Failed to write credential: {}", e)))?;

        Ok(file)
    }

    async fn client_from_file(&self, path: &Path) -> Result<Client> {
        let kubeconfig = Kubeconfig::read_from(path)
            .map_err(|e| FacadeError::Credential(format!("Failed to parse kubeconfig: {}", e)))?;

        let mut client_config =
            KConfig::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(|e| {
                    FacadeError::Credential(format!("Failed to create config: {}", e))
                })?;
        client_config.connect_timeout = Some(self.connect_timeout);
        client_config.read_timeout = Some(self.read_timeout);

        Client::try_from(client_config)
            .map_err(|e| FacadeError::Credential(format!("Failed to create client: {}", e)))
    }
}

/// A cluster client plus the credential material it was built from.
///
/// Owned by exactly one operation and never shared.
pub struct ClusterSession {
    client: Client,
    material: Option<NamedTempFile>,
}

impl ClusterSession {
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Location of the materialized credential, until released
    pub fn credential_path(&self) -> Option<&Path> {
        self.material.as_ref().map(NamedTempFile::path)
    }

    /// Erase the credential material. Calling it again is a no-op.
    pub fn release(&mut self) -> Result<()> {
        let Some(material) = self.material.take() else {
            return Ok(());
        };
        let path = material.path().to_path_buf();

        material.close().map_err(|e| {
            FacadeError::Credential(format!(
                "Failed to remove credential file {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!("Released credential at {}", path.display());
        Ok(())
    }
}

impl Drop for ClusterSession {
    fn drop(&mut self) {
        if let Some(material) = &self.material {
            warn!(
                "Session dropped before release, removing {}",
                material.path().display()
            );
        }
    }
}
