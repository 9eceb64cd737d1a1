// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::client::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

/// How the apply path treats a read failure that is not a 404
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbePolicy {
    /// Only a 404 leads to create; any other read failure is reported as is
    #[default]
    Strict,
    /// Every read failure leads to create, and the create's failure is reported
    Legacy,
}

impl FromStr for ProbePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ProbePolicy::Strict),
            "legacy" => Ok(ProbePolicy::Legacy),
            other => bail!("unknown probe policy '{}', expected 'strict' or 'legacy'", other),
        }
    }
}

/// Facade configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where per-request kubeconfig files are materialized
    pub credential_dir: PathBuf,
    pub probe_policy: ProbePolicy,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            credential_dir: env::temp_dir(),
            probe_policy: ProbePolicy::default(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let credential_dir = env::var_os("KUBEFACADE_CREDENTIAL_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.credential_dir);

        let probe_policy = match env::var("KUBEFACADE_PROBE_POLICY") {
            Ok(v) => v.parse().context("KUBEFACADE_PROBE_POLICY is invalid")?,
            Err(_) => defaults.probe_policy,
        };

        let connect_timeout = seconds_from_env("KUBEFACADE_CONNECT_TIMEOUT_SECS")?
            .unwrap_or(defaults.connect_timeout);
        let read_timeout =
            seconds_from_env("KUBEFACADE_READ_TIMEOUT_SECS")?.unwrap_or(defaults.read_timeout);

        Ok(Config {
            credential_dir,
            probe_policy,
            connect_timeout,
            read_timeout,
        })
    }
}

fn seconds_from_env(name: &str) -> Result<Option<Duration>> {
    match env::var(name) {
        Ok(v) => {
            let secs: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", name))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}
