// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Uniform addressing for built-in and custom resources.

use crate::constants::networking;
use crate::error::{FacadeError, Result};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Pod, Service};
use kube::api::{ApiResource, GroupVersionKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single call against the cluster API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Read,
    List,
    Create,
    Patch,
    Delete,
    Scale,
}

/// The API subsystem that serves a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    /// `/api/v1`
    Core,
    /// `/apis/apps/v1`
    Workloads,
    /// `/apis/{group}/{version}` for caller-named custom kinds
    Dynamic,
}

/// How a full-body patch is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStrategy {
    Strategic,
    Merge,
}

#[derive(Debug)]
pub struct Route {
    pub subsystem: Subsystem,
    pub cluster_scoped: bool,
    pub verbs: &'static [Verb],
}

const CRUD: &[Verb] = &[Verb::Read, Verb::List, Verb::Create, Verb::Patch, Verb::Delete];
const CRUD_SCALE: &[Verb] = &[
    Verb::Read,
    Verb::List,
    Verb::Create,
    Verb::Patch,
    Verb::Delete,
    Verb::Scale,
];

static SERVICE_ROUTE: Route = Route {
    subsystem: Subsystem::Core,
    cluster_scoped: false,
    verbs: CRUD,
};
static DEPLOYMENT_ROUTE: Route = Route {
    subsystem: Subsystem::Workloads,
    cluster_scoped: false,
    verbs: CRUD_SCALE,
};
static POD_ROUTE: Route = Route {
    subsystem: Subsystem::Core,
    cluster_scoped: false,
    verbs: CRUD,
};
static NAMESPACE_ROUTE: Route = Route {
    subsystem: Subsystem::Core,
    cluster_scoped: true,
    verbs: CRUD,
};
static CUSTOM_ROUTE: Route = Route {
    subsystem: Subsystem::Dynamic,
    cluster_scoped: false,
    verbs: CRUD_SCALE,
};

/// Built-in kinds with a static route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuiltinKind {
    #[serde(rename = "services", alias = "service")]
    Service,
    #[serde(rename = "deployments", alias = "deployment")]
    Deployment,
    #[serde(rename = "pods", alias = "pod")]
    Pod,
    #[serde(rename = "namespaces", alias = "namespace")]
    Namespace,
}

impl BuiltinKind {
    pub fn route(self) -> &'static Route {
        match self {
            BuiltinKind::Service => &SERVICE_ROUTE,
            BuiltinKind::Deployment => &DEPLOYMENT_ROUTE,
            BuiltinKind::Pod => &POD_ROUTE,
            BuiltinKind::Namespace => &NAMESPACE_ROUTE,
        }
    }

    pub fn api_resource(self) -> ApiResource {
        match self {
            BuiltinKind::Service => ApiResource::erase::<Service>(&()),
            BuiltinKind::Deployment => ApiResource::erase::<Deployment>(&()),
            BuiltinKind::Pod => ApiResource::erase::<Pod>(&()),
            BuiltinKind::Namespace => ApiResource::erase::<Namespace>(&()),
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            BuiltinKind::Service => "services",
            BuiltinKind::Deployment => "deployments",
            BuiltinKind::Pod => "pods",
            BuiltinKind::Namespace => "namespaces",
        }
    }
}

/// API versions of a custom kind, per verb.
///
/// `read` serves read, list and delete; `write` serves create, patch and scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VersionsRepr")]
pub struct VerbVersions {
    pub read: String,
    pub write: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionsRepr {
    Single(String),
    Split { read: String, write: String },
}

impl From<VersionsRepr> for VerbVersions {
    fn from(repr: VersionsRepr) -> Self {
        match repr {
            VersionsRepr::Single(v) => VerbVersions::single(v),
            VersionsRepr::Split { read, write } => VerbVersions { read, write },
        }
    }
}

impl VerbVersions {
    pub fn single(version: impl Into<String>) -> Self {
        let version = version.into();
        VerbVersions {
            read: version.clone(),
            write: version,
        }
    }

    pub fn split(read: impl Into<String>, write: impl Into<String>) -> Self {
        VerbVersions {
            read: read.into(),
            write: write.into(),
        }
    }

    pub fn for_verb(&self, verb: Verb) -> &str {
        match verb {
            Verb::Read | Verb::List | Verb::Delete => &self.read,
            Verb::Create | Verb::Patch | Verb::Scale => &self.write,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum ResourceTarget {
    Builtin {
        kind: BuiltinKind,
    },
    Custom {
        group: String,
        plural: String,
        /// Only used to label the type; addressing goes by `plural`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        versions: VerbVersions,
    },
}

/// Address of one resource, or of a collection when `name` is absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    #[serde(flatten)]
    pub target: ResourceTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ResourceDescriptor {
    pub fn builtin(kind: BuiltinKind) -> Self {
        ResourceDescriptor {
            target: ResourceTarget::Builtin { kind },
            namespace: None,
            name: None,
        }
    }

    pub fn custom(
        group: impl Into<String>,
        plural: impl Into<String>,
        versions: VerbVersions,
    ) -> Self {
        ResourceDescriptor {
            target: ResourceTarget::Custom {
                group: group.into(),
                plural: plural.into(),
                kind: None,
                versions,
            },
            namespace: None,
            name: None,
        }
    }

    pub fn service(namespace: &str, name: &str) -> Self {
        Self::builtin(BuiltinKind::Service)
            .in_namespace(namespace)
            .named(name)
    }

    pub fn deployment(namespace: &str, name: &str) -> Self {
        Self::builtin(BuiltinKind::Deployment)
            .in_namespace(namespace)
            .named(name)
    }

    /// A mesh VirtualService, read at `v1alpha3` and written at `v1beta1`
    pub fn virtual_service(namespace: &str) -> Self {
        Self::networking(networking::VIRTUAL_SERVICES, "VirtualService").in_namespace(namespace)
    }

    /// A mesh DestinationRule, read at `v1alpha3` and written at `v1beta1`
    pub fn destination_rule(namespace: &str) -> Self {
        Self::networking(networking::DESTINATION_RULES, "DestinationRule").in_namespace(namespace)
    }

    fn networking(plural: &str, kind: &str) -> Self {
        Self::custom(
            networking::GROUP,
            plural,
            VerbVersions::split(networking::READ_VERSION, networking::WRITE_VERSION),
        )
        .with_kind(kind)
    }

    /// Record the kind of a custom resource; built-in kinds already know theirs
    pub fn with_kind(mut self, kind: &str) -> Self {
        if let ResourceTarget::Custom { kind: k, .. } = &mut self.target {
            *k = Some(kind.to_string());
        }
        self
    }

    pub fn in_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn route(&self) -> &'static Route {
        match &self.target {
            ResourceTarget::Builtin { kind } => kind.route(),
            ResourceTarget::Custom { .. } => &CUSTOM_ROUTE,
        }
    }

    pub fn plural(&self) -> &str {
        match &self.target {
            ResourceTarget::Builtin { kind } => kind.plural(),
            ResourceTarget::Custom { plural, .. } => plural,
        }
    }

    pub fn supports(&self, verb: Verb) -> bool {
        self.route().verbs.contains(&verb)
    }

    pub fn is_cluster_scoped(&self) -> bool {
        self.route().cluster_scoped
    }

    /// Custom resources do not support strategic merge
    pub fn patch_strategy(&self) -> PatchStrategy {
        match self.route().subsystem {
            Subsystem::Dynamic => PatchStrategy::Merge,
            Subsystem::Core | Subsystem::Workloads => PatchStrategy::Strategic,
        }
    }

    /// The API resource to address for `verb`
    pub fn api_resource(&self, verb: Verb) -> ApiResource {
        match &self.target {
            ResourceTarget::Builtin { kind } => kind.api_resource(),
            ResourceTarget::Custom {
                group,
                plural,
                kind,
                versions,
            } => {
                let gvk = GroupVersionKind::gvk(
                    group,
                    versions.for_verb(verb),
                    kind.as_deref().unwrap_or_default(),
                );
                ApiResource::from_gvk_with_plural(&gvk, plural)
            }
        }
    }

    /// Check that `verb` can be routed for this descriptor
    pub fn validate(&self, verb: Verb) -> Result<()> {
        if !self.supports(verb) {
            return Err(FacadeError::InvalidRequest(format!(
                "{} does not support {:?}",
                self.plural(),
                verb
            )));
        }
        if !self.is_cluster_scoped() && self.namespace.as_deref().is_none_or(str::is_empty) {
            return Err(FacadeError::InvalidRequest(format!(
                "{} is namespaced but no namespace was given",
                self.plural()
            )));
        }
        Ok(())
    }

    /// The resource name, required for every verb but list
    pub fn require_name(&self) -> Result<&str> {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(FacadeError::InvalidRequest(format!(
                "a name is required to address a single {} resource",
                self.plural()
            ))),
        }
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let ResourceTarget::Custom { group, .. } = &self.target {
            write!(f, "{}.{}", self.plural(), group)?;
        } else {
            write!(f, "{}", self.plural())?;
        }
        if let Some(ns) = &self.namespace {
            write!(f, "/{}", ns)?;
        }
        if let Some(name) = &self.name {
            write!(f, "/{}", name)?;
        }
        Ok(())
    }
}
