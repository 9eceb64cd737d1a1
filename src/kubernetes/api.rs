// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource calls for a descriptor and verb.
//!
//! Requests are built with kube's request builder and sent through the
//! client's service stack, but response bodies are read here as raw bytes so
//! upstream documents reach the caller exactly as the API server wrote them.

use crate::error::{FacadeError, Result};
use crate::types::{ResourceDescriptor, UpstreamError, Verb};
use http_body_util::BodyExt;
use kube::api::{
    DeleteParams, DynamicObject, GetParams, ListParams, Patch, PatchParams, PostParams,
};
use kube::client::Body;
use kube::core::Request;
use kube::{Client, Resource};
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

/// The upstream answer to one call: the response document, or the failure
pub type Reply = std::result::Result<Value, UpstreamError>;

/// Calls against one resource collection at one API version
pub struct ResourceApi {
    client: Client,
    request: Request,
}

/// Build the handle serving `verb` for `descriptor`.
///
/// Built-in and custom kinds differ only in where the `ApiResource` comes
/// from; both are addressed as `DynamicObject` paths.
pub fn resource_api(
    client: &Client,
    descriptor: &ResourceDescriptor,
    verb: Verb,
) -> Result<ResourceApi> {
    descriptor.validate(verb)?;
    Ok(ResourceApi {
        client: client.clone(),
        request: Request::new(collection_path(descriptor, verb)),
    })
}

fn collection_path(descriptor: &ResourceDescriptor, verb: Verb) -> String {
    let namespace = descriptor
        .namespace
        .as_deref()
        .filter(|_| !descriptor.is_cluster_scoped());
    DynamicObject::url_path(&descriptor.api_resource(verb), namespace)
}

impl ResourceApi {
    pub async fn get(&self, name: &str) -> Result<Reply> {
        let req = self
            .request
            .get(name, &GetParams::default())
            .map_err(build_error)?;
        Ok(self.send(req).await)
    }

    pub async fn list(&self) -> Result<Reply> {
        let req = self
            .request
            .list(&ListParams::default())
            .map_err(build_error)?;
        Ok(self.send(req).await)
    }

    /// POST `body` as given; nothing in it is reinterpreted
    pub async fn create(&self, pp: &PostParams, body: &Value) -> Result<Reply> {
        let req = self
            .request
            .create(pp, serde_json::to_vec(body)?)
            .map_err(build_error)?;
        Ok(self.send(req).await)
    }

    pub async fn patch<P: Serialize>(
        &self,
        name: &str,
        pp: &PatchParams,
        patch: &Patch<P>,
    ) -> Result<Reply> {
        let req = self.request.patch(name, pp, patch).map_err(build_error)?;
        Ok(self.send(req).await)
    }

    pub async fn delete(&self, name: &str, dp: &DeleteParams) -> Result<Reply> {
        let req = self.request.delete(name, dp).map_err(build_error)?;
        Ok(self.send(req).await)
    }

    pub async fn patch_scale<P: Serialize>(
        &self,
        name: &str,
        pp: &PatchParams,
        patch: &Patch<P>,
    ) -> Result<Reply> {
        let req = self
            .request
            .patch_subresource("scale", name, pp, patch)
            .map_err(build_error)?;
        Ok(self.send(req).await)
    }

    async fn send(&self, request: http::Request<Vec<u8>>) -> Reply {
        trace!("{} {}", request.method(), request.uri());
        let response = self
            .client
            .send(request.map(Body::from))
            .await
            .map_err(UpstreamError::unreachable)?;

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(UpstreamError::unreachable)?
            .to_bytes();
        let body = decode(&bytes);

        if status.is_success() {
            Ok(body)
        } else {
            Err(UpstreamError {
                status: Some(status.as_u16()),
                body,
            })
        }
    }
}

/// JSON bodies as parsed; anything else as its text
fn decode(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn build_error(err: kube::core::request::Error) -> FacadeError {
    FacadeError::InvalidRequest(err.to_string())
}
