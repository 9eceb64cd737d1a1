// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory fake of the Kubernetes API server for tests.
//!
//! Objects are keyed by group, plural, namespace and name; the API version in
//! the request path is ignored, so an object created at one version can be
//! read back at another, like a CRD served under two versions.

use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type ObjectKey = (String, String, Option<String>, String);

/// A request as received by the fake
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct State {
    objects: BTreeMap<ObjectKey, Value>,
    canned: HashMap<(String, String), (u16, String)>,
    requests: Vec<RecordedRequest>,
    next_uid: u64,
}

#[derive(Debug)]
struct Target {
    group: String,
    plural: String,
    namespace: Option<String>,
    name: Option<String>,
    subresource: Option<String>,
}

/// A stateful mock HTTP service speaking enough of the Kubernetes API for
/// get, list, create, patch, delete and the scale subresource.
#[derive(Clone, Default)]
pub struct FakeApiServer {
    state: Arc<Mutex<State>>,
}

impl FakeApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object as if it had been created earlier
    pub fn with_object(
        self,
        group: &str,
        plural: &str,
        namespace: Option<&str>,
        object: Value,
    ) -> Self {
        let name = object["metadata"]["name"].as_str().unwrap().to_string();
        self.state.lock().unwrap().objects.insert(
            (
                group.to_string(),
                plural.to_string(),
                namespace.map(str::to_string),
                name,
            ),
            object,
        );
        self
    }

    /// Answer every `method` request on `plural` with an error Status
    pub fn failing(self, method: &str, plural: &str, code: u16, reason: &str) -> Self {
        let body = json!({
            "kind": "Status",
            "apiVersion": "v1",
            "status": "Failure",
            "message": format!("{} {} failed: {}", method, plural, reason),
            "reason": reason,
            "code": code
        });
        self.responding(method, plural, code, &body.to_string())
    }

    /// Answer every `method` request on `plural` with exactly `body`
    pub fn responding(self, method: &str, plural: &str, code: u16, body: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .canned
            .insert((method.to_string(), plural.to_string()), (code, body.to_string()));
        self
    }

    /// Build a kube Client backed by this fake
    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    pub fn object(
        &self,
        group: &str,
        plural: &str,
        namespace: Option<&str>,
        name: &str,
    ) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .objects
            .get(&(
                group.to_string(),
                plural.to_string(),
                namespace.map(str::to_string),
                name.to_string(),
            ))
            .cloned()
    }

    fn respond(&self, method: &str, path: &str, body: Option<Value>) -> (u16, String) {
        let canned = parse_path(path).and_then(|target| {
            self.state
                .lock()
                .unwrap()
                .canned
                .get(&(method.to_string(), target.plural))
                .cloned()
        });
        match canned {
            Some(response) => response,
            None => {
                let (status, body) = self.handle(method, path, body);
                (status, body.to_string())
            }
        }
    }

    fn handle(&self, method: &str, path: &str, body: Option<Value>) -> (u16, Value) {
        let Some(target) = parse_path(path) else {
            return (404, not_found_json("path", path));
        };

        let mut state = self.state.lock().unwrap();

        let key = |name: &str| {
            (
                target.group.clone(),
                target.plural.clone(),
                target.namespace.clone(),
                name.to_string(),
            )
        };

        match (method, target.name.as_deref(), target.subresource.as_deref()) {
            ("GET", Some(name), None) => match state.objects.get(&key(name)) {
                Some(obj) => (200, obj.clone()),
                None => (404, not_found_json(&target.plural, name)),
            },
            ("GET", None, None) => {
                let items: Vec<Value> = state
                    .objects
                    .iter()
                    .filter(|((g, p, ns, _), _)| {
                        *g == target.group
                            && *p == target.plural
                            && (target.namespace.is_none() || *ns == target.namespace)
                    })
                    .map(|(_, v)| v.clone())
                    .collect();
                (200, list_json(items))
            }
            ("POST", None, None) => {
                let mut obj = body.unwrap_or(Value::Null);
                let Some(name) = obj["metadata"]["name"].as_str().map(str::to_string) else {
                    return (422, invalid_json("metadata.name: Required value"));
                };
                if state.objects.contains_key(&key(&name)) {
                    return (409, already_exists_json(&target.plural, &name));
                }
                state.next_uid += 1;
                let uid = format!("uid-{}", state.next_uid);
                let meta = &mut obj["metadata"];
                if let Some(ns) = &target.namespace {
                    meta["namespace"] = json!(ns);
                }
                meta["uid"] = json!(uid);
                meta["resourceVersion"] = json!("1");
                state.objects.insert(key(&name), obj.clone());
                (201, obj)
            }
            ("PATCH", Some(name), None) => match state.objects.get_mut(&key(name)) {
                Some(obj) => {
                    merge(obj, &body.unwrap_or(Value::Null));
                    (200, obj.clone())
                }
                None => (404, not_found_json(&target.plural, name)),
            },
            ("PATCH", Some(name), Some("scale")) => match state.objects.get_mut(&key(name)) {
                Some(obj) => {
                    let replicas = body
                        .as_ref()
                        .and_then(|b| b["spec"]["replicas"].as_i64())
                        .unwrap_or(0);
                    obj["spec"]["replicas"] = json!(replicas);
                    (200, scale_json(name, target.namespace.as_deref(), replicas))
                }
                None => (404, not_found_json(&target.plural, name)),
            },
            ("DELETE", Some(name), None) => match state.objects.remove(&key(name)) {
                Some(obj) => (200, obj),
                None => (404, not_found_json(&target.plural, name)),
            },
            _ => (405, invalid_json("method not allowed")),
        }
    }
}

impl Service<Request<Body>> for FakeApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let server = self.clone();
        let (parts, body) = req.into_parts();

        Box::pin(async move {
            let bytes = body.collect().await?.to_bytes();
            let body: Option<Value> = serde_json::from_slice(&bytes).ok();
            let method = parts.method.to_string();
            let path = parts.uri.path().to_string();
            let content_type = parts
                .headers
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            server.state.lock().unwrap().requests.push(RecordedRequest {
                method: method.clone(),
                path: path.clone(),
                content_type,
                body: body.clone(),
            });

            let (status, body) = server.respond(&method, &path, body);

            Ok::<_, tower::BoxError>(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

fn parse_path(path: &str) -> Option<Target> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let (group, rest) = match segments.as_slice() {
        ["api", _version, rest @ ..] => ("", rest),
        ["apis", group, _version, rest @ ..] => (*group, rest),
        _ => return None,
    };
    let (namespace, rest) = match rest {
        ["namespaces", ns, rest @ ..] if !rest.is_empty() => (Some(ns.to_string()), rest),
        _ => (None, rest),
    };
    let (plural, name, subresource) = match rest {
        [plural] => (*plural, None, None),
        [plural, name] => (*plural, Some(*name), None),
        [plural, name, sub] => (*plural, Some(*name), Some(*sub)),
        _ => return None,
    };

    Some(Target {
        group: group.to_string(),
        plural: plural.to_string(),
        namespace,
        name: name.map(str::to_string),
        subresource: subresource.map(str::to_string),
    })
}

/// JSON merge patch; strategic merge degrades to this for the fields tests touch
fn merge(target: &mut Value, patch: &Value) {
    match patch {
        Value::Object(fields) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            let Value::Object(existing) = target else {
                return;
            };
            for (k, v) in fields {
                if v.is_null() {
                    existing.remove(k);
                } else {
                    merge(existing.entry(k.clone()).or_insert(Value::Null), v);
                }
            }
        }
        other => *target = other.clone(),
    }
}

fn list_json(items: Vec<Value>) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "List",
        "metadata": { "resourceVersion": "1" },
        "items": items
    })
}

fn scale_json(name: &str, namespace: Option<&str>, replicas: i64) -> Value {
    json!({
        "apiVersion": "autoscaling/v1",
        "kind": "Scale",
        "metadata": { "name": name, "namespace": namespace },
        "spec": { "replicas": replicas },
        "status": { "replicas": replicas }
    })
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
}

fn already_exists_json(resource: &str, name: &str) -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" already exists", resource, name),
        "reason": "AlreadyExists",
        "code": 409
    })
}

fn invalid_json(message: &str) -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": "Invalid",
        "code": 422
    })
}

/// A minimal Service body
pub fn service_json(name: &str, port: u16) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": { "name": name },
        "spec": {
            "selector": { "app": name },
            "ports": [{ "port": port }]
        }
    })
}

/// A minimal Deployment body
pub fn deployment_json(name: &str, replicas: i64) -> Value {
    json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": { "name": name },
        "spec": {
            "replicas": replicas,
            "selector": { "matchLabels": { "app": name } },
            "template": {
                "metadata": { "labels": { "app": name } },
                "spec": { "containers": [{ "name": name, "image": "nginx" }] }
            }
        }
    })
}
