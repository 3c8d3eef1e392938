//! In-memory OpenShift API used by the unit and integration tests
//!
//! Documents are stored by request path. Project requests create the
//! namespace, an empty `admin` role binding and a default quota the way the
//! platform's project template does.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use super::client::{ApiReply, OpenshiftApi, Result};
use super::types::paths;

/// A request seen by the fake
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct FakeState {
    documents: HashMap<String, Value>,
    overrides: HashMap<(Method, String), ApiReply>,
    requests: Vec<RecordedRequest>,
}

#[derive(Default)]
pub struct FakeOpenshift {
    state: Mutex<FakeState>,
}

impl FakeOpenshift {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fake with an already provisioned project whose admins are `admins`
    pub fn with_project(project: &str, admins: &[&str]) -> Self {
        let fake = Self::new();
        fake.seed_project(project);
        if !admins.is_empty() {
            let mut binding = fake.document(&paths::policy_bindings(project)).unwrap_or_default();
            binding["roleBindings"][1]["roleBinding"]["userNames"] = json!(admins);
            fake.set_document(&paths::policy_bindings(project), binding);
        }
        fake
    }

    pub fn set_document(&self, path: &str, document: Value) {
        self.lock().documents.insert(path.to_string(), document);
    }

    pub fn document(&self, path: &str) -> Option<Value> {
        self.lock().documents.get(path).cloned()
    }

    /// Answer every `method` request on `path` with a fixed reply
    pub fn respond_with(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.lock()
            .overrides
            .insert((method, path.to_string()), ApiReply::new(status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn count(&self, method: &Method) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| &r.method == method)
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn seed_project(&self, project: &str) {
        let mut state = self.lock();
        seed(&mut state.documents, project);
    }
}

fn seed(documents: &mut HashMap<String, Value>, project: &str) {
    documents.insert(
        paths::namespace(project),
        json!({
            "kind": "Namespace",
            "apiVersion": "v1",
            "metadata": {"name": project, "annotations": {"openshift.io/display-name": ""}},
            "spec": {"finalizers": ["openshift.io/origin", "kubernetes"]}
        }),
    );
    documents.insert(
        paths::policy_bindings(project),
        json!({
            "kind": "PolicyBinding",
            "apiVersion": "v1",
            "metadata": {"name": ":default", "namespace": project},
            "roleBindings": [
                {"name": "system:image-pullers", "roleBinding": {
                    "userNames": null,
                    "groupNames": [format!("system:serviceaccounts:{}", project)],
                    "subjects": [{"kind": "SystemGroup", "name": format!("system:serviceaccounts:{}", project)}],
                    "roleRef": {"name": "system:image-puller"}
                }},
                {"name": "admin", "roleBinding": {
                    "userNames": null,
                    "groupNames": null,
                    "subjects": [],
                    "roleRef": {"name": "admin"}
                }}
            ]
        }),
    );
    documents.insert(
        paths::resource_quotas(project),
        json!({
            "kind": "ResourceQuotaList",
            "apiVersion": "v1",
            "items": [{
                "metadata": {"name": "compute-resources", "namespace": project},
                "spec": {"hard": {"cpu": "2", "memory": "4Gi", "pods": "20"}}
            }]
        }),
    );
}

#[async_trait]
impl OpenshiftApi for FakeOpenshift {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiReply> {
        let mut state = self.lock();
        state.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.to_string(),
            body: body.clone(),
        });

        if let Some(reply) = state.overrides.get(&(method.clone(), path.to_string())) {
            return Ok(reply.clone());
        }

        let not_found = || ApiReply::new(StatusCode::NOT_FOUND, r#"{"kind":"Status","reason":"NotFound"}"#);

        if method == Method::GET {
            return Ok(match state.documents.get(path) {
                Some(doc) => ApiReply::new(StatusCode::OK, doc.to_string()),
                None => not_found(),
            });
        }

        if method == Method::POST && path == paths::project_requests() {
            let name = body
                .as_ref()
                .and_then(|b| b["metadata"]["name"].as_str())
                .unwrap_or_default()
                .to_string();
            if state.documents.contains_key(&paths::namespace(&name)) {
                return Ok(ApiReply::new(StatusCode::CONFLICT, r#"{"reason":"AlreadyExists"}"#));
            }
            seed(&mut state.documents, &name);
            return Ok(ApiReply::new(StatusCode::CREATED, json!({"metadata": {"name": name}}).to_string()));
        }

        if method == Method::PUT {
            let body = body.unwrap_or(Value::Null);

            if let Some((list_path, name)) = path.rsplit_once('/') {
                if list_path.ends_with("/resourcequotas") {
                    let Some(list) = state.documents.get_mut(list_path) else {
                        return Ok(not_found());
                    };
                    let Some(items) = list["items"].as_array_mut() else {
                        return Ok(not_found());
                    };
                    let Some(item) = items.iter_mut().find(|i| i["metadata"]["name"] == name) else {
                        return Ok(not_found());
                    };
                    *item = body.clone();
                    return Ok(ApiReply::new(StatusCode::OK, body.to_string()));
                }
            }

            if !state.documents.contains_key(path) {
                return Ok(not_found());
            }
            state.documents.insert(path.to_string(), body.clone());
            return Ok(ApiReply::new(StatusCode::OK, body.to_string()));
        }

        Ok(ApiReply::new(StatusCode::METHOD_NOT_ALLOWED, ""))
    }
}
