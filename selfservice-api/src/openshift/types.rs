//! OpenShift documents touched by the portal
//!
//! Only the fields the portal reads or writes are typed. Everything else is
//! kept in `extra` so a whole document can be PUT back without losing data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const ADMIN_ROLE: &str = "admin";

pub const BILLING_ANNOTATION: &str = "openshift.io/kontierung-element";
pub const REQUESTER_ANNOTATION: &str = "openshift.io/requester";
pub const MEGAID_ANNOTATION: &str = "openshift.io/MEGAID";

/// Platform serializes empty lists as `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /oapi/v1/projectrequests`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub kind: String,
    pub api_version: String,
    pub metadata: ObjectMeta,
}

impl ProjectRequest {
    pub fn new(name: &str) -> Self {
        Self {
            kind: "ProjectRequest".to_string(),
            api_version: "v1".to_string(),
            metadata: ObjectMeta {
                name: name.to_string(),
                ..Default::default()
            },
        }
    }
}

/// Metadata block common to all documents
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `policybindings/:default` of a project
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyBinding {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role_bindings: Vec<NamedRoleBinding>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PolicyBinding {
    pub fn admin(&self) -> Option<&RoleBinding> {
        self.role_bindings
            .iter()
            .find(|rb| rb.name == ADMIN_ROLE)
            .map(|rb| &rb.role_binding)
    }

    pub fn admin_mut(&mut self) -> Option<&mut RoleBinding> {
        self.role_bindings
            .iter_mut()
            .find(|rb| rb.name == ADMIN_ROLE)
            .map(|rb| &mut rb.role_binding)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamedRoleBinding {
    pub name: String,
    #[serde(default)]
    pub role_binding: RoleBinding,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoleBinding {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_names: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subjects: Vec<Subject>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoleBinding {
    pub fn has_user(&self, username: &str) -> bool {
        let wanted = username.to_lowercase();
        self.user_names.iter().any(|u| u.to_lowercase() == wanted)
    }
}

/// Structured grantee reference
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Subject {
    pub kind: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subject {
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: "User".to_string(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// `GET /api/v1/namespaces/{project}/resourcequotas`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResourceQuotaList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ResourceQuota>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResourceQuota {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ResourceQuotaSpec,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResourceQuotaSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hard: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /api/v1/namespaces/{project}`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Namespace {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Namespace {
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(key))
            .map(String::as_str)
    }

    pub fn annotations_mut(&mut self) -> &mut BTreeMap<String, String> {
        self.metadata.annotations.get_or_insert_with(BTreeMap::new)
    }
}

/// API paths. Caller-supplied segments are percent-encoded.
pub mod paths {
    use urlencoding::encode;

    pub fn project_requests() -> String {
        "/oapi/v1/projectrequests".to_string()
    }

    pub fn policy_bindings(project: &str) -> String {
        format!("/oapi/v1/namespaces/{}/policybindings/:default", encode(project))
    }

    pub fn resource_quotas(project: &str) -> String {
        format!("/api/v1/namespaces/{}/resourcequotas", encode(project))
    }

    pub fn resource_quota(project: &str, name: &str) -> String {
        format!(
            "/api/v1/namespaces/{}/resourcequotas/{}",
            encode(project),
            encode(name)
        )
    }

    pub fn namespace(project: &str) -> String {
        format!("/api/v1/namespaces/{}", encode(project))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_has_user_folds_non_ascii_case() {
        let binding = RoleBinding {
            user_names: vec!["Jürg".to_string()],
            ..Default::default()
        };

        assert!(binding.has_user("JÜRG"));
        assert!(binding.has_user("jürg"));
        assert!(!binding.has_user("jurg"));
    }

    #[test]
    fn test_paths_encode_project_segment() {
        assert_eq!(paths::namespace("demo"), "/api/v1/namespaces/demo");
        assert_eq!(
            paths::namespace("../secrets?watch=1#x"),
            "/api/v1/namespaces/..%2Fsecrets%3Fwatch%3D1%23x"
        );
        assert_eq!(
            paths::policy_bindings("a/b"),
            "/oapi/v1/namespaces/a%2Fb/policybindings/:default"
        );
        assert_eq!(
            paths::resource_quota("a b", "compute/x"),
            "/api/v1/namespaces/a%20b/resourcequotas/compute%2Fx"
        );
    }

    #[test]
    fn test_policy_binding_keeps_unknown_fields() {
        let raw = json!({
            "kind": "PolicyBinding",
            "metadata": {"name": ":default", "resourceVersion": "42"},
            "roleBindings": [
                {"name": "view", "roleBinding": {"userNames": ["bob"], "subjects": [], "roleRef": {"name": "view"}}},
                {"name": "admin", "roleBinding": {"userNames": null, "subjects": null}}
            ]
        });

        let binding: PolicyBinding = serde_json::from_value(raw).unwrap();
        assert_eq!(binding.role_bindings.len(), 2);
        assert!(binding.admin().unwrap().user_names.is_empty());

        let back = serde_json::to_value(&binding).unwrap();
        assert_eq!(back["kind"], "PolicyBinding");
        assert_eq!(back["metadata"]["resourceVersion"], "42");
        assert_eq!(back["roleBindings"][0]["roleBinding"]["roleRef"]["name"], "view");
    }

    #[test]
    fn test_has_user_ignores_case() {
        let rb = RoleBinding {
            user_names: vec!["Alice".to_string()],
            ..Default::default()
        };
        assert!(rb.has_user("alice"));
        assert!(rb.has_user("ALICE"));
        assert!(!rb.has_user("bob"));
    }

    #[test]
    fn test_project_request_body() {
        let body = serde_json::to_value(ProjectRequest::new("demo")).unwrap();
        assert_eq!(body, json!({"kind": "ProjectRequest", "apiVersion": "v1", "metadata": {"name": "demo"}}));
    }

    #[test]
    fn test_namespace_without_annotations() {
        let mut ns: Namespace =
            serde_json::from_value(json!({"metadata": {"name": "demo"}})).unwrap();
        assert!(ns.annotation(BILLING_ANNOTATION).is_none());
        ns.annotations_mut()
            .insert(BILLING_ANNOTATION.to_string(), "1234".to_string());
        assert_eq!(ns.annotation(BILLING_ANNOTATION), Some("1234"));
    }
}
