//! Project admin checks and grants
//!
//! Admin rights live in the `admin` entry of the project's
//! `policybindings/:default` document.

use selfservice_common::{messages, Error, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::client::OpenshiftApi;
use super::types::{paths, PolicyBinding, Subject};
use super::{fetch_document, store_document};

pub struct PermissionGate {
    api: Arc<dyn OpenshiftApi>,
}

impl PermissionGate {
    pub fn new(api: Arc<dyn OpenshiftApi>) -> Self {
        Self { api }
    }

    /// Succeeds if `username` is listed in the project's admin role binding,
    /// compared case-insensitively.
    pub async fn check_admin(&self, username: &str, project: &str) -> Result<()> {
        let binding: PolicyBinding =
            match fetch_document(self.api.as_ref(), username, &paths::policy_bindings(project)).await {
                Ok(binding) => binding,
                Err(e) => {
                    warn!(user = username, project, "Unable to load policy bindings: {}", e);
                    return Err(Error::NotFound(messages::PROJECT_NOT_FOUND.to_string()));
                }
            };

        let admin = binding.admin();
        if admin.is_some_and(|rb| rb.has_user(username)) {
            return Ok(());
        }

        let admins = admin.map(|rb| rb.user_names.clone()).unwrap_or_default();
        info!(user = username, project, "Permission denied, user is not a project admin");
        Err(Error::PermissionDenied(messages::no_admin_rights(&admins)))
    }

    /// Adds `username` to the admin role binding and PUTs the whole policy
    /// binding back.
    ///
    /// The name is added twice, lowercased and uppercased, to both the user
    /// list and the subjects. The authorization store matches grantees
    /// case-sensitively and logins arrive in either form.
    pub async fn grant_admin(&self, project: &str, username: &str) -> Result<()> {
        let path = paths::policy_bindings(project);
        let mut binding: PolicyBinding = fetch_document(self.api.as_ref(), username, &path).await?;

        let Some(admin) = binding.admin_mut() else {
            error!(user = username, project, "Policy binding has no admin role binding");
            return Err(Error::remote_api());
        };

        for name in [username.to_lowercase(), username.to_uppercase()] {
            admin.subjects.push(Subject::user(name.clone()));
            admin.user_names.push(name);
        }

        store_document(self.api.as_ref(), username, &path, &binding).await?;

        info!(user = username, project, "{} is now admin of {}", username, project);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openshift::testing::FakeOpenshift;
    use reqwest::{Method, StatusCode};
    use selfservice_common::ErrorKind;
    use serde_json::json;

    fn gate(fake: &Arc<FakeOpenshift>) -> PermissionGate {
        PermissionGate::new(fake.clone())
    }

    #[tokio::test]
    async fn test_check_admin_matches_any_casing() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &["MaxMuster"]));
        let gate = gate(&fake);

        assert!(gate.check_admin("MaxMuster", "demo").await.is_ok());
        assert!(gate.check_admin("maxmuster", "demo").await.is_ok());
        assert!(gate.check_admin("MAXMUSTER", "demo").await.is_ok());
    }

    #[tokio::test]
    async fn test_check_admin_folds_umlauts() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &["Jürg"]));
        let gate = gate(&fake);

        assert!(gate.check_admin("JÜRG", "demo").await.is_ok());
        assert!(gate.check_admin("jürg", "demo").await.is_ok());
    }

    #[tokio::test]
    async fn test_granted_umlaut_login_passes_check() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &[]));
        let gate = gate(&fake);

        gate.grant_admin("demo", "Jürg").await.unwrap();
        assert!(gate.check_admin("JüRG", "demo").await.is_ok());
    }

    #[tokio::test]
    async fn test_check_admin_denies_other_users() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &["alice", "ALICE"]));
        let err = gate(&fake).check_admin("bob", "demo").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(err.message().contains("alice, ALICE"));
    }

    #[tokio::test]
    async fn test_check_admin_ignores_other_roles() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &[]));
        let mut binding = fake.document(&paths::policy_bindings("demo")).unwrap();
        binding["roleBindings"][0]["roleBinding"]["userNames"] = json!(["bob"]);
        fake.set_document(&paths::policy_bindings("demo"), binding);

        let err = gate(&fake).check_admin("bob", "demo").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn test_check_admin_missing_project() {
        let fake = Arc::new(FakeOpenshift::new());
        let err = gate(&fake).check_admin("alice", "nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_check_admin_unreachable_api_is_not_found() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &["alice"]));
        fake.respond_with(
            Method::GET,
            &paths::policy_bindings("demo"),
            StatusCode::SERVICE_UNAVAILABLE,
            "",
        );

        let err = gate(&fake).check_admin("alice", "demo").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_grant_admin_adds_both_casings() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &[]));
        gate(&fake).grant_admin("demo", "Alice").await.unwrap();

        let binding: PolicyBinding =
            serde_json::from_value(fake.document(&paths::policy_bindings("demo")).unwrap()).unwrap();
        let admin = binding.admin().unwrap();
        assert_eq!(admin.user_names, vec!["alice", "ALICE"]);
        assert_eq!(
            admin.subjects,
            vec![Subject::user("alice"), Subject::user("ALICE")]
        );

        // Other role bindings are passed through untouched
        assert_eq!(binding.role_bindings[0].name, "system:image-pullers");
        assert!(binding.role_bindings[0].role_binding.user_names.is_empty());
        assert!(binding.role_bindings[0].role_binding.extra.contains_key("groupNames"));
    }

    #[tokio::test]
    async fn test_grant_admin_then_check() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &[]));
        let gate = gate(&fake);

        gate.grant_admin("demo", "alice").await.unwrap();
        assert!(gate.check_admin("Alice", "demo").await.is_ok());
    }

    #[tokio::test]
    async fn test_grant_admin_put_failure() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &[]));
        fake.respond_with(
            Method::PUT,
            &paths::policy_bindings("demo"),
            StatusCode::FORBIDDEN,
            "forbidden",
        );

        let err = gate(&fake).grant_admin("demo", "alice").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteApi);
    }

    #[tokio::test]
    async fn test_grant_admin_without_admin_binding() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &[]));
        fake.set_document(&paths::policy_bindings("demo"), json!({"roleBindings": []}));

        let err = gate(&fake).grant_admin("demo", "alice").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteApi);
        assert_eq!(fake.count(&Method::PUT), 0);
    }
}
