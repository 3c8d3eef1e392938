//! Billing and ownership annotations on a project's namespace

use selfservice_common::Result;
use std::sync::Arc;
use tracing::info;

use super::client::OpenshiftApi;
use super::permissions::PermissionGate;
use super::types::{paths, Namespace, BILLING_ANNOTATION, MEGAID_ANNOTATION, REQUESTER_ANNOTATION};
use super::{fetch_document, store_document};
use crate::validation;

pub struct MetadataStamper {
    api: Arc<dyn OpenshiftApi>,
    gate: Arc<PermissionGate>,
}

impl MetadataStamper {
    pub fn new(api: Arc<dyn OpenshiftApi>, gate: Arc<PermissionGate>) -> Self {
        Self { api, gate }
    }

    /// Merges billing code, requester and MEGAID into the namespace
    /// annotations. An empty `mega_id` leaves an existing MEGAID in place.
    pub async fn stamp(&self, project: &str, billing: &str, mega_id: &str, username: &str) -> Result<()> {
        let path = paths::namespace(project);
        let mut namespace: Namespace = fetch_document(self.api.as_ref(), username, &path).await?;

        let annotations = namespace.annotations_mut();
        annotations.insert(BILLING_ANNOTATION.to_string(), billing.to_string());
        annotations.insert(REQUESTER_ANNOTATION.to_string(), username.to_string());
        if !mega_id.is_empty() {
            annotations.insert(MEGAID_ANNOTATION.to_string(), mega_id.to_string());
        }

        store_document(self.api.as_ref(), username, &path, &namespace).await?;

        info!(
            user = username,
            project,
            billing,
            mega_id,
            "User {} changed config of project {}. Kontierungsnummer: {}, MegaID: {}",
            username,
            project,
            billing,
            mega_id
        );
        Ok(())
    }

    /// Billing change requested by a project admin
    pub async fn update_billing(&self, username: &str, project: &str, billing: &str) -> Result<()> {
        validation::validate_project_name(project)?;
        validation::validate_billing(billing)?;

        self.gate.check_admin(username, project).await?;

        self.stamp(project, billing, "", username).await
    }

    /// Current billing code of the project, empty if none was stamped yet
    pub async fn billing(&self, username: &str, project: &str) -> Result<String> {
        validation::validate_project_name(project)?;

        self.gate.check_admin(username, project).await?;

        let namespace: Namespace =
            fetch_document(self.api.as_ref(), username, &paths::namespace(project)).await?;
        Ok(namespace
            .annotation(BILLING_ANNOTATION)
            .unwrap_or_default()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openshift::testing::FakeOpenshift;
    use reqwest::{Method, StatusCode};
    use selfservice_common::ErrorKind;

    fn stamper(fake: &Arc<FakeOpenshift>) -> MetadataStamper {
        let gate = Arc::new(PermissionGate::new(fake.clone()));
        MetadataStamper::new(fake.clone(), gate)
    }

    fn namespace(fake: &FakeOpenshift, project: &str) -> Namespace {
        serde_json::from_value(fake.document(&paths::namespace(project)).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_stamp_sets_annotations() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &[]));
        stamper(&fake).stamp("demo", "1234", "M-42", "alice").await.unwrap();

        let ns = namespace(&fake, "demo");
        assert_eq!(ns.annotation(BILLING_ANNOTATION), Some("1234"));
        assert_eq!(ns.annotation(REQUESTER_ANNOTATION), Some("alice"));
        assert_eq!(ns.annotation(MEGAID_ANNOTATION), Some("M-42"));
        // Existing annotations and the rest of the document survive
        assert_eq!(ns.annotation("openshift.io/display-name"), Some(""));
        assert!(ns.extra.contains_key("spec"));
    }

    #[tokio::test]
    async fn test_empty_mega_id_keeps_existing_value() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &[]));
        let stamper = stamper(&fake);

        stamper.stamp("demo", "1111", "M-42", "alice").await.unwrap();
        stamper.stamp("demo", "1234", "", "bob").await.unwrap();

        let ns = namespace(&fake, "demo");
        assert_eq!(ns.annotation(BILLING_ANNOTATION), Some("1234"));
        assert_eq!(ns.annotation(REQUESTER_ANNOTATION), Some("bob"));
        assert_eq!(ns.annotation(MEGAID_ANNOTATION), Some("M-42"));
    }

    #[tokio::test]
    async fn test_stamp_is_idempotent() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &[]));
        let stamper = stamper(&fake);

        stamper.stamp("demo", "1234", "M-1", "alice").await.unwrap();
        let once = namespace(&fake, "demo");
        stamper.stamp("demo", "1234", "M-1", "alice").await.unwrap();
        let twice = namespace(&fake, "demo");

        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_stamp_namespace_without_annotations() {
        let fake = Arc::new(FakeOpenshift::new());
        fake.set_document(
            &paths::namespace("bare"),
            serde_json::json!({"metadata": {"name": "bare"}}),
        );

        stamper(&fake).stamp("bare", "1234", "", "alice").await.unwrap();

        let ns = namespace(&fake, "bare");
        assert_eq!(ns.annotation(BILLING_ANNOTATION), Some("1234"));
        assert!(ns.annotation(MEGAID_ANNOTATION).is_none());
    }

    #[tokio::test]
    async fn test_stamp_put_failure() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &[]));
        fake.respond_with(Method::PUT, &paths::namespace("demo"), StatusCode::CONFLICT, "stale");

        let err = stamper(&fake).stamp("demo", "1234", "", "alice").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteApi);
    }

    #[tokio::test]
    async fn test_update_billing_requires_admin() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &["alice"]));
        let stamper = stamper(&fake);

        let err = stamper.update_billing("bob", "demo", "9999").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(fake.count(&Method::PUT), 0);

        stamper.update_billing("ALICE", "demo", "9999").await.unwrap();
        assert_eq!(namespace(&fake, "demo").annotation(BILLING_ANNOTATION), Some("9999"));
    }

    #[tokio::test]
    async fn test_update_billing_validates_first() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &["alice"]));
        let stamper = stamper(&fake);

        let err = stamper.update_billing("alice", "", "9999").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = stamper.update_billing("alice", "demo", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert_eq!(fake.request_count(), 0);
    }

    #[tokio::test]
    async fn test_billing_lookup() {
        let fake = Arc::new(FakeOpenshift::with_project("demo", &["alice"]));
        let stamper = stamper(&fake);

        assert_eq!(stamper.billing("alice", "demo").await.unwrap(), "");
        stamper.stamp("demo", "1234", "", "alice").await.unwrap();
        assert_eq!(stamper.billing("alice", "demo").await.unwrap(), "1234");
    }
}
