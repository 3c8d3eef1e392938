//! OpenShift project provisioning and administration
//!
//! - [`PermissionGate`]: admin checks and admin grants on a project
//! - [`QuotaManager`]: self-service compute quota changes
//! - [`MetadataStamper`]: billing and ownership annotations
//! - [`ProjectProvisioner`]: create -> grant -> stamp workflow
//!
//! Every operation re-reads the authoritative document from the platform
//! and PUTs the whole document back. Nothing is cached between calls.

pub mod client;
pub mod metadata;
pub mod permissions;
pub mod project;
pub mod quota;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

pub use client::{OpenshiftApi, OpenshiftClient};
pub use metadata::MetadataStamper;
pub use permissions::PermissionGate;
pub use project::{ProjectProvisioner, ProvisioningStage};
pub use quota::QuotaManager;

use selfservice_common::{messages, Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use client::ClientError;

/// GET a document on behalf of `username`. 404 maps to `NotFound`,
/// everything else that is not a decodable success maps to the generic API
/// error.
pub(crate) async fn fetch_document<T: DeserializeOwned>(
    api: &dyn OpenshiftApi,
    username: &str,
    path: &str,
) -> Result<T> {
    let reply = api.get(path).await.map_err(|e| {
        error!(user = username, path, "Error from server on GET: {}", e);
        Error::remote_api()
    })?;

    match reply.json() {
        Ok(document) => Ok(document),
        Err(ClientError::Api { status: 404, .. }) => {
            Err(Error::NotFound(messages::PROJECT_NOT_FOUND.to_string()))
        }
        Err(e) => {
            error!(
                user = username,
                path,
                status = reply.status.as_u16(),
                "Error reading document: {}",
                e
            );
            Err(Error::remote_api())
        }
    }
}

/// PUT a whole document back. Only 2xx counts as success.
pub(crate) async fn store_document<T: Serialize>(
    api: &dyn OpenshiftApi,
    username: &str,
    path: &str,
    document: &T,
) -> Result<()> {
    let body = serde_json::to_value(document).map_err(|e| {
        error!(user = username, path, "Error encoding document: {}", e);
        Error::remote_api()
    })?;

    let reply = api.put(path, body).await.map_err(|e| {
        error!(user = username, path, "Error from server on PUT: {}", e);
        Error::remote_api()
    })?;

    if reply.is_success() {
        return Ok(());
    }

    error!(
        user = username,
        path,
        status = reply.status.as_u16(),
        body = %reply.body,
        "Error updating document"
    );
    Err(Error::remote_api())
}
