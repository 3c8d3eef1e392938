//! Project provisioning: create the project, make the requester admin,
//! stamp billing metadata.
//!
//! The three steps are not compensated. If granting or stamping fails after
//! the project was created, the project stays behind in the stage that was
//! reached and the error is returned unchanged.

use reqwest::StatusCode;
use selfservice_common::{messages, Error, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::client::OpenshiftApi;
use super::metadata::MetadataStamper;
use super::permissions::PermissionGate;
use super::types::{paths, ProjectRequest};
use crate::validation;

/// Billing code used for personal test projects
pub const TEST_PROJECT_BILLING: &str = "keine-verrechnung";

/// Last completed step of a provisioning run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStage {
    NotExists,
    Creating,
    Created,
    AdminGranted,
    Provisioned,
}

impl fmt::Display for ProvisioningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotExists => write!(f, "not-exists"),
            Self::Creating => write!(f, "creating"),
            Self::Created => write!(f, "created"),
            Self::AdminGranted => write!(f, "admin-granted"),
            Self::Provisioned => write!(f, "provisioned"),
        }
    }
}

pub struct ProjectProvisioner {
    api: Arc<dyn OpenshiftApi>,
    gate: Arc<PermissionGate>,
    stamper: Arc<MetadataStamper>,
}

impl ProjectProvisioner {
    pub fn new(
        api: Arc<dyn OpenshiftApi>,
        gate: Arc<PermissionGate>,
        stamper: Arc<MetadataStamper>,
    ) -> Self {
        Self { api, gate, stamper }
    }

    pub async fn provision(
        &self,
        username: &str,
        project: &str,
        mega_id: &str,
        billing: &str,
        is_test_project: bool,
    ) -> Result<()> {
        validation::validate_new_project(project, billing, is_test_project)?;

        self.create_project(username, project).await?;

        if let Err(e) = self.gate.grant_admin(project, username).await {
            self.parked(username, project, ProvisioningStage::Created, &e);
            return Err(e);
        }

        if let Err(e) = self.stamper.stamp(project, billing, mega_id, username).await {
            self.parked(username, project, ProvisioningStage::AdminGranted, &e);
            return Err(e);
        }

        info!(
            user = username,
            project,
            stage = %ProvisioningStage::Provisioned,
            "{} created a new project: {}",
            username,
            project
        );
        Ok(())
    }

    /// Personal test project named `<username>-<project>` without billing
    pub async fn provision_test_project(&self, username: &str, project: &str) -> Result<String> {
        validation::validate_project_name(project)?;

        let name = format!("{}-{}", username, project);
        self.provision(username, &name, "", TEST_PROJECT_BILLING, true)
            .await?;
        Ok(name)
    }

    async fn create_project(&self, username: &str, project: &str) -> Result<()> {
        debug!(user = username, project, stage = %ProvisioningStage::Creating, "Requesting project");

        let body = serde_json::to_value(ProjectRequest::new(project)).map_err(|e| {
            error!(user = username, project, "Error encoding project request: {}", e);
            Error::remote_api()
        })?;

        let reply = self
            .api
            .post(&paths::project_requests(), body)
            .await
            .map_err(|e| {
                error!(user = username, project, "Error creating new project: {}", e);
                Error::remote_api()
            })?;

        match reply.status {
            StatusCode::CREATED => Ok(()),
            StatusCode::CONFLICT => Err(Error::Conflict(messages::PROJECT_EXISTS.to_string())),
            status => {
                error!(
                    user = username,
                    project,
                    status = status.as_u16(),
                    body = %reply.body,
                    "Error creating new project"
                );
                Err(Error::remote_api())
            }
        }
    }

    fn parked(&self, username: &str, project: &str, stage: ProvisioningStage, err: &Error) {
        error!(
            user = username,
            project,
            stage = %stage,
            "Provisioning stopped, project is left incomplete: {}",
            err
        );
    }
}
