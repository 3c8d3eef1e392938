//! Self-service compute quota changes

use selfservice_common::{messages, Error, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use super::client::OpenshiftApi;
use super::permissions::PermissionGate;
use super::types::{paths, ResourceQuotaList};
use super::{fetch_document, store_document};
use crate::config::QuotaConfig;
use crate::validation;

pub struct QuotaManager {
    api: Arc<dyn OpenshiftApi>,
    gate: Arc<PermissionGate>,
    limits: QuotaConfig,
}

impl QuotaManager {
    pub fn new(api: Arc<dyn OpenshiftApi>, gate: Arc<PermissionGate>, limits: &QuotaConfig) -> Self {
        Self {
            api,
            gate,
            limits: *limits,
        }
    }

    /// Sets the hard cpu (cores) and memory (GiB) limits of the project's
    /// quota. The first quota returned for the project is the one changed.
    pub async fn update_quota(&self, username: &str, project: &str, cpu: u32, memory: u32) -> Result<()> {
        validation::validate_project_name(project)?;
        validation::validate_quota(&self.limits, cpu, memory)?;

        self.gate.check_admin(username, project).await?;

        let quotas: ResourceQuotaList =
            fetch_document(self.api.as_ref(), username, &paths::resource_quotas(project)).await?;
        let Some(mut quota) = quotas.items.into_iter().next() else {
            error!(user = username, project, "Project has no resource quota");
            return Err(Error::NotFound(messages::QUOTA_NOT_FOUND.to_string()));
        };

        quota
            .spec
            .hard
            .insert("cpu".to_string(), Value::String(cpu.to_string()));
        quota
            .spec
            .hard
            .insert("memory".to_string(), Value::String(format!("{}Gi", memory)));

        let path = paths::resource_quota(project, &quota.metadata.name);
        store_document(self.api.as_ref(), username, &path, &quota).await?;

        info!(
            target: "audit",
            user = username,
            project,
            cpu,
            memory,
            "User {} changed quotas for project {}. CPU: {}, Mem: {}Gi",
            username,
            project,
            cpu,
            memory
        );
        Ok(())
    }
}
