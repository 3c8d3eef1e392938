//! Application State
//!
//! Shared state for the self-service API server

use std::sync::Arc;

use crate::config::PortalConfig;
use crate::openshift::{
    MetadataStamper, OpenshiftApi, PermissionGate, ProjectProvisioner, QuotaManager,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub quotas: Arc<QuotaManager>,
    pub metadata: Arc<MetadataStamper>,
    pub provisioner: Arc<ProjectProvisioner>,
}

impl AppState {
    /// Wire all components against one platform API handle
    pub fn new(api: Arc<dyn OpenshiftApi>, config: &PortalConfig) -> Self {
        let permissions = Arc::new(PermissionGate::new(api.clone()));
        let quotas = Arc::new(QuotaManager::new(
            api.clone(),
            permissions.clone(),
            &config.quotas,
        ));
        let metadata = Arc::new(MetadataStamper::new(api.clone(), permissions.clone()));
        let provisioner = Arc::new(ProjectProvisioner::new(
            api,
            permissions,
            metadata.clone(),
        ));

        Self {
            quotas,
            metadata,
            provisioner,
        }
    }
}
