//! Common types shared between the self-service API and its clients

pub mod messages;

use serde::{Deserialize, Serialize};

/// Request body for creating a regular project
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewProjectCommand {
    pub project: String,
    #[serde(default)]
    pub billing: String,
    #[serde(default, rename = "megaId")]
    pub mega_id: String,
}

/// Request body for creating a personal test project
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewTestProjectCommand {
    pub project: String,
}

/// Request body for changing the billing code of a project
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EditBillingDataCommand {
    pub project: String,
    pub billing: String,
}

/// Request body for changing the compute quotas of a project
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EditQuotasCommand {
    pub project: String,
    pub cpu: u32,
    pub memory: u32,
}

/// Response body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse {
    pub message: String,
}

impl ApiResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure classes of the provisioning and administration operations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    PermissionDenied,
    Conflict,
    NotFound,
    RemoteApi,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::PermissionDenied => write!(f, "permission_denied"),
            Self::Conflict => write!(f, "conflict"),
            Self::NotFound => write!(f, "not_found"),
            Self::RemoteApi => write!(f, "remote_api"),
        }
    }
}

/// Portal errors. Every variant carries a localized message that can be
/// shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RemoteApi(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::RemoteApi(_) => ErrorKind::RemoteApi,
        }
    }

    /// Localized message
    pub fn message(&self) -> &str {
        match self {
            Error::Validation(msg)
            | Error::PermissionDenied(msg)
            | Error::Conflict(msg)
            | Error::NotFound(msg)
            | Error::RemoteApi(msg) => msg,
        }
    }

    /// Generic failure talking to the platform API
    pub fn remote_api() -> Self {
        Error::RemoteApi(messages::GENERIC_API_ERROR.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
