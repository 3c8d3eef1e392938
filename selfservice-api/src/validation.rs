//! Input validation shared by the provisioning and administration workflows
//!
//! All checks run before any call to the platform API.

use selfservice_common::{messages, Error};

use crate::config::QuotaConfig;

/// Validation result type
pub type ValidationResult<T> = Result<T, Error>;

// Required fields only have to be present. Whitespace is passed on to the
// platform, which rejects names it cannot use.

pub fn validate_project_name(project: &str) -> ValidationResult<()> {
    if project.is_empty() {
        return Err(Error::Validation(messages::PROJECT_NAME_REQUIRED.to_string()));
    }
    Ok(())
}

pub fn validate_billing(billing: &str) -> ValidationResult<()> {
    if billing.is_empty() {
        return Err(Error::Validation(messages::BILLING_REQUIRED.to_string()));
    }
    Ok(())
}

/// Project creation: billing is only optional for test projects
pub fn validate_new_project(project: &str, billing: &str, is_test_project: bool) -> ValidationResult<()> {
    validate_project_name(project)?;
    if !is_test_project {
        validate_billing(billing)?;
    }
    Ok(())
}

pub fn validate_quota(limits: &QuotaConfig, cpu: u32, memory: u32) -> ValidationResult<()> {
    if cpu > limits.max_cpu {
        return Err(Error::Validation(messages::max_cpu_exceeded(limits.max_cpu)));
    }
    if memory > limits.max_memory {
        return Err(Error::Validation(messages::max_memory_exceeded(limits.max_memory)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_requires_name() {
        let err = validate_new_project("", "1234", false).unwrap_err();
        assert_eq!(err, Error::Validation(messages::PROJECT_NAME_REQUIRED.to_string()));
    }

    #[test]
    fn test_only_empty_values_count_as_missing() {
        assert!(validate_project_name(" ").is_ok());
        assert!(validate_billing(" ").is_ok());
        assert_eq!(
            validate_billing("").unwrap_err(),
            Error::Validation(messages::BILLING_REQUIRED.to_string())
        );
    }

    #[test]
    fn test_billing_optional_for_test_projects() {
        assert!(validate_new_project("demo", "", false).is_err());
        assert!(validate_new_project("demo", "", true).is_ok());
        assert!(validate_new_project("demo", "1234", false).is_ok());
    }

    #[test]
    fn test_quota_ceilings() {
        let limits = QuotaConfig {
            max_cpu: 4,
            max_memory: 16,
        };

        assert!(validate_quota(&limits, 4, 16).is_ok());
        assert!(validate_quota(&limits, 0, 0).is_ok());

        let err = validate_quota(&limits, 5, 1).unwrap_err();
        assert!(err.message().contains("4 CPU"));

        let err = validate_quota(&limits, 1, 17).unwrap_err();
        assert!(err.message().contains("16GB"));
    }
}
