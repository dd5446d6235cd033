use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Storage error: {message}")]
    Storage {
        status: Option<u16>,
        message: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            status: None,
            message: message.into(),
        }
    }

    /// Storage failure reported by a remote gateway with the HTTP status it answered
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Storage {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Entity 'C/1' not found in 'Customers'");
        assert_eq!(
            error.to_string(),
            "Not found: Entity 'C/1' not found in 'Customers'"
        );
        assert!(error.is_not_found());
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Request body is required");
        assert_eq!(error.to_string(), "Validation error: Request body is required");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Entity already exists");
        assert_eq!(error.to_string(), "Conflict: Entity already exists");
        assert!(error.is_conflict());
    }

    #[test]
    fn test_remote_storage_error_keeps_status() {
        let error = DomainError::remote(500, "boom");

        match error {
            DomainError::Storage { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
