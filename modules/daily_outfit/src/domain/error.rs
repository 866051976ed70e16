use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Recommendation not found: {id}")]
    RecommendationNotFound { id: Uuid },

    #[error("{service} is not configured")]
    NotConfigured { service: String },

    #[error("{service} request failed: {message}")]
    Upstream { service: String, message: String },

    #[error("{service} returned an unusable response: {message}")]
    MalformedResponse { service: String, message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },
}

impl DomainError {
    pub fn recommendation_not_found(id: Uuid) -> Self {
        Self::RecommendationNotFound { id }
    }

    pub fn not_configured(service: impl Into<String>) -> Self {
        Self::NotConfigured {
            service: service.into(),
        }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn malformed(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
