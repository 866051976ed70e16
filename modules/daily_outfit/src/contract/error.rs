use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone)]
pub enum DailyOutfitError {
    #[error("Recommendation not found: {id}")]
    NotFound { id: Uuid },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Upstream service unavailable: {service}")]
    Unavailable { service: String },

    #[error("Internal error")]
    Internal,
}

impl DailyOutfitError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unavailable(service: impl Into<String>) -> Self {
        Self::Unavailable {
            service: service.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for DailyOutfitError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            RecommendationNotFound { id } => Self::not_found(id),
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            NotConfigured { service } | Upstream { service, .. } => Self::unavailable(service),
            MalformedResponse { service, .. } => Self::unavailable(service),
            Storage { .. } => Self::internal(),
        }
    }
}
