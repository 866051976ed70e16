use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.outfit.local/{}", code))
        .with_code(code)
        .with_instance(instance);

    let problem = if let Some(id) = tracing::Span::current().id() {
        problem.with_trace_id(id.into_u64().to_string())
    } else {
        problem
    };

    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::RecommendationNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "OUTFIT_NOT_FOUND",
            "Recommendation not found",
            format!("Recommendation with id {} was not found", id),
            instance,
        ),
        DomainError::Validation { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "OUTFIT_VALIDATION",
            "Validation error",
            format!("{}", e),
            instance,
        ),
        DomainError::NotConfigured { .. }
        | DomainError::Upstream { .. }
        | DomainError::MalformedResponse { .. } => {
            tracing::warn!(error = %e, "Upstream dependency unavailable");
            from_parts(
                StatusCode::BAD_GATEWAY,
                "OUTFIT_UPSTREAM",
                "Upstream unavailable",
                "A dependent service is unavailable",
                instance,
            )
        }
        DomainError::Storage { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "OUTFIT_INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}
