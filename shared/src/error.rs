use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid time window: {0}")]
    InvalidTimeWindow(String),
    #[error("policy violations: {0:?}")]
    PolicyViolation(Vec<String>),
    #[error("conflicting reservations: {0:?}")]
    ReservationConflict(Vec<String>),
    #[error("{0}")]
    IllegalTransition(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("transaction could not be completed")]
    TransactionError(#[source] sqlx::Error),
    #[error("database operation failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("expected rows were not affected: {0}")]
    NoRowsAffectedError(String),
    #[error("failed to call an external service: {0}")]
    ExternalServiceError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn kind(&self) -> &'static str {
        use AppError::*;
        match self {
            InvalidTimeWindow(_) => "invalid_time_window",
            PolicyViolation(_) => "policy_violation",
            ReservationConflict(_) => "reservation_conflict",
            IllegalTransition(_) => "illegal_transition",
            EntityNotFound(_) => "not_found",
            UnprocessableEntity(_) => "unprocessable_entity",
            Unauthenticated(_) => "unauthenticated",
            Forbidden(_) => "forbidden",
            ValidationError(_) => "validation_error",
            // Infrastructure failures get a dedicated kind so callers can
            // tell them apart from "slot unavailable" style outcomes.
            TransactionError(_) | SpecificOperationError(_) | NoRowsAffectedError(_) => {
                "internal_error"
            }
            ExternalServiceError(_) => "external_service_error",
        }
    }

    fn details(&self) -> Vec<String> {
        match self {
            AppError::PolicyViolation(rules) => rules.clone(),
            AppError::ReservationConflict(ids) => ids.clone(),
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            AppError::InvalidTimeWindow(_) | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::PolicyViolation(_) | AppError::UnprocessableEntity(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::ReservationConflict(_) | AppError::IllegalTransition(_) => {
                StatusCode::CONFLICT
            }
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            e @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::ExternalServiceError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = json!({
            "error": self.kind(),
            "message": self.to_string(),
            "details": self.details(),
        });
        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_violation_maps_to_unprocessable_entity() {
        let err = AppError::PolicyViolation(vec!["lead time".into()]);
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn conflict_maps_to_conflict_status() {
        let err = AppError::ReservationConflict(vec!["id".into()]);
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unknown_entities_map_to_not_found() {
        let err = AppError::EntityNotFound("specified space not found".into());
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn infrastructure_failure_is_not_a_domain_kind() {
        let err = AppError::NoRowsAffectedError("no rows".into());
        assert_eq!(err.kind(), "internal_error");
    }
}
