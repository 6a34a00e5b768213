//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use churn_core::{CustomerRecord, PipelineError};
use serde_json::json;
use validator::ValidationErrors;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Artifacts not loaded (degraded start)
    ModelNotLoaded,

    // Request errors
    ValidationError(String),
    UnprocessableInput(String),

    // Artifact/code skew
    SchemaError(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ModelNotLoaded => (StatusCode::SERVICE_UNAVAILABLE, "Model not loaded"),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::UnprocessableInput(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            AppError::SchemaError(msg) => {
                tracing::error!("Schema mismatch: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Model schema mismatch")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err.root() {
            PipelineError::NotLoaded => AppError::ModelNotLoaded,
            PipelineError::SchemaMismatch(_) => AppError::SchemaError(err.to_string()),
            _ if err.is_input_error() => {
                AppError::UnprocessableInput(format!("Prediction error: {}", err))
            }
            _ => AppError::InternalError(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::ValidationError(format!("Invalid customer record: {}", describe_validation(&err)))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

/// Field errors keyed by their JSON names, e.g. `MonthlyCharges: range (min=0, value=-5)`
pub fn describe_validation(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            let wire = CustomerRecord::wire_name(field);
            errs.iter().map(move |e| {
                let mut params: Vec<_> = e.params.iter().collect();
                params.sort_by(|a, b| a.0.cmp(b.0));
                let params = params
                    .into_iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {} ({})", wire, e.code, params)
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}
