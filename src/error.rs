use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Request body must be valid JSON")]
    MalformedBody(String),

    #[error("Missing required fields: subject, amount, currency")]
    MissingRequiredFields,

    #[error("Invalid currency for the configured API key. Use {0}.")]
    UnsupportedCurrency(&'static str),

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Server configuration error: missing Khipu API key")]
    MissingApiKey,

    #[error("Internal error while processing data")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error while creating the request")]
    RequestBuild(#[source] reqwest::Error),

    #[error("Connection error with Khipu API: {0}")]
    Connection(#[source] reqwest::Error),

    /// Non-2xx answer from Khipu; `body` is relayed to the caller as-is.
    #[error("Error received from Khipu API")]
    Provider { status: StatusCode, body: Value },

    #[error("Internal server error while processing the payment")]
    Internal(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MalformedBody(_)
            | ServiceError::MissingRequiredFields
            | ServiceError::UnsupportedCurrency(_)
            | ServiceError::NonPositiveAmount => StatusCode::BAD_REQUEST,
            ServiceError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Provider { status, .. } => *status,
            ServiceError::MissingApiKey
            | ServiceError::Serialization(_)
            | ServiceError::RequestBuild(_)
            | ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The provider's own response body, when there is one to pass through.
    pub fn opaque_body(&self) -> Option<&Value> {
        match self {
            ServiceError::Provider { body, .. } => Some(body),
            _ => None,
        }
    }

    fn response_body(&self) -> Value {
        match self {
            ServiceError::Provider { body, .. } => body.clone(),
            ServiceError::MalformedBody(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(
                error = %self,
                status = status.as_u16(),
                khipu_response = ?self.opaque_body(),
                "Request rejected"
            );
        }

        (status, Json(self.response_body())).into_response()
    }
}
