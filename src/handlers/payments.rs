use crate::{error::ServiceError, models::PaymentRequest, services::KhipuClient};
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub khipu: Arc<KhipuClient>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(khipu: Arc<KhipuClient>) -> Self {
        Self {
            khipu,
            started_at: Instant::now(),
        }
    }
}

/// `POST /v3/payments`
///
/// The body is parsed by hand instead of through `Json` so that a missing
/// `Content-Type` header is not a rejection and parse errors keep their text.
pub async fn create_payment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    let span = tracing::info_span!("create_payment", request_id = %Uuid::new_v4());

    async move {
        let request: PaymentRequest = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("Request to /v3/payments is not valid JSON: {}", e);
            ServiceError::MalformedBody(e.to_string())
        })?;

        tracing::info!(
            subject = %request.subject,
            amount = request.amount,
            currency = %request.currency,
            "/v3/payments received payment request"
        );

        let khipu_response = state.khipu.create_payment(&request).await?;

        Ok((StatusCode::CREATED, Json(khipu_response)))
    }
    .instrument(span)
    .await
}
