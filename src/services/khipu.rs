use crate::{
    config::Config,
    error::ServiceError,
    models::{KhipuPayload, PaymentRequest},
    services::validator::validate_payment_request,
};
use anyhow::{Context, Result};
use axum::http::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{json, Map, Value};
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const PAYMENTS_PATH: &str = "/v3/payments";

/// Forwards payment creation to Khipu's REST API.
pub struct KhipuClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl KhipuClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.khipu_target_api_url.trim_end_matches('/').to_string(),
            api_key: config.khipu_api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn payments_endpoint(&self) -> String {
        format!("{}{}", self.base_url, PAYMENTS_PATH)
    }

    /// Creates a payment and returns Khipu's response body untouched.
    ///
    /// Non-2xx answers come back as [`ServiceError::Provider`] carrying
    /// Khipu's status code and body.
    pub async fn create_payment(&self, request: &PaymentRequest) -> Result<Value, ServiceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("KHIPU_MERCHANT_API_KEY is not configured");
            return Err(ServiceError::MissingApiKey);
        };

        validate_payment_request(request)?;

        let payload = KhipuPayload::from(request);
        let body = serde_json::to_vec(&payload).map_err(|e| {
            tracing::error!("Failed to serialize Khipu payload: {}", e);
            ServiceError::Serialization(e)
        })?;

        tracing::debug!("JSON sent to Khipu: {}", String::from_utf8_lossy(&body));

        let endpoint = self.payments_endpoint();
        tracing::info!("Sending request to Khipu API: POST {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header("x-api-key", api_key)
            .body(body)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status().as_u16();
        let raw = response.text().await.map_err(|e| {
            tracing::error!("Failed to read Khipu response body: {}", e);
            ServiceError::Connection(e)
        })?;

        tracing::debug!("Khipu raw response status: {}", status);
        tracing::debug!("Khipu raw response body: {}", raw);

        let data = parse_response_body(&raw);

        if (200..300).contains(&status) {
            tracing::info!("Khipu accepted payment request ({})", status);
            return Ok(data);
        }

        tracing::warn!("Khipu HTTP error: {}", status);

        let status = StatusCode::from_u16(status).map_err(|e| {
            ServiceError::Internal(format!("Unrepresentable status {}: {}", status, e))
        })?;

        Err(ServiceError::Provider { status, body: data })
    }
}

fn classify_send_error(err: reqwest::Error) -> ServiceError {
    if err.is_builder() {
        tracing::error!("Failed to build Khipu request: {}", err);
        ServiceError::RequestBuild(err)
    } else {
        tracing::error!("Connection error with Khipu API: {}", err);
        ServiceError::Connection(err)
    }
}

/// Khipu's body as a JSON object, or the raw text under `raw_response`.
pub fn parse_response_body(raw: &str) -> Value {
    match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(object) => Value::Object(object),
        Err(_) => json!({ "raw_response": raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn config(url: &str, api_key: Option<&str>) -> Config {
        Config {
            environment: Environment::Development,
            host: "127.0.0.1".to_string(),
            port: 0,
            khipu_api_key: api_key.map(str::to_string),
            khipu_target_api_url: url.to_string(),
        }
    }

    #[test]
    fn test_parse_json_object() {
        assert_eq!(
            parse_response_body(r#"{"payment_id":"abc"}"#),
            json!({"payment_id": "abc"})
        );
    }

    #[test]
    fn test_parse_wraps_non_json() {
        assert_eq!(
            parse_response_body("Bad Gateway"),
            json!({"raw_response": "Bad Gateway"})
        );
        assert_eq!(parse_response_body(""), json!({"raw_response": ""}));
    }

    #[test]
    fn test_parse_wraps_non_object_json() {
        assert_eq!(
            parse_response_body("[1,2,3]"),
            json!({"raw_response": "[1,2,3]"})
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client =
            KhipuClient::new(&config("https://payment-api.khipu.com/", Some("k"))).unwrap();
        assert_eq!(
            client.payments_endpoint(),
            "https://payment-api.khipu.com/v3/payments"
        );
        assert!(client.is_configured());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_validation() {
        let client = KhipuClient::new(&config("http://127.0.0.1:1", None)).unwrap();

        let err = client
            .create_payment(&PaymentRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::MissingApiKey));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_sending() {
        // Port 1 is never listening; a network attempt would surface as Connection
        let client = KhipuClient::new(&config("http://127.0.0.1:1", Some("k"))).unwrap();
        let request = PaymentRequest {
            subject: "Order 1".to_string(),
            amount: 10.0,
            currency: "USD".to_string(),
            ..Default::default()
        };

        let err = client.create_payment(&request).await.unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedCurrency(_)));
    }
}
