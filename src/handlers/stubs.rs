//! Khipu v3 endpoints that are routed but not implemented yet.

use crate::models::StatusMessage;
use axum::{http::StatusCode, Json};

pub type NotImplemented = (StatusCode, Json<StatusMessage>);

fn not_implemented() -> NotImplemented {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(StatusMessage {
            status: "Not Implemented".to_string(),
        }),
    )
}

/// `DELETE /v3/payments/:id`
pub async fn delete_payment_by_id() -> NotImplemented {
    not_implemented()
}

/// `GET /v3/banks`
pub async fn get_banks() -> NotImplemented {
    not_implemented()
}

/// `GET /v3/merchants/:id/paymentMethods`
pub async fn get_merchant_payment_methods_by_id() -> NotImplemented {
    not_implemented()
}

/// `GET /v3/payments/:id`
pub async fn get_payment_by_id() -> NotImplemented {
    not_implemented()
}

/// `GET /v3/predict`
pub async fn get_predict() -> NotImplemented {
    not_implemented()
}

/// `POST /v3/payments/:id/confirm`
pub async fn post_payment_confirm_by_id() -> NotImplemented {
    not_implemented()
}

/// `POST /v3/payments/:id/refunds`
pub async fn post_payment_refunds_by_id() -> NotImplemented {
    not_implemented()
}

/// `POST /v3/receiver`
pub async fn post_receiver() -> NotImplemented {
    not_implemented()
}
