use crate::{error::ServiceError, handlers::*};
use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Payments
        .route("/v3/payments", post(create_payment))
        .route(
            "/v3/payments/:id",
            get(get_payment_by_id).delete(delete_payment_by_id),
        )
        .route("/v3/payments/:id/confirm", post(post_payment_confirm_by_id))
        .route("/v3/payments/:id/refunds", post(post_payment_refunds_by_id))
        // Catalog
        .route("/v3/banks", get(get_banks))
        .route(
            "/v3/merchants/:id/paymentMethods",
            get(get_merchant_payment_methods_by_id),
        )
        .route("/v3/predict", get(get_predict))
        .route("/v3/receiver", post(post_receiver))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::default().include_headers(false)),
                )
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .with_state(state)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ServiceError::Internal(detail).into_response()
}
