use crate::{error::ServiceError, models::PaymentRequest};

/// The only currency the configured merchant account can charge in.
pub const ACCEPTED_CURRENCY: &str = "ARS";

/// Checks run in order and the first failure wins.
pub fn validate_payment_request(request: &PaymentRequest) -> Result<(), ServiceError> {
    if request.subject.is_empty() || request.amount == 0.0 || request.currency.is_empty() {
        return Err(ServiceError::MissingRequiredFields);
    }

    if request.currency != ACCEPTED_CURRENCY {
        return Err(ServiceError::UnsupportedCurrency(ACCEPTED_CURRENCY));
    }

    if request.amount <= 0.0 {
        return Err(ServiceError::NonPositiveAmount);
    }

    Ok(())
}
