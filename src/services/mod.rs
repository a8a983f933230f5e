pub mod khipu;
pub mod validator;

pub use khipu::KhipuClient;
pub use validator::{validate_payment_request, ACCEPTED_CURRENCY};
