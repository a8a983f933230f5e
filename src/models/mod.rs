pub mod payment;
pub mod response;

pub use payment::*;
pub use response::*;
