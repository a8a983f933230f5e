pub mod health;
pub mod payments;
pub mod stubs;

pub use health::*;
pub use payments::*;
pub use stubs::*;
