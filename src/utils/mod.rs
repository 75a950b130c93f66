//! Utility modules

pub mod coerce;
pub mod dates;
pub mod money;
pub mod validation;

pub use coerce::coerce_amount;
pub use dates::*;
pub use money::*;
pub use validation::*;
