//! Tax computations: deduction claims, SST, EA summaries and filing periods

pub mod categories;
pub mod dashboard;
pub mod deduction;
pub mod ea;
pub mod period;
pub mod sst;

pub use categories::*;
pub use dashboard::*;
pub use deduction::*;
pub use ea::*;
pub use period::*;
pub use sst::*;
