//! # Cukai Core
//!
//! Tax computations for Malaysian small businesses: claimable deductions,
//! SST payable per filing period, EA form summaries and filing calendars.
//!
//! ## Features
//!
//! - **Deduction claims**: Flat-percentage business expenses, initial plus annual
//!   capital allowances, and capped personal reliefs
//! - **SST**: Payable amounts over monthly periods at the statutory 6% rate, with
//!   invoice dates accepted as `DD/MM/YYYY` or ISO
//! - **EA forms**: Total remuneration and net employment income per employee
//! - **Filing calendar**: Period boundaries, due dates and days remaining
//! - **Dashboard metrics**: Yearly totals and year-over-year changes
//!
//! Every calculation is a pure function. Missing or malformed numbers and
//! dates are treated as zero or absent rather than reported as errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use cukai_core::{compute_claimable, sst_payable, CategoryLookup, CategoryTable, Invoice};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let table = CategoryTable::standard();
//! let claim = compute_claimable(table.category("computers"), &BigDecimal::from(3000));
//! assert_eq!(claim.amount, BigDecimal::from(1800));
//!
//! let invoices = vec![
//!     Invoice::new("inv-1".to_string(), BigDecimal::from(1000), "10/05/2024"),
//!     Invoice::new("inv-2".to_string(), BigDecimal::from(2000), "2024-05-20"),
//! ];
//! let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
//! assert_eq!(sst_payable(&invoices, start, end), BigDecimal::from(180));
//! ```

pub mod settings;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use settings::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
