//! Student-yield estimation for housing developments.
//!
//! Rate tables keyed by region, housing type, supply type and scale turn a
//! unit count into expected kindergarten, elementary, middle and high
//! school students. Tables come in from CSV sheets, persist as JSON and go
//! back out as flat CSV; results accumulate in a per-session ledger.
pub mod config;
pub mod error;
pub mod estimator;
pub mod ledger;
pub mod loader;
pub mod lookup;
pub mod output;
pub mod session;
pub mod store;
pub mod table;
pub mod types;
pub mod util;

pub use config::Config;
pub use error::{ExportError, ImportError, Rejection, StoreError};
pub use estimator::{estimate, CalculationBasis, Estimate};
pub use ledger::ResultLedger;
pub use loader::ImportReport;
pub use lookup::LookupIndex;
pub use session::Session;
pub use table::{HighSchoolRateTable, RateTable, RateTables};
pub use types::{EstimationResult, HighSchoolEntry, LeafKey, RateEntry, RegionKey, Selection};
