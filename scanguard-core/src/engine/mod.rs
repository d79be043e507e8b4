//! Indicator precompute: the cached engine, expression-driven derivation
//! and multi-table batches.

pub mod batch;
pub mod needed;
pub mod precompute;

pub use batch::precompute_tables;
pub use needed::{column_lookback, precompute_needed, required_columns, NeededReport, RequiredColumns};
pub use precompute::{PrecomputeEngine, PrecomputeReport, LAG1_PREFIX};
