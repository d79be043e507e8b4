//! Scanguard Core — temporal-safety guardrails and indicator precompute for
//! rule-based signal scans.
//!
//! This crate contains:
//! - Guardrail validators (index ordering, warmup blankness, alignment,
//!   forward-reference detection, the T+1 execution policy)
//! - The indicator precompute engine with a per-instance cache
//! - The filter pipeline that prepares rule expressions against a table
//! - The execution delay adapter

pub mod config;
pub mod delay;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod filters;
pub mod guards;
pub mod indicators;
pub mod table;

pub use config::GuardConfig;
pub use delay::{apply_t_plus_one, SignalSeries};
pub use diagnostics::{Diagnostic, DiagnosticsSink, MemorySink, Severity, TracingSink};
pub use engine::{precompute_needed, PrecomputeEngine, PrecomputeReport};
pub use error::{ConfigError, FilterError, GuardrailViolation, PrecomputeError, TableError};
pub use filters::{FilterDefinition, FilterPipeline, PreparedFilters};
pub use table::TimeTable;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: public types are Send + Sync, so independent
    /// tables can be prepared on worker threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Data
        require_send::<table::TimeTable>();
        require_sync::<table::TimeTable>();
        require_send::<table::Ohlcv>();
        require_sync::<table::Ohlcv>();
        require_send::<delay::SignalSeries>();
        require_sync::<delay::SignalSeries>();

        // Guards
        require_send::<guards::ExecConfig>();
        require_sync::<guards::ExecConfig>();
        require_send::<guards::FutureRefScanner>();
        require_sync::<guards::FutureRefScanner>();
        require_send::<guards::ExprNode>();
        require_sync::<guards::ExprNode>();
        require_send::<guards::GuardCheck>();
        require_sync::<guards::GuardCheck>();

        // Indicators and engine
        require_send::<indicators::Specifier>();
        require_sync::<indicators::Specifier>();
        require_send::<engine::PrecomputeEngine>();
        require_sync::<engine::PrecomputeEngine>();
        require_send::<engine::PrecomputeReport>();
        require_sync::<engine::PrecomputeReport>();

        // Filters
        require_send::<filters::FilterDefinition>();
        require_sync::<filters::FilterDefinition>();
        require_send::<filters::FilterPipeline>();
        require_sync::<filters::FilterPipeline>();
        require_send::<filters::PreparedFilters>();
        require_sync::<filters::PreparedFilters>();
        require_send::<config::GuardConfig>();
        require_sync::<config::GuardConfig>();

        // Errors
        require_send::<error::GuardrailViolation>();
        require_sync::<error::GuardrailViolation>();
        require_send::<error::PrecomputeError>();
        require_sync::<error::PrecomputeError>();
        require_send::<diagnostics::MemorySink>();
        require_sync::<diagnostics::MemorySink>();
    }

    /// Architecture contract: the engine cache cannot be shared between
    /// callers. `precompute` takes `&mut self`, so two holders of one engine
    /// cannot both compute; a second engine starts empty.
    #[test]
    fn engine_cache_is_per_instance() {
        let a = PrecomputeEngine::new();
        let b = a.clone();
        assert_eq!(a.cached().count(), 0);
        assert_eq!(b.cached().count(), 0);
    }
}
