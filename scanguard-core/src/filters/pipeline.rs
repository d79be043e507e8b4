//! Filter preparation: everything that must hold before a filter is
//! evaluated against a table.
//!
//! Order per call: index guard, sanitize, then for each definition the
//! forward-reference scan, precompute of the columns it needs, the warmup
//! check of its indicator columns and the missing-column check. A
//! definition failing any step is rejected with its reason; it is never
//! evaluated.

use crate::config::GuardConfig;
use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::engine::needed::{column_lookback, precompute_needed};
use crate::engine::precompute::PrecomputeEngine;
use crate::error::{ConfigError, GuardrailViolation, PrecomputeError};
use crate::filters::definition::FilterDefinition;
use crate::filters::sanitize::sanitize;
use crate::filters::tokens::{classify_missing, column_references, MissingColumnKind};
use crate::guards::alignment::verify_alignment;
use crate::guards::future_refs::FutureRefScanner;
use crate::guards::index::assert_monotonic_index;
use crate::guards::warmup::check_warmup;
use crate::guards::GuardCheck;
use crate::table::TimeTable;
use std::fmt;
use tracing::{info, warn};

/// A definition that passed every check, with the columns it reads.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFilter {
    pub definition: FilterDefinition,
    pub columns: Vec<String>,
    /// Leading rows on which this filter cannot produce a usable result.
    pub warmup_bars: usize,
}

#[derive(Debug)]
pub enum RejectReason {
    FutureReference(GuardrailViolation),
    Precompute(PrecomputeError),
    Warmup(GuardrailViolation),
    MissingColumns(Vec<(String, MissingColumnKind)>),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::FutureReference(v) | RejectReason::Warmup(v) => write!(f, "{v}"),
            RejectReason::Precompute(e) => write!(f, "{e}"),
            RejectReason::MissingColumns(missing) => {
                let parts: Vec<String> = missing
                    .iter()
                    .map(|(column, kind)| kind.describe(column))
                    .collect();
                write!(f, "{}", parts.join("; "))
            }
        }
    }
}

#[derive(Debug)]
pub struct RejectedFilter {
    pub definition: FilterDefinition,
    pub reason: RejectReason,
}

#[derive(Debug, Default)]
pub struct PreparedFilters {
    pub accepted: Vec<PreparedFilter>,
    pub rejected: Vec<RejectedFilter>,
}

impl PreparedFilters {
    pub fn rejected_codes(&self) -> Vec<&str> {
        self.rejected
            .iter()
            .map(|r| r.definition.code.as_str())
            .collect()
    }
}

/// Prepares filter definitions against tables. Owns one precompute engine,
/// so a pipeline should be used with one table (see
/// [`PrecomputeEngine::clear`] before switching).
#[derive(Debug)]
pub struct FilterPipeline {
    config: GuardConfig,
    scanner: FutureRefScanner,
    engine: PrecomputeEngine,
}

impl FilterPipeline {
    pub fn new(config: GuardConfig) -> Result<Self, ConfigError> {
        let scanner = config.scanner()?;
        Ok(Self {
            config,
            scanner,
            engine: PrecomputeEngine::new(),
        })
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn engine(&self) -> &PrecomputeEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PrecomputeEngine {
        &mut self.engine
    }

    /// Run every check and split `definitions` into accepted and rejected.
    ///
    /// A broken index fails the whole call; per-definition problems only
    /// reject that definition.
    pub fn prepare(
        &mut self,
        table: &mut TimeTable,
        definitions: &[FilterDefinition],
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<PreparedFilters, GuardrailViolation> {
        if self.enabled(GuardCheck::MonotonicIndex) {
            assert_monotonic_index(table)?;
        }

        let mut prepared = PreparedFilters::default();
        for definition in sanitize(definitions, sink) {
            match self.prepare_one(table, &definition) {
                Ok(filter) => prepared.accepted.push(filter),
                Err(reason) => {
                    warn!(filter = %definition.code, %reason, "filter rejected");
                    sink.emit(Diagnostic::error(definition.code.as_str(), reason.to_string()));
                    prepared.rejected.push(RejectedFilter { definition, reason });
                }
            }
        }

        info!(
            accepted = prepared.accepted.len(),
            rejected = prepared.rejected.len(),
            "filters prepared"
        );
        Ok(prepared)
    }

    /// Check that `tables` share the first one's index, unless alignment is
    /// suppressed by configuration.
    pub fn verify_alignment(&self, tables: &[(&str, &TimeTable)]) -> Result<(), GuardrailViolation> {
        if self.enabled(GuardCheck::Alignment) {
            verify_alignment(tables)?;
        }
        Ok(())
    }

    fn prepare_one(
        &mut self,
        table: &mut TimeTable,
        definition: &FilterDefinition,
    ) -> Result<PreparedFilter, RejectReason> {
        let expression = definition.expression.as_str();

        if self.enabled(GuardCheck::FutureRefs) {
            self.scanner
                .check(expression)
                .map_err(RejectReason::FutureReference)?;
        }

        precompute_needed(&mut self.engine, table, [expression])
            .map_err(RejectReason::Precompute)?;

        let columns = column_references(expression);
        let known = table.column_names();
        let (present, absent): (Vec<&String>, Vec<&String>) =
            columns.iter().partition(|c| known.contains(*c));

        let mut warmup_bars = 0;
        let check_indicator_warmup =
            self.config.verify_indicator_warmup && self.enabled(GuardCheck::Warmup);
        for column in &present {
            let Some(lookback) = column_lookback(column) else {
                continue;
            };
            warmup_bars = warmup_bars.max(lookback);
            if check_indicator_warmup {
                check_warmup(table, lookback as i64, &[column.as_str()])
                    .map_err(RejectReason::Warmup)?;
            }
        }

        if !absent.is_empty() {
            let missing = absent
                .into_iter()
                .map(|c| (c.clone(), classify_missing(c, &known)))
                .collect();
            return Err(RejectReason::MissingColumns(missing));
        }

        Ok(PreparedFilter {
            definition: definition.clone(),
            columns,
            warmup_bars,
        })
    }

    fn enabled(&self, check: GuardCheck) -> bool {
        if self.config.is_suppressed(check) {
            warn!(%check, "guard check suppressed by configuration");
            return false;
        }
        true
    }
}
