//! Precompute across many independent tables.

use crate::engine::precompute::{PrecomputeEngine, PrecomputeReport};
use crate::error::PrecomputeError;
use crate::table::TimeTable;
use rayon::prelude::*;

/// Run `specs` against every table, each with its own fresh engine.
///
/// Tables share nothing, so they are processed on the rayon pool when
/// `parallel` is set. Results line up with `tables`; one failure does not
/// stop the others.
pub fn precompute_tables<S>(
    tables: &mut [TimeTable],
    specs: &[S],
    parallel: bool,
) -> Vec<Result<PrecomputeReport, PrecomputeError>>
where
    S: AsRef<str> + Sync,
{
    let run = |table: &mut TimeTable| {
        let mut engine = PrecomputeEngine::new();
        engine.precompute(table, specs)
    };

    if parallel {
        tables.par_iter_mut().map(run).collect()
    } else {
        tables.iter_mut().map(run).collect()
    }
}
