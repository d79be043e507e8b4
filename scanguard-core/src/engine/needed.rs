//! Derive exactly the columns a set of expressions refers to.

use crate::engine::precompute::{PrecomputeEngine, PrecomputeReport, LAG1_PREFIX};
use crate::error::PrecomputeError;
use crate::filters::tokens::{column_references, parse_crossover};
use crate::indicators::{IndicatorFamily, Specifier};
use crate::table::TimeTable;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tracing::debug;

/// Columns an expression set needs, grouped by how they are produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredColumns {
    /// Canonical specifiers owning referenced indicator outputs.
    pub specifiers: BTreeSet<String>,
    /// Base columns that need a `lag1__` helper.
    pub lagged: BTreeSet<String>,
    /// Indicator-shaped names that no specifier can produce.
    pub malformed: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeededReport {
    pub precompute: PrecomputeReport,
    /// Helper columns written by this call.
    pub lag_helpers: Vec<String>,
    /// Bases of requested helpers that the table does not have.
    pub unresolved: Vec<String>,
}

/// `<family stem>_<digits>[_<digits>...]`, regardless of arity.
fn indicator_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let mut stems: Vec<&str> = IndicatorFamily::ALL
            .into_iter()
            .flat_map(|f| std::iter::once(f.prefix()).chain(f.output_stems().iter().copied()))
            .collect();
        stems.sort_unstable();
        stems.dedup();
        let pattern = format!(r"^({})((?:_\d+)+)$", stems.join("|"));
        Regex::new(&pattern).expect("indicator shape pattern is valid")
    })
}

/// Scan expression text for indicator outputs, `lag1__` helpers and
/// crossover names. Quoted strings, keywords and call names are not columns.
pub fn required_columns<I, S>(expressions: I) -> RequiredColumns
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut required = RequiredColumns::default();
    for expression in expressions {
        for token in column_references(expression.as_ref()) {
            if let Some(base) = token.strip_prefix(LAG1_PREFIX) {
                required.resolve(base);
                required.lagged.insert(base.to_owned());
            } else if let Some(cross) = parse_crossover(&token) {
                for leg in [cross.left, cross.right] {
                    required.resolve(&leg);
                    required.lagged.insert(leg);
                }
            } else {
                required.resolve(&token);
            }
        }
    }
    required
}

impl RequiredColumns {
    fn resolve(&mut self, column: &str) {
        if let Some(spec) = Specifier::from_column(column) {
            self.specifiers.insert(spec.to_string());
        } else if indicator_shape().is_match(column) {
            self.malformed.insert(column.to_owned());
        }
    }
}

/// PC002 for a name that looks like an indicator output but is not one.
fn malformed_reference(column: &str) -> PrecomputeError {
    let reason = match indicator_shape().captures(column) {
        Some(caps) => {
            let stem = &caps[1];
            let given = caps[2].split('_').skip(1).count();
            let family = IndicatorFamily::ALL
                .into_iter()
                .find(|f| f.prefix() == stem || f.output_stems().iter().any(|s| *s == stem));
            match family {
                Some(f) if given != f.arity() => {
                    format!("{f} takes {} parameter(s), got {given}", f.arity())
                }
                Some(f) if !f.output_stems().iter().any(|s| *s == stem) => format!(
                    "'{column}' is not an output column; {f} writes {}",
                    f.output_stems().join(", ")
                ),
                Some(f) => match Specifier::parse(&format!("{}{}", f.prefix(), &caps[2])) {
                    Err(PrecomputeError::Malformed { reason, .. }) => reason,
                    _ => "not an indicator column".to_owned(),
                },
                None => "not an indicator column".to_owned(),
            }
        }
        None => "not an indicator column".to_owned(),
    };
    PrecomputeError::Malformed {
        specifier: column.to_owned(),
        reason,
    }
}

/// Compute whatever `expressions` reference and the table lacks.
///
/// Indicator outputs go through [`PrecomputeEngine::precompute`]; `lag1__`
/// helpers are then derived for every `lag1__<col>` reference and both
/// legs of every crossover name. A helper whose base is absent is listed in
/// [`NeededReport::unresolved`] rather than failing. An indicator-shaped
/// name that no specifier owns is PC002 unless the table already holds it.
pub fn precompute_needed<I, S>(
    engine: &mut PrecomputeEngine,
    table: &mut TimeTable,
    expressions: I,
) -> Result<NeededReport, PrecomputeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let required = required_columns(expressions);
    if let Some(column) = required.malformed.iter().find(|c| !table.has_column(c)) {
        return Err(malformed_reference(column));
    }

    let precompute = engine.precompute(table, &required.specifiers)?;

    let mut report = NeededReport {
        precompute,
        ..NeededReport::default()
    };
    for base in &required.lagged {
        if !table.has_column(base) {
            debug!(column = %base, "lag helper base missing");
            report.unresolved.push(base.clone());
            continue;
        }
        if engine.ensure_lag1(table, base)? {
            report.lag_helpers.push(format!("{LAG1_PREFIX}{base}"));
        }
    }
    Ok(report)
}

/// Leading rows of `column` that carry no usable value when it is an
/// indicator output or a lag helper; `None` for anything else.
pub fn column_lookback(column: &str) -> Option<usize> {
    if let Some(base) = column.strip_prefix(LAG1_PREFIX) {
        return Some(column_lookback(base).unwrap_or(0) + 1);
    }
    let spec = Specifier::from_column(column)?;
    spec.outputs()
        .into_iter()
        .find(|o| o.name == column)
        .map(|o| o.lookback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::make_table;

    fn closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 50.0 + (i as f64 * 0.2).cos() * 3.0).collect()
    }

    #[test]
    fn outputs_map_to_owner() {
        let req = required_columns(["macd_hist_12_26_9 > 0 and rsi_14 < 30"]);
        let specs: Vec<&str> = req.specifiers.iter().map(String::as_str).collect();
        assert_eq!(specs, vec!["macd_12_26_9", "rsi_14"]);
        assert!(req.lagged.is_empty());
    }

    #[test]
    fn crossover_needs_both_legs_and_lags() {
        let req = required_columns(["ema_20_keser_ema_50_yukari"]);
        assert!(req.specifiers.contains("ema_20"));
        assert!(req.specifiers.contains("ema_50"));
        assert!(req.lagged.contains("ema_20"));
        assert!(req.lagged.contains("ema_50"));
    }

    #[test]
    fn malformed_names_detected() {
        let req = required_columns(["rsi_14_2 > 3 and bb_20_2 > 0 and close > 0"]);
        assert!(req.malformed.contains("rsi_14_2"));
        assert!(req.malformed.contains("bb_20_2"));
        assert_eq!(req.malformed.len(), 2);
    }

    #[test]
    fn quoted_text_is_not_a_reference() {
        let req = required_columns(["sector == 'rsi_14_2' and sma_5 > 0"]);
        assert!(req.malformed.is_empty());
        let specs: Vec<&str> = req.specifiers.iter().map(String::as_str).collect();
        assert_eq!(specs, vec!["sma_5"]);
    }

    #[test]
    fn supplied_column_with_indicator_shape_is_accepted() {
        let mut table = make_table(&closes(20));
        table.insert_f64("rsi_14_2", closes(20)).unwrap();
        let mut engine = PrecomputeEngine::new();
        let report = precompute_needed(&mut engine, &mut table, ["rsi_14_2 > 50"]).unwrap();
        assert!(report.precompute.computed.is_empty());
        assert_eq!(table.column_f64("rsi_14_2").unwrap(), closes(20));
    }

    #[test]
    fn malformed_reasons_name_the_problem() {
        let mut table = make_table(&closes(20));
        let mut engine = PrecomputeEngine::new();
        for (expr, column, fragment) in [
            ("sma_05 > 0", "sma_05", "not a positive integer"),
            ("rsi_18446744073709551615 < 30", "rsi_18446744073709551615", "must not exceed"),
            ("sma_0 > 0", "sma_0", "must be positive"),
        ] {
            let err = precompute_needed(&mut engine, &mut table, [expr]).unwrap_err();
            assert_eq!(err.code(), Some("PC002"), "{expr}");
            assert_eq!(err.specifier(), column);
            assert!(err.to_string().contains(fragment), "{err}");
        }
        assert!(!table.has_column("sma_5"));
    }

    #[test]
    fn computes_indicators_and_helpers() {
        let mut table = make_table(&closes(80));
        let mut engine = PrecomputeEngine::new();
        let report = precompute_needed(
            &mut engine,
            &mut table,
            ["close_keser_sma_10_yukari", "lag1__rsi_14 < 30"],
        )
        .unwrap();
        assert_eq!(report.precompute.computed, vec!["rsi_14", "sma_10"]);
        assert_eq!(
            report.lag_helpers,
            vec!["lag1__close", "lag1__rsi_14", "lag1__sma_10"]
        );
        assert!(report.unresolved.is_empty());
        assert!(table.has_column("lag1__sma_10"));

        let lag = table.column_f64("lag1__rsi_14").unwrap();
        let rsi = table.column_f64("rsi_14").unwrap();
        assert_eq!(lag[20], rsi[19]);
    }

    #[test]
    fn rerun_does_nothing() {
        let mut table = make_table(&closes(40));
        let mut engine = PrecomputeEngine::new();
        precompute_needed(&mut engine, &mut table, ["lag1__ema_5 > ema_5"]).unwrap();
        let before = table.fingerprint().unwrap();
        let again = precompute_needed(&mut engine, &mut table, ["lag1__ema_5 > ema_5"]).unwrap();
        assert!(again.precompute.is_noop());
        assert!(again.lag_helpers.is_empty());
        assert_eq!(table.fingerprint().unwrap(), before);
    }

    #[test]
    fn malformed_reference_is_pc002() {
        let mut table = make_table(&closes(40));
        let mut engine = PrecomputeEngine::new();
        let err = precompute_needed(&mut engine, &mut table, ["macd_12_26 > 0"]).unwrap_err();
        assert_eq!(err.code(), Some("PC002"));
        assert_eq!(err.specifier(), "macd_12_26");
    }

    #[test]
    fn missing_lag_base_is_unresolved() {
        let mut table = make_table(&closes(10));
        let mut engine = PrecomputeEngine::new();
        let report = precompute_needed(&mut engine, &mut table, ["lag1__foo > 1"]).unwrap();
        assert_eq!(report.unresolved, vec!["foo"]);
    }

    #[test]
    fn lookbacks() {
        assert_eq!(column_lookback("rsi_14"), Some(14));
        assert_eq!(column_lookback("macd_signal_12_26_9"), Some(33));
        assert_eq!(column_lookback("lag1__sma_5"), Some(5));
        assert_eq!(column_lookback("lag1__close"), Some(1));
        assert_eq!(column_lookback("close"), None);
    }
}
