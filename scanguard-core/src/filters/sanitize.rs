//! Drop unusable filter rows before anything is evaluated.

use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::filters::definition::FilterDefinition;

/// Return the usable definitions, in input order.
///
/// * empty or whitespace-only expression: dropped, info diagnostic
/// * empty code: dropped, info diagnostic
/// * literal `true`/`false` (any case, trimmed): kept, one warning
///
/// The input slice is never modified.
pub fn sanitize(
    definitions: &[FilterDefinition],
    sink: &mut dyn DiagnosticsSink,
) -> Vec<FilterDefinition> {
    let mut kept = Vec::with_capacity(definitions.len());
    for (row, definition) in definitions.iter().enumerate() {
        let code = definition.code.trim();
        let expression = definition.expression.trim();

        if expression.is_empty() {
            let subject = if code.is_empty() {
                format!("<row {row}>")
            } else {
                code.to_owned()
            };
            sink.emit(Diagnostic::info(subject, "empty expression, filter dropped"));
            continue;
        }
        if code.is_empty() {
            sink.emit(Diagnostic::info(
                format!("<row {row}>"),
                format!("filter without a code dropped: {expression}"),
            ));
            continue;
        }
        if expression.eq_ignore_ascii_case("true") || expression.eq_ignore_ascii_case("false") {
            sink.emit(Diagnostic::warning(
                code,
                format!("expression is the constant '{expression}' and selects every row or none"),
            ));
        }
        kept.push(definition.clone());
    }
    kept
}
