//! Cross-table alignment guard: every input must share one clock.

use crate::error::GuardrailViolation;
use crate::table::TimeTable;

/// Compare each table's length and index with the first table's.
///
/// Order of `tables` matters only for choosing the reference; zero or one
/// table is trivially aligned.
pub fn verify_alignment(tables: &[(&str, &TimeTable)]) -> Result<(), GuardrailViolation> {
    let Some((_, reference)) = tables.first() else {
        return Ok(());
    };
    let expected_index = reference.index()?;

    for (name, table) in &tables[1..] {
        if table.height() != reference.height() {
            return Err(GuardrailViolation::LengthMismatch {
                name: (*name).to_owned(),
                expected: reference.height(),
                actual: table.height(),
            });
        }
        let index = table.index()?;
        if let Some(position) = expected_index
            .iter()
            .zip(&index)
            .position(|(a, b)| a != b)
        {
            return Err(GuardrailViolation::IndexMismatch {
                name: (*name).to_owned(),
                position,
            });
        }
    }
    Ok(())
}
