//! Time-axis ordering guard.

use crate::error::GuardrailViolation;
use crate::table::TimeTable;

/// Fail unless the index is strictly increasing and duplicate-free.
///
/// A decrease (or a null index entry) is an ordering violation; a repeated
/// value in an otherwise non-decreasing index is a duplicate violation.
pub fn assert_monotonic_index(table: &TimeTable) -> Result<(), GuardrailViolation> {
    let index = table.index()?;
    check_index(&index)
}

pub(crate) fn check_index(index: &[Option<i64>]) -> Result<(), GuardrailViolation> {
    if let Some(pos) = index.iter().position(Option::is_none) {
        return Err(GuardrailViolation::Ordering {
            position: pos,
            previous: pos.checked_sub(1).and_then(|p| index[p]),
            current: None,
        });
    }

    for (i, pair) in index.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(GuardrailViolation::Ordering {
                position: i + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }

    // Non-decreasing from here, so repeats are adjacent.
    if let Some(start) = index.windows(2).position(|pair| pair[0] == pair[1]) {
        let value = index[start];
        let count = index[start..].iter().take_while(|v| **v == value).count();
        return Err(GuardrailViolation::DuplicateIndex {
            value: value.unwrap_or_default(),
            count,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(values: &[i64]) -> Vec<Option<i64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn strictly_increasing_passes() {
        assert!(check_index(&idx(&[1, 2, 5, 9])).is_ok());
    }

    #[test]
    fn empty_and_single_pass() {
        assert!(check_index(&[]).is_ok());
        assert!(check_index(&idx(&[7])).is_ok());
    }

    #[test]
    fn decrease_is_ordering_violation() {
        let err = check_index(&idx(&[1, 3, 2])).unwrap_err();
        assert_eq!(
            err,
            GuardrailViolation::Ordering {
                position: 2,
                previous: Some(3),
                current: Some(2),
            }
        );
    }

    #[test]
    fn repeat_is_duplicate_violation() {
        let err = check_index(&idx(&[1, 2, 2, 3])).unwrap_err();
        assert_eq!(err, GuardrailViolation::DuplicateIndex { value: 2, count: 2 });
    }

    #[test]
    fn null_index_is_ordering_violation() {
        let err = check_index(&[Some(1), None, Some(3)]).unwrap_err();
        assert!(matches!(err, GuardrailViolation::Ordering { position: 1, .. }));
    }

    #[test]
    fn table_entry_point() {
        let table = crate::table::make_table(&[1.0, 2.0, 3.0]);
        assert!(assert_monotonic_index(&table).is_ok());

        let reversed =
            TimeTable::from_columns(vec![3, 2, 1], vec![("close", vec![1.0, 2.0, 3.0])]).unwrap();
        assert!(matches!(
            assert_monotonic_index(&reversed),
            Err(GuardrailViolation::Ordering { .. })
        ));
    }
}
