use crate::error::{Result, StmtError};
use crate::models::{is_blank, Row};

/// Rows with a blank first cell are wrapped lines of the row above them.
fn is_continuation(row: &Row) -> bool {
    is_blank(row.first())
}

fn merge(parent: Row, continuation: Row) -> Result<Row> {
    if parent.len() != continuation.len() {
        return Err(StmtError::Arity {
            expected: parent.len(),
            found: continuation.len(),
        });
    }
    Ok(parent
        .into_iter()
        .zip(continuation)
        .map(|(a, b)| Some(a.unwrap_or_default() + b.as_deref().unwrap_or_default()))
        .collect())
}

/// Merge continuation rows into the logical row they belong to.
///
/// Continuations concatenate cell by cell onto the pending row. A
/// continuation with nothing before it is dropped.
pub fn stitch_rows(rows: Vec<Row>) -> Result<Vec<Row>> {
    let (mut stitched, pending) = rows.into_iter().try_fold(
        (Vec::new(), None::<Row>),
        |(mut stitched, pending), row| -> Result<_> {
            if is_continuation(&row) {
                let pending = match pending {
                    Some(parent) => Some(merge(parent, row)?),
                    None => None,
                };
                Ok((stitched, pending))
            } else {
                stitched.extend(pending);
                Ok((stitched, Some(row)))
            }
        },
    )?;
    stitched.extend(pending);
    Ok(stitched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::row;

    #[test]
    fn test_continuation_concatenates_cells() {
        let rows = vec![row(&["A", "1"]), row(&["", "2"])];
        assert_eq!(stitch_rows(rows).unwrap(), vec![row(&["A", "12"])]);
    }

    #[test]
    fn test_absent_cells_concatenate_as_empty() {
        let rows = vec![
            vec![Some("01/01/2024".into()), Some("PRLV SEPA".into()), None],
            vec![None, Some(" EDF".into()), None],
        ];
        assert_eq!(
            stitch_rows(rows).unwrap(),
            vec![row(&["01/01/2024", "PRLV SEPA EDF", ""])]
        );
    }

    #[test]
    fn test_well_formed_input_is_unchanged() {
        let rows = vec![
            row(&["01/01/2024", "LOYER", "850,00"]),
            row(&["03/01/2024", "CB CARREFOUR", "42,10"]),
        ];
        assert_eq!(stitch_rows(rows.clone()).unwrap(), rows);
    }

    #[test]
    fn test_multiple_continuations_chain() {
        let rows = vec![
            row(&["01/01/2024", "VIR", ""]),
            row(&["  ", " SEPA", ""]),
            row(&["", " DUPONT", "10"]),
            row(&["02/01/2024", "CB", "5"]),
        ];
        assert_eq!(
            stitch_rows(rows).unwrap(),
            vec![row(&["01/01/2024  ", "VIR SEPA DUPONT", "10"]), row(&["02/01/2024", "CB", "5"])]
        );
    }

    #[test]
    fn test_leading_continuation_is_dropped() {
        let rows = vec![row(&["", "orphan"]), row(&["01/01/2024", "LOYER"])];
        assert_eq!(stitch_rows(rows).unwrap(), vec![row(&["01/01/2024", "LOYER"])]);
    }

    #[test]
    fn test_empty_input() {
        assert!(stitch_rows(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_width_is_an_error() {
        let rows = vec![row(&["A", "1", "x"]), row(&["", "2"])];
        let err = stitch_rows(rows).unwrap_err();
        assert!(matches!(err, StmtError::Arity { expected: 3, found: 2 }));
    }
}
