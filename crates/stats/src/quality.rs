use crate::StatsError;
use rollbook_types::BallotRecord;

/// Data-quality gate run before any grouping.
///
/// Fails when there are no rows, when a required column name is not a ballot
/// column, or when a required column is blank on every row. A column that is
/// blank on only some rows passes; those rows are grouped as unknown later.
pub fn check_required_columns<S: AsRef<str>>(
    rows: &[BallotRecord],
    columns: &[S],
) -> Result<(), StatsError> {
    if rows.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    for column in columns {
        let column = column.as_ref();
        let mut present = false;
        for row in rows {
            match row.column(column) {
                None => return Err(StatsError::UnknownColumn(column.to_string())),
                Some(Some(_)) => {
                    present = true;
                    break;
                }
                Some(None) => {}
            }
        }
        if !present {
            return Err(StatsError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}
