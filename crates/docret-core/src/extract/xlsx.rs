use crate::error::IngestError;
use crate::models::{CellValue, RawTable, Row};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use docret_config::TableConfig;
use std::path::Path;
use tracing::debug;

/// Header plus data rows of the configured worksheet (first sheet by
/// default), both truncated to `max_columns`.
pub(super) fn extract(path: &Path, config: &TableConfig) -> Result<RawTable, IngestError> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e| IngestError::extraction(path, e))?;

    let sheet = match &config.sheet {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestError::extraction(path, "workbook has no worksheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| IngestError::extraction(path, format!("sheet '{sheet}': {e}")))?;

    let mut rows = anchored_rows(&range).into_iter();
    let header_cells = rows
        .next()
        .ok_or_else(|| IngestError::extraction(path, format!("sheet '{sheet}' has no header row")))?;

    let header = header_cells
        .into_iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Some(value) => value.to_string(),
            None => format!("column_{}", i + 1),
        })
        .collect();

    let data: Vec<Row> = rows.collect();

    debug!(
        "Read {} data rows from sheet '{}' of {}",
        data.len(),
        sheet,
        path.display()
    );

    Ok(RawTable::bounded(header, data, config.max_columns))
}

/// Cells positioned from A1. calamine ranges start at the first used cell,
/// so leading blank rows and columns are restored as absent cells.
fn anchored_rows(range: &Range<Data>) -> Vec<Row> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };
    let lead = first_col as usize;
    let width = lead + range.width();

    let mut rows: Vec<Row> = (0..first_row).map(|_| vec![None; width]).collect();
    rows.extend(range.rows().map(|cells| {
        std::iter::repeat(None)
            .take(lead)
            .chain(cells.iter().map(to_cell))
            .collect()
    }));
    rows
}

fn to_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Int(*i)),
        // Whole floats are how spreadsheets store most integers.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some(CellValue::Int(*f as i64))
        }
        Data::Float(f) => Some(CellValue::Float(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_conversion() {
        assert_eq!(to_cell(&Data::Empty), None);
        assert_eq!(to_cell(&Data::String(String::new())), None);
        assert_eq!(to_cell(&Data::Float(1.0)), Some(CellValue::Int(1)));
        assert_eq!(to_cell(&Data::Float(2.5)), Some(CellValue::Float(2.5)));
        assert_eq!(
            to_cell(&Data::String("Acme".into())),
            Some(CellValue::Text("Acme".into()))
        );
    }

    #[test]
    fn test_reads_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.xlsx");
        crate::extract::test_fixtures::write_xlsx(
            &path,
            &[
                vec!["id", "name", "", "note"],
                vec!["1", "Acme", "J", "foo | bar"],
                vec!["2", "", "N"],
            ],
        );

        let table = extract(&path, &TableConfig::default()).unwrap();
        assert_eq!(table.header, vec!["id", "name", "column_3", "note"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], Some(CellValue::Int(1)));
        assert_eq!(table.rows[0][3], Some(CellValue::Text("foo | bar".into())));
        assert_eq!(table.rows[1][1], None);
    }

    #[test]
    fn test_blank_leading_column_keeps_positions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");
        crate::extract::test_fixtures::write_xlsx(
            &path,
            &[vec!["", "id", "name"], vec!["", "1", "Acme"]],
        );

        let table = extract(&path, &TableConfig::default()).unwrap();
        assert_eq!(table.header, vec!["column_1", "id", "name"]);
        assert_eq!(
            table.rows,
            vec![vec![None, Some(CellValue::Int(1)), Some(CellValue::Text("Acme".into()))]]
        );
    }

    #[test]
    fn test_blank_first_row_is_still_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.xlsx");
        crate::extract::test_fixtures::write_xlsx(
            &path,
            &[vec![], vec!["id", "name"], vec!["1", "Acme"]],
        );

        let table = extract(&path, &TableConfig::default()).unwrap();
        assert_eq!(table.header, vec!["column_1", "column_2"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], Some(CellValue::Text("id".into())));
        assert_eq!(table.rows[1][1], Some(CellValue::Text("Acme".into())));
    }

    #[test]
    fn test_width_bounded_by_max_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.xlsx");
        crate::extract::test_fixtures::write_xlsx(
            &path,
            &[vec!["a", "b", "c", "d"], vec!["1", "2", "3", "4"]],
        );
        let config = TableConfig {
            split_column: 1,
            max_columns: 2,
            ..Default::default()
        };
        let table = extract(&path, &config).unwrap();
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn test_unknown_sheet_is_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.xlsx");
        crate::extract::test_fixtures::write_xlsx(&path, &[vec!["id"], vec!["1"]]);
        let config = TableConfig {
            sheet: Some("Missing".into()),
            ..Default::default()
        };
        assert!(matches!(
            extract(&path, &config).unwrap_err(),
            IngestError::ExtractionFailure { .. }
        ));
    }

    #[test]
    fn test_missing_file_is_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract(&dir.path().join("none.xlsx"), &TableConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::ExtractionFailure { .. }));
    }
}
