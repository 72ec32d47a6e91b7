//! Spreadsheet export.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

use crate::error::ScrapeError;
use crate::record::{HEADERS, TrialRecord};

/// Writes `records` to a single-sheet .xlsx workbook at `path`: one header
/// row, one row per record, no index column.
///
/// `None` for `path` means the operator chose not to export; nothing is
/// written and `Ok(None)` is returned.
pub fn export_xlsx(
    records: &[TrialRecord],
    path: Option<&Path>,
) -> Result<Option<PathBuf>, ScrapeError> {
    let Some(path) = path else {
        return Ok(None);
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (row, record) in records.iter().enumerate() {
        for (col, cell) in record.row().into_iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, cell)?;
        }
    }

    workbook.save(path)?;
    Ok(Some(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DetailFields;

    fn sample_records() -> Vec<TrialRecord> {
        vec![
            TrialRecord::new(
                "NCT01000001".into(),
                "https://clinicaltrials.gov/study/NCT01000001?cond=asthma&limit=100&rank=1".into(),
                DetailFields {
                    study_start: "2020-01".into(),
                    ..DetailFields::default()
                },
            ),
            TrialRecord::new(
                "NCT01000002".into(),
                "https://clinicaltrials.gov/study/NCT01000002?cond=asthma&limit=100&rank=2".into(),
                DetailFields::default(),
            ),
        ]
    }

    #[test]
    fn no_destination_writes_nothing() {
        let result = export_xlsx(&sample_records(), None).expect("skip is not an error");
        assert_eq!(result, None);
    }

    #[test]
    fn writes_workbook_and_returns_path() {
        let path = std::env::temp_dir().join("ctgov-scrape-export-test.xlsx");
        let written = export_xlsx(&sample_records(), Some(&path))
            .expect("export should succeed")
            .expect("a path was supplied");

        assert_eq!(written, path);
        let metadata = std::fs::metadata(&path).expect("file should exist");
        assert!(metadata.len() > 0);
        std::fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn empty_result_set_still_writes_header_row() {
        let path = std::env::temp_dir().join("ctgov-scrape-export-empty-test.xlsx");
        let written = export_xlsx(&[], Some(&path)).expect("export should succeed");
        assert_eq!(written.as_deref(), Some(path.as_path()));
        std::fs::remove_file(&path).expect("cleanup");
    }
}
