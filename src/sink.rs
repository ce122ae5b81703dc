//! Tabular persistence of the match result
//!
//! The persisted artifact is a three-column sheet — channel id, channel name,
//! creator id — with a header row first and data rows from row 2, written
//! back to the same named file it was read from. [`CsvSheetSink`] keeps an
//! existing header row intact so a hand-edited sheet keeps its column titles
//! across runs.

use crate::error::SinkError;
use crate::types::MatchResult;
use std::path::{Path, PathBuf};

/// Default header row for a freshly created sheet
const DEFAULT_HEADERS: [&str; 3] = ["channel_id", "channel_name", "creator_id"];

/// Destination for the accumulated match result
pub trait ResultSink {
    /// Persist one row per result entry, replacing previous data rows
    fn persist(&self, result: &MatchResult) -> Result<(), SinkError>;
}

/// Sheet sink writing a three-column CSV file
pub struct CsvSheetSink {
    path: PathBuf,
}

impl CsvSheetSink {
    /// Create a sink writing to the given sheet file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the sheet file this sink writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the header row of an existing sheet, if the file has one
    fn existing_headers(&self) -> Option<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .ok()?;
        let mut record = csv::StringRecord::new();
        match reader.read_record(&mut record) {
            Ok(true) if record.len() == DEFAULT_HEADERS.len() => {
                Some(record.iter().map(String::from).collect())
            }
            _ => None,
        }
    }
}

impl ResultSink for CsvSheetSink {
    fn persist(&self, result: &MatchResult) -> Result<(), SinkError> {
        let headers = self
            .existing_headers()
            .unwrap_or_else(|| DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect());

        let write = || -> csv::Result<()> {
            let mut writer = csv::Writer::from_path(&self.path)?;
            writer.write_record(&headers)?;
            // Data rows start at row 2, one per matched channel
            for (channel_id, matched) in result.iter() {
                writer.write_record([
                    channel_id.as_str(),
                    matched.candidate_name.as_str(),
                    matched.creator_id.as_str(),
                ])?;
            }
            writer.flush()?;
            Ok(())
        };

        write().map_err(|e| SinkError::WriteFailed {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        tracing::info!(
            path = %self.path.display(),
            rows = result.len(),
            "persisted match sheet"
        );
        Ok(())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> MatchResult {
        let mut result = MatchResult::new();
        result.record("C1", "Random-Coffee", "U1");
        result.record("C2", "eng-platform", "U2");
        result
    }

    #[test]
    fn writes_header_then_one_row_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");

        CsvSheetSink::new(&path).persist(&sample_result()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], "channel_id,channel_name,creator_id");
        assert_eq!(lines[1], "C1,Random-Coffee,U1");
        assert_eq!(lines[2], "C2,eng-platform,U2");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn preserves_an_existing_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, "Channel ID,Channel Name,Creator\nSTALE,row,here\n").unwrap();

        CsvSheetSink::new(&path).persist(&sample_result()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], "Channel ID,Channel Name,Creator");
        assert_eq!(lines[1], "C1,Random-Coffee,U1");
        assert!(
            !contents.contains("STALE"),
            "previous data rows are replaced"
        );
    }

    #[test]
    fn empty_result_writes_only_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");

        CsvSheetSink::new(&path).persist(&MatchResult::new()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn unwritable_path_is_a_sink_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-subdir").join("sheet.csv");

        let err = CsvSheetSink::new(&path)
            .persist(&sample_result())
            .unwrap_err();
        assert!(matches!(err, SinkError::WriteFailed { .. }));
    }

    #[test]
    fn rows_are_written_in_deterministic_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");

        let mut result = MatchResult::new();
        result.record("C9", "z", "U9");
        result.record("C1", "a", "U1");
        CsvSheetSink::new(&path).persist(&result).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[1], "C1,a,U1");
        assert_eq!(lines[2], "C9,z,U9");
    }
}
