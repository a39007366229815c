use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error for '{path}': {source}")]
    File { path: String, source: csv::Error },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Column '{column}' has {actual} values but the table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("Row {row} has {actual} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// An in-memory CSV table of string cells with a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReactionTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn read_from(reader: impl Read) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let headers = reader.headers()?.iter().map(String::from).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(String::from).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn read_from_path(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path).map_err(|e| TableError::File {
            path: path.to_string_lossy().to_string(),
            source: e.into(),
        })?;
        Self::read_from(file).map_err(|e| with_path(e, path))
    }

    pub fn write_to(&self, writer: impl Write) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), TableError> {
        let file = std::fs::File::create(path).map_err(|e| TableError::File {
            path: path.to_string_lossy().to_string(),
            source: e.into(),
        })?;
        self.write_to(std::io::BufWriter::new(file))
            .map_err(|e| with_path(e, path))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn column(&self, name: &str) -> Result<Vec<&str>, TableError> {
        let index = self.column_index(name)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(index).map(String::as_str).unwrap_or(""))
            .collect())
    }

    /// Replaces the column named `name`, or appends it when absent.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        match self.headers.iter().position(|h| h == name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), TableError> {
        if row.len() != self.headers.len() {
            return Err(TableError::RaggedRow {
                row: self.rows.len(),
                expected: self.headers.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Keeps the rows whose entry in `mask` is `true`.
    pub fn filter_rows(&self, mask: &[bool]) -> Result<Self, TableError> {
        if mask.len() != self.rows.len() {
            return Err(TableError::LengthMismatch {
                column: "<mask>".to_string(),
                expected: self.rows.len(),
                actual: mask.len(),
            });
        }
        let rows = self
            .rows
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(row, _)| row.clone())
            .collect();
        Ok(Self {
            headers: self.headers.clone(),
            rows,
        })
    }
}

fn with_path(error: TableError, path: &Path) -> TableError {
    match error {
        TableError::Csv(source) => TableError::File {
            path: path.to_string_lossy().to_string(),
            source,
        },
        other => other,
    }
}

/// Output path next to `input`, named from the part of its file name before
/// the first `.` plus `suffix` (e.g. `data/in.mapped.csv` + `.tagged.csv`
/// gives `data/in.tagged.csv`).
pub fn derived_path(input: &Path, suffix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> ReactionTable {
        ReactionTable::read_from("id,rxn\n1,CC>>CO\n2,\"C.O>>CO\"\n".as_bytes()).unwrap()
    }

    #[test]
    fn read_from_parses_headers_and_rows() {
        let table = sample();
        assert_eq!(table.headers(), &["id".to_string(), "rxn".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("rxn").unwrap(), vec!["CC>>CO", "C.O>>CO"]);
    }

    #[test]
    fn read_from_rejects_ragged_rows() {
        let result = ReactionTable::read_from("a,b\n1\n".as_bytes());
        assert!(matches!(result, Err(TableError::Csv(_))));
    }

    #[test]
    fn missing_column_is_reported() {
        assert!(matches!(
            sample().column("mapped_rxn"),
            Err(TableError::MissingColumn(name)) if name == "mapped_rxn"
        ));
    }

    #[test]
    fn set_column_appends_then_replaces() {
        let mut table = sample();
        table
            .set_column("num_tags", vec!["1".into(), "2".into()])
            .unwrap();
        assert_eq!(table.headers().len(), 3);
        table
            .set_column("num_tags", vec!["3".into(), "4".into()])
            .unwrap();
        assert_eq!(table.column("num_tags").unwrap(), vec!["3", "4"]);
    }

    #[test]
    fn set_column_rejects_length_mismatch() {
        let mut table = sample();
        let result = table.set_column("x", vec!["1".into()]);
        assert!(matches!(
            result,
            Err(TableError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn filter_rows_keeps_masked_rows() {
        let filtered = sample().filter_rows(&[false, true]).unwrap();
        assert_eq!(filtered.column("id").unwrap(), vec!["2"]);
    }

    #[test]
    fn push_row_checks_width() {
        let mut table = ReactionTable::new(["a", "b"]);
        assert!(table.push_row(vec!["1".into(), "2".into()]).is_ok());
        assert!(matches!(
            table.push_row(vec!["1".into()]),
            Err(TableError::RaggedRow { row: 1, .. })
        ));
    }

    #[test]
    fn write_then_read_from_path_preserves_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        sample().write_to_path(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("id,rxn\n"));
        assert_eq!(ReactionTable::read_from_path(&path).unwrap(), sample());
    }

    #[test]
    fn read_from_path_reports_missing_file() {
        let dir = tempdir().unwrap();
        let result = ReactionTable::read_from_path(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(TableError::File { .. })));
    }

    #[test]
    fn derived_path_uses_text_before_first_dot() {
        assert_eq!(
            derived_path(Path::new("data/in.mapped.csv"), ".tagged.csv"),
            PathBuf::from("data/in.tagged.csv")
        );
        assert_eq!(
            derived_path(Path::new("reactions.csv"), ".mapped.csv"),
            PathBuf::from("reactions.mapped.csv")
        );
    }
}
