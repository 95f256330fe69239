//! CSV loading and saving

use crate::error::{DomusError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Load a CSV file with header and schema inference.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .map_err(|e| DomusError::DataError(format!("{}: {e}", path.display())))?;

    let reader = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file);

    reader
        .finish()
        .map_err(|e| DomusError::DataError(e.to_string()))
}

/// Write a DataFrame to CSV.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .map_err(|e| DomusError::DataError(format!("{}: {e}", path.display())))?;

    CsvWriter::new(&mut file)
        .finish(df)
        .map_err(|e| DomusError::DataError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "LotArea,SalePrice").unwrap();
        writeln!(file, "8450,208500").unwrap();
        writeln!(file, "9600,181500").unwrap();
        writeln!(file, "11250,223500").unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = create_test_csv();
        let df = load_csv(file.path()).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_csv(Path::new("does/not/exist.csv"));
        assert!(err.is_err());
    }

    #[test]
    fn test_write_csv_roundtrip() {
        let mut df = DataFrame::new(vec![
            Column::new("a".into(), &[1i64, 2, 3]),
            Column::new("b".into(), &[4i64, 5, 6]),
        ])
        .unwrap();

        let file = NamedTempFile::new().unwrap();
        write_csv(&mut df, file.path()).unwrap();

        let loaded = load_csv(file.path()).unwrap();
        assert_eq!(loaded.height(), 3);
        assert_eq!(loaded.width(), 2);
    }
}
