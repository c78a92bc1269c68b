//! CSV loading with an encoding fallback.
//!
//! Files are decoded as UTF-8 first and as Windows-1252 (a Latin-1
//! superset) when that fails, then parsed with Polars. Every column is read
//! as a string so cells keep their exact source text (`"007"`, `"0.30"`);
//! empty cells arrive as nulls.

use std::borrow::Cow;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::WINDOWS_1252;
use polars::prelude::{AnyValue, CsvReadOptions, DataFrame, SerReader};

use nutri_model::{CellValue, Header, RawRecord};

use crate::error::{IngestError, Result};

/// Text encoding a source was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Windows1252,
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => f.write_str("utf-8"),
            Self::Windows1252 => f.write_str("windows-1252"),
        }
    }
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub path: PathBuf,
    pub encoding: SourceEncoding,
    pub header: Arc<Header>,
    pub records: Vec<RawRecord>,
}

impl SourceTable {
    /// File name for display, falling back to the full path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A file that was skipped and why.
#[derive(Debug)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub error: IngestError,
}

/// Reads one CSV file into raw records.
pub fn read_source(path: &Path) -> Result<SourceTable> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::open(path, e))?;
    let (text, encoding) = decode(&bytes);

    if text.trim().is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let df = parse_csv(text.into_owned().into_bytes()).map_err(|message| {
        IngestError::Unreadable {
            path: path.to_path_buf(),
            tried: attempted(encoding),
            message,
        }
    })?;

    let table = table_from_frame(path, encoding, &df);
    tracing::debug!(
        path = %path.display(),
        %encoding,
        columns = table.header.len(),
        rows = table.records.len(),
        "source loaded"
    );
    Ok(table)
}

/// Reads every file, skipping (and logging) those that cannot be parsed.
pub fn read_sources(paths: &[PathBuf]) -> (Vec<SourceTable>, Vec<SkippedSource>) {
    let mut tables = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();
    for path in paths {
        match read_source(path) {
            Ok(table) => tables.push(table),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping unreadable source");
                skipped.push(SkippedSource {
                    path: path.clone(),
                    error,
                });
            }
        }
    }
    (tables, skipped)
}

/// Decodes bytes as UTF-8 (BOM stripped), falling back to Windows-1252.
pub fn decode(bytes: &[u8]) -> (Cow<'_, str>, SourceEncoding) {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), SourceEncoding::Utf8),
        Err(_) => {
            let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text, SourceEncoding::Windows1252)
        }
    }
}

fn attempted(encoding: SourceEncoding) -> String {
    match encoding {
        SourceEncoding::Utf8 => SourceEncoding::Utf8.to_string(),
        SourceEncoding::Windows1252 => {
            format!("{}, {}", SourceEncoding::Utf8, SourceEncoding::Windows1252)
        }
    }
}

fn parse_csv(bytes: Vec<u8>) -> std::result::Result<DataFrame, String> {
    CsvReadOptions::default()
        .with_has_header(true)
        // No inference: every column is a string column
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| e.to_string())
}

fn table_from_frame(path: &Path, encoding: SourceEncoding, df: &DataFrame) -> SourceTable {
    let header = Arc::new(Header::new(
        df.get_column_names().iter().map(|name| name.as_str()),
    ));
    let columns = df.get_columns();
    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let values: Vec<CellValue> = columns
            .iter()
            .map(|column| CellValue::from(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        // Skip rows that are blank across every column
        if values.iter().all(CellValue::is_missing) {
            continue;
        }
        records.push(RawRecord::new(Arc::clone(&header), values));
    }
    SourceTable {
        path: path.to_path_buf(),
        encoding,
        header,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_decode_utf8_strips_bom() {
        let (text, encoding) = decode(b"\xEF\xBB\xBFfood\n");
        assert_eq!(text, "food\n");
        assert_eq!(encoding, SourceEncoding::Utf8);
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        // "Jalapeño" with a Latin-1 encoded ñ
        let (text, encoding) = decode(b"Jalape\xF1o");
        assert_eq!(text, "Jalapeño");
        assert_eq!(encoding, SourceEncoding::Windows1252);
    }

    #[test]
    fn test_read_source_types_and_headers() {
        let file = create_temp_csv(b" Food ,Calories,Protein (g)\nApple,52,0.3\nBanana,,1.1\n");
        let table = read_source(file.path()).unwrap();

        assert_eq!(table.header.names(), ["Food", "Calories", "Protein (g)"]);
        assert_eq!(table.records.len(), 2);
        let apple = &table.records[0];
        assert_eq!(apple.get("Food"), Some(&CellValue::text("Apple")));
        assert_eq!(apple.get("Calories"), Some(&CellValue::text("52")));
        assert_eq!(apple.get("Protein (g)"), Some(&CellValue::text("0.3")));
        assert!(table.records[1].get("Calories").unwrap().is_missing());
    }

    #[test]
    fn test_read_source_keeps_source_text() {
        let file = create_temp_csv(
            b"code,Protein (g),id
007,0.30,9007199254740993
00123,1.50,9007199254740992
",
        );
        let table = read_source(file.path()).unwrap();

        let first = &table.records[0];
        assert_eq!(first.get("code"), Some(&CellValue::text("007")));
        assert_eq!(first.get("Protein (g)"), Some(&CellValue::text("0.30")));
        assert_eq!(first.get("id"), Some(&CellValue::text("9007199254740993")));
        let second = &table.records[1];
        assert_eq!(second.get("code"), Some(&CellValue::text("00123")));
        assert_eq!(second.get("id"), Some(&CellValue::text("9007199254740992")));
    }

    #[test]
    fn test_read_source_latin1_file() {
        let file = create_temp_csv(b"nombre,pasos\nPi\xF1a colada,Mezclar\n");
        let table = read_source(file.path()).unwrap();
        assert_eq!(table.encoding, SourceEncoding::Windows1252);
        assert_eq!(
            table.records[0].get("nombre"),
            Some(&CellValue::text("Piña colada"))
        );
    }

    #[test]
    fn test_read_source_empty_file() {
        let file = create_temp_csv(b"");
        let result = read_source(file.path());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_sources_skips_missing_files() {
        let good = create_temp_csv(b"food\napple\n");
        let paths = vec![
            good.path().to_path_buf(),
            PathBuf::from("/nonexistent/missing.csv"),
        ];
        let (tables, skipped) = read_sources(&paths);
        assert_eq!(tables.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert!(matches!(skipped[0].error, IngestError::FileNotFound { .. }));
    }
}
