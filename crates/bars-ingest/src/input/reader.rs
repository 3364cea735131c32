//! Loading a patient table from a file or any reader.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use polars::prelude::*;

use bars_model::REQUIRED_COLUMNS;

use crate::error::{IngestError, Result};
use crate::records::{PatientTable, records_from_frame};

use super::header::{Delimiter, read_headers, validate_columns};

/// Maximum input size (500 MB).
pub const MAX_INPUT_SIZE: u64 = 500 * 1024 * 1024;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Options for reading a patient table.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub delimiter: Delimiter,
    pub max_size: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Auto,
            max_size: MAX_INPUT_SIZE,
        }
    }
}

fn open_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

/// Check file size before loading.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Rejects UTF-16 input. A UTF-8 BOM is accepted.
pub fn validate_encoding(data: &[u8], path: &Path) -> Result<()> {
    let encoding = match data.get(0..2) {
        Some([0xFF, 0xFE]) => "UTF-16 LE",
        Some([0xFE, 0xFF]) => "UTF-16 BE",
        _ => return Ok(()),
    };
    Err(IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding,
    })
}

/// Reads a patient table from a CSV or TSV file.
pub fn read_patient_table(path: &Path, options: &IngestOptions) -> Result<PatientTable> {
    check_file_size(path, options.max_size)?;
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let extension = path.extension().and_then(|ext| ext.to_str());
    read_from(file, path, extension, options)
}

/// Reads a patient table from any reader, e.g. stdin.
pub fn read_patient_table_from_reader<R: Read>(
    reader: R,
    options: &IngestOptions,
) -> Result<PatientTable> {
    read_from(reader, Path::new("<stdin>"), None, options)
}

fn read_from<R: Read>(
    reader: R,
    source: &Path,
    extension: Option<&str>,
    options: &IngestOptions,
) -> Result<PatientTable> {
    let mut data = Vec::new();
    reader
        .take(options.max_size.saturating_add(1))
        .read_to_end(&mut data)
        .map_err(|e| IngestError::FileRead {
            path: source.to_path_buf(),
            source: e,
        })?;
    let size = data.len() as u64;
    if size > options.max_size {
        return Err(IngestError::FileTooLarge {
            path: source.to_path_buf(),
            size,
            max_size: options.max_size,
        });
    }
    validate_encoding(&data, source)?;
    if data.starts_with(UTF8_BOM) {
        data.drain(..UTF8_BOM.len());
    }

    let delimiter = options.delimiter.resolve(extension, &data);
    let headers = read_headers(&data, delimiter).map_err(|e| parse_error(source, e))?;
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyInput {
            path: source.to_path_buf(),
        });
    }
    validate_columns(&headers)?;

    let df = read_frame(data, delimiter, source)?;
    let df = select_required(&df, &headers, source)?;
    let table = records_from_frame(&df)?;
    if table.is_empty() {
        return Err(IngestError::EmptyDataset {
            path: source.to_path_buf(),
        });
    }
    tracing::debug!(
        source = %source.display(),
        rows = table.len(),
        delimiter = %char::from(delimiter).escape_default(),
        coerced = table.coerced_total(),
        "read patient table"
    );
    Ok(table)
}

/// Parses delimited text with every column read as text.
fn read_frame(data: Vec<u8>, delimiter: u8, source: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|parse| parse.with_separator(delimiter))
        .into_reader_with_file_handle(Cursor::new(data))
        .finish()
        .map_err(|e| parse_error(source, e))
}

/// Keeps the required columns under their canonical names, located by
/// position in the normalized header row. Extra columns are dropped, so their
/// names may repeat or be blank.
fn select_required(df: &DataFrame, headers: &[String], source: &Path) -> Result<DataFrame> {
    let columns = df.get_columns();
    let mut selected = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for required in REQUIRED_COLUMNS {
        let column = headers
            .iter()
            .position(|header| header == required)
            .and_then(|idx| columns.get(idx))
            .ok_or_else(|| parse_error(source, format!("no data for column {required}")))?;
        selected.push(column.clone().with_name(required.into()));
    }
    Ok(DataFrame::new(selected)?)
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> IngestError {
    IngestError::Parse {
        path: PathBuf::from(path),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "Patient ID,Treatment,OCS_BL,OCS_FU,ACT_BL,ACT_FU,Exacerbation_BL,Exacerbation_FU";

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_patient_table() {
        let content = format!("{HEADER}\nP1,Dupilumab,20,0,14,21,4,1\nP2,,10,,12,15,2,2\n");
        let file = create_temp_csv(content.as_bytes());
        let table = read_patient_table(file.path(), &IngestOptions::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[1].treatment, None);
        assert!(table.records[1].ocs.follow_up.is_missing());
    }

    #[test]
    fn test_read_with_bom_and_padded_headers() {
        let content = "\u{feff} Patient ID , Treatment,OCS_BL,OCS_FU,ACT_BL,ACT_FU,Exacerbation_BL,Exacerbation_FU\nP1,A,1,2,3,4,5,6\n";
        let file = create_temp_csv(content.as_bytes());
        let table = read_patient_table(file.path(), &IngestOptions::default()).unwrap();
        assert_eq!(table.records[0].patient_id, "P1");
    }

    #[test]
    fn test_utf16_is_rejected() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'P', 0]);
        let result = read_patient_table(file.path(), &IngestOptions::default());
        assert!(matches!(result, Err(IngestError::UnsupportedEncoding { .. })));
    }

    #[test]
    fn test_size_limit() {
        let content = format!("{HEADER}\nP1,A,1,2,3,4,5,6\n");
        let file = create_temp_csv(content.as_bytes());
        let options = IngestOptions {
            max_size: 16,
            ..IngestOptions::default()
        };
        let result = read_patient_table(file.path(), &options);
        assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));

        let result = read_patient_table_from_reader(content.as_bytes(), &options);
        assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));
    }

    #[test]
    fn test_select_required_ignores_repeated_extra_names() {
        let headers: Vec<String> = format!("{HEADER},,Notes,Notes")
            .split(',')
            .map(str::to_string)
            .collect();
        let columns: Vec<Column> = (0..headers.len())
            .map(|idx| Series::new(format!("c{idx}").into(), vec![idx.to_string()]).into())
            .collect();
        let df = DataFrame::new(columns).unwrap();
        let selected = select_required(&df, &headers, Path::new("input.csv")).unwrap();
        assert_eq!(selected.width(), 8);
        let names: Vec<&str> = selected.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, REQUIRED_COLUMNS.to_vec());
        // Patient ID is the first header cell
        let id = selected.column("Patient ID").unwrap().str().unwrap().get(0);
        assert_eq!(id, Some("0"));
    }

    #[test]
    fn test_file_not_found() {
        let result = read_patient_table(Path::new("/nonexistent/input.csv"), &IngestOptions::default());
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
