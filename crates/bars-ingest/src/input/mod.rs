//! Delimited text input.

mod header;
mod reader;

pub use header::{Delimiter, missing_columns, normalize_header, read_headers, validate_columns};
pub use reader::{
    IngestOptions, MAX_INPUT_SIZE, check_file_size, read_patient_table,
    read_patient_table_from_reader, validate_encoding,
};
