//! Header sniffing and column validation.

use csv::ReaderBuilder;

use bars_model::REQUIRED_COLUMNS;

use crate::error::{IngestError, Result};

/// Field delimiter of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Tab for `.tsv`/`.tab` files, otherwise whichever of tab or comma
    /// occurs more often in the header line.
    #[default]
    Auto,
    Comma,
    Tab,
}

impl Delimiter {
    pub fn byte(self) -> Option<u8> {
        match self {
            Self::Auto => None,
            Self::Comma => Some(b','),
            Self::Tab => Some(b'\t'),
        }
    }

    /// Resolve `Auto` from an optional file extension and the header line.
    pub fn resolve(self, extension: Option<&str>, data: &[u8]) -> u8 {
        if let Some(byte) = self.byte() {
            return byte;
        }
        if let Some(ext) = extension
            && (ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab"))
        {
            return b'\t';
        }
        let first_line = data.split(|b| *b == b'\n').next().unwrap_or_default();
        let tabs = first_line.iter().filter(|b| **b == b'\t').count();
        let commas = first_line.iter().filter(|b| **b == b',').count();
        if tabs > commas { b'\t' } else { b',' }
    }
}

/// Normalizes a header cell: strips a UTF-8 BOM and surrounding whitespace.
pub fn normalize_header(value: &str) -> String {
    value.trim_start_matches('\u{feff}').trim().to_string()
}

/// Reads the header row of delimited text.
///
/// Returns an empty vector when the input has no rows.
pub fn read_headers(data: &[u8], delimiter: u8) -> std::result::Result<Vec<String>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(data);
    let mut records = reader.records();
    match records.next() {
        Some(record) => Ok(record?.iter().map(normalize_header).collect()),
        None => Ok(Vec::new()),
    }
}

/// Required columns absent from `headers`, in contract order.
pub fn missing_columns(headers: &[String]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|header| header == *required))
        .map(|required| (*required).to_string())
        .collect()
}

/// Fails with every missing required column. Matching is case-sensitive and
/// order-independent; extra columns are allowed.
pub fn validate_columns(headers: &[String]) -> Result<()> {
    let missing = missing_columns(headers);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(IngestError::MissingColumns { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(line: &str) -> Vec<String> {
        read_headers(line.as_bytes(), b',').unwrap()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  OCS_BL "), "OCS_BL");
        assert_eq!(normalize_header("\u{feff}Patient ID"), "Patient ID");
    }

    #[test]
    fn test_read_headers_quoted() {
        assert_eq!(
            headers("\"Patient ID\", Treatment ,OCS_BL\nP1,A,1\n"),
            vec!["Patient ID", "Treatment", "OCS_BL"]
        );
    }

    #[test]
    fn test_read_headers_empty() {
        assert!(headers("").is_empty());
    }

    #[test]
    fn test_delimiter_detection() {
        assert_eq!(Delimiter::Auto.resolve(Some("TSV"), b"a,b"), b'\t');
        assert_eq!(Delimiter::Auto.resolve(None, b"a\tb\tc\n1,5\t2\t3"), b'\t');
        assert_eq!(Delimiter::Auto.resolve(Some("csv"), b"a,b,c"), b',');
        assert_eq!(Delimiter::Comma.resolve(Some("tsv"), b"a\tb"), b',');
    }

    #[test]
    fn test_validate_columns_reports_all_missing() {
        let present = headers("Patient ID,Treatment,OCS_BL,OCS_FU,ACT_BL,Extra");
        let err = validate_columns(&present).unwrap_err();
        match err {
            IngestError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["Exacerbation_BL", "ACT_FU", "Exacerbation_FU"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_columns_is_case_sensitive() {
        let present = headers(
            "patient id,Treatment,OCS_BL,OCS_FU,ACT_BL,ACT_FU,Exacerbation_BL,Exacerbation_FU",
        );
        assert_eq!(missing_columns(&present), vec!["Patient ID"]);
    }
}
