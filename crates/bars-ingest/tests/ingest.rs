//! End-to-end tests for reading patient tables.

use std::io::Write;

use bars_ingest::{
    Delimiter, IngestError, IngestOptions, read_patient_table, read_patient_table_from_reader,
};
use bars_model::{ClinicalDomain, Measurement, Timepoint};
use tempfile::Builder;

fn write_input(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn reads_tsv_by_extension_in_any_column_order() {
    let file = write_input(
        ".tsv",
        "ACT_FU\tACT_BL\tPatient ID\tNotes\tTreatment\tOCS_BL\tOCS_FU\tExacerbation_BL\tExacerbation_FU\n\
         21\t14\tP-01\tfirst visit\tDupilumab\t20\t0\t4\t1\n",
    );
    let table = read_patient_table(file.path(), &IngestOptions::default()).unwrap();
    let record = &table.records[0];
    assert_eq!(record.patient_id, "P-01");
    assert_eq!(
        record.measurement(ClinicalDomain::Act, Timepoint::Baseline),
        Measurement::Present(14.0)
    );
    assert_eq!(
        record.measurement(ClinicalDomain::Act, Timepoint::FollowUp),
        Measurement::Present(21.0)
    );
}

#[test]
fn explicit_delimiter_overrides_extension() {
    let file = write_input(".txt", "Patient ID;Treatment\nP1;A\n");
    let options = IngestOptions {
        delimiter: Delimiter::Tab,
        ..IngestOptions::default()
    };
    // the whole header is a single tab-delimited field
    let err = read_patient_table(file.path(), &options).unwrap_err();
    match err {
        IngestError::MissingColumns { missing } => assert_eq!(missing.len(), 8),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reports_every_missing_column_before_reading_rows() {
    let file = write_input(".csv", "Patient ID,OCS_BL,OCS_FU\nP1,1,2\n");
    let err = read_patient_table(file.path(), &IngestOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing required columns: ACT_BL, Exacerbation_BL, Treatment, ACT_FU, Exacerbation_FU"
    );
}

#[test]
fn header_only_input_is_an_empty_dataset() {
    let file = write_input(
        ".csv",
        "Patient ID,Treatment,OCS_BL,OCS_FU,ACT_BL,ACT_FU,Exacerbation_BL,Exacerbation_FU\n",
    );
    let err = read_patient_table(file.path(), &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyDataset { .. }));
}

#[test]
fn empty_input_is_rejected() {
    let err = read_patient_table_from_reader(&b""[..], &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyInput { .. }));
}

#[test]
fn reads_from_a_reader_and_counts_coercions() {
    let input = "Patient ID,Treatment,OCS_BL,OCS_FU,ACT_BL,ACT_FU,Exacerbation_BL,Exacerbation_FU\n\
                 P1,Mepolizumab,ten,5,12,,3,n/a\n\
                 P2,Mepolizumab,10,5,12,18,3,1\n";
    let table = read_patient_table_from_reader(input.as_bytes(), &IngestOptions::default()).unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.records[0].ocs.baseline.is_missing());
    assert!(table.records[0].act.follow_up.is_missing());
    assert_eq!(table.coerced.get("OCS_BL"), Some(&1));
    assert_eq!(table.coerced.get("Exacerbation_FU"), Some(&1));
    assert_eq!(table.coerced_total(), 2);
}

#[test]
fn blank_and_repeated_extra_columns_are_ignored() {
    let input = "Patient ID,Treatment,OCS_BL,OCS_FU,ACT_BL,ACT_FU,Exacerbation_BL,Exacerbation_FU,,\n\
                 P1,A,20,0,14,21,4,1,,\n";
    let table = read_patient_table_from_reader(input.as_bytes(), &IngestOptions::default()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.records[0].ocs.baseline, Measurement::Present(20.0));

    let input = "Patient ID,Treatment,OCS_BL,OCS_FU,ACT_BL,ACT_FU,Exacerbation_BL,Exacerbation_FU, Notes,Notes \n\
                 P1,A,20,0,14,21,4,1,first,second\n";
    let table = read_patient_table_from_reader(input.as_bytes(), &IngestOptions::default()).unwrap();
    assert_eq!(table.records[0].patient_id, "P1");
    assert_eq!(table.records[0].exacerbation.follow_up, Measurement::Present(1.0));
}

#[test]
fn blank_lines_do_not_become_patients() {
    let input = "Patient ID,Treatment,OCS_BL,OCS_FU,ACT_BL,ACT_FU,Exacerbation_BL,Exacerbation_FU\n\
                 P1,A,20,0,14,21,4,1\n\
                 \n\
                 P2,B,20,12,10,11,3,3\n";
    let table = read_patient_table_from_reader(input.as_bytes(), &IngestOptions::default()).unwrap();
    let ids: Vec<&str> = table.records.iter().map(|r| r.patient_id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P2"]);
}

#[test]
fn header_followed_by_blank_lines_is_an_empty_dataset() {
    let input = "Patient ID,Treatment,OCS_BL,OCS_FU,ACT_BL,ACT_FU,Exacerbation_BL,Exacerbation_FU\n,,,,,,,\n\n";
    let err = read_patient_table_from_reader(input.as_bytes(), &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyDataset { .. }));
}
