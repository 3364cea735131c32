//! Integration tests for the score pipeline.

use std::io::Write;
use std::path::Path;

use bars_cli::config::OutputFormat;
use bars_cli::pipeline::{CHARTS_DIR, InputSource, RunSettings, run};
use bars_model::ResponseGrade;
use bars_report::ChartOptions;

const PATIENTS: &str = "\
Patient ID,Treatment,OCS_BL,OCS_FU,ACT_BL,ACT_FU,Exacerbation_BL,Exacerbation_FU
P1,Dupilumab,20,0,14,21,4,1
P2,Mepolizumab,20,12,10,11,3,3
P3,Dupilumab,10,n/a,16,20,2,0
P4,,,,,,,
";

fn write_input(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("patients.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(PATIENTS.as_bytes()).unwrap();
    path
}

fn settings(input: &Path, output: &Path) -> RunSettings {
    RunSettings {
        output_dir: output.to_path_buf(),
        charts: Some(ChartOptions {
            width: 160,
            height: 100,
            histogram_bins: 4,
        }),
        ..RunSettings::new(InputSource::File(input.to_path_buf()))
    }
}

#[test]
fn scores_and_writes_every_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("out");

    let result = run(&settings(&input, &output)).unwrap();

    assert_eq!(result.rows.len(), 4);
    assert_eq!(result.rows[0].response_score, Some(ResponseGrade::Good));
    assert_eq!(result.rows[3].response_score, None);
    assert_eq!(result.distribution.total(), 4);
    assert_eq!(result.coerced.get("OCS_FU"), Some(&1));

    let names: Vec<String> = result
        .outputs
        .iter()
        .filter(|path| path.parent() == Some(output.as_path()))
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "scored.csv",
            "long_form.csv",
            "group_means.csv",
            "scored.json",
            "biologic_report.pdf",
        ]
    );
    assert!(output.join(CHARTS_DIR).join("ocs.png").is_file());
    assert!(output.join(CHARTS_DIR).join("Exacerbation_boxplot.png").is_file());

    let long = std::fs::read_to_string(output.join("long_form.csv")).unwrap();
    assert_eq!(long.lines().count(), 1 + 6 * 4);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("out");

    let result = run(&RunSettings {
        dry_run: true,
        ..settings(&input, &output)
    })
    .unwrap();

    assert!(result.dry_run);
    assert!(result.outputs.is_empty());
    assert!(!output.exists());
    assert_eq!(result.summaries.len(), 3);
}

#[test]
fn json_only_without_charts_or_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("out");

    let result = run(&RunSettings {
        format: OutputFormat::Json,
        charts: None,
        report: None,
        ..settings(&input, &output)
    })
    .unwrap();

    assert_eq!(result.outputs, vec![output.join("scored.json")]);
    assert!(!output.join(CHARTS_DIR).exists());
}

#[test]
fn missing_columns_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("partial.csv");
    std::fs::write(&input, "Patient ID,Treatment,OCS_BL,OCS_FU\nP1,Dupilumab,20,0\n").unwrap();
    let output = dir.path().join("out");

    let error = run(&settings(&input, &output)).unwrap_err();

    insta::assert_snapshot!(
        error.to_string(),
        @"missing required columns: ACT_BL, Exacerbation_BL, ACT_FU, Exacerbation_FU"
    );
    assert!(!output.exists());
}
