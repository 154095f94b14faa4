//! End-to-end tests of the `eva-commons` binary against the fixture dataset.

use assert_cmd::Command;
use predicates::prelude::*;

const FIXTURE: &str = "tests/data/variants.json";

fn eva() -> Command {
    Command::cargo_bin("eva-commons").unwrap()
}

fn json_stdout(args: &[&str]) -> serde_json::Value {
    let output = eva().args(args).output().unwrap();
    assert!(output.status.success(), "command failed: {args:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_region_text() {
    eva()
        .args(["region", "11:190062-190064", "--data", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("11_190060_CTGA_C"))
        .stdout(predicate::str::contains("study PRJEB6930 file ERZX00051: 4 sample(s), 3 cohort(s)"))
        .stdout(predicate::str::contains("annotation VEP 82 / cache 82"))
        .stdout(predicate::str::contains("genes BET1L"));
}

#[test]
fn test_region_json_has_decoded_samples() {
    let variants = json_stdout(&[
        "region",
        "11:190062-190064",
        "--data",
        FIXTURE,
        "--format",
        "json",
    ]);
    let variants = variants.as_array().unwrap();
    assert_eq!(variants.len(), 1);

    let entry = variants[0]["sourceEntries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["fileId"] == "ERZX00051")
        .unwrap();
    assert_eq!(entry["samplesData"]["HG03805"]["GT"], "0|1");
    assert_eq!(entry["samplesData"]["NA.19238"]["GT"], "0|0");
}

#[test]
fn test_region_count_with_filters() {
    eva()
        .args([
            "region",
            "11:190000-190100",
            "--polyphen",
            ">0.6",
            "--count",
            "--data",
            FIXTURE,
        ])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_region_explain_prints_query() {
    eva()
        .args([
            "region",
            "11:190000-191000",
            "--study",
            "PRJEB6930",
            "--explain",
            "--count",
            "--data",
            FIXTURE,
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Query:"))
        .stderr(predicate::str::contains("\"files.sid\""))
        .stderr(predicate::str::contains("\"$lte\": 191000"));
}

#[test]
fn test_region_rejects_inverted_region() {
    eva()
        .args(["region", "11:190064-190062", "--data", FIXTURE])
        .assert()
        .failure()
        .stderr(predicate::str::contains("190064"));
}

#[test]
fn test_region_rejects_out_of_range_score() {
    eva()
        .args(["region", "11", "--sift", "<1.5", "--data", FIXTURE])
        .assert()
        .failure();
}

#[test]
fn test_region_unknown_annotation_version() {
    eva()
        .args([
            "region",
            "11:190062-190064",
            "--annotation-vep",
            "99",
            "--annotation-cache",
            "99",
            "--data",
            FIXTURE,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("99"));
}

#[test]
fn test_beacon_exists() {
    eva()
        .args([
            "beacon",
            "--start-range",
            "9:10099",
            "--reference",
            "A",
            "--alternate",
            "T",
            "--type",
            "SNV",
            "--data",
            FIXTURE,
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Exists: true"))
        .stdout(predicate::str::contains("9_10099_A_T"));

    eva()
        .args([
            "beacon",
            "--start-range",
            "9:10099",
            "--end-range",
            "9:10098",
            "--reference",
            "A",
            "--data",
            FIXTURE,
        ])
        .assert()
        .success()
        .stdout("Exists: false\n");
}

#[test]
fn test_zero_page_size_rejected() {
    eva()
        .args([
            "beacon",
            "--start-range",
            "9:10099",
            "--reference",
            "A",
            "--alternate",
            "T",
            "--size",
            "0",
            "--data",
            FIXTURE,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--size"));

    eva()
        .args([
            "beacon",
            "--start-range",
            "9:10099",
            "--reference",
            "A",
            "--alternate",
            "T",
            "--size",
            "1",
            "--data",
            FIXTURE,
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Exists: true"));
}

#[test]
fn test_unknown_variant_type_rejected() {
    eva()
        .args(["beacon", "--start-range", "9:10099", "--type", "DELETION", "--data", FIXTURE])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown variant type 'DELETION'"));
}

#[test]
fn test_blank_study_rejected() {
    eva()
        .args(["beacon", "--start-range", "9:10099", "--study", "", "--data", FIXTURE])
        .assert()
        .failure()
        .stderr(predicate::str::contains("study id must not be blank"));
}

#[test]
fn test_beacon_json_ranges() {
    let found = json_stdout(&[
        "beacon",
        "--start-range",
        "11:190238-190276",
        "--end-range",
        "11:190238-190275",
        "--reference",
        "A",
        "--data",
        FIXTURE,
        "--format",
        "json",
    ]);
    assert_eq!(found["exists"], true);
    let variants = found["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0]["_id"], "11_190238_A_T");
}

#[test]
fn test_beacon_ranges_on_different_chromosomes() {
    eva()
        .args([
            "beacon",
            "--start-range",
            "9:10099",
            "--end-range",
            "11:10099",
            "--data",
            FIXTURE,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("different chromosomes"));
}

#[test]
fn test_boundaries_json() {
    let bounds = json_stdout(&[
        "boundaries",
        "11",
        "--study",
        "PRJEB8661",
        "--study",
        "PRJEB6930",
        "--data",
        FIXTURE,
        "--format",
        "json",
    ]);
    assert_eq!(bounds["lowest"], 190_010);
    assert_eq!(bounds["highest"], 194_190);

    let absent = json_stdout(&[
        "boundaries",
        "11",
        "--study",
        "PRJEB5870",
        "--data",
        FIXTURE,
        "--format",
        "json",
    ]);
    assert!(absent["lowest"].is_null());
    assert!(absent["highest"].is_null());
}

#[test]
fn test_boundaries_tsv_absent() {
    eva()
        .args([
            "boundaries",
            "11",
            "--study",
            "PRJEB5870",
            "--data",
            FIXTURE,
            "--format",
            "tsv",
        ])
        .assert()
        .success()
        .stdout("chromosome\tlowest\thighest\n11\tNA\tNA\n");
}

#[test]
fn test_count() {
    eva()
        .args(["count", "--data", FIXTURE])
        .assert()
        .success()
        .stdout("14\n");
}

#[test]
fn test_annotations_marks_default() {
    eva()
        .args(["annotations", "--data", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("VEP 82 / cache 82 (default)"))
        .stdout(predicate::str::contains("VEP 78 / cache 78\n"));
}

#[test]
fn test_config_file_changes_empty_study_policy() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"empty_study_list": "no_constraint"}"#).unwrap();

    let bounds = json_stdout(&[
        "boundaries",
        "9",
        "--data",
        FIXTURE,
        "--config",
        config.to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert_eq!(bounds["lowest"], 10_099);
    assert_eq!(bounds["highest"], 10_150);
}

#[test]
fn test_missing_data_file() {
    eva()
        .args(["count", "--data", "does/not/exist.json"])
        .assert()
        .failure();
}
