#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn generate_check_export_roundtrip() {
    let dir = tempdir().unwrap();
    let employees = dir.path().join("employees.csv");
    std::fs::write(
        &employees,
        "id,name,country,status\n\
         E1,Ana Reyes,CountryA,active\n\
         E2,Luis Paz,CountryA,active\n\
         E3,Mara Vidal,CountryB,active\n",
    )
    .unwrap();
    let plan = dir.path().join("plan.json");

    Command::cargo_bin("turnero-cli")
        .unwrap()
        .args([
            "--plan",
            plan.to_str().unwrap(),
            "generate",
            "--start",
            "2026-01-05",
            "--end",
            "2026-01-11",
            "--employees",
            employees.to_str().unwrap(),
            "--seed",
            "7",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("7 días × 3 empleados"));

    assert!(plan.exists());

    Command::cargo_bin("turnero-cli")
        .unwrap()
        .args(["--plan", plan.to_str().unwrap(), "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));

    let out_csv = dir.path().join("plan.csv");
    Command::cargo_bin("turnero-cli")
        .unwrap()
        .args([
            "--plan",
            plan.to_str().unwrap(),
            "export",
            "--out-csv",
            out_csv.to_str().unwrap(),
        ])
        .assert()
        .success();

    let csv = std::fs::read_to_string(&out_csv).unwrap();
    assert!(csv.starts_with("employee_id,date,rest"));
    // 3 empleados × 7 días + header
    assert_eq!(csv.lines().count(), 22);
}

#[test]
fn generate_rejects_inverted_range() {
    let dir = tempdir().unwrap();
    let employees = dir.path().join("employees.csv");
    std::fs::write(&employees, "id,name,country,status\nE1,Ana,CountryA,active\n").unwrap();
    let plan = dir.path().join("plan.json");

    Command::cargo_bin("turnero-cli")
        .unwrap()
        .args([
            "--plan",
            plan.to_str().unwrap(),
            "generate",
            "--start",
            "2026-01-11",
            "--end",
            "2026-01-05",
            "--employees",
            employees.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date range"));
}
