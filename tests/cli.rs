use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn expenses(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("expenses").unwrap();
    cmd.env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn write_csv(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("expenses.csv");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn summarize_prints_days_categories_and_total() {
    let home = TempDir::new().unwrap();
    let csv = write_csv(
        home.path(),
        "description,amount,date,category\n\
         Lunch,12000,2024-05-01 12:30,Хүнс\n\
         Bus,2000,2024-05-01 08:10,Тээвэр\n\
         Dinner,6000,2024-05-02 19:00,Хүнс\n",
    );

    expenses(home.path())
        .args(["summarize", csv.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("May 1st, 2024"))
        .stdout(predicate::str::contains("May 2nd, 2024"))
        .stdout(predicate::str::contains("18,000₮"))
        .stdout(predicate::str::contains("20,000₮"))
        .stdout(predicate::str::contains("Ангиллаар"));
}

#[test]
fn summarize_reports_skipped_rows_and_keeps_the_rest() {
    let home = TempDir::new().unwrap();
    let csv = write_csv(
        home.path(),
        "description,amount,date,category\n\
         Lunch,12000,2024-05-01 12:30,Хүнс\n\
         ,5000,2024-05-01 13:00,Хүнс\n\
         Taxi,,2024-05-01 14:00,Тээвэр\n",
    );

    expenses(home.path())
        .args(["summarize", csv.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping line 3"))
        .stderr(predicate::str::contains("Skipping line 4"))
        .stdout(predicate::str::contains("12,000₮"))
        .stdout(predicate::str::contains("Taxi").not());
}

#[test]
fn summarize_sorts_by_requested_key() {
    let home = TempDir::new().unwrap();
    let csv = write_csv(
        home.path(),
        "description,amount,date,category\n\
         Small,5000,2024-05-01 09:00,Хүнс\n\
         Big,9000,2024-05-01 10:00,Хүнс\n",
    );

    let output = expenses(home.path())
        .args(["summarize", csv.to_str().unwrap(), "--sort", "amount-asc"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.find("Small").unwrap() < stdout.find("Big").unwrap());
}

#[test]
fn summarize_missing_file_fails() {
    let home = TempDir::new().unwrap();
    expenses(home.path())
        .args(["summarize", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn summarize_without_amount_column_fails() {
    let home = TempDir::new().unwrap();
    let csv = write_csv(home.path(), "description,date\nLunch,2024-05-01\n");
    expenses(home.path())
        .args(["summarize", csv.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("amount"));
}

#[test]
fn demo_prints_a_populated_report() {
    let home = TempDir::new().unwrap();
    expenses(home.path())
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Зардлын жагсаалт"))
        .stdout(predicate::str::contains("Нийт"))
        .stdout(predicate::str::contains("Зардал байхгүй").not());
}

#[test]
fn init_writes_settings_once() {
    let home = TempDir::new().unwrap();
    let settings = home.path().join(".config/expenses/settings.json");

    expenses(home.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default settings"));
    assert!(settings.exists());

    expenses(home.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exist"));

    expenses(home.path())
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default settings"));
}

#[test]
fn categories_follow_settings_file() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config/expenses");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("settings.json"),
        r#"{"categories": ["Food", "Rent"], "enforce_categories": true}"#,
    )
    .unwrap();

    expenses(home.path())
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Food"))
        .stdout(predicate::str::contains("Rent"))
        .stdout(predicate::str::contains("closed set"));
}

#[test]
fn closed_category_set_rejects_unknown_labels() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config/expenses");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("settings.json"),
        r#"{"categories": ["Food"], "enforce_categories": true}"#,
    )
    .unwrap();
    let csv = write_csv(
        home.path(),
        "description,amount,date,category\n\
         Lunch,12000,2024-05-01,Food\n\
         Movie,8000,2024-05-01,Fun\n",
    );

    expenses(home.path())
        .args(["summarize", csv.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping line 3"))
        .stdout(predicate::str::contains("Movie").not());
}

#[test]
fn invalid_settings_file_falls_back_to_defaults() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config/expenses");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("settings.json"), "{ not json").unwrap();

    expenses(home.path())
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Хүнс"))
        .stdout(predicate::str::contains("free-form"));
}

#[test]
fn demo_reports_rejected_samples_on_stderr() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config/expenses");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("settings.json"), r#"{"categories": []}"#).unwrap();

    expenses(home.path())
        .arg("demo")
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping"))
        .stderr(predicate::str::contains("Ангилал"))
        .stdout(predicate::str::contains("Зардал байхгүй"));
}
