use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "departments": [
    {
      "id": "CSE",
      "name": "Computer Science and Engineering",
      "semesters": {
        "1": [
          { "code": "CS101", "name": "Programming in C", "credits": 3 },
          { "code": "MA101", "name": "Engineering Mathematics I", "credits": 4 },
          { "code": "PH101", "name": "Engineering Physics", "credits": 3 },
          { "code": "MC101", "name": "Induction Programme", "credits": 0 }
        ],
        "2": [
          { "code": "CS201", "name": "Data Structures", "credits": 4 },
          { "code": "MA201", "name": "Engineering Mathematics II", "credits": 4 }
        ]
      }
    }
  ]
}"#;

const SEMESTER_ONE_RESPONSE: &str = r#"```json
{
  "detectedDepartment": "Computer Sci",
  "detectedSemester": 1,
  "results": [
    { "code": "cs-101", "grade": "O" },
    { "code": "MA101", "grade": "B+" },
    { "code": "PH101", "grade": "A" }
  ]
}
```"#;

const SEMESTER_TWO_RESPONSE: &str = r#"{
  "detectedDepartment": "CSE",
  "detectedSemester": "2",
  "results": [
    { "code": "CS201", "grade": "O" },
    { "code": "MA201", "grade": "O" }
  ]
}"#;

fn data_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir should be created");
    fs::write(dir.path().join("subjects.json"), CATALOG).expect("catalog should write");
    fs::write(dir.path().join("marksheet.jpg"), [0xFF, 0xD8, 0xFF, 0xE0])
        .expect("image should write");
    dir
}

fn educalc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("educalc").expect("binary should compile");
    cmd.env("HOME", dir)
        .env_remove("RUST_LOG")
        .env_remove("EDUCALC_DATA_DIR")
        .arg("--data-dir")
        .arg(dir);
    cmd
}

fn write_response(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).expect("response should write");
    path.display().to_string()
}

fn scan_and_save(dir: &Path, response: &str) {
    educalc(dir)
        .args(["scan", "marksheet.jpg", "--response", response, "--save", "--verified"])
        .current_dir(dir)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("saved ["));
}

fn history_json(dir: &Path) -> serde_json::Value {
    let output = educalc(dir)
        .args(["history", "--format", "json"])
        .output()
        .expect("history should run");
    assert!(output.status.success(), "history should succeed");
    serde_json::from_slice(&output.stdout).expect("history should be json")
}

#[test]
fn manual_form_scores_and_saves_semester() {
    let dir = data_dir();

    educalc(dir.path())
        .args(["gpa", "load", "--stream", "cse", "--semester", "1"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("CSE semester 1"))
        .stdout(predicate::str::contains("GPA: pending (CS101, MA101, PH101)"))
        .stdout(predicate::str::contains("MC101").not());

    educalc(dir.path())
        .args(["gpa", "grade", "CS101=O", "MA101=B+"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("GPA: pending (PH101)"));

    educalc(dir.path())
        .args(["gpa", "save", "--verified"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ungraded subjects: PH101"));

    educalc(dir.path())
        .args(["gpa", "grade", "ph101=A"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("GPA: 8.20"));

    educalc(dir.path())
        .args(["gpa", "save"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--verified"));

    educalc(dir.path())
        .args(["gpa", "save", "--verified"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Sem 1: 8.20"))
        .stdout(predicate::str::contains("stored on this device"));

    educalc(dir.path())
        .arg("history")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Sem 1 CSE: 8.20"));

    educalc(dir.path())
        .args(["gpa", "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no draft in progress"));
}

#[test]
fn grading_unknown_code_is_refused() {
    let dir = data_dir();
    educalc(dir.path())
        .args(["gpa", "load", "--semester", "2"])
        .assert()
        .code(0);

    educalc(dir.path())
        .args(["gpa", "grade", "XX999=O"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown subject code: XX999"));
}

#[test]
fn missing_catalog_semester_is_a_runtime_failure() {
    let dir = data_dir();
    educalc(dir.path())
        .args(["gpa", "load", "--stream", "CSE", "--semester", "5"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("under update"));
}

#[test]
fn cgpa_averages_explicit_scores() {
    let dir = data_dir();
    educalc(dir.path())
        .args(["cgpa", "--periods", "4", "--scores", "9.0,7.5,8.0,6.5"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("CGPA over 4 semesters: 7.75"));
}

#[test]
fn cgpa_refuses_gaps_and_bad_counts() {
    let dir = data_dir();
    educalc(dir.path())
        .args(["cgpa", "--periods", "3", "--scores", "8.0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing score for period(s) 2, 3"));

    educalc(dir.path())
        .args(["cgpa", "--periods", "11"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("between 2 and 10"));

    educalc(dir.path())
        .args(["cgpa", "--periods", "2", "--scores", "8.0,11"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("outside 0-10"));
}

#[test]
fn scanned_semesters_feed_cumulative() {
    let dir = data_dir();
    let first = write_response(dir.path(), "sem1.json", SEMESTER_ONE_RESPONSE);
    let second = write_response(dir.path(), "sem2.json", SEMESTER_TWO_RESPONSE);
    scan_and_save(dir.path(), &first);
    scan_and_save(dir.path(), &second);

    educalc(dir.path())
        .args(["cgpa", "--periods", "2", "--save", "--verified"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("CGPA over 2 semesters: 9.10"))
        .stdout(predicate::str::contains("saved ["));

    let history = history_json(dir.path());
    assert_eq!(history["guest"], true);
    assert_eq!(history["history"]["periods"][0]["period"], 2);
    assert_eq!(history["history"]["periods"][1]["score"], 8.2);
    assert_eq!(history["history"]["cumulatives"][0]["score"], 9.1);
}

#[test]
fn rescanning_a_semester_replaces_it() {
    let dir = data_dir();
    let first = write_response(dir.path(), "sem1.json", SEMESTER_ONE_RESPONSE);
    scan_and_save(dir.path(), &first);

    educalc(dir.path())
        .current_dir(dir.path())
        .args([
            "scan",
            "marksheet.jpg",
            "--response",
            &first,
            "--grade",
            "MA101=O",
            "--save",
            "--verified",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("GPA: 9.40"));

    let history = history_json(dir.path());
    let periods = history["history"]["periods"]
        .as_array()
        .expect("periods should be an array");
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0]["score"], 9.4);
}

#[test]
fn scan_without_save_leaves_reviewable_draft() {
    let dir = data_dir();
    let response = write_response(
        dir.path(),
        "unknown.json",
        r#"{"detectedDepartment": "Mechanical", "results": [
            {"code": "ME101", "grade": "B"},
            {"code": "CS101", "grade": "S"}
        ]}"#,
    );

    educalc(dir.path())
        .current_dir(dir.path())
        .args(["scan", "marksheet.jpg", "--response", &response])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Unverified Subject"))
        .stdout(predicate::str::contains("draft kept"))
        .stderr(predicate::str::contains("'Mechanical' not recognized"))
        .stderr(predicate::str::contains("1 subject(s) not in the catalog"));

    educalc(dir.path())
        .args(["gpa", "show"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("CSE semester 1 (scan)"))
        .stdout(predicate::str::contains("ME101"));
}

#[test]
fn unverified_scan_save_keeps_extracted_rows() {
    let dir = data_dir();
    let first = write_response(dir.path(), "sem1.json", SEMESTER_ONE_RESPONSE);

    educalc(dir.path())
        .current_dir(dir.path())
        .args(["scan", "marksheet.jpg", "--response", &first, "--save"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--verified"));

    educalc(dir.path())
        .args(["gpa", "show"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("CSE semester 1 (scan)"))
        .stdout(predicate::str::contains("CS101"))
        .stdout(predicate::str::contains("GPA: 8.20"));

    educalc(dir.path())
        .args(["gpa", "save", "--verified"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Sem 1: 8.20"));
}

#[test]
fn saved_scan_leaves_no_draft_behind() {
    let dir = data_dir();
    let first = write_response(dir.path(), "sem1.json", SEMESTER_ONE_RESPONSE);
    scan_and_save(dir.path(), &first);

    educalc(dir.path())
        .args(["gpa", "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no draft in progress"));
}

#[test]
fn scan_with_nothing_usable_exits_not_recognized() {
    let dir = data_dir();
    let response = write_response(
        dir.path(),
        "empty.json",
        r#"{"detectedDepartment": "CSE", "results": [{"code": "X1", "grade": "O"}]}"#,
    );

    educalc(dir.path())
        .current_dir(dir.path())
        .args(["scan", "marksheet.jpg", "--response", &response])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nothing recognized"));
}

#[test]
fn scan_without_endpoint_fails() {
    let dir = data_dir();
    educalc(dir.path())
        .current_dir(dir.path())
        .args(["scan", "marksheet.jpg"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no extraction endpoint configured"));
}

#[test]
fn delete_removes_record_and_tolerates_unknown_ids() {
    let dir = data_dir();
    let first = write_response(dir.path(), "sem1.json", SEMESTER_ONE_RESPONSE);
    scan_and_save(dir.path(), &first);

    let history = history_json(dir.path());
    let id = history["history"]["periods"][0]["id"]
        .as_str()
        .expect("record id should be a string")
        .to_string();

    educalc(dir.path())
        .args(["delete", &id])
        .assert()
        .code(0)
        .stdout(predicate::str::contains(format!("deleted [{id}]")));

    educalc(dir.path())
        .args(["delete", &id])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("nothing to delete"));

    educalc(dir.path())
        .arg("history")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("- none"));
}

#[test]
fn registered_history_survives_logout() {
    let dir = data_dir();
    educalc(dir.path())
        .args([
            "profile", "create", "--register", "21CS042", "--name", "Asha Raman", "--stream",
            "CSE",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("registered and signed in as Asha Raman"));

    let first = write_response(dir.path(), "sem1.json", SEMESTER_ONE_RESPONSE);
    educalc(dir.path())
        .current_dir(dir.path())
        .args(["scan", "marksheet.jpg", "--response", &first, "--save", "--verified"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("synced to profile"));

    educalc(dir.path())
        .arg("logout")
        .assert()
        .code(0);
    educalc(dir.path())
        .arg("history")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Guest User"))
        .stdout(predicate::str::contains("Sem 1").not());

    educalc(dir.path())
        .args(["login", "--register", "21CS042"])
        .assert()
        .code(0);
    educalc(dir.path())
        .args(["profile", "show"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("badges: pioneer"))
        .stdout(predicate::str::contains("saved: 1 semester result(s)"));
}

#[test]
fn login_with_unknown_register_number_fails() {
    let dir = data_dir();
    educalc(dir.path())
        .args(["login", "--register", "21CS999"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("profile not found: 21CS999"));
}

#[test]
fn feedback_requires_rating_and_comment() {
    let dir = data_dir();
    educalc(dir.path())
        .args(["feedback", "--rating", "0", "--comment", "fast"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("rating must be between 1 and 5"));

    educalc(dir.path())
        .args(["feedback", "--rating", "5", "--comment", "scanning saved me time"])
        .assert()
        .code(0);

    let log = fs::read_to_string(dir.path().join("feedback.jsonl"))
        .expect("feedback log should exist");
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("scanning saved me time"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = data_dir();
    fs::write(
        dir.path().join("educalc.toml"),
        r#"
[extraction]
timeout_secs = 0
"#,
    )
    .expect("config should write");

    educalc(dir.path())
        .arg("history")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("timeout_secs must be greater than 0"));
}

#[test]
fn local_config_points_at_another_catalog() {
    let dir = data_dir();
    fs::create_dir_all(dir.path().join("catalogs")).expect("catalog dir should create");
    fs::rename(
        dir.path().join("subjects.json"),
        dir.path().join("catalogs/cse.json"),
    )
    .expect("catalog should move");
    fs::write(
        dir.path().join("local.toml"),
        r#"
[catalog]
path = "catalogs/cse.json"
"#,
    )
    .expect("local config should write");

    educalc(dir.path())
        .args(["gpa", "load", "--semester", "2"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("CS201"));
}
