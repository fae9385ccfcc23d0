use std::fs;
use std::path::PathBuf;

use enum_props::config::Config;
use enum_props::driver::{FileStatus, Mode, resolve_inputs, run};

const SOURCE: &str = "enum Signal {\n    case on(Int)\n}\n";

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn writes_changed_files_and_leaves_them_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "Signal.swift", SOURCE);

    let report = run(&[path.clone()], &Config::default(), Mode::Write);
    assert_eq!(report.files[0].status, FileStatus::Updated);
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("    var on: Int? {\n"));

    let report = run(&[path.clone()], &Config::default(), Mode::Write);
    assert_eq!(report.files[0].status, FileStatus::Unchanged);
    assert_eq!(fs::read_to_string(&path).unwrap(), written);
}

#[test]
fn preview_never_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "Signal.swift", SOURCE);

    let report = run(&[path.clone()], &Config::default(), Mode::Preview);
    assert_eq!(report.files[0].status, FileStatus::WouldUpdate);
    assert!(report.files[0].output.as_deref().unwrap().contains("var on: Int?"));
    assert_eq!(fs::read_to_string(&path).unwrap(), SOURCE);
}

#[test]
fn one_bad_file_does_not_stop_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write(&dir, "Bad.swift", "enum Broken {\n    case a(\n}\n");
    let good = write(&dir, "Signal.swift", SOURCE);
    let missing = dir.path().join("Missing.swift");

    let report = run(&[bad, good, missing], &Config::default(), Mode::Preview);
    let statuses: Vec<_> = report.files.iter().map(|f| f.status).collect();
    assert_eq!(
        statuses,
        vec![FileStatus::Failed, FileStatus::WouldUpdate, FileStatus::Failed]
    );
    assert_eq!(report.failed(), 2);
    assert!(report.files[0].error.as_deref().unwrap().contains("Bad.swift:"));
}

#[test]
fn directories_expand_by_extension_and_respect_excludes() {
    let dir = tempfile::tempdir().unwrap();
    let kept = write(&dir, "Sources/App/Signal.swift", SOURCE);
    write(&dir, "Sources/App/Notes.md", "# notes\n");
    write(&dir, "Sources/Generated/Api.swift", SOURCE);

    let config = Config { exclude: vec!["**/Generated/**".to_string()], ..Config::default() };
    let root = dir.path().to_string_lossy().to_string();
    let paths = resolve_inputs([root.as_str()], &config).unwrap();
    assert_eq!(paths, vec![kept]);
}

#[test]
fn json_report_lists_added_and_skipped_cases() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "Signal.swift",
        "enum Signal {\n    case on(Int), off\n    var off: Void? { nil }\n}\n",
    );
    let report = run(&[path], &Config::default(), Mode::Preview);
    let json = serde_json::to_value(&report).unwrap();
    let decl = &json["files"][0]["declarations"][0];
    assert_eq!(json["files"][0]["status"], "would_update");
    assert_eq!(decl["name"], "Signal");
    assert_eq!(decl["added"], serde_json::json!(["on"]));
    assert_eq!(decl["skipped"], serde_json::json!(["off"]));
}
