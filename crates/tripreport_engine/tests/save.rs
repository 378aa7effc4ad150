use std::fs;

use tempfile::TempDir;
use tripreport_engine::{ensure_download_dir, ReportSaver};

#[test]
fn creates_missing_download_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads");
    assert!(!new_dir.exists());
    ensure_download_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn save_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let saver = ReportSaver::new(temp.path().to_path_buf());

    let first = saver.save("trip_report_1.pdf", b"%PDF one").unwrap();
    assert_eq!(first.file_name().unwrap(), "trip_report_1.pdf");
    assert_eq!(fs::read(&first).unwrap(), b"%PDF one");

    // Re-downloading the same report overwrites the previous copy.
    let second = saver.save("trip_report_1.pdf", b"%PDF two").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"%PDF two");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let saver = ReportSaver::new(file_path.clone());
    let result = saver.save("trip_report_1.pdf", b"%PDF data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("trip_report_1.pdf").exists());
}
