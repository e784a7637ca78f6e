// Copyright (c) The allure-results Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use allure_results::{
    AttachmentBody, FileReportWriter, FileWriterOptions, MemoryReportWriter, Parameter,
    ReportDispatcher, ReportListener, Status, StatusDetails, TestResult, TestResultContainer,
    config::IndentPolicy,
    errors::{ReportDirError, WriteError},
};
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;

fn compact_writer(dir: &Utf8Path) -> FileReportWriter {
    let mut options = FileWriterOptions::new();
    options.set_indent(IndentPolicy::Never);
    FileReportWriter::with_options(dir, options).expect("report dir is created")
}

fn read_json(path: &Utf8Path) -> Value {
    let contents = fs::read_to_string(path).expect("report file is readable");
    serde_json::from_str(&contents).expect("report file is valid JSON")
}

fn dir_entries(dir: &Utf8Path) -> Vec<String> {
    let mut entries: Vec<_> = dir
        .read_dir_utf8()
        .expect("dir is readable")
        .map(|entry| entry.expect("entry is readable").file_name().to_owned())
        .collect();
    entries.sort();
    entries
}

#[test]
fn creates_missing_parents() {
    let temp = Utf8TempDir::new().unwrap();
    let report_dir = temp.path().join("a/b/allure-results");

    let writer = FileReportWriter::new(&report_dir, false).expect("parents are created");
    assert!(report_dir.is_dir());
    assert_eq!(writer.report_dir(), report_dir);
}

#[test]
fn existing_dir_without_clean_keeps_files() {
    let temp = Utf8TempDir::new().unwrap();
    let report_dir = temp.path().join("results");
    fs::create_dir_all(report_dir.join("history")).unwrap();
    fs::write(report_dir.join("old-result.json"), "{}").unwrap();

    FileReportWriter::new(&report_dir, false).expect("first construction succeeds");
    FileReportWriter::new(&report_dir, false).expect("second construction succeeds");

    assert_eq!(dir_entries(&report_dir), ["history", "old-result.json"]);
}

#[test]
fn clean_removes_only_top_level_files() {
    let temp = Utf8TempDir::new().unwrap();
    let report_dir = temp.path().join("results");
    fs::create_dir_all(report_dir.join("history")).unwrap();
    fs::write(report_dir.join("old-result.json"), "{}").unwrap();
    fs::write(report_dir.join("old-attachment.txt"), "stale").unwrap();
    fs::write(report_dir.join("history/history.json"), "[]").unwrap();

    FileReportWriter::new(&report_dir, true).expect("cleaning succeeds");

    assert_eq!(dir_entries(&report_dir), ["history"]);
    assert_eq!(
        fs::read_to_string(report_dir.join("history/history.json")).unwrap(),
        "[]"
    );
}

#[test]
fn clean_on_new_dir() {
    let temp = Utf8TempDir::new().unwrap();
    let report_dir = temp.path().join("fresh");

    FileReportWriter::new(&report_dir, true).expect("nothing to clean");
    assert!(dir_entries(&report_dir).is_empty());
}

#[test]
fn result_round_trip() {
    let temp = Utf8TempDir::new().unwrap();
    let writer = compact_writer(temp.path());

    let mut details = StatusDetails::new();
    details.set_muted(false).set_trace("");
    let mut result = TestResult::new("r1");
    result
        .set_name("división ✓")
        .set_status(Status::Broken)
        .set_status_details(details)
        .set_description("")
        .add_parameter(Parameter::new("config", json!({ "a": 1 })))
        .add_parameter(Parameter::new("count", 3));
    result.stop = Some(0);

    let path = writer.write_result(&result).expect("result is written");
    assert!(path.as_str().ends_with("-result.json"), "{path}");

    assert_eq!(
        read_json(&path),
        json!({
            "uuid": "r1",
            "name": "división ✓",
            "status": "broken",
            "statusDetails": { "muted": false },
            "parameters": [
                { "name": "config", "value": "{\"a\": 1}" },
                { "name": "count", "value": "3" },
            ],
        })
    );

    // Non-ASCII characters are written as-is rather than escaped.
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("división ✓"), "{raw}");
}

#[test]
fn container_file() {
    let temp = Utf8TempDir::new().unwrap();
    let writer = compact_writer(temp.path());

    let mut container = TestResultContainer::new("c1");
    container.add_child("r1");
    let path = writer.write_container(&container).expect("container is written");

    assert!(path.as_str().ends_with("-container.json"), "{path}");
    assert_eq!(read_json(&path), json!({ "uuid": "c1", "children": ["r1"] }));
}

#[test]
fn each_write_gets_a_new_file() {
    let temp = Utf8TempDir::new().unwrap();
    let writer = compact_writer(temp.path());

    let result = TestResult::new("r1");
    let first = writer.write_result(&result).unwrap();
    let second = writer.write_result(&result).unwrap();

    assert_ne!(first, second);
    assert_eq!(dir_entries(temp.path()).len(), 2);
}

#[test]
fn pretty_output() {
    let temp = Utf8TempDir::new().unwrap();
    let mut options = FileWriterOptions::new();
    options.set_indent(IndentPolicy::Always);
    let writer = FileReportWriter::with_options(temp.path(), options).unwrap();

    let mut result = TestResult::new("r1");
    result.set_status(Status::Passed);
    let path = writer.write_result(&result).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "{\n    \"uuid\": \"r1\",\n    \"status\": \"passed\"\n}"
    );
}

#[test]
fn compact_output() {
    let temp = Utf8TempDir::new().unwrap();
    let writer = compact_writer(temp.path());

    let mut result = TestResult::new("r1");
    result.set_status(Status::Passed);
    let path = writer.write_result(&result).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        r#"{"uuid": "r1", "status": "passed"}"#
    );
}

#[test]
fn attached_text_is_utf8() {
    let temp = Utf8TempDir::new().unwrap();
    let writer = compact_writer(temp.path());

    let text = "héllo, 世界 ✓\n";
    let path = writer
        .write_attached_data(&AttachmentBody::from(text), "log.txt")
        .unwrap();

    assert_eq!(path, temp.path().join("log.txt"));
    assert_eq!(fs::read(&path).unwrap(), text.as_bytes());
}

#[test]
fn attached_data_overwrites() {
    let temp = Utf8TempDir::new().unwrap();
    let writer = compact_writer(temp.path());

    let bytes = vec![0x89, b'P', b'N', b'G', 0x00, 0xff];
    writer
        .write_attached_data(&AttachmentBody::from(bytes), "image.png")
        .unwrap();
    let path = writer
        .write_attached_data(&AttachmentBody::from(&b"\x00\x01"[..]), "image.png")
        .unwrap();

    assert_eq!(fs::read(&path).unwrap(), [0x00u8, 0x01]);
}

#[test]
fn attached_file_is_copied() {
    let temp = Utf8TempDir::new().unwrap();
    let source = temp.path().join("screenshot.png");
    fs::write(&source, [1u8, 2, 3]).unwrap();

    let report_dir = temp.path().join("results");
    let writer = compact_writer(&report_dir);
    fs::write(report_dir.join("copy.png"), "old").unwrap();

    let path = writer.copy_attached_file(&source, "copy.png").unwrap();
    assert_eq!(fs::read(&path).unwrap(), [1u8, 2, 3]);
    assert_eq!(fs::read(&source).unwrap(), [1u8, 2, 3]);
}

#[test]
fn missing_attachment_source() {
    let temp = Utf8TempDir::new().unwrap();
    let writer = compact_writer(temp.path());

    let source = temp.path().join("does-not-exist.png");
    let error = writer
        .copy_attached_file(&source, "copy.png")
        .expect_err("source is missing");

    match error {
        WriteError::CopyAttachment { from, to, error } => {
            assert_eq!(from, source);
            assert_eq!(to, temp.path().join("copy.png"));
            assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn write_errors_propagate() {
    let temp = Utf8TempDir::new().unwrap();
    let report_dir = temp.path().join("results");
    let writer = compact_writer(&report_dir);
    fs::remove_dir(&report_dir).unwrap();

    let error = writer
        .write_result(&TestResult::new("r1"))
        .expect_err("report dir is gone");
    assert!(matches!(error, WriteError::Write { .. }), "{error:?}");

    let error = writer
        .write_attached_data(&AttachmentBody::from("data"), "data.txt")
        .expect_err("report dir is gone");
    assert!(matches!(error, WriteError::Write { .. }), "{error:?}");
}

#[test]
fn report_dir_under_a_file() {
    let temp = Utf8TempDir::new().unwrap();
    let file = temp.path().join("file");
    fs::write(&file, "").unwrap();

    let error = FileReportWriter::new(file.join("results"), false).expect_err("parent is a file");
    match error {
        ReportDirError::Create { dir, .. } => assert_eq!(dir, file.join("results")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn dispatch_to_file_and_memory() {
    let temp = Utf8TempDir::new().unwrap();
    let source = temp.path().join("trace.zip");
    fs::write(&source, "zip").unwrap();

    let report_dir: Utf8PathBuf = temp.path().join("results");
    let mut file_writer = compact_writer(&report_dir);
    let mut memory_writer = MemoryReportWriter::new();
    memory_writer.set_indent(IndentPolicy::Never);

    {
        let mut dispatcher = ReportDispatcher::new();
        dispatcher
            .register(&mut file_writer)
            .register(&mut memory_writer);

        let mut result = TestResult::new("r1");
        result.set_status(Status::Skipped);
        dispatcher.report_result(&result).unwrap();
        dispatcher
            .report_container(&TestResultContainer::new("c1"))
            .unwrap();
        dispatcher.report_attached_file(&source, "trace.zip").unwrap();
        dispatcher
            .report_attached_data(String::from("stdout"), "stdout.txt")
            .unwrap();
    }

    let entries = dir_entries(&report_dir);
    assert_eq!(entries.len(), 4, "{entries:?}");
    assert!(entries.iter().any(|e| e.ends_with("-result.json")));
    assert!(entries.iter().any(|e| e.ends_with("-container.json")));
    assert_eq!(fs::read_to_string(report_dir.join("trace.zip")).unwrap(), "zip");
    assert_eq!(
        fs::read_to_string(report_dir.join("stdout.txt")).unwrap(),
        "stdout"
    );

    assert_eq!(
        memory_writer.test_cases()[0].clone().into_value(),
        json!({ "uuid": "r1", "status": "skipped" })
    );
    assert_eq!(memory_writer.test_containers().len(), 1);
    assert_eq!(
        memory_writer.attachments().keys().collect::<Vec<_>>(),
        ["stdout.txt"]
    );

    // The file writer can also be driven directly through the listener trait.
    file_writer
        .report_attached_data(&AttachmentBody::from("again"), "stdout.txt")
        .unwrap();
    assert_eq!(
        fs::read_to_string(report_dir.join("stdout.txt")).unwrap(),
        "again"
    );
}
