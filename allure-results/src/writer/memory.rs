// Copyright (c) The allure-results Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::AttachmentBody;
use crate::{
    config::IndentPolicy,
    errors::WriteError,
    listener::ReportListener,
    model::{TestResult, TestResultContainer},
    shape::{ShapedRecord, shape},
};
use camino::Utf8Path;
use indexmap::IndexMap;
use tracing::debug;

/// Keeps shaped records and attachments in memory.
///
/// Useful for embedding and for checking what a test framework reports. Attached files are
/// ignored: this writer never touches the file system.
#[derive(Clone, Debug, Default)]
pub struct MemoryReportWriter {
    indent: IndentPolicy,
    test_cases: Vec<ShapedRecord>,
    test_containers: Vec<ShapedRecord>,
    attachments: IndexMap<String, AttachmentBody>,
}

impl MemoryReportWriter {
    /// Creates a new, empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how object-valued parameter values are laid out.
    pub fn set_indent(&mut self, indent: IndentPolicy) -> &mut Self {
        self.indent = indent;
        self
    }

    /// Shapes and records a test result.
    pub fn add_result(&mut self, result: &TestResult) -> &ShapedRecord {
        let shaped = shape(result, self.indent.resolve());
        debug!(uuid = %result.uuid, "recorded test result in memory");
        self.test_cases.push(shaped);
        &self.test_cases[self.test_cases.len() - 1]
    }

    /// Shapes and records a container.
    pub fn add_container(&mut self, container: &TestResultContainer) -> &ShapedRecord {
        let shaped = shape(container, self.indent.resolve());
        debug!(uuid = %container.uuid, "recorded container in memory");
        self.test_containers.push(shaped);
        &self.test_containers[self.test_containers.len() - 1]
    }

    /// Stores an attachment body, replacing any earlier body with the same name.
    pub fn add_attachment(&mut self, body: impl Into<AttachmentBody>, file_name: impl Into<String>) {
        self.attachments.insert(file_name.into(), body.into());
    }

    /// Returns the shaped test results, in the order they were reported.
    pub fn test_cases(&self) -> &[ShapedRecord] {
        &self.test_cases
    }

    /// Returns the shaped containers, in the order they were reported.
    pub fn test_containers(&self) -> &[ShapedRecord] {
        &self.test_containers
    }

    /// Returns all attachments by file name.
    pub fn attachments(&self) -> &IndexMap<String, AttachmentBody> {
        &self.attachments
    }

    /// Returns the attachment stored under `file_name`.
    pub fn attachment(&self, file_name: &str) -> Option<&AttachmentBody> {
        self.attachments.get(file_name)
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.test_cases.clear();
        self.test_containers.clear();
        self.attachments.clear();
    }
}

impl ReportListener for MemoryReportWriter {
    fn report_result(&mut self, result: &TestResult) -> Result<(), WriteError> {
        self.add_result(result);
        Ok(())
    }

    fn report_container(&mut self, container: &TestResultContainer) -> Result<(), WriteError> {
        self.add_container(container);
        Ok(())
    }

    fn report_attached_file(
        &mut self,
        _source: &Utf8Path,
        _file_name: &str,
    ) -> Result<(), WriteError> {
        Ok(())
    }

    fn report_attached_data(
        &mut self,
        body: &AttachmentBody,
        file_name: &str,
    ) -> Result<(), WriteError> {
        self.add_attachment(body.clone(), file_name);
        Ok(())
    }
}
