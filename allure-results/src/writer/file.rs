// Copyright (c) The allure-results Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::AttachmentBody;
use crate::{
    config::IndentPolicy,
    errors::{ReportDirError, WriteError},
    listener::ReportListener,
    model::{TestResult, TestResultContainer},
    record::ReportItem,
    shape::shape,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::{
    fs::{self, File, FileTimes},
    io,
};
use tracing::{debug, info};
use uuid::Uuid;

/// Options for a [`FileReportWriter`].
#[derive(Copy, Clone, Debug, Default)]
pub struct FileWriterOptions {
    clean: bool,
    indent: IndentPolicy,
}

impl FileWriterOptions {
    /// Creates the default options: don't clean, indentation from the environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// If true, files left in the report directory by an earlier run are removed on startup.
    ///
    /// Subdirectories are left alone.
    pub fn set_clean(&mut self, clean: bool) -> &mut Self {
        self.clean = clean;
        self
    }

    /// Sets how records are indented.
    pub fn set_indent(&mut self, indent: IndentPolicy) -> &mut Self {
        self.indent = indent;
        self
    }
}

/// Writes records and attachments into a report directory.
///
/// Each test result and container gets its own JSON file named after a random uuid, and each
/// attachment is stored under the name it was reported with. Every write opens, writes and closes
/// its own file, so a single writer can be shared across threads.
#[derive(Clone, Debug)]
pub struct FileReportWriter {
    report_dir: Utf8PathBuf,
    indent: IndentPolicy,
}

impl FileReportWriter {
    /// Creates a writer for `report_dir`, creating the directory if necessary.
    ///
    /// If `clean` is true, top-level files already in the directory are removed.
    pub fn new(report_dir: impl Into<Utf8PathBuf>, clean: bool) -> Result<Self, ReportDirError> {
        let mut options = FileWriterOptions::new();
        options.set_clean(clean);
        Self::with_options(report_dir, options)
    }

    /// Creates a writer for `report_dir` with the given options.
    pub fn with_options(
        report_dir: impl Into<Utf8PathBuf>,
        options: FileWriterOptions,
    ) -> Result<Self, ReportDirError> {
        let report_dir = report_dir.into();
        init_report_dir(&report_dir, options.clean)?;
        Ok(Self {
            report_dir,
            indent: options.indent,
        })
    }

    /// Returns the report directory.
    pub fn report_dir(&self) -> &Utf8Path {
        &self.report_dir
    }

    /// Writes a test result, returning the path to the new file.
    pub fn write_result(&self, result: &TestResult) -> Result<Utf8PathBuf, WriteError> {
        self.write_item(result)
    }

    /// Writes a container, returning the path to the new file.
    pub fn write_container(
        &self,
        container: &TestResultContainer,
    ) -> Result<Utf8PathBuf, WriteError> {
        self.write_item(container)
    }

    /// Shapes `item` and writes it to a freshly named file.
    pub fn write_item<T: ReportItem>(&self, item: &T) -> Result<Utf8PathBuf, WriteError> {
        let file = self
            .report_dir
            .join(T::FILE_PATTERN.format(Uuid::new_v4()));

        // Resolved on every write, since the environment can change mid-run.
        let style = self.indent.resolve();
        let shaped = shape(item, style);
        let bytes = shaped
            .to_json_vec(style)
            .map_err(|error| WriteError::Serialize {
                file: file.clone(),
                error,
            })?;
        fs::write(&file, bytes).map_err(|error| WriteError::Write {
            file: file.clone(),
            error,
        })?;

        debug!(kind = %item.kind(), "wrote {file}");
        Ok(file)
    }

    /// Copies `source` into the report directory as `file_name`, along with its permissions and
    /// timestamps.
    pub fn copy_attached_file(
        &self,
        source: &Utf8Path,
        file_name: &str,
    ) -> Result<Utf8PathBuf, WriteError> {
        let destination = self.report_dir.join(file_name);
        copy_with_times(source, &destination).map_err(|error| WriteError::CopyAttachment {
            from: source.to_owned(),
            to: destination.clone(),
            error,
        })?;

        debug!("copied attachment {source} to {destination}");
        Ok(destination)
    }

    /// Writes `body` into the report directory as `file_name`.
    pub fn write_attached_data(
        &self,
        body: &AttachmentBody,
        file_name: &str,
    ) -> Result<Utf8PathBuf, WriteError> {
        let destination = self.report_dir.join(file_name);
        fs::write(&destination, body.as_bytes()).map_err(|error| WriteError::Write {
            file: destination.clone(),
            error,
        })?;

        debug!(bytes = body.len(), "wrote attachment {destination}");
        Ok(destination)
    }
}

impl ReportListener for FileReportWriter {
    fn report_result(&mut self, result: &TestResult) -> Result<(), WriteError> {
        self.write_result(result).map(|_| ())
    }

    fn report_container(&mut self, container: &TestResultContainer) -> Result<(), WriteError> {
        self.write_container(container).map(|_| ())
    }

    fn report_attached_file(
        &mut self,
        source: &Utf8Path,
        file_name: &str,
    ) -> Result<(), WriteError> {
        self.copy_attached_file(source, file_name).map(|_| ())
    }

    fn report_attached_data(
        &mut self,
        body: &AttachmentBody,
        file_name: &str,
    ) -> Result<(), WriteError> {
        self.write_attached_data(body, file_name).map(|_| ())
    }
}

fn init_report_dir(dir: &Utf8Path, clean: bool) -> Result<(), ReportDirError> {
    fs::create_dir_all(dir).map_err(|error| ReportDirError::Create {
        dir: dir.to_owned(),
        error,
    })?;
    debug!("using report directory {dir}");

    if clean {
        clean_report_dir(dir)?;
    }
    Ok(())
}

fn clean_report_dir(dir: &Utf8Path) -> Result<(), ReportDirError> {
    let read_dir_err = |error| ReportDirError::ReadDir {
        dir: dir.to_owned(),
        error,
    };

    let mut removed = 0usize;
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        // is_file follows symlinks, so links to files are removed too. Subdirectories are kept.
        if !path.is_file() {
            continue;
        }
        fs::remove_file(&path).map_err(|error| ReportDirError::RemoveFile {
            file: path.clone(),
            error,
        })?;
        debug!("removed stale report file {}", path.display());
        removed += 1;
    }

    if removed > 0 {
        info!("removed {removed} stale files from report directory {dir}");
    }
    Ok(())
}

fn copy_with_times(from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
    // Read the source's times before copying, since reading it may bump its access time.
    let metadata = fs::metadata(from)?;
    fs::copy(from, to)?;

    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    open_for_set_times(to)?.set_times(times)
}

fn open_for_set_times(path: &Utf8Path) -> io::Result<File> {
    cfg_if::cfg_if! {
        if #[cfg(unix)] {
            // The copy may be read-only, and a read-only handle is enough to set times on Unix.
            File::open(path)
        } else {
            File::options().write(true).open(path)
        }
    }
}
