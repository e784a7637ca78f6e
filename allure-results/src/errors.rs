// Copyright (c) The allure-results Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced while writing Allure results.

use camino::Utf8PathBuf;
use std::{io, path::PathBuf};
use thiserror::Error;

/// An error that occurred while preparing the report directory.
///
/// Returned by [`FileReportWriter::new`](crate::FileReportWriter::new).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportDirError {
    /// The directory could not be created.
    #[error("error creating report directory `{dir}`")]
    Create {
        /// The report directory.
        dir: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },

    /// The directory could not be listed while cleaning it.
    #[error("error reading report directory `{dir}`")]
    ReadDir {
        /// The report directory.
        dir: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },

    /// A stale file could not be removed while cleaning the directory.
    #[error("error removing stale report file `{}`", .file.display())]
    RemoveFile {
        /// The file being removed.
        ///
        /// Stale files are not required to have UTF-8 names.
        file: PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },
}

/// An error that occurred while writing a record or an attachment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteError {
    /// A shaped record could not be serialized.
    #[error("error serializing record for `{file}`")]
    Serialize {
        /// The file the record was going to be written to.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },

    /// A file in the report directory could not be written.
    #[error("error writing to `{file}`")]
    Write {
        /// The file being written.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },

    /// An attachment file could not be copied into the report directory.
    #[error("error copying attachment `{from}` to `{to}`")]
    CopyAttachment {
        /// The attachment being copied.
        from: Utf8PathBuf,

        /// The destination in the report directory.
        to: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },
}
