// Copyright (c) The allure-results Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Write test results in the [Allure](https://allurereport.org) results format.
//!
//! A test framework reports [`TestResult`]s, [`TestResultContainer`]s and attachments to a
//! [`ReportListener`]. This crate provides two listeners:
//!
//! * [`FileReportWriter`] writes one JSON file per result or container, plus one file per
//!   attachment, into a report directory that the Allure viewer reads.
//! * [`MemoryReportWriter`] keeps the same shaped records in memory.
//!
//! Both writers drop empty, zero and absent fields from records (booleans are always kept), and
//! write parameter values as strings. Set `ALLURE_INDENT_OUTPUT` to a non-empty value to get
//! indented JSON files.
//!
//! ```no_run
//! use allure_results::{FileReportWriter, ReportDispatcher, Status, TestResult};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let writer = FileReportWriter::new("target/allure-results", true)?;
//! let mut dispatcher = ReportDispatcher::new();
//! dispatcher.register(writer);
//!
//! let mut result = TestResult::new("8d5bd8bb-02e7-4c4f-8c7a-2cb5e8b8b4f1");
//! result.set_name("addition works").set_status(Status::Passed);
//! dispatcher.report_result(&result)?;
//! dispatcher.report_attached_data("2 + 2 = 4", "addition-log.txt")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
mod listener;
mod model;
mod record;
mod shape;
mod writer;

pub use listener::*;
pub use model::*;
pub use record::*;
pub use shape::{ShapedRecord, shape};
pub use writer::*;
