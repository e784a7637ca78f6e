// Copyright (c) The allure-results Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The field-level view of Allure records used by the shaper.
//!
//! Every type in [`crate::model`] implements [`Record`], listing its fields in
//! declaration order. The shaper walks these fields without knowing anything
//! else about the record.

use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// The kind of an Allure record.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum RecordKind {
    /// A test case result, written as its own file.
    TestResult,

    /// A container grouping test results with their fixtures, written as its own file.
    TestResultContainer,

    /// A step within a test or fixture.
    TestStepResult,

    /// A setup or teardown fixture.
    FixtureResult,

    /// A test parameter. The `value` field of a parameter is always written as a string.
    Parameter,

    /// A label attached to a test result.
    Label,

    /// A link attached to a test result.
    Link,

    /// Details about a result status.
    StatusDetails,

    /// A reference to an attachment file.
    Attachment,
}

impl RecordKind {
    /// Returns a short, human-readable name for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::TestResult => "result",
            RecordKind::TestResultContainer => "container",
            RecordKind::TestStepResult => "step",
            RecordKind::FixtureResult => "fixture",
            RecordKind::Parameter => "parameter",
            RecordKind::Label => "label",
            RecordKind::Link => "link",
            RecordKind::StatusDetails => "status details",
            RecordKind::Attachment => "attachment",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured value whose fields can be shaped into JSON.
pub trait Record: fmt::Debug {
    /// Returns the kind of this record.
    fn kind(&self) -> RecordKind;

    /// Returns the fields of this record, in the order they should be written out.
    ///
    /// Field names are the names used in the JSON output.
    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)>;
}

/// A record that is written out as its own file in the report directory.
pub trait ReportItem: Record {
    /// The file name pattern for this item. `{prefix}` is replaced with a random token.
    const FILE_PATTERN: FilePattern;
}

/// A file name pattern containing a `{prefix}` placeholder.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FilePattern(&'static str);

impl FilePattern {
    const PLACEHOLDER: &'static str = "{prefix}";

    /// Creates a new pattern.
    pub const fn new(pattern: &'static str) -> Self {
        Self(pattern)
    }

    /// Returns the raw pattern.
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Formats this pattern with the hyphenated form of `prefix`.
    pub fn format(&self, prefix: Uuid) -> String {
        self.0.replace(Self::PLACEHOLDER, &prefix.hyphenated().to_string())
    }
}

/// The value of a single record field.
#[derive(Clone, Debug)]
pub enum FieldValue<'a> {
    /// An absent value.
    Null,

    /// A boolean. Booleans are never omitted.
    Bool(bool),

    /// An integer.
    Int(i64),

    /// A floating point number.
    Float(f64),

    /// A string.
    Str(&'a str),

    /// A dynamic JSON value, such as a parameter value.
    Json(&'a Value),

    /// A nested record.
    Record(&'a dyn Record),

    /// An ordered sequence of values.
    List(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    /// Creates a list of nested records.
    pub fn records<R: Record>(records: &'a [R]) -> Self {
        FieldValue::List(records.iter().map(|r| FieldValue::Record(r)).collect())
    }

    /// Creates a list of strings.
    pub fn strs(values: &'a [String]) -> Self {
        FieldValue::List(values.iter().map(|v| FieldValue::Str(v)).collect())
    }

    /// Creates a nested record field, or [`FieldValue::Null`] if there is none.
    pub fn record_opt<R: Record>(record: Option<&'a R>) -> Self {
        match record {
            Some(record) => FieldValue::Record(record),
            None => FieldValue::Null,
        }
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl<'a, 'b: 'a> From<&'b str> for FieldValue<'a> {
    fn from(value: &'b str) -> Self {
        FieldValue::Str(value)
    }
}

impl<'a, 'b: 'a> From<&'b String> for FieldValue<'a> {
    fn from(value: &'b String) -> Self {
        FieldValue::Str(value)
    }
}

impl<'a, 'b: 'a> From<&'b Value> for FieldValue<'a> {
    fn from(value: &'b Value) -> Self {
        FieldValue::Json(value)
    }
}

impl<'a, 'b: 'a> From<&'b Option<String>> for FieldValue<'a> {
    fn from(value: &'b Option<String>) -> Self {
        match value {
            Some(value) => FieldValue::Str(value),
            None => FieldValue::Null,
        }
    }
}

impl<'a, T> From<Option<T>> for FieldValue<'a>
where
    T: Into<FieldValue<'a>>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => FieldValue::Null,
        }
    }
}
