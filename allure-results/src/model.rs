// Copyright (c) The allure-results Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Allure result model.
//!
//! Field names used in the written JSON are the camelCase names the Allure viewer reads. Unset
//! optional fields and empty lists are left out of the output entirely.

use crate::record::{FieldValue, FilePattern, Record, RecordKind, ReportItem};
use chrono::{DateTime, TimeZone};
use serde_json::Value;
use std::fmt;

/// The result of a single test case.
///
/// Each `TestResult` is written to its own `<uuid>-result.json` file.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct TestResult {
    /// The unique identifier of this result.
    pub uuid: String,

    /// An identifier shared by all runs of the same test with the same parameters.
    pub history_id: Option<String>,

    /// An identifier shared by all runs of the same test.
    pub test_case_id: Option<String>,

    /// The fully qualified name of the test.
    pub full_name: Option<String>,

    /// Labels such as `suite`, `feature` or `severity`.
    pub labels: Vec<Label>,

    /// Links to issues, test management systems and so on.
    pub links: Vec<Link>,

    /// The display name of the test.
    pub name: Option<String>,

    /// The outcome of the test.
    pub status: Option<Status>,

    /// Details about the outcome, such as a failure message.
    pub status_details: Option<StatusDetails>,

    /// The lifecycle stage the test reached.
    pub stage: Option<Stage>,

    /// A markdown description.
    pub description: Option<String>,

    /// An HTML description.
    pub description_html: Option<String>,

    /// The steps executed by the test.
    pub steps: Vec<TestStepResult>,

    /// Attachments produced by the test.
    pub attachments: Vec<Attachment>,

    /// The parameters the test ran with.
    pub parameters: Vec<Parameter>,

    /// The start time, in milliseconds since the Unix epoch.
    pub start: Option<i64>,

    /// The stop time, in milliseconds since the Unix epoch.
    pub stop: Option<i64>,
}

impl TestResult {
    /// Creates a new `TestResult` with the given identifier.
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            history_id: None,
            test_case_id: None,
            full_name: None,
            labels: vec![],
            links: vec![],
            name: None,
            status: None,
            status_details: None,
            stage: None,
            description: None,
            description_html: None,
            steps: vec![],
            attachments: vec![],
            parameters: vec![],
            start: None,
            stop: None,
        }
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the fully qualified name.
    pub fn set_full_name(&mut self, full_name: impl Into<String>) -> &mut Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Sets the history identifier.
    pub fn set_history_id(&mut self, history_id: impl Into<String>) -> &mut Self {
        self.history_id = Some(history_id.into());
        self
    }

    /// Sets the test case identifier.
    pub fn set_test_case_id(&mut self, test_case_id: impl Into<String>) -> &mut Self {
        self.test_case_id = Some(test_case_id.into());
        self
    }

    /// Sets the status.
    pub fn set_status(&mut self, status: Status) -> &mut Self {
        self.status = Some(status);
        self
    }

    /// Sets the status details.
    pub fn set_status_details(&mut self, status_details: StatusDetails) -> &mut Self {
        self.status_details = Some(status_details);
        self
    }

    /// Sets the stage.
    pub fn set_stage(&mut self, stage: Stage) -> &mut Self {
        self.stage = Some(stage);
        self
    }

    /// Sets the markdown description.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the HTML description.
    pub fn set_description_html(&mut self, description_html: impl Into<String>) -> &mut Self {
        self.description_html = Some(description_html.into());
        self
    }

    /// Sets the start time.
    pub fn set_start<Tz: TimeZone>(&mut self, start: DateTime<Tz>) -> &mut Self {
        self.start = Some(start.timestamp_millis());
        self
    }

    /// Sets the stop time.
    pub fn set_stop<Tz: TimeZone>(&mut self, stop: DateTime<Tz>) -> &mut Self {
        self.stop = Some(stop.timestamp_millis());
        self
    }

    /// Adds a label.
    pub fn add_label(&mut self, label: impl Into<Label>) -> &mut Self {
        self.labels.push(label.into());
        self
    }

    /// Adds several labels.
    pub fn add_labels(&mut self, labels: impl IntoIterator<Item = impl Into<Label>>) -> &mut Self {
        for label in labels {
            self.add_label(label);
        }
        self
    }

    /// Adds a link.
    pub fn add_link(&mut self, link: Link) -> &mut Self {
        self.links.push(link);
        self
    }

    /// Adds a step.
    pub fn add_step(&mut self, step: TestStepResult) -> &mut Self {
        self.steps.push(step);
        self
    }

    /// Adds an attachment reference.
    pub fn add_attachment(&mut self, attachment: Attachment) -> &mut Self {
        self.attachments.push(attachment);
        self
    }

    /// Adds a parameter.
    pub fn add_parameter(&mut self, parameter: Parameter) -> &mut Self {
        self.parameters.push(parameter);
        self
    }
}

impl Record for TestResult {
    fn kind(&self) -> RecordKind {
        RecordKind::TestResult
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        // Use the destructuring syntax to ensure that all fields are handled.
        let TestResult {
            uuid,
            history_id,
            test_case_id,
            full_name,
            labels,
            links,
            name,
            status,
            status_details,
            stage,
            description,
            description_html,
            steps,
            attachments,
            parameters,
            start,
            stop,
        } = self;

        vec![
            ("uuid", uuid.into()),
            ("historyId", history_id.into()),
            ("testCaseId", test_case_id.into()),
            ("fullName", full_name.into()),
            ("labels", FieldValue::records(labels)),
            ("links", FieldValue::records(links)),
            ("name", name.into()),
            ("status", status.map(Status::as_str).into()),
            ("statusDetails", FieldValue::record_opt(status_details.as_ref())),
            ("stage", stage.map(Stage::as_str).into()),
            ("description", description.into()),
            ("descriptionHtml", description_html.into()),
            ("steps", FieldValue::records(steps)),
            ("attachments", FieldValue::records(attachments)),
            ("parameters", FieldValue::records(parameters)),
            ("start", (*start).into()),
            ("stop", (*stop).into()),
        ]
    }
}

impl ReportItem for TestResult {
    const FILE_PATTERN: FilePattern = FilePattern::new("{prefix}-result.json");
}

/// Groups test results together with the fixtures that ran around them.
///
/// Each `TestResultContainer` is written to its own `<uuid>-container.json` file.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct TestResultContainer {
    /// The unique identifier of this container.
    pub uuid: String,

    /// The name of this container.
    pub name: Option<String>,

    /// The uuids of the test results in this container.
    pub children: Vec<String>,

    /// A markdown description.
    pub description: Option<String>,

    /// An HTML description.
    pub description_html: Option<String>,

    /// Setup fixtures.
    pub befores: Vec<FixtureResult>,

    /// Teardown fixtures.
    pub afters: Vec<FixtureResult>,

    /// Links shared by the children.
    pub links: Vec<Link>,

    /// The start time, in milliseconds since the Unix epoch.
    pub start: Option<i64>,

    /// The stop time, in milliseconds since the Unix epoch.
    pub stop: Option<i64>,
}

impl TestResultContainer {
    /// Creates a new `TestResultContainer` with the given identifier.
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: None,
            children: vec![],
            description: None,
            description_html: None,
            befores: vec![],
            afters: vec![],
            links: vec![],
            start: None,
            stop: None,
        }
    }

    /// Sets the name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the start time.
    pub fn set_start<Tz: TimeZone>(&mut self, start: DateTime<Tz>) -> &mut Self {
        self.start = Some(start.timestamp_millis());
        self
    }

    /// Sets the stop time.
    pub fn set_stop<Tz: TimeZone>(&mut self, stop: DateTime<Tz>) -> &mut Self {
        self.stop = Some(stop.timestamp_millis());
        self
    }

    /// Adds the uuid of a child test result.
    pub fn add_child(&mut self, child: impl Into<String>) -> &mut Self {
        self.children.push(child.into());
        self
    }

    /// Adds a setup fixture.
    pub fn add_before(&mut self, before: FixtureResult) -> &mut Self {
        self.befores.push(before);
        self
    }

    /// Adds a teardown fixture.
    pub fn add_after(&mut self, after: FixtureResult) -> &mut Self {
        self.afters.push(after);
        self
    }

    /// Adds a link.
    pub fn add_link(&mut self, link: Link) -> &mut Self {
        self.links.push(link);
        self
    }
}

impl Record for TestResultContainer {
    fn kind(&self) -> RecordKind {
        RecordKind::TestResultContainer
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        let TestResultContainer {
            uuid,
            name,
            children,
            description,
            description_html,
            befores,
            afters,
            links,
            start,
            stop,
        } = self;

        vec![
            ("uuid", uuid.into()),
            ("name", name.into()),
            ("children", FieldValue::strs(children)),
            ("description", description.into()),
            ("descriptionHtml", description_html.into()),
            ("befores", FieldValue::records(befores)),
            ("afters", FieldValue::records(afters)),
            ("links", FieldValue::records(links)),
            ("start", (*start).into()),
            ("stop", (*stop).into()),
        ]
    }
}

impl ReportItem for TestResultContainer {
    const FILE_PATTERN: FilePattern = FilePattern::new("{prefix}-container.json");
}

/// A step executed as part of a test, fixture or another step.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct TestStepResult {
    /// The name of the step.
    pub name: Option<String>,

    /// The outcome of the step.
    pub status: Option<Status>,

    /// Details about the outcome.
    pub status_details: Option<StatusDetails>,

    /// The lifecycle stage the step reached.
    pub stage: Option<Stage>,

    /// A markdown description.
    pub description: Option<String>,

    /// An HTML description.
    pub description_html: Option<String>,

    /// Nested steps.
    pub steps: Vec<TestStepResult>,

    /// Attachments produced by the step.
    pub attachments: Vec<Attachment>,

    /// The parameters of the step.
    pub parameters: Vec<Parameter>,

    /// The start time, in milliseconds since the Unix epoch.
    pub start: Option<i64>,

    /// The stop time, in milliseconds since the Unix epoch.
    pub stop: Option<i64>,
}

impl TestStepResult {
    /// Creates a new step with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Sets the status.
    pub fn set_status(&mut self, status: Status) -> &mut Self {
        self.status = Some(status);
        self
    }

    /// Sets the stage.
    pub fn set_stage(&mut self, stage: Stage) -> &mut Self {
        self.stage = Some(stage);
        self
    }

    /// Adds a nested step.
    pub fn add_step(&mut self, step: TestStepResult) -> &mut Self {
        self.steps.push(step);
        self
    }

    /// Adds an attachment reference.
    pub fn add_attachment(&mut self, attachment: Attachment) -> &mut Self {
        self.attachments.push(attachment);
        self
    }

    /// Adds a parameter.
    pub fn add_parameter(&mut self, parameter: Parameter) -> &mut Self {
        self.parameters.push(parameter);
        self
    }
}

impl Record for TestStepResult {
    fn kind(&self) -> RecordKind {
        RecordKind::TestStepResult
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        let TestStepResult {
            name,
            status,
            status_details,
            stage,
            description,
            description_html,
            steps,
            attachments,
            parameters,
            start,
            stop,
        } = self;

        vec![
            ("name", name.into()),
            ("status", status.map(Status::as_str).into()),
            ("statusDetails", FieldValue::record_opt(status_details.as_ref())),
            ("stage", stage.map(Stage::as_str).into()),
            ("description", description.into()),
            ("descriptionHtml", description_html.into()),
            ("steps", FieldValue::records(steps)),
            ("attachments", FieldValue::records(attachments)),
            ("parameters", FieldValue::records(parameters)),
            ("start", (*start).into()),
            ("stop", (*stop).into()),
        ]
    }
}

/// A setup (`befores`) or teardown (`afters`) fixture of a container.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct FixtureResult {
    /// The name of the fixture.
    pub name: Option<String>,

    /// The outcome of the fixture.
    pub status: Option<Status>,

    /// Details about the outcome.
    pub status_details: Option<StatusDetails>,

    /// The lifecycle stage the fixture reached.
    pub stage: Option<Stage>,

    /// A markdown description.
    pub description: Option<String>,

    /// An HTML description.
    pub description_html: Option<String>,

    /// The steps executed by the fixture.
    pub steps: Vec<TestStepResult>,

    /// Attachments produced by the fixture.
    pub attachments: Vec<Attachment>,

    /// The parameters of the fixture.
    pub parameters: Vec<Parameter>,

    /// The start time, in milliseconds since the Unix epoch.
    pub start: Option<i64>,

    /// The stop time, in milliseconds since the Unix epoch.
    pub stop: Option<i64>,
}

impl FixtureResult {
    /// Creates a new fixture with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Sets the status.
    pub fn set_status(&mut self, status: Status) -> &mut Self {
        self.status = Some(status);
        self
    }

    /// Sets the stage.
    pub fn set_stage(&mut self, stage: Stage) -> &mut Self {
        self.stage = Some(stage);
        self
    }

    /// Adds a step.
    pub fn add_step(&mut self, step: TestStepResult) -> &mut Self {
        self.steps.push(step);
        self
    }
}

impl Record for FixtureResult {
    fn kind(&self) -> RecordKind {
        RecordKind::FixtureResult
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        let FixtureResult {
            name,
            status,
            status_details,
            stage,
            description,
            description_html,
            steps,
            attachments,
            parameters,
            start,
            stop,
        } = self;

        vec![
            ("name", name.into()),
            ("status", status.map(Status::as_str).into()),
            ("statusDetails", FieldValue::record_opt(status_details.as_ref())),
            ("stage", stage.map(Stage::as_str).into()),
            ("description", description.into()),
            ("descriptionHtml", description_html.into()),
            ("steps", FieldValue::records(steps)),
            ("attachments", FieldValue::records(attachments)),
            ("parameters", FieldValue::records(parameters)),
            ("start", (*start).into()),
            ("stop", (*stop).into()),
        ]
    }
}

/// Details about the status of a result, step or fixture.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct StatusDetails {
    /// Whether this is a known issue.
    pub known: Option<bool>,

    /// Whether the test is flaky.
    pub flaky: Option<bool>,

    /// Whether the test is muted.
    pub muted: Option<bool>,

    /// The failure message.
    pub message: Option<String>,

    /// The stack trace.
    pub trace: Option<String>,
}

impl StatusDetails {
    /// Creates new, empty status details.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the stack trace.
    pub fn set_trace(&mut self, trace: impl Into<String>) -> &mut Self {
        self.trace = Some(trace.into());
        self
    }

    /// Marks the result as a known issue, or explicitly not one.
    pub fn set_known(&mut self, known: bool) -> &mut Self {
        self.known = Some(known);
        self
    }

    /// Marks the result as flaky, or explicitly not flaky.
    pub fn set_flaky(&mut self, flaky: bool) -> &mut Self {
        self.flaky = Some(flaky);
        self
    }

    /// Marks the result as muted, or explicitly not muted.
    pub fn set_muted(&mut self, muted: bool) -> &mut Self {
        self.muted = Some(muted);
        self
    }
}

impl Record for StatusDetails {
    fn kind(&self) -> RecordKind {
        RecordKind::StatusDetails
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        let StatusDetails {
            known,
            flaky,
            muted,
            message,
            trace,
        } = self;

        vec![
            ("known", (*known).into()),
            ("flaky", (*flaky).into()),
            ("muted", (*muted).into()),
            ("message", message.into()),
            ("trace", trace.into()),
        ]
    }
}

/// A test parameter.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Parameter {
    /// The name of the parameter.
    pub name: String,

    /// The value of the parameter.
    ///
    /// Whatever its type, the value is written out as a string: objects are JSON-encoded and
    /// everything else is converted to its textual form.
    pub value: Value,

    /// Whether this parameter is excluded from the history id.
    pub excluded: Option<bool>,

    /// How the value is displayed.
    pub mode: Option<ParameterMode>,
}

impl Parameter {
    /// Creates a new `Parameter` instance.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            excluded: None,
            mode: None,
        }
    }

    /// Sets whether the parameter is excluded from the history id.
    pub fn set_excluded(&mut self, excluded: bool) -> &mut Self {
        self.excluded = Some(excluded);
        self
    }

    /// Sets the display mode.
    pub fn set_mode(&mut self, mode: ParameterMode) -> &mut Self {
        self.mode = Some(mode);
        self
    }
}

impl<K, V> From<(K, V)> for Parameter
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from((k, v): (K, V)) -> Self {
        Parameter::new(k, v)
    }
}

impl Record for Parameter {
    fn kind(&self) -> RecordKind {
        RecordKind::Parameter
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        let Parameter {
            name,
            value,
            excluded,
            mode,
        } = self;

        vec![
            ("name", name.into()),
            ("value", value.into()),
            ("excluded", (*excluded).into()),
            ("mode", mode.map(ParameterMode::as_str).into()),
        ]
    }
}

/// A label attached to a test result.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Label {
    /// The name of the label, e.g. `suite`.
    pub name: String,

    /// The value of the label.
    pub value: String,
}

impl Label {
    /// Creates a new `Label` instance.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<T> From<(T, T)> for Label
where
    T: Into<String>,
{
    fn from((k, v): (T, T)) -> Self {
        Label::new(k, v)
    }
}

impl Record for Label {
    fn kind(&self) -> RecordKind {
        RecordKind::Label
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![("name", (&self.name).into()), ("value", (&self.value).into())]
    }
}

/// A link attached to a test result.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Link {
    /// The kind of link, e.g. `issue` or `tms`.
    pub link_type: Option<String>,

    /// The target of the link.
    pub url: String,

    /// The display name of the link.
    pub name: Option<String>,
}

impl Link {
    /// Creates a new link to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            link_type: None,
            url: url.into(),
            name: None,
        }
    }

    /// Sets the kind of link.
    pub fn set_type(&mut self, link_type: impl Into<String>) -> &mut Self {
        self.link_type = Some(link_type.into());
        self
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }
}

impl Record for Link {
    fn kind(&self) -> RecordKind {
        RecordKind::Link
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("type", (&self.link_type).into()),
            ("url", (&self.url).into()),
            ("name", (&self.name).into()),
        ]
    }
}

/// A reference from a result to an attachment file in the report directory.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Attachment {
    /// The display name of the attachment.
    pub name: Option<String>,

    /// The file name of the attachment, relative to the report directory.
    pub source: String,

    /// The MIME type of the attachment.
    pub content_type: Option<String>,
}

impl Attachment {
    /// Creates a new reference to the attachment file `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            name: None,
            source: source.into(),
            content_type: None,
        }
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the MIME type.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl Record for Attachment {
    fn kind(&self) -> RecordKind {
        RecordKind::Attachment
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        vec![
            ("name", (&self.name).into()),
            ("source", (&self.source).into()),
            ("type", (&self.content_type).into()),
        ]
    }
}

/// The outcome of a test, step or fixture.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Status {
    /// An assertion failed.
    Failed,

    /// An unexpected error occurred.
    Broken,

    /// The test passed.
    Passed,

    /// The test was not run.
    Skipped,

    /// The outcome is not known.
    Unknown,
}

impl Status {
    /// Returns the string written to the report for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Failed => "failed",
            Status::Broken => "broken",
            Status::Passed => "passed",
            Status::Skipped => "skipped",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The lifecycle stage of a test, step or fixture.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Stage {
    /// Scheduled but not yet started.
    Scheduled,

    /// Currently running.
    Running,

    /// Ran to completion.
    Finished,

    /// Waiting on something else.
    Pending,

    /// Stopped before completion.
    Interrupted,
}

impl Stage {
    /// Returns the string written to the report for this stage.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Scheduled => "scheduled",
            Stage::Running => "running",
            Stage::Finished => "finished",
            Stage::Pending => "pending",
            Stage::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a parameter value is displayed by the viewer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ParameterMode {
    /// The parameter is not shown.
    Hidden,

    /// The value is replaced by a mask.
    Masked,

    /// The value is shown as-is.
    Default,
}

impl ParameterMode {
    /// Returns the string written to the report for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterMode::Hidden => "hidden",
            ParameterMode::Masked => "masked",
            ParameterMode::Default => "default",
        }
    }
}
