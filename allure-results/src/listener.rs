// Copyright (c) The allure-results Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The interface between a test framework and result writers.
//!
//! A test framework reports events to a [`ReportDispatcher`], which forwards each one to every
//! registered [`ReportListener`] in turn.

use crate::{
    errors::WriteError,
    model::{TestResult, TestResultContainer},
    writer::AttachmentBody,
};
use camino::Utf8Path;
use std::fmt;

/// Receives test results, containers and attachments as the test framework produces them.
///
/// Methods are called once per event, in the order events occur.
pub trait ReportListener {
    /// Called when a test result is complete.
    fn report_result(&mut self, result: &TestResult) -> Result<(), WriteError>;

    /// Called when a container is complete.
    fn report_container(&mut self, container: &TestResultContainer) -> Result<(), WriteError>;

    /// Called when an existing file is attached to a result.
    fn report_attached_file(&mut self, source: &Utf8Path, file_name: &str)
    -> Result<(), WriteError>;

    /// Called when in-memory data is attached to a result.
    fn report_attached_data(
        &mut self,
        body: &AttachmentBody,
        file_name: &str,
    ) -> Result<(), WriteError>;
}

impl<L: ReportListener + ?Sized> ReportListener for &mut L {
    fn report_result(&mut self, result: &TestResult) -> Result<(), WriteError> {
        (**self).report_result(result)
    }

    fn report_container(&mut self, container: &TestResultContainer) -> Result<(), WriteError> {
        (**self).report_container(container)
    }

    fn report_attached_file(
        &mut self,
        source: &Utf8Path,
        file_name: &str,
    ) -> Result<(), WriteError> {
        (**self).report_attached_file(source, file_name)
    }

    fn report_attached_data(
        &mut self,
        body: &AttachmentBody,
        file_name: &str,
    ) -> Result<(), WriteError> {
        (**self).report_attached_data(body, file_name)
    }
}

/// Forwards events to an ordered list of listeners.
#[derive(Default)]
pub struct ReportDispatcher<'a> {
    listeners: Vec<Box<dyn ReportListener + 'a>>,
}

impl<'a> ReportDispatcher<'a> {
    /// Creates a new dispatcher with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Listeners receive events in registration order.
    pub fn register(&mut self, listener: impl ReportListener + 'a) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Returns the number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Reports a test result to every listener.
    pub fn report_result(&mut self, result: &TestResult) -> Result<(), WriteError> {
        self.dispatch(|listener| listener.report_result(result))
    }

    /// Reports a container to every listener.
    pub fn report_container(&mut self, container: &TestResultContainer) -> Result<(), WriteError> {
        self.dispatch(|listener| listener.report_container(container))
    }

    /// Reports an attached file to every listener.
    pub fn report_attached_file(
        &mut self,
        source: impl AsRef<Utf8Path>,
        file_name: &str,
    ) -> Result<(), WriteError> {
        let source = source.as_ref();
        self.dispatch(|listener| listener.report_attached_file(source, file_name))
    }

    /// Reports attached data to every listener.
    pub fn report_attached_data(
        &mut self,
        body: impl Into<AttachmentBody>,
        file_name: &str,
    ) -> Result<(), WriteError> {
        let body = body.into();
        self.dispatch(|listener| listener.report_attached_data(&body, file_name))
    }

    // Stops at the first listener that fails; later listeners don't see the event.
    fn dispatch(
        &mut self,
        mut f: impl FnMut(&mut dyn ReportListener) -> Result<(), WriteError>,
    ) -> Result<(), WriteError> {
        for listener in &mut self.listeners {
            f(listener.as_mut())?;
        }
        Ok(())
    }
}

impl fmt::Debug for ReportDispatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
