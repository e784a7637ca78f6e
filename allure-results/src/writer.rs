// Copyright (c) The allure-results Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writers that persist shaped records and attachments.
//!
//! [`FileReportWriter`] writes to a report directory on disk, and [`MemoryReportWriter`] keeps
//! everything in memory. Both shape records identically.

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use std::borrow::Cow;

/// The payload of an attachment.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum AttachmentBody {
    /// Text, written out as UTF-8.
    Text(String),

    /// Raw bytes, written out as-is.
    Binary(Vec<u8>),
}

impl AttachmentBody {
    /// Returns the bytes that are written to disk for this body.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AttachmentBody::Text(text) => text.as_bytes(),
            AttachmentBody::Binary(bytes) => bytes,
        }
    }

    /// Returns the number of bytes in this body.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if this body is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for AttachmentBody {
    fn from(text: String) -> Self {
        AttachmentBody::Text(text)
    }
}

impl From<&str> for AttachmentBody {
    fn from(text: &str) -> Self {
        AttachmentBody::Text(text.to_owned())
    }
}

impl From<Cow<'_, str>> for AttachmentBody {
    fn from(text: Cow<'_, str>) -> Self {
        AttachmentBody::Text(text.into_owned())
    }
}

impl From<Vec<u8>> for AttachmentBody {
    fn from(bytes: Vec<u8>) -> Self {
        AttachmentBody::Binary(bytes)
    }
}

impl From<&[u8]> for AttachmentBody {
    fn from(bytes: &[u8]) -> Self {
        AttachmentBody::Binary(bytes.to_vec())
    }
}
