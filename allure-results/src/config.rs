// Copyright (c) The allure-results Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output configuration.

use std::{env, ffi::OsStr};

/// The environment variable that turns on indented JSON output.
///
/// Any non-empty value selects indented output.
pub const INDENT_OUTPUT_ENV: &str = "ALLURE_INDENT_OUTPUT";

/// The layout of written JSON.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum JsonStyle {
    /// Everything on one line, with a space after `:` and `,`.
    #[default]
    Compact,

    /// Indented by four spaces per level.
    Pretty,
}

/// Determines which [`JsonStyle`] a writer uses.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum IndentPolicy {
    /// Read [`INDENT_OUTPUT_ENV`] every time a record is written.
    #[default]
    FromEnv,

    /// Always indent.
    Always,

    /// Never indent.
    Never,
}

impl IndentPolicy {
    /// Resolves this policy to a concrete style.
    ///
    /// For [`IndentPolicy::FromEnv`], the environment is consulted on every call.
    pub fn resolve(self) -> JsonStyle {
        match self {
            IndentPolicy::FromEnv => {
                let style = style_for_env_value(env::var_os(INDENT_OUTPUT_ENV).as_deref());
                tracing::trace!("{INDENT_OUTPUT_ENV} resolved to {style:?}");
                style
            }
            IndentPolicy::Always => JsonStyle::Pretty,
            IndentPolicy::Never => JsonStyle::Compact,
        }
    }
}

fn style_for_env_value(value: Option<&OsStr>) -> JsonStyle {
    match value {
        Some(value) if !value.is_empty() => JsonStyle::Pretty,
        _ => JsonStyle::Compact,
    }
}
