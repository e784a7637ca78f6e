// Copyright (c) The allure-results Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shape records into JSON trees.
//!
//! Shaping drops every field whose value is empty, zero or absent, except for booleans, which are
//! always kept. A parameter's `value` is always turned into a string.

use crate::{
    config::JsonStyle,
    record::{FieldValue, Record, RecordKind},
};
use serde::{Serialize, Serializer};
use serde_json::{
    Map, Value,
    ser::{Formatter, PrettyFormatter},
};
use std::io;

/// A record that has been shaped and is ready to be written out as JSON.
///
/// Keys are in the order the record declared its fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapedRecord {
    fields: Map<String, Value>,
}

impl ShapedRecord {
    /// Returns the value of a field, or `None` if it was omitted.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns true if the field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates over the field names that were kept.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Converts this record into a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Serializes this record with the given style.
    pub fn to_json_vec(&self, style: JsonStyle) -> serde_json::Result<Vec<u8>> {
        let mut buf = Vec::new();
        write_json(&mut buf, &self.fields, style)?;
        Ok(buf)
    }
}

impl Serialize for ShapedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Shapes a record.
///
/// `style` is used to encode object-valued parameter values.
pub fn shape(record: &dyn Record, style: JsonStyle) -> ShapedRecord {
    let kind = record.kind();
    let mut fields = Map::new();

    for (name, value) in record.fields() {
        if !is_kept(&value) {
            continue;
        }
        let mut value = shape_value(value, style);
        if kind == RecordKind::Parameter && name == "value" {
            value = Value::String(parameter_value_string(value, style));
        }
        fields.insert(name.to_owned(), value);
    }

    ShapedRecord { fields }
}

fn is_kept(value: &FieldValue<'_>) -> bool {
    match value {
        FieldValue::Bool(_) => true,
        FieldValue::Null => false,
        FieldValue::Int(n) => *n != 0,
        FieldValue::Float(f) => *f != 0.0,
        FieldValue::Str(s) => !s.is_empty(),
        FieldValue::Json(value) => is_json_kept(value),
        // A nested record is kept even if all of its own fields end up omitted.
        FieldValue::Record(_) => true,
        FieldValue::List(items) => !items.is_empty(),
    }
}

fn is_json_kept(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Null => false,
        Value::Number(n) => {
            if let Some(n) = n.as_i64() {
                n != 0
            } else if let Some(n) = n.as_u64() {
                n != 0
            } else {
                n.as_f64().is_some_and(|f| f != 0.0)
            }
        }
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn shape_value(value: FieldValue<'_>, style: JsonStyle) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(b) => Value::Bool(b),
        FieldValue::Int(n) => Value::from(n),
        // Non-finite floats have no JSON representation and become null.
        FieldValue::Float(f) => Value::from(f),
        FieldValue::Str(s) => Value::String(s.to_owned()),
        FieldValue::Json(value) => value.clone(),
        FieldValue::Record(record) => shape(record, style).into_value(),
        FieldValue::List(items) => Value::Array(
            items
                .into_iter()
                .map(|item| shape_value(item, style))
                .collect(),
        ),
    }
}

fn parameter_value_string(value: Value, style: JsonStyle) -> String {
    match value {
        Value::String(s) => s,
        Value::Object(_) => json_string(&value, style),
        other => json_string(&other, JsonStyle::Compact),
    }
}

fn json_string(value: &Value, style: JsonStyle) -> String {
    let mut buf = Vec::new();
    match write_json(&mut buf, value, style) {
        // serde_json only ever produces UTF-8.
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => value.to_string(),
    }
}

/// Writes `value` as JSON using `style`.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: impl io::Write,
    value: &T,
    style: JsonStyle,
) -> serde_json::Result<()> {
    match style {
        JsonStyle::Compact => {
            let mut serializer = serde_json::Serializer::with_formatter(writer, SpacedFormatter);
            value.serialize(&mut serializer)
        }
        JsonStyle::Pretty => {
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
            value.serialize(&mut serializer)
        }
    }
}

/// Single-line output with `", "` between items and `": "` between keys and values.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Label, Parameter, Status, StatusDetails, TestResult, TestResultContainer, TestStepResult,
    };
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;
    use test_case::test_case;
    use test_strategy::proptest;

    #[test]
    fn empty_fields_are_omitted() {
        let mut result = TestResult::new("r1");
        result.set_name("").set_status(Status::Passed);
        result.start = Some(0);

        let shaped = shape(&result, JsonStyle::Compact);
        assert_eq!(
            shaped.into_value(),
            json!({ "uuid": "r1", "status": "passed" })
        );
    }

    #[test]
    fn false_booleans_are_kept() {
        let mut details = StatusDetails::new();
        details.set_flaky(false).set_known(true);
        let mut result = TestResult::new("r1");
        result.set_status_details(details);

        let shaped = shape(&result, JsonStyle::Compact);
        assert_eq!(
            shaped.get("statusDetails"),
            Some(&json!({ "known": true, "flaky": false }))
        );
    }

    #[test]
    fn empty_nested_record_is_kept() {
        let mut result = TestResult::new("r1");
        result.set_status_details(StatusDetails::new());

        let shaped = shape(&result, JsonStyle::Compact);
        assert_eq!(shaped.get("statusDetails"), Some(&json!({})));
    }

    #[test]
    fn nested_lists_are_shaped() {
        let mut step = TestStepResult::new("inner");
        step.set_status(Status::Failed);
        let mut outer = TestStepResult::new("outer");
        outer.add_step(step).add_step(TestStepResult::default());

        let mut result = TestResult::new("r1");
        result
            .add_label(("suite", "shaping"))
            .add_label(Label::new("tag", ""))
            .add_step(outer);

        let shaped = shape(&result, JsonStyle::Compact);
        assert_eq!(
            shaped.into_value(),
            json!({
                "uuid": "r1",
                "labels": [
                    { "name": "suite", "value": "shaping" },
                    { "name": "tag" },
                ],
                "steps": [{
                    "name": "outer",
                    "steps": [
                        { "name": "inner", "status": "failed" },
                        {},
                    ],
                }],
            })
        );
    }

    #[test]
    fn container_children() {
        let mut container = TestResultContainer::new("c1");
        container.add_child("r1").add_child("");

        let shaped = shape(&container, JsonStyle::Compact);
        assert_eq!(shaped.get("children"), Some(&json!(["r1", ""])));
    }

    #[test_case(json!({"a": 1}), JsonStyle::Compact, r#"{"a": 1}"#; "object compact")]
    #[test_case(json!({"a": 1, "b": [1, 2]}), JsonStyle::Compact, r#"{"a": 1, "b": [1, 2]}"#; "nested object compact")]
    #[test_case(json!({"a": 1}), JsonStyle::Pretty, "{\n    \"a\": 1\n}"; "object pretty")]
    #[test_case(json!(3), JsonStyle::Compact, "3"; "integer")]
    #[test_case(json!(2.5), JsonStyle::Pretty, "2.5"; "float")]
    #[test_case(json!("plain"), JsonStyle::Compact, "plain"; "string")]
    #[test_case(json!(false), JsonStyle::Compact, "false"; "false bool")]
    #[test_case(json!([1, 2]), JsonStyle::Pretty, "[1, 2]"; "array")]
    fn parameter_values(value: Value, style: JsonStyle, expected: &str) {
        let parameter = Parameter::new("p", value);
        let shaped = shape(&parameter, style);
        assert_eq!(shaped.get("value"), Some(&Value::String(expected.to_owned())));
    }

    #[test_case(json!(0); "zero")]
    #[test_case(json!(0.0); "zero float")]
    #[test_case(json!(""); "empty string")]
    #[test_case(json!({}); "empty object")]
    #[test_case(json!([]); "empty array")]
    #[test_case(Value::Null; "null")]
    fn falsy_parameter_values_are_omitted(value: Value) {
        let parameter = Parameter::new("p", value);
        let shaped = shape(&parameter, JsonStyle::Compact);
        assert_eq!(shaped.keys().collect::<Vec<_>>(), ["name"]);
    }

    #[test_case(true, "true"; "true value")]
    #[test_case(false, "false"; "false value")]
    fn boolean_parameter_values_use_json_spelling(value: bool, expected: &str) {
        let parameter = Parameter::new("flag", value);
        let shaped = shape(&parameter, JsonStyle::Compact);
        assert_eq!(shaped.get("value"), Some(&json!(expected)));
    }

    #[test_case(JsonStyle::Compact, "{\"k\": \"é ✓\"}"; "compact")]
    #[test_case(JsonStyle::Pretty, "{\n    \"k\": \"é ✓\"\n}"; "pretty")]
    fn object_parameter_values_keep_non_ascii(style: JsonStyle, expected: &str) {
        let parameter = Parameter::new("p", json!({ "k": "é ✓" }));
        let shaped = shape(&parameter, style);
        assert_eq!(shaped.get("value"), Some(&json!(expected)));
    }

    #[test]
    fn only_parameter_values_are_stringified() {
        #[derive(Debug)]
        struct Custom(Value);

        impl Record for Custom {
            fn kind(&self) -> RecordKind {
                RecordKind::Label
            }

            fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
                vec![("value", (&self.0).into()), ("ratio", 0.0_f64.into())]
            }
        }

        let shaped = shape(&Custom(json!({"a": 1})), JsonStyle::Compact);
        assert_eq!(shaped.into_value(), json!({ "value": { "a": 1 } }));
    }

    #[test]
    fn compact_serialization() {
        let mut result = TestResult::new("r1");
        result.set_name("naïve ✓").add_label(("suite", "s"));

        let shaped = shape(&result, JsonStyle::Compact);
        let bytes = shaped.to_json_vec(JsonStyle::Compact).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"uuid": "r1", "labels": [{"name": "suite", "value": "s"}], "name": "naïve ✓"}"#
        );
    }

    #[test]
    fn pretty_serialization() {
        let mut result = TestResult::new("r1");
        result.add_label(("suite", "s"));

        let shaped = shape(&result, JsonStyle::Pretty);
        let bytes = shaped.to_json_vec(JsonStyle::Pretty).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            indoc::indoc! {r#"
                {
                    "uuid": "r1",
                    "labels": [
                        {
                            "name": "suite",
                            "value": "s"
                        }
                    ]
                }"#}
        );
    }

    #[proptest(cases = 256)]
    fn omission_follows_truthiness(
        #[strategy(proptest::option::of("[a-z]{0,2}"))] name: Option<String>,
        known: Option<bool>,
        flaky: Option<bool>,
        #[strategy(proptest::option::of(-1i64..=1))] start: Option<i64>,
        #[strategy(0usize..3)] label_count: usize,
    ) {
        let mut details = StatusDetails::new();
        details.known = known;
        details.flaky = flaky;

        let mut result = TestResult::new("r1");
        result.name = name.clone();
        result.start = start;
        result.status_details = Some(details);
        for i in 0..label_count {
            result.add_label(("tag".to_owned(), i.to_string()));
        }

        let shaped = shape(&result, JsonStyle::Compact);
        prop_assert_eq!(
            shaped.contains("name"),
            name.as_deref().is_some_and(|name| !name.is_empty())
        );
        prop_assert_eq!(shaped.contains("start"), start.is_some_and(|start| start != 0));
        prop_assert_eq!(shaped.contains("labels"), label_count > 0);

        let details = shaped
            .get("statusDetails")
            .and_then(Value::as_object)
            .expect("status details are always kept");
        let known = known.map(Value::Bool);
        let flaky = flaky.map(Value::Bool);
        prop_assert_eq!(details.get("known"), known.as_ref());
        prop_assert_eq!(details.get("flaky"), flaky.as_ref());
        prop_assert!(!details.contains_key("muted"));
    }
}
