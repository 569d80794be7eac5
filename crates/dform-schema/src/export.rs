//! # JSON Schema Export
//!
//! Renders a [`ValidationSchema`] as a Draft 2020-12 JSON Schema so that
//! non-Rust consumers can check submissions with an off-the-shelf
//! validator.
//!
//! The document describes normalized values: number fields are typed
//! `number` even though [`ValidationSchema::validate`] also accepts numeric
//! text. Email fields use `format: email`, which most validators treat as an
//! annotation rather than an assertion.

use serde_json::{json, Map, Value};

use crate::rule::{FieldRule, Rule};
use crate::validate::{HiddenFieldPolicy, ValidationSchema};

const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

impl Rule {
    /// JSON Schema for a non-blank value of this rule.
    pub fn json_schema(&self) -> Value {
        match self {
            Self::Text {
                min_len,
                max_len,
                pattern,
            } => {
                let mut schema = Map::new();
                schema.insert("type".into(), json!("string"));
                if let Some(min) = min_len {
                    schema.insert("minLength".into(), json!(min.max(0.0).ceil() as u64));
                }
                if let Some(max) = max_len {
                    schema.insert("maxLength".into(), json!(max.max(0.0).floor() as u64));
                }
                if let Some(re) = pattern {
                    schema.insert("pattern".into(), json!(re.as_str()));
                }
                Value::Object(schema)
            }
            Self::Email => json!({"type": "string", "format": "email"}),
            Self::Number { min, max } => {
                let mut schema = Map::new();
                schema.insert("type".into(), json!("number"));
                if let Some(min) = min {
                    schema.insert("minimum".into(), json!(min));
                }
                if let Some(max) = max {
                    schema.insert("maximum".into(), json!(max));
                }
                Value::Object(schema)
            }
            Self::Boolean => json!({"type": "boolean"}),
            Self::OneOf(allowed) => json!({"type": "string", "enum": allowed}),
            Self::AnyString => json!({"type": "string"}),
        }
    }
}

impl FieldRule {
    /// Property schema including blank handling: required fields reject
    /// the empty string, optional fields accept it.
    pub fn property_schema(&self) -> Value {
        let rule = self.rule.json_schema();
        if self.required {
            match rule {
                Value::Object(mut map) => {
                    map.insert("not".into(), json!({"const": ""}));
                    Value::Object(map)
                }
                other => other,
            }
        } else {
            json!({"anyOf": [{"const": ""}, rule]})
        }
    }
}

impl ValidationSchema {
    /// Render the schema as a JSON Schema document.
    ///
    /// Under [`HiddenFieldPolicy::Skip`], conditional fields are described
    /// inside `if`/`then` clauses keyed on their controlling field, so they
    /// are only checked while visible.
    pub fn to_json_schema(&self) -> Value {
        let skip_hidden = self.options().hidden_fields == HiddenFieldPolicy::Skip;

        let mut properties = Map::new();
        let mut required = Vec::new();
        let mut conditionals = Vec::new();

        for rule in self.rules() {
            match (&rule.depends_on, skip_hidden) {
                (Some(dep), true) => {
                    let mut then = Map::new();
                    then.insert(
                        "properties".into(),
                        json!({ rule.name.clone(): rule.property_schema() }),
                    );
                    if rule.required {
                        then.insert("required".into(), json!([rule.name]));
                    }
                    conditionals.push(json!({
                        "if": {
                            "properties": { dep.field.clone(): {"const": dep.value} },
                            "required": [dep.field],
                        },
                        "then": Value::Object(then),
                    }));
                }
                _ => {
                    properties.insert(rule.name.clone(), rule.property_schema());
                    if rule.required {
                        required.push(rule.name.clone());
                    }
                }
            }
        }

        let mut doc = Map::new();
        doc.insert("$schema".into(), json!(DRAFT_2020_12));
        doc.insert("type".into(), json!("object"));
        doc.insert("properties".into(), Value::Object(properties));
        doc.insert("required".into(), json!(required));
        if !conditionals.is_empty() {
            doc.insert("allOf".into(), Value::Array(conditionals));
        }
        Value::Object(doc)
    }
}
