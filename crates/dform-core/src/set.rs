//! # Descriptor Sets
//!
//! A [`DescriptorSet`] is an ordered descriptor list that satisfies the
//! list-level invariants:
//!
//! - every `name` is unique (the first occurrence wins);
//! - every `dependsOn.field` names another field in the set;
//! - no chain of `dependsOn` references loops back on itself.
//!
//! Descriptors are trusted configuration, so violations are repaired
//! rather than rejected. Each repair is recorded as a [`DescriptorIssue`]
//! and logged at `warn` level. A repaired `dependsOn` is removed, which
//! makes the field unconditionally visible.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::descriptor::{DependsOn, FieldDescriptor, SelectOption};
use crate::error::DescriptorError;
use crate::value::FormValues;

/// A non-fatal correction applied while loading descriptors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorIssue {
    /// An entry could not be decoded as a descriptor and was skipped.
    #[error("entry {index} skipped: {reason}")]
    Undecodable { index: usize, reason: String },

    /// A badly typed property was dropped; the rest of the entry was kept.
    #[error("entry {index}: property '{property}' ignored, expected {expected} but found {found}")]
    InvalidProperty {
        index: usize,
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A later entry reused a name and was skipped.
    #[error("entry {index} skipped: duplicate field name '{name}'")]
    DuplicateName { index: usize, name: String },

    /// A field's condition referenced the field itself.
    #[error("field '{name}': dependsOn references itself; condition removed")]
    SelfDependency { name: String },

    /// A field's condition referenced a field that does not exist.
    #[error("field '{name}': dependsOn references unknown field '{target}'; condition removed")]
    UnknownDependency { name: String, target: String },

    /// A field's condition is part of a dependency cycle.
    #[error("field '{name}': dependsOn '{target}' forms a cycle; condition removed")]
    CyclicDependency { name: String, target: String },
}

/// Ordered, invariant-checked list of field descriptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorSet {
    fields: Vec<FieldDescriptor>,
    issues: Vec<DescriptorIssue>,
}

impl DescriptorSet {
    /// Build a set from already-decoded descriptors, repairing violations.
    pub fn from_descriptors(descriptors: Vec<FieldDescriptor>) -> Self {
        let mut issues = Vec::new();
        let entries = descriptors.into_iter().enumerate().collect();
        let fields = sanitize(entries, &mut issues);
        Self::finish(fields, issues)
    }

    /// Build a set from a JSON value that must be an array.
    ///
    /// Badly typed properties are dropped one by one with a
    /// [`DescriptorIssue::InvalidProperty`], so the rest of the entry
    /// (`required` included) survives. Entries that still do not decode,
    /// such as ones without a `name`, are skipped with a
    /// [`DescriptorIssue::Undecodable`].
    pub fn from_json_value(value: Value) -> Result<Self, DescriptorError> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(DescriptorError::NotAList { found: json_kind(&other) }),
        };

        let mut issues = Vec::new();
        let mut decoded = Vec::with_capacity(items.len());
        for (index, mut item) in items.into_iter().enumerate() {
            if let Value::Object(entry) = &mut item {
                repair_properties(index, entry, &mut issues);
            }
            match serde_json::from_value::<FieldDescriptor>(item) {
                Ok(d) => decoded.push((index, d)),
                Err(e) => issues.push(DescriptorIssue::Undecodable {
                    index,
                    reason: e.to_string(),
                }),
            }
        }

        let fields = sanitize(decoded, &mut issues);
        Ok(Self::finish(fields, issues))
    }

    pub fn from_json_str(json: &str) -> Result<Self, DescriptorError> {
        Self::from_json_value(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DescriptorError> {
        Self::from_json_value(serde_yaml::from_str(yaml)?)
    }

    /// Load a descriptor file. `.yaml`/`.yml` files are read as YAML,
    /// everything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DescriptorError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    fn finish(fields: Vec<FieldDescriptor>, issues: Vec<DescriptorIssue>) -> Self {
        for issue in &issues {
            tracing::warn!(%issue, "descriptor repaired");
        }
        tracing::debug!(fields = fields.len(), issues = issues.len(), "descriptor set loaded");
        Self { fields, issues }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Corrections applied while loading, in discovery order.
    pub fn issues(&self) -> &[DescriptorIssue] {
        &self.issues
    }

    /// Fields whose visibility condition holds for `values`, in order.
    pub fn visible_fields<'a>(
        &'a self,
        values: &'a FormValues,
    ) -> impl Iterator<Item = &'a FieldDescriptor> + 'a {
        self.fields.iter().filter(move |f| f.is_visible(values))
    }
}

impl<'a> IntoIterator for &'a DescriptorSet {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Serializes as the bare descriptor array served by the endpoint.
impl Serialize for DescriptorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Remove `key` from `map` when its value fails `accept`. `null` counts as
/// absent and is removed silently.
fn drop_invalid(
    map: &mut Map<String, Value>,
    key: &str,
    property: &str,
    expected: &'static str,
    accept: impl Fn(&Value) -> bool,
    index: usize,
    issues: &mut Vec<DescriptorIssue>,
) {
    let found = match map.get(key) {
        None => return,
        Some(Value::Null) => None,
        Some(v) if accept(v) => return,
        Some(v) => Some(json_kind(v)),
    };
    map.remove(key);
    if let Some(found) = found {
        issues.push(DescriptorIssue::InvalidProperty {
            index,
            property: property.to_string(),
            expected,
            found,
        });
    }
}

/// Drop the badly typed properties of one raw entry. `name` is left alone:
/// an entry without a usable name cannot be keyed and is skipped later.
fn repair_properties(index: usize, entry: &mut Map<String, Value>, issues: &mut Vec<DescriptorIssue>) {
    for key in ["type", "label", "placeholder", "description"] {
        drop_invalid(entry, key, key, "a string", Value::is_string, index, issues);
    }
    drop_invalid(entry, "required", "required", "a boolean", Value::is_boolean, index, issues);
    drop_invalid(entry, "validation", "validation", "an object", Value::is_object, index, issues);
    drop_invalid(entry, "options", "options", "an array", Value::is_array, index, issues);
    drop_invalid(
        entry,
        "dependsOn",
        "dependsOn",
        "an object with a field name and a scalar value",
        |v| serde_json::from_value::<DependsOn>(v.clone()).is_ok(),
        index,
        issues,
    );

    if let Some(Value::Object(bounds)) = entry.get_mut("validation") {
        for key in ["min", "max"] {
            let property = format!("validation.{key}");
            drop_invalid(bounds, key, &property, "a number", Value::is_number, index, issues);
        }
        drop_invalid(bounds, "pattern", "validation.pattern", "a string", Value::is_string, index, issues);
    }

    if let Some(Value::Array(options)) = entry.get_mut("options") {
        let mut position = 0;
        options.retain(|option| {
            let keep = serde_json::from_value::<SelectOption>(option.clone()).is_ok();
            if !keep {
                issues.push(DescriptorIssue::InvalidProperty {
                    index,
                    property: format!("options[{position}]"),
                    expected: "an object with a string value",
                    found: json_kind(option),
                });
            }
            position += 1;
            keep
        });
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Enforce unique names and well-formed `dependsOn` references.
///
/// Entries carry their original index so issues point at the source list.
fn sanitize(
    entries: Vec<(usize, FieldDescriptor)>,
    issues: &mut Vec<DescriptorIssue>,
) -> Vec<FieldDescriptor> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(entries.len());
    for (index, field) in entries {
        if seen.insert(field.name.clone()) {
            fields.push(field);
        } else {
            issues.push(DescriptorIssue::DuplicateName {
                index,
                name: field.name,
            });
        }
    }

    for field in &mut fields {
        let Some(target) = field.depends_on.as_ref().map(|d| d.field.clone()) else {
            continue;
        };
        if target == field.name {
            issues.push(DescriptorIssue::SelfDependency {
                name: field.name.clone(),
            });
            field.depends_on = None;
        } else if !seen.contains(&target) {
            issues.push(DescriptorIssue::UnknownDependency {
                name: field.name.clone(),
                target,
            });
            field.depends_on = None;
        }
    }

    let cyclic = cyclic_fields(&fields);
    for field in &mut fields {
        if cyclic.contains(&field.name) {
            if let Some(dep) = field.depends_on.take() {
                issues.push(DescriptorIssue::CyclicDependency {
                    name: field.name.clone(),
                    target: dep.field,
                });
            }
        }
    }

    fields
}

/// Names of fields that sit on a `dependsOn` cycle.
///
/// Each field has at most one outgoing edge, so every walk either ends at
/// an unconditional field or enters exactly one cycle. Fields that merely
/// lead into a cycle are not part of it.
fn cyclic_fields(fields: &[FieldDescriptor]) -> HashSet<String> {
    let edges: HashMap<&str, &str> = fields
        .iter()
        .filter_map(|f| f.depends_on.as_ref().map(|d| (f.name.as_str(), d.field.as_str())))
        .collect();

    let mut done: HashSet<&str> = HashSet::new();
    let mut cyclic = HashSet::new();

    for start in fields.iter().map(|f| f.name.as_str()) {
        let mut path: Vec<&str> = Vec::new();
        let mut current = Some(start);
        while let Some(node) = current {
            if done.contains(node) {
                break;
            }
            if let Some(pos) = path.iter().position(|n| *n == node) {
                cyclic.extend(path[pos..].iter().map(|n| n.to_string()));
                break;
            }
            path.push(node);
            current = edges.get(node).copied();
        }
        done.extend(path);
    }

    cyclic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldType;

    fn text(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, name, FieldType::Text)
    }

    #[test]
    fn well_formed_list_has_no_issues() {
        let set = DescriptorSet::from_descriptors(vec![
            text("role"),
            text("notes").depends_on("role", "admin"),
        ]);
        assert!(set.issues().is_empty());
        assert_eq!(set.len(), 2);
        assert!(set.get("notes").unwrap().depends_on.is_some());
    }

    #[test]
    fn duplicate_name_keeps_first() {
        let set = DescriptorSet::from_descriptors(vec![
            text("a").required(true),
            text("b"),
            text("a"),
        ]);
        assert_eq!(set.len(), 2);
        assert!(set.get("a").unwrap().required);
        assert_eq!(
            set.issues(),
            &[DescriptorIssue::DuplicateName {
                index: 2,
                name: "a".to_string()
            }]
        );
    }

    #[test]
    fn self_dependency_is_removed() {
        let set = DescriptorSet::from_descriptors(vec![text("a").depends_on("a", "x")]);
        assert!(set.get("a").unwrap().depends_on.is_none());
        assert!(matches!(set.issues(), [DescriptorIssue::SelfDependency { .. }]));
    }

    #[test]
    fn unknown_dependency_is_removed() {
        let set = DescriptorSet::from_descriptors(vec![text("a").depends_on("ghost", "x")]);
        assert!(set.get("a").unwrap().depends_on.is_none());
        assert!(matches!(
            set.issues(),
            [DescriptorIssue::UnknownDependency { target, .. }] if target == "ghost"
        ));
    }

    #[test]
    fn two_field_cycle_is_broken_on_both_sides() {
        let set = DescriptorSet::from_descriptors(vec![
            text("a").depends_on("b", "x"),
            text("b").depends_on("a", "y"),
        ]);
        assert!(set.get("a").unwrap().depends_on.is_none());
        assert!(set.get("b").unwrap().depends_on.is_none());
        assert_eq!(set.issues().len(), 2);
    }

    #[test]
    fn field_leading_into_cycle_keeps_its_condition() {
        let set = DescriptorSet::from_descriptors(vec![
            text("a").depends_on("b", "x"),
            text("b").depends_on("c", "x"),
            text("c").depends_on("b", "x"),
        ]);
        assert!(set.get("a").unwrap().depends_on.is_some());
        assert!(set.get("b").unwrap().depends_on.is_none());
        assert!(set.get("c").unwrap().depends_on.is_none());
    }

    #[test]
    fn chain_without_cycle_is_untouched() {
        let set = DescriptorSet::from_descriptors(vec![
            text("a"),
            text("b").depends_on("a", "x"),
            text("c").depends_on("b", "y"),
        ]);
        assert!(set.issues().is_empty());
    }

    #[test]
    fn undecodable_entries_are_skipped() {
        let set = DescriptorSet::from_json_value(serde_json::json!([
            {"name": "ok", "type": "text"},
            {"label": "no name"},
            42
        ]))
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.issues().len(), 2);
        assert!(matches!(set.issues()[0], DescriptorIssue::Undecodable { index: 1, .. }));
        assert!(matches!(set.issues()[1], DescriptorIssue::Undecodable { index: 2, .. }));
    }

    #[test]
    fn badly_typed_properties_are_dropped_and_the_field_kept() {
        let set = DescriptorSet::from_json_value(serde_json::json!([
            {"name": "nick", "type": "text", "required": true,
             "validation": {"min": "3", "max": 20, "pattern": 7}},
            {"name": "kind", "type": null, "required": true},
            {"name": "tier", "type": 5, "label": ["x"]},
            {"name": "role", "type": "select",
             "options": [{"label": "A", "value": "a"}, "b", {"label": "C"}],
             "dependsOn": "kind"}
        ]))
        .unwrap();

        assert_eq!(set.len(), 4);
        let nick = set.get("nick").unwrap();
        assert!(nick.required);
        let bounds = nick.validation.as_ref().unwrap();
        assert_eq!(bounds.min, None);
        assert_eq!(bounds.max, Some(20.0));
        assert_eq!(bounds.pattern, None);

        let kind = set.get("kind").unwrap();
        assert!(kind.required);
        assert!(kind.field_type.is_unknown());
        assert!(set.get("tier").unwrap().field_type.is_unknown());

        let role = set.get("role").unwrap();
        assert_eq!(role.options.as_ref().unwrap().len(), 1);
        assert!(role.depends_on.is_none());

        let properties: Vec<&str> = set
            .issues()
            .iter()
            .map(|issue| match issue {
                DescriptorIssue::InvalidProperty { property, .. } => property.as_str(),
                other => panic!("unexpected issue {other:?}"),
            })
            .collect();
        assert_eq!(
            properties,
            [
                "validation.min",
                "validation.pattern",
                "type",
                "label",
                "dependsOn",
                "options[1]",
                "options[2]"
            ]
        );
    }

    #[test]
    fn non_array_document_is_an_error() {
        let err = DescriptorSet::from_json_value(serde_json::json!({"name": "x"})).unwrap_err();
        assert!(matches!(err, DescriptorError::NotAList { found: "object" }));
    }

    #[test]
    fn yaml_documents_load() {
        let set = DescriptorSet::from_yaml_str(
            "- name: age\n  type: number\n  validation:\n    min: 0\n    max: 120\n",
        )
        .unwrap();
        let age = set.get("age").unwrap();
        assert_eq!(age.field_type, FieldType::Number);
        assert_eq!(age.validation.as_ref().unwrap().max, Some(120.0));
    }

    #[test]
    fn visible_fields_filters_by_condition() {
        let set = DescriptorSet::from_descriptors(vec![
            text("role"),
            text("notes").depends_on("role", "admin"),
        ]);
        let mut values = FormValues::new();
        values.insert("role", "user");
        let names: Vec<_> = set.visible_fields(&values).map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["role"]);

        values.insert("role", "admin");
        assert_eq!(set.visible_fields(&values).count(), 2);
    }

    #[test]
    fn serializes_as_array() {
        let set = DescriptorSet::from_descriptors(vec![text("a")]);
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "a");
    }
}
