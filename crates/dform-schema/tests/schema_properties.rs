//! Property tests for the schema builder.
//!
//! For any descriptor list with unique names, a value map holding a valid
//! value for every field is accepted, and replacing any single value with a
//! value of the wrong type is rejected with an error on exactly that field.

use dform_core::{DescriptorSet, FieldDescriptor, FieldType, FieldValue, FormValues, SelectOption};
use dform_schema::build_schema;
use proptest::prelude::*;

/// A descriptor together with one valid and one invalid value for it.
#[derive(Debug, Clone)]
struct Case {
    descriptor: FieldDescriptor,
    valid: FieldValue,
    invalid: FieldValue,
}

fn case(index: usize) -> impl Strategy<Value = Case> {
    let name = format!("f{index}");
    let required = any::<bool>();
    (0u8..7, required, 0u32..5, 0u32..10, any::<bool>()).prop_map(
        move |(kind, required, min, span, with_pattern)| {
            let (descriptor, valid, invalid) = match kind {
                0 | 1 => {
                    let t = if kind == 0 { FieldType::Text } else { FieldType::Textarea };
                    // Valid values are non-empty so optional and required fields agree.
                    let max = (min + span).max(1);
                    let len = min.max(1) as usize;
                    let mut d = FieldDescriptor::new(&name, "Text", t)
                        .with_min(f64::from(min))
                        .with_max(f64::from(max));
                    if with_pattern {
                        d = d.with_pattern("^a*$");
                    }
                    (d, FieldValue::from("a".repeat(len)), FieldValue::from(true))
                }
                2 => (
                    FieldDescriptor::new(&name, "Email", FieldType::Email),
                    FieldValue::from("someone@example.com"),
                    FieldValue::from(1.0),
                ),
                3 => (
                    FieldDescriptor::new(&name, "Number", FieldType::Number)
                        .with_min(f64::from(min))
                        .with_max(f64::from(min + span)),
                    FieldValue::from(f64::from(min)),
                    FieldValue::from("not a number"),
                ),
                4 => (
                    FieldDescriptor::new(&name, "Checkbox", FieldType::Checkbox),
                    FieldValue::from(with_pattern),
                    FieldValue::from("yes"),
                ),
                5 => (
                    FieldDescriptor::new(&name, "Select", FieldType::Select).with_options(vec![
                        SelectOption::new("X", "x"),
                        SelectOption::new("Y", "y"),
                    ]),
                    FieldValue::from("y"),
                    FieldValue::from(false),
                ),
                _ => (
                    FieldDescriptor::new(&name, "Other", FieldType::from("color")),
                    FieldValue::from("#ff0000"),
                    FieldValue::from(3.0),
                ),
            };
            Case {
                descriptor: descriptor.required(required),
                valid,
                invalid,
            }
        },
    )
}

fn cases() -> impl Strategy<Value = Vec<Case>> {
    (1usize..8).prop_flat_map(|n| (0..n).map(case).collect::<Vec<_>>())
}

fn build(cases: &[Case]) -> (DescriptorSet, FormValues) {
    let set = DescriptorSet::from_descriptors(cases.iter().map(|c| c.descriptor.clone()).collect());
    let values = cases
        .iter()
        .map(|c| (c.descriptor.name.clone(), c.valid.clone()))
        .collect();
    (set, values)
}

proptest! {
    #[test]
    fn valid_values_are_accepted(cases in cases()) {
        let (set, values) = build(&cases);
        let result = build_schema(&set).validate(&values);
        prop_assert!(result.is_ok(), "rejected: {:?}", result.err());
    }

    #[test]
    fn single_mutation_is_rejected_on_that_field(cases in cases(), pick in any::<prop::sample::Index>()) {
        let (set, mut values) = build(&cases);
        let target = &cases[pick.index(cases.len())];
        values.insert(target.descriptor.name.clone(), target.invalid.clone());

        let errors = build_schema(&set).validate(&values).unwrap_err();
        prop_assert_eq!(errors.fields(), vec![target.descriptor.name.as_str()]);
    }

    #[test]
    fn building_twice_gives_identical_results(cases in cases(), mutate in any::<bool>()) {
        let (set, mut values) = build(&cases);
        if mutate {
            values.insert(cases[0].descriptor.name.clone(), cases[0].invalid.clone());
        }
        let first = build_schema(&set).validate(&values);
        let second = build_schema(&set).validate(&values);
        prop_assert_eq!(first, second);
    }
}
