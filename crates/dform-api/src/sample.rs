//! # Built-in Sample Form
//!
//! The descriptor list served when no descriptor file is configured: a
//! sign-up form exercising every field type and one conditional field.

use dform_core::{DescriptorSet, FieldDescriptor, FieldType, SelectOption};

/// Descriptors of the sample sign-up form, in display order.
pub fn sample_descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("fullName", "Full name", FieldType::Text)
            .required(true)
            .with_placeholder("Enter your full name")
            .with_min(3.0)
            .with_max(100.0),
        // The pattern is ignored for email fields; the email rule applies.
        FieldDescriptor::new("email", "Email", FieldType::Email)
            .required(true)
            .with_placeholder("you@example.com")
            .with_pattern(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"),
        FieldDescriptor::new("age", "Age", FieldType::Number)
            .with_placeholder("Enter your age")
            .with_min(0.0)
            .with_max(120.0),
        FieldDescriptor::new("userType", "User type", FieldType::Select)
            .required(true)
            .with_placeholder("Select a user type")
            .with_options(vec![
                SelectOption::new("Administrator", "admin"),
                SelectOption::new("User", "user"),
                SelectOption::new("Guest", "guest"),
            ]),
        FieldDescriptor::new("description", "Description", FieldType::Textarea)
            .with_placeholder("Tell us about yourself")
            .with_min(10.0)
            .with_max(500.0)
            .depends_on("userType", "admin"),
        FieldDescriptor::new("acceptTerms", "I accept the terms of use", FieldType::Checkbox)
            .required(true)
            .with_description("You must accept the terms to continue"),
    ]
}

pub fn sample_form() -> DescriptorSet {
    DescriptorSet::from_descriptors(sample_descriptors())
}
