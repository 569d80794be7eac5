//! # Form Session
//!
//! The state a renderer keeps for one form: the fetched descriptors, the
//! schema built from them, and the values entered so far.
//!
//! ```text
//! Loading ──fetch ok──▶ Ready
//!    │
//!    └──fetch err──▶ Failed (terminal)
//! ```
//!
//! Every field operation requires `Ready`; in any other state it returns a
//! [`SessionError`]. Validation outcomes are returned as data.

use dform_core::{DescriptorSet, FieldDescriptor, FieldValue, FormValues};
use dform_schema::{build_schema_with, FieldViolation, SchemaOptions, ValidationErrors, ValidationSchema};

use crate::client::DescriptorClient;
use crate::error::{FetchError, SessionError};

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready,
    Failed,
}

/// Result of a local submit: the cleaned values or the per-field errors.
pub type Submission = Result<FormValues, ValidationErrors>;

#[derive(Debug)]
struct ReadyForm {
    descriptors: DescriptorSet,
    schema: ValidationSchema,
    values: FormValues,
}

#[derive(Debug)]
enum Phase {
    Loading,
    Ready(Box<ReadyForm>),
    Failed(String),
}

#[derive(Debug)]
pub struct FormSession {
    phase: Phase,
    options: SchemaOptions,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    /// A session waiting for its descriptors.
    pub fn new() -> Self {
        Self::with_options(SchemaOptions::default())
    }

    pub fn with_options(options: SchemaOptions) -> Self {
        Self {
            phase: Phase::Loading,
            options,
        }
    }

    /// A session that is ready immediately, for descriptors obtained
    /// without the HTTP client.
    pub fn from_descriptors(descriptors: DescriptorSet, options: SchemaOptions) -> Self {
        let mut session = Self::with_options(options);
        session.phase = session.ready(descriptors);
        session
    }

    fn ready(&self, descriptors: DescriptorSet) -> Phase {
        let schema = build_schema_with(&descriptors, self.options);
        Phase::Ready(Box::new(ReadyForm {
            descriptors,
            schema,
            values: FormValues::new(),
        }))
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Loading => SessionState::Loading,
            Phase::Ready(_) => SessionState::Ready,
            Phase::Failed(_) => SessionState::Failed,
        }
    }

    /// Failure message once the session has failed.
    pub fn failure(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Fetch descriptors and leave `Loading`.
    pub async fn load(&mut self, client: &DescriptorClient) -> Result<(), SessionError> {
        self.check_loading()?;
        let fetched = client.fetch_descriptors().await;
        self.resolve(fetched)
    }

    /// Apply the outcome of a descriptor fetch.
    ///
    /// Only a `Loading` session accepts an outcome. An error moves it to
    /// `Failed`, where it stays.
    pub fn resolve(&mut self, fetched: Result<DescriptorSet, FetchError>) -> Result<(), SessionError> {
        self.check_loading()?;
        match fetched {
            Ok(descriptors) => {
                self.phase = self.ready(descriptors);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "form failed to load");
                let message = e.to_string();
                self.phase = Phase::Failed(message.clone());
                Err(SessionError::Failed(message))
            }
        }
    }

    fn check_loading(&self) -> Result<(), SessionError> {
        match &self.phase {
            Phase::Loading => Ok(()),
            Phase::Ready(_) => Err(SessionError::AlreadyLoaded),
            Phase::Failed(message) => Err(SessionError::Failed(message.clone())),
        }
    }

    fn form(&self) -> Result<&ReadyForm, SessionError> {
        match &self.phase {
            Phase::Ready(form) => Ok(&**form),
            Phase::Loading => Err(SessionError::Loading),
            Phase::Failed(message) => Err(SessionError::Failed(message.clone())),
        }
    }

    fn form_mut(&mut self) -> Result<&mut ReadyForm, SessionError> {
        match &mut self.phase {
            Phase::Ready(form) => Ok(&mut **form),
            Phase::Loading => Err(SessionError::Loading),
            Phase::Failed(message) => Err(SessionError::Failed(message.clone())),
        }
    }

    pub fn descriptors(&self) -> Result<&DescriptorSet, SessionError> {
        Ok(&self.form()?.descriptors)
    }

    pub fn schema(&self) -> Result<&ValidationSchema, SessionError> {
        Ok(&self.form()?.schema)
    }

    pub fn set_value(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<(), SessionError> {
        self.form_mut()?.values.insert(name, value);
        Ok(())
    }

    /// Remove a value, returning what was there.
    pub fn clear_value(&mut self, name: &str) -> Result<Option<FieldValue>, SessionError> {
        Ok(self.form_mut()?.values.remove(name))
    }

    pub fn values(&self) -> Result<&FormValues, SessionError> {
        Ok(&self.form()?.values)
    }

    /// Fields to render for the current values, in display order.
    pub fn visible_fields(&self) -> Result<Vec<&FieldDescriptor>, SessionError> {
        let form = self.form()?;
        Ok(form.descriptors.visible_fields(&form.values).collect())
    }

    /// Check one field against the current values.
    pub fn validate_field(&self, name: &str) -> Result<Option<FieldViolation>, SessionError> {
        let form = self.form()?;
        Ok(form.schema.validate_field(name, &form.values))
    }

    /// Validate all current values.
    pub fn submit(&self) -> Result<Submission, SessionError> {
        let form = self.form()?;
        Ok(form.schema.validate(&form.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dform_core::FieldType;

    fn descriptors() -> DescriptorSet {
        DescriptorSet::from_descriptors(vec![
            FieldDescriptor::new("role", "Role", FieldType::Select)
                .required(true)
                .with_options(vec![
                    dform_core::SelectOption::new("Admin", "admin"),
                    dform_core::SelectOption::new("User", "user"),
                ]),
            FieldDescriptor::new("reason", "Reason", FieldType::Textarea)
                .required(true)
                .depends_on("role", "admin"),
        ])
    }

    fn failed_fetch() -> FetchError {
        FetchError::Status {
            endpoint: "http://localhost/api/form-structure".into(),
            status: 500,
            body: "boom".into(),
        }
    }

    #[test]
    fn starts_loading_and_rejects_field_operations() {
        let mut session = FormSession::new();
        assert_eq!(session.state(), SessionState::Loading);
        assert_eq!(session.values().unwrap_err(), SessionError::Loading);
        assert_eq!(session.set_value("role", "admin").unwrap_err(), SessionError::Loading);
        assert!(session.submit().is_err());
    }

    #[test]
    fn successful_fetch_makes_session_ready() {
        let mut session = FormSession::new();
        session.resolve(Ok(descriptors())).unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.descriptors().unwrap().len(), 2);
        assert!(session.values().unwrap().is_empty());
    }

    #[test]
    fn failed_fetch_is_terminal() {
        let mut session = FormSession::new();
        let err = session.resolve(Err(failed_fetch())).unwrap_err();
        assert!(matches!(err, SessionError::Failed(ref m) if m.contains("500")));
        assert_eq!(session.state(), SessionState::Failed);
        assert!(session.failure().unwrap().contains("boom"));

        // A later successful outcome does not revive it.
        assert!(session.resolve(Ok(descriptors())).is_err());
        assert_eq!(session.state(), SessionState::Failed);
        assert!(matches!(session.values(), Err(SessionError::Failed(_))));
    }

    #[test]
    fn ready_session_cannot_be_loaded_twice() {
        let mut session = FormSession::from_descriptors(descriptors(), SchemaOptions::default());
        assert_eq!(session.resolve(Ok(descriptors())).unwrap_err(), SessionError::AlreadyLoaded);
    }

    #[test]
    fn visibility_follows_values() {
        let mut session = FormSession::from_descriptors(descriptors(), SchemaOptions::default());
        let names = |s: &FormSession| -> Vec<String> {
            s.visible_fields().unwrap().iter().map(|f| f.name.clone()).collect()
        };
        assert_eq!(names(&session), ["role"]);

        session.set_value("role", "admin").unwrap();
        assert_eq!(names(&session), ["role", "reason"]);

        session.clear_value("role").unwrap();
        assert_eq!(names(&session), ["role"]);
    }

    #[test]
    fn validate_field_reports_single_violation() {
        let mut session = FormSession::from_descriptors(descriptors(), SchemaOptions::default());
        session.set_value("role", "root").unwrap();
        let violation = session.validate_field("role").unwrap().unwrap();
        assert_eq!(violation.code(), "invalid_option");

        session.set_value("role", "user").unwrap();
        assert!(session.validate_field("role").unwrap().is_none());
    }

    #[test]
    fn submit_returns_errors_as_data() {
        let mut session = FormSession::from_descriptors(descriptors(), SchemaOptions::default());
        session.set_value("role", "user").unwrap();

        // Hidden required fields are validated by default.
        let errors = session.submit().unwrap().unwrap_err();
        assert_eq!(errors.fields(), ["reason"]);

        let mut skipping = FormSession::from_descriptors(descriptors(), SchemaOptions::skip_hidden());
        skipping.set_value("role", "user").unwrap();
        let data = skipping.submit().unwrap().unwrap();
        assert_eq!(data.get("role").and_then(FieldValue::as_str), Some("user"));
    }
}
