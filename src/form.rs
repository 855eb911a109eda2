//! Create/edit form controller.
//!
//! The controller is a two-state machine: [`FormMode::Creating`] (empty or
//! default fields) and [`FormMode::Editing`] (fields pre-populated from the
//! selected record). Submitting turns raw field values into either a create
//! or an update. The controller itself never talks to the facade; the
//! handlers in [`crate::handlers`] drive it around each facade call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AdminError;
use crate::model::{Entity, Permission, Role, RoleFields, User, UserFields, UserStatus};

/// Raw values as posted by a form: field name → value.
///
/// A checked checkbox is present (its value is irrelevant); an unchecked
/// one is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style checkbox tick.
    pub fn check(self, name: &str) -> Self {
        self.field(name, "on")
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Trimmed, non-empty value of a required field.
    pub fn required(&self, name: &str) -> Result<&str, AdminError> {
        match self.get(name).map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(AdminError::validation(name, "is required")),
        }
    }
}

/// Choices offered by select controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    /// Role names offered on the user form. The first one is the default.
    pub roles: Vec<String>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            roles: vec!["Admin".into(), "Editor".into(), "Viewer".into()],
        }
    }
}

/// Which of the two modes the form is in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "entity", rename_all = "camelCase")]
pub enum FormMode<E> {
    #[default]
    Creating,
    Editing(E),
}

/// Inline feedback for a rejected submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// What a submit turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<E: Entity> {
    Create(E::Fields),
    Update(E),
}

/// Entity-specific form behavior.
pub trait FormEntity: Entity {
    /// Field values for an empty (create) form.
    fn defaults(options: &FormOptions) -> FormData;

    /// Field values pre-populated from an existing record.
    fn prefill(&self) -> FormData;

    /// Extract and check fields from raw values.
    fn parse(data: &FormData, options: &FormOptions) -> Result<Self::Fields, AdminError>;

    /// Merge submitted fields over the selected record; the id is kept.
    fn merge(&self, fields: Self::Fields) -> Self {
        Self::assemble(self.id(), fields)
    }
}

/// Form state for one entity type, stored in the cache at `{kind}/form`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormController<E> {
    pub mode: FormMode<E>,
    /// Whether the modal is shown.
    pub open: bool,
    /// A submit is awaiting the facade.
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FieldError>,
}

impl<E> Default for FormController<E> {
    fn default() -> Self {
        Self {
            mode: FormMode::Creating,
            open: false,
            busy: false,
            error: None,
        }
    }
}

impl<E: FormEntity> FormController<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path under which this controller is cached.
    pub fn path() -> String {
        format!("{}/form", E::KIND)
    }

    /// The "add" action: start a fresh create.
    pub fn open_create(&mut self) {
        *self = Self {
            open: true,
            ..Self::default()
        };
    }

    /// The row "edit" action.
    pub fn open_edit(&mut self, entity: E) {
        *self = Self {
            mode: FormMode::Editing(entity),
            open: true,
            ..Self::default()
        };
    }

    /// Close the modal and drop any selection.
    pub fn dismiss(&mut self) {
        *self = Self::default();
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Editing(_))
    }

    pub fn selected(&self) -> Option<&E> {
        match &self.mode {
            FormMode::Creating => None,
            FormMode::Editing(entity) => Some(entity),
        }
    }

    /// Dialog title, e.g. "Add User" / "Edit User".
    pub fn title(&self) -> String {
        let verb = if self.is_editing() { "Edit" } else { "Add" };
        format!("{} {}", verb, E::LABEL)
    }

    /// Values the inputs start with.
    pub fn initial_values(&self, options: &FormOptions) -> FormData {
        match &self.mode {
            FormMode::Creating => E::defaults(options),
            FormMode::Editing(entity) => entity.prefill(),
        }
    }

    /// Turn raw values into a create or an update, depending on mode.
    pub fn prepare(&self, data: &FormData, options: &FormOptions) -> Result<Submission<E>, AdminError> {
        let fields = E::parse(data, options)?;
        Ok(match &self.mode {
            FormMode::Creating => Submission::Create(fields),
            FormMode::Editing(selected) => Submission::Update(selected.merge(fields)),
        })
    }

    /// Mark a submit as in flight.
    pub fn begin(&mut self) {
        self.busy = true;
        self.error = None;
    }

    /// The mutation landed: close and clear the selection.
    pub fn complete(&mut self) {
        self.dismiss();
    }

    /// Keep the form open and show the problem inline.
    pub fn reject(&mut self, err: &AdminError) {
        self.busy = false;
        self.error = Some(match err {
            AdminError::Validation { field, message } => FieldError {
                field: field.clone(),
                message: message.clone(),
            },
            other => FieldError {
                field: String::new(),
                message: other.to_string(),
            },
        });
    }

    /// The facade failed: stay open, no inline error (a notice is raised).
    pub fn abort(&mut self) {
        self.busy = false;
    }
}

// ── Users ───────────────────────────────────────────────────────────

impl FormEntity for User {
    fn defaults(options: &FormOptions) -> FormData {
        let mut data = FormData::new()
            .field("name", "")
            .field("email", "")
            .field("status", UserStatus::Active.label());
        if let Some(role) = options.roles.first() {
            data.insert("role", role.clone());
        }
        data
    }

    fn prefill(&self) -> FormData {
        FormData::new()
            .field("name", self.name.clone())
            .field("email", self.email.clone())
            .field("role", self.role.clone())
            .field("status", self.status.label())
    }

    fn parse(data: &FormData, options: &FormOptions) -> Result<UserFields, AdminError> {
        let name = data.required("name")?;
        let email = data.required("email")?;
        check_email(email)?;

        let role = data.required("role")?;
        if !options.roles.iter().any(|r| r == role) {
            return Err(AdminError::validation("role", format!("'{}' is not an offered role", role)));
        }

        let status = data
            .required("status")?
            .parse::<UserStatus>()
            .map_err(|e| AdminError::validation("status", e))?;

        Ok(UserFields {
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            status,
        })
    }
}

/// Same shape a browser `type=email` input accepts: one `@`, something on
/// both sides, no whitespace.
fn check_email(email: &str) -> Result<(), AdminError> {
    let malformed = || AdminError::validation("email", format!("'{}' is not an email address", email));
    if email.chars().any(char::is_whitespace) {
        return Err(malformed());
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(malformed()),
    }
}

// ── Roles ───────────────────────────────────────────────────────────

impl FormEntity for Role {
    fn defaults(_options: &FormOptions) -> FormData {
        FormData::new().field("name", "")
    }

    fn prefill(&self) -> FormData {
        let mut data = FormData::new().field("name", self.name.clone());
        for permission in &self.permissions {
            data.insert(permission.as_str(), "on");
        }
        data
    }

    /// Permissions are rebuilt from whichever checkboxes are present, in
    /// checkbox order. None checked yields an empty set.
    fn parse(data: &FormData, _options: &FormOptions) -> Result<RoleFields, AdminError> {
        let name = data.required("name")?;
        let permissions = Permission::ALL
            .into_iter()
            .filter(|p| data.is_checked(p.as_str()))
            .collect();
        Ok(RoleFields {
            name: name.to_string(),
            permissions,
        })
    }
}
