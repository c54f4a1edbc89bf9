use std::collections::BTreeMap;

use serde::Serialize;

/// Validation errors keyed by field name.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

pub const REQUIRED: &str = "This field is required.";

/// Field type, named after the form field classes templates know about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    CharField,
    ChoiceField,
    ImageField,
}

/// How a field is drawn in HTML.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    TextInput,
    PasswordInput,
    Textarea,
    Select,
    FileInput,
}

#[derive(Clone, Debug, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub widget: Widget,
    pub required: bool,
    pub help_text: Option<&'static str>,
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    pub errors: Vec<String>,
}

impl FieldView {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind, widget: Widget) -> Self {
        Self {
            name,
            label,
            kind,
            widget,
            required: false,
            help_text: None,
            value: None,
            choices: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn help(mut self, text: &'static str) -> Self {
        self.help_text = Some(text);
        self
    }

    pub fn value(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }

    /// Attach choices; the one equal to the current value is marked selected.
    pub fn choices(mut self, choices: impl IntoIterator<Item = (String, String)>) -> Self {
        let current = self.value.clone();
        self.choices = choices
            .into_iter()
            .map(|(value, label)| Choice {
                selected: current.as_deref() == Some(value.as_str()),
                value,
                label,
            })
            .collect();
        self
    }
}

/// A form as handed to templates: its fields in display order plus errors
/// not tied to one field.
#[derive(Clone, Debug, Serialize)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub non_field_errors: Vec<String>,
}

impl FormView {
    pub fn new(fields: Vec<FieldView>) -> Self {
        Self {
            fields,
            non_field_errors: Vec::new(),
        }
    }

    /// Distribute validation errors to their fields.
    pub fn with_errors(mut self, mut errors: FieldErrors) -> Self {
        for field in &mut self.fields {
            if let Some(errs) = errors.remove(field.name) {
                field.errors = errs;
            }
        }
        self.non_field_errors
            .extend(errors.into_values().flatten());
        self
    }

    pub fn with_non_field_error(mut self, message: impl Into<String>) -> Self {
        self.non_field_errors.push(message.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_valid(&self) -> bool {
        self.non_field_errors.is_empty() && self.fields.iter().all(|f| f.errors.is_empty())
    }
}

/// Record an error for `field`.
pub fn add_error(errors: &mut FieldErrors, field: &'static str, message: impl Into<String>) {
    errors.entry(field).or_default().push(message.into());
}
