use serde::Deserialize;

use crate::models::form::{
    FieldErrors, FieldKind, FieldView, FormView, REQUIRED, Widget, add_error,
};

/// Body of the signup form.
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = self.username.trim();
        if username.is_empty() {
            add_error(&mut errors, "username", REQUIRED);
        } else if username.chars().count() > 150 {
            add_error(
                &mut errors,
                "username",
                "Ensure this value has at most 150 characters.",
            );
        } else if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            add_error(
                &mut errors,
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        if self.password1.is_empty() {
            add_error(&mut errors, "password1", REQUIRED);
        } else if !(8..=128).contains(&self.password1.chars().count()) {
            add_error(&mut errors, "password1", "Password must be 8-128 characters.");
        }

        if self.password2.is_empty() {
            add_error(&mut errors, "password2", REQUIRED);
        } else if self.password1 != self.password2 {
            add_error(
                &mut errors,
                "password2",
                "The two password fields didn't match.",
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

pub fn signup_form(username: Option<String>) -> FormView {
    FormView::new(vec![
        FieldView::new("username", "Username", FieldKind::CharField, Widget::TextInput)
            .required()
            .help("Letters, digits and @/./+/-/_ only.")
            .value(username),
        FieldView::new("password1", "Password", FieldKind::CharField, Widget::PasswordInput)
            .required(),
        FieldView::new(
            "password2",
            "Password confirmation",
            FieldKind::CharField,
            Widget::PasswordInput,
        )
        .required(),
    ])
}

/// Body of the login form.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.username.trim().is_empty() {
            add_error(&mut errors, "username", REQUIRED);
        }
        if self.password.is_empty() {
            add_error(&mut errors, "password", REQUIRED);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

pub fn login_form(username: Option<String>) -> FormView {
    FormView::new(vec![
        FieldView::new("username", "Username", FieldKind::CharField, Widget::TextInput)
            .required()
            .value(username),
        FieldView::new("password", "Password", FieldKind::CharField, Widget::PasswordInput)
            .required(),
    ])
}
