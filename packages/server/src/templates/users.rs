use serde::Serialize;

use super::Template;
use super::html::{e, form};
use crate::models::form::FormView;

#[derive(Serialize)]
pub struct SignupPage {
    pub form: FormView,
}

impl Template for SignupPage {
    const NAME: &'static str = "users/signup.html";

    fn title(&self) -> String {
        "Sign up".into()
    }

    fn body(&self) -> String {
        format!(
            "<h1>Sign up</h1>\n{}",
            form(&self.form, "/auth/signup/", false, "Sign up", "")
        )
    }
}

#[derive(Serialize)]
pub struct LoginPage {
    pub form: FormView,
    pub next: Option<String>,
}

impl Template for LoginPage {
    const NAME: &'static str = "users/login.html";

    fn title(&self) -> String {
        "Log in".into()
    }

    fn body(&self) -> String {
        let next = self
            .next
            .as_deref()
            .map(|next| format!(r#"<input type="hidden" name="next" value="{}">"#, e(next)))
            .unwrap_or_default();
        format!(
            "<h1>Log in</h1>\n{}",
            form(&self.form, "/auth/login/", false, "Log in", &next)
        )
    }
}

#[derive(Serialize)]
pub struct LoggedOutPage {}

impl Template for LoggedOutPage {
    const NAME: &'static str = "users/logged_out.html";

    fn title(&self) -> String {
        "Logged out".into()
    }

    fn body(&self) -> String {
        r#"<h1>You have logged out</h1>
<p><a href="/auth/login/">Log in again</a></p>"#
            .into()
    }
}
