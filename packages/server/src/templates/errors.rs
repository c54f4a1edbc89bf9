use serde::Serialize;

use super::Template;
use super::html::e;

#[derive(Serialize)]
pub struct NotFoundPage {
    pub path: String,
}

impl Template for NotFoundPage {
    const NAME: &'static str = "core/404.html";

    fn title(&self) -> String {
        "Page not found".into()
    }

    fn body(&self) -> String {
        format!(
            r#"<h1>Custom 404</h1>
<p>Page {} not found</p>
<a href="/">Go to the main page</a>"#,
            e(&self.path)
        )
    }
}

#[derive(Serialize)]
pub struct BadRequestPage {
    pub message: String,
}

impl Template for BadRequestPage {
    const NAME: &'static str = "core/400.html";

    fn title(&self) -> String {
        "Bad request".into()
    }

    fn body(&self) -> String {
        format!("<h1>Bad request</h1>\n<p>{}</p>", e(&self.message))
    }
}

#[derive(Serialize)]
pub struct ServerErrorPage {}

impl Template for ServerErrorPage {
    const NAME: &'static str = "core/500.html";

    fn title(&self) -> String {
        "Server error".into()
    }

    fn body(&self) -> String {
        "<h1>Server error</h1>\n<p>Something went wrong. Please try again later.</p>".into()
    }
}
