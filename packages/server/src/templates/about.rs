use serde::Serialize;

use super::Template;

#[derive(Serialize)]
pub struct AuthorPage {}

impl Template for AuthorPage {
    const NAME: &'static str = "about/author.html";

    fn title(&self) -> String {
        "About the author".into()
    }

    fn body(&self) -> String {
        r#"<h1>About the author</h1>
<p>Yatube is a small blogging platform: write posts, gather them into groups,
discuss them in the comments and follow the authors you like.</p>"#
            .into()
    }
}

#[derive(Serialize)]
pub struct TechPage {}

impl Template for TechPage {
    const NAME: &'static str = "about/tech.html";

    fn title(&self) -> String {
        "Technologies".into()
    }

    fn body(&self) -> String {
        r#"<h1>Technologies</h1>
<ul>
  <li>axum for routing and request handling</li>
  <li>SeaORM on PostgreSQL for storage</li>
  <li>Server-rendered pages with a short-lived page cache</li>
</ul>"#
            .into()
    }
}
