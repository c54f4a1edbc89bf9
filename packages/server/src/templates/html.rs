use std::fmt;

use chrono::{DateTime, Utc};

use crate::models::comment::CommentView;
use crate::models::form::{FieldView, FormView, Widget};
use crate::models::post::PostView;
use crate::models::shared::PageObj;

/// HTML-escapes the wrapped text when formatted.
pub struct Escape<'a>(pub &'a str);

impl fmt::Display for Escape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#x27;")?,
                _ => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}

pub fn e(text: &str) -> Escape<'_> {
    Escape(text)
}

/// Escaped text with newlines turned into `<br>`.
pub fn linebreaks(text: &str) -> String {
    text.lines()
        .map(|line| e(line).to_string())
        .collect::<Vec<_>>()
        .join("<br>\n")
}

pub fn date(value: &DateTime<Utc>) -> String {
    value.format("%d %b %Y").to_string()
}

pub fn layout(title: &str, viewer: Option<&str>, body: &str) -> String {
    let nav = match viewer {
        Some(username) => format!(
            r#"<li><a href="/about/author/">About</a></li>
        <li><a href="/about/tech/">Tech</a></li>
        <li><a href="/follow/">Subscriptions</a></li>
        <li><a href="/create/">New post</a></li>
        <li><a href="/profile/{0}/">{1}</a></li>
        <li><a href="/auth/logout/">Log out</a></li>"#,
            e(username),
            e(username),
        ),
        None => r#"<li><a href="/about/author/">About</a></li>
        <li><a href="/about/tech/">Tech</a></li>
        <li><a href="/auth/login/">Log in</a></li>
        <li><a href="/auth/signup/">Sign up</a></li>"#
            .to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
</head>
<body>
  <header>
    <nav>
      <a href="/"><strong>Ya</strong>tube</a>
      <ul>
        {nav}
      </ul>
    </nav>
  </header>
  <main class="container">
{body}
  </main>
  <footer>
    <p>&copy; Yatube</p>
  </footer>
</body>
</html>
"#,
        title = e(title),
    )
}

/// One post in a listing.
pub fn post_card(post: &PostView, show_group_link: bool) -> String {
    let image = post
        .image
        .as_deref()
        .map(|name| format!(r#"<img class="card-img" src="/media/{0}" alt="">"#, e(name)))
        .unwrap_or_default();

    let group = match (&post.group, show_group_link) {
        (Some(group), true) => format!(
            r#"<a href="/group/{0}/">All posts of the group {1}</a>"#,
            e(&group.slug),
            e(&group.title),
        ),
        _ => String::new(),
    };

    format!(
        r#"<article>
  <ul>
    <li>Author: <a href="/profile/{username}/">{username}</a></li>
    <li>Date: {date}</li>
  </ul>
  {image}
  <p>{text}</p>
  <a href="/posts/{id}/">Details</a>
  {group}
</article>
<hr>"#,
        username = e(&post.author.username),
        date = date(&post.pub_date),
        text = linebreaks(&post.text),
        id = post.id,
    )
}

pub fn post_list(page: &PageObj<PostView>, show_group_link: bool) -> String {
    let mut out: String = page
        .object_list
        .iter()
        .map(|post| post_card(post, show_group_link))
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(&paginator(page));
    out
}

pub fn paginator<T>(page: &PageObj<T>) -> String {
    if page.num_pages <= 1 {
        return String::new();
    }

    let mut items = Vec::new();
    if page.has_previous {
        items.push(r#"<li><a href="?page=1">First</a></li>"#.to_string());
        items.push(format!(
            r#"<li><a href="?page={}">Previous</a></li>"#,
            page.number - 1
        ));
    }
    for n in 1..=page.num_pages {
        if n == page.number {
            items.push(format!(r#"<li class="active"><span>{n}</span></li>"#));
        } else if n.abs_diff(page.number) <= 2 {
            items.push(format!(r#"<li><a href="?page={n}">{n}</a></li>"#));
        }
    }
    if page.has_next {
        items.push(format!(
            r#"<li><a href="?page={}">Next</a></li>"#,
            page.number + 1
        ));
        items.push(format!(
            r#"<li><a href="?page={0}">Last</a></li>"#,
            page.num_pages
        ));
    }

    format!(
        "<nav class=\"pagination\">\n  <ul>\n    {}\n  </ul>\n</nav>",
        items.join("\n    ")
    )
}

pub fn comment_list(comments: &[CommentView]) -> String {
    comments
        .iter()
        .map(|c| {
            format!(
                r#"<div class="comment">
  <h5><a href="/profile/{0}/">{0}</a></h5>
  <p>{1}</p>
</div>"#,
                e(&c.author.username),
                linebreaks(&c.text),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn field_errors(field: &FieldView) -> String {
    field
        .errors
        .iter()
        .map(|err| format!(r#"<div class="error">{}</div>"#, e(err)))
        .collect()
}

fn field_input(field: &FieldView) -> String {
    let value = field.value.as_deref().unwrap_or_default();
    let required = if field.required { " required" } else { "" };
    let name = field.name;

    match field.widget {
        Widget::Textarea => format!(
            r#"<textarea name="{name}" id="id_{name}" cols="40" rows="10"{required}>{}</textarea>"#,
            e(value)
        ),
        Widget::TextInput => format!(
            r#"<input type="text" name="{name}" id="id_{name}" value="{}"{required}>"#,
            e(value)
        ),
        Widget::PasswordInput => {
            format!(r#"<input type="password" name="{name}" id="id_{name}"{required}>"#)
        }
        Widget::Select => {
            let options: String = field
                .choices
                .iter()
                .map(|choice| {
                    format!(
                        r#"<option value="{}"{}>{}</option>"#,
                        e(&choice.value),
                        if choice.selected { " selected" } else { "" },
                        e(&choice.label),
                    )
                })
                .collect();
            format!(
                r#"<select name="{name}" id="id_{name}"><option value="">---------</option>{options}</select>"#
            )
        }
        Widget::FileInput => {
            let current = if value.is_empty() {
                String::new()
            } else {
                format!(
                    r#"Currently: <a href="/media/{0}">{0}</a><br>"#,
                    e(value)
                )
            };
            format!(r#"{current}<input type="file" name="{name}" id="id_{name}" accept="image/*">"#)
        }
    }
}

/// A form with all its fields. `extra` is placed before the submit button.
pub fn form(
    form: &FormView,
    action: &str,
    multipart: bool,
    submit: &str,
    extra: &str,
) -> String {
    let enctype = if multipart {
        r#" enctype="multipart/form-data""#
    } else {
        ""
    };

    let non_field: String = form
        .non_field_errors
        .iter()
        .map(|err| format!(r#"<div class="error">{}</div>"#, e(err)))
        .collect();

    let fields: String = form
        .fields
        .iter()
        .map(|field| {
            let help = field
                .help_text
                .map(|h| format!(r#"<small class="help">{}</small>"#, e(h)))
                .unwrap_or_default();
            format!(
                r#"<div class="form-group">
    <label for="id_{name}">{label}{star}</label>
    {errors}
    {input}
    {help}
  </div>
"#,
                name = field.name,
                label = e(field.label),
                star = if field.required { " *" } else { "" },
                errors = field_errors(field),
                input = field_input(field),
            )
        })
        .collect();

    format!(
        r#"<form method="post" action="{action}"{enctype}>
  {non_field}
  {fields}  {extra}
  <button type="submit">{submit}</button>
</form>"#,
        action = e(action),
        submit = e(submit),
    )
}
