//! Page rendering.
//!
//! Every page is a typed context implementing [`Template`]. A [`Page`] wraps
//! the context and turns it into either an HTML document or, for clients
//! that ask for `application/json`, the context itself. Both carry the
//! template name in the `X-Template` header.

pub mod about;
pub mod errors;
mod html;
pub mod posts;
pub mod users;

use std::convert::Infallible;

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;

use crate::extractors::auth::AuthUser;

/// Response header naming the template a page was rendered from.
pub const TEMPLATE_HEADER: &str = "x-template";

/// A page context that knows how to draw itself.
pub trait Template: Serialize {
    /// Template name, e.g. `posts/index.html`.
    const NAME: &'static str;

    fn title(&self) -> String;

    /// HTML placed inside the site layout.
    fn body(&self) -> String;
}

/// Representation requested by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Html,
    Json,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Json => "json",
        }
    }

    fn from_accept(accept: Option<&str>) -> Self {
        match accept {
            Some(value) if value.contains("application/json") => Format::Json,
            _ => Format::Html,
        }
    }
}

impl<S> FromRequestParts<S> for Format
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok());
        Ok(Format::from_accept(accept))
    }
}

/// A rendered page: template context plus who is looking at it.
pub struct Page<T> {
    status: StatusCode,
    format: Format,
    viewer: Option<String>,
    context: T,
}

impl<T: Template> Page<T> {
    pub fn new(format: Format, context: T) -> Self {
        Self {
            status: StatusCode::OK,
            format,
            viewer: None,
            context,
        }
    }

    pub fn viewer(mut self, user: Option<&AuthUser>) -> Self {
        self.viewer = user.map(|u| u.username.clone());
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

#[derive(Serialize)]
struct JsonPage<'a, T> {
    template: &'static str,
    context: &'a T,
}

impl<T: Template> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        let headers = [(TEMPLATE_HEADER, T::NAME)];
        match self.format {
            Format::Json => {
                let body = Json(JsonPage {
                    template: T::NAME,
                    context: &self.context,
                });
                (self.status, headers, body).into_response()
            }
            Format::Html => {
                let document = html::layout(
                    &self.context.title(),
                    self.viewer.as_deref(),
                    &self.context.body(),
                );
                (self.status, headers, Html(document)).into_response()
            }
        }
    }
}
