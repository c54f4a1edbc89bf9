use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::StorageError;
use sea_orm::DbErr;

use crate::extractors::auth::{AuthUser, MaybeUser};
use crate::templates::errors::{BadRequestPage, NotFoundPage, ServerErrorPage};
use crate::templates::{Format, Page};
use crate::utils::redirect::{found, login_url};

/// Application-level error type.
///
/// Every variant renders as a page of its own rather than a bare status, so
/// handlers can return `Result<_, AppError>` and use `?` throughout.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request the user cannot fix by editing a form.
    Validation(String),
    /// The page needs a logged-in user; holds the path to come back to.
    LoginRequired { next: String },
    /// The requested object or page does not exist.
    NotFound(String),
    Internal(String),
}

/// Error page attached to an error response so [`render_errors`] can redraw
/// it in the format the client asked for.
#[derive(Clone, Debug)]
enum ErrorPage {
    BadRequest(String),
    NotFound(String),
    ServerError,
}

impl ErrorPage {
    fn render(self, format: Format, status: StatusCode, viewer: Option<&AuthUser>) -> Response {
        match self {
            ErrorPage::BadRequest(message) => Page::new(format, BadRequestPage { message })
                .status(status)
                .viewer(viewer)
                .into_response(),
            ErrorPage::NotFound(path) => Page::new(format, NotFoundPage { path })
                .status(status)
                .viewer(viewer)
                .into_response(),
            ErrorPage::ServerError => Page::new(format, ServerErrorPage {})
                .status(status)
                .viewer(viewer)
                .into_response(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, page) = match self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, ErrorPage::BadRequest(message)),
            AppError::LoginRequired { next } => return found(&login_url(&next)),
            AppError::NotFound(path) => (StatusCode::NOT_FOUND, ErrorPage::NotFound(path)),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorPage::ServerError)
            }
        };
        let mut response = page.clone().render(Format::Html, status, None);
        response.extensions_mut().insert(page);
        response
    }
}

/// Redraw error pages for the requesting client: JSON when asked for, and
/// with the viewer in the navigation bar.
pub async fn render_errors(MaybeUser(viewer): MaybeUser, format: Format, response: Response) -> Response {
    match response.extensions().get::<ErrorPage>() {
        Some(page) => page.clone().render(format, response.status(), viewer.as_ref()),
        None => response,
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidName(_) | StorageError::SizeLimitExceeded { .. } => {
                tracing::warn!("Rejected upload: {err}");
                AppError::Validation(err.to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}
