use axum::http::{StatusCode, Uri};
use tracing::instrument;

use crate::extractors::auth::MaybeUser;
use crate::templates::errors::NotFoundPage;
use crate::templates::{Format, Page};

/// Fallback for every unknown URL.
#[instrument(skip(viewer, format))]
pub async fn not_found(MaybeUser(viewer): MaybeUser, format: Format, uri: Uri) -> Page<NotFoundPage> {
    Page::new(
        format,
        NotFoundPage {
            path: uri.path().to_string(),
        },
    )
    .status(StatusCode::NOT_FOUND)
    .viewer(viewer.as_ref())
}
