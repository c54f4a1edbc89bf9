use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use moka::future::Cache;

use crate::config::CacheConfig;
use crate::extractors::auth::{AuthUser, MaybeUser};
use crate::state::AppState;
use crate::templates::Format;

/// A response captured for replay.
struct CachedPage {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl CachedPage {
    fn to_response(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
    }
}

/// Whole-page cache keyed by viewer, format and full URL.
///
/// Entries expire after the configured TTL; until then a page is served as
/// it was first rendered, even if the data behind it changed.
#[derive(Clone)]
pub struct PageCache {
    pages: Cache<String, Arc<CachedPage>>,
}

impl PageCache {
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let pages = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { pages }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            Duration::from_secs(config.index_ttl_secs),
            config.max_entries,
        )
    }

    fn key(viewer: Option<&AuthUser>, format: Format, uri: &str) -> String {
        let viewer = viewer.map_or_else(|| "anon".to_string(), |u| u.user_id.to_string());
        format!("{viewer}:{}:{uri}", format.as_str())
    }

    /// Drop every cached page.
    pub fn clear(&self) {
        self.pages.invalidate_all();
        tracing::debug!("Page cache cleared");
    }

    /// Number of live entries, after pending maintenance has run.
    pub async fn len(&self) -> u64 {
        self.pages.run_pending_tasks().await;
        self.pages.entry_count()
    }
}

/// Middleware serving GET responses from [`PageCache`].
///
/// Only `200 OK` responses are stored.
pub async fn cache_page(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    format: Format,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let uri = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let key = PageCache::key(viewer.as_ref(), format, &uri);

    if let Some(page) = state.cache.pages.get(&key).await {
        tracing::debug!(%key, "Page cache hit");
        return page.to_response();
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let body = match to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to buffer response for cache: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let page = CachedPage {
        status: parts.status,
        headers: parts.headers.clone(),
        body: body.clone(),
    };
    state.cache.pages.insert(key, Arc::new(page)).await;

    Response::from_parts(parts, Body::from(body))
}
