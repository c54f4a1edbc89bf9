use std::convert::Infallible;

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::header;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Logged-in user, read from the session cookie or an
/// `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require a login; anonymous visitors
/// are redirected to the login page with `next` pointing back.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

/// The current user if there is one. Never rejects.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<AuthUser>);

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

fn cookie_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(cookie_name)
        .map(|c| c.value().to_owned())
}

/// Path and query the client asked for, before any router nesting.
fn requested_path(parts: &Parts) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = &state.config.auth;
        let Some(token) = bearer_token(parts).or_else(|| cookie_token(parts, &auth.cookie_name))
        else {
            return Ok(MaybeUser(None));
        };

        match jwt::verify(&token, &auth.jwt_secret) {
            Ok(claims) => Ok(MaybeUser(Some(AuthUser {
                user_id: claims.uid,
                username: claims.sub,
            }))),
            Err(e) => {
                tracing::debug!("Ignoring invalid session token: {e}");
                Ok(MaybeUser(None))
            }
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = match MaybeUser::from_request_parts(parts, state).await {
            Ok(user) => user,
            Err(never) => match never {},
        };
        user.ok_or_else(|| AppError::LoginRequired {
            next: requested_path(parts),
        })
    }
}
