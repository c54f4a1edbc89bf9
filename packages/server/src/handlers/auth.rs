use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use sea_orm::*;
use serde::Deserialize;
use tracing::instrument;

use crate::entity::user;
use crate::error::AppError;
use crate::extractors::auth::MaybeUser;
use crate::models::auth::{LoginForm, SignupForm, login_form, signup_form};
use crate::models::form::{FieldErrors, FormView, add_error};
use crate::state::AppState;
use crate::templates::users::{LoggedOutPage, LoginPage, SignupPage};
use crate::templates::{Format, Page};
use crate::utils::redirect::{found, safe_next};
use crate::utils::{hash, jwt};

const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.config.auth.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn issue_token(state: &AppState, user: &user::Model) -> Result<String, AppError> {
    let auth = &state.config.auth;
    jwt::sign(user.id, &user.username, &auth.jwt_secret, auth.token_ttl_hours)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))
}

#[instrument(skip_all)]
pub async fn signup_form_page(MaybeUser(viewer): MaybeUser, format: Format) -> Page<SignupPage> {
    Page::new(
        format,
        SignupPage {
            form: signup_form(None),
        },
    )
    .viewer(viewer.as_ref())
}

#[instrument(skip(state, jar, form), fields(username = %form.username))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    format: Format,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim().to_string();
    let rerender = |errors: FieldErrors| {
        Page::new(
            format,
            SignupPage {
                form: signup_form(Some(username.clone())).with_errors(errors),
            },
        )
        .into_response()
    };

    if let Err(errors) = form.validate() {
        return Ok(rerender(errors));
    }

    let taken = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?
        .is_some();
    if taken {
        let mut errors = FieldErrors::new();
        add_error(&mut errors, "username", USERNAME_TAKEN);
        return Ok(rerender(errors));
    }

    let hash = hash::hash_password(&form.password1)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let new_user = user::ActiveModel {
        username: Set(username.clone()),
        password: Set(hash),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let user = match new_user.insert(&state.db).await {
        Ok(user) => user,
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                tracing::debug!("Signup race condition: unique constraint caught on insert");
                let mut errors = FieldErrors::new();
                add_error(&mut errors, "username", USERNAME_TAKEN);
                return Ok(rerender(errors));
            }
            _ => return Err(e.into()),
        },
    };
    tracing::info!(user_id = user.id, "User signed up");

    let token = issue_token(&state, &user)?;
    Ok((jar.add(session_cookie(&state, token)), found("/")).into_response())
}

#[instrument(skip_all)]
pub async fn login_form_page(
    MaybeUser(viewer): MaybeUser,
    format: Format,
    Query(query): Query<NextQuery>,
) -> Page<LoginPage> {
    Page::new(
        format,
        LoginPage {
            form: login_form(None),
            next: query.next,
        },
    )
    .viewer(viewer.as_ref())
}

#[instrument(skip(state, jar, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    format: Format,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim().to_string();
    let rerender = |page_form: FormView| {
        Page::new(
            format,
            LoginPage {
                form: page_form,
                next: form.next.clone(),
            },
        )
        .into_response()
    };

    if let Err(errors) = form.validate() {
        return Ok(rerender(login_form(Some(username)).with_errors(errors)));
    }

    let user = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?;

    let user = match user {
        Some(user) => {
            let is_valid = hash::verify_password(&form.password, &user.password)
                .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;
            is_valid.then_some(user)
        }
        None => None,
    };

    let Some(user) = user else {
        tracing::debug!("Rejected login");
        return Ok(rerender(
            login_form(Some(username)).with_non_field_error(INVALID_LOGIN),
        ));
    };

    let token = issue_token(&state, &user)?;
    tracing::info!(user_id = user.id, "User logged in");

    let next = safe_next(form.next.as_deref());
    Ok((jar.add(session_cookie(&state, token)), found(&next)).into_response())
}

#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar, format: Format) -> Response {
    let removal = Cookie::build((state.config.auth.cookie_name.clone(), "")).path("/");
    let jar = jar.remove(removal);
    (jar, Page::new(format, LoggedOutPage {})).into_response()
}
