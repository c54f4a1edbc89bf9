use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::services::ServeDir;

use crate::cache::cache_page;
use crate::handlers;
use crate::state::AppState;

/// Multipart overhead allowed on top of the image size limit.
const FORM_OVERHEAD: u64 = 1024 * 1024;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(post_routes(state))
        .merge(follow_routes())
        .nest("/auth", auth_routes())
        .nest("/about", about_routes())
        .nest_service("/media", ServeDir::new(&state.config.media.root))
        .fallback(handlers::fallback::not_found)
}

fn post_routes(state: &AppState) -> Router<AppState> {
    let upload_limit =
        DefaultBodyLimit::max((state.config.media.max_upload_size + FORM_OVERHEAD) as usize);

    Router::new()
        .route(
            "/",
            get(handlers::posts::index).layer(middleware::from_fn_with_state(
                state.clone(),
                cache_page,
            )),
        )
        .route("/group/{slug}/", get(handlers::posts::group_posts))
        .route("/profile/{username}/", get(handlers::posts::profile))
        .route("/posts/{id}/", get(handlers::posts::post_detail))
        .route(
            "/create/",
            get(handlers::posts::create_form)
                .post(handlers::posts::create_post)
                .layer(upload_limit.clone()),
        )
        .route(
            "/posts/{id}/edit/",
            get(handlers::posts::edit_form)
                .post(handlers::posts::edit_post)
                .layer(upload_limit),
        )
        .route("/posts/{id}/delete/", post(handlers::posts::delete_post))
        .route(
            "/posts/{id}/comment/",
            get(handlers::posts::comment_redirect).post(handlers::posts::add_comment),
        )
}

fn follow_routes() -> Router<AppState> {
    Router::new()
        .route("/follow/", get(handlers::follow::follow_index))
        .route(
            "/profile/{username}/follow/",
            get(handlers::follow::profile_follow),
        )
        .route(
            "/profile/{username}/unfollow/",
            get(handlers::follow::profile_unfollow),
        )
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/signup/",
            get(handlers::auth::signup_form_page).post(handlers::auth::signup),
        )
        .route(
            "/login/",
            get(handlers::auth::login_form_page).post(handlers::auth::login),
        )
        .route(
            "/logout/",
            get(handlers::auth::logout).post(handlers::auth::logout),
        )
}

fn about_routes() -> Router<AppState> {
    Router::new()
        .route("/author/", get(handlers::about::author))
        .route("/tech/", get(handlers::about::tech))
}
