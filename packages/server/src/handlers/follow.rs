use axum::extract::{Path, Query, State};
use axum::response::Response;
use sea_orm::sea_query::{OnConflict, Query as SeaQuery};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{follow, post};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::shared::PageQuery;
use crate::state::AppState;
use crate::templates::posts::FollowPage;
use crate::templates::{Format, Page};
use crate::utils::posts::{find_user_by_username, post_page, profile_url};
use crate::utils::redirect::found;

/// Posts of the authors the current user follows.
#[instrument(skip(state, auth_user, query), fields(user = %auth_user.username))]
pub async fn follow_index(
    auth_user: AuthUser,
    State(state): State<AppState>,
    format: Format,
    Query(query): Query<PageQuery>,
) -> Result<Page<FollowPage>, AppError> {
    let followed = SeaQuery::select()
        .column(follow::Column::AuthorId)
        .from(follow::Entity)
        .and_where(follow::Column::UserId.eq(auth_user.user_id))
        .to_owned();

    let page_obj = post_page(
        &state.db,
        post::Entity::find().filter(post::Column::AuthorId.in_subquery(followed)),
        query.page.as_deref(),
        state.config.posts.per_page,
    )
    .await?;

    Ok(Page::new(format, FollowPage { page_obj }).viewer(Some(&auth_user)))
}

#[instrument(skip(state, auth_user), fields(user = %auth_user.username, author = %username))]
pub async fn profile_follow(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    let author = find_user_by_username(&state.db, &username).await?;

    if author.id == auth_user.user_id {
        tracing::debug!("Ignoring attempt to follow oneself");
        return Ok(found(&profile_url(&author.username)));
    }

    let model = follow::ActiveModel {
        user_id: Set(auth_user.user_id),
        author_id: Set(author.id),
    };
    let result = follow::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([follow::Column::UserId, follow::Column::AuthorId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await;

    match result {
        Ok(_) => tracing::info!("Follow created"),
        Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(found(&profile_url(&author.username)))
}

#[instrument(skip(state, auth_user), fields(user = %auth_user.username, author = %username))]
pub async fn profile_unfollow(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    let author = find_user_by_username(&state.db, &username).await?;

    let result = follow::Entity::delete_many()
        .filter(follow::Column::UserId.eq(auth_user.user_id))
        .filter(follow::Column::AuthorId.eq(author.id))
        .exec(&state.db)
        .await?;
    if result.rows_affected > 0 {
        tracing::info!("Follow removed");
    }

    Ok(found(&profile_url(&author.username)))
}
