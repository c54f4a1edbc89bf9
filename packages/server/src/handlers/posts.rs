use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{comment, follow, group, post};
use crate::error::AppError;
use crate::extractors::auth::{AuthUser, MaybeUser};
use crate::models::comment::{CommentForm, comment_form};
use crate::models::post::{CleanImage, PostFormData, post_form};
use crate::models::shared::PageQuery;
use crate::state::AppState;
use crate::templates::posts::{CreatePostPage, GroupPage, IndexPage, PostDetailPage, ProfilePage};
use crate::templates::{Format, Page};
use crate::utils::posts::{
    all_groups, count_posts_by, find_post, find_user_by_username, parse_post_id, post_comments,
    post_page, post_url, profile_url, to_post_view,
};
use crate::utils::redirect::found;

#[instrument(skip(state, viewer, query), fields(page = ?query.page))]
pub async fn index(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    format: Format,
    Query(query): Query<PageQuery>,
) -> Result<Page<IndexPage>, AppError> {
    let page_obj = post_page(
        &state.db,
        post::Entity::find(),
        query.page.as_deref(),
        state.config.posts.per_page,
    )
    .await?;

    Ok(Page::new(format, IndexPage { page_obj }).viewer(viewer.as_ref()))
}

#[instrument(skip(state, viewer, query), fields(slug = %slug))]
pub async fn group_posts(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    format: Format,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Page<GroupPage>, AppError> {
    let group = group::Entity::find()
        .filter(group::Column::Slug.eq(&slug))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("/group/{slug}/")))?;

    let page_obj = post_page(
        &state.db,
        post::Entity::find().filter(post::Column::GroupId.eq(group.id)),
        query.page.as_deref(),
        state.config.posts.per_page,
    )
    .await?;

    Ok(Page::new(
        format,
        GroupPage {
            group: (&group).into(),
            page_obj,
        },
    )
    .viewer(viewer.as_ref()))
}

#[instrument(skip(state, viewer, query), fields(username = %username))]
pub async fn profile(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    format: Format,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Page<ProfilePage>, AppError> {
    let author = find_user_by_username(&state.db, &username).await?;

    let page_obj = post_page(
        &state.db,
        post::Entity::find().filter(post::Column::AuthorId.eq(author.id)),
        query.page.as_deref(),
        state.config.posts.per_page,
    )
    .await?;

    let (following, can_follow) = match &viewer {
        Some(user) if user.user_id != author.id => {
            let following = follow::Entity::find_by_id((user.user_id, author.id))
                .one(&state.db)
                .await?
                .is_some();
            (following, true)
        }
        _ => (false, false),
    };

    let ctx = ProfilePage {
        author: (&author).into(),
        posts_count: page_obj.count,
        following,
        can_follow,
        page_obj,
    };
    Ok(Page::new(format, ctx).viewer(viewer.as_ref()))
}

#[instrument(skip(state, viewer), fields(id = %raw_id))]
pub async fn post_detail(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    format: Format,
    Path(raw_id): Path<String>,
) -> Result<Page<PostDetailPage>, AppError> {
    let id = parse_post_id(&raw_id)?;
    let post = find_post(&state.db, id).await?;

    let posts_count = count_posts_by(&state.db, post.author_id).await?;
    let comments = post_comments(&state.db, post.id).await?;
    let is_author = viewer.as_ref().is_some_and(|u| u.user_id == post.author_id);
    let post = to_post_view(&state.db, post).await?;

    let ctx = PostDetailPage {
        post,
        posts_count,
        comments,
        form: comment_form(),
        is_author,
        can_comment: viewer.is_some(),
    };
    Ok(Page::new(format, ctx).viewer(viewer.as_ref()))
}

#[instrument(skip(state, auth_user), fields(user = %auth_user.username))]
pub async fn create_form(
    auth_user: AuthUser,
    State(state): State<AppState>,
    format: Format,
) -> Result<Page<CreatePostPage>, AppError> {
    let groups = all_groups(&state.db).await?;
    let ctx = CreatePostPage {
        form: post_form(&groups, None, None, None),
        is_edit: false,
        post_id: None,
    };
    Ok(Page::new(format, ctx).viewer(Some(&auth_user)))
}

/// Store an uploaded image, returning the name it was stored under.
async fn store_image(state: &AppState, image: &CleanImage) -> Result<String, AppError> {
    let name = state.media.save(&image.name, &image.data).await?;
    tracing::info!(name = %name, size = image.data.len(), "Stored post image");
    Ok(name)
}

async fn remove_image(state: &AppState, name: &str) {
    if let Err(e) = state.media.delete(name).await {
        tracing::warn!("Failed to delete image {}: {}", name, e);
    }
}

#[instrument(skip(state, auth_user, multipart), fields(user = %auth_user.username))]
pub async fn create_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    format: Format,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let data = PostFormData::from_multipart(multipart).await?;
    let groups = all_groups(&state.db).await?;

    let clean = match data.clean(&groups, state.config.media.max_upload_size) {
        Ok(clean) => clean,
        Err(errors) => {
            let form = post_form(&groups, Some(data.text), Some(data.group), None).with_errors(errors);
            let ctx = CreatePostPage {
                form,
                is_edit: false,
                post_id: None,
            };
            return Ok(Page::new(format, ctx).viewer(Some(&auth_user)).into_response());
        }
    };

    let image = match &clean.image {
        Some(image) => Some(store_image(&state, image).await?),
        None => None,
    };

    let new_post = post::ActiveModel {
        text: Set(clean.text),
        pub_date: Set(Utc::now()),
        author_id: Set(auth_user.user_id),
        group_id: Set(clean.group_id),
        image: Set(image.clone()),
        ..Default::default()
    };
    let model = match new_post.insert(&state.db).await {
        Ok(model) => model,
        Err(e) => {
            if let Some(name) = &image {
                remove_image(&state, name).await;
            }
            return Err(e.into());
        }
    };
    tracing::info!(post_id = model.id, "Post created");

    state.after_write();
    Ok(found(&profile_url(&auth_user.username)))
}

#[instrument(skip(state, auth_user), fields(id = %raw_id, user = %auth_user.username))]
pub async fn edit_form(
    auth_user: AuthUser,
    State(state): State<AppState>,
    format: Format,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_post_id(&raw_id)?;
    let post = find_post(&state.db, id).await?;
    if post.author_id != auth_user.user_id {
        return Ok(found(&post_url(post.id)));
    }

    let groups = all_groups(&state.db).await?;
    let ctx = CreatePostPage {
        form: post_form(
            &groups,
            Some(post.text),
            post.group_id.map(|id| id.to_string()),
            post.image,
        ),
        is_edit: true,
        post_id: Some(post.id),
    };
    Ok(Page::new(format, ctx).viewer(Some(&auth_user)).into_response())
}

#[instrument(skip(state, auth_user, multipart), fields(id = %raw_id, user = %auth_user.username))]
pub async fn edit_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    format: Format,
    Path(raw_id): Path<String>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let id = parse_post_id(&raw_id)?;
    let post = find_post(&state.db, id).await?;
    if post.author_id != auth_user.user_id {
        return Ok(found(&post_url(post.id)));
    }

    let data = PostFormData::from_multipart(multipart).await?;
    let groups = all_groups(&state.db).await?;

    let clean = match data.clean(&groups, state.config.media.max_upload_size) {
        Ok(clean) => clean,
        Err(errors) => {
            let form = post_form(&groups, Some(data.text), Some(data.group), post.image)
                .with_errors(errors);
            let ctx = CreatePostPage {
                form,
                is_edit: true,
                post_id: Some(post.id),
            };
            return Ok(Page::new(format, ctx).viewer(Some(&auth_user)).into_response());
        }
    };

    let old_image = post.image.clone();
    let new_image = match &clean.image {
        Some(image) => Some(store_image(&state, image).await?),
        None => None,
    };

    let mut active: post::ActiveModel = post.into();
    active.text = Set(clean.text);
    active.group_id = Set(clean.group_id);
    if let Some(name) = &new_image {
        active.image = Set(Some(name.clone()));
    }
    let model = match active.update(&state.db).await {
        Ok(model) => model,
        Err(e) => {
            if let Some(name) = &new_image {
                remove_image(&state, name).await;
            }
            return Err(e.into());
        }
    };
    tracing::info!(post_id = model.id, "Post updated");

    // The replaced file is no longer referenced by any post.
    if let (Some(old), Some(_)) = (old_image, new_image) {
        remove_image(&state, &old).await;
    }

    state.after_write();
    Ok(found(&post_url(model.id)))
}

#[instrument(skip(state, auth_user), fields(id = %raw_id, user = %auth_user.username))]
pub async fn delete_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_post_id(&raw_id)?;
    let post = find_post(&state.db, id).await?;
    if post.author_id != auth_user.user_id {
        return Ok(found(&post_url(post.id)));
    }

    let txn = state.db.begin().await?;
    comment::Entity::delete_many()
        .filter(comment::Column::PostId.eq(post.id))
        .exec(&txn)
        .await?;
    post::Entity::delete_by_id(post.id).exec(&txn).await?;
    txn.commit().await?;
    tracing::info!(post_id = post.id, "Post deleted");

    if let Some(image) = &post.image {
        remove_image(&state, image).await;
    }

    state.after_write();
    Ok(found(&profile_url(&auth_user.username)))
}

/// `GET /posts/<id>/comment/` has nothing to show; send the user to the post.
#[instrument(skip(state, _auth_user), fields(id = %raw_id))]
pub async fn comment_redirect(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_post_id(&raw_id)?;
    let post = find_post(&state.db, id).await?;
    Ok(found(&post_url(post.id)))
}

#[instrument(skip(state, auth_user, form), fields(id = %raw_id, user = %auth_user.username))]
pub async fn add_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    form: Result<Form<CommentForm>, FormRejection>,
) -> Result<Response, AppError> {
    let id = parse_post_id(&raw_id)?;
    let post = find_post(&state.db, id).await?;

    let form = form.map(|Form(form)| form).unwrap_or_default();
    if let Some(text) = form.clean_text() {
        let new_comment = comment::ActiveModel {
            text: Set(text.to_string()),
            created: Set(Utc::now()),
            post_id: Set(post.id),
            author_id: Set(auth_user.user_id),
            ..Default::default()
        };
        let model = new_comment.insert(&state.db).await?;
        tracing::info!(comment_id = model.id, post_id = post.id, "Comment added");
        state.after_write();
    }

    Ok(found(&post_url(post.id)))
}
