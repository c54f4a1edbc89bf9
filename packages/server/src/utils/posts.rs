use std::collections::{HashMap, HashSet};

use sea_orm::*;

use crate::entity::{comment, group, post, user};
use crate::error::AppError;
use crate::models::comment::CommentView;
use crate::models::post::{GroupView, PostView, UserView};
use crate::models::shared::{PageObj, num_pages, resolve_page};
use crate::utils::redirect::encode_next;

/// Parse a post id path segment; anything that is not a number is a 404.
pub fn parse_post_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .map_err(|_| AppError::NotFound(format!("/posts/{raw}/")))
}

pub fn post_url(id: i32) -> String {
    format!("/posts/{id}/")
}

/// Profile URL, percent-encoded so it is always a valid `Location`.
pub fn profile_url(username: &str) -> String {
    encode_next(&format!("/profile/{username}/"))
}

pub async fn find_post<C: ConnectionTrait>(db: &C, id: i32) -> Result<post::Model, AppError> {
    post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(post_url(id)))
}

pub async fn find_user_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<user::Model, AppError> {
    user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("/profile/{username}/")))
}

/// All groups, ordered by title, as form choices.
pub async fn all_groups<C: ConnectionTrait>(db: &C) -> Result<Vec<GroupView>, DbErr> {
    let groups = group::Entity::find()
        .order_by_asc(group::Column::Title)
        .order_by_asc(group::Column::Id)
        .all(db)
        .await?;
    Ok(groups.iter().map(GroupView::from).collect())
}

pub async fn count_posts_by<C: ConnectionTrait>(db: &C, author_id: i32) -> Result<u64, DbErr> {
    post::Entity::find()
        .filter(post::Column::AuthorId.eq(author_id))
        .count(db)
        .await
}

/// Load one page of `select`, newest first.
pub async fn post_page<C: ConnectionTrait>(
    db: &C,
    select: Select<post::Entity>,
    raw_page: Option<&str>,
    per_page: u64,
) -> Result<PageObj<PostView>, DbErr> {
    let per_page = Ord::max(per_page, 1);
    let count = select.clone().paginate(db, per_page).num_items().await?;
    let num_pages = num_pages(count, per_page);
    let number = resolve_page(raw_page, num_pages);

    let posts = select
        .order_by_desc(post::Column::PubDate)
        .order_by_desc(post::Column::Id)
        .offset(Some((number - 1) * per_page))
        .limit(Some(per_page))
        .all(db)
        .await?;

    let object_list = to_post_views(db, posts).await?;
    Ok(PageObj::new(number, num_pages, count, object_list))
}

async fn users_by_id<C: ConnectionTrait>(
    db: &C,
    ids: HashSet<i32>,
) -> Result<HashMap<i32, UserView>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(users.iter().map(|u| (u.id, UserView::from(u))).collect())
}

/// Resolve authors and groups of `posts` with one query each.
pub async fn to_post_views<C: ConnectionTrait>(
    db: &C,
    posts: Vec<post::Model>,
) -> Result<Vec<PostView>, DbErr> {
    let authors = users_by_id(db, posts.iter().map(|p| p.author_id).collect()).await?;

    let group_ids: HashSet<i32> = posts.iter().filter_map(|p| p.group_id).collect();
    let groups: HashMap<i32, GroupView> = if group_ids.is_empty() {
        HashMap::new()
    } else {
        group::Entity::find()
            .filter(group::Column::Id.is_in(group_ids))
            .all(db)
            .await?
            .iter()
            .map(|g| (g.id, GroupView::from(g)))
            .collect()
    };

    posts
        .into_iter()
        .map(|p| {
            let author = authors
                .get(&p.author_id)
                .cloned()
                .ok_or_else(|| DbErr::RecordNotFound(format!("author {} of post {}", p.author_id, p.id)))?;
            let group = p.group_id.and_then(|id| groups.get(&id).cloned());
            Ok(PostView::new(p, author, group))
        })
        .collect()
}

pub async fn to_post_view<C: ConnectionTrait>(db: &C, post: post::Model) -> Result<PostView, DbErr> {
    to_post_views(db, vec![post])
        .await?
        .pop()
        .ok_or_else(|| DbErr::RecordNotFound("post".into()))
}

/// Comments of a post, oldest first.
pub async fn post_comments<C: ConnectionTrait>(
    db: &C,
    post_id: i32,
) -> Result<Vec<CommentView>, DbErr> {
    let comments = comment::Entity::find()
        .filter(comment::Column::PostId.eq(post_id))
        .order_by_asc(comment::Column::Created)
        .order_by_asc(comment::Column::Id)
        .all(db)
        .await?;

    let authors = users_by_id(db, comments.iter().map(|c| c.author_id).collect()).await?;

    comments
        .into_iter()
        .map(|c| {
            let author = authors
                .get(&c.author_id)
                .cloned()
                .ok_or_else(|| DbErr::RecordNotFound(format!("author {} of comment {}", c.author_id, c.id)))?;
            Ok(CommentView::new(c, author))
        })
        .collect()
}
