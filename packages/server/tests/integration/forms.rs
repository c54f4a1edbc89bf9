use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::common::{SMALL_GIF, TestApp, routes};
use yatube::entity::{comment, post, user};

#[tokio::test]
async fn create_post_saves_and_redirects_to_profile() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let group = app.create_group("Test group", "test-slug").await;

    let res = app
        .post_multipart(routes::CREATE, "Test text", Some(group.id), None, Some(&author.token))
        .await;

    assert_eq!(res.status, 302, "{}", res.text);
    assert_eq!(res.location, Some(routes::profile(&author.username)));

    let saved = post::Entity::find()
        .filter(post::Column::Text.eq("Test text"))
        .one(&app.db)
        .await
        .unwrap()
        .expect("post should be saved");
    assert_eq!(saved.author_id, author.id);
    assert_eq!(saved.group_id, Some(group.id));
    assert_eq!(saved.image, None);
}

#[tokio::test]
async fn create_post_with_image_stores_file() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;

    let res = app
        .post_multipart(
            routes::CREATE,
            "Post with picture",
            None,
            Some(("small.gif", SMALL_GIF)),
            Some(&author.token),
        )
        .await;
    assert_eq!(res.status, 302, "{}", res.text);

    let saved = post::Entity::find()
        .filter(post::Column::Text.eq("Post with picture"))
        .one(&app.db)
        .await
        .unwrap()
        .expect("post should be saved");
    assert_eq!(saved.image.as_deref(), Some("posts/small.gif"));
    assert!(app.media.path().join("posts/small.gif").exists());

    let res = app.get("/media/posts/small.gif", None).await;
    assert_eq!(res.status, 200);

    let res = app.get_json(&routes::post(saved.id), None).await;
    assert_eq!(res.context()["post"]["image"], "posts/small.gif");
}

#[tokio::test]
async fn same_image_name_gets_an_alternative() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;

    for text in ["First", "Second"] {
        let res = app
            .post_multipart(
                routes::CREATE,
                text,
                None,
                Some(("small.gif", SMALL_GIF)),
                Some(&author.token),
            )
            .await;
        assert_eq!(res.status, 302);
    }

    let second = post::Entity::find()
        .filter(post::Column::Text.eq("Second"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    let name = second.image.unwrap();
    assert_ne!(name, "posts/small.gif");
    assert!(name.starts_with("posts/small_") && name.ends_with(".gif"), "{name}");
}

#[tokio::test]
async fn invalid_post_form_is_rendered_again() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;

    let res = app
        .post_multipart(routes::CREATE, "   ", None, None, Some(&author.token))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.template.as_deref(), Some("posts/create_post.html"));

    let res = app
        .post_multipart(
            routes::CREATE,
            "Not an image",
            None,
            Some(("small.gif", b"plain text".as_slice())),
            Some(&author.token),
        )
        .await;
    assert_eq!(res.status, 200);

    let count = post::Entity::find().count(&app.db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn anonymous_create_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_multipart(routes::CREATE, "Sneaky", None, None, None)
        .await;

    assert_eq!(res.status, 302);
    assert_eq!(res.location, Some(routes::login_next(routes::CREATE)));
    assert_eq!(post::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn author_can_edit_post() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let group = app.create_group("Test group", "test-slug").await;
    let post = app.create_post(&author, "Original", None).await;

    let res = app
        .post_multipart(
            &routes::post_edit(post.id),
            "Edited",
            Some(group.id),
            None,
            Some(&author.token),
        )
        .await;

    assert_eq!(res.status, 302, "{}", res.text);
    assert_eq!(res.location, Some(routes::post(post.id)));

    let edited = post::Entity::find_by_id(post.id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.text, "Edited");
    assert_eq!(edited.group_id, Some(group.id));
}

#[tokio::test]
async fn non_author_cannot_edit_post() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let other = app.create_user("other").await;
    let post = app.create_post(&author, "Original", None).await;

    let res = app
        .post_multipart(&routes::post_edit(post.id), "Hijacked", None, None, Some(&other.token))
        .await;

    assert_eq!(res.status, 302);
    assert_eq!(res.location, Some(routes::post(post.id)));
    let unchanged = post::Entity::find_by_id(post.id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.text, "Original");
}

#[tokio::test]
async fn logged_in_user_can_comment() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let reader = app.create_user("reader").await;
    let post = app.create_post(&author, "Discuss me", None).await;

    let res = app
        .post_form(&routes::comment(post.id), &[("text", "Nice post")], Some(&reader.token))
        .await;

    assert_eq!(res.status, 302);
    assert_eq!(res.location, Some(routes::post(post.id)));

    let comments = comment::Entity::find()
        .filter(comment::Column::PostId.eq(post.id))
        .all(&app.db)
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author_id, reader.id);

    let res = app.get_json(&routes::post(post.id), None).await;
    assert_eq!(res.context()["comments"][0]["text"], "Nice post");
    assert_eq!(res.context()["comments"][0]["author"]["username"], "reader");
}

#[tokio::test]
async fn anonymous_or_blank_comments_are_not_saved() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let post = app.create_post(&author, "Discuss me", None).await;

    let res = app
        .post_form(&routes::comment(post.id), &[("text", "Anonymous")], None)
        .await;
    assert_eq!(res.status, 302);
    assert_eq!(res.location, Some(routes::login_next(&routes::comment(post.id))));

    let res = app
        .post_form(&routes::comment(post.id), &[("text", "  ")], Some(&author.token))
        .await;
    assert_eq!(res.status, 302);
    assert_eq!(res.location, Some(routes::post(post.id)));

    assert_eq!(comment::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn author_can_delete_post_with_comments() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let other = app.create_user("other").await;
    let post = app.create_post(&author, "Short-lived", None).await;
    app.post_form(&routes::comment(post.id), &[("text", "First!")], Some(&other.token))
        .await;

    let res = app
        .post_form(&routes::post_delete(post.id), &[], Some(&other.token))
        .await;
    assert_eq!(res.location, Some(routes::post(post.id)));
    assert!(post::Entity::find_by_id(post.id).one(&app.db).await.unwrap().is_some());

    let res = app
        .post_form(&routes::post_delete(post.id), &[], Some(&author.token))
        .await;
    assert_eq!(res.status, 302);
    assert_eq!(res.location, Some(routes::profile(&author.username)));
    assert!(post::Entity::find_by_id(post.id).one(&app.db).await.unwrap().is_none());
    assert_eq!(comment::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn editing_image_replaces_old_file() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;

    app.post_multipart(
        routes::CREATE,
        "Picture post",
        None,
        Some(("first.gif", SMALL_GIF)),
        Some(&author.token),
    )
    .await;
    let post = post::Entity::find()
        .filter(post::Column::Text.eq("Picture post"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert!(app.media.path().join("posts/first.gif").exists());

    let res = app
        .post_multipart(
            &routes::post_edit(post.id),
            "Picture post",
            None,
            Some(("second.gif", SMALL_GIF)),
            Some(&author.token),
        )
        .await;
    assert_eq!(res.status, 302, "{}", res.text);

    let edited = post::Entity::find_by_id(post.id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.image.as_deref(), Some("posts/second.gif"));
    assert!(app.media.path().join("posts/second.gif").exists());
    assert!(!app.media.path().join("posts/first.gif").exists());
}

#[tokio::test]
async fn editing_without_image_keeps_old_file() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;

    app.post_multipart(
        routes::CREATE,
        "Picture post",
        None,
        Some(("small.gif", SMALL_GIF)),
        Some(&author.token),
    )
    .await;
    let post = post::Entity::find()
        .filter(post::Column::Text.eq("Picture post"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();

    let res = app
        .post_multipart(&routes::post_edit(post.id), "New text", None, None, Some(&author.token))
        .await;
    assert_eq!(res.status, 302, "{}", res.text);

    let edited = post::Entity::find_by_id(post.id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.image.as_deref(), Some("posts/small.gif"));
    assert!(app.media.path().join("posts/small.gif").exists());
}

#[tokio::test]
async fn deleting_post_removes_its_image() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;

    app.post_multipart(
        routes::CREATE,
        "Picture post",
        None,
        Some(("small.gif", SMALL_GIF)),
        Some(&author.token),
    )
    .await;
    let post = post::Entity::find()
        .filter(post::Column::Text.eq("Picture post"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert!(app.media.path().join("posts/small.gif").exists());

    let res = app
        .post_form(&routes::post_delete(post.id), &[], Some(&author.token))
        .await;
    assert_eq!(res.status, 302);

    assert!(post::Entity::find_by_id(post.id).one(&app.db).await.unwrap().is_none());
    assert!(!app.media.path().join("posts/small.gif").exists());
    assert_eq!(app.get("/media/posts/small.gif", None).await.status, 404);
}

#[tokio::test]
async fn overlong_image_name_is_shortened() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let filename = format!("{}.gif", "a".repeat(300));

    let res = app
        .post_multipart(
            routes::CREATE,
            "Long name",
            None,
            Some((filename.as_str(), SMALL_GIF)),
            Some(&author.token),
        )
        .await;
    assert_eq!(res.status, 302, "{}", res.text);

    let saved = post::Entity::find()
        .filter(post::Column::Text.eq("Long name"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    let name = saved.image.unwrap();
    assert!(name.starts_with("posts/aaa") && name.ends_with(".gif"), "{name}");
    assert!(app.media.path().join(&name).exists());
}

#[tokio::test]
async fn failed_insert_leaves_no_stored_image() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    // The session outlives the account, so the insert hits a missing author.
    user::Entity::delete_by_id(author.id)
        .exec(&app.db)
        .await
        .unwrap();

    let res = app
        .post_multipart(
            routes::CREATE,
            "Orphan",
            None,
            Some(("small.gif", SMALL_GIF)),
            Some(&author.token),
        )
        .await;

    assert_eq!(res.status, 500);
    assert_eq!(post::Entity::find().count(&app.db).await.unwrap(), 0);
    assert!(!app.media.path().join("posts/small.gif").exists());
}
