use sea_orm::{EntityTrait, ModelTrait};

use crate::common::{TestApp, routes};
use yatube::entity::post;

#[tokio::test]
async fn index_is_served_from_cache_until_cleared() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let post = app.create_post(&author, "Cached post", None).await;

    let before = app.get(routes::INDEX, None).await;
    assert!(before.text.contains("Cached post"));

    post::Entity::find_by_id(post.id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap()
        .delete(&app.db)
        .await
        .unwrap();

    let cached = app.get(routes::INDEX, None).await;
    assert_eq!(cached.text, before.text);

    app.state.cache.clear();

    let fresh = app.get(routes::INDEX, None).await;
    assert!(!fresh.text.contains("Cached post"));
}

#[tokio::test]
async fn cache_is_kept_per_viewer_and_format() {
    let app = TestApp::spawn().await;
    let author = app.create_user("leo_writer").await;

    let anonymous = app.get(routes::INDEX, None).await;
    let logged_in = app.get(routes::INDEX, Some(&author.token)).await;
    let json = app.get_json(routes::INDEX, None).await;

    assert!(!anonymous.text.contains("leo_writer"));
    assert!(logged_in.text.contains("leo_writer"));
    assert_eq!(json.body["template"], "posts/index.html");
    assert_eq!(app.state.cache.len().await, 3);
}

#[tokio::test]
async fn other_pages_are_not_cached() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let post = app.create_post(&author, "Uncached", None).await;

    app.get(&routes::post(post.id), None).await;
    app.get(&routes::profile(&author.username), None).await;
    app.get("/unexisting_page/", None).await;

    assert_eq!(app.state.cache.len().await, 0);
}

#[tokio::test]
async fn writes_clear_cache_when_configured() {
    let app = TestApp::spawn_with(|config| config.cache.clear_on_write = true).await;
    let author = app.create_user("auth").await;

    let empty = app.get(routes::INDEX, None).await;
    assert!(!empty.text.contains("Brand new"));

    let res = app
        .post_multipart(routes::CREATE, "Brand new", None, None, Some(&author.token))
        .await;
    assert_eq!(res.status, 302);

    let fresh = app.get(routes::INDEX, None).await;
    assert!(fresh.text.contains("Brand new"));
}
