use crate::common::{TestApp, routes};

#[tokio::test]
async fn public_pages_render_their_templates() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let group = app.create_group("Test group", "test-slug").await;
    let post = app.create_post(&author, "Test post", Some(group.id)).await;

    let pages = [
        (routes::INDEX.to_string(), "posts/index.html"),
        (routes::group(&group.slug), "posts/group_list.html"),
        (routes::profile(&author.username), "posts/profile.html"),
        (routes::post(post.id), "posts/post_detail.html"),
        (routes::ABOUT_AUTHOR.to_string(), "about/author.html"),
        (routes::ABOUT_TECH.to_string(), "about/tech.html"),
        (routes::SIGNUP.to_string(), "users/signup.html"),
        (routes::LOGIN.to_string(), "users/login.html"),
    ];

    for (path, template) in pages {
        let res = app.get(&path, None).await;
        assert_eq!(res.status, 200, "{path}: {}", res.text);
        assert_eq!(res.template.as_deref(), Some(template), "{path}");
    }
}

#[tokio::test]
async fn author_pages_render_for_logged_in_users() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let post = app.create_post(&author, "Test post", None).await;

    let pages = [
        (routes::CREATE.to_string(), "posts/create_post.html"),
        (routes::post_edit(post.id), "posts/create_post.html"),
        (routes::FOLLOW_INDEX.to_string(), "posts/follow.html"),
    ];

    for (path, template) in pages {
        let res = app.get(&path, Some(&author.token)).await;
        assert_eq!(res.status, 200, "{path}: {}", res.text);
        assert_eq!(res.template.as_deref(), Some(template), "{path}");
    }
}

#[tokio::test]
async fn anonymous_users_are_sent_to_login() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let post = app.create_post(&author, "Test post", None).await;

    for path in [
        routes::CREATE.to_string(),
        routes::post_edit(post.id),
        routes::comment(post.id),
        routes::FOLLOW_INDEX.to_string(),
        routes::follow(&author.username),
        routes::unfollow(&author.username),
    ] {
        let res = app.get(&path, None).await;
        assert_eq!(res.status, 302, "{path}");
        assert_eq!(res.location, Some(routes::login_next(&path)), "{path}");
    }
}

#[tokio::test]
async fn login_redirect_keeps_the_query_string() {
    let app = TestApp::spawn().await;

    let res = app.get("/follow/?page=2", None).await;

    assert_eq!(res.status, 302);
    assert_eq!(
        res.location.as_deref(),
        Some("/auth/login/?next=/follow/%3Fpage%3D2")
    );
}

#[tokio::test]
async fn edit_by_non_author_redirects_to_post() {
    let app = TestApp::spawn().await;
    let author = app.create_user("auth").await;
    let other = app.create_user("not_author").await;
    let post = app.create_post(&author, "Test post", None).await;

    let res = app.get(&routes::post_edit(post.id), Some(&other.token)).await;

    assert_eq!(res.status, 302);
    assert_eq!(res.location, Some(routes::post(post.id)));
}

#[tokio::test]
async fn unknown_pages_use_custom_404() {
    let app = TestApp::spawn().await;

    for path in [
        "/unexisting_page/",
        "/group/no-such-group/",
        "/profile/nobody/",
        "/posts/999/",
        "/posts/abc/",
    ] {
        let res = app.get(path, None).await;
        assert_eq!(res.status, 404, "{path}");
        assert_eq!(res.template.as_deref(), Some("core/404.html"), "{path}");
    }
}

#[tokio::test]
async fn not_found_pages_answer_with_json_on_request() {
    let app = TestApp::spawn().await;

    for path in ["/unexisting_page/", "/group/no-such-group/", "/posts/999/"] {
        let res = app.get_json(path, None).await;
        assert_eq!(res.status, 404, "{path}");
        assert_eq!(res.body["template"], "core/404.html", "{path}");
        assert_eq!(res.context()["path"], path, "{path}");
    }
}

#[tokio::test]
async fn pages_answer_with_json_context_on_request() {
    let app = TestApp::spawn().await;

    let res = app.get_json(routes::INDEX, None).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["template"], "posts/index.html");
    assert!(res.context()["page_obj"].is_object());
}
