use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::common::{TestApp, routes};
use yatube::entity::user;

#[tokio::test]
async fn signup_creates_user_and_logs_in() {
    let app = TestApp::spawn().await;
    let client = app.cookie_client();

    let res = client
        .post(app.url(routes::SIGNUP))
        .form(&[
            ("username", "newcomer"),
            ("password1", "s3cret-passw0rd"),
            ("password2", "s3cret-passw0rd"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 302);
    assert_eq!(res.headers()["location"], "/");
    let saved = user::Entity::find()
        .filter(user::Column::Username.eq("newcomer"))
        .one(&app.db)
        .await
        .unwrap()
        .expect("user should be created");
    assert_ne!(saved.password, "s3cret-passw0rd");

    let res = client.get(app.url(routes::CREATE)).send().await.unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn signup_rejects_taken_username() {
    let app = TestApp::spawn().await;
    app.create_user("taken").await;

    let res = app
        .post_form(
            routes::SIGNUP,
            &[
                ("username", "taken"),
                ("password1", "s3cret-passw0rd"),
                ("password2", "s3cret-passw0rd"),
            ],
            None,
        )
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.template.as_deref(), Some("users/signup.html"));
    assert!(res.text.contains("already exists"));
    assert_eq!(user::Entity::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn login_redirects_to_next() {
    let app = TestApp::spawn().await;
    app.create_user("reader").await;
    let client = app.cookie_client();

    let res = client
        .post(app.url(routes::LOGIN))
        .form(&[
            ("username", "reader"),
            ("password", "test-password"),
            ("next", "/follow/"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 302);
    assert_eq!(res.headers()["location"], "/follow/");

    let res = client.get(app.url(routes::FOLLOW_INDEX)).send().await.unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn login_ignores_external_next() {
    let app = TestApp::spawn().await;
    app.create_user("reader").await;

    let res = app
        .post_form(
            routes::LOGIN,
            &[
                ("username", "reader"),
                ("password", "test-password"),
                ("next", "//evil.example/"),
            ],
            None,
        )
        .await;

    assert_eq!(res.status, 302);
    assert_eq!(res.location.as_deref(), Some("/"));
}

#[tokio::test]
async fn wrong_password_renders_login_again() {
    let app = TestApp::spawn().await;
    app.create_user("reader").await;

    let res = app
        .post_form(
            routes::LOGIN,
            &[("username", "reader"), ("password", "wrong-password")],
            None,
        )
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.template.as_deref(), Some("users/login.html"));
    assert!(res.text.contains("correct username and password"));
}

#[tokio::test]
async fn login_page_carries_next() {
    let app = TestApp::spawn().await;

    let res = app.get_json("/auth/login/?next=/create/", None).await;

    assert_eq!(res.context()["next"], "/create/");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::spawn().await;
    app.create_user("reader").await;
    let client = app.cookie_client();

    client
        .post(app.url(routes::LOGIN))
        .form(&[("username", "reader"), ("password", "test-password")])
        .send()
        .await
        .unwrap();

    let res = client.get(app.url(routes::LOGOUT)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-template"], "users/logged_out.html");

    let res = client.get(app.url(routes::CREATE)).send().await.unwrap();
    assert_eq!(res.status(), 302);
}
