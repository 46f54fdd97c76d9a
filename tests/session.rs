use axum::http::StatusCode;
use quickticket::{auth::TOKEN_TTL_SECS, template::SERVER_ERROR_MESSAGE};

mod helpers;

use helpers::{body_string, location, session_cookie, set_cookie_headers};

#[tokio::test]
async fn test_anonymous_navbar() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;

    let html = body_string(app.get("/", None).await?).await?;

    assert!(html.contains("href=\"/login\""));
    assert!(html.contains("href=\"/register\""));
    assert!(!html.contains("My Tickets"));
    assert!(!html.contains("Submit a Ticket"));

    Ok(())
}

#[tokio::test]
async fn test_register_starts_session() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;

    let res = app
        .post_form(
            "/register",
            &[
                ("name", "john.doe"),
                ("email", "john.doe@quickticket.localhost"),
                ("password", "my_password"),
            ],
            None,
        )
        .await?;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some("/tickets"));

    let headers = set_cookie_headers(&res);
    assert_eq!(headers.len(), 1);
    let cookie = &headers[0];
    assert!(cookie.starts_with("auth-token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=604800"));
    assert!(!cookie.contains("Secure"));

    let cookie = session_cookie(&res).expect("session cookie");
    let html = body_string(app.get("/", Some(&cookie)).await?).await?;

    assert!(html.contains("My Tickets"));
    assert!(html.contains("Submit a Ticket"));
    assert!(html.contains("action=\"/logout\""));
    assert!(html.contains("john.doe"));
    assert!(!html.contains("href=\"/login\""));

    Ok(())
}

#[tokio::test]
async fn test_register_errors() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    app.register("john.doe").await?;

    let res = app
        .post_form(
            "/register",
            &[
                ("name", "john.doe"),
                ("email", "john.doe@quickticket.localhost"),
                ("password", "my_password"),
            ],
            None,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(session_cookie(&res).is_none());
    assert!(body_string(res).await?.contains("User already exists"));

    let res = app
        .post_form("/register", &[("name", "jane.doe")], None)
        .await?;
    assert!(session_cookie(&res).is_none());
    assert!(body_string(res).await?.contains("All fields are required"));

    Ok(())
}

#[tokio::test]
async fn test_login() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    app.register("john.doe").await?;

    let res = app
        .post_form(
            "/login",
            &[
                ("email", "john.doe@quickticket.localhost"),
                ("password", "my_password"),
            ],
            None,
        )
        .await?;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some("/tickets"));

    let cookie = session_cookie(&res).expect("session cookie");
    let html = body_string(app.get("/tickets", Some(&cookie)).await?).await?;
    assert!(html.contains("You have not submitted any ticket yet"));

    Ok(())
}

#[tokio::test]
async fn test_login_failures_share_one_message() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    app.register("john.doe").await?;

    for (email, password) in [
        ("john.doe@quickticket.localhost", "wrong_password"),
        ("nobody@quickticket.localhost", "my_password"),
    ] {
        let res = app
            .post_form("/login", &[("email", email), ("password", password)], None)
            .await?;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(set_cookie_headers(&res).is_empty());
        assert!(body_string(res).await?.contains("Invalid credentials"));
    }

    let res = app.post_form("/login", &[("email", "")], None).await?;
    assert!(body_string(res).await?.contains("All fields are required"));

    Ok(())
}

#[tokio::test]
async fn test_logout_removes_cookie() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    let cookie = app.register("john.doe").await?;

    let res = app.post_form("/logout", &[], Some(&cookie)).await?;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some("/"));

    let headers = set_cookie_headers(&res);
    assert_eq!(headers.len(), 1);
    assert!(headers[0].starts_with("auth-token=;"));
    assert!(headers[0].contains("Max-Age=0"));
    assert!(headers[0].contains("Path=/"));
    assert!(session_cookie(&res).is_none());

    Ok(())
}

#[tokio::test]
async fn test_invalid_token_is_anonymous() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    let cookie = app.register("john.doe").await?;

    let mut tampered = cookie.into_bytes();
    let last = tampered.len() - 2;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered)?;

    for cookie in [tampered.as_str(), "auth-token=garbage", "auth-token="] {
        let html = body_string(app.get("/", Some(cookie)).await?).await?;
        assert!(html.contains("href=\"/login\""));
        assert!(!html.contains("My Tickets"));
    }

    Ok(())
}

#[tokio::test]
async fn test_expired_session_is_anonymous() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    let cookie = app.register("john.doe").await?;

    app.clock.advance(TOKEN_TTL_SECS - 1);
    let html = body_string(app.get("/", Some(&cookie)).await?).await?;
    assert!(html.contains("My Tickets"));

    app.clock.advance(1);
    let html = body_string(app.get("/", Some(&cookie)).await?).await?;
    assert!(!html.contains("My Tickets"));

    let res = app.get("/tickets/new", Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some("/login"));

    Ok(())
}

#[tokio::test]
async fn test_deleted_user_is_anonymous() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    let cookie = app.register("john.doe").await?;
    let id = app.user_id("john.doe").await?;

    sqlx::query(r#"DELETE FROM "user" WHERE id = ?"#)
        .bind(&id)
        .execute(&app.state.pool)
        .await?;

    let html = body_string(app.get("/", Some(&cookie)).await?).await?;
    assert!(html.contains("href=\"/login\""));
    assert!(!html.contains("My Tickets"));

    Ok(())
}

#[tokio::test]
async fn test_protected_page_redirects_to_login() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;

    let res = app.get("/tickets/new", None).await?;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some("/login"));

    Ok(())
}

#[tokio::test]
async fn test_signed_in_user_skips_login_page() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    let cookie = app.register("john.doe").await?;

    for uri in ["/login", "/register"] {
        let res = app.get(uri, Some(&cookie)).await?;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res).as_deref(), Some("/tickets"));
    }

    Ok(())
}

#[tokio::test]
async fn test_login_fails_when_cookie_is_required_but_refused() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    app.register("john.doe").await?;
    let app = app.map_authenticator(|auth| {
        auth.with_cookie_size_limit(32)
            .with_require_cookie_on_login(true)
    });

    let res = app
        .post_form(
            "/login",
            &[
                ("email", "john.doe@quickticket.localhost"),
                ("password", "my_password"),
            ],
            None,
        )
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(set_cookie_headers(&res).is_empty());
    assert!(body_string(res).await?.contains(SERVER_ERROR_MESSAGE));

    Ok(())
}

#[tokio::test]
async fn test_login_continues_when_cookie_is_refused() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    app.register("john.doe").await?;
    let app = app.map_authenticator(|auth| auth.with_cookie_size_limit(32));

    let res = app
        .post_form(
            "/login",
            &[
                ("email", "john.doe@quickticket.localhost"),
                ("password", "my_password"),
            ],
            None,
        )
        .await?;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some("/tickets"));
    assert!(set_cookie_headers(&res).is_empty());

    Ok(())
}
