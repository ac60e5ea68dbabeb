use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use lunaflow_backend::{build_router, store};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_router() -> Router {
    build_router(store::memory())
}

async fn post_auth(app: &Router, body: Value) -> Result<(StatusCode, Value)> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/auth")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
        )
        .await?;

    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok((status, serde_json::from_slice(&bytes)?))
}

async fn register(app: &Router, email: &str, password: &str) -> Result<(StatusCode, Value)> {
    post_auth(app, json!({ "action": "register", "email": email, "password": password })).await
}

async fn save_cycle(app: &Router, email: &str, start: &str, cycle_length: i32, period_duration: i32) -> Result<(StatusCode, Value)> {
    post_auth(
        app,
        json!({
            "action": "update",
            "email": email,
            "cycleData": {
                "lastPeriodStart": start,
                "cycleLength": cycle_length,
                "periodDuration": period_duration
            }
        }),
    )
    .await
}

#[tokio::test]
async fn health_endpoint_is_available() -> Result<()> {
    let response = test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn register_returns_default_profile_without_credential() -> Result<()> {
    let app = test_router();

    let (status, body) = register(&app, "luna@example.com", "s3cret").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "luna@example.com");
    assert_eq!(body["user"]["cycleData"]["lastPeriodStart"], Value::Null);
    assert_eq!(body["user"]["cycleData"]["cycleLength"], 28);
    assert_eq!(body["user"]["cycleData"]["periodDuration"], 5);
    assert_eq!(body["user"]["history"], json!([]));
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body.get("projection").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_register_is_rejected() -> Result<()> {
    let app = test_router();
    register(&app, "luna@example.com", "first").await?;

    let (status, body) = register(&app, "luna@example.com", "second").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");

    let (status, _) = post_auth(
        &app,
        json!({ "action": "login", "email": "luna@example.com", "password": "first" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn login_distinguishes_unknown_account_from_bad_password() -> Result<()> {
    let app = test_router();
    register(&app, "luna@example.com", "s3cret").await?;

    let (status, body) = post_auth(
        &app,
        json!({ "action": "login", "email": "luna@example.com", "password": "nope" }),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, body) = post_auth(
        &app,
        json!({ "action": "login", "email": "ghost@example.com", "password": "s3cret" }),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, body) = post_auth(
        &app,
        json!({ "action": "login", "identifier": "luna@example.com", "secret": "s3cret" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    Ok(())
}

#[tokio::test]
async fn update_projects_and_upserts_history() -> Result<()> {
    let app = test_router();
    register(&app, "luna@example.com", "s3cret").await?;

    let (status, body) = save_cycle(&app, "luna@example.com", "2024-01-01", 28, 5).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["projection"]["nextPeriod"], "2024-01-29");
    assert_eq!(body["projection"]["ovulation"], "2024-01-15");
    assert_eq!(body["projection"]["fertileWindow"], json!({ "start": "2024-01-10", "end": "2024-01-16" }));

    let (_, body) = save_cycle(&app, "luna@example.com", "2024-01-01T00:00:00.000Z", 30, 4).await?;
    assert_eq!(
        body["user"]["history"],
        json!([{ "startDate": "2024-01-01", "cycleLength": 30, "periodDuration": 4 }])
    );

    let (_, body) = save_cycle(&app, "luna@example.com", "2024-02-01", 29, 5).await?;
    let starts: Vec<&str> = body["user"]["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["startDate"].as_str().unwrap())
        .collect();
    assert_eq!(starts, ["2024-02-01", "2024-01-01"]);
    assert_eq!(body["user"]["cycleData"]["lastPeriodStart"], "2024-02-01");
    Ok(())
}

#[tokio::test]
async fn update_of_unknown_account_is_not_found() -> Result<()> {
    let (status, body) = save_cycle(&test_router(), "ghost@example.com", "2024-01-01", 28, 5).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
    Ok(())
}

#[tokio::test]
async fn unknown_action_is_a_bad_request() -> Result<()> {
    let (status, body) = post_auth(&test_router(), json!({ "action": "delete", "email": "a@b.c" })).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid action");
    Ok(())
}

#[tokio::test]
async fn malformed_update_is_rejected_before_touching_the_account() -> Result<()> {
    let app = test_router();
    register(&app, "luna@example.com", "s3cret").await?;
    save_cycle(&app, "luna@example.com", "2024-01-01", 28, 5).await?;

    let (status, body) = save_cycle(&app, "luna@example.com", "someday", 28, 5).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Malformed payload"));

    let (_, body) = post_auth(
        &app,
        json!({ "action": "login", "email": "luna@example.com", "password": "s3cret" }),
    )
    .await?;
    assert_eq!(body["user"]["history"].as_array().unwrap().len(), 1);
    assert_eq!(body["user"]["cycleData"]["lastPeriodStart"], "2024-01-01");
    Ok(())
}

async fn post_raw(app: &Router, content_type: Option<&str>, body: &'static str) -> Result<(StatusCode, Value)> {
    let mut request = Request::builder().method(Method::POST).uri("/api/auth");
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }

    let response = app.clone().oneshot(request.body(Body::from(body))?).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn browser_posts_without_json_content_type_are_accepted() -> Result<()> {
    let app = test_router();
    register(&app, "luna@example.com", "s3cret").await?;

    let update = r#"{"action":"update","email":"luna@example.com","cycleData":{"lastPeriodStart":"2024-01-01","cycleLength":"30","periodDuration":"4"}}"#;

    let (status, body) = post_raw(&app, None, update).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["cycleData"]["cycleLength"], 30);
    assert_eq!(body["user"]["history"][0]["periodDuration"], 4);

    let (status, body) = post_raw(&app, Some("text/plain;charset=UTF-8"), update).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    Ok(())
}

#[tokio::test]
async fn truncated_json_gets_a_structured_error() -> Result<()> {
    let (status, body) = post_raw(&test_router(), Some("application/json"), r#"{"action":"#).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Malformed payload"));

    let (status, body) = post_raw(&test_router(), None, "").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    Ok(())
}
