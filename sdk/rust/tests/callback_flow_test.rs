#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

//! Gateway callback to final page, over real HTTP on both sides.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::post,
    Json, Router,
};
use callback_server::{
    app,
    http::{AppState, RedirectTargets},
};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;
use url::Url;
use verification_sdk::{
    HttpOptions, NavigationDelays, Notification, Route, SessionContext, UiStatusState,
    VerificationScreen, Verifier,
};

async fn spawn_verification_backend() -> SocketAddr {
    let router = Router::new()
        .route(
            "/verify",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "status": "SUCCESS", "transactionId": body["txn_id"] }))
            }),
        )
        .route(
            "/down",
            post(|| async {
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "message": "Payment provider unreachable" })),
                )
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Posts a PayU style callback and returns the route the browser lands on.
async fn gateway_callback(path: &str, form: &str) -> Route {
    let public_url = Url::parse("https://fest.example.org").unwrap();
    let response = app::app_router(AppState::new(RedirectTargets::new(public_url)))
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(path)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    Route::parse(location).expect("redirect target is a client route")
}

fn screen(
    endpoint: String,
) -> (
    VerificationScreen,
    mpsc::UnboundedReceiver<Route>,
    mpsc::UnboundedReceiver<Notification>,
) {
    let (navigator, routes) = mpsc::unbounded_channel::<Route>();
    let (notifier, notifications) = mpsc::unbounded_channel::<Notification>();
    let verifier = Verifier::over_http(
        &endpoint,
        HttpOptions::default(),
        SessionContext::hydrated(None),
    )
    .unwrap();
    let screen = VerificationScreen::new(verifier, Arc::new(navigator), Arc::new(notifier))
        .with_delays(NavigationDelays {
            terminal: Duration::from_millis(50),
            error: Duration::from_millis(80),
        });
    (screen, routes, notifications)
}

#[tokio::test]
async fn success_callback_is_verified_and_lands_on_the_success_page() {
    let backend = spawn_verification_backend().await;

    let Route::Verify(txn_id) = gateway_callback(
        "/transaction/success",
        "mihpayid=40399&status=success&txnid=ABC&amount=499.00",
    )
    .await
    else {
        panic!("callback with an id must lead to verification");
    };
    assert_eq!(txn_id.as_str(), "ABC");

    let (mut screen, mut routes, _notifications) = screen(format!("http://{backend}/verify"));
    screen.on_params(Some(txn_id.as_str()));

    let landed = tokio::time::timeout(Duration::from_secs(5), routes.recv())
        .await
        .expect("navigation within the timeout");
    assert_eq!(landed, Some(Route::Success));
    assert_eq!(screen.snapshot().state, UiStatusState::Success);
}

#[tokio::test]
async fn failure_channel_still_trusts_the_verification_authority() {
    let backend = spawn_verification_backend().await;

    let Route::Verify(txn_id) =
        gateway_callback("/transaction/failure", "status=failure&txnid=XYZ").await
    else {
        panic!("callback with an id must lead to verification");
    };
    let (mut screen, mut routes, _notifications) = screen(format!("http://{backend}/verify"));
    screen.on_params(Some(txn_id.as_str()));

    let landed = tokio::time::timeout(Duration::from_secs(5), routes.recv())
        .await
        .unwrap();
    assert_eq!(landed, Some(Route::Success));
}

#[tokio::test]
async fn backend_outage_notifies_and_lands_on_the_pending_page() {
    let backend = spawn_verification_backend().await;
    let (mut screen, mut routes, mut notifications) = screen(format!("http://{backend}/down"));

    screen.on_params(Some("ABC"));

    let landed = tokio::time::timeout(Duration::from_secs(5), routes.recv())
        .await
        .unwrap();
    assert_eq!(landed, Some(Route::Pending));
    assert_eq!(
        notifications.try_recv().unwrap(),
        Notification::Error("Payment provider unreachable".to_string())
    );
    assert_eq!(screen.snapshot().state, UiStatusState::Error);
}

#[tokio::test]
async fn callback_without_id_skips_verification() {
    assert_eq!(
        gateway_callback("/transaction/success", "status=success").await,
        Route::Success
    );
    assert_eq!(
        gateway_callback("/transaction/failure", "").await,
        Route::Failure
    );
}
