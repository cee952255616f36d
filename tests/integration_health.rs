#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, clippy::clone_on_ref_ptr, unreachable_pub)]
mod common;

use reqwest::StatusCode;

#[tokio::test]
async fn test_health() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.get(format!("{}/health", app.server_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "ok": true }));
}

#[tokio::test]
async fn test_health_ignores_mail_state() {
    let app = common::TestApp::spawn_with(common::get_test_config(), common::Behavior::FailVerify).await;

    let resp = app.client.get(format!("{}/health", app.server_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}
