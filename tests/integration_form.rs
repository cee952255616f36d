#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, clippy::clone_on_ref_ptr, unreachable_pub)]
mod common;

use common::{Behavior, TestApp, get_test_config};
use contact_relay::client::{ContactClient, Field, FormController, FormStatus, MSG_ALREADY_SENDING};
use std::time::Duration;

fn fill(form: &mut FormController) {
    form.set_field(Field::Name, "Jane");
    form.set_field(Field::Email, "jane@example.com");
    form.set_field(Field::Message, "Hello");
}

#[tokio::test]
async fn test_form_success_clears_draft_and_dismisses() {
    let app = TestApp::spawn().await;
    let mut form =
        FormController::new(ContactClient::new(&app.server_url)).with_dismiss_after(Duration::from_millis(200));
    fill(&mut form);

    let result = form.submit().await;

    assert!(result.ok);
    assert_eq!(result.message, "Message sent successfully.");
    assert_eq!(form.status(), FormStatus::Success);
    assert!(form.draft().name.is_empty());
    assert!(form.draft().email.is_empty());
    assert!(form.draft().message.is_empty());
    assert_eq!(app.transport.sent().len(), 1);

    let mut rx = form.subscribe();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| *s == FormStatus::Idle)).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_form_validation_blocks_request() {
    let app = TestApp::spawn().await;
    let mut form = FormController::new(ContactClient::new(&app.server_url));
    form.set_field(Field::Name, "Jane");
    form.set_field(Field::Email, "jane@example");
    form.set_field(Field::Message, "Hello");

    let result = form.submit().await;

    assert!(!result.ok);
    assert_eq!(result.message, "Please enter a valid email.");
    assert_eq!(*app.transport.verified.lock().unwrap(), 0);
    assert!(app.transport.sent().is_empty());
}

#[tokio::test]
async fn test_form_surfaces_server_message() {
    let app = TestApp::spawn_with(get_test_config(), Behavior::Refuse).await;
    let mut form = FormController::new(ContactClient::new(&app.server_url));
    fill(&mut form);

    let result = form.submit().await;

    assert!(!result.ok);
    assert_eq!(result.message, "Unable to connect to email server (connection error).");
    assert_eq!(form.status(), FormStatus::Error(result.message.clone()));
    // draft stays so the visitor can resubmit
    assert_eq!(form.draft().name, "Jane");
}

#[tokio::test]
async fn test_form_unreadable_error_body_falls_back() {
    // nothing at this path speaks JSON, so the 404 body cannot be decoded
    let app = TestApp::spawn().await;
    let mut form = FormController::new(ContactClient::new(&format!("{}/missing", app.server_url)));
    fill(&mut form);

    let result = form.submit().await;

    assert!(!result.ok);
    assert_eq!(result.message, "Server error. Try again later.");
}

#[tokio::test]
async fn test_form_network_failure_is_generic() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut form = FormController::new(ContactClient::new(&format!("http://{addr}")));
    fill(&mut form);

    let result = form.submit().await;

    assert!(!result.ok);
    assert_eq!(result.message, "Something went wrong");
    assert_eq!(form.status(), FormStatus::Error("Something went wrong".into()));
}

#[tokio::test]
async fn test_new_submission_cancels_pending_dismiss() {
    let app = TestApp::spawn().await;
    let mut form =
        FormController::new(ContactClient::new(&app.server_url)).with_dismiss_after(Duration::from_millis(300));

    fill(&mut form);
    assert!(form.submit().await.ok);

    fill(&mut form);
    assert!(form.submit().await.ok);
    assert_eq!(app.transport.sent().len(), 2);

    let mut rx = form.subscribe();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| *s == FormStatus::Idle)).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_abandoned_submit_blocks_resubmission() {
    let app = TestApp::spawn_with(get_test_config(), Behavior::Stall(Duration::from_millis(500))).await;
    let mut form = FormController::new(ContactClient::new(&app.server_url));
    fill(&mut form);

    // the view gives up on the first submit while the relay is still stalled
    assert!(tokio::time::timeout(Duration::from_millis(100), form.submit()).await.is_err());
    assert!(form.is_sending());

    let result = form.submit().await;
    assert!(!result.ok);
    assert_eq!(result.message, MSG_ALREADY_SENDING);

    // at most the abandoned request reaches the relay
    tokio::time::sleep(Duration::from_secs(1)).await;
    let sent = app.transport.sent().len();
    assert!(sent <= 1);

    form.reset();
    assert!(form.submit().await.ok);
    assert_eq!(app.transport.sent().len(), sent + 1);
}
