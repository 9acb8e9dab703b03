//! Login negative scenarios.

mod common;

use comprar::{SubmissionOutcome, TextExpectation};

const BAD_CREDENTIALS: &str =
    r"(?i)Bad credentials! Please try again! Make sure that you've registered\.";

#[tokio::test]
async fn errors_when_both_fields_are_empty() {
    let (_store, page) = common::ecommerce_harness();
    page.visit().await.unwrap();

    let form = page.login_form();
    form.submit().await.unwrap();
    form.verify_error_message(&TextExpectation::pattern(BAD_CREDENTIALS))
        .await
        .unwrap();
}

#[tokio::test]
async fn errors_on_invalid_email_format() {
    let (store, page) = common::ecommerce_harness();
    page.visit().await.unwrap();

    let form = page.login_form();
    form.fill_form("not-an-email", "somepass").await.unwrap();
    form.submit().await.unwrap();
    form.validate_email_popup(&TextExpectation::pattern(r"(?i)missing an '@'"))
        .await
        .unwrap();

    // native validation blocked the submission before any round trip
    assert!(matches!(
        form.submission_outcome().await.unwrap(),
        SubmissionOutcome::ValidationBlocked(_)
    ));
    assert_eq!(store.login_round_trips(), 0);
}

#[tokio::test]
async fn errors_on_missing_password() {
    let (_store, page) = common::ecommerce_harness();
    page.visit().await.unwrap();

    let form = page.login_form();
    form.fill_form("admin@admin.com", " ").await.unwrap();
    form.submit().await.unwrap();
    // substring containment is enough here
    form.verify_error_message(&TextExpectation::literal("Bad credentials"))
        .await
        .unwrap();
}

#[tokio::test]
async fn errors_on_wrong_credentials() {
    let (_store, page) = common::ecommerce_harness();
    page.visit().await.unwrap();

    let form = page.login_form();
    form.fill_form("admin@admin.com", "wrongpassword").await.unwrap();
    form.submit().await.unwrap();
    form.verify_error_message(&TextExpectation::pattern(BAD_CREDENTIALS))
        .await
        .unwrap();

    assert!(matches!(
        form.submission_outcome().await.unwrap(),
        SubmissionOutcome::CredentialsRejected(_)
    ));
}

#[tokio::test]
async fn empty_email_with_space_password_is_rejected_not_ignored() {
    let (store, page) = common::ecommerce_harness();
    page.visit().await.unwrap();

    let form = page.login_form();
    // an empty value leaves the field blank instead of typing ""
    form.fill_form("", " ").await.unwrap();
    form.submit().await.unwrap();

    // never a silent no-op: the application answers with the error
    form.verify_error_message(&TextExpectation::pattern(BAD_CREDENTIALS))
        .await
        .unwrap();
    assert_eq!(store.login_round_trips(), 1);
}
