//! File upload functionality.

mod common;

use comprar::FilePayload;

#[tokio::test]
async fn uploads_a_text_file_successfully() {
    let (_store, page) = common::file_upload_harness();
    page.visit().await.unwrap();

    page.upload_file(FilePayload::text("test-file-a1b2c3.txt", "Test file content"))
        .await
        .unwrap();

    let names = page.attached_file_names().await.unwrap();
    assert_eq!(names, vec!["test-file-a1b2c3.txt"]);
    page.verify_upload_success().await.unwrap();
}

#[tokio::test]
async fn submitting_without_a_file_attaches_nothing() {
    let (_store, page) = common::file_upload_harness();
    page.visit().await.unwrap();

    page.submit_without_file().await.unwrap();

    let names = page.attached_file_names().await.unwrap();
    assert_eq!(names.len(), 0);
}

#[tokio::test]
async fn handles_a_large_file_upload() {
    let (_store, page) = common::file_upload_harness();
    page.visit().await.unwrap();

    let payload = FilePayload::new(
        "test-image-x9y8z7.jpg",
        "image/jpeg",
        vec![0_u8; 512 * 1024],
    );
    page.upload_file(payload).await.unwrap();

    let names = page.attached_file_names().await.unwrap();
    assert_eq!(names, vec!["test-image-x9y8z7.jpg"]);
}
