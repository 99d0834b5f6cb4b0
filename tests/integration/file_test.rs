//! Integration tests for listing, upload, and per-file operations.

mod helpers;

use axum::http::StatusCode;
use uuid::Uuid;

use helpers::{PNG_HEAD, TestApp};

fn png_of_len(len: usize) -> Vec<u8> {
    let mut data = PNG_HEAD.to_vec();
    data.resize(len, 0);
    data
}

#[tokio::test]
async fn test_upload_creates_record_and_blob() {
    let app = TestApp::new().await;

    let node = app.upload_png("user_a", "beach.png", None).await;

    assert_eq!(node.name, "beach.png");
    assert_eq!(node.mime_type, "image/png");
    assert_eq!(node.size_bytes, (PNG_HEAD.len() + 64) as i64);
    assert!(!node.is_folder);
    assert!(!node.is_trash);
    assert!(!node.is_starred);
    assert!(node.parent_id.is_none());
    assert!(node.file_url.is_some());
    assert!(app.blob_exists(&node));

    let listed = app
        .request("GET", "/api/files?userId=user_a", None, Some("user_a"))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let nodes = listed.nodes();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, node.id);
}

#[tokio::test]
async fn test_upload_at_ceiling_is_accepted() {
    let app = TestApp::with_config(|c| c.storage.max_upload_size_bytes = 1024).await;

    let response = app
        .upload("user_a", "edge.png", "image/png", &png_of_len(1024), None)
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.node().size_bytes, 1024);
}

#[tokio::test]
async fn test_upload_over_ceiling_is_rejected_without_side_effects() {
    let app = TestApp::with_config(|c| c.storage.max_upload_size_bytes = 1024).await;

    let response = app
        .upload("user_a", "big.png", "image/png", &png_of_len(1025), None)
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.error_code(), "PAYLOAD_TOO_LARGE");
    assert!(app.store.is_empty().await);
    let leftovers = std::fs::read_dir(app.blobs.path()).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_upload_into_missing_parent_is_invalid_target() {
    let app = TestApp::new().await;
    let missing = Uuid::new_v4().to_string();

    let response = app
        .upload("user_a", "a.png", "image/png", &png_of_len(128), Some(&missing))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_TARGET");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_upload_into_file_or_foreign_folder_is_invalid_target() {
    let app = TestApp::new().await;
    let file = app.upload_png("user_a", "a.png", None).await;
    let foreign = app.create_folder("user_b", "Theirs", None).await;

    for parent in [file.id.to_string(), foreign.id.to_string()] {
        let response = app
            .upload("user_a", "b.png", "image/png", &png_of_len(128), Some(&parent))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), "INVALID_TARGET");
    }
}

#[tokio::test]
async fn test_upload_rejects_non_images() {
    let app = TestApp::new().await;

    let response = app
        .upload("user_a", "notes.txt", "text/plain", b"hello world", None)
        .await;

    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_upload_sniffs_generic_content_type() {
    let app = TestApp::new().await;

    let response = app
        .upload(
            "user_a",
            "camera-roll",
            "application/octet-stream",
            &png_of_len(256),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.node().mime_type, "image/png");
}

#[tokio::test]
async fn test_requests_without_identity_are_unauthorized() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/files", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mismatched_user_id_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/files?userId=user_b", None, Some("user_a"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "AUTHENTICATION");
}

#[tokio::test]
async fn test_foreign_node_reads_as_not_found() {
    let app = TestApp::new().await;
    let node = app.upload_png("user_a", "mine.png", None).await;

    let theirs = app
        .request("GET", &format!("/api/files/{}", node.id), None, Some("user_b"))
        .await;
    let unknown = app
        .request(
            "GET",
            &format!("/api/files/{}", Uuid::new_v4()),
            None,
            Some("user_b"),
        )
        .await;

    assert_eq!(theirs.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(theirs.error_code(), unknown.error_code());
}

#[tokio::test]
async fn test_star_toggle_is_an_involution() {
    let app = TestApp::new().await;
    let node = app.upload_png("user_a", "star.png", None).await;
    let path = format!("/api/files/{}/star", node.id);

    let first = app.request("PATCH", &path, None, Some("user_a")).await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(first.node().is_starred);

    let second = app.request("PATCH", &path, None, Some("user_a")).await;
    assert_eq!(second.status, StatusCode::OK);
    assert!(!second.node().is_starred);
}

#[tokio::test]
async fn test_listing_puts_folders_first_then_names() {
    let app = TestApp::new().await;
    app.upload_png("user_a", "b.png", None).await;
    app.upload_png("user_a", "a.png", None).await;
    app.create_folder("user_a", "Zebra", None).await;

    let response = app.request("GET", "/api/files", None, Some("user_a")).await;

    let names: Vec<String> = response.nodes().into_iter().map(|n| n.name).collect();
    assert_eq!(names, ["Zebra", "a.png", "b.png"]);
}

#[tokio::test]
async fn test_view_filter_and_counts() {
    let app = TestApp::new().await;
    let starred = app.upload_png("user_a", "s.png", None).await;
    let trashed = app.upload_png("user_a", "t.png", None).await;
    app.upload_png("user_a", "plain.png", None).await;
    app.request("PATCH", &format!("/api/files/{}/star", starred.id), None, Some("user_a"))
        .await;
    app.request("PATCH", &format!("/api/files/{}/trash", trashed.id), None, Some("user_a"))
        .await;

    let all = app.request("GET", "/api/files", None, Some("user_a")).await;
    assert_eq!(all.nodes().len(), 3);

    let starred_view = app
        .request("GET", "/api/files?view=starred", None, Some("user_a"))
        .await;
    let ids: Vec<Uuid> = starred_view.nodes().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, [starred.id]);

    let trash_view = app
        .request("GET", "/api/files?view=trash", None, Some("user_a"))
        .await;
    let ids: Vec<Uuid> = trash_view.nodes().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, [trashed.id]);

    let counts = app
        .request("GET", "/api/files/counts?userId=user_a", None, Some("user_a"))
        .await;
    assert_eq!(counts.status, StatusCode::OK);
    assert_eq!(counts.body["all"], 2);
    assert_eq!(counts.body["starred"], 1);
    assert_eq!(counts.body["trash"], 1);

    let bad = app
        .request("GET", "/api/files?view=recent", None, Some("user_a"))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_retrieval_urls_for_files_only() {
    let app = TestApp::new().await;
    let file = app.upload_png("user_a", "view.png", None).await;
    let folder = app.create_folder("user_a", "Album", None).await;

    let urls = app
        .request("GET", &format!("/api/files/{}/urls", file.id), None, Some("user_a"))
        .await;
    assert_eq!(urls.status, StatusCode::OK);
    assert_eq!(urls.body["fileUrl"].as_str(), file.file_url.as_deref());
    assert!(urls.body["viewUrl"].is_string());
    assert!(urls.body["downloadUrl"].is_string());

    let folder_urls = app
        .request("GET", &format!("/api/files/{}/urls", folder.id), None, Some("user_a"))
        .await;
    assert_eq!(folder_urls.status, StatusCode::BAD_REQUEST);
    assert_eq!(folder_urls.error_code(), "INVALID_TARGET");
}

#[tokio::test]
async fn test_uploaded_blob_is_served_back() {
    let app = TestApp::new().await;
    let node = app.upload_png("user_a", "served.png", None).await;

    let response = app
        .request(
            "GET",
            &format!("/blobs/{}", node.path.as_deref().unwrap()),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_backends() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["store"], "memory");
    assert_eq!(response.body["storage"], "local");
}
