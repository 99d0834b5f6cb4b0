//! Integration tests for folder creation and hierarchy navigation.

mod helpers;

use axum::http::StatusCode;
use uuid::Uuid;

use helpers::TestApp;
use pixvault_entity::FOLDER_MIME_TYPE;

#[tokio::test]
async fn test_create_folder_at_root() {
    let app = TestApp::new().await;

    let folder = app.create_folder("user_a", "  Holidays ", None).await;

    assert_eq!(folder.name, "Holidays");
    assert!(folder.is_folder);
    assert_eq!(folder.mime_type, FOLDER_MIME_TYPE);
    assert_eq!(folder.size_bytes, 0);
    assert!(folder.path.is_none());
    assert!(folder.file_url.is_none());
    assert!(folder.parent_id.is_none());
}

#[tokio::test]
async fn test_nested_folders_list_under_their_parent() {
    let app = TestApp::new().await;
    let outer = app.create_folder("user_a", "Outer", None).await;
    let outer_id = outer.id.to_string();
    let inner = app.create_folder("user_a", "Inner", Some(&outer_id)).await;
    let photo = app.upload_png("user_a", "inside.png", Some(&outer_id)).await;

    assert_eq!(inner.parent_id, Some(outer.id));
    assert_eq!(photo.parent_id, Some(outer.id));

    let root = app.request("GET", "/api/files", None, Some("user_a")).await;
    let root_ids: Vec<Uuid> = root.nodes().into_iter().map(|n| n.id).collect();
    assert_eq!(root_ids, [outer.id]);

    let children = app
        .request(
            "GET",
            &format!("/api/files?parentId={outer_id}"),
            None,
            Some("user_a"),
        )
        .await;
    let child_ids: Vec<Uuid> = children.nodes().into_iter().map(|n| n.id).collect();
    assert_eq!(child_ids, [inner.id, photo.id]);
}

#[tokio::test]
async fn test_null_parent_means_root() {
    let app = TestApp::new().await;
    app.create_folder("user_a", "Top", None).await;

    let response = app
        .request("GET", "/api/files?parentId=null", None, Some("user_a"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.nodes().len(), 1);
}

#[tokio::test]
async fn test_blank_folder_name_is_rejected() {
    let app = TestApp::new().await;

    for name in ["", "   "] {
        let body = serde_json::json!({ "name": name, "userId": "user_a" });
        let response = app
            .request("POST", "/api/folders/create", Some(body), Some("user_a"))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), "VALIDATION");
    }
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_folder_under_foreign_or_file_parent_is_invalid_target() {
    let app = TestApp::new().await;
    let foreign = app.create_folder("user_b", "Theirs", None).await;
    let file = app.upload_png("user_a", "leaf.png", None).await;

    for parent in [foreign.id, file.id, Uuid::new_v4()] {
        let body = serde_json::json!({
            "name": "Child",
            "userId": "user_a",
            "parentId": parent.to_string(),
        });
        let response = app
            .request("POST", "/api/folders/create", Some(body), Some("user_a"))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), "INVALID_TARGET");
    }
}

#[tokio::test]
async fn test_listing_under_foreign_folder_is_invalid_target() {
    let app = TestApp::new().await;
    let foreign = app.create_folder("user_b", "Theirs", None).await;

    let response = app
        .request(
            "GET",
            &format!("/api/files?parentId={}", foreign.id),
            None,
            Some("user_a"),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_TARGET");
}

#[tokio::test]
async fn test_breadcrumbs_run_from_root_to_node() {
    let app = TestApp::new().await;
    let a = app.create_folder("user_a", "A", None).await;
    let b = app.create_folder("user_a", "B", Some(&a.id.to_string())).await;
    let c = app.create_folder("user_a", "C", Some(&b.id.to_string())).await;

    let response = app
        .request(
            "GET",
            &format!("/api/files/{}/breadcrumbs", c.id),
            None,
            Some("user_a"),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|crumb| crumb["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["A", "B", "C"]);
    assert_eq!(response.body[0]["id"], a.id.to_string());
}

#[tokio::test]
async fn test_malformed_id_is_validation_error() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/files/not-a-uuid", None, Some("user_a"))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}
