//! Integration tests for the trash lifecycle and permanent deletion.

mod helpers;

use axum::http::StatusCode;
use uuid::Uuid;

use helpers::TestApp;
use pixvault_entity::FileNode;

/// Builds `Album/{cover.png, Sub/{deep.png}}` for `user_a`.
async fn album(app: &TestApp) -> (FileNode, FileNode, FileNode, FileNode) {
    let album = app.create_folder("user_a", "Album", None).await;
    let album_id = album.id.to_string();
    let cover = app.upload_png("user_a", "cover.png", Some(&album_id)).await;
    let sub = app.create_folder("user_a", "Sub", Some(&album_id)).await;
    let deep = app
        .upload_png("user_a", "deep.png", Some(&sub.id.to_string()))
        .await;
    (album, cover, sub, deep)
}

async fn trash_flag(app: &TestApp, node: &FileNode) -> bool {
    app.stored("user_a", &node.id.to_string())
        .await
        .expect("node should exist")
        .is_trash
}

#[tokio::test]
async fn test_trashing_a_folder_cascades_to_descendants() {
    let app = TestApp::new().await;
    let (album, cover, sub, deep) = album(&app).await;

    let response = app
        .request("PATCH", &format!("/api/files/{}/trash", album.id), None, Some("user_a"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, serde_json::json!({ "isTrash": true }));
    for node in [&album, &cover, &sub, &deep] {
        assert!(trash_flag(&app, node).await, "{} not trashed", node.name);
    }
}

#[tokio::test]
async fn test_restoring_a_folder_cascades_to_descendants() {
    let app = TestApp::new().await;
    let (album, cover, sub, deep) = album(&app).await;
    let path = format!("/api/files/{}/trash", album.id);

    app.request("PATCH", &path, None, Some("user_a")).await;
    let response = app.request("PATCH", &path, None, Some("user_a")).await;

    assert_eq!(response.body["isTrash"], false);
    for node in [&album, &cover, &sub, &deep] {
        assert!(!trash_flag(&app, node).await, "{} still trashed", node.name);
    }
}

#[tokio::test]
async fn test_trashing_a_file_leaves_siblings_alone() {
    let app = TestApp::new().await;
    let (album, cover, sub, _) = album(&app).await;

    app.request("PATCH", &format!("/api/files/{}/trash", cover.id), None, Some("user_a"))
        .await;

    assert!(trash_flag(&app, &cover).await);
    assert!(!trash_flag(&app, &album).await);
    assert!(!trash_flag(&app, &sub).await);
}

#[tokio::test]
async fn test_deleting_a_live_node_is_refused() {
    let app = TestApp::new().await;
    let node = app.upload_png("user_a", "keep.png", None).await;

    let response = app
        .request("DELETE", &format!("/api/files/{}/delete", node.id), None, Some("user_a"))
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "NOT_IN_TRASH");
    assert!(app.stored("user_a", &node.id.to_string()).await.is_some());
    assert!(app.blob_exists(&node));
}

#[tokio::test]
async fn test_deleting_a_trashed_folder_removes_subtree_and_blobs() {
    let app = TestApp::new().await;
    let (album, cover, sub, deep) = album(&app).await;
    let keeper = app.upload_png("user_a", "keeper.png", None).await;

    app.request("PATCH", &format!("/api/files/{}/trash", album.id), None, Some("user_a"))
        .await;
    let response = app
        .request("DELETE", &format!("/api/files/{}/delete", album.id), None, Some("user_a"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, serde_json::json!({ "success": true }));
    for node in [&album, &cover, &sub, &deep] {
        assert!(app.stored("user_a", &node.id.to_string()).await.is_none());
    }
    assert!(!app.blob_exists(&cover));
    assert!(!app.blob_exists(&deep));
    assert!(app.blob_exists(&keeper));

    let again = app
        .request("DELETE", &format!("/api/files/{}/delete", album.id), None, Some("user_a"))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_unknown_node_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/files/{}/delete", Uuid::new_v4()),
            None,
            Some("user_a"),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_trash_purges_only_trashed_nodes_of_the_caller() {
    let app = TestApp::new().await;
    let (album, cover, _, deep) = album(&app).await;
    let loose = app.upload_png("user_a", "loose.png", None).await;
    let live = app.upload_png("user_a", "live.png", None).await;
    let other = app.upload_png("user_b", "other.png", None).await;

    for node in [&album, &loose] {
        app.request("PATCH", &format!("/api/files/{}/trash", node.id), None, Some("user_a"))
            .await;
    }
    app.request("PATCH", &format!("/api/files/{}/trash", other.id), None, Some("user_b"))
        .await;

    let response = app
        .request("DELETE", "/api/files/empty-trash?userId=user_a", None, Some("user_a"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["purgedRoots"], 2);
    assert_eq!(response.body["removedNodes"], 5);
    assert_eq!(response.body["deletedBlobs"], 3);

    for node in [&album, &cover, &deep, &loose] {
        assert!(app.stored("user_a", &node.id.to_string()).await.is_none());
    }
    assert!(app.stored("user_a", &live.id.to_string()).await.is_some());
    assert!(app.stored("user_b", &other.id.to_string()).await.is_some());
    assert!(app.blob_exists(&other));

    let trash = app
        .request("GET", "/api/files?view=trash", None, Some("user_a"))
        .await;
    assert!(trash.nodes().is_empty());
}

#[tokio::test]
async fn test_empty_trash_with_nothing_trashed_succeeds() {
    let app = TestApp::new().await;
    app.upload_png("user_a", "live.png", None).await;

    let response = app
        .request("DELETE", "/api/files/empty-trash", None, Some("user_a"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["purgedRoots"], 0);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_trashed_folder_contents_stay_listed_then_empty_trash_clears_them() {
    let app = TestApp::new().await;
    let a = app.create_folder("user_a", "A", None).await;
    let b = app.create_folder("user_a", "B", Some(&a.id.to_string())).await;
    let mut data = helpers::PNG_HEAD.to_vec();
    data.resize(2000, 0);
    let x = app
        .upload("user_a", "x.png", "image/png", &data, Some(&b.id.to_string()))
        .await
        .node();

    app.request("PATCH", &format!("/api/files/{}/trash", a.id), None, Some("user_a"))
        .await;

    let under_a = app
        .request("GET", &format!("/api/files?parentId={}", a.id), None, Some("user_a"))
        .await
        .nodes();
    assert_eq!(under_a.len(), 1);
    assert_eq!(under_a[0].id, b.id);
    assert!(under_a[0].is_trash);

    let under_b = app
        .request("GET", &format!("/api/files?parentId={}", b.id), None, Some("user_a"))
        .await
        .nodes();
    assert_eq!(under_b.len(), 1);
    assert_eq!(under_b[0].name, "x.png");
    assert!(under_b[0].is_trash);

    app.request("DELETE", "/api/files/empty-trash?userId=user_a", None, Some("user_a"))
        .await;

    let root = app.request("GET", "/api/files", None, Some("user_a")).await;
    assert!(root.nodes().is_empty());
    assert!(!app.blob_exists(&x));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_restored_starred_node_is_starred_again() {
    let app = TestApp::new().await;
    let node = app.upload_png("user_a", "fav.png", None).await;
    app.request("PATCH", &format!("/api/files/{}/star", node.id), None, Some("user_a"))
        .await;
    let trash_path = format!("/api/files/{}/trash", node.id);

    app.request("PATCH", &trash_path, None, Some("user_a")).await;
    let hidden = app
        .request("GET", "/api/files?view=starred", None, Some("user_a"))
        .await;
    assert!(hidden.nodes().is_empty());

    app.request("PATCH", &trash_path, None, Some("user_a")).await;
    let back = app
        .request("GET", "/api/files?view=starred", None, Some("user_a"))
        .await;
    let ids: Vec<Uuid> = back.nodes().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, [node.id]);
}
