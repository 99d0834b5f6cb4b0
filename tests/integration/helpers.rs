//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use pixvault_api::{AppState, build_router};
use pixvault_core::config::AppConfig;
use pixvault_database::{MemoryNodeStore, NodeStore};
use pixvault_entity::FileNode;

/// Multipart boundary used by [`TestApp::upload`].
const BOUNDARY: &str = "pixvault-test-boundary";

/// Smallest byte sequence `image::guess_format` recognises as PNG.
pub const PNG_HEAD: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Entity store shared with the router
    pub store: Arc<MemoryNodeStore>,
    /// Blob root; removed when the app is dropped
    pub blobs: TempDir,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application over an in-memory store and a temp dir.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting the default config.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let blobs = tempfile::tempdir().expect("Failed to create blob dir");

        let mut config = AppConfig::default();
        config.storage.local.root_path = blobs.path().to_string_lossy().into_owned();
        adjust(&mut config);

        let store = Arc::new(MemoryNodeStore::new());
        let storage = pixvault_storage::build_provider(&config.storage)
            .await
            .expect("Failed to init storage");

        let shared: Arc<dyn NodeStore> = store.clone();
        let router = build_router(AppState::new(config.clone(), shared, storage));

        Self {
            router,
            store,
            blobs,
            config,
        }
    }

    /// Make a JSON request to the test app as `user`.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(user) = user {
            req = req.header("x-user-id", user);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload `data` as a multipart `file` field.
    pub async fn upload(
        &self,
        user: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
        parent_id: Option<&str>,
    ) -> TestResponse {
        let mut body = Vec::with_capacity(data.len() + 512);
        push_text_field(&mut body, "userId", user);
        if let Some(parent_id) = parent_id {
            push_text_field(&mut body, "parentId", parent_id);
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/files/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("x-user-id", user)
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload a small PNG and return its record.
    pub async fn upload_png(&self, user: &str, file_name: &str, parent_id: Option<&str>) -> FileNode {
        let mut data = PNG_HEAD.to_vec();
        data.extend_from_slice(&[0u8; 64]);
        let response = self
            .upload(user, file_name, "image/png", &data, parent_id)
            .await;
        assert_eq!(response.status, StatusCode::OK, "Upload failed: {:?}", response.body);
        response.node()
    }

    /// Create a folder and return its record.
    pub async fn create_folder(&self, user: &str, name: &str, parent_id: Option<&str>) -> FileNode {
        let body = serde_json::json!({
            "name": name,
            "userId": user,
            "parentId": parent_id,
        });
        let response = self
            .request("POST", "/api/folders/create", Some(body), Some(user))
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Folder creation failed: {:?}",
            response.body
        );
        response.node()
    }

    /// Fetch a node straight from the store, bypassing HTTP.
    pub async fn stored(&self, user: &str, id: &str) -> Option<FileNode> {
        let owner = user.parse().expect("valid owner");
        let id = id.parse().expect("valid id");
        self.store.get(&owner, id).await.ok()
    }

    /// Whether a blob exists under the local root.
    pub fn blob_exists(&self, node: &FileNode) -> bool {
        node.path
            .as_deref()
            .map(|path| self.blobs.path().join(path).exists())
            .unwrap_or(false)
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

fn push_text_field(body: &mut Vec<u8>, name: &str, value: &str) {
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
            .as_bytes(),
    );
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Decode the body as a single node.
    pub fn node(&self) -> FileNode {
        serde_json::from_value(self.body.clone()).expect("Body is not a FileNode")
    }

    /// Decode the body as a node list.
    pub fn nodes(&self) -> Vec<FileNode> {
        serde_json::from_value(self.body.clone()).expect("Body is not a FileNode list")
    }

    /// The `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}
