#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use riskboard::adapter::outbound::sqlite::store::SqliteQuoteStore;
use riskboard::infrastructure::bootstrap::open_store;
use tempfile::TempDir;

/// Temporary on-disk SQLite database, migrated and removed on drop.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
    store: Arc<SqliteQuoteStore>,
}

impl TempDb {
    pub fn create() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("investment_data.db");
        let store = open_store(&path.to_string_lossy()).expect("open sqlite store");
        Self {
            _dir: dir,
            path,
            store: Arc::new(store),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> Arc<SqliteQuoteStore> {
        Arc::clone(&self.store)
    }
}

/// Write `contents` as `config.toml` inside `dir`.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, contents).expect("write temp config");
    path
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("json body")
}
