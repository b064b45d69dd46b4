use std::path::PathBuf;

use anyhow::{Result, bail};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use bytes::Bytes;
use tokio::fs;
use tracing::{info, warn};

use aisle_types::api::StoredObject;

use crate::auth::AppState;
use crate::error::ApiError;

/// Buckets the site reads and writes. Each is a directory under the
/// storage root, open to anyone.
pub const BUCKETS: [&str; 7] = [
    "home",
    "gallery",
    "story",
    "travel",
    "registry",
    "schedule",
    "wedding-party",
];

/// Largest single upload accepted.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Flat per-bucket file storage on local disk.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub async fn new(root: PathBuf) -> Result<Self> {
        for bucket in BUCKETS {
            fs::create_dir_all(root.join(bucket)).await?;
        }
        info!("File storage root: {}", root.display());
        Ok(Self { root })
    }

    pub fn is_bucket(bucket: &str) -> bool {
        BUCKETS.contains(&bucket)
    }

    /// Object names are single path components: no separators, no `..`,
    /// no hidden files.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name.len() <= 255
            && !name.starts_with('.')
            && !name.contains(['/', '\\', '\0'])
    }

    fn object_path(&self, bucket: &str, name: &str) -> Result<PathBuf> {
        if !Self::is_bucket(bucket) {
            bail!("unknown bucket '{}'", bucket);
        }
        if !Self::is_valid_name(name) {
            bail!("invalid object name '{}'", name);
        }
        Ok(self.root.join(bucket).join(name))
    }

    pub async fn put(&self, bucket: &str, name: &str, data: &[u8]) -> Result<u64> {
        let path = self.object_path(bucket, name)?;
        fs::write(&path, data).await?;
        Ok(data.len() as u64)
    }

    pub async fn get(&self, bucket: &str, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.object_path(bucket, name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns false if the object was already gone.
    pub async fn delete(&self, bucket: &str, name: &str) -> Result<bool> {
        let path = self.object_path(bucket, name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted {}/{}", bucket, name);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("{}/{} already gone", bucket, name);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Objects in a bucket, sorted by name.
    pub async fn list(&self, bucket: &str) -> Result<Vec<StoredObject>> {
        if !Self::is_bucket(bucket) {
            bail!("unknown bucket '{}'", bucket);
        }

        let mut entries = fs::read_dir(self.root.join(bucket)).await?;
        let mut objects = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                objects.push(StoredObject {
                    bucket: bucket.to_string(),
                    name: name.to_string(),
                    size: metadata.len(),
                });
            }
        }
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }
}

fn content_type(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("heic") => "image/heic",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn check_bucket(bucket: &str) -> Result<(), ApiError> {
    if Storage::is_bucket(bucket) { Ok(()) } else { Err(ApiError::NotFound) }
}

fn check_object(bucket: &str, name: &str) -> Result<(), ApiError> {
    check_bucket(bucket)?;
    if Storage::is_valid_name(name) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Invalid file name '{}'", name)))
    }
}

/// GET /storage/{bucket}
pub async fn list_objects(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    check_bucket(&bucket)?;
    let objects = state.storage.list(&bucket).await.map_err(ApiError::Load)?;
    Ok(Json(objects))
}

/// PUT /storage/{bucket}/{name}: raw bytes in the body, overwriting.
pub async fn upload_object(
    State(state): State<AppState>,
    Path((bucket, name)): Path<(String, String)>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    check_object(&bucket, &name)?;
    if body.is_empty() {
        return Err(ApiError::BadRequest("Empty upload".into()));
    }

    let size = state
        .storage
        .put(&bucket, &name, &body)
        .await
        .map_err(ApiError::Save)?;

    info!("Stored {}/{} ({} bytes)", bucket, name, size);
    Ok((StatusCode::CREATED, Json(StoredObject { bucket, name, size })))
}

/// GET /storage/{bucket}/{name}
pub async fn download_object(
    State(state): State<AppState>,
    Path((bucket, name)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    check_object(&bucket, &name)?;
    let bytes = state
        .storage
        .get(&bucket, &name)
        .await
        .map_err(ApiError::Load)?
        .ok_or(ApiError::NotFound)?;

    Ok(([(header::CONTENT_TYPE, content_type(&name))], bytes))
}

/// DELETE /storage/{bucket}/{name}
pub async fn delete_object(
    State(state): State<AppState>,
    Path((bucket, name)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    check_object(&bucket, &name)?;
    if state.storage.delete(&bucket, &name).await.map_err(ApiError::Save)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
