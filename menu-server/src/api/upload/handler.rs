//! Dish image upload handler
//!
//! Accepts PNG, JPEG and WebP, re-encodes everything to JPEG and
//! deduplicates identical uploads by content hash.

use axum::Json;
use axum::extract::{Extension, Multipart, State};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::{fs, io::Cursor};
use uuid::Uuid;

use crate::auth::AdminSession;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported input formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for dish photos
const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub url: String,
}

fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Look up an earlier upload with the same content hash.
///
/// The hash index lives under `by_hash/<first two chars>/<hash>` as a
/// symlink pointing back at the stored file.
fn find_file_by_hash(images_dir: &Path, hash: &str) -> Option<String> {
    let prefix = &hash[..2];
    let hash_path = images_dir.join("by_hash").join(prefix).join(hash);

    if hash_path.exists()
        && let Ok(target) = fs::read_link(&hash_path)
    {
        return target.file_name().map(|s| s.to_string_lossy().to_string());
    }
    None
}

fn create_hash_symlink(images_dir: &Path, hash: &str, filename: &str) -> Result<(), AppError> {
    let prefix = &hash[..2];
    let hash_subdir = images_dir.join("by_hash").join(prefix);
    fs::create_dir_all(&hash_subdir)
        .map_err(|e| AppError::internal(format!("Failed to create hash dir: {}", e)))?;

    let hash_path = hash_subdir.join(hash);
    let target_path = PathBuf::from("../../").join(filename);

    symlink::symlink_auto(&target_path, &hash_path)
        .map_err(|e| AppError::internal(format!("Failed to create symlink: {}", e)))?;

    Ok(())
}

/// Re-encode the upload as JPEG.
fn compress_image(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {}", e)))?;
    }

    Ok(buffer)
}

fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext_lower,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    Ok(())
}

/// POST /api/upload - upload a dish image
pub async fn upload(
    State(state): State<ServerState>,
    Extension(session): Extension<AdminSession>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let images_dir = state.uploads_dir().join("images");
    fs::create_dir_all(&images_dir)
        .map_err(|e| AppError::internal(format!("Failed to create images directory: {}", e)))?;

    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;

    while let Some(f) = multipart.next_field().await? {
        let name = f.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            original_filename = f.file_name().map(|s| s.to_string());
            field_data = Some(f.bytes().await?.to_vec());
            break;
        }
    }

    let data = field_data
        .ok_or_else(|| AppError::validation("No 'file' field found. Field name must be 'file'"))?;

    let filename = original_filename
        .ok_or_else(|| AppError::validation("No filename provided in file field"))?;

    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }

    let ext = PathBuf::from(&filename)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_string()))
        .ok_or_else(|| AppError::validation(format!("Invalid file extension for: {}", filename)))?;

    validate_image(&data, &ext)?;

    let compressed_data = compress_image(&data)?;
    let file_hash = calculate_hash(&compressed_data);

    // Deduplicate by hash before writing anything
    if let Some(existing_filename) = find_file_by_hash(&images_dir, &file_hash) {
        tracing::info!(
            original_name = %filename,
            existing_file = %existing_filename,
            "Duplicate image detected, returning existing file"
        );

        let file_id = existing_filename
            .strip_suffix(".jpg")
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let url = format!("/api/image/{}", existing_filename);
        return Ok(Json(UploadResponse {
            file_id,
            filename: existing_filename,
            original_name: filename,
            size: compressed_data.len(),
            url,
        }));
    }

    let file_id = Uuid::new_v4().to_string();
    let new_filename = format!("{}.jpg", file_id);
    let file_path = images_dir.join(&new_filename);

    fs::write(&file_path, &compressed_data)
        .map_err(|e| AppError::internal(format!("Failed to save file: {}", e)))?;

    create_hash_symlink(&images_dir, &file_hash, &new_filename)?;

    tracing::info!(
        admin = %session.username,
        original_name = %filename,
        size = %compressed_data.len(),
        hash = %file_hash,
        "Image uploaded"
    );

    let url = format!("/api/image/{}", new_filename);
    Ok(Json(UploadResponse {
        file_id,
        filename: new_filename,
        original_name: filename,
        size: compressed_data.len(),
        url,
    }))
}
