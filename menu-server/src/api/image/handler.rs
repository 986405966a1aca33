//! Serves uploaded dish images from the local uploads directory.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
    response::IntoResponse,
};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Reject anything that could escape the images directory.
fn sanitize_filename(filename: &str) -> Result<&str, AppError> {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(AppError::validation("Invalid filename"));
    }
    Ok(filename)
}

/// GET /api/image/:filename
pub async fn serve(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let filename = sanitize_filename(&filename)?;
    let path = state.uploads_dir().join("images").join(filename);

    let data = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::not_found(format!("Image {} not found", filename)))?;

    let mime = mime_guess::from_path(filename).first_or_octet_stream();

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        mime.as_ref()
            .parse()
            .map_err(|_| AppError::internal("Invalid content type"))?,
    );
    // uploads are content-addressed, safe to cache aggressively
    headers.insert(
        header::CACHE_CONTROL,
        "public, max-age=31536000, immutable"
            .parse()
            .map_err(|_| AppError::internal("Invalid cache header"))?,
    );

    Ok((headers, data))
}

#[cfg(test)]
mod tests {
    use super::sanitize_filename;

    #[test]
    fn rejects_path_traversal() {
        assert!(sanitize_filename("photo.jpg").is_ok());
        assert!(sanitize_filename("../secret").is_err());
        assert!(sanitize_filename("a/b.jpg").is_err());
        assert!(sanitize_filename("a\\b.jpg").is_err());
        assert!(sanitize_filename("").is_err());
    }
}
