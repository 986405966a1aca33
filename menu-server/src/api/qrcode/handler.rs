//! Table QR code generation
//!
//! Produces a QR code image pointing at the menu. Defaults to the
//! configured public URL with the default locale path; a custom target
//! can be passed explicitly.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, header},
    response::IntoResponse,
};
use image::Luma;
use qrcode::QrCode;
use serde::Deserialize;
use std::io::Cursor;

use crate::core::ServerState;
use crate::utils::validation::{MAX_URL_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

const MIN_SIZE: u32 = 64;
const MAX_SIZE: u32 = 2048;
const DEFAULT_SIZE: u32 = 300;

#[derive(Debug, Deserialize)]
pub struct QrParams {
    /// Target URL; defaults to the public menu URL
    pub url: Option<String>,
    /// Output edge length in pixels
    pub size: Option<u32>,
    /// "png" (default) or "svg"
    pub format: Option<String>,
}

/// GET /api/qrcode
pub async fn generate(
    State(state): State<ServerState>,
    Query(params): Query<QrParams>,
) -> AppResult<impl IntoResponse> {
    validate_optional_text(&params.url, "url", MAX_URL_LEN)?;
    let url = params.url.unwrap_or_else(|| {
        format!(
            "{}/{}",
            state.config.base_url.trim_end_matches('/'),
            state.config.default_locale
        )
    });
    let size = params.size.unwrap_or(DEFAULT_SIZE).clamp(MIN_SIZE, MAX_SIZE);
    let format = params.format.as_deref().unwrap_or("png");

    let code = QrCode::new(url.as_bytes())
        .map_err(|e| AppError::validation(format!("Cannot encode URL: {}", e)))?;

    let mut headers = HeaderMap::new();
    let body: Vec<u8> = match format {
        "svg" => {
            let svg = code
                .render::<qrcode::render::svg::Color>()
                .min_dimensions(size, size)
                .build();
            headers.insert(
                header::CONTENT_TYPE,
                "image/svg+xml"
                    .parse()
                    .map_err(|_| AppError::internal("Invalid content type"))?,
            );
            svg.into_bytes()
        }
        "png" => {
            let img = code
                .render::<Luma<u8>>()
                .min_dimensions(size, size)
                .build();
            let mut buffer = Vec::new();
            img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
                .map_err(|e| AppError::internal(format!("PNG encoding failed: {}", e)))?;
            headers.insert(
                header::CONTENT_TYPE,
                "image/png"
                    .parse()
                    .map_err(|_| AppError::internal("Invalid content type"))?,
            );
            buffer
        }
        other => {
            return Err(AppError::validation(format!(
                "Unsupported format '{}'. Supported: png, svg",
                other
            )));
        }
    };

    Ok((headers, body))
}
