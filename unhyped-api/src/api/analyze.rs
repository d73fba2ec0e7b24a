//! POST /analyze
//!
//! Multipart upload with an `image` field. Returns the analysis result JSON.

use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::Instrument;
use uuid::Uuid;

use super::mime::sniff_mime;
use crate::error::{ApiError, ApiResult};
use crate::models::AnalysisResult;
use crate::services::ImageInput;
use crate::AppState;

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// Raw upload before encoding
struct Upload {
    bytes: Vec<u8>,
    content_type: Option<String>,
    file_name: Option<String>,
}

/// POST /analyze
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<AnalysisResult>> {
    let Some(pipeline) = state.pipeline.clone() else {
        return Err(ApiError::BadRequest("Missing OPENAI_API_KEY".to_string()));
    };

    // Not multipart at all: same answer as a form without the field
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Rejected non-multipart upload");
        missing_image()
    })?;

    let upload = read_image(multipart, state.max_image_bytes).await?;
    let mime_type = sniff_mime(
        &upload.bytes,
        upload.content_type.as_deref(),
        upload.file_name.as_deref(),
    );
    let image = ImageInput {
        base64: STANDARD.encode(&upload.bytes),
        mime_type,
    };

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("analyze", request_id = %request_id);

    async move {
        tracing::info!(
            bytes = upload.bytes.len(),
            mime_type = %image.mime_type,
            "Analyze request received"
        );

        match pipeline.analyze_image(&image).await {
            Ok(output) => {
                tracing::info!(
                    path = output.path.as_str(),
                    title = %output.result.identified.title,
                    "Analyze request complete"
                );
                Ok(Json(output.result))
            }
            Err(e) => {
                tracing::error!(error = %e, "Analyze request failed");
                *state.last_error.write().await = Some(e.to_string());
                Err(ApiError::from(e))
            }
        }
    }
    .instrument(span)
    .await
}

/// Pull the `image` field out of the multipart body
async fn read_image(mut multipart: Multipart, max_bytes: usize) -> ApiResult<Upload> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        upload = Some(Upload {
            bytes: bytes.to_vec(),
            content_type,
            file_name,
        });
    }

    let upload = upload
        .filter(|u| !u.bytes.is_empty())
        .ok_or_else(missing_image)?;

    if upload.bytes.len() > max_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "Image is {} bytes, limit is {} bytes",
            upload.bytes.len(),
            max_bytes
        )));
    }

    Ok(upload)
}

fn missing_image() -> ApiError {
    ApiError::BadRequest(format!("Missing image file field \"{}\"", IMAGE_FIELD))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

/// Build analyze routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze))
}
