//! HTTP request handlers

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::assets::{SampleAsset, EXCEL_SAMPLE, WORD_SAMPLE};
use crate::error::ApiError;
use crate::state::AppService;
use crate::upload::read_generate_upload;

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Front-end page
pub async fn index(State(service): State<Arc<AppService>>) -> Result<Response, ApiError> {
    serve_static(service.assets_dir(), "index.html", "text/html; charset=utf-8").await
}

/// Front-end script
pub async fn app_js(State(service): State<Arc<AppService>>) -> Result<Response, ApiError> {
    serve_static(service.assets_dir(), "app.js", "application/javascript").await
}

/// Sample workbook download
pub async fn download_excel(State(service): State<Arc<AppService>>) -> Result<Response, ApiError> {
    download_sample(&service, &EXCEL_SAMPLE).await
}

/// Sample template download
pub async fn download_word(State(service): State<Arc<AppService>>) -> Result<Response, ApiError> {
    download_sample(&service, &WORD_SAMPLE).await
}

/// Fill the uploaded template once per workbook row and return the ZIP
pub async fn generate(
    State(service): State<Arc<AppService>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_generate_upload(multipart).await?;

    let archive = tokio::task::spawn_blocking(move || service.generate(&upload))
        .await
        .map_err(|e| ApiError::Internal(format!("Error al procesar: {}", e)))??;

    Ok(attachment(archive, "application/zip", mail_merge::ARCHIVE_NAME))
}

async fn download_sample(service: &AppService, sample: &SampleAsset) -> Result<Response, ApiError> {
    let path = sample
        .locate(&service.work_dir, service.assets_dir())
        .ok_or_else(|| ApiError::NotFound(sample.not_found_message.to_string()))?;

    let data = tokio::fs::read(&path).await.map_err(|e| {
        ApiError::Internal(format!("Error al descargar {}: {}", sample.label, e))
    })?;

    Ok(attachment(data, sample.content_type, sample.download_name))
}

async fn serve_static(dir: &Path, name: &str, content_type: &'static str) -> Result<Response, ApiError> {
    match tokio::fs::read(dir.join(name)).await {
        Ok(data) => Ok(([(header::CONTENT_TYPE, content_type)], data).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::NotFound(format!("{} no encontrado", name)))
        }
        Err(e) => Err(ApiError::Io(e)),
    }
}

/// File download response
fn attachment(data: Vec<u8>, content_type: &str, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        data,
    )
        .into_response()
}
