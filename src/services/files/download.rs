use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::Path;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::LmsError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{not_found, storage_failure};

/// 按下载令牌读取文件，使用上传时的原始文件名
pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    file_token: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let file = match storage.get_file_by_token(&file_token).await {
        Ok(Some(f)) => f,
        Ok(None) => return Ok(not_found(ErrorCode::FileNotFound, "File not found")),
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "File query failed",
                e,
            ));
        }
    };

    let file_path = Path::new(&AppConfig::get().upload.dir).join(&file.stored_name);

    let buf = match tokio::fs::read(&file_path).await {
        Ok(buf) => buf,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("File {} missing on disk", file.stored_name);
            return Ok(not_found(ErrorCode::FileNotFound, "File not found"));
        }
        Err(e) => {
            tracing::error!("{}", LmsError::file_operation(format!("{e}")));
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            );
        }
    };

    let content_type = if file.file_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        file.file_type
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.original_name),
        ))
        .body(buf))
}
