use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::LmsError;
use crate::models::files::{entities::FileRecord, responses::FileUploadResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::system::DynamicConfig;
use crate::services::{bad_request, current_user, storage_failure};
use crate::utils::validate_magic_bytes;

/// 小写带点的扩展名，如 ".pdf"
pub(crate) fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// 去掉客户端带来的路径部分
pub(crate) fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    base.chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect::<String>()
        .trim()
        .to_string()
}

fn upload_failed(message: &str, err: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}", LmsError::file_operation(format!("{message}: {err}")));
    HttpResponse::InternalServerError()
        .json(ApiResponse::error_empty(ErrorCode::FileUploadFailed, message))
}

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user = match current_user(req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 目录来自静态配置，大小与类型限制来自动态配置
    let upload_dir = &AppConfig::get().upload.dir;
    let max_size = DynamicConfig::upload_max_size().await;
    let allowed_types = DynamicConfig::upload_allowed_types().await;

    if !Path::new(upload_dir).exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        return Ok(upload_failed("Failed to create upload directory", e));
    }

    let mut uploaded: Option<FileRecord> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            continue;
        }
        if uploaded.is_some() {
            return Ok(bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }

        let original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(sanitize_file_name)
            .unwrap_or_default();
        let extension = file_extension(&original_name);

        if extension.is_empty() || !allowed_types.iter().any(|t| t.to_lowercase() == extension) {
            return Ok(bad_request(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            ));
        }

        // MIME 只做记录，不参与校验
        let file_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let stored_name = format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
        let file_path = Path::new(upload_dir).join(&stored_name);
        let mut f = match File::create(&file_path) {
            Ok(file) => file,
            Err(e) => return Ok(upload_failed("Failed to create file", e)),
        };

        let mut total_size: usize = 0;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = match chunk {
                Ok(data) => data,
                Err(e) => {
                    let _ = fs::remove_file(&file_path);
                    return Err(e.into());
                }
            };

            // 首个分块校验魔数
            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    let _ = fs::remove_file(&file_path);
                    return Ok(bad_request(
                        ErrorCode::FileTypeNotAllowed,
                        "File content does not match its extension",
                    ));
                }
            }

            total_size += data.len();
            if total_size > max_size {
                let _ = fs::remove_file(&file_path);
                return Ok(bad_request(
                    ErrorCode::FileSizeExceeded,
                    format!("File size exceeds the limit of {max_size} bytes"),
                ));
            }
            if let Err(e) = f.write_all(&data) {
                let _ = fs::remove_file(&file_path);
                return Ok(upload_failed("Failed to write file", e));
            }
        }

        uploaded = Some(FileRecord {
            download_token: Uuid::new_v4().simple().to_string(),
            original_name,
            stored_name,
            file_size: total_size as i64,
            file_type,
            user_id: user.id,
            created_at: chrono::Utc::now(),
        });
    }

    let Some(record) = uploaded else {
        return Ok(bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    };

    let storage = service.get_storage(req)?;
    let stored_path = Path::new(upload_dir).join(&record.stored_name);

    match storage.create_file_record(record).await {
        Ok(file) => {
            tracing::info!(
                "User {} uploaded {} ({} bytes)",
                user.id,
                file.original_name,
                file.file_size
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                FileUploadResponse {
                    download_token: file.download_token,
                    file_name: file.original_name,
                    size: file.file_size,
                    content_type: file.file_type,
                    created_at: file.created_at,
                },
                "File uploaded successfully",
            )))
        }
        Err(e) => {
            let _ = fs::remove_file(&stored_path);
            Ok(storage_failure(
                ErrorCode::FileUploadFailed,
                "Failed to save file record",
                e,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("report.PDF"), ".pdf");
        assert_eq!(file_extension("archive.tar.zip"), ".zip");
        assert_eq!(file_extension("README"), "");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\essay.docx"), "essay.docx");
        assert_eq!(sanitize_file_name("my \"final\".pdf"), "my final.pdf");
    }
}
