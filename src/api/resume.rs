use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::api::metrics::increment_resume_count;
use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::resume::{AtsScore, DocumentFormat};
use crate::services::resume_service::{
    self, AtsRequest, Base64ResumeRequest, ResumeOptions, ResumeResult, ResumeTextRequest,
};
use crate::utils::AppError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UploadQuery {
    /// Nome original do arquivo (a extensão ajuda a detectar o formato)
    pub filename: Option<String>,
    /// Grava as skills encontradas no perfil (padrão: false)
    pub save: Option<bool>,
    pub role_id: Option<String>,
}

fn respond(user_id: &str, result: Result<ResumeResult, AppError>) -> HttpResponse {
    match result {
        Ok(result) => {
            increment_resume_count();
            log::info!(
                "✅ Resume processed for {}: {} skills, {} saved, ATS {}",
                user_id,
                result.skills.len(),
                result.saved_count,
                result.ats.score
            );
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            log::warn!("❌ Resume processing failed for {}: {}", user_id, e);
            e.error_response()
        }
    }
}

/// POST /api/v1/resume/upload - Corpo cru (PDF, DOCX ou TXT)
#[utoipa::path(
    post,
    path = "/api/v1/resume/upload",
    tag = "Resume",
    params(UploadQuery),
    request_body(content = Vec<u8>, description = "Raw file bytes", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Extracted skills and ATS score", body = ResumeResult),
        (status = 400, description = "Empty file"),
        (status = 413, description = "File too large"),
        (status = 422, description = "Unsupported or unreadable document")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> HttpResponse {
    log::info!(
        "📤 POST /resume/upload - user: {}, file: {:?}, {} bytes",
        user.sub,
        query.filename,
        body.len()
    );

    let options = ResumeOptions {
        save: query.save.unwrap_or(false),
        role_id: query.role_id.clone(),
    };
    let result =
        resume_service::process_upload(&db, &user.sub, query.filename.as_deref(), body.to_vec(), &options).await;

    respond(&user.sub, result)
}

/// POST /api/v1/resume/upload/base64 - Arquivo em base64 dentro de JSON
#[utoipa::path(
    post,
    path = "/api/v1/resume/upload/base64",
    tag = "Resume",
    request_body = Base64ResumeRequest,
    responses(
        (status = 200, description = "Extracted skills and ATS score", body = ResumeResult),
        (status = 400, description = "Invalid base64 or empty file"),
        (status = 422, description = "Unsupported or unreadable document")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_base64(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<Base64ResumeRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    log::info!("📤 POST /resume/upload/base64 - user: {}, file: {:?}", user.sub, request.filename);

    let bytes = match resume_service::decode_base64(&request.content_base64) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("❌ Invalid base64 upload from {}: {}", user.sub, e);
            return e.error_response();
        }
    };

    let options = ResumeOptions {
        save: request.save.unwrap_or(false),
        role_id: request.role_id,
    };
    let result =
        resume_service::process_upload(&db, &user.sub, request.filename.as_deref(), bytes, &options).await;

    respond(&user.sub, result)
}

/// POST /api/v1/resume/text - Currículo colado como texto
#[utoipa::path(
    post,
    path = "/api/v1/resume/text",
    tag = "Resume",
    request_body = ResumeTextRequest,
    responses(
        (status = 200, description = "Extracted skills and ATS score", body = ResumeResult),
        (status = 400, description = "Empty text")
    ),
    security(("bearer_auth" = []))
)]
pub async fn parse_text(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<ResumeTextRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    log::info!("📝 POST /resume/text - user: {}, {} chars", user.sub, request.text.len());

    let options = ResumeOptions {
        save: request.save.unwrap_or(false),
        role_id: request.role_id,
    };
    let result =
        resume_service::process_text(&db, &user.sub, DocumentFormat::Text, &request.text, &options).await;

    respond(&user.sub, result)
}

/// POST /api/v1/resume/ats - Só a pontuação ATS
#[utoipa::path(
    post,
    path = "/api/v1/resume/ats",
    tag = "Resume",
    request_body = AtsRequest,
    responses(
        (status = 200, description = "ATS score", body = AtsScore),
        (status = 400, description = "Empty text"),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn ats(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<AtsRequest>,
) -> HttpResponse {
    log::info!("📊 POST /resume/ats - user: {}, role_id: {:?}", user.sub, body.role_id);

    match resume_service::ats_for_text(&db, &body).await {
        Ok(score) => {
            log::info!("✅ ATS score for {}: {}", user.sub, score.score);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "ats": score
            }))
        }
        Err(e) => {
            log::warn!("❌ ATS scoring failed for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}
