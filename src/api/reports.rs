use actix_web::{http::header, web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::{analysis_service, report_service};
use crate::services::report_service::ReportFormat;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ReportQuery {
    /// txt (padrão), csv ou pdf
    pub format: Option<String>,
}

/// GET /api/v1/reports/{analysis_id} - Baixa a análise como arquivo
#[utoipa::path(
    get,
    path = "/api/v1/reports/{analysis_id}",
    tag = "Reports",
    params(
        ("analysis_id" = String, Path, description = "Saved analysis id"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "Report file (text/plain, text/csv or application/pdf)"),
        (status = 400, description = "Unsupported format"),
        (status = 404, description = "Analysis not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_report(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    query: web::Query<ReportQuery>,
) -> HttpResponse {
    let analysis_id = path.into_inner();
    log::info!(
        "📄 GET /reports/{} - user: {}, format: {:?}",
        analysis_id,
        user.sub,
        query.format
    );

    let format: ReportFormat = match query.format.as_deref().unwrap_or("txt").parse() {
        Ok(format) => format,
        Err(e) => {
            log::warn!("❌ {}", e);
            return e.error_response();
        }
    };

    let analysis = match analysis_service::get_analysis(&db, &user.sub, &analysis_id).await {
        Ok(analysis) => analysis,
        Err(e) => {
            log::warn!("❌ Report for {} unavailable: {}", analysis_id, e);
            return e.error_response();
        }
    };

    let filename = report_service::report_filename(&analysis, format);

    match report_service::render(analysis, format).await {
        Ok(bytes) => {
            log::info!("✅ Report {} rendered ({} bytes)", filename, bytes.len());
            HttpResponse::Ok()
                .content_type(format.content_type())
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
                        filename,
                        urlencoding::encode(&filename)
                    ),
                ))
                .body(bytes)
        }
        Err(e) => {
            log::error!("❌ Failed to render report {}: {}", analysis_id, e);
            e.error_response()
        }
    }
}
