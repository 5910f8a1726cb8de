use actix_web::{delete, get, post, web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::api::metrics::increment_analysis_count;
use crate::database::MongoDB;
use crate::matching::GapReport;
use crate::middleware::auth::Claims;
use crate::models::{AnalysisListItem, AnalysisResponse};
use crate::services::analysis_service::{
    self, AnalyzeRequest, CompareRequest, RecommendationsRequest, RecommendationsResponse,
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CompareResponse {
    pub success: bool,
    pub report: GapReport,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HistoryResponse {
    pub success: bool,
    pub analyses: Vec<AnalysisListItem>,
    pub count: usize,
    pub total: u64,
}

/// POST /api/v1/compare - Comparação pública, sem login e sem persistência
#[utoipa::path(
    post,
    path = "/api/v1/compare",
    tag = "Analysis",
    request_body = CompareRequest,
    responses(
        (status = 200, description = "Gap report", body = CompareResponse),
        (status = 400, description = "Empty skill list")
    )
)]
pub async fn compare(body: web::Json<CompareRequest>) -> HttpResponse {
    log::info!(
        "⚖️ POST /compare - {} user items vs {} role items",
        body.user_skills.len(),
        body.role_skills.len()
    );

    match analysis_service::compare(&body) {
        Ok(report) => {
            increment_analysis_count();
            log::info!("✅ Compare: {}% ({})", report.match_percentage, report.verdict);
            HttpResponse::Ok().json(CompareResponse { success: true, report })
        }
        Err(e) => {
            log::warn!("❌ Compare failed: {}", e);
            e.error_response()
        }
    }
}

/// POST /api/v1/analysis - Analisa as skills do usuário contra um cargo
#[utoipa::path(
    post,
    path = "/api/v1/analysis",
    tag = "Analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis result", body = AnalysisResponse),
        (status = 400, description = "No role or no skills"),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
#[post("")]
pub async fn analyze(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<AnalyzeRequest>,
) -> HttpResponse {
    log::info!(
        "🧮 POST /analysis - user: {}, role_id: {:?}, role_title: {:?}",
        user.sub,
        body.role_id,
        body.role_title
    );

    match analysis_service::analyze_for_user(&db, &user.sub, &body).await {
        Ok(analysis) => {
            increment_analysis_count();
            log::info!(
                "✅ Analysis for {}: {} {}% ({})",
                user.sub,
                analysis.role_title,
                analysis.match_percentage,
                analysis.verdict
            );
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "analysis": AnalysisResponse::from(analysis)
            }))
        }
        Err(e) => {
            log::warn!("❌ Analysis failed for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

/// POST /api/v1/analysis/recommendations - Cargos ranqueados para o usuário
#[utoipa::path(
    post,
    path = "/api/v1/analysis/recommendations",
    tag = "Analysis",
    request_body = RecommendationsRequest,
    responses(
        (status = 200, description = "Ranked roles", body = RecommendationsResponse),
        (status = 400, description = "No skills")
    ),
    security(("bearer_auth" = []))
)]
#[post("/recommendations")]
pub async fn recommendations(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: Option<web::Json<RecommendationsRequest>>,
) -> HttpResponse {
    log::info!("🏆 POST /analysis/recommendations - user: {}", user.sub);
    let request = body.map(|b| b.into_inner()).unwrap_or_default();

    match analysis_service::recommendations(&db, &user.sub, &request).await {
        Ok(response) => {
            log::info!("✅ {} roles ranked for {}", response.roles.len(), user.sub);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Recommendations failed for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

/// GET /api/v1/analysis - Histórico, mais recentes primeiro
#[utoipa::path(
    get,
    path = "/api/v1/analysis",
    tag = "Analysis",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Analysis history", body = HistoryResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("")]
pub async fn list_history(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    query: web::Query<HistoryQuery>,
) -> HttpResponse {
    match analysis_service::list_history(&db, &user.sub, query.limit, query.offset).await {
        Ok((analyses, total)) => {
            let analyses: Vec<AnalysisListItem> = analyses.into_iter().map(AnalysisListItem::from).collect();
            HttpResponse::Ok().json(HistoryResponse {
                success: true,
                count: analyses.len(),
                analyses,
                total,
            })
        }
        Err(e) => {
            log::warn!("❌ Failed to list history for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/analysis/{id}",
    tag = "Analysis",
    params(("id" = String, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Saved analysis", body = AnalysisResponse),
        (status = 404, description = "Analysis not found")
    ),
    security(("bearer_auth" = []))
)]
#[get("/{id}")]
pub async fn get_analysis(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let analysis_id = path.into_inner();

    match analysis_service::get_analysis(&db, &user.sub, &analysis_id).await {
        Ok(analysis) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "analysis": AnalysisResponse::from(analysis)
        })),
        Err(e) => {
            log::warn!("❌ Failed to get analysis {}: {}", analysis_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/analysis/{id}",
    tag = "Analysis",
    params(("id" = String, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Analysis deleted"),
        (status = 404, description = "Analysis not found")
    ),
    security(("bearer_auth" = []))
)]
#[delete("/{id}")]
pub async fn delete_analysis(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let analysis_id = path.into_inner();
    log::info!("🗑️ DELETE /analysis/{} - user: {}", analysis_id, user.sub);

    match analysis_service::delete_analysis(&db, &user.sub, &analysis_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Analysis deleted"
        })),
        Err(e) => {
            log::warn!("❌ Failed to delete analysis {}: {}", analysis_id, e);
            e.error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_compare_endpoint() {
        let app = test::init_service(App::new().route("/api/v1/compare", web::post().to(compare))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/compare")
            .set_json(serde_json::json!({
                "user_skills": ["Python", "SQL"],
                "role_skills": ["python", "sql", "tableau", "statistics"]
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["report"]["match_percentage"], 50.0);
        assert_eq!(body["report"]["missing_skills"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_compare_rejects_empty_role() {
        let app = test::init_service(App::new().route("/api/v1/compare", web::post().to(compare))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/compare")
            .set_json(serde_json::json!({ "user_skills": ["python"], "role_skills": [] }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
