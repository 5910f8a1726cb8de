use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::database::MongoDB;
use crate::services::skill_service::{self, SkillsCatalogResponse};

const DEFAULT_DEMAND_LIMIT: i64 = 10;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CatalogQuery {
    /// Busca por nome (sem diferenciar maiúsculas)
    pub search: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DemandQuery {
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/skills",
    tag = "Skills",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Skills catalog, most in demand first", body = SkillsCatalogResponse)
    )
)]
pub async fn get_catalog(
    db: web::Data<MongoDB>,
    query: web::Query<CatalogQuery>,
) -> HttpResponse {
    log::info!("📚 GET /skills - search: {:?}", query.search);

    match skill_service::list_catalog(&db, query.search.as_deref(), query.limit).await {
        Ok(skills) => HttpResponse::Ok().json(SkillsCatalogResponse {
            success: true,
            count: skills.len(),
            skills,
        }),
        Err(e) => {
            log::warn!("❌ Failed to list skills catalog: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/skills/demand",
    tag = "Skills",
    params(DemandQuery),
    responses(
        (status = 200, description = "Skills required by the most roles", body = SkillsCatalogResponse)
    )
)]
pub async fn get_demand(
    db: web::Data<MongoDB>,
    query: web::Query<DemandQuery>,
) -> HttpResponse {
    log::info!("📈 GET /skills/demand");

    let limit = query.limit.or(Some(DEFAULT_DEMAND_LIMIT));
    match skill_service::list_catalog(&db, None, limit).await {
        Ok(skills) => HttpResponse::Ok().json(SkillsCatalogResponse {
            success: true,
            count: skills.len(),
            skills,
        }),
        Err(e) => {
            log::warn!("❌ Failed to list in-demand skills: {}", e);
            e.error_response()
        }
    }
}
