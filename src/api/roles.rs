use actix_web::{delete, get, post, web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{CreateRoleRequest, JobRoleResponse};
use crate::services::role_service::{self, RoleQuery};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RolesQuery {
    /// Busca no título
    pub search: Option<String>,
    pub category: Option<String>,
    /// Máximo 200
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RolesResponse {
    pub success: bool,
    pub roles: Vec<JobRoleResponse>,
    pub count: usize,
    pub total: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/roles",
    tag = "Roles",
    params(RolesQuery),
    responses(
        (status = 200, description = "Job roles", body = RolesResponse)
    )
)]
pub async fn list_roles(
    db: web::Data<MongoDB>,
    query: web::Query<RolesQuery>,
) -> HttpResponse {
    let query = query.into_inner();
    log::info!("💼 GET /roles - search: {:?}, category: {:?}", query.search, query.category);

    let role_query = RoleQuery {
        search: query.search,
        category: query.category,
        limit: query.limit,
        offset: query.offset,
    };

    match role_service::list_roles(&db, &role_query).await {
        Ok((roles, total)) => {
            let roles: Vec<JobRoleResponse> = roles.into_iter().map(JobRoleResponse::from).collect();
            HttpResponse::Ok().json(RolesResponse {
                success: true,
                count: roles.len(),
                roles,
                total,
            })
        }
        Err(e) => {
            log::warn!("❌ Failed to list roles: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/roles/categories",
    tag = "Roles",
    responses(
        (status = 200, description = "Distinct role categories", body = CategoriesResponse)
    )
)]
pub async fn list_categories(db: web::Data<MongoDB>) -> HttpResponse {
    match role_service::list_categories(&db).await {
        Ok(categories) => HttpResponse::Ok().json(CategoriesResponse {
            success: true,
            categories,
        }),
        Err(e) => {
            log::warn!("❌ Failed to list categories: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    params(("id" = String, Path, description = "Role id")),
    responses(
        (status = 200, description = "Job role", body = JobRoleResponse),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_role(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let role_id = path.into_inner();

    match role_service::get_role(&db, &role_id).await {
        Ok(role) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "role": JobRoleResponse::from(role)
        })),
        Err(e) => {
            log::warn!("❌ Failed to get role {}: {}", role_id, e);
            e.error_response()
        }
    }
}

/// POST /api/v1/admin/roles - Cria cargo (somente admin)
#[utoipa::path(
    post,
    path = "/api/v1/admin/roles",
    tag = "Roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = JobRoleResponse),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Role already exists"),
        (status = 422, description = "Role has no skills")
    ),
    security(("bearer_auth" = []))
)]
#[post("")]
pub async fn create_role(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<CreateRoleRequest>,
) -> HttpResponse {
    log::info!("➕ POST /admin/roles - user: {}, title: {}", user.sub, body.title);

    if let Err(e) = user.require_admin() {
        log::warn!("🚫 User {} is not an admin", user.sub);
        return e.error_response();
    }

    match role_service::create_role(&db, &body).await {
        Ok(role) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "role": JobRoleResponse::from(role)
        })),
        Err(e) => {
            log::warn!("❌ Failed to create role {}: {}", body.title, e);
            e.error_response()
        }
    }
}

/// DELETE /api/v1/admin/roles/{id} - Remove cargo (somente admin)
#[utoipa::path(
    delete,
    path = "/api/v1/admin/roles/{id}",
    tag = "Roles",
    params(("id" = String, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
#[delete("/{id}")]
pub async fn delete_role(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let role_id = path.into_inner();
    log::info!("🗑️ DELETE /admin/roles/{} - user: {}", role_id, user.sub);

    if let Err(e) = user.require_admin() {
        log::warn!("🚫 User {} is not an admin", user.sub);
        return e.error_response();
    }

    match role_service::delete_role(&db, &role_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Role deleted"
        })),
        Err(e) => {
            log::warn!("❌ Failed to delete role {}: {}", role_id, e);
            e.error_response()
        }
    }
}
