use actix_web::{delete, get, post, put, web, HttpResponse, ResponseError};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{AddSkillsRequest, UpdateSkillRequest, UserSkill, UserSkillResponse};
use crate::services::skill_service::{self, UserSkillsResponse};

fn skills_response(skills: Vec<UserSkill>) -> UserSkillsResponse {
    let skills: Vec<UserSkillResponse> = skills.into_iter().map(UserSkillResponse::from).collect();
    UserSkillsResponse {
        success: true,
        count: skills.len(),
        skills,
    }
}

/// GET /api/v1/user/skills - Skills salvas do usuário
#[utoipa::path(
    get,
    path = "/api/v1/user/skills",
    tag = "User Skills",
    responses(
        (status = 200, description = "User skills", body = UserSkillsResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[get("")]
pub async fn list_skills(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match skill_service::list_user_skills(&db, &user.sub).await {
        Ok(skills) => HttpResponse::Ok().json(skills_response(skills)),
        Err(e) => {
            log::warn!("❌ Failed to list skills for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

/// POST /api/v1/user/skills - Adiciona uma ou várias skills (upsert)
#[utoipa::path(
    post,
    path = "/api/v1/user/skills",
    tag = "User Skills",
    request_body = AddSkillsRequest,
    responses(
        (status = 201, description = "Skills saved", body = UserSkillsResponse),
        (status = 400, description = "No valid skill in the request")
    ),
    security(("bearer_auth" = []))
)]
#[post("")]
pub async fn add_skills(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<AddSkillsRequest>,
) -> HttpResponse {
    log::info!("➕ POST /user/skills - user: {}", user.sub);

    match skill_service::add_user_skills(&db, &user.sub, &body).await {
        Ok(skills) => {
            log::info!("✅ {} skills saved for {}", skills.len(), user.sub);
            HttpResponse::Created().json(skills_response(skills))
        }
        Err(e) => {
            log::warn!("❌ Failed to add skills for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

/// PUT /api/v1/user/skills/{id} - Atualiza proficiência / anos de experiência
#[utoipa::path(
    put,
    path = "/api/v1/user/skills/{id}",
    tag = "User Skills",
    params(("id" = String, Path, description = "User skill id")),
    request_body = UpdateSkillRequest,
    responses(
        (status = 200, description = "Skill updated", body = UserSkillResponse),
        (status = 404, description = "Skill not found")
    ),
    security(("bearer_auth" = []))
)]
#[put("/{id}")]
pub async fn update_skill(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    body: web::Json<UpdateSkillRequest>,
) -> HttpResponse {
    let skill_id = path.into_inner();
    log::info!("✏️ PUT /user/skills/{} - user: {}", skill_id, user.sub);

    match skill_service::update_user_skill(&db, &user.sub, &skill_id, &body).await {
        Ok(skill) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "skill": UserSkillResponse::from(skill)
        })),
        Err(e) => {
            log::warn!("❌ Failed to update skill {}: {}", skill_id, e);
            e.error_response()
        }
    }
}

/// DELETE /api/v1/user/skills/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/user/skills/{id}",
    tag = "User Skills",
    params(("id" = String, Path, description = "User skill id")),
    responses(
        (status = 200, description = "Skill removed"),
        (status = 404, description = "Skill not found")
    ),
    security(("bearer_auth" = []))
)]
#[delete("/{id}")]
pub async fn delete_skill(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let skill_id = path.into_inner();
    log::info!("🗑️ DELETE /user/skills/{} - user: {}", skill_id, user.sub);

    match skill_service::delete_user_skill(&db, &user.sub, &skill_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Skill removed"
        })),
        Err(e) => {
            log::warn!("❌ Failed to delete skill {}: {}", skill_id, e);
            e.error_response()
        }
    }
}

/// DELETE /api/v1/user/skills - Remove todas as skills do usuário
#[utoipa::path(
    delete,
    path = "/api/v1/user/skills",
    tag = "User Skills",
    responses(
        (status = 200, description = "All skills removed")
    ),
    security(("bearer_auth" = []))
)]
#[delete("")]
pub async fn clear_skills(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("🧹 DELETE /user/skills - user: {}", user.sub);

    match skill_service::clear_user_skills(&db, &user.sub).await {
        Ok(deleted) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "deleted": deleted
        })),
        Err(e) => {
            log::warn!("❌ Failed to clear skills for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}
