use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skill Gap Analyzer API",
        version = "1.0.0",
        description = "Compare your skills with job role requirements. \n\n**Authentication:** Most endpoints require JWT Bearer token authentication.\n\n**Features:**\n- Local authentication (email/password)\n- Manual skills and resume upload (PDF, DOCX, TXT)\n- Match percentage, missing skills and suggestions\n- IDF-weighted scoring and ranked role recommendations\n- Report export (TXT, CSV, PDF)\n- Health monitoring and metrics",
        contact(
            name = "CareerBoost AI Team",
            email = "support@careerboost.ai"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::login,
        crate::api::auth::register,
        crate::api::auth::refresh_token,
        crate::api::auth::verify_token,
        crate::api::auth::get_me,
        crate::api::auth::delete_account,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Skills catalog
        crate::api::skills::get_catalog,
        crate::api::skills::get_demand,

        // User skills
        crate::api::user_skills::list_skills,
        crate::api::user_skills::add_skills,
        crate::api::user_skills::update_skill,
        crate::api::user_skills::delete_skill,
        crate::api::user_skills::clear_skills,

        // Roles
        crate::api::roles::list_roles,
        crate::api::roles::list_categories,
        crate::api::roles::get_role,
        crate::api::roles::create_role,
        crate::api::roles::delete_role,

        // Analysis
        crate::api::analysis::compare,
        crate::api::analysis::analyze,
        crate::api::analysis::recommendations,
        crate::api::analysis::list_history,
        crate::api::analysis::get_analysis,
        crate::api::analysis::delete_analysis,

        // Resume
        crate::api::resume::upload,
        crate::api::resume::upload_base64,
        crate::api::resume::parse_text,
        crate::api::resume::ats,

        // Reports
        crate::api::reports::download_report,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::RefreshTokenRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,
            crate::services::auth_service::VerifyTokenResponse,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,

            // Skills
            crate::models::Skill,
            crate::models::Proficiency,
            crate::models::SkillSource,
            crate::models::AddSkillsRequest,
            crate::models::UpdateSkillRequest,
            crate::models::UserSkillResponse,
            crate::services::skill_service::SkillsCatalogResponse,
            crate::services::skill_service::UserSkillsResponse,

            // Roles
            crate::models::CreateRoleRequest,
            crate::models::JobRoleResponse,
            crate::api::roles::RolesResponse,
            crate::api::roles::CategoriesResponse,

            // Analysis
            crate::matching::GapReport,
            crate::matching::RoleMatch,
            crate::matching::Suggestion,
            crate::matching::Priority,
            crate::models::AnalysisResponse,
            crate::models::AnalysisListItem,
            crate::services::analysis_service::CompareRequest,
            crate::services::analysis_service::AnalyzeRequest,
            crate::services::analysis_service::RecommendationsRequest,
            crate::services::analysis_service::RecommendationsResponse,
            crate::api::analysis::CompareResponse,
            crate::api::analysis::HistoryResponse,

            // Resume
            crate::resume::AtsScore,
            crate::resume::SectionPresence,
            crate::resume::DocumentFormat,
            crate::resume::ExtractedSkill,
            crate::resume::ExtractionSource,
            crate::services::resume_service::Base64ResumeRequest,
            crate::services::resume_service::ResumeTextRequest,
            crate::services::resume_service::AtsRequest,
            crate::services::resume_service::ResumeResult,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login, token refresh and account management."),
        (name = "Health", description = "Health check and Prometheus metrics for monitoring service status."),
        (name = "Skills", description = "Skills catalog derived from the job role dataset."),
        (name = "User Skills", description = "Skills declared by the authenticated user (manual or from a resume)."),
        (name = "Roles", description = "Job roles and their required skills. Creating and deleting roles requires the admin role."),
        (name = "Analysis", description = "Skill gap analysis, role recommendations and analysis history."),
        (name = "Resume", description = "Resume upload, skill extraction and ATS-style scoring."),
        (name = "Reports", description = "Export a saved analysis as TXT, CSV or PDF."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/v1/compare"));
        assert!(paths.contains_key("/api/v1/analysis/recommendations"));
        assert!(paths.contains_key("/api/v1/reports/{analysis_id}"));
        assert!(doc
            .components
            .as_ref()
            .map(|c| c.security_schemes.contains_key("bearer_auth"))
            .unwrap_or(false));
    }
}
