mod api;
mod config;
mod database;
mod dataset;
mod matching;
mod middleware;
mod models;
mod resume;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Folga para o base64 (4/3 do arquivo) e os demais campos do JSON
fn json_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes / 3 * 4 + 64 * 1024
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    log::info!("🚀 Starting Skill Gap Analyzer...");
    log::info!("📊 Database: {}", database::redacted_uri(&config.database_url));

    // Initialize MongoDB connection
    let db = match database::MongoDB::new(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    log::info!("✅ MongoDB connected successfully");

    // 🌱 Seed job roles and the skills catalog
    if let Err(e) = seeds::job_roles_seed::seed_job_roles(&db, &config).await {
        log::error!("❌ Failed to seed job roles: {}", e);
        return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }

    let host = config.host.clone();
    let port = config.port;
    let max_upload_bytes = config.max_upload_bytes;
    let db_data = web::Data::new(db);
    let config_data = web::Data::new(config);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = config_data
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .expose_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::CONTENT_DISPOSITION,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(config_data.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .app_data(web::JsonConfig::default().limit(json_limit(max_upload_bytes)))
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Auth endpoints
            .service(
                web::scope("/api/v1/auth")
                    .route("/login", web::post().to(api::auth::login))
                    .route("/register", web::post().to(api::auth::register))
                    .route("/refresh", web::post().to(api::auth::refresh_token))
                    .route("/verify", web::get().to(api::auth::verify_token))
                    .service(
                        web::resource("/me")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::get().to(api::auth::get_me))
                    )
                    .service(
                        web::resource("/delete-account")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::delete().to(api::auth::delete_account))
                    )
            )

            // ==================== CATALOG DATA (public) ====================

            // Skills catalog
            .service(
                web::scope("/api/v1/skills")
                    .route("", web::get().to(api::skills::get_catalog))
                    .route("/demand", web::get().to(api::skills::get_demand))
            )

            // Job roles (READ ONLY)
            .service(
                web::scope("/api/v1/roles")
                    .route("", web::get().to(api::roles::list_roles))
                    .route("/categories", web::get().to(api::roles::list_categories))
                    .route("/{id}", web::get().to(api::roles::get_role))  // DEVE FICAR POR ÚLTIMO (catch-all)
            )

            // Stateless comparison, no account required
            .route("/api/v1/compare", web::post().to(api::analysis::compare))

            // ==================== USER DATA (JWT) ====================

            // Job roles management (admin only)
            .service(
                web::scope("/api/v1/admin/roles")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::roles::create_role)
                    .service(api::roles::delete_role)
            )

            // User skills CRUD
            .service(
                web::scope("/api/v1/user/skills")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::user_skills::list_skills)
                    .service(api::user_skills::add_skills)
                    .service(api::user_skills::clear_skills)
                    .service(api::user_skills::update_skill)
                    .service(api::user_skills::delete_skill)
            )

            // Analysis, recommendations and history
            .service(
                web::scope("/api/v1/analysis")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::analysis::analyze)
                    .service(api::analysis::recommendations)
                    .service(api::analysis::list_history)
                    .service(api::analysis::get_analysis)
                    .service(api::analysis::delete_analysis)
            )

            // Resume upload and ATS scoring
            .service(
                web::scope("/api/v1/resume")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("/upload", web::post().to(api::resume::upload))
                    .route("/upload/base64", web::post().to(api::resume::upload_base64))
                    .route("/text", web::post().to(api::resume::parse_text))
                    .route("/ats", web::post().to(api::resume::ats))
            )

            // Report export
            .service(
                web::scope("/api/v1/reports")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("/{analysis_id}", web::get().to(api::reports::download_report))
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_limit_fits_base64_upload() {
        let max = 5 * 1024 * 1024;
        assert!(json_limit(max) > max / 3 * 4);
    }
}
