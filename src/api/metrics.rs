use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static ANALYSIS_COUNT: AtomicU64 = AtomicU64::new(0);
static RESUME_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Comparações e análises concluídas (públicas ou autenticadas)
pub fn increment_analysis_count() {
    ANALYSIS_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_resume_count() {
    RESUME_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub skill_analyses_total: u64,
    pub resumes_parsed_total: u64,
}

impl MetricsResponse {
    pub fn snapshot() -> Self {
        MetricsResponse {
            http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
            http_errors_total: ERROR_COUNT.load(Ordering::Relaxed),
            skill_analyses_total: ANALYSIS_COUNT.load(Ordering::Relaxed),
            resumes_parsed_total: RESUME_COUNT.load(Ordering::Relaxed),
        }
    }

    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP http_requests_total Total number of HTTP requests\n\
             # TYPE http_requests_total counter\n\
             http_requests_total {}\n\
             \n\
             # HELP http_errors_total Total number of HTTP errors\n\
             # TYPE http_errors_total counter\n\
             http_errors_total {}\n\
             \n\
             # HELP skill_analyses_total Total number of skill gap analyses\n\
             # TYPE skill_analyses_total counter\n\
             skill_analyses_total {}\n\
             \n\
             # HELP resumes_parsed_total Total number of resumes parsed\n\
             # TYPE resumes_parsed_total counter\n\
             resumes_parsed_total {}\n",
            self.http_requests_total,
            self.http_errors_total,
            self.skill_analyses_total,
            self.resumes_parsed_total
        )
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus metrics", body = String, content_type = "text/plain")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(MetricsResponse::snapshot().to_prometheus())
}
