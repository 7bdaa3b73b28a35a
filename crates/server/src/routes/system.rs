use actix_web::{get, web, HttpResponse};

use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /health
#[get("/health")]
pub async fn health(state: web::Data<std::sync::Arc<AppState>>) -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        summaries_configured: state.summaries.has_credential(),
        articles: state.articles.len(),
    }))
}
