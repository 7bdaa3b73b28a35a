use actix_web::{get, web, HttpResponse};

use crate::state::AppState;

/// GET /api/articles - latest articles, newest first
#[get("/api/articles")]
pub async fn list_articles(
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let articles = state.articles.latest(state.config.article_limit);
    Ok(HttpResponse::Ok().json(articles))
}
