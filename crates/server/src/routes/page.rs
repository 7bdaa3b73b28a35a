use actix_web::{get, http::header, web, HttpResponse};

use crate::page::{render_page, PageContext};
use crate::state::AppState;

/// GET / - newsletter page
#[get("/")]
pub async fn index(state: web::Data<std::sync::Arc<AppState>>) -> actix_web::Result<HttpResponse> {
    let articles = state.articles.latest(state.config.article_limit);
    let summarize_url = state.config.summarize_path();

    let html = render_page(&PageContext {
        articles: &articles,
        summarize_url: &summarize_url,
        subscribe_form_url: &state.config.subscribe_form_url,
        trust_markup: state.config.trust_article_markup,
    })
    .map_err(|e| {
        tracing::error!("Page render failed: {}", e);
        actix_web::error::ErrorInternalServerError(e.public_message())
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// GET {base_path} - redirect to the trailing-slash page
pub async fn index_redirect(state: web::Data<std::sync::Arc<AppState>>) -> HttpResponse {
    HttpResponse::PermanentRedirect()
        .insert_header((header::LOCATION, format!("{}/", state.config.base_path)))
        .finish()
}
