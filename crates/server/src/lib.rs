//! Signal HTTP Server
//!
//! Actix-web based summarize API and newsletter page

pub mod articles;
pub mod curate;
pub mod export;
pub mod page;
pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpResponse, HttpServer};
use signal_common::{AppConfig, Result};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use articles::{Article, ArticleStore};
pub use curate::{curate, CurateOptions, CurateReport};
pub use export::{export_site, ExportOptions, ExportReport};
pub use state::AppState;

use crate::types::ErrorResponse;

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::summarize::summarize)
        .service(routes::articles::list_articles)
        .service(routes::page::index)
        .service(routes::system::health);
}

/// Mount all routes under `base_path`. A non-empty base path without the
/// trailing slash redirects to the page.
pub fn mount(cfg: &mut web::ServiceConfig, base_path: &str) {
    if !base_path.is_empty() {
        cfg.route(base_path, web::get().to(routes::page::index_redirect));
    }
    cfg.service(web::scope(base_path).configure(configure));
}

/// JSON extractor config: malformed bodies answer `400 { error }`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = ErrorResponse {
            error: err.to_string(),
        };
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
            .into()
    })
}

fn cors(allowed_origin: Option<&str>) -> Cors {
    match allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST"])
            .allowed_header(header::CONTENT_TYPE)
            .max_age(3600),
        None => Cors::default(),
    }
}

/// Run the HTTP server until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let state = Arc::new(AppState::new(config.clone())?);
    let data = web::Data::new(state);

    let bind_addr = config.server_bind_address();
    let base_path = config.base_path.clone();
    let cors_origin = config.cors_allowed_origin.clone();

    if !data.summaries.has_credential() {
        tracing::warn!("OPENAI_API_KEY is not set; summary requests will fail");
    }

    info!(
        "Starting server on http://{}{}/ (model: {})",
        bind_addr,
        base_path,
        data.summaries.model()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(cors(cors_origin.as_deref()))
            .wrap(TracingLogger::default())
            .app_data(data.clone())
            .app_data(json_config())
            .configure(|cfg| mount(cfg, &base_path))
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use async_trait::async_trait;
    use signal_common::SignalError;
    use signal_llm::{LlmClient, ResponsesRequest, ResponsesResponse, SummaryService};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Upstream stand-in keyed on the prompt's final line
    struct ScriptedClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn create_response(
            &self,
            _api_key: &str,
            request: &ResponsesRequest,
        ) -> Result<ResponsesResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match request.input.rsplit('\n').next().unwrap_or_default() {
                "fail" => Err(SignalError::upstream("oops")),
                "offline" => Err(SignalError::transport("error sending request")),
                "missing" => Ok(ResponsesResponse::default()),
                _ => Ok(ResponsesResponse {
                    output_text: Some("  A summary.  ".to_string()),
                }),
            }
        }
    }

    fn state(api_key: Option<&str>, base_path: &str) -> (Arc<AppState>, Arc<ScriptedClient>) {
        let client = Arc::new(ScriptedClient {
            calls: AtomicUsize::new(0),
        });
        let mut config = AppConfig::default();
        config.base_path = base_path.to_string();
        config.openai_api_key = api_key.map(str::to_string);

        let summaries = SummaryService::new(
            client.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        );
        let articles = ArticleStore::embedded().unwrap();
        (
            Arc::new(AppState::with_parts(config, summaries, articles)),
            client,
        )
    }

    macro_rules! app {
        ($state:expr) => {{
            let base_path = $state.config.base_path.clone();
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .app_data(json_config())
                    .configure(|cfg| mount(cfg, &base_path)),
            )
            .await
        }};
    }

    fn summarize_req(body: serde_json::Value) -> test::TestRequest {
        test::TestRequest::post().uri("/api/summarize").set_json(body)
    }

    #[actix_web::test]
    async fn test_summarize_success_is_trimmed() {
        let (state, client) = state(Some("sk-test"), "");
        let app = app!(state);

        let resp = test::call_service(
            &app,
            summarize_req(serde_json::json!({ "level": "Novice", "text": "Hello world" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "summary": "A summary." }));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_summarize_without_key_is_500_and_no_call() {
        let (state, client) = state(None, "");
        let app = app!(state);

        let resp = test::call_service(
            &app,
            summarize_req(serde_json::json!({ "level": "expert", "text": "Hello" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            serde_json::json!({ "error": "Missing OPENAI_API_KEY environment variable" })
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_summarize_upstream_error_is_raw_body() {
        let (state, _client) = state(Some("sk-test"), "");
        let app = app!(state);

        let resp = test::call_service(
            &app,
            summarize_req(serde_json::json!({ "level": "Intermediate", "text": "fail" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "error": "oops" }));
        assert!(body.get("summary").is_none());
    }

    #[actix_web::test]
    async fn test_summarize_transport_error_is_500() {
        let (state, _client) = state(Some("sk-test"), "");
        let app = app!(state);

        let resp = test::call_service(
            &app,
            summarize_req(serde_json::json!({ "level": "Novice", "text": "offline" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "error": "error sending request" }));
    }

    #[actix_web::test]
    async fn test_summarize_missing_output_is_empty_summary() {
        let (state, _client) = state(Some("sk-test"), "");
        let app = app!(state);

        let resp = test::call_service(
            &app,
            summarize_req(serde_json::json!({ "level": "Novice", "text": "missing" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "summary": "" }));
    }

    #[actix_web::test]
    async fn test_summarize_rejects_unknown_level() {
        let (state, client) = state(Some("sk-test"), "");
        let app = app!(state);

        let resp = test::call_service(
            &app,
            summarize_req(serde_json::json!({ "level": "Guru", "text": "Hello" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("Unknown reading level"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_list_articles_latest_first() {
        let (state, _client) = state(None, "");
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/articles").to_request();
        let articles: Vec<Article> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(articles, state.articles.latest(5));
        assert!(articles.len() <= 5);
    }

    #[actix_web::test]
    async fn test_index_page_under_base_path() {
        let (state, _client) = state(None, "/signal");
        let app = app!(state);

        let req = test::TestRequest::get().uri("/signal/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("Signal.ai Newsletter"));
        assert!(html.contains("data-summarize-url=\"/signal/api/summarize\""));

        let req = test::TestRequest::get().uri("/api/articles").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_base_path_without_trailing_slash_redirects() {
        let (state, _client) = state(None, "/signal");
        let app = app!(state);

        let req = test::TestRequest::get().uri("/signal").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/signal/");

        let req = test::TestRequest::get().uri("/signal/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_root_page_without_base_path() {
        let (state, _client) = state(None, "");
        let app = app!(state);

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_health_reports_configuration() {
        let (state, _client) = state(None, "");
        let app = app!(state);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["summaries_configured"], false);
    }
}
