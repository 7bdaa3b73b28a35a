use actix_web::{http::StatusCode, post, web, HttpResponse};
use signal_llm::SummaryRequest;

use crate::state::AppState;

/// POST /api/summarize - `{ level, text }` to `{ summary }` or `{ error }`
#[post("/api/summarize")]
pub async fn summarize(
    req: web::Json<SummaryRequest>,
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let (status, result) = state.summaries.respond(&req).await;
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    Ok(HttpResponse::build(status).json(result))
}
