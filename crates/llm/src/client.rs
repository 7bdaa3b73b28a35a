use async_trait::async_trait;
use reqwest::Client;
use signal_common::{Result, SignalError};
use tracing::{debug, info, warn};

use crate::llm_trait::LlmClient;
use crate::types::{ResponsesRequest, ResponsesResponse};

/// OpenAI Responses API client
///
/// Sends exactly one request per call. No retries and no client-side
/// timeout beyond the transport defaults.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    client: Client,
}

impl OpenAiClient {
    /// Create new client for the given API base URL (e.g. "https://api.openai.com/v1")
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("OpenAI client initialized: {}", base_url);
        Ok(Self { base_url, client })
    }

    /// Responses endpoint URL
    pub fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn create_response(
        &self,
        api_key: &str,
        request: &ResponsesRequest,
    ) -> Result<ResponsesResponse> {
        let url = self.responses_url();

        debug!(
            "Sending responses request - Model: {}, Prompt length: {}",
            request.model,
            request.input.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| SignalError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| SignalError::transport(e.to_string()))?;
            warn!("LLM API returned {} ({} bytes)", status, body.len());
            return Err(SignalError::upstream(body));
        }

        let result: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| SignalError::serialization(format!("Failed to parse response: {}", e)))?;

        debug!(
            "Received response - Output length: {}",
            result.output_text.as_deref().map(str::len).unwrap_or(0)
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

    /// Fake upstream: the reply is chosen by the prompt text
    async fn fake_responses(req: HttpRequest, body: web::Json<serde_json::Value>) -> HttpResponse {
        let auth = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if auth != "Bearer sk-test" {
            return HttpResponse::Unauthorized().body("bad key");
        }
        if body["model"] != "gpt-4o-mini" {
            return HttpResponse::BadRequest().body("bad model");
        }

        match body["input"].as_str().unwrap_or_default() {
            "fail" => HttpResponse::InternalServerError().body("oops"),
            "missing" => HttpResponse::Ok().json(serde_json::json!({ "id": "resp_1" })),
            "garbage" => HttpResponse::Ok().content_type("application/json").body("not json"),
            _ => HttpResponse::Ok().json(serde_json::json!({ "output_text": "  A summary.  " })),
        }
    }

    fn spawn_upstream() -> String {
        let server = HttpServer::new(|| {
            App::new().route("/v1/responses", web::post().to(fake_responses))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}/v1", addr)
    }

    fn request(input: &str) -> ResponsesRequest {
        ResponsesRequest {
            model: "gpt-4o-mini".to_string(),
            input: input.to_string(),
        }
    }

    #[test]
    fn test_responses_url() {
        let client = OpenAiClient::new("https://api.openai.com/v1/").unwrap();
        assert_eq!(client.responses_url(), "https://api.openai.com/v1/responses");
    }

    #[actix_web::test]
    async fn test_success_returns_output_text() {
        let client = OpenAiClient::new(spawn_upstream()).unwrap();
        let resp = client.create_response("sk-test", &request("hello")).await.unwrap();
        assert_eq!(resp.summary_text(), "A summary.");
    }

    #[actix_web::test]
    async fn test_non_success_status_carries_raw_body() {
        let client = OpenAiClient::new(spawn_upstream()).unwrap();
        let err = client.create_response("sk-test", &request("fail")).await.unwrap_err();
        assert!(matches!(err, SignalError::Upstream(ref body) if body == "oops"));
    }

    #[actix_web::test]
    async fn test_bearer_credential_is_sent() {
        let client = OpenAiClient::new(spawn_upstream()).unwrap();
        let err = client.create_response("sk-wrong", &request("hello")).await.unwrap_err();
        assert_eq!(err.public_message(), "bad key");
    }

    #[actix_web::test]
    async fn test_missing_output_text_is_empty() {
        let client = OpenAiClient::new(spawn_upstream()).unwrap();
        let resp = client.create_response("sk-test", &request("missing")).await.unwrap();
        assert!(resp.output_text.is_none());
        assert_eq!(resp.summary_text(), "");
    }

    #[actix_web::test]
    async fn test_undecodable_body_is_serialization_error() {
        let client = OpenAiClient::new(spawn_upstream()).unwrap();
        let err = client.create_response("sk-test", &request("garbage")).await.unwrap_err();
        assert!(matches!(err, SignalError::Serialization(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[actix_web::test]
    async fn test_unreachable_host_is_transport_error() {
        // Bind then drop a listener so the port is known to be closed
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = OpenAiClient::new(format!("http://127.0.0.1:{}/v1", port)).unwrap();
        let err = client.create_response("sk-test", &request("hello")).await.unwrap_err();
        assert!(matches!(err, SignalError::Transport(_)));
        assert!(!err.public_message().is_empty());
    }
}
