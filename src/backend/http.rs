use crate::{
    backend::traits::GenerationBackend,
    config::ClientConfig,
    error::{GenerationError, Result},
    logger,
    models::{ErrorBody, GenerationRequest, GenerationResponse, GenerationResult, HealthStatus},
};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Response, Url,
};
use uuid::Uuid;

/// JSON-over-HTTP backend: `POST <endpoint>` to generate, `GET /health`.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: Url,
    health_url: Url,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let endpoint = config.endpoint_url()?;
        let health_url = endpoint
            .join("/health")
            .map_err(|e| GenerationError::Config(format!("Invalid health URL: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            health_url,
        })
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Turns a non-2xx response into `Server`, preferring the body's
    /// `error` field, then its `message`, over the bare status code.
    async fn server_error(response: Response) -> GenerationError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| format!("Server error: {}", status));

        GenerationError::Server { status, message }
    }
}

#[async_trait]
impl GenerationBackend for HttpBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let request_id = Uuid::new_v4();
        let _timer = logger::timer(&format!("generation {}", request_id));

        log::info!(
            "🎨 [{}] Generating {}x{} image, steps={}",
            request_id,
            request.width(),
            request.height(),
            request.steps()
        );
        log::debug!("[{}] Prompt: {}", request_id, request.prompt());

        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.build_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ [{}] Request to {} failed: {}", request_id, self.endpoint, e);
                GenerationError::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            let err = Self::server_error(response).await;
            log::error!("❌ [{}] {}", request_id, err);
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let parsed: GenerationResponse = serde_json::from_str(&body).map_err(|e| {
            GenerationError::MalformedResponse(format!("Invalid response from server: {}", e))
        })?;

        if let Some(message) = parsed.message.as_deref() {
            log::debug!("[{}] Backend says: {}", request_id, message);
        }
        let result = parsed.into_result()?;
        log::info!("✅ [{}] Image generated", request_id);
        Ok(result)
    }

    async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(self.health_url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::server_error(response).await);
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| GenerationError::MalformedResponse(format!("Invalid health response: {}", e)))
    }
}
