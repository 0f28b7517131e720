use llmgateway_domain::{ChatCompletionRequest, ChatCompletionResponse, ModelList};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{Config, CHAT_COMPLETIONS_PATH, HEALTH_PATH, MODELS_PATH};
use crate::error::{BoxStream, Error, Result};
use crate::ndjson::ChunkStream;
use crate::utils::{decode, format_http_context};
use crate::Completion;

pub type ChatCompletionStream = BoxStream<ChatCompletionResponse>;

/// Gateway client for callers running inside an async runtime.
///
/// Operations suspend at connect, at the request write and at every body
/// read. Cancelling a call means dropping its future (or its stream), which
/// aborts the transport operation and leaves the client usable.
pub struct AsyncClient {
    config: Config,
    http: Option<reqwest::Client>,
}

impl AsyncClient {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .default_headers(config.headers()?)
            .connect_timeout(config.timeout())
            .read_timeout(config.timeout())
            .build()
            .map_err(|e| Error::transport("Failed to build the async transport", e))?;

        debug!(base_url = %config.base_url(), "Async transport ready");
        Ok(Self { config, http: Some(http) })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.http.is_none()
    }

    /// Releases the transport. Returns `false` when it was already released.
    pub fn close(&mut self) -> bool {
        let released = self.http.take().is_some();
        if released {
            debug!(base_url = %self.config.base_url(), "Released async transport");
        }
        released
    }

    /// `GET /`, returning the decoded health payload as is.
    pub async fn health_check(&self) -> Result<Map<String, Value>> {
        self.get(HEALTH_PATH, "health check").await
    }

    /// `GET /v1/models`.
    pub async fn list_models(&self) -> Result<ModelList> {
        self.get(MODELS_PATH, "model list").await
    }

    /// Sends the request and answers in the shape selected by
    /// `request.stream`.
    pub async fn chat_completions(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<Completion<ChatCompletionStream>> {
        if request.stream {
            self.stream_chat_completion(request)
                .await
                .map(Completion::Stream)
        } else {
            self.send_chat_completion(request)
                .await
                .map(Completion::Response)
        }
    }

    /// Requests a single, complete answer.
    pub async fn send_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let (url, response) = self.post_chat(request.stream(false)).await?;
        let context = format_http_context(Some(response.status()), "POST", &url);
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(&context, e))?;

        decode(&body, "chat completion", &context)
    }

    /// Requests a streamed answer. The status is checked before the returned
    /// stream reads its first line.
    pub async fn stream_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionStream> {
        let (url, response) = self.post_chat(request.stream(true)).await?;
        let context = format_http_context(Some(response.status()), "POST", &url);

        Ok(Box::pin(ChunkStream::new(
            Box::pin(response.bytes_stream()),
            context,
        )))
    }

    fn http(&self) -> Result<&reqwest::Client> {
        self.http.as_ref().ok_or(Error::Closed)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, expected: &str) -> Result<T> {
        let url = self.config.url(path);
        debug!(url = %url, "Fetching {expected}");

        let response = self.send(self.http()?.get(&url), "GET", &url).await?;
        let context = format_http_context(Some(response.status()), "GET", &url);
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(&context, e))?;

        decode(&body, expected, &context)
    }

    async fn post_chat(&self, request: ChatCompletionRequest) -> Result<(String, Response)> {
        let url = self.config.url(CHAT_COMPLETIONS_PATH);
        debug!(
            url = %url,
            model = %request.model,
            message_count = %request.message_count(),
            stream = %request.stream,
            "Connecting Upstream"
        );

        let builder = self.http()?.post(&url).json(&request);
        let response = self.send(builder, "POST", &url).await?;
        Ok((url, response))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        method: &'static str,
        url: &str,
    ) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            debug!(error = %e, url = %url, "Failed to reach Upstream");
            Error::transport(format_http_context(e.status(), method, url), e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.ok();
        debug!(status = %status, url = %url, "Upstream rejected the request");
        Err(Error::Http { status: status.as_u16(), method, url: url.to_string(), body })
    }
}

impl Drop for AsyncClient {
    fn drop(&mut self) {
        self.close();
    }
}
