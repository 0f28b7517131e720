use std::io::{self, BufReader};

use llmgateway_domain::{ChatCompletionRequest, ChatCompletionResponse, ModelList};
use reqwest::blocking::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{Config, CHAT_COMPLETIONS_PATH, HEALTH_PATH, MODELS_PATH};
use crate::error::{Error, Result};
use crate::ndjson::ChunkIter;
use crate::utils::{decode, format_http_context};
use crate::Completion;

pub type ChatCompletionIter = ChunkIter<BufReader<Response>>;

/// Gateway client that occupies the calling thread for the whole operation.
///
/// Backed by `reqwest::blocking`, so it must not be called from within an
/// async runtime. Use [`crate::AsyncClient`] there.
pub struct BlockingClient {
    config: Config,
    http: Option<reqwest::blocking::Client>,
}

impl BlockingClient {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let headers = config.headers()?;
        let timeout = config.timeout();

        // The transport owns a runtime, which must not start on a thread that
        // is already driving one.
        let http = std::thread::spawn(move || {
            reqwest::blocking::Client::builder()
                .default_headers(headers)
                .connect_timeout(timeout)
                .timeout(timeout)
                .build()
        })
        .join()
        .map_err(|_| {
            Error::transport(
                "Failed to build the blocking transport",
                io::Error::other("builder thread panicked"),
            )
        })?
        .map_err(|e| Error::transport("Failed to build the blocking transport", e))?;

        debug!(base_url = %config.base_url(), "Blocking transport ready");
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
        let Some(http) = self.http.take() else {
            return false;
        };
        release(http);
        debug!(base_url = %self.config.base_url(), "Released blocking transport");
        true
    }

    pub fn health_check(&self) -> Result<Map<String, Value>> {
        self.get(HEALTH_PATH, "health check")
    }

    pub fn list_models(&self) -> Result<ModelList> {
        self.get(MODELS_PATH, "model list")
    }

    pub fn chat_completions(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<Completion<ChatCompletionIter>> {
        if request.stream {
            self.stream_chat_completion(request).map(Completion::Stream)
        } else {
            self.send_chat_completion(request).map(Completion::Response)
        }
    }

    pub fn send_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let (url, response) = self.post_chat(request.stream(false))?;
        let context = format_http_context(Some(response.status()), "POST", &url);
        let body = response
            .bytes()
            .map_err(|e| Error::transport(&context, e))?;

        decode(&body, "chat completion", &context)
    }

    /// Opens a streamed answer. Each call to `next` on the returned iterator
    /// reads from the connection until one more line is available.
    pub fn stream_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionIter> {
        let (url, response) = self.post_chat(request.stream(true))?;
        let context = format_http_context(Some(response.status()), "POST", &url);

        Ok(ChunkIter::new(BufReader::new(response), context))
    }

    fn http(&self) -> Result<&reqwest::blocking::Client> {
        self.http.as_ref().ok_or(Error::Closed)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, expected: &str) -> Result<T> {
        let url = self.config.url(path);
        debug!(url = %url, "Fetching {expected}");

        let response = self.send(self.http()?.get(&url), "GET", &url)?;
        let context = format_http_context(Some(response.status()), "GET", &url);
        let body = response
            .bytes()
            .map_err(|e| Error::transport(&context, e))?;

        decode(&body, expected, &context)
    }

    fn post_chat(&self, request: ChatCompletionRequest) -> Result<(String, Response)> {
        let url = self.config.url(CHAT_COMPLETIONS_PATH);
        debug!(
            url = %url,
            model = %request.model,
            message_count = %request.message_count(),
            stream = %request.stream,
            "Connecting Upstream"
        );

        let builder = self.http()?.post(&url).json(&request);
        let response = self.send(builder, "POST", &url)?;
        Ok((url, response))
    }

    fn send(&self, request: RequestBuilder, method: &'static str, url: &str) -> Result<Response> {
        let response = request.send().map_err(|e| {
            debug!(error = %e, url = %url, "Failed to reach Upstream");
            Error::transport(format_http_context(e.status(), method, url), e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().ok();
        debug!(status = %status, url = %url, "Upstream rejected the request");
        Err(Error::Http { status: status.as_u16(), method, url: url.to_string(), body })
    }
}

/// Shuts the transport down, off the current thread when it belongs to an
/// async runtime.
fn release(http: reqwest::blocking::Client) {
    if tokio::runtime::Handle::try_current().is_err() {
        drop(http);
        return;
    }
    if std::thread::spawn(move || drop(http)).join().is_err() {
        debug!("Blocking transport panicked while shutting down");
    }
}

impl Drop for BlockingClient {
    fn drop(&mut self) {
        self.close();
    }
}
