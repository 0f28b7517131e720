use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use llmgateway_client::{
    ChatCompletionRequest, Config, Message, ResponseFormat, ResponseFormatType,
};

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"), about = "Talk to an LLM Gateway from the terminal")]
pub struct Cli {
    /// API key sent as the bearer token.
    ///
    /// Falls back to the LLMGATEWAY_API_KEY environment variable (a `.env`
    /// file in the working directory is read as well).
    #[arg(long)]
    pub api_key: Option<String>,

    /// Base URL of the gateway. Defaults to LLMGATEWAY_BASE_URL or
    /// https://api.llmgateway.io.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Per-request timeout, in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Run the command with the async client instead of the blocking one.
    #[arg(long = "async", default_value_t = false)]
    pub concurrent: bool,

    /// Enable debug logging on stderr.
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Check that the gateway is up.
    Health,

    /// List the models offered by the gateway.
    Models,

    /// Ask the assistant a question.
    Chat(ChatArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ChatArgs {
    /// The user message.
    pub prompt: String,

    #[arg(long, short, default_value = "gpt-3.5-turbo")]
    pub model: String,

    /// System message sent ahead of the prompt.
    #[arg(long, default_value = "You are a helpful assistant.")]
    pub system: String,

    /// Print the answer as it is generated.
    #[arg(long, short, default_value_t = false)]
    pub stream: bool,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Either `text` or `json_object`.
    #[arg(long)]
    pub response_format: Option<ResponseFormatType>,
}

impl Cli {
    /// Builds the client configuration, with flags taking precedence over
    /// the environment.
    pub fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.api_key {
            Some(api_key) => {
                let mut config = Config::new(api_key);
                if let Ok(base_url) = std::env::var(llmgateway_client::BASE_URL_ENV) {
                    config = config.with_base_url(base_url);
                }
                config
            }
            None => Config::from_env().context("Pass --api-key or set LLMGATEWAY_API_KEY")?,
        };

        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        Ok(config)
    }
}

impl ChatArgs {
    pub fn to_request(&self) -> ChatCompletionRequest {
        let mut request = ChatCompletionRequest::new(
            self.model.as_str(),
            vec![Message::system(&self.system), Message::user(&self.prompt)],
        )
        .stream(self.stream);

        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;
        request.response_format = self.response_format.map(ResponseFormat::from);
        request
    }
}
