use std::time::Duration;

use tracing::debug;

use crate::{AsyncClient, BlockingClient, Config, Result};

/// Entry point to the gateway: one configuration bound to a blocking and an
/// async transport, so either calling convention can be used without
/// authenticating again.
///
/// Both transports are released by [`Client::close`] or when the client goes
/// out of scope, whichever comes first. Calls made after that fail with
/// [`crate::Error::Closed`].
///
/// A client can be built and dropped anywhere, including inside an async
/// runtime. Calls on [`Client::blocking`] still block the current thread, so
/// async code should go through [`Client::concurrent`].
pub struct Client {
    config: Config,
    blocking: BlockingClient,
    concurrent: AsyncClient,
}

impl Client {
    pub fn new(config: Config) -> Result<Self> {
        let blocking = BlockingClient::new(config.clone())?;
        let concurrent = AsyncClient::new(config.clone())?;
        Ok(Self { config, blocking, concurrent })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api_key(&self) -> &str {
        self.config.api_key()
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    /// Thread-blocking calling convention.
    pub fn blocking(&self) -> &BlockingClient {
        &self.blocking
    }

    /// Async calling convention.
    pub fn concurrent(&self) -> &AsyncClient {
        &self.concurrent
    }

    pub fn is_closed(&self) -> bool {
        self.blocking.is_closed() && self.concurrent.is_closed()
    }

    /// Releases both transports. Closing an already closed client is a no-op.
    pub fn close(&mut self) {
        let blocking = self.blocking.close();
        let concurrent = self.concurrent.close();
        if blocking || concurrent {
            debug!(base_url = %self.config.base_url(), "Gateway client closed");
        }
    }
}
