mod async_client;
mod blocking;
mod client;
mod completion;
mod config;
mod error;
mod ndjson;
mod utils;

pub use async_client::*;
pub use blocking::*;
pub use client::*;
pub use completion::*;
pub use config::*;
pub use error::*;
pub use llmgateway_domain::*;
pub use ndjson::{ChunkIter, ChunkStream};
