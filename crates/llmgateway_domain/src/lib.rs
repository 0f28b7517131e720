mod chat_request;
mod chat_response;
mod error_response;
mod message;
mod model;
mod provider;

pub use chat_request::*;
pub use chat_response::*;
pub use error_response::*;
pub use message::*;
pub use model::*;
pub use provider::*;
