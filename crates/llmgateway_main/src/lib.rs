mod cli;
mod log;
mod output;
mod run;

pub use cli::*;
pub use log::*;
pub use run::*;
