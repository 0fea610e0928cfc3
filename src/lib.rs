pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod processors;
pub mod readers;
pub mod session;
pub mod utils;

pub use config::AtlasConfig;
pub use error::{AtlasError, Result};
pub use session::AtlasSession;
