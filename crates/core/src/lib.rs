pub mod config;
pub mod context;
pub mod error;
pub mod types;

pub use config::parse_blog_toml;
pub use context::Context;
pub use error::{Error, Result};
pub use types::*;
