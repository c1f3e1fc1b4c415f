pub mod config;
pub mod error;
pub mod types;

pub use config::RendererConfig;
pub use error::{ReplayError, Result};
pub use types::{GridPos, Rgba8};
