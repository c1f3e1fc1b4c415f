use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Renderer used before initialize() completed")]
    NotInitialized,

    #[error("Asset registry closed before it became ready")]
    AssetsClosed,

    #[error("Asset table was already published")]
    AlreadyPublished,

    #[error("Required asset missing: {0}")]
    MissingAsset(String),

    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Background generation failed: {0}")]
    Background(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ReplayError>;
