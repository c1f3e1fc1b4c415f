//! Zombie Replay - animated playback of tile-based zombie combat simulations

pub mod assets;
pub mod board;
pub mod core;
pub mod entity;
pub mod renderer;

pub use crate::assets::{AssetKey, AssetRegistry, AssetTable};
pub use crate::board::{BackgroundGenerator, TileBackground, TileGrid};
pub use crate::core::{GridPos, RendererConfig, ReplayError, Result};
pub use crate::entity::{Entity, EntityKind, ReplayLog, VisualEvent};
pub use crate::renderer::{Renderer, Surface};
