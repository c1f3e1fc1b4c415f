//! Renderer configuration with documented constants
//!
//! All tunable numbers of the replay renderer are collected here. A config
//! can be loaded from TOML; every field has a default so a partial file (or
//! no file at all) is valid.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::error::{ReplayError, Result};
use super::types::Rgba8;

/// Configuration for the replay renderer
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    // === BOARD ===
    /// Pixels per tile edge
    ///
    /// Also the edge length of the compositing scratch buffer, so every
    /// flipped or recolored sprite is resampled to one cell.
    pub cell_size: u32,

    // === TIMING ===
    /// Real time (ms) one simulation step takes to play out
    ///
    /// Governs movement interpolation. The zombie frame cycle runs at a
    /// quarter of this, so a four-frame cycle completes exactly once per step.
    pub replay_speed_ms: u64,

    /// Clamp movement interpolation to the target
    ///
    /// When false an item keeps sliding past its target for as long as some
    /// other effect keeps the draw loop alive.
    pub clamp_motion: bool,

    // === HEALTH BARS ===
    /// Health that renders as a full bar
    pub zombie_max_health: f32,

    /// Bar width as a fraction of the cell size
    pub health_bar_ratio: f32,

    /// Bar height in pixels
    pub health_bar_height: f32,

    pub health_bar_background: Rgba8,
    pub health_bar_foreground: Rgba8,

    // === EFFECTS ===
    /// Opacity (0-100) of a dead zombie still playing its death animation
    pub corpse_opacity: u8,

    /// Hue rotation in degrees applied to the sprite of a given entity token
    pub hue_shifts: HashMap<String, f32>,

    // === LABELS ===
    pub label_color: Rgba8,

    /// Integer upscale of the 3x5 label glyphs
    pub label_scale: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            cell_size: 32,
            replay_speed_ms: 500,
            clamp_motion: false,

            zombie_max_health: 100.0,
            health_bar_ratio: 0.8,
            health_bar_height: 4.0,
            health_bar_background: [90, 20, 20, 255],
            health_bar_foreground: [60, 200, 60, 255],

            corpse_opacity: 70,
            hue_shifts: HashMap::new(),

            label_color: [255, 255, 255, 255],
            label_scale: 1,
        }
    }
}

impl RendererConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RendererConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Duration one simulation step plays for
    pub fn replay_speed(&self) -> Duration {
        Duration::from_millis(self.replay_speed_ms)
    }

    /// Interval between animation frames of a sprite cycle
    pub fn frame_interval(&self) -> Duration {
        self.replay_speed() / 4
    }

    /// Full width of a health bar in pixels
    pub fn health_bar_width(&self) -> f32 {
        self.health_bar_ratio * self.cell_size as f32
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(ReplayError::InvalidConfig("cell_size must be positive".into()));
        }

        if self.replay_speed_ms == 0 {
            return Err(ReplayError::InvalidConfig(
                "replay_speed_ms must be positive".into(),
            ));
        }

        if self.zombie_max_health <= 0.0 {
            return Err(ReplayError::InvalidConfig(format!(
                "zombie_max_health ({}) must be positive",
                self.zombie_max_health
            )));
        }

        if self.health_bar_ratio <= 0.0 || self.health_bar_ratio > 1.0 {
            return Err(ReplayError::InvalidConfig(format!(
                "health_bar_ratio ({}) must be in (0, 1]",
                self.health_bar_ratio
            )));
        }

        if self.corpse_opacity > 100 {
            return Err(ReplayError::InvalidConfig(format!(
                "corpse_opacity ({}) must be at most 100",
                self.corpse_opacity
            )));
        }

        if self.label_scale == 0 {
            return Err(ReplayError::InvalidConfig("label_scale must be positive".into()));
        }

        Ok(())
    }
}
