//! Drawable items: what one paint step puts on the surface.

use glam::Vec2;

use super::effect::{Effect, FrameCycle, Motion};
use crate::assets::ImageHandle;
use crate::core::types::Rgba8;

/// What an item paints.
#[derive(Debug, Clone)]
pub enum Source {
    Color(Rgba8),
    Image(ImageHandle),
}

/// A renderable source with pixel geometry and attached effects.
#[derive(Debug, Clone)]
pub struct DrawableItem {
    pub source: Source,
    /// Position at registration; motion interpolates away from it.
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub label: Option<String>,
    pub effects: Vec<Effect>,
}

impl DrawableItem {
    pub fn new(source: Source, position: Vec2, width: f32, height: f32) -> Self {
        Self {
            source,
            position,
            width,
            height,
            label: None,
            effects: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn motion(&self) -> Option<&Motion> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::PositionTo(motion) => Some(motion),
            _ => None,
        })
    }

    pub fn frame_cycle(&self) -> Option<&FrameCycle> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::AssetSwap(cycle) => Some(cycle),
            _ => None,
        })
    }

    pub fn is_flipped(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect, Effect::FlipHorizontal))
    }

    pub fn is_color(&self) -> bool {
        matches!(self.source, Source::Color(_))
    }
}
