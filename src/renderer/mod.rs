//! Replay renderer.
//!
//! Each `render()` call models one simulation tick: the drawable item list is
//! rebuilt from the entity snapshots, then a draw loop paints it and keeps
//! re-scheduling itself only while a time-bound effect is still playing.
//! At most one frame is ever pending; `render()` cancels it before rebuilding.

pub mod compositing;
pub mod effect;
pub mod font;
pub mod item;
pub mod lookup;
pub mod metrics;
pub mod schedule;
pub mod surface;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;

use crate::assets::{AssetRegistry, AssetTable, ImageHandle};
use crate::board::{BackgroundGenerator, TileGrid};
use crate::core::config::RendererConfig;
use crate::core::error::{ReplayError, Result};
use crate::entity::Entity;

use compositing::Scratch;
use lookup::SpriteState;

pub use effect::{Effect, FrameCycle, Motion};
pub use item::{DrawableItem, Source};
pub use metrics::RenderMetrics;
pub use schedule::{Clock, FrameHandle, FrameQueue, FrameScheduler, ManualClock, SystemClock};
pub use surface::Surface;

/// Resources fetched once by `initialize()`.
struct Loaded {
    background: ImageHandle,
    sprites: Arc<AssetTable>,
}

pub struct Renderer<S = FrameQueue, C = SystemClock> {
    grid: TileGrid,
    surface: Surface,
    config: RendererConfig,
    labels: HashMap<String, String>,
    assets: Arc<AssetRegistry>,
    scheduler: S,
    clock: C,
    loaded: Option<Loaded>,
    items: Vec<DrawableItem>,
    scratch: Scratch,
    pending_frame: Option<FrameHandle>,
    metrics: RenderMetrics,
}

impl Renderer {
    /// Renderer on the in-process frame queue and the system clock.
    pub fn new(
        grid: TileGrid,
        surface: Surface,
        config: RendererConfig,
        assets: Arc<AssetRegistry>,
    ) -> Result<Self> {
        Self::with_parts(grid, surface, config, assets, FrameQueue::new(), SystemClock::new())
    }
}

impl<S: FrameScheduler, C: Clock> Renderer<S, C> {
    pub fn with_parts(
        grid: TileGrid,
        surface: Surface,
        config: RendererConfig,
        assets: Arc<AssetRegistry>,
        scheduler: S,
        clock: C,
    ) -> Result<Self> {
        config.validate()?;
        let scratch = Scratch::new(config.cell_size);

        Ok(Self {
            grid,
            surface,
            config,
            labels: HashMap::new(),
            assets,
            scheduler,
            clock,
            loaded: None,
            items: Vec::new(),
            scratch,
            pending_frame: None,
            metrics: RenderMetrics::new(),
        })
    }

    /// Token → display label; takes precedence over labels carried by entities.
    pub fn with_labels(mut self, labels: HashMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    /// Wait for the sprites, then fetch and cache the board background.
    ///
    /// Calling it again once it has completed does nothing.
    pub async fn initialize<G: BackgroundGenerator>(&mut self, generator: &G) -> Result<()> {
        if self.loaded.is_some() {
            return Ok(());
        }

        let sprites = self.assets.ready().await?;
        let background = generator.generate(&self.grid, self.config.cell_size).await?;

        tracing::info!(
            "Renderer initialized: {}x{} board, {} sprites",
            self.grid.width(),
            self.grid.height(),
            sprites.len()
        );

        self.loaded = Some(Loaded {
            background: Arc::new(background),
            sprites,
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.loaded.is_some()
    }

    /// Show one simulation tick.
    pub fn render(&mut self, entities: &[Entity]) -> Result<()> {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
            self.metrics.record_cancelled();
            tracing::trace!("Cancelled pending frame {:?}", handle);
        }

        self.items = self.build_items(entities)?;
        tracing::debug!(
            "Rebuilt {} items from {} entities",
            self.items.len(),
            entities.len()
        );

        self.draw_pass();
        Ok(())
    }

    /// Host callback for a frame requested earlier. Stale handles are ignored.
    ///
    /// Returns true if a draw pass ran.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.pending_frame != Some(handle) {
            return false;
        }
        self.pending_frame = None;
        self.scheduler.frame_fired(handle);
        self.draw_pass();
        true
    }

    /// True while any motion or frame cycle has time left.
    pub fn should_animate(&self) -> bool {
        self.animating_at(self.clock.now())
    }

    pub fn items(&self) -> &[DrawableItem] {
        &self.items
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn metrics(&self) -> &RenderMetrics {
        &self.metrics
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// Board size in pixels.
    pub fn board_size(&self) -> (u32, u32) {
        self.grid.pixel_size(self.config.cell_size)
    }

    fn animating_at(&self, now: Duration) -> bool {
        self.items.iter().any(|item| {
            item.effects.iter().any(|effect| effect.is_animating(now))
        })
    }

    fn build_items(&self, entities: &[Entity]) -> Result<Vec<DrawableItem>> {
        let loaded = self.loaded.as_ref().ok_or(ReplayError::NotInitialized)?;
        let now = self.clock.now();
        let (width, height) = self.board_size();

        let mut items = Vec::with_capacity(entities.len() * 3 + 1);
        items.push(DrawableItem::new(
            Source::Image(loaded.background.clone()),
            Vec2::ZERO,
            width as f32,
            height as f32,
        ));

        for entity in entities {
            self.register_entity(entity, &loaded.sprites, now, &mut items);
        }

        Ok(items)
    }

    fn register_entity(
        &self,
        entity: &Entity,
        sprites: &AssetTable,
        now: Duration,
        items: &mut Vec<DrawableItem>,
    ) {
        if !lookup::is_visible(entity) {
            return;
        }

        let state = SpriteState::of(entity);
        let Some(base) = lookup::sprite_key(entity.kind, state).and_then(|key| sprites.get(key))
        else {
            return;
        };

        let cell = self.config.cell_size;
        let size = cell as f32;

        let (origin, motion, leftward) = match entity.moving() {
            Some((from, to)) => (
                from.to_pixels(cell),
                Some(Motion::new(to.to_pixels(cell), now, self.config.replay_speed())),
                from.x >= to.x,
            ),
            None => (entity.position.to_pixels(cell), None, false),
        };

        let mut sprite = DrawableItem::new(Source::Image(base.clone()), origin, size, size)
            .with_label(self.label_for(entity));

        if let Some(motion) = &motion {
            sprite.push_effect(Effect::PositionTo(motion.clone()));
            if leftward {
                sprite.push_effect(Effect::FlipHorizontal);
            }
        }

        // Missing optional frames leave the static sprite in place.
        if let Some(frames) = lookup::cycle_keys(entity).and_then(|keys| sprites.all_of(keys)) {
            sprite.push_effect(Effect::AssetSwap(FrameCycle::new(
                frames,
                self.config.frame_interval(),
                now,
            )));
        }

        if entity.is_dead() && self.config.corpse_opacity < 100 {
            sprite.push_effect(Effect::Opacity(self.config.corpse_opacity));
        }

        if let Some(degrees) = self.config.hue_shifts.get(&entity.token) {
            sprite.push_effect(Effect::HueRotate(*degrees));
        }

        items.push(sprite);

        if lookup::has_health_bar(entity.kind) && !entity.is_dead() {
            let health = entity.health.clamp(0.0, self.config.zombie_max_health);
            let full = self.config.health_bar_width();
            let filled = health / self.config.zombie_max_health * full;
            let bar_height = self.config.health_bar_height;

            let mut background = DrawableItem::new(
                Source::Color(self.config.health_bar_background),
                origin,
                full,
                bar_height,
            );
            let mut foreground = DrawableItem::new(
                Source::Color(self.config.health_bar_foreground),
                origin,
                filled,
                bar_height,
            );

            if let Some(motion) = motion {
                background.push_effect(Effect::PositionTo(motion.clone()));
                foreground.push_effect(Effect::PositionTo(motion));
            }

            items.push(background);
            items.push(foreground);
        }
    }

    fn label_for(&self, entity: &Entity) -> Option<String> {
        self.labels
            .get(&entity.token)
            .cloned()
            .or_else(|| entity.label().map(str::to_owned))
    }

    /// Clear, paint every item in order, and re-schedule while animating.
    fn draw_pass(&mut self) {
        let now = self.clock.now();
        self.metrics.begin_pass();

        self.surface.clear();
        for item in &self.items {
            paint_item(&mut self.surface, &mut self.scratch, item, now, &self.config);
            self.metrics.record_item();
        }

        if self.animating_at(now) {
            let handle = self.scheduler.request_frame();
            self.pending_frame = Some(handle);
            self.metrics.record_scheduled();
            tracing::trace!("Scheduled frame {:?}", handle);
        } else {
            self.pending_frame = None;
        }

        self.metrics.end_pass();
    }
}

/// Paint one item with its effects applied.
fn paint_item(
    surface: &mut Surface,
    scratch: &mut Scratch,
    item: &DrawableItem,
    now: Duration,
    config: &RendererConfig,
) {
    let mut opacity = None;
    let mut motion = None;
    let mut cycle = None;
    let mut flip = false;
    let mut hue = None;

    for effect in &item.effects {
        match effect {
            Effect::Opacity(value) => opacity = Some(*value),
            Effect::PositionTo(m) => motion = Some(m),
            Effect::AssetSwap(c) => cycle = Some(c),
            Effect::FlipHorizontal => flip = true,
            Effect::HueRotate(degrees) => hue = Some(*degrees),
        }
    }

    if let Some(value) = opacity {
        surface.set_global_alpha(value as f32 / 100.0);
    }

    let position = match motion {
        Some(m) => m.position(item.position, now, config.clamp_motion),
        None => item.position,
    };

    let base = match &item.source {
        Source::Color(color) => {
            surface.fill_rect(position, item.width, item.height, *color);
            surface.set_global_alpha(1.0);
            return;
        }
        Source::Image(image) => image,
    };

    let frame = match cycle {
        Some(c) => c.select(base, now),
        None => base,
    };

    let mut in_scratch = false;
    if flip {
        scratch.load_mirrored(frame);
        in_scratch = true;
    }
    if let Some(degrees) = hue {
        if !in_scratch {
            scratch.load(frame);
            in_scratch = true;
        }
        scratch.hue_rotate(degrees);
    }

    let source = if in_scratch { scratch.image() } else { &**frame };
    surface.draw_image(source, position, item.width, item.height);
    surface.set_global_alpha(1.0);

    if let Some(label) = &item.label {
        surface.draw_text(
            label,
            position.x + item.width / 2.0,
            position.y - 2.0,
            config.label_color,
            config.label_scale,
        );
    }
}
