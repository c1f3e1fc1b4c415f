//! Visual effects attached to drawable items.
//!
//! Effects are attached when the item list is built and never removed.
//! Time-bound effects simply stop mattering once `now` passes their end.

use std::time::Duration;

use glam::Vec2;

use crate::assets::ImageHandle;

/// Linear slide from an item's own position to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub target: Vec2,
    pub started_at: Duration,
    pub duration: Duration,
}

impl Motion {
    pub fn new(target: Vec2, started_at: Duration, duration: Duration) -> Self {
        Self {
            target,
            started_at,
            duration,
        }
    }

    /// Fraction of the slide covered at `now`. Not clamped: past the end it keeps growing.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()) as f32
    }

    /// Interpolated position for an item that started at `origin`.
    pub fn position(&self, origin: Vec2, now: Duration, clamp: bool) -> Vec2 {
        let mut delta = self.progress(now);
        if clamp {
            delta = delta.clamp(0.0, 1.0);
        }
        origin + (self.target - origin) * delta
    }

    pub fn ends_at(&self) -> Duration {
        self.started_at + self.duration
    }
}

/// Cyclic substitution of an item's image by alternate frames.
#[derive(Debug, Clone)]
pub struct FrameCycle {
    /// Frames shown after the item's own image, in order.
    pub alternates: Vec<ImageHandle>,
    pub interval: Duration,
    pub started_at: Duration,
}

impl FrameCycle {
    pub fn new(alternates: Vec<ImageHandle>, interval: Duration, started_at: Duration) -> Self {
        Self {
            alternates,
            interval,
            started_at,
        }
    }

    /// Frames in the cycle, counting the item's own image.
    pub fn frame_count(&self) -> usize {
        self.alternates.len() + 1
    }

    /// One full pass through every frame.
    pub fn duration(&self) -> Duration {
        self.interval * self.frame_count() as u32
    }

    pub fn ends_at(&self) -> Duration {
        self.started_at + self.duration()
    }

    /// Index into `[base, alternates...]` shown at `now`.
    pub fn frame_index(&self, now: Duration) -> usize {
        if self.interval.is_zero() {
            return 0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        let steps = (elapsed.as_secs_f64() / self.interval.as_secs_f64()).floor() as usize;
        steps % self.frame_count()
    }

    /// Frame to paint at `now`, given the item's own image.
    pub fn select<'a>(&'a self, base: &'a ImageHandle, now: Duration) -> &'a ImageHandle {
        match self.frame_index(now) {
            0 => base,
            n => &self.alternates[n - 1],
        }
    }
}

#[derive(Debug, Clone)]
pub enum Effect {
    /// Paint with global alpha `value / 100`.
    Opacity(u8),
    PositionTo(Motion),
    AssetSwap(FrameCycle),
    FlipHorizontal,
    /// Rotate hue by this many degrees, keeping the sprite's alpha mask.
    HueRotate(f32),
}

impl Effect {
    /// End of a time-bound effect; `None` for effects that never expire.
    pub fn ends_at(&self) -> Option<Duration> {
        match self {
            Effect::PositionTo(motion) => Some(motion.ends_at()),
            Effect::AssetSwap(cycle) => Some(cycle.ends_at()),
            Effect::Opacity(_) | Effect::FlipHorizontal | Effect::HueRotate(_) => None,
        }
    }

    /// True while a time-bound effect still has time left.
    pub fn is_animating(&self, now: Duration) -> bool {
        self.ends_at().is_some_and(|end| end > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::sync::Arc;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn frame() -> ImageHandle {
        Arc::new(RgbaImage::new(1, 1))
    }

    #[test]
    fn test_motion_interpolation() {
        let motion = Motion::new(Vec2::new(64.0, 0.0), ms(0), ms(500));
        let origin = Vec2::ZERO;

        assert_eq!(motion.position(origin, ms(0), false).x, 0.0);
        assert!((motion.position(origin, ms(250), false).x - 32.0).abs() < 0.01);
        assert!((motion.position(origin, ms(500), false).x - 64.0).abs() < 0.01);
    }

    #[test]
    fn test_motion_overshoots_unless_clamped() {
        let motion = Motion::new(Vec2::new(64.0, 0.0), ms(0), ms(500));
        let origin = Vec2::ZERO;

        assert!((motion.position(origin, ms(750), false).x - 96.0).abs() < 0.01);
        assert!((motion.position(origin, ms(750), true).x - 64.0).abs() < 0.01);
    }

    #[test]
    fn test_motion_relative_to_start() {
        let motion = Motion::new(Vec2::new(0.0, 32.0), ms(1000), ms(500));
        let origin = Vec2::new(0.0, 64.0);

        // Before the start the slide has not begun.
        assert_eq!(motion.position(origin, ms(900), false), origin);
        assert!((motion.position(origin, ms(1250), false).y - 48.0).abs() < 0.01);
    }

    #[test]
    fn test_frame_cycle_indices() {
        let cycle = FrameCycle::new(vec![frame(), frame(), frame()], ms(125), ms(0));

        assert_eq!(cycle.frame_count(), 4);
        assert_eq!(cycle.frame_index(ms(0)), 0);
        assert_eq!(cycle.frame_index(ms(130)), 1);
        assert_eq!(cycle.frame_index(ms(260)), 2);
        assert_eq!(cycle.frame_index(ms(500)), 0);
        assert_eq!(cycle.duration(), ms(500));
    }

    #[test]
    fn test_frame_cycle_select() {
        let base = frame();
        let alternates = vec![frame(), frame(), frame()];
        let cycle = FrameCycle::new(alternates.clone(), ms(100), ms(0));

        assert!(Arc::ptr_eq(cycle.select(&base, ms(50)), &base));
        assert!(Arc::ptr_eq(cycle.select(&base, ms(150)), &alternates[0]));
        assert!(Arc::ptr_eq(cycle.select(&base, ms(350)), &alternates[2]));
    }

    #[test]
    fn test_effect_expiry() {
        let slide = Effect::PositionTo(Motion::new(Vec2::ZERO, ms(100), ms(500)));
        assert!(slide.is_animating(ms(599)));
        assert!(!slide.is_animating(ms(600)));

        assert!(!Effect::FlipHorizontal.is_animating(ms(0)));
        assert!(!Effect::Opacity(50).is_animating(ms(0)));
        assert!(Effect::HueRotate(90.0).ends_at().is_none());
    }
}
