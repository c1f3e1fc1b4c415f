//! Lookup tables from entity kind and visual state to sprites.

use crate::assets::AssetKey;
use crate::entity::{Entity, EntityKind, VisualEventKind};

/// Kinds that keep rendering after death so their death animation can play.
pub const ANIMATABLE_AFTER_DEATH: &[EntityKind] = &[EntityKind::Zombie];

const ZOMBIE_WALK_FRAMES: [AssetKey; 3] = [
    AssetKey::ZombieWalkFrame(1),
    AssetKey::ZombieWalkFrame(2),
    AssetKey::ZombieWalkFrame(3),
];

const ZOMBIE_IDLE_FRAMES: [AssetKey; 3] = [
    AssetKey::ZombieIdleFrame(1),
    AssetKey::ZombieIdleFrame(2),
    AssetKey::ZombieIdleFrame(3),
];

/// Visual state of an entity for sprite selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteState {
    Idle,
    Walking,
    Dead,
}

impl SpriteState {
    pub fn of(entity: &Entity) -> Self {
        if entity.is_dead() || entity.has_event(VisualEventKind::Destructured) {
            SpriteState::Dead
        } else if entity.has_event(VisualEventKind::Moving) {
            SpriteState::Walking
        } else {
            SpriteState::Idle
        }
    }
}

/// Whether an entity contributes anything to the frame at all.
pub fn is_visible(entity: &Entity) -> bool {
    !entity.is_dead()
        || (ANIMATABLE_AFTER_DEATH.contains(&entity.kind) && entity.has_visual_events())
}

/// Static sprite for a kind in a state. `None` means the entity draws nothing.
pub fn sprite_key(kind: EntityKind, state: SpriteState) -> Option<AssetKey> {
    match (kind, state) {
        (EntityKind::Rock, _) | (EntityKind::Unknown, _) => None,
        (EntityKind::Zombie, SpriteState::Dead) => Some(AssetKey::ZombieDead),
        (EntityKind::Zombie, SpriteState::Walking) => Some(AssetKey::ZombieWalking),
        (EntityKind::Zombie, SpriteState::Idle) => Some(AssetKey::ZombieIdle),
        (EntityKind::Player, _) => Some(AssetKey::Player),
        (EntityKind::Box, _) => Some(AssetKey::Box),
        (EntityKind::Landmine, _) => Some(AssetKey::Landmine),
    }
}

/// Alternate frames cycled over the static sprite.
///
/// Only zombies cycle: walking frames while moving (dead or not), otherwise
/// idle frames while alive. Independent of which static sprite was chosen.
pub fn cycle_keys(entity: &Entity) -> Option<&'static [AssetKey]> {
    if entity.kind != EntityKind::Zombie {
        return None;
    }
    if entity.moving().is_some() {
        Some(&ZOMBIE_WALK_FRAMES)
    } else if !entity.is_dead() {
        Some(&ZOMBIE_IDLE_FRAMES)
    } else {
        None
    }
}

pub fn has_health_bar(kind: EntityKind) -> bool {
    kind == EntityKind::Zombie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GridPos;
    use crate::entity::VisualEvent;

    fn zombie() -> Entity {
        Entity::new(EntityKind::Zombie, GridPos::new(0, 0), 100.0, "z")
    }

    #[test]
    fn test_sprite_state() {
        assert_eq!(SpriteState::of(&zombie()), SpriteState::Idle);

        let walking = zombie().with_event(VisualEvent::Moving {
            from: GridPos::new(0, 0),
            to: GridPos::new(1, 0),
        });
        assert_eq!(SpriteState::of(&walking), SpriteState::Walking);

        let destroyed = zombie().with_event(VisualEvent::Destructured);
        assert_eq!(SpriteState::of(&destroyed), SpriteState::Dead);
        assert_eq!(SpriteState::of(&zombie().killed()), SpriteState::Dead);
    }

    #[test]
    fn test_visibility_after_death() {
        assert!(is_visible(&zombie()));
        assert!(!is_visible(&zombie().killed()));
        assert!(is_visible(
            &zombie().killed().with_event(VisualEvent::Destructured)
        ));

        let dead_box = Entity::new(EntityKind::Box, GridPos::new(0, 0), 0.0, "b")
            .killed()
            .with_event(VisualEvent::Destructured);
        assert!(!is_visible(&dead_box));
    }

    #[test]
    fn test_rock_and_unknown_have_no_sprite() {
        for state in [SpriteState::Idle, SpriteState::Walking, SpriteState::Dead] {
            assert_eq!(sprite_key(EntityKind::Rock, state), None);
            assert_eq!(sprite_key(EntityKind::Unknown, state), None);
        }
        assert_eq!(
            sprite_key(EntityKind::Player, SpriteState::Walking),
            Some(AssetKey::Player)
        );
    }

    #[test]
    fn test_cycle_follows_movement_then_life() {
        let step = VisualEvent::Moving {
            from: GridPos::new(0, 0),
            to: GridPos::new(1, 0),
        };

        let walking = zombie().with_event(step);
        assert_eq!(cycle_keys(&walking), Some(&ZOMBIE_WALK_FRAMES[..]));
        assert_eq!(cycle_keys(&zombie()), Some(&ZOMBIE_IDLE_FRAMES[..]));

        // Moving corpse still walks; standing corpse does not cycle.
        let falling = zombie().killed().with_event(step);
        assert_eq!(cycle_keys(&falling), Some(&ZOMBIE_WALK_FRAMES[..]));
        let corpse = zombie().killed().with_event(VisualEvent::Destructured);
        assert_eq!(cycle_keys(&corpse), None);

        // Destructured but alive keeps idling.
        let hit = zombie().with_event(VisualEvent::Destructured);
        assert_eq!(cycle_keys(&hit), Some(&ZOMBIE_IDLE_FRAMES[..]));

        let player = Entity::new(EntityKind::Player, GridPos::new(0, 0), 100.0, "p").with_event(step);
        assert_eq!(cycle_keys(&player), None);
    }
}
