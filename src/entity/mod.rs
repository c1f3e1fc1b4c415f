//! Entity snapshots produced by the combat simulation.
//!
//! Snapshots are read-only to the renderer. Anything the renderer does not
//! recognize (a new entity kind, a new visual event) deserializes into an
//! `Unknown` variant so older renderers keep working against newer data.

pub mod replay;

pub use replay::ReplayLog;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::types::GridPos;

/// Kind of simulated object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Box,
    Landmine,
    Player,
    Rock,
    Zombie,
    /// Any kind this renderer has no mapping for.
    Unknown,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Box => "Box",
            EntityKind::Landmine => "Landmine",
            EntityKind::Player => "Player",
            EntityKind::Rock => "Rock",
            EntityKind::Zombie => "Zombie",
            EntityKind::Unknown => "Unknown",
        }
    }
}

impl FromStr for EntityKind {
    type Err = std::convert::Infallible;

    /// Case-insensitive; anything unrecognized is `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const KNOWN: [EntityKind; 5] = [
            EntityKind::Box,
            EntityKind::Landmine,
            EntityKind::Player,
            EntityKind::Rock,
            EntityKind::Zombie,
        ];
        Ok(KNOWN
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .unwrap_or(EntityKind::Unknown))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(EntityKind::Unknown))
    }
}

/// Per-tick annotation that exists only to drive animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum VisualEvent {
    Moving { from: GridPos, to: GridPos },
    Destructured,
    #[serde(other)]
    Unknown,
}

/// Discriminant of a `VisualEvent`, used for presence queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualEventKind {
    Moving,
    Destructured,
}

impl VisualEvent {
    /// Kind of a recognized event; `None` for events this renderer ignores.
    pub fn kind(&self) -> Option<VisualEventKind> {
        match self {
            VisualEvent::Moving { .. } => Some(VisualEventKind::Moving),
            VisualEvent::Destructured => Some(VisualEventKind::Destructured),
            VisualEvent::Unknown => None,
        }
    }
}

/// Snapshot of one simulated object at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: GridPos,
    pub health: f32,
    /// Stable identity across ticks.
    pub token: String,
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub events: Vec<VisualEvent>,
    /// Display name supplied by the simulation, if any.
    #[serde(default)]
    pub label: Option<String>,
}

impl Entity {
    /// Create a living entity with no visual events.
    pub fn new(kind: EntityKind, position: GridPos, health: f32, token: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            health,
            token: token.into(),
            dead: false,
            events: Vec::new(),
            label: None,
        }
    }

    pub fn with_event(mut self, event: VisualEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn killed(mut self) -> Self {
        self.dead = true;
        self
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Movement of this tick as `(from, to)`, if any.
    pub fn moving(&self) -> Option<(GridPos, GridPos)> {
        self.events.iter().find_map(|event| match event {
            VisualEvent::Moving { from, to } => Some((*from, *to)),
            _ => None,
        })
    }

    pub fn has_event(&self, kind: VisualEventKind) -> bool {
        self.events.iter().any(|event| event.kind() == Some(kind))
    }

    /// True if the entity carries at least one recognized visual event.
    pub fn has_visual_events(&self) -> bool {
        self.events.iter().any(|event| event.kind().is_some())
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
