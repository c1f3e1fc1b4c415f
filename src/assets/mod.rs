//! Named sprite images and the one-time "assets ready" signal.
//!
//! The loader fills an `AssetTable` (usually on a blocking thread) and
//! publishes it once through the `AssetRegistry`. Renderers wait on the
//! registry until that happens.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::watch;

use crate::core::error::{ReplayError, Result};

/// Shared, immutable sprite image.
pub type ImageHandle = Arc<RgbaImage>;

/// Every sprite the renderer knows how to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Player,
    Box,
    Landmine,
    ZombieIdle,
    ZombieWalking,
    ZombieDead,
    /// Extra idle frame 1..=3.
    ZombieIdleFrame(u8),
    /// Extra walking frame 1..=3.
    ZombieWalkFrame(u8),
}

impl AssetKey {
    pub const ALL: [AssetKey; 12] = [
        AssetKey::Player,
        AssetKey::Box,
        AssetKey::Landmine,
        AssetKey::ZombieIdle,
        AssetKey::ZombieWalking,
        AssetKey::ZombieDead,
        AssetKey::ZombieIdleFrame(1),
        AssetKey::ZombieIdleFrame(2),
        AssetKey::ZombieIdleFrame(3),
        AssetKey::ZombieWalkFrame(1),
        AssetKey::ZombieWalkFrame(2),
        AssetKey::ZombieWalkFrame(3),
    ];

    /// Animation frames may be absent; the renderer falls back to the static sprite.
    pub fn is_optional(&self) -> bool {
        matches!(self, AssetKey::ZombieIdleFrame(_) | AssetKey::ZombieWalkFrame(_))
    }

    /// File stem used when loading from a directory.
    pub fn file_stem(&self) -> String {
        match self {
            AssetKey::Player => "player".into(),
            AssetKey::Box => "box".into(),
            AssetKey::Landmine => "landmine".into(),
            AssetKey::ZombieIdle => "zombie_idle".into(),
            AssetKey::ZombieWalking => "zombie_walking".into(),
            AssetKey::ZombieDead => "zombie_dead".into(),
            AssetKey::ZombieIdleFrame(n) => format!("zombie_idle_{}", n),
            AssetKey::ZombieWalkFrame(n) => format!("zombie_walk_{}", n),
        }
    }
}

/// Loaded sprite images by key.
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    images: HashMap<AssetKey, ImageHandle>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: AssetKey, image: RgbaImage) {
        self.images.insert(key, Arc::new(image));
    }

    pub fn with(mut self, key: AssetKey, image: RgbaImage) -> Self {
        self.insert(key, image);
        self
    }

    pub fn get(&self, key: AssetKey) -> Option<&ImageHandle> {
        self.images.get(&key)
    }

    pub fn contains(&self, key: AssetKey) -> bool {
        self.images.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// All of `keys`, in order, or `None` if any one is missing.
    pub fn all_of(&self, keys: &[AssetKey]) -> Option<Vec<ImageHandle>> {
        keys.iter().map(|key| self.get(*key).cloned()).collect()
    }

    /// Load `<stem>.png` for every known key from `dir`.
    ///
    /// Missing required sprites are an error; missing animation frames are skipped.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut table = Self::new();

        for key in AssetKey::ALL {
            let path = dir.join(format!("{}.png", key.file_stem()));
            if !path.exists() {
                if key.is_optional() {
                    tracing::debug!("Optional sprite {:?} not found, skipping", path);
                    continue;
                }
                return Err(ReplayError::MissingAsset(path.display().to_string()));
            }

            let image = image::open(&path)?.to_rgba8();
            table.insert(key, image);
        }

        tracing::info!("Loaded {} sprites from {}", table.len(), dir.display());
        Ok(table)
    }
}

/// Holds the asset table once it is published and signals readiness.
pub struct AssetRegistry {
    tx: watch::Sender<Option<Arc<AssetTable>>>,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetRegistry {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Registry that is ready from the start.
    pub fn ready_with(table: AssetTable) -> Self {
        let (tx, _rx) = watch::channel(Some(Arc::new(table)));
        Self { tx }
    }

    pub fn is_ready(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Publish the table and fire the ready signal. Only the first call succeeds.
    pub fn publish(&self, table: AssetTable) -> Result<()> {
        let table = Arc::new(table);
        let published = self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(table);
            true
        });

        if published {
            Ok(())
        } else {
            Err(ReplayError::AlreadyPublished)
        }
    }

    /// The table, if already published.
    pub fn table(&self) -> Option<Arc<AssetTable>> {
        self.tx.borrow().clone()
    }

    /// Wait until the table is published.
    pub async fn ready(&self) -> Result<Arc<AssetTable>> {
        let mut rx = self.tx.subscribe();
        let slot = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| ReplayError::AssetsClosed)?;
        slot.clone().ok_or(ReplayError::AssetsClosed)
    }
}
