//! Zombie Replay - Entry Point
//!
//! Loads a level, a replay log and a sprite directory, then plays the replay
//! tick by tick through the renderer's draw loop. With `--out` every draw pass
//! is written to disk as a numbered PNG.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::time::{self, Instant, MissedTickBehavior};

use zombie_replay::{
    AssetRegistry, AssetTable, Renderer, RendererConfig, ReplayError, ReplayLog, Result, Surface,
    TileBackground, TileGrid,
};

/// Replay a zombie combat simulation as animation
#[derive(Parser, Debug)]
#[command(name = "zombie-replay")]
#[command(about = "Render a recorded zombie simulation frame by frame")]
struct Args {
    /// Level file: one row of tile codes per line
    #[arg(long)]
    level: PathBuf,

    /// Replay log: JSON array of ticks, each an array of entities
    #[arg(long)]
    replay: PathBuf,

    /// Directory holding the sprite PNGs
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Renderer config (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON object mapping entity tokens to display labels
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Write every draw pass as a PNG into this directory
    #[arg(long)]
    out: Option<PathBuf>,

    /// Host frame rate for the draw loop
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    if args.fps == 0 {
        return Err(ReplayError::InvalidConfig("fps must be positive".into()));
    }

    let config = match &args.config {
        Some(path) => RendererConfig::load(path)?,
        None => RendererConfig::default(),
    };
    let grid = TileGrid::load(&args.level)?;
    let replay = ReplayLog::load(&args.replay)?;
    let labels = match &args.labels {
        Some(path) => load_labels(path)?,
        None => HashMap::new(),
    };

    tracing::info!(
        "Replaying {} ticks on a {}x{} board",
        replay.len(),
        grid.width(),
        grid.height()
    );

    let registry = Arc::new(AssetRegistry::new());
    let mut loader = tokio::spawn(load_assets(registry.clone(), args.assets.clone()));

    let (width, height) = grid.pixel_size(config.cell_size);
    let tick_length = config.replay_speed();
    let mut renderer = Renderer::new(grid, Surface::new(width, height), config, registry)?
        .with_labels(labels);

    // A failed load never publishes, so race the loader against initialization.
    let background = TileBackground::default();
    let initialized = tokio::select! {
        result = renderer.initialize(&background) => {
            result?;
            true
        }
        joined = &mut loader => {
            joined.map_err(|_| ReplayError::AssetsClosed)??;
            false
        }
    };
    if !initialized {
        renderer.initialize(&background).await?;
    }

    if let Some(dir) = &args.out {
        std::fs::create_dir_all(dir)?;
    }

    let mut frames = time::interval(Duration::from_secs(1) / args.fps);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut written = 0usize;

    for (tick, entities) in replay.iter().enumerate() {
        let started = Instant::now();
        renderer.render(entities)?;
        written += save_pass(&renderer, args.out.as_deref(), written)?;
        tracing::debug!("Tick {}: {} items", tick, renderer.items().len());

        // Hold each tick for at least one replay step, pumping frames meanwhile.
        while started.elapsed() < tick_length || renderer.pending_frame().is_some() {
            frames.tick().await;
            for handle in renderer.scheduler_mut().take_due() {
                if renderer.on_frame(handle) {
                    written += save_pass(&renderer, args.out.as_deref(), written)?;
                }
            }
        }
    }

    let metrics = renderer.metrics();
    tracing::info!(
        "Replay finished: {} passes, {} frames scheduled, {} cancelled, {:.2}ms avg pass",
        metrics.passes,
        metrics.frames_scheduled,
        metrics.frames_cancelled,
        metrics.avg_pass_time_ms()
    );
    tracing::info!(
        "Last pass: {} items in {:.2}ms",
        metrics.items_painted,
        metrics.last_pass_time_ms()
    );
    if let Some(dir) = &args.out {
        tracing::info!("Wrote {} frames to {}", written, dir.display());
    }

    Ok(())
}

/// Load sprites off the runtime threads and publish them when done.
async fn load_assets(registry: Arc<AssetRegistry>, dir: PathBuf) -> Result<()> {
    let table = tokio::task::spawn_blocking(move || AssetTable::load_dir(&dir))
        .await
        .map_err(|_| ReplayError::AssetsClosed)?
        .inspect_err(|e| tracing::error!("Asset loading failed: {}", e))?;
    registry.publish(table)
}

fn load_labels(path: &Path) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write the current surface if an output directory is set. Returns frames written.
fn save_pass<S, C>(renderer: &Renderer<S, C>, out: Option<&Path>, index: usize) -> Result<usize>
where
    S: zombie_replay::renderer::FrameScheduler,
    C: zombie_replay::renderer::Clock,
{
    let Some(dir) = out else {
        return Ok(0);
    };
    renderer
        .surface()
        .save(&dir.join(format!("frame_{:05}.png", index)))?;
    Ok(1)
}
