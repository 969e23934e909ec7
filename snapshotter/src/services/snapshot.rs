//! Snapshot pipeline: discover -> load -> assemble -> persist -> deliver.

use std::path::PathBuf;

use anyhow::Context;
use dynmap_tiles::{DiskTileSource, TileSource, TilesRoot, load_tiles};
use tile_mosaic::{Mosaic, MosaicOptions, assemble};

use super::delivery::{DeliveryOutcome, Notifier, deliver};
use super::snapshot_store::SnapshotStore;
use crate::config::AppConfig;

/// Summary of one successful snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotReport {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub tile_count: usize,
    pub tile_size: u32,
    pub delivery: DeliveryOutcome,
}

/// Build a mosaic from every tile `source` provides.
pub fn create_snapshot(
    source: &dyn TileSource,
    options: &MosaicOptions,
) -> Result<Mosaic, anyhow::Error> {
    tracing::info!("Finding and loading tiles");
    let tiles = load_tiles(source).context("failed to load tiles")?;

    tracing::info!(tiles = tiles.len(), "Assembling snapshot");
    let mosaic = assemble(tiles, options).context("failed to assemble snapshot")?;
    Ok(mosaic)
}

/// Take, save and optionally deliver one snapshot as described by `config`.
///
/// The image is persisted only after assembly succeeded. Delivery runs last
/// and its failure is reported in [`SnapshotReport::delivery`], never as an
/// error.
pub fn take_snapshot(
    config: &AppConfig,
    notifier: Option<&dyn Notifier>,
) -> Result<SnapshotReport, anyhow::Error> {
    // Reject bad options before touching the disk.
    let options = config
        .mosaic_options()
        .context("invalid snapshot options")?;

    let root = TilesRoot::open(&config.tiles_dir)?;
    let map = root.map(&config.world, &config.map)?;
    tracing::info!(
        world = %config.world,
        map = %config.map,
        tiles_dir = %config.tiles_dir.display(),
        "Taking snapshot"
    );

    let mosaic = create_snapshot(&DiskTileSource::new(map), &options)?;

    let store = SnapshotStore::new(&config.output_dir);
    let path = store
        .save(&mosaic.image, &config.world, &config.map)
        .with_context(|| format!("failed to save snapshot in {}", config.output_dir.display()))?;

    let delivery = deliver(notifier, &path, config.message.as_deref());

    Ok(SnapshotReport {
        path,
        width: mosaic.width(),
        height: mosaic.height(),
        tile_count: mosaic.tile_count,
        tile_size: mosaic.tile_size,
        delivery,
    })
}
