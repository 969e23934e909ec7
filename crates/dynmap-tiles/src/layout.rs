//! Directory layout: worlds, maps and tile discovery.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use tile_mosaic::GridCoord;

use crate::TileStoreError;

/// Entries under the tiles root that are not worlds.
const EXCLUDED_WORLD_DIRS: &[&str] = &["_markers_", "faces"];

/// Tiles are grouped into directories of 32x32 tiles.
const GROUP_SHIFT: u32 = 5;

/// Prefix of zoomed-out overview tiles.
const ZOOM_PREFIX: char = 'z';

/// Image extensions Dynmap writes tiles with.
const TILE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// One discovered tile file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEntry {
    pub coord: GridCoord,
    pub path: PathBuf,
}

/// A Dynmap `tiles` directory.
#[derive(Debug, Clone)]
pub struct TilesRoot {
    root: PathBuf,
}

impl TilesRoot {
    /// Open an existing tiles directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, TileStoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(TileStoreError::TilesDirNotFound(root));
        }
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// World names, sorted. Marker/face directories and hidden entries are skipped.
    pub fn list_worlds(&self) -> Result<Vec<String>, TileStoreError> {
        let mut worlds = list_subdirs(&self.root)?;
        worlds.retain(|name| !EXCLUDED_WORLD_DIRS.contains(&name.as_str()));
        debug!(root = %self.root.display(), count = worlds.len(), "Listed worlds");
        Ok(worlds)
    }

    /// Map names of `world`, sorted.
    pub fn list_maps(&self, world: &str) -> Result<Vec<String>, TileStoreError> {
        let world_dir = self.world_dir(world)?;
        let maps = list_subdirs(&world_dir)?;
        debug!(world, count = maps.len(), "Listed maps");
        Ok(maps)
    }

    /// Handle to one map of one world.
    pub fn map(&self, world: &str, map: &str) -> Result<MapDir, TileStoreError> {
        let path = self.world_dir(world)?.join(map);
        if map.is_empty() || !path.is_dir() {
            return Err(TileStoreError::MapNotFound {
                world: world.to_string(),
                map: map.to_string(),
            });
        }
        Ok(MapDir {
            world: world.to_string(),
            map: map.to_string(),
            path,
        })
    }

    fn world_dir(&self, world: &str) -> Result<PathBuf, TileStoreError> {
        let path = self.root.join(world);
        if world.is_empty() || !path.is_dir() {
            return Err(TileStoreError::WorldNotFound {
                root: self.root.clone(),
                world: world.to_string(),
            });
        }
        Ok(path)
    }
}

/// Directory holding the tiles of one map.
#[derive(Debug, Clone)]
pub struct MapDir {
    world: String,
    map: String,
    path: PathBuf,
}

impl MapDir {
    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn name(&self) -> &str {
        &self.map
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path where the tile at `coord` would be stored.
    pub fn tile_path(&self, coord: GridCoord, ext: &str) -> PathBuf {
        self.path.join(tile_path(coord, ext))
    }

    /// Every full-resolution tile of this map, sorted by coordinate.
    ///
    /// Group directories are scanned in parallel. File names that do not
    /// parse as `{x}_{z}` are skipped with a warning.
    pub fn discover(&self) -> Result<Vec<TileEntry>, TileStoreError> {
        let groups: Vec<PathBuf> = read_dir_paths(&self.path)?
            .into_iter()
            .filter(|p| p.is_dir())
            .collect();

        debug!(
            world = %self.world,
            map = %self.map,
            groups = groups.len(),
            "Scanning tile groups"
        );

        let mut entries: Vec<TileEntry> = groups
            .par_iter()
            .map(|group| scan_group(group))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect();

        entries.sort_by(|a, b| a.coord.cmp(&b.coord).then_with(|| a.path.cmp(&b.path)));
        debug!(tiles = entries.len(), "Tile discovery complete");
        Ok(entries)
    }
}

/// Path of a tile relative to its map directory: `{x>>5}_{z>>5}/{x}_{z}.{ext}`.
pub fn tile_path(coord: GridCoord, ext: &str) -> PathBuf {
    let group = format!("{}_{}", coord.x >> GROUP_SHIFT, coord.z >> GROUP_SHIFT);
    Path::new(&group).join(format!("{}_{}.{ext}", coord.x, coord.z))
}

/// Grid coordinate encoded in a tile file name, e.g. `-3_17.jpg`.
///
/// Returns `None` for overview tiles (`z...`), non-image extensions such as
/// half-written `.tmp` files, and foreign names.
pub fn parse_tile_name(file_name: &str) -> Option<GridCoord> {
    if file_name.starts_with(ZOOM_PREFIX) {
        return None;
    }
    let path = Path::new(file_name);
    let ext = path.extension()?.to_str()?;
    if !TILE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
        return None;
    }
    let (x, z) = path.file_stem()?.to_str()?.split_once('_')?;
    Some(GridCoord::new(x.parse().ok()?, z.parse().ok()?))
}

fn scan_group(group: &Path) -> Result<Vec<TileEntry>, TileStoreError> {
    let mut entries = Vec::new();
    for path in read_dir_paths(group)? {
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(ZOOM_PREFIX) {
            continue;
        }
        match parse_tile_name(name) {
            Some(coord) => entries.push(TileEntry { coord, path }),
            None => warn!(path = %path.display(), "Skipping file with unrecognised tile name"),
        }
    }
    Ok(entries)
}

fn read_dir_paths(dir: &Path) -> Result<Vec<PathBuf>, TileStoreError> {
    let read_dir = fs::read_dir(dir).map_err(|e| TileStoreError::io(dir, e))?;
    read_dir
        .map(|entry| {
            entry
                .map(|e| e.path())
                .map_err(|e| TileStoreError::io(dir, e))
        })
        .collect()
}

fn list_subdirs(dir: &Path) -> Result<Vec<String>, TileStoreError> {
    let mut names: Vec<String> = read_dir_paths(dir)?
        .into_iter()
        .filter(|p| p.is_dir())
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    /// tiles/{world, nether, _markers_, faces, .git}, world/{flat, surface}
    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for d in ["world/flat", "world/surface", "nether/flat", "_markers_", "faces", ".git"] {
            fs::create_dir_all(root.join(d)).unwrap();
        }
        fs::write(root.join("standalone.json"), b"{}").unwrap();

        let flat = root.join("world/flat");
        for coord in [(0, 0), (-1, 0), (31, 31), (32, -33)] {
            touch(&flat.join(tile_path(GridCoord::new(coord.0, coord.1), "jpg")));
        }
        touch(&flat.join("0_0/z_0_0.jpg"));
        touch(&flat.join("0_0/zz_0_0.jpg"));
        touch(&flat.join("0_0/readme.txt"));
        touch(&flat.join("0_0/1_1.jpg.tmp"));
        dir
    }

    #[test]
    fn test_tile_path_groups_by_shift() {
        assert_eq!(
            tile_path(GridCoord::new(33, -1), "jpg"),
            Path::new("1_-1").join("33_-1.jpg")
        );
        assert_eq!(
            tile_path(GridCoord::new(-33, 64), "png"),
            Path::new("-2_2").join("-33_64.png")
        );
    }

    #[test]
    fn test_parse_tile_name() {
        assert_eq!(parse_tile_name("12_-7.jpg"), Some(GridCoord::new(12, -7)));
        assert_eq!(parse_tile_name("-1_0.png"), Some(GridCoord::new(-1, 0)));
        assert_eq!(parse_tile_name("z_1_2.jpg"), None);
        assert_eq!(parse_tile_name("zz_1_2.jpg"), None);
        assert_eq!(parse_tile_name("readme.txt"), None);
        assert_eq!(parse_tile_name("1_2_3.jpg"), None);
    }

    #[test]
    fn test_parse_tile_name_checks_extension() {
        assert_eq!(parse_tile_name("3_4.webp"), Some(GridCoord::new(3, 4)));
        assert_eq!(parse_tile_name("3_4.JPEG"), Some(GridCoord::new(3, 4)));
        assert_eq!(parse_tile_name("3_4.jpg.tmp"), None);
        assert_eq!(parse_tile_name("3_4.tmp"), None);
        assert_eq!(parse_tile_name("3_4"), None);
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = TilesRoot::open(dir.path().join("nope")).unwrap_err();
        assert!(err.is_missing_resource());
    }

    #[test]
    fn test_list_worlds_skips_excluded() {
        let dir = fixture();
        let root = TilesRoot::open(dir.path()).unwrap();
        assert_eq!(root.list_worlds().unwrap(), vec!["nether", "world"]);
    }

    #[test]
    fn test_list_maps() {
        let dir = fixture();
        let root = TilesRoot::open(dir.path()).unwrap();
        assert_eq!(root.list_maps("world").unwrap(), vec!["flat", "surface"]);
        assert!(matches!(
            root.list_maps("end"),
            Err(TileStoreError::WorldNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_map() {
        let dir = fixture();
        let root = TilesRoot::open(dir.path()).unwrap();
        let err = root.map("world", "cave").unwrap_err();
        assert!(matches!(err, TileStoreError::MapNotFound { .. }));
        assert!(err.is_missing_resource());
    }

    #[test]
    fn test_discover_skips_zoom_and_temp_files() {
        let dir = fixture();
        let map = TilesRoot::open(dir.path()).unwrap().map("world", "flat").unwrap();
        let coords: Vec<GridCoord> = map.discover().unwrap().into_iter().map(|e| e.coord).collect();
        assert_eq!(
            coords,
            vec![
                GridCoord::new(-1, 0),
                GridCoord::new(0, 0),
                GridCoord::new(31, 31),
                GridCoord::new(32, -33),
            ]
        );
    }

    #[test]
    fn test_discovered_paths_match_layout() {
        let dir = fixture();
        let map = TilesRoot::open(dir.path()).unwrap().map("world", "flat").unwrap();
        for entry in map.discover().unwrap() {
            assert_eq!(entry.path, map.tile_path(entry.coord, "jpg"));
        }
    }

    #[test]
    fn test_discover_empty_map() {
        let dir = fixture();
        let map = TilesRoot::open(dir.path()).unwrap().map("world", "surface").unwrap();
        assert!(map.discover().unwrap().is_empty());
    }
}
