//! Interactive prompt session that fills in snapshot settings.
//!
//! Menus are typed lists of `{label, value}` pairs; the user picks by label
//! and the caller gets the value back.

use std::fmt;

use anyhow::Context;
use console::Term;
use dialoguer::theme::{ColorfulTheme, Theme};
use dialoguer::{Input, Select};
use dynmap_tiles::{DiskTileSource, TileSource, TilesRoot};
use tile_mosaic::{GridBounds, GridCoord, MosaicError};

use crate::config::validation::validate_setting;
use crate::config::{SettingsManager, keys};

/// One selectable entry of a [`Menu`].
#[derive(Debug, Clone, PartialEq)]
pub struct MenuOption<T> {
    pub label: String,
    pub value: T,
}

/// A single-choice menu.
#[derive(Debug, Clone)]
pub struct Menu<T> {
    prompt: String,
    options: Vec<MenuOption<T>>,
    default: Option<usize>,
}

impl<T> Menu<T> {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            options: Vec::new(),
            default: None,
        }
    }

    /// Menu whose labels are the values themselves.
    pub fn from_values(prompt: impl Into<String>, values: Vec<T>) -> Self
    where
        T: ToString,
    {
        values
            .into_iter()
            .fold(Self::new(prompt), |menu, value| {
                let label = value.to_string();
                menu.option(label, value)
            })
    }

    /// Builder: append an option.
    pub fn option(mut self, label: impl Into<String>, value: T) -> Self {
        self.options.push(MenuOption {
            label: label.into(),
            value,
        });
        self
    }

    /// Builder: preselect the option at `index`.
    pub fn default_index(mut self, index: usize) -> Self {
        self.default = Some(index);
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }

    /// Preselected index, if it points at an existing option.
    pub fn default(&self) -> Option<usize> {
        self.default.filter(|&i| i < self.options.len())
    }

    /// Value of the option at `index`.
    pub fn take(mut self, index: usize) -> Option<T> {
        if index < self.options.len() {
            Some(self.options.swap_remove(index).value)
        } else {
            None
        }
    }

    /// Show the menu and return the chosen value.
    pub fn choose(self, theme: &dyn Theme) -> Result<T, anyhow::Error> {
        if self.options.is_empty() {
            anyhow::bail!("nothing to choose from for: {}", self.prompt);
        }

        let mut select = Select::with_theme(theme)
            .with_prompt(self.prompt.as_str())
            .items(&self.labels());
        if let Some(index) = self.default() {
            select = select.default(index);
        }
        let index = select.interact()?;

        let prompt = self.prompt.clone();
        self.take(index)
            .with_context(|| format!("invalid selection for: {prompt}"))
    }
}

/// Yes/no menu defaulting to "no".
pub fn yes_no(prompt: impl Into<String>) -> Menu<bool> {
    Menu::new(prompt)
        .option("yes", true)
        .option("no", false)
        .default_index(1)
}

/// Native tile size and full-size output of a map, shown before asking
/// about resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePreview {
    pub tile_size: u32,
    pub width: u32,
    pub height: u32,
}

impl SizePreview {
    /// Preview for tiles at `coords` of `tile_size` pixels. `None` when there
    /// are no tiles.
    pub fn new<I>(coords: I, tile_size: u32) -> Result<Option<Self>, MosaicError>
    where
        I: IntoIterator<Item = GridCoord>,
    {
        let Some(bounds) = GridBounds::from_coords(coords) else {
            return Ok(None);
        };
        let (width, height) = bounds.canvas_size(tile_size)?;
        Ok(Some(Self {
            tile_size,
            width,
            height,
        }))
    }
}

impl fmt::Display for SizePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Current tile size is {}. Your output will be ({}, {}).",
            self.tile_size, self.width, self.height
        )
    }
}

/// Discover the tiles of `world`/`map` and size them from the first tile.
pub fn preview_map(
    root: &TilesRoot,
    world: &str,
    map: &str,
) -> Result<Option<SizePreview>, anyhow::Error> {
    let source = DiskTileSource::new(root.map(world, map)?);
    let entries = source.entries()?;
    let Some(first) = entries.first() else {
        return Ok(None);
    };
    let tile_size = source.load(first)?.width();
    Ok(SizePreview::new(entries.iter().map(|e| e.coord), tile_size)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResizeMode {
    Scale,
    TileSize,
}

/// Walk the user through every snapshot setting, storing answers in `sm`.
pub fn run_wizard(sm: &mut SettingsManager) -> Result<(), anyhow::Error> {
    let theme = ColorfulTheme::default();
    let term = Term::stderr();

    let tiles_dir = ask_value(&theme, sm, keys::TILES_DIR, "Path to the dynmap tiles directory")?;
    let root = TilesRoot::open(&tiles_dir)?;

    let worlds = root.list_worlds()?;
    let world = Menu::from_values("World", worlds)
        .default_index(0)
        .choose(&theme)?;
    sm.set_setting(keys::WORLD, &world)?;

    let maps = root.list_maps(&world)?;
    let last = maps.len().saturating_sub(1);
    let map = Menu::from_values("Map", maps)
        .default_index(last)
        .choose(&theme)?;
    sm.set_setting(keys::MAP, &map)?;

    // The answers below replace whatever the environment said.
    sm.set_setting(keys::SCALE, "")?;
    sm.set_setting(keys::TILE_SIZE, "")?;
    sm.set_setting(keys::BACKGROUND, "")?;

    match preview_map(&root, &world, &map) {
        Ok(Some(preview)) => term.write_line(&preview.to_string())?,
        Ok(None) => term.write_line("This map has no tiles yet.")?,
        Err(e) => term.write_line(&format!("Could not determine the output size: {e:#}"))?,
    }
    term.write_line("Large snapshots should be resized to reduce file size.")?;
    if yes_no("Resize the output?").choose(&theme)? {
        let mode = Menu::new("How do you want to resize?")
            .option("scale", ResizeMode::Scale)
            .option("tile size", ResizeMode::TileSize)
            .choose(&theme)?;
        match mode {
            ResizeMode::Scale => {
                ask_value(&theme, sm, keys::SCALE, "Scale factor (e.g. 0.5)")?;
            }
            ResizeMode::TileSize => {
                ask_value(&theme, sm, keys::TILE_SIZE, "Tile size in pixels (e.g. 64)")?;
            }
        }
    }

    if yes_no("Apply a background color?").choose(&theme)? {
        ask_value(&theme, sm, keys::BACKGROUND, "Hex color (e.g. #ff0000)")?;
    }

    tracing::debug!(world = %world, map = %map, "Prompt session complete");
    Ok(())
}

/// Ask for a required value of `key`, validated like any other setting.
fn ask_value(
    theme: &dyn Theme,
    sm: &mut SettingsManager,
    key: &'static str,
    prompt: &str,
) -> Result<String, anyhow::Error> {
    let current = sm.get_setting(key)?;
    let mut input = Input::<String>::with_theme(theme).with_prompt(prompt);
    if !current.is_empty() {
        input = input.default(current);
    }

    let value = input
        .validate_with(move |v: &String| -> Result<(), String> {
            let v = v.trim();
            if v.is_empty() {
                return Err("a value is required".into());
            }
            validate_setting(key, v)
        })
        .interact_text()?;

    sm.set_setting(key, &value)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_insertion_order() {
        let menu = Menu::new("Pick")
            .option("scale", ResizeMode::Scale)
            .option("tile size", ResizeMode::TileSize);
        assert_eq!(menu.prompt(), "Pick");
        assert_eq!(menu.labels(), vec!["scale", "tile size"]);
        assert_eq!(menu.take(1), Some(ResizeMode::TileSize));
    }

    #[test]
    fn test_from_values_uses_values_as_labels() {
        let menu = Menu::from_values("World", vec!["world".to_string(), "nether".to_string()]);
        assert_eq!(menu.labels(), vec!["world", "nether"]);
        assert_eq!(menu.take(0).as_deref(), Some("world"));
    }

    #[test]
    fn test_default_out_of_range_is_ignored() {
        let menu = Menu::from_values("Map", vec![1, 2]).default_index(2);
        assert_eq!(menu.default(), None);
        let menu = Menu::from_values("Map", Vec::<u8>::new()).default_index(0);
        assert_eq!(menu.default(), None);
    }

    #[test]
    fn test_take_out_of_range() {
        assert_eq!(Menu::from_values("Map", vec![1, 2]).take(5), None);
    }

    #[test]
    fn test_size_preview_of_grid() {
        let coords = [(0, 0), (3, 0), (1, 1)].map(|(x, z)| GridCoord::new(x, z));
        let preview = SizePreview::new(coords, 128).unwrap().unwrap();
        assert_eq!(
            preview,
            SizePreview {
                tile_size: 128,
                width: 512,
                height: 256
            }
        );
        assert_eq!(
            preview.to_string(),
            "Current tile size is 128. Your output will be (512, 256)."
        );
    }

    #[test]
    fn test_size_preview_edge_cases() {
        assert_eq!(SizePreview::new(Vec::new(), 128).unwrap(), None);
        let far = [GridCoord::new(0, 0), GridCoord::new(937_500, 937_500)];
        assert!(matches!(
            SizePreview::new(far, 128),
            Err(MosaicError::CanvasTooLarge { .. })
        ));
    }

    #[test]
    fn test_preview_map_reads_tile_size_from_disk() {
        use dynmap_tiles::tile_path;
        use image::{Rgb, RgbImage};
        use std::fs;

        let dir = tempfile::TempDir::new().unwrap();
        let map_dir = dir.path().join("world/flat");
        for (x, z) in [(0, 0), (2, -1)] {
            let path = map_dir.join(tile_path(GridCoord::new(x, z), "png"));
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            RgbImage::from_pixel(16, 16, Rgb([9, 9, 9])).save(&path).unwrap();
        }
        fs::create_dir_all(dir.path().join("world/empty")).unwrap();

        let root = TilesRoot::open(dir.path()).unwrap();
        let preview = preview_map(&root, "world", "flat").unwrap().unwrap();
        assert_eq!((preview.tile_size, preview.width, preview.height), (16, 48, 32));
        assert_eq!(preview_map(&root, "world", "empty").unwrap(), None);
    }

    #[test]
    fn test_yes_no_defaults_to_no() {
        let menu = yes_no("Resize?");
        assert_eq!(menu.default(), Some(1));
        assert_eq!(menu.take(1), Some(false));
    }
}
