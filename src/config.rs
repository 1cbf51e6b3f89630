use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::color::Rgb565;
use crate::error::ConfigError;

const APP_DIR_NAME: &str = "metal-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Framebuffer dimensions in pixels.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
pub struct ScreenSize {
    pub width: u16,
    pub height: u16,
}

pub const DEFAULT_SCREEN: ScreenSize = ScreenSize {
    width: 640,
    height: 480,
};

pub const DEFAULT_GRID: GridSize = GridSize {
    width: 40,
    height: 30,
};

/// Storage capacity of the snake body; no configured grid may hold more cells.
pub const MAX_SNAKE_LENGTH: usize = 40 * 30;

pub const INITIAL_SNAKE_LENGTH: usize = 3;

pub const POINTS_PER_FOOD: u32 = 10;

/// Random placements tried before food settles for an occupied cell.
pub const FOOD_SPAWN_RETRIES: u32 = 10;

/// Minimum gap between two accepted key events, in milliseconds.
pub const INPUT_DEBOUNCE_MS: u64 = 150;

pub const GAME_SPEED_SLOW_MS: u64 = 300;
pub const GAME_SPEED_NORMAL_MS: u64 = 200;
pub const GAME_SPEED_FAST_MS: u64 = 100;

/// Score needed per speed level increase.
pub const SPEED_INCREASE_SCORE: u32 = 100;

/// Update interval removed per speed level, in milliseconds.
pub const SPEED_STEP_MS: u64 = 20;

/// Minimum update interval in milliseconds.
pub const MIN_UPDATE_INTERVAL_MS: u64 = 60;

/// Largest accepted screen edge in pixels.
pub const MAX_SCREEN_DIMENSION: u16 = 4_096;

/// Sleep between driver iterations (~60 iterations per second).
pub const FRAME_DELAY_MS: u64 = 16;

/// Period of the game-state debug report.
pub const DEBUG_REPORT_INTERVAL_MS: u64 = 5_000;

/// Named update-interval presets.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GameSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl GameSpeed {
    #[must_use]
    pub fn interval_ms(self) -> u64 {
        match self {
            Self::Slow => GAME_SPEED_SLOW_MS,
            Self::Normal => GAME_SPEED_NORMAL_MS,
            Self::Fast => GAME_SPEED_FAST_MS,
        }
    }
}

/// Colors used to draw the scene.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Palette {
    pub background: Rgb565,
    pub snake_head: Rgb565,
    pub snake_body: Rgb565,
    pub food: Rgb565,
    pub food_border: Rgb565,
    pub grid: Rgb565,
    pub text: Rgb565,
    pub overlay: Rgb565,
}

pub const DEFAULT_PALETTE: Palette = Palette {
    background: Rgb565::BLACK,
    snake_head: Rgb565::GREEN,
    snake_body: Rgb565::DARK_GREEN,
    food: Rgb565::RED,
    food_border: Rgb565::WHITE,
    grid: Rgb565::DARK_GRAY,
    text: Rgb565::WHITE,
    overlay: Rgb565::GRAY,
};

impl Palette {
    fn entry_mut(&mut self, key: &str) -> Option<&mut Rgb565> {
        match key {
            "background" => Some(&mut self.background),
            "snake_head" => Some(&mut self.snake_head),
            "snake_body" => Some(&mut self.snake_body),
            "food" => Some(&mut self.food),
            "food_border" => Some(&mut self.food_border),
            "grid" => Some(&mut self.grid),
            "text" => Some(&mut self.text),
            "overlay" => Some(&mut self.overlay),
            _ => None,
        }
    }
}

/// Gameplay tuning consumed by the game state machine.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameRules {
    pub update_interval_ms: u64,
    /// Score per speed level; zero keeps the update interval fixed.
    pub speed_increase_score: u32,
    pub initial_length: usize,
    pub points_per_food: u32,
    pub food_spawn_attempts: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            update_interval_ms: GAME_SPEED_NORMAL_MS,
            speed_increase_score: SPEED_INCREASE_SCORE,
            initial_length: INITIAL_SNAKE_LENGTH,
            points_per_food: POINTS_PER_FOOD,
            food_spawn_attempts: FOOD_SPAWN_RETRIES,
        }
    }
}

/// Complete runtime configuration: defaults, then the config file, then CLI flags.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameConfig {
    pub screen: ScreenSize,
    pub grid: GridSize,
    pub speed: GameSpeed,
    pub debounce_ms: u64,
    pub double_buffer: bool,
    pub show_grid: bool,
    pub speed_increase_score: u32,
    pub palette: Palette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen: DEFAULT_SCREEN,
            grid: DEFAULT_GRID,
            speed: GameSpeed::default(),
            debounce_ms: INPUT_DEBOUNCE_MS,
            double_buffer: true,
            show_grid: true,
            speed_increase_score: SPEED_INCREASE_SCORE,
            palette: DEFAULT_PALETTE,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    screen: Option<ScreenSize>,
    #[serde(default)]
    grid: Option<GridSize>,
    #[serde(default)]
    speed: Option<GameSpeed>,
    #[serde(default)]
    debounce_ms: Option<u64>,
    #[serde(default)]
    double_buffer: Option<bool>,
    #[serde(default)]
    show_grid: Option<bool>,
    #[serde(default)]
    speed_increase_score: Option<u32>,
    #[serde(default)]
    palette: BTreeMap<String, String>,
}

impl GameConfig {
    /// Pixel size of one square grid cell.
    #[must_use]
    pub fn cell_size(&self) -> u16 {
        self.screen.width / self.grid.width.max(1)
    }

    #[must_use]
    pub fn rules(&self) -> GameRules {
        GameRules {
            update_interval_ms: self.speed.interval_ms(),
            speed_increase_score: self.speed_increase_score,
            ..GameRules::default()
        }
    }

    /// Loads configuration from `path`, or from the default location when
    /// `path` is `None`. A missing default file yields the defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parses a JSON document on top of the defaults and validates the result.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let file = serde_json::from_str::<ConfigFile>(raw)?;
        let mut config = Self::default();

        if let Some(screen) = file.screen {
            config.screen = screen;
        }
        if let Some(grid) = file.grid {
            config.grid = grid;
        }
        if let Some(speed) = file.speed {
            config.speed = speed;
        }
        if let Some(debounce_ms) = file.debounce_ms {
            config.debounce_ms = debounce_ms;
        }
        if let Some(double_buffer) = file.double_buffer {
            config.double_buffer = double_buffer;
        }
        if let Some(show_grid) = file.show_grid {
            config.show_grid = show_grid;
        }
        if let Some(score) = file.speed_increase_score {
            config.speed_increase_score = score;
        }

        for (key, value) in file.palette {
            let color = Rgb565::parse_hex(&value).ok_or_else(|| ConfigError::InvalidColor {
                key: key.clone(),
                value: value.clone(),
            })?;
            let slot = config
                .palette
                .entry_mut(&key)
                .ok_or_else(|| ConfigError::UnknownPaletteEntry(key.clone()))?;
            *slot = color;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the layout preconditions the renderer and game rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ScreenSize { width, height } = self.screen;
        let grid = self.grid;

        if width > MAX_SCREEN_DIMENSION || height > MAX_SCREEN_DIMENSION {
            return Err(ConfigError::InvalidLayout(format!(
                "screen {width}x{height} exceeds {MAX_SCREEN_DIMENSION} pixels per side"
            )));
        }

        if grid.width == 0 || grid.height == 0 {
            return Err(ConfigError::InvalidLayout(
                "grid dimensions must be non-zero".to_owned(),
            ));
        }
        if width % grid.width != 0 || height % grid.height != 0 {
            return Err(ConfigError::InvalidLayout(format!(
                "screen {width}x{height} is not divisible by grid {}x{}",
                grid.width, grid.height
            )));
        }
        if width / grid.width != height / grid.height {
            return Err(ConfigError::InvalidLayout(format!(
                "cells must be square (screen {width}x{height}, grid {}x{})",
                grid.width, grid.height
            )));
        }
        if self.cell_size() < 3 {
            return Err(ConfigError::InvalidLayout(format!(
                "cell size {} is below the 3 pixel minimum",
                self.cell_size()
            )));
        }
        if grid.total_cells() > MAX_SNAKE_LENGTH {
            return Err(ConfigError::InvalidLayout(format!(
                "grid holds {} cells, at most {MAX_SNAKE_LENGTH} are supported",
                grid.total_cells()
            )));
        }
        if usize::from(grid.width) < INITIAL_SNAKE_LENGTH + 1 {
            return Err(ConfigError::InvalidLayout(format!(
                "grid width {} cannot fit the initial snake",
                grid.width
            )));
        }

        Ok(())
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw)
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::color::Rgb565;
    use crate::error::ConfigError;

    use super::{GameConfig, GameSpeed, GridSize, ScreenSize, DEFAULT_PALETTE};

    #[test]
    fn defaults_describe_a_forty_by_thirty_board_of_sixteen_pixel_cells() {
        let config = GameConfig::default();

        assert_eq!(config.cell_size(), 16);
        assert_eq!(config.rules().update_interval_ms, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = GameConfig::from_json("{}").expect("empty config should parse");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let raw = r##"{
            "screen": { "width": 320, "height": 240 },
            "grid": { "width": 20, "height": 15 },
            "speed": "fast",
            "show_grid": false,
            "palette": { "food": "#FFFF00" }
        }"##;

        let config = GameConfig::from_json(raw).expect("config should parse");

        assert_eq!(
            config.screen,
            ScreenSize {
                width: 320,
                height: 240
            }
        );
        assert_eq!(
            config.grid,
            GridSize {
                width: 20,
                height: 15
            }
        );
        assert_eq!(config.speed, GameSpeed::Fast);
        assert_eq!(config.rules().update_interval_ms, 100);
        assert!(!config.show_grid);
        assert_eq!(config.palette.food, Rgb565::YELLOW);
        assert_eq!(config.palette.snake_head, DEFAULT_PALETTE.snake_head);
    }

    #[test]
    fn malformed_color_is_rejected() {
        let error = GameConfig::from_json(r#"{ "palette": { "food": "red" } }"#)
            .expect_err("non-hex color should fail");
        assert!(matches!(error, ConfigError::InvalidColor { .. }));
    }

    #[test]
    fn unknown_palette_entry_is_rejected() {
        let error = GameConfig::from_json(r##"{ "palette": { "lava": "#FF0000" } }"##)
            .expect_err("unknown entry should fail");
        assert!(matches!(error, ConfigError::UnknownPaletteEntry(_)));
    }

    #[test]
    fn layouts_that_do_not_divide_evenly_are_rejected() {
        let raw = r#"{ "grid": { "width": 30, "height": 30 } }"#;
        let error = GameConfig::from_json(raw).expect_err("640/30 is not an integer");
        assert!(matches!(error, ConfigError::InvalidLayout(_)));
    }

    #[test]
    fn oversized_grids_are_rejected() {
        let raw = r#"{ "grid": { "width": 80, "height": 60 } }"#;
        assert!(GameConfig::from_json(raw).is_err());
    }

    #[test]
    fn oversized_screens_are_rejected() {
        let raw = r#"{ "screen": { "width": 64000, "height": 48000 } }"#;
        let error = GameConfig::from_json(raw).expect_err("screen should be too large");
        assert!(matches!(error, ConfigError::InvalidLayout(_)));

        let raw = r#"{ "screen": { "width": 4000, "height": 3000 } }"#;
        let config = GameConfig::from_json(raw).expect("100px cells should be accepted");
        assert_eq!(config.cell_size(), 100);
    }

    #[test]
    fn missing_explicit_file_is_reported() {
        let path = unique_test_path("missing");

        let error = GameConfig::load(Some(&path)).expect_err("missing file should fail");

        assert!(matches!(
            error,
            ConfigError::Read { ref source, .. } if source.kind() == io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn config_file_is_loaded_from_disk() {
        let path = unique_test_path("load");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, r#"{ "speed": "slow", "debounce_ms": 50 }"#)
            .expect("test file write should succeed");

        let config = GameConfig::load(Some(&path)).expect("load should succeed");

        assert_eq!(config.speed, GameSpeed::Slow);
        assert_eq!(config.debounce_ms, 50);
        cleanup_test_path(&path);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("metal-snake-config-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
