//! Typed configuration for maze generation and rendering.
//!
//! Every struct here is validated when it is built, so a value that exists is a value
//! the algorithms can use. All validation happens before any grid is allocated.

use std::fmt;
use std::str::FromStr;

use error_chain::bail;
use serde_derive::Deserialize;

use crate::colours::{self, Rgb8, BLACK, WHITE};
use crate::errors::*;
use crate::units::{Height, PixelSize, Width};

pub const DEFAULT_WEIGHT_HIGH: i32 = 99;
pub const DEFAULT_WEIGHT_LOW: i32 = 97;
pub const DEFAULT_WEIGHT_BRAID: i32 = -1;
pub const DEFAULT_MIN_DISTANCE_RATIO: f64 = 0.30;
pub const DEFAULT_PLACEMENT_ATTEMPTS: usize = 50;
pub const DEFAULT_PIXEL_SIZE: u32 = 10;
pub const DEFAULT_MAZE_NAME: &str = "GeneratedMaze";

/// Uniform random frontier selection. There is nothing to tune.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SimpleConfig;

/// Frontier selection bias for the growing tree carve.
///
/// The most recently added frontier cell is picked with probability
/// `weight_high / (weight_high + weight_low)`, otherwise a uniformly random one.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GrowingTreeConfig {
    weight_high: u8,
    weight_low: u8,
}

impl GrowingTreeConfig {
    pub fn new(weight_high: i32, weight_low: i32) -> Result<GrowingTreeConfig> {
        let check = |name: &str, weight: i32| -> Result<u8> {
            if (0..=100).contains(&weight) {
                Ok(weight as u8)
            } else {
                bail!(ErrorKind::InvalidAlgorithmSetting(
                    format!("{} must be within 0..=100, got {}", name, weight)))
            }
        };
        let weight_high = check("weight_high", weight_high)?;
        let weight_low = check("weight_low", weight_low)?;
        if weight_high == 0 && weight_low == 0 {
            bail!(ErrorKind::InvalidAlgorithmSetting(
                "weight_high and weight_low cannot both be 0".to_owned()));
        }
        Ok(GrowingTreeConfig { weight_high, weight_low })
    }

    #[inline]
    pub fn weight_high(&self) -> u8 {
        self.weight_high
    }

    #[inline]
    pub fn weight_low(&self) -> u8 {
        self.weight_low
    }

    /// Chance of picking the newest frontier cell rather than a random one.
    pub fn most_recent_probability(&self) -> f64 {
        let high = f64::from(self.weight_high);
        high / (high + f64::from(self.weight_low))
    }
}

impl Default for GrowingTreeConfig {
    fn default() -> GrowingTreeConfig {
        GrowingTreeConfig {
            weight_high: DEFAULT_WEIGHT_HIGH as u8,
            weight_low: DEFAULT_WEIGHT_LOW as u8,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BraidMode {
    /// `weight_braid == 0`: the perfect maze is left alone.
    Disabled,
    /// `weight_braid == -1`: every dead end gets a second passage where possible.
    RemoveDeadEnds,
    /// `weight_braid` in 1..=100: every closed interior wall opens with this percentage chance.
    Loops(u8),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BraidConfig {
    weight_braid: i8,
}

impl BraidConfig {
    pub fn new(weight_braid: i32) -> Result<BraidConfig> {
        if (-1..=100).contains(&weight_braid) {
            Ok(BraidConfig { weight_braid: weight_braid as i8 })
        } else {
            bail!(ErrorKind::InvalidAlgorithmSetting(
                format!("weight_braid must be -1 or within 0..=100, got {}", weight_braid)))
        }
    }

    #[inline]
    pub fn weight_braid(&self) -> i8 {
        self.weight_braid
    }

    pub fn mode(&self) -> BraidMode {
        match self.weight_braid {
            -1 => BraidMode::RemoveDeadEnds,
            0 => BraidMode::Disabled,
            percent => BraidMode::Loops(percent as u8),
        }
    }
}

impl Default for BraidConfig {
    fn default() -> BraidConfig {
        BraidConfig { weight_braid: DEFAULT_WEIGHT_BRAID as i8 }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AlgorithmKind {
    Simple,
    GrowingTree,
    Braided,
}

impl FromStr for AlgorithmKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<AlgorithmKind> {
        match s {
            "simple" => Ok(AlgorithmKind::Simple),
            "growing_tree" => Ok(AlgorithmKind::GrowingTree),
            "braided" => Ok(AlgorithmKind::Braided),
            other => bail!(ErrorKind::InvalidAlgorithmSetting(
                format!("unknown algorithm '{}', expected simple, growing_tree or braided", other))),
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            AlgorithmKind::Simple => "simple",
            AlgorithmKind::GrowingTree => "growing_tree",
            AlgorithmKind::Braided => "braided",
        };
        write!(f, "{}", name)
    }
}

/// A fully validated carving (and optional braiding) recipe.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Algorithm {
    Simple(SimpleConfig),
    GrowingTree(GrowingTreeConfig),
    /// Growing tree carve followed by braiding.
    Braided(GrowingTreeConfig, BraidConfig),
}

impl Algorithm {
    pub fn from_settings(kind: AlgorithmKind, settings: &AlgorithmSettings) -> Result<Algorithm> {
        Ok(match kind {
            AlgorithmKind::Simple => Algorithm::Simple(SimpleConfig),
            AlgorithmKind::GrowingTree => Algorithm::GrowingTree(settings.growing_tree()?),
            AlgorithmKind::Braided => {
                Algorithm::Braided(settings.growing_tree()?, BraidConfig::new(settings.weight_braid)?)
            }
        })
    }

    pub fn kind(&self) -> AlgorithmKind {
        match *self {
            Algorithm::Simple(_) => AlgorithmKind::Simple,
            Algorithm::GrowingTree(_) => AlgorithmKind::GrowingTree,
            Algorithm::Braided(..) => AlgorithmKind::Braided,
        }
    }
}

impl Default for Algorithm {
    fn default() -> Algorithm {
        Algorithm::GrowingTree(GrowingTreeConfig::default())
    }
}

/// The loosely typed algorithm settings dictionary. Missing keys take their defaults;
/// values are only range checked when turned into an `Algorithm`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlgorithmSettings {
    #[serde(alias = "weighHigh", alias = "weightHigh")]
    pub weight_high: i32,
    #[serde(alias = "weightLow")]
    pub weight_low: i32,
    #[serde(alias = "weightBraid")]
    pub weight_braid: i32,
}

impl AlgorithmSettings {
    fn growing_tree(&self) -> Result<GrowingTreeConfig> {
        GrowingTreeConfig::new(self.weight_high, self.weight_low)
    }
}

impl Default for AlgorithmSettings {
    fn default() -> AlgorithmSettings {
        AlgorithmSettings {
            weight_high: DEFAULT_WEIGHT_HIGH,
            weight_low: DEFAULT_WEIGHT_LOW,
            weight_braid: DEFAULT_WEIGHT_BRAID,
        }
    }
}

/// Which border of the grid the entry or exit must sit on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
pub enum WallSide {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
    Any,
}

impl Default for WallSide {
    fn default() -> WallSide {
        WallSide::Any
    }
}

impl FromStr for WallSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<WallSide> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(WallSide::North),
            "s" | "south" => Ok(WallSide::South),
            "e" | "east" => Ok(WallSide::East),
            "w" | "west" => Ok(WallSide::West),
            "any" => Ok(WallSide::Any),
            _ => bail!(ErrorKind::InvalidAlgorithmSetting(
                format!("unknown wall side '{}', expected N, S, E, W or Any", s))),
        }
    }
}

/// Entry/exit placement constraints.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlacementConfig {
    start_wall: WallSide,
    end_wall: WallSide,
    min_distance_ratio: f64,
    max_attempts: usize,
}

impl PlacementConfig {
    pub fn new(start_wall: WallSide,
               end_wall: WallSide,
               min_distance_ratio: f64,
               max_attempts: usize)
               -> Result<PlacementConfig> {
        if !min_distance_ratio.is_finite() || min_distance_ratio < 0.0 {
            bail!(ErrorKind::InvalidAlgorithmSetting(
                format!("minimum distance ratio must be a finite value >= 0, got {}",
                        min_distance_ratio)));
        }
        if max_attempts == 0 {
            bail!(ErrorKind::InvalidAlgorithmSetting(
                "placement needs at least one attempt".to_owned()));
        }
        Ok(PlacementConfig {
            start_wall,
            end_wall,
            min_distance_ratio,
            max_attempts,
        })
    }

    #[inline]
    pub fn start_wall(&self) -> WallSide {
        self.start_wall
    }

    #[inline]
    pub fn end_wall(&self) -> WallSide {
        self.end_wall
    }

    #[inline]
    pub fn min_distance_ratio(&self) -> f64 {
        self.min_distance_ratio
    }

    #[inline]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

impl Default for PlacementConfig {
    fn default() -> PlacementConfig {
        PlacementConfig {
            start_wall: WallSide::Any,
            end_wall: WallSide::Any,
            min_distance_ratio: DEFAULT_MIN_DISTANCE_RATIO,
            max_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
        }
    }
}

/// Everything needed to build one maze.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeOptions {
    pub width: Width,
    pub height: Height,
    pub name: String,
    pub algorithm: Algorithm,
    pub placement: PlacementConfig,
    /// Fixed seed for reproducible mazes. A random seed is drawn when None.
    pub seed: Option<u64>,
}

impl MazeOptions {
    pub fn new(width: Width, height: Height) -> MazeOptions {
        MazeOptions {
            width,
            height,
            name: DEFAULT_MAZE_NAME.to_owned(),
            algorithm: Algorithm::default(),
            placement: PlacementConfig::default(),
            seed: None,
        }
    }

    /// Build options from the dictionary style inputs, failing on the first invalid one.
    pub fn from_settings(width: usize,
                         height: usize,
                         name: &str,
                         algorithm: &str,
                         settings: &AlgorithmSettings)
                         -> Result<MazeOptions> {
        let kind = algorithm.parse::<AlgorithmKind>()?;
        let options = MazeOptions {
            name: name.to_owned(),
            algorithm: Algorithm::from_settings(kind, settings)?,
            ..MazeOptions::new(Width(width), Height(height))
        };
        options.validate()?;
        Ok(options)
    }

    pub fn with_name(mut self, name: &str) -> MazeOptions {
        self.name = name.to_owned();
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> MazeOptions {
        self.algorithm = algorithm;
        self
    }

    pub fn with_placement(mut self, placement: PlacementConfig) -> MazeOptions {
        self.placement = placement;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> MazeOptions {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let (Width(w), Height(h)) = (self.width, self.height);
        if w < 1 || h < 1 {
            bail!(ErrorKind::InvalidDimension(w, h));
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
pub enum ImageMode {
    /// Black and white only. Colours are given as 0 (black) or 1 (white).
    #[serde(rename = "1")]
    Bilevel,
    #[serde(rename = "RGB")]
    Rgb,
}

impl Default for ImageMode {
    fn default() -> ImageMode {
        ImageMode::Rgb
    }
}

impl FromStr for ImageMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<ImageMode> {
        match s {
            "1" => Ok(ImageMode::Bilevel),
            "RGB" | "rgb" => Ok(ImageMode::Rgb),
            other => bail!(ErrorKind::InvalidRenderSetting(
                format!("unknown image mode '{}', expected \"1\" or \"RGB\"", other))),
        }
    }
}

/// A colour as the caller wrote it: a name/hex string, a channel tuple or a 1 bit level.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColourSpec {
    Level(i64),
    Channels(i64, i64, i64),
    Name(String),
}

impl ColourSpec {
    pub fn named(name: &str) -> ColourSpec {
        ColourSpec::Name(name.to_owned())
    }

    fn resolve(&self, mode: ImageMode, which: &str) -> Result<Rgb8> {
        let invalid = |reason: String| -> Error {
            ErrorKind::InvalidRenderSetting(format!("{}: {}", which, reason)).into()
        };

        match (mode, self) {
            (ImageMode::Bilevel, &ColourSpec::Level(0)) => Ok(BLACK),
            (ImageMode::Bilevel, &ColourSpec::Level(1)) => Ok(WHITE),
            (ImageMode::Bilevel, &ColourSpec::Name(ref name)) => {
                match colours::parse_colour(name) {
                    Some(BLACK) => Ok(BLACK),
                    Some(WHITE) => Ok(WHITE),
                    _ => Err(invalid(format!("mode \"1\" only allows black or white, got '{}'", name))),
                }
            }
            (ImageMode::Bilevel, other) => {
                Err(invalid(format!("mode \"1\" colours must be 0 (black) or 1 (white), got {:?}",
                                    other)))
            }
            (ImageMode::Rgb, &ColourSpec::Name(ref name)) => {
                colours::parse_colour(name)
                    .ok_or_else(|| invalid(format!("unrecognised colour name '{}'", name)))
            }
            (ImageMode::Rgb, &ColourSpec::Channels(r, g, b)) => {
                let channel = |value: i64| -> Result<u8> {
                    if (0..=255).contains(&value) {
                        Ok(value as u8)
                    } else {
                        Err(invalid(format!("colour channels must be within 0..=255, got {}", value)))
                    }
                };
                Ok([channel(r)?, channel(g)?, channel(b)?])
            }
            (ImageMode::Rgb, &ColourSpec::Level(level)) => {
                Err(invalid(format!("mode \"RGB\" needs a colour name or (r, g, b), got {}", level)))
            }
        }
    }
}

/// The loosely typed image settings dictionary.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageSettings {
    pub mode: ImageMode,
    pub wall_color: ColourSpec,
    pub floor_color: ColourSpec,
    pub pixel_size: u32,
}

impl Default for ImageSettings {
    fn default() -> ImageSettings {
        ImageSettings {
            mode: ImageMode::Rgb,
            wall_color: ColourSpec::named("Black"),
            floor_color: ColourSpec::named("White"),
            pixel_size: DEFAULT_PIXEL_SIZE,
        }
    }
}

impl ImageSettings {
    pub fn validate(&self) -> Result<ImageStyle> {
        if self.pixel_size == 0 {
            bail!(ErrorKind::InvalidRenderSetting("pixel_size must be a positive integer".to_owned()));
        }
        Ok(ImageStyle {
            mode: self.mode,
            wall: self.wall_color.resolve(self.mode, "wall_color")?,
            floor: self.floor_color.resolve(self.mode, "floor_color")?,
            pixel_size: PixelSize(self.pixel_size),
        })
    }
}

/// Image settings after validation, with colours resolved to channels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ImageStyle {
    pub mode: ImageMode,
    pub wall: Rgb8,
    pub floor: Rgb8,
    pub pixel_size: PixelSize,
}

/// What `generate_maze` should hand back.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputMode {
    /// Nested rows of `#`, ` `, `S` and `E` characters.
    List,
    /// Nested rows with floor replaced by the step count from the entry.
    Distances,
    /// Nested rows of tile, step count and open direction records. Named "dict".
    Detailed,
    Image(ImageStyle),
}

impl OutputMode {
    /// Parse an output mode name, validating the image settings when the mode is "image".
    pub fn from_settings(mode: &str, image_settings: &ImageSettings) -> Result<OutputMode> {
        match mode {
            "list" => Ok(OutputMode::List),
            "distances" => Ok(OutputMode::Distances),
            "dict" => Ok(OutputMode::Detailed),
            "image" => Ok(OutputMode::Image(image_settings.validate()?)),
            other => bail!(ErrorKind::InvalidRenderSetting(
                format!("unknown output mode '{}', expected list, distances, dict or image",
                        other))),
        }
    }
}
