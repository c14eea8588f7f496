//! Per-template crop configuration.
//!
//! A [`CropConfig`] fixes the output aspect ratio, mask shape and output size
//! for one template. It is looked up once when a session starts and never
//! mutated afterwards. Validation happens here, at load time: an invalid
//! configuration is a programming error and never reaches the geometry
//! engine.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or deserializing a crop configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Aspect ratio must be finite and strictly positive.
    #[error("Invalid aspect ratio {0}: must be a finite number greater than zero")]
    InvalidAspectRatio(f64),

    /// The output bounding box needs at least one pixel.
    #[error("Invalid default size: must be at least 1 pixel")]
    InvalidDefaultSize,

    /// Border radius must be finite and non-negative.
    #[error("Invalid border radius {0}")]
    InvalidBorderRadius(f64),

    /// The safe-area color is not a CSS hex color.
    #[error("Invalid color '{0}': expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),
}

/// Mask shape drawn over the crop window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CropShape {
    /// Ellipse inscribed in the crop window.
    Circle,
    /// Square corners; aspect ratio comes from the config.
    Square,
    /// Rounded corners using `border_radius`.
    RoundedSquare,
    /// Plain rectangle.
    #[default]
    Rect,
}

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        let short = |idx: usize| channel(idx..idx + 1).map(|v| v * 17);

        match hex.len() {
            3 => Ok(Color::rgba(short(0)?, short(1)?, short(2)?, 255)),
            6 => Ok(Color::rgba(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Ok(Color::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

/// Safe-area guide settings for the crop window border.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafeArea {
    /// Draw the dashed inner guide.
    pub show_guide: bool,
    /// Border and guide color.
    pub color: Color,
}

impl Default for SafeArea {
    fn default() -> Self {
        Self {
            show_guide: true,
            color: Color::WHITE,
        }
    }
}

/// Pixel dimensions of the output raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

/// Crop configuration for one template.
///
/// Construct through [`CropConfig::new`] or deserialization; both validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCropConfig")]
pub struct CropConfig {
    aspect_ratio: f64,
    shape: CropShape,
    border_radius: f64,
    default_size: u32,
    safe_area: SafeArea,
}

/// Unvalidated wire form of [`CropConfig`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCropConfig {
    aspect_ratio: f64,
    #[serde(default)]
    shape: CropShape,
    #[serde(default)]
    border_radius: f64,
    #[serde(default = "default_output_edge")]
    default_size: u32,
    #[serde(default)]
    safe_area: SafeArea,
}

fn default_output_edge() -> u32 {
    400
}

impl TryFrom<RawCropConfig> for CropConfig {
    type Error = ConfigError;

    fn try_from(raw: RawCropConfig) -> Result<Self, Self::Error> {
        CropConfig::new(raw.aspect_ratio, raw.shape, raw.default_size)?
            .with_border_radius(raw.border_radius)
            .map(|config| config.with_safe_area(raw.safe_area))
    }
}

impl CropConfig {
    /// Create a validated configuration with default border radius and safe area.
    pub fn new(aspect_ratio: f64, shape: CropShape, default_size: u32) -> Result<Self, ConfigError> {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(ConfigError::InvalidAspectRatio(aspect_ratio));
        }
        if default_size == 0 {
            return Err(ConfigError::InvalidDefaultSize);
        }
        Ok(Self {
            aspect_ratio,
            shape,
            border_radius: 0.0,
            default_size,
            safe_area: SafeArea::default(),
        })
    }

    /// Set the corner radius used by [`CropShape::RoundedSquare`].
    pub fn with_border_radius(mut self, border_radius: f64) -> Result<Self, ConfigError> {
        if !border_radius.is_finite() || border_radius < 0.0 {
            return Err(ConfigError::InvalidBorderRadius(border_radius));
        }
        self.border_radius = border_radius;
        Ok(self)
    }

    pub fn with_safe_area(mut self, safe_area: SafeArea) -> Self {
        self.safe_area = safe_area;
        self
    }

    /// Output width divided by output height.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn shape(&self) -> CropShape {
        self.shape
    }

    /// Corner radius in output pixels.
    pub fn border_radius(&self) -> f64 {
        self.border_radius
    }

    /// Edge length of the square box the output raster fits in.
    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    pub fn safe_area(&self) -> &SafeArea {
        &self.safe_area
    }

    /// Size of the output raster: the largest box with this aspect ratio
    /// that fits in a `default_size` square.
    pub fn output_size(&self) -> OutputSize {
        let edge = f64::from(self.default_size);
        let (width, height) = if self.aspect_ratio >= 1.0 {
            (edge, edge / self.aspect_ratio)
        } else {
            (edge * self.aspect_ratio, edge)
        };
        OutputSize {
            width: (width.round() as u32).max(1),
            height: (height.round() as u32).max(1),
        }
    }
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            shape: CropShape::Rect,
            border_radius: 0.0,
            default_size: default_output_edge(),
            safe_area: SafeArea::default(),
        }
    }
}

/// Lookup from template id to crop configuration.
///
/// Unknown template ids resolve to the fallback configuration; the lookup
/// itself never fails.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, CropConfig>,
    fallback: CropConfig,
}

impl TemplateRegistry {
    pub fn new(fallback: CropConfig) -> Self {
        Self {
            templates: HashMap::new(),
            fallback,
        }
    }

    /// Register (or replace) the configuration for a template.
    pub fn insert(&mut self, template_id: impl Into<String>, config: CropConfig) {
        self.templates.insert(template_id.into(), config);
    }

    /// Configuration for `template_id`, or the fallback.
    pub fn crop_config(&self, template_id: &str) -> &CropConfig {
        self.templates.get(template_id).unwrap_or_else(|| {
            log::debug!("no crop config for template '{template_id}', using fallback");
            &self.fallback
        })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
