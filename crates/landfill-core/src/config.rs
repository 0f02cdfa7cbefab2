use crate::error::{LandfillError, Result};
use crate::model::{AtlasSize, Size};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

bitflags::bitflags! {
    /// Packer behavior flags.
    ///
    /// Default is `ROTATE_PORTRAIT | WIDEST_FIRST`. Flags can be changed
    /// between particular `add()` calls.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LandfillFlags: u32 {
        /// Rotate all items to a portrait orientation. Exclusive with
        /// `ROTATE_LANDSCAPE`; if neither is set, keeps the original orientation.
        const ROTATE_PORTRAIT = 1 << 0;
        /// Rotate all items to a landscape orientation. Exclusive with
        /// `ROTATE_PORTRAIT`.
        const ROTATE_LANDSCAPE = 1 << 1;
        /// Sort same-height items widest first. Exclusive with
        /// `NARROWEST_FIRST`; if neither is set, same-height items keep their
        /// original order.
        const WIDEST_FIRST = 1 << 2;
        /// Sort same-height items narrowest first. Exclusive with `WIDEST_FIRST`.
        const NARROWEST_FIRST = 1 << 3;
        /// When a row hits the edge, always fill the next one in reverse
        /// direction. By default the direction is reversed only if the
        /// previous row ended lower than it started.
        const REVERSE_DIRECTION_ALWAYS = 1 << 4;
    }
}

impl Default for LandfillFlags {
    fn default() -> Self {
        Self::ROTATE_PORTRAIT | Self::WIDEST_FIRST
    }
}

impl LandfillFlags {
    /// Rejects mutually exclusive combinations.
    pub fn validate(self) -> Result<()> {
        if self.contains(Self::ROTATE_PORTRAIT | Self::ROTATE_LANDSCAPE) {
            return Err(LandfillError::ConflictingOrientation);
        }
        if self.contains(Self::WIDEST_FIRST | Self::NARROWEST_FIRST) {
            return Err(LandfillError::ConflictingTieBreak);
        }
        Ok(())
    }

    /// True if either rotation flag is set, i.e. `add()` needs a rotations output.
    pub fn rotates(self) -> bool {
        self.intersects(Self::ROTATE_PORTRAIT | Self::ROTATE_LANDSCAPE)
    }

    pub fn orientation(self) -> Orientation {
        if self.contains(Self::ROTATE_PORTRAIT) {
            Orientation::Portrait
        } else if self.contains(Self::ROTATE_LANDSCAPE) {
            Orientation::Landscape
        } else {
            Orientation::Keep
        }
    }

    pub fn tie_break(self) -> TieBreak {
        if self.contains(Self::NARROWEST_FIRST) {
            TieBreak::NarrowestFirst
        } else if self.contains(Self::WIDEST_FIRST) {
            TieBreak::WidestFirst
        } else {
            TieBreak::Original
        }
    }
}

/// Orientation normalization applied before sorting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Keep every item as given; no rotations are reported.
    #[serde(alias = "none")]
    Keep,
    /// Make every item at least as tall as it is wide.
    Portrait,
    /// Make every item at least as wide as it is tall.
    Landscape,
}

impl Orientation {
    pub fn flags(self) -> LandfillFlags {
        match self {
            Self::Keep => LandfillFlags::empty(),
            Self::Portrait => LandfillFlags::ROTATE_PORTRAIT,
            Self::Landscape => LandfillFlags::ROTATE_LANDSCAPE,
        }
    }
}

impl FromStr for Orientation {
    type Err = LandfillError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep" | "none" => Ok(Self::Keep),
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(LandfillError::InvalidConfig(format!(
                "unknown orientation: {other}"
            ))),
        }
    }
}

/// Ordering among items of the same height.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the input order.
    #[serde(alias = "none")]
    Original,
    #[serde(alias = "widest")]
    WidestFirst,
    #[serde(alias = "narrowest")]
    NarrowestFirst,
}

impl TieBreak {
    pub fn flags(self) -> LandfillFlags {
        match self {
            Self::Original => LandfillFlags::empty(),
            Self::WidestFirst => LandfillFlags::WIDEST_FIRST,
            Self::NarrowestFirst => LandfillFlags::NARROWEST_FIRST,
        }
    }
}

impl FromStr for TieBreak {
    type Err = LandfillError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" | "none" => Ok(Self::Original),
            "widest" | "widest_first" => Ok(Self::WidestFirst),
            "narrowest" | "narrowest_first" => Ok(Self::NarrowestFirst),
            other => Err(LandfillError::InvalidConfig(format!(
                "unknown tie break: {other}"
            ))),
        }
    }
}

/// Serializable description of a packer: atlas bounds plus behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandfillConfig {
    /// Atlas width in pixels. Always bounded.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Atlas (layer) height in pixels. `None` is unbounded.
    #[serde(default)]
    pub height: Option<u32>,
    /// Number of layers. `None` is unbounded, `Some(1)` a non-array atlas.
    #[serde(default = "default_depth")]
    pub depth: Option<u32>,
    /// Padding around each item, applied on both sides before rotation.
    #[serde(default)]
    pub padding: (u32, u32),
    #[serde(default = "default_orientation")]
    pub orientation: Orientation,
    #[serde(default = "default_tie_break")]
    pub tie_break: TieBreak,
    #[serde(default)]
    pub reverse_direction_always: bool,
}

impl Default for LandfillConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: None,
            depth: default_depth(),
            padding: (0, 0),
            orientation: default_orientation(),
            tie_break: default_tie_break(),
            reverse_direction_always: false,
        }
    }
}

impl LandfillConfig {
    pub fn size(&self) -> AtlasSize {
        AtlasSize::new(self.width, self.height, self.depth)
    }

    pub fn padding(&self) -> Size {
        Size::new(self.padding.0, self.padding.1)
    }

    pub fn flags(&self) -> LandfillFlags {
        let mut flags = self.orientation.flags() | self.tie_break.flags();
        if self.reverse_direction_always {
            flags |= LandfillFlags::REVERSE_DIRECTION_ALWAYS;
        }
        flags
    }

    /// Validates the configuration parameters.
    ///
    /// Returns an error if the atlas bounds violate the constructor
    /// preconditions, or if the padding alone doesn't fit into the atlas.
    pub fn validate(&self) -> Result<()> {
        self.size().validate()?;

        let padded_w = self.padding.0.saturating_mul(2);
        if padded_w >= self.width {
            return Err(LandfillError::InvalidConfig(format!(
                "padding ({}) * 2 leaves no space in atlas width {}",
                self.padding.0, self.width
            )));
        }
        if let Some(height) = self.height {
            if self.padding.1.saturating_mul(2) >= height {
                return Err(LandfillError::InvalidConfig(format!(
                    "padding ({}) * 2 leaves no space in atlas height {}",
                    self.padding.1, height
                )));
            }
        }
        Ok(())
    }

    /// Create a fluent builder for `LandfillConfig`.
    pub fn builder() -> LandfillConfigBuilder {
        LandfillConfigBuilder::new()
    }
}

fn default_width() -> u32 {
    1024
}
fn default_depth() -> Option<u32> {
    Some(1)
}
fn default_orientation() -> Orientation {
    Orientation::Portrait
}
fn default_tie_break() -> TieBreak {
    TieBreak::WidestFirst
}

/// Builder for `LandfillConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct LandfillConfigBuilder {
    cfg: LandfillConfig,
}

impl LandfillConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: LandfillConfig::default(),
        }
    }
    pub fn width(mut self, v: u32) -> Self {
        self.cfg.width = v;
        self
    }
    pub fn height(mut self, v: Option<u32>) -> Self {
        self.cfg.height = v;
        self
    }
    pub fn depth(mut self, v: Option<u32>) -> Self {
        self.cfg.depth = v;
        self
    }
    pub fn size(mut self, v: AtlasSize) -> Self {
        self.cfg.width = v.width;
        self.cfg.height = v.height;
        self.cfg.depth = v.depth;
        self
    }
    pub fn padding(mut self, x: u32, y: u32) -> Self {
        self.cfg.padding = (x, y);
        self
    }
    pub fn orientation(mut self, v: Orientation) -> Self {
        self.cfg.orientation = v;
        self
    }
    pub fn tie_break(mut self, v: TieBreak) -> Self {
        self.cfg.tie_break = v;
        self
    }
    pub fn reverse_direction_always(mut self, v: bool) -> Self {
        self.cfg.reverse_direction_always = v;
        self
    }
    pub fn build(self) -> LandfillConfig {
        self.cfg
    }
}
