//! Core type definitions shared by the store, the pipeline, and the API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Level of the resource tree an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    /// Top-level collection under the tree root.
    Gallery,
    /// Sub-collection inside a gallery.
    Album,
    /// Leaf item inside an album.
    Image,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gallery => write!(f, "gallery"),
            Self::Album => write!(f, "album"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// Resampling filter used when deriving thumbnails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Nearest-neighbor sampling.
    NearestNeighbor,
    /// Bilinear (triangle) filter.
    Bilinear,
    /// Bicubic (Catmull-Rom) filter.
    Bicubic,
    /// Mitchell-Netravali cubic filter (B = C = 1/3).
    MitchellNetravali,
    /// Lanczos windowed sinc with two lobes.
    Lanczos2,
    /// Lanczos windowed sinc with three lobes.
    #[default]
    Lanczos3,
}

impl Interpolation {
    /// Returns all supported filters.
    pub fn all() -> &'static [Interpolation] {
        &[
            Interpolation::NearestNeighbor,
            Interpolation::Bilinear,
            Interpolation::Bicubic,
            Interpolation::MitchellNetravali,
            Interpolation::Lanczos2,
            Interpolation::Lanczos3,
        ]
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NearestNeighbor => write!(f, "nearest_neighbor"),
            Self::Bilinear => write!(f, "bilinear"),
            Self::Bicubic => write!(f, "bicubic"),
            Self::MitchellNetravali => write!(f, "mitchell_netravali"),
            Self::Lanczos2 => write!(f, "lanczos2"),
            Self::Lanczos3 => write!(f, "lanczos3"),
        }
    }
}

impl FromStr for Interpolation {
    type Err = String;

    /// Accepts the snake_case names as well as the CamelCase spellings
    /// (`NearestNeighbor`, `MitchellNetravali`, ...), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "nearestneighbor" | "nearest" => Ok(Self::NearestNeighbor),
            "bilinear" => Ok(Self::Bilinear),
            "bicubic" => Ok(Self::Bicubic),
            "mitchellnetravali" | "mitchell" => Ok(Self::MitchellNetravali),
            "lanczos2" => Ok(Self::Lanczos2),
            "lanczos3" => Ok(Self::Lanczos3),
            _ => Err(format!("unknown interpolation filter: {s}")),
        }
    }
}
