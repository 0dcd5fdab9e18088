use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Structure kinds available in the builder inventory. Mirrors the catalog
/// JSON exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Box,
    MassiveBox,
    Cone,
    Wall,
    Floor,
    Window,
    Door,
}

impl StructureKind {
    /// Convert string identifier to kind for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "box" => Some(Self::Box),
            "massivebox" => Some(Self::MassiveBox),
            "cone" => Some(Self::Cone),
            "wall" => Some(Self::Wall),
            "floor" => Some(Self::Floor),
            "window" => Some(Self::Window),
            "door" => Some(Self::Door),
            _ => None,
        }
    }

    /// String identifier for frontend communication.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::MassiveBox => "massivebox",
            Self::Cone => "cone",
            Self::Wall => "wall",
            Self::Floor => "floor",
            Self::Window => "window",
            Self::Door => "door",
        }
    }

    /// Openings rotate to face outward when attached to a wall face.
    pub fn is_opening(self) -> bool {
        matches!(self, Self::Window | Self::Door)
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Allowed range and default for a single structure dimension (metres).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DimensionRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl DimensionRange {
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Per-axis dimension ranges. A template only declares the axes that make
/// sense for its kind (a cone has radius/height, a floor has width/depth).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DimensionRanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<DimensionRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<DimensionRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<DimensionRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<DimensionRange>,
}

/// One inventory entry: what can be placed and how big it may be.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureTemplate {
    pub kind: StructureKind,
    pub name: String,
    pub dimensions: DimensionRanges,
    pub colour: [f32; 3],
}

impl StructureTemplate {
    pub fn base_colour(&self) -> Color {
        Color::srgb(self.colour[0], self.colour[1], self.colour[2])
    }
}

/// Complete builder inventory as a Bevy asset. Mirrors the catalog JSON.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath)]
pub struct StructureCatalog {
    pub structures: Vec<StructureTemplate>,
}

impl StructureCatalog {
    /// Find a template by kind for runtime placement and RPC queries.
    pub fn by_kind(&self, kind: StructureKind) -> Option<&StructureTemplate> {
        self.structures.iter().find(|t| t.kind == kind)
    }
}
