mod definitions;
mod layout;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{LineSegment, Rect, Vec2};

pub use definitions::{DefinitionError, BUILTIN_FLOORS_JSON};
pub use layout::{generate_shops, SHOP_GUTTER, SHOP_HEIGHT, SHOP_INSET, SHOP_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum FloorId {
    #[serde(rename = "outdoor")]
    Outdoor,
    #[serde(rename = "1")]
    Ground,
    #[serde(rename = "-1")]
    Basement1,
    #[serde(rename = "-2")]
    Basement2,
}

impl FloorId {
    /// Selector order, matching the floor buttons left to right.
    pub const ALL: [FloorId; 4] = [
        FloorId::Outdoor,
        FloorId::Ground,
        FloorId::Basement1,
        FloorId::Basement2,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            FloorId::Outdoor => "outdoor",
            FloorId::Ground => "1",
            FloorId::Basement1 => "-1",
            FloorId::Basement2 => "-2",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            FloorId::Outdoor => 0,
            FloorId::Ground => 1,
            FloorId::Basement1 => 2,
            FloorId::Basement2 => 3,
        }
    }
}

impl fmt::Display for FloorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FloorError {
    #[error("unknown floor '{0}' (expected one of: outdoor, 1, -1, -2)")]
    UnknownFloor(String),
}

impl FromStr for FloorId {
    type Err = FloorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        FloorId::ALL
            .into_iter()
            .find(|id| id.key() == trimmed)
            .ok_or_else(|| FloorError::UnknownFloor(raw.to_string()))
    }
}

/// Fill tint of a shop, stored as an HSL hue so it stays a pure function of the shop index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorTag {
    pub hue_degrees: u16,
}

const COLOR_TAG_SATURATION: f32 = 0.7;
const COLOR_TAG_LIGHTNESS: f32 = 0.8;
const COLOR_TAG_HUE_STEP: u32 = 5;

impl ColorTag {
    pub fn for_index(index: u32) -> Self {
        Self {
            hue_degrees: (index.wrapping_mul(COLOR_TAG_HUE_STEP) % 360) as u16,
        }
    }

    pub fn rgba(self) -> [u8; 4] {
        let [r, g, b] = hsl_to_rgb(
            self.hue_degrees as f32,
            COLOR_TAG_SATURATION,
            COLOR_TAG_LIGHTNESS,
        );
        [r, g, b, 255]
    }
}

fn hsl_to_rgb(hue_degrees: f32, saturation: f32, lightness: f32) -> [u8; 3] {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = (hue_degrees.rem_euclid(360.0)) / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma * 0.5;
    let channel = |value: f32| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [channel(r), channel(g), channel(b)]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shop {
    pub id: String,
    pub index: u32,
    pub name: String,
    pub bounds: Rect,
    pub color: ColorTag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    pub id: FloorId,
    pub display_name: String,
    pub shops: Vec<Shop>,
    pub walls: Vec<LineSegment>,
    pub passages: Vec<LineSegment>,
}

impl Floor {
    /// First shop in generation order whose box contains `world`.
    pub fn shop_at(&self, world: Vec2) -> Option<&Shop> {
        self.shops.iter().find(|shop| shop.bounds.contains(world))
    }

    pub fn find_shop(&self, shop_id: &str) -> Option<&Shop> {
        self.shops.iter().find(|shop| shop.id == shop_id)
    }

    /// Bounding box of the wall segments, if the floor has any.
    pub fn wall_bounds(&self) -> Option<Rect> {
        let mut walls = self.walls.iter();
        let first = walls.next()?;
        let mut min_x = first.x1.min(first.x2);
        let mut max_x = first.x1.max(first.x2);
        let mut min_y = first.y1.min(first.y2);
        let mut max_y = first.y1.max(first.y2);
        for wall in walls {
            min_x = min_x.min(wall.x1.min(wall.x2));
            max_x = max_x.max(wall.x1.max(wall.x2));
            min_y = min_y.min(wall.y1.min(wall.y2));
            max_y = max_y.max(wall.y1.max(wall.y2));
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// All floors of the mall, one per [`FloorId`], stored in selector order.
#[derive(Debug, Clone)]
pub struct FloorRegistry {
    floors: Vec<Floor>,
}

impl FloorRegistry {
    pub fn builtin() -> Result<Self, DefinitionError> {
        definitions::parse_floor_definitions(BUILTIN_FLOORS_JSON)
    }

    pub fn from_json(raw: &str) -> Result<Self, DefinitionError> {
        definitions::parse_floor_definitions(raw)
    }

    pub(crate) fn from_floors(floors: Vec<Floor>) -> Result<Self, DefinitionError> {
        let mut slots: Vec<Option<Floor>> = FloorId::ALL.iter().map(|_| None).collect();
        for floor in floors {
            let slot = &mut slots[floor.id.index()];
            if slot.is_some() {
                return Err(DefinitionError::DuplicateFloor(floor.id));
            }
            let mut seen = std::collections::HashSet::new();
            for shop in &floor.shops {
                if !seen.insert(shop.id.as_str()) {
                    return Err(DefinitionError::DuplicateShopId {
                        floor: floor.id,
                        shop_id: shop.id.clone(),
                    });
                }
            }
            *slot = Some(floor);
        }

        let mut ordered = Vec::with_capacity(slots.len());
        for (id, slot) in FloorId::ALL.into_iter().zip(slots) {
            ordered.push(slot.ok_or(DefinitionError::MissingFloor(id))?);
        }
        Ok(Self { floors: ordered })
    }

    pub fn floor(&self, id: FloorId) -> &Floor {
        &self.floors[id.index()]
    }

    pub fn lookup(&self, key: &str) -> Result<&Floor, FloorError> {
        let id = key.parse::<FloorId>()?;
        Ok(self.floor(id))
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn shop_count(&self) -> usize {
        self.floors.iter().map(|floor| floor.shops.len()).sum()
    }
}
