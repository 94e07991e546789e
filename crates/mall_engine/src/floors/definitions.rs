use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{LineSegment, Region};

use super::{generate_shops, Floor, FloorId, FloorRegistry};

pub const BUILTIN_FLOORS_JSON: &str = include_str!("../../assets/floors.json");

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("parse floor definitions at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("floor '{0}' is defined more than once")]
    DuplicateFloor(FloorId),
    #[error("floor '{0}' is missing from the floor definitions")]
    MissingFloor(FloorId),
    #[error("floor '{floor}' generates duplicate shop id '{shop_id}'")]
    DuplicateShopId { floor: FloorId, shop_id: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FloorDocument {
    floors: Vec<FloorDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FloorDef {
    id: FloorId,
    display_name: String,
    #[serde(default)]
    walls: Vec<LineSegment>,
    #[serde(default)]
    passages: Vec<LineSegment>,
    #[serde(default)]
    shops: Option<ShopLayoutDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShopLayoutDef {
    count: u32,
    region: Region,
}

pub(super) fn parse_floor_definitions(raw: &str) -> Result<FloorRegistry, DefinitionError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let document: FloorDocument =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let path = error.path().to_string();
            DefinitionError::Parse {
                path,
                source: error.into_inner(),
            }
        })?;

    let floors = document
        .floors
        .into_iter()
        .map(|def| Floor {
            shops: def
                .shops
                .map(|layout| generate_shops(layout.count, layout.region, def.id))
                .unwrap_or_default(),
            id: def.id,
            display_name: def.display_name,
            walls: def.walls,
            passages: def.passages,
        })
        .collect();

    FloorRegistry::from_floors(floors)
}
