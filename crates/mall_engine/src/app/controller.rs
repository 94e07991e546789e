use tracing::{debug, info};

use crate::floors::{Floor, FloorId, FloorRegistry, Shop};
use crate::geometry::Vec2;

use super::view::{wheel_zoom_factor, ViewTransform};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Idle,
    Dragging {
        anchor: Vec2,
        moved: bool,
    },
    /// A drag that panned the map just ended. The click the platform reports for that
    /// release is swallowed, then the pointer is idle again.
    DragEnded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSelection {
    pub floor: FloorId,
    pub shop_id: String,
    pub shop_name: String,
}

/// Everything the map view mutates in response to input. Owned by exactly one controller.
#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    pub active_floor: FloorId,
    pub view: ViewTransform,
    pub pointer: PointerState,
    pub selection: Option<ShopSelection>,
}

impl Default for MapState {
    fn default() -> Self {
        Self::new(FloorId::Outdoor)
    }
}

impl MapState {
    pub fn new(active_floor: FloorId) -> Self {
        Self {
            active_floor,
            view: ViewTransform::default(),
            pointer: PointerState::Idle,
            selection: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.pointer, PointerState::Dragging { .. })
    }
}

/// Input in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
    /// The surface lost focus; ends any drag like a release would.
    Blur,
    Click(Vec2),
    Wheel { position: Vec2, delta_y: f32 },
    SelectFloor(FloorId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: MapState,
    pub render_requested: bool,
}

impl Transition {
    fn redraw(state: MapState) -> Self {
        Self {
            state,
            render_requested: true,
        }
    }

    fn quiet(state: MapState) -> Self {
        Self {
            state,
            render_requested: false,
        }
    }
}

pub fn handle_event(state: &MapState, registry: &FloorRegistry, event: MapEvent) -> Transition {
    let mut next = state.clone();
    match event {
        MapEvent::PointerDown(position) => {
            next.pointer = PointerState::Dragging {
                anchor: position,
                moved: false,
            };
            Transition::quiet(next)
        }
        MapEvent::PointerMove(position) => match state.pointer {
            PointerState::Idle | PointerState::DragEnded => Transition::quiet(next),
            PointerState::Dragging { anchor, moved } => {
                let dx = position.x - anchor.x;
                let dy = position.y - anchor.y;
                next.view.pan_by(dx, dy);
                next.pointer = PointerState::Dragging {
                    anchor: position,
                    moved: moved || dx != 0.0 || dy != 0.0,
                };
                Transition::redraw(next)
            }
        },
        MapEvent::PointerUp | MapEvent::Blur => {
            next.pointer = match state.pointer {
                PointerState::Dragging { moved: true, .. } => PointerState::DragEnded,
                PointerState::Dragging { moved: false, .. } => PointerState::Idle,
                other => other,
            };
            Transition::quiet(next)
        }
        MapEvent::Click(position) => {
            match state.pointer {
                PointerState::Dragging { .. } => return Transition::quiet(next),
                PointerState::DragEnded => {
                    next.pointer = PointerState::Idle;
                    return Transition::quiet(next);
                }
                PointerState::Idle => {}
            }
            let floor = registry.floor(state.active_floor);
            next.selection = hit_test(floor, &state.view, position).map(|shop| ShopSelection {
                floor: floor.id,
                shop_id: shop.id.clone(),
                shop_name: shop.name.clone(),
            });
            let changed = next.selection != state.selection;
            Transition {
                state: next,
                render_requested: changed,
            }
        }
        MapEvent::Wheel { position, delta_y } => {
            next.view.zoom_at(position, wheel_zoom_factor(delta_y));
            Transition::redraw(next)
        }
        MapEvent::SelectFloor(floor) => {
            next.active_floor = floor;
            next.selection = None;
            Transition::redraw(next)
        }
    }
}

/// Maps a surface point through the inverse view transform and returns the shop under it.
pub fn hit_test<'a>(
    floor: &'a Floor,
    view: &ViewTransform,
    screen: Vec2,
) -> Option<&'a Shop> {
    floor.shop_at(view.to_world(screen))
}

/// Owns the map state and the floor data it refers to.
#[derive(Debug)]
pub struct InteractionController {
    registry: FloorRegistry,
    state: MapState,
}

impl InteractionController {
    pub fn new(registry: FloorRegistry, start_floor: FloorId) -> Self {
        Self {
            registry,
            state: MapState::new(start_floor),
        }
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn registry(&self) -> &FloorRegistry {
        &self.registry
    }

    pub fn active_floor(&self) -> &Floor {
        self.registry.floor(self.state.active_floor)
    }

    /// Applies `event` and returns whether the surface must be redrawn.
    pub fn handle(&mut self, event: MapEvent) -> bool {
        let Transition {
            state,
            render_requested,
        } = handle_event(&self.state, &self.registry, event);

        if state.active_floor != self.state.active_floor {
            info!(
                from = %self.state.active_floor,
                to = %state.active_floor,
                display_name = self.registry.floor(state.active_floor).display_name.as_str(),
                "floor_switched"
            );
        }
        if state.selection != self.state.selection {
            match &state.selection {
                Some(selection) => info!(
                    floor = %selection.floor,
                    shop_id = selection.shop_id.as_str(),
                    shop_name = selection.shop_name.as_str(),
                    "shop_selected"
                ),
                None => debug!(floor = %state.active_floor, "shop_selection_cleared"),
            }
        }
        if state.view.scale() != self.state.view.scale() {
            debug!(scale = state.view.scale(), "view_zoomed");
        }

        self.state = state;
        render_requested
    }
}
