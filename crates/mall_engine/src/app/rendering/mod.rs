mod floor_draw;
mod hud;
mod raster;
mod renderer;
mod text;

pub use floor_draw::render_floor;
pub use hud::{draw_hud, floor_button_at, floor_button_rects, hud_target_at, HudTarget, ScreenRect};
pub use renderer::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Draws a complete frame: the active floor under the current view, then the HUD.
pub fn compose_frame(
    frame: &mut [u8],
    viewport: Viewport,
    registry: &crate::floors::FloorRegistry,
    state: &crate::app::MapState,
) {
    let floor = registry.floor(state.active_floor);
    render_floor(frame, viewport.width, viewport.height, floor, &state.view);
    draw_hud(frame, viewport.width, viewport.height, registry, state);
}
