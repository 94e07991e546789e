mod controller;
mod loop_runner;
mod rendering;
mod view;

pub use controller::{
    handle_event, hit_test, InteractionController, MapEvent, MapState, PointerState,
    ShopSelection, Transition,
};
pub use loop_runner::{run_app, AppError, ViewerConfig};
pub use rendering::{
    compose_frame, draw_hud, floor_button_at, floor_button_rects, hud_target_at, render_floor,
    HudTarget, Renderer, ScreenRect, Viewport,
};
pub use view::{
    wheel_zoom_factor, ViewTransform, VIEW_SCALE_DEFAULT, VIEW_SCALE_MAX, VIEW_SCALE_MIN,
    WHEEL_ZOOM_IN_FACTOR, WHEEL_ZOOM_OUT_FACTOR,
};
