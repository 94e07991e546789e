pub mod app;
pub mod floors;
pub mod geometry;

pub use app::{
    compose_frame, handle_event, hit_test, render_floor, run_app, AppError, InteractionController,
    MapEvent, MapState, PointerState, Renderer, ShopSelection, Transition, ViewTransform,
    ViewerConfig, Viewport,
};
pub use floors::{
    generate_shops, ColorTag, DefinitionError, Floor, FloorError, FloorId, FloorRegistry, Shop,
};
pub use geometry::{LineSegment, Rect, Region, Vec2};
