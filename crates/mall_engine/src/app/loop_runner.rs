use std::sync::Arc;

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::floors::{Floor, FloorId, FloorRegistry};
use crate::geometry::Vec2;

use super::{hud_target_at, HudTarget, InteractionController, MapEvent, MapState, Renderer, Viewport};

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub start_floor: FloorId,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Mall Map".to_string(),
            window_width: 1000,
            window_height: 700,
            start_floor: FloorId::Outdoor,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: ViewerConfig, registry: FloorRegistry) -> Result<(), AppError> {
    let mut controller = InteractionController::new(registry, config.start_floor);
    info!(
        start_floor = %config.start_floor,
        floor_count = controller.registry().floors().len(),
        shop_count = controller.registry().shop_count(),
        "map_loaded"
    );

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let mut applied_title = window_title(&config.window_title, controller.active_floor());
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(applied_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    // Nothing animates; frames are produced only when an event changes what is shown.
    event_loop.set_control_flow(ControlFlow::Wait);
    info!(
        window_width = config.window_width,
        window_height = config.window_height,
        "viewer_config"
    );

    let mut input_collector = InputCollector::default();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                let mut map_events = Vec::new();
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                        window.request_redraw();
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window.inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                        window.request_redraw();
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        map_events.push(
                            input_collector
                                .handle_cursor_moved(Vec2::new(position.x as f32, position.y as f32)),
                        );
                    }
                    WindowEvent::CursorLeft { .. } => {
                        input_collector.clear_cursor_position();
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        map_events.extend(input_collector.handle_mouse_input(
                            button,
                            state,
                            controller.registry(),
                            controller.state(),
                            renderer.viewport(),
                        ));
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        map_events.extend(input_collector.handle_mouse_wheel(delta));
                    }
                    WindowEvent::Focused(false) => {
                        map_events.push(input_collector.handle_focus_lost());
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state == ElementState::Pressed && !event.repeat {
                            if is_quit_key(event.physical_key) {
                                info!(reason = "escape_key", "shutdown_requested");
                                window_target.exit();
                            } else if let Some(floor) =
                                floor_for_key(event.physical_key, controller.registry())
                            {
                                map_events.push(MapEvent::SelectFloor(floor));
                            }
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(error) = renderer.render(controller.registry(), controller.state())
                        {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                    }
                    _ => {}
                }

                match dispatch_map_events(&mut controller, &mut renderer, map_events) {
                    Ok(0) => {}
                    Ok(_) => {
                        let next_title =
                            window_title(&config.window_title, controller.active_floor());
                        if next_title != applied_title {
                            window.set_title(&next_title);
                            applied_title = next_title;
                        }
                    }
                    Err(error) => {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                }
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Receives one full frame per state change that asks for a redraw.
trait FrameSink {
    fn present(&mut self, registry: &FloorRegistry, state: &MapState) -> Result<(), PixelsError>;
}

impl FrameSink for Renderer {
    fn present(&mut self, registry: &FloorRegistry, state: &MapState) -> Result<(), PixelsError> {
        self.render(registry, state)
    }
}

/// Applies `events` in order and presents a frame after every one that requests it.
/// Returns how many frames were presented.
fn dispatch_map_events(
    controller: &mut InteractionController,
    sink: &mut impl FrameSink,
    events: impl IntoIterator<Item = MapEvent>,
) -> Result<usize, PixelsError> {
    let mut presented = 0;
    for event in events {
        if controller.handle(event) {
            sink.present(controller.registry(), controller.state())?;
            presented += 1;
        }
    }
    Ok(presented)
}

/// Turns raw pointer input into map events. Tracks the cursor, since winit reports
/// button and wheel events without a position.
#[derive(Debug, Default)]
struct InputCollector {
    cursor_position_px: Option<Vec2>,
    left_mouse_is_down: bool,
    press_consumed_by_hud: bool,
}

impl InputCollector {
    fn handle_cursor_moved(&mut self, position: Vec2) -> MapEvent {
        self.cursor_position_px = Some(position);
        MapEvent::PointerMove(position)
    }

    fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
    }

    fn handle_mouse_input(
        &mut self,
        button: MouseButton,
        state: ElementState,
        registry: &FloorRegistry,
        map_state: &MapState,
        viewport: Viewport,
    ) -> Vec<MapEvent> {
        if button != MouseButton::Left {
            return Vec::new();
        }
        match state {
            ElementState::Pressed => {
                if self.left_mouse_is_down {
                    return Vec::new();
                }
                let Some(cursor) = self.cursor_position_px else {
                    return Vec::new();
                };
                self.left_mouse_is_down = true;
                match hud_target_at(registry, map_state, viewport, cursor) {
                    Some(HudTarget::FloorButton(floor)) => {
                        debug!(floor = %floor, "floor_button_pressed");
                        self.press_consumed_by_hud = true;
                        vec![MapEvent::SelectFloor(floor)]
                    }
                    Some(HudTarget::Panel) => {
                        self.press_consumed_by_hud = true;
                        Vec::new()
                    }
                    None => vec![MapEvent::PointerDown(cursor)],
                }
            }
            ElementState::Released => {
                if !self.left_mouse_is_down {
                    return Vec::new();
                }
                self.left_mouse_is_down = false;
                if std::mem::take(&mut self.press_consumed_by_hud) {
                    return Vec::new();
                }
                let mut events = vec![MapEvent::PointerUp];
                if let Some(cursor) = self.cursor_position_px {
                    events.push(MapEvent::Click(cursor));
                }
                events
            }
        }
    }

    fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) -> Option<MapEvent> {
        let position = self.cursor_position_px?;
        let delta_y = wheel_delta_y(delta);
        (delta_y != 0.0).then_some(MapEvent::Wheel { position, delta_y })
    }

    fn handle_focus_lost(&mut self) -> MapEvent {
        self.left_mouse_is_down = false;
        self.press_consumed_by_hud = false;
        MapEvent::Blur
    }
}

/// winit reports scrolling up as a positive delta; map events use the opposite sign, so
/// a negative `delta_y` zooms in.
fn wheel_delta_y(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y,
        MouseScrollDelta::PixelDelta(position) => -(position.y as f32),
    }
}

fn is_quit_key(key: PhysicalKey) -> bool {
    matches!(key, PhysicalKey::Code(KeyCode::Escape))
}

/// Digit keys pick floors in selector order.
fn floor_for_key(key: PhysicalKey, registry: &FloorRegistry) -> Option<FloorId> {
    let index = match key {
        PhysicalKey::Code(KeyCode::Digit1) | PhysicalKey::Code(KeyCode::Numpad1) => 0,
        PhysicalKey::Code(KeyCode::Digit2) | PhysicalKey::Code(KeyCode::Numpad2) => 1,
        PhysicalKey::Code(KeyCode::Digit3) | PhysicalKey::Code(KeyCode::Numpad3) => 2,
        PhysicalKey::Code(KeyCode::Digit4) | PhysicalKey::Code(KeyCode::Numpad4) => 3,
        _ => return None,
    };
    registry.floors().get(index).map(|floor| floor.id)
}

fn window_title(base: &str, floor: &Floor) -> String {
    format!("{base} - {}", floor.display_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::floor_button_rects;

    const VIEWPORT_WIDTH: u32 = 1000;
    const VIEWPORT: Viewport = Viewport {
        width: VIEWPORT_WIDTH,
        height: 700,
    };

    fn registry() -> FloorRegistry {
        FloorRegistry::builtin().expect("builtin floors")
    }

    fn press_on(
        input: &mut InputCollector,
        registry: &FloorRegistry,
        map_state: &MapState,
    ) -> Vec<MapEvent> {
        input.handle_mouse_input(
            MouseButton::Left,
            ElementState::Pressed,
            registry,
            map_state,
            VIEWPORT,
        )
    }

    fn release_on(
        input: &mut InputCollector,
        registry: &FloorRegistry,
        map_state: &MapState,
    ) -> Vec<MapEvent> {
        input.handle_mouse_input(
            MouseButton::Left,
            ElementState::Released,
            registry,
            map_state,
            VIEWPORT,
        )
    }

    fn press(input: &mut InputCollector, registry: &FloorRegistry) -> Vec<MapEvent> {
        press_on(input, registry, &MapState::new(FloorId::Ground))
    }

    fn release(input: &mut InputCollector, registry: &FloorRegistry) -> Vec<MapEvent> {
        release_on(input, registry, &MapState::new(FloorId::Ground))
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<(FloorId, f32)>,
    }

    impl FrameSink for RecordingSink {
        fn present(
            &mut self,
            _registry: &FloorRegistry,
            state: &MapState,
        ) -> Result<(), PixelsError> {
            self.frames.push((state.active_floor, state.view.scale()));
            Ok(())
        }
    }

    #[test]
    fn press_and_release_over_map_emit_down_up_and_click() {
        let registry = registry();
        let mut input = InputCollector::default();
        let cursor = Vec2::new(300.0, 400.0);
        assert_eq!(input.handle_cursor_moved(cursor), MapEvent::PointerMove(cursor));

        assert_eq!(press(&mut input, &registry), vec![MapEvent::PointerDown(cursor)]);
        assert_eq!(
            release(&mut input, &registry),
            vec![MapEvent::PointerUp, MapEvent::Click(cursor)]
        );
    }

    #[test]
    fn press_on_floor_button_selects_floor_and_swallows_release() {
        let registry = registry();
        let mut input = InputCollector::default();
        let rect = floor_button_rects(VIEWPORT_WIDTH, registry.floors().len())[1];
        let cursor = Vec2::new((rect.left + 4) as f32, (rect.top + 4) as f32);
        input.handle_cursor_moved(cursor);

        assert_eq!(
            press(&mut input, &registry),
            vec![MapEvent::SelectFloor(FloorId::Ground)]
        );
        assert!(release(&mut input, &registry).is_empty());

        let map_point = Vec2::new(200.0, 300.0);
        input.handle_cursor_moved(map_point);
        assert_eq!(press(&mut input, &registry), vec![MapEvent::PointerDown(map_point)]);
    }

    #[test]
    fn press_on_info_panel_never_reaches_the_map() {
        let registry = registry();
        let mut controller = InteractionController::new(registry.clone(), FloorId::Ground);
        controller.handle(MapEvent::Click(Vec2::new(125.0, 125.0)));
        controller.handle(MapEvent::PointerDown(Vec2::new(0.0, 0.0)));
        controller.handle(MapEvent::PointerMove(Vec2::new(600.0, -70.0)));
        controller.handle(MapEvent::PointerUp);
        controller.handle(MapEvent::Click(Vec2::new(600.0, -70.0)));
        assert_eq!(
            controller.state().selection.as_ref().map(|s| s.shop_id.as_str()),
            Some("1-1")
        );

        let mut input = InputCollector::default();
        input.handle_cursor_moved(Vec2::new(800.0, 60.0));
        assert!(press_on(&mut input, &registry, controller.state()).is_empty());
        assert!(release_on(&mut input, &registry, controller.state()).is_empty());
        assert_eq!(
            controller.state().selection.as_ref().map(|s| s.shop_id.as_str()),
            Some("1-1")
        );
    }

    #[test]
    fn press_between_floor_buttons_is_swallowed() {
        let registry = registry();
        let mut input = InputCollector::default();
        let rects = floor_button_rects(VIEWPORT_WIDTH, registry.floors().len());
        input.handle_cursor_moved(Vec2::new((rects[0].left + rects[0].width + 4) as f32, 20.0));
        assert!(press(&mut input, &registry).is_empty());
        assert!(release(&mut input, &registry).is_empty());
    }

    #[test]
    fn every_redraw_request_presents_its_own_frame() {
        let mut controller = InteractionController::new(registry(), FloorId::Ground);
        let mut sink = RecordingSink::default();
        let wheel = MapEvent::Wheel {
            position: Vec2::new(500.0, 350.0),
            delta_y: -1.0,
        };
        let presented = dispatch_map_events(
            &mut controller,
            &mut sink,
            [wheel, wheel, wheel, MapEvent::SelectFloor(FloorId::Basement1)],
        )
        .expect("recording sink never fails");
        assert_eq!(presented, 4);
        assert_eq!(sink.frames.len(), 4);
        assert!(sink.frames[0].1 < sink.frames[1].1 && sink.frames[1].1 < sink.frames[2].1);
        assert_eq!(sink.frames[3].0, FloorId::Basement1);

        let quiet = dispatch_map_events(&mut controller, &mut sink, [MapEvent::PointerUp])
            .expect("recording sink never fails");
        assert_eq!(quiet, 0);
        assert_eq!(sink.frames.len(), 4);
    }

    #[test]
    fn stray_release_and_other_buttons_are_ignored() {
        let registry = registry();
        let mut input = InputCollector::default();
        input.handle_cursor_moved(Vec2::new(10.0, 500.0));
        assert!(release(&mut input, &registry).is_empty());
        let right = input.handle_mouse_input(
            MouseButton::Right,
            ElementState::Pressed,
            &registry,
            &MapState::new(FloorId::Ground),
            VIEWPORT,
        );
        assert!(right.is_empty());
    }

    #[test]
    fn release_after_cursor_left_still_ends_drag() {
        let registry = registry();
        let mut input = InputCollector::default();
        input.handle_cursor_moved(Vec2::new(400.0, 400.0));
        press(&mut input, &registry);
        input.clear_cursor_position();
        assert_eq!(release(&mut input, &registry), vec![MapEvent::PointerUp]);
    }

    #[test]
    fn focus_loss_emits_blur_and_resets_button_state() {
        let registry = registry();
        let mut input = InputCollector::default();
        input.handle_cursor_moved(Vec2::new(400.0, 400.0));
        press(&mut input, &registry);
        assert_eq!(input.handle_focus_lost(), MapEvent::Blur);
        assert!(release(&mut input, &registry).is_empty());
    }

    #[test]
    fn wheel_up_maps_to_negative_delta() {
        assert_eq!(wheel_delta_y(MouseScrollDelta::LineDelta(0.0, 1.0)), -1.0);
        assert_eq!(wheel_delta_y(MouseScrollDelta::LineDelta(0.0, -2.0)), 2.0);
        assert_eq!(
            wheel_delta_y(MouseScrollDelta::PixelDelta(
                winit::dpi::PhysicalPosition::new(0.0, 12.0)
            )),
            -12.0
        );
    }

    #[test]
    fn wheel_needs_cursor_and_non_zero_delta() {
        let mut input = InputCollector::default();
        assert_eq!(
            input.handle_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0)),
            None
        );
        let cursor = Vec2::new(500.0, 350.0);
        input.handle_cursor_moved(cursor);
        assert_eq!(
            input.handle_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 0.0)),
            None
        );
        assert_eq!(
            input.handle_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0)),
            Some(MapEvent::Wheel {
                position: cursor,
                delta_y: -1.0
            })
        );
    }

    #[test]
    fn digit_keys_select_floors_in_selector_order() {
        let registry = registry();
        let keys = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
        ];
        for (key, expected) in keys.into_iter().zip(FloorId::ALL) {
            assert_eq!(
                floor_for_key(PhysicalKey::Code(key), &registry),
                Some(expected)
            );
        }
        assert_eq!(
            floor_for_key(PhysicalKey::Code(KeyCode::Digit5), &registry),
            None
        );
        assert!(is_quit_key(PhysicalKey::Code(KeyCode::Escape)));
        assert!(!is_quit_key(PhysicalKey::Code(KeyCode::Digit1)));
    }

    #[test]
    fn window_title_names_active_floor() {
        let registry = registry();
        assert_eq!(
            window_title("Mall Map", registry.floor(FloorId::Basement2)),
            "Mall Map - Floor B2"
        );
    }

    #[test]
    fn default_config_opens_on_outdoor_view() {
        let config = ViewerConfig::default();
        assert_eq!(config.start_floor, FloorId::Outdoor);
        assert_eq!((config.window_width, config.window_height), (1000, 700));
    }
}
