use crate::app::ViewTransform;
use crate::floors::{Floor, FloorId, Shop};
use crate::geometry::{LineSegment, Rect, Vec2};

use super::raster::{
    clear_frame, fill_rect_px, fill_upper_half_disc_px, stroke_line_px, stroke_rect_px,
};
use super::text::{draw_text_centered_px, draw_text_px, scale_for_font_px};

pub(crate) const CLEAR_COLOR: [u8; 4] = [255, 255, 255, 255];
const BACKGROUND_RECT: Rect = Rect::new(50.0, 50.0, 900.0, 600.0);
const INDOOR_BACKGROUND_COLOR: [u8; 4] = [249, 249, 249, 255];
const OUTDOOR_GROUND_COLOR: [u8; 4] = [224, 247, 250, 255];

const WALL_COLOR: [u8; 4] = [51, 51, 51, 255];
const WALL_WIDTH: f32 = 3.0;
const PASSAGE_COLOR: [u8; 4] = [153, 153, 153, 255];
const PASSAGE_WIDTH: f32 = 2.0;
const SHOP_BORDER_COLOR: [u8; 4] = [102, 102, 102, 255];
const SHOP_BORDER_WIDTH: f32 = 2.0;
const SHOP_LABEL_COLOR: [u8; 4] = [51, 51, 51, 255];
const SHOP_LABEL_FONT_PX: f32 = 10.0;
const FLOOR_TITLE_COLOR: [u8; 4] = [51, 51, 51, 255];
const FLOOR_TITLE_FONT_PX: f32 = 20.0;
/// Top-left of the title text; its baseline sits near world y = 80.
const FLOOR_TITLE_ORIGIN: Vec2 = Vec2::new(60.0, 60.0);

const ROAD_RECT: Rect = Rect::new(100.0, 320.0, 800.0, 60.0);
const ROAD_COLOR: [u8; 4] = [204, 204, 204, 255];
const ENTRANCE_RECT: Rect = Rect::new(450.0, 50.0, 100.0, 50.0);
const ENTRANCE_COLOR: [u8; 4] = [255, 204, 128, 255];
const ENTRANCE_LABEL: &str = "ENTRANCE";
const ENTRANCE_LABEL_COLOR: [u8; 4] = [0, 0, 0, 255];
const ENTRANCE_LABEL_FONT_PX: f32 = 14.0;
const SUBWAY_CENTER: Vec2 = Vec2::new(500.0, 350.0);
const SUBWAY_WIDTH: f32 = 150.0;
const SUBWAY_BASE_HEIGHT: f32 = 30.0;
const SUBWAY_BASE_COLOR: [u8; 4] = [136, 136, 136, 255];
const SUBWAY_ARCH_INNER_COLOR: [u8; 4] = [170, 170, 170, 255];
const SUBWAY_ARCH_OUTER_COLOR: [u8; 4] = [102, 102, 102, 255];
const SUBWAY_SHADOW_INSET: f32 = 5.0;
const SUBWAY_SHADOW_COLOR: [u8; 4] = [0, 0, 0, 77];
const SUBWAY_LABEL: &str = "SUBWAY";
const SUBWAY_LABEL_COLOR: [u8; 4] = [255, 255, 255, 255];
const SUBWAY_LABEL_FONT_PX: f32 = 16.0;

/// Which draw path a floor takes after the shared clear and background steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FloorStyle {
    Indoor,
    Outdoor,
}

impl FloorStyle {
    pub(crate) fn for_floor(id: FloorId) -> Self {
        match id {
            FloorId::Outdoor => FloorStyle::Outdoor,
            FloorId::Ground | FloorId::Basement1 | FloorId::Basement2 => FloorStyle::Indoor,
        }
    }

    fn background_color(self) -> [u8; 4] {
        match self {
            FloorStyle::Indoor => INDOOR_BACKGROUND_COLOR,
            FloorStyle::Outdoor => OUTDOOR_GROUND_COLOR,
        }
    }
}

/// Draws in world units through a view transform. Creating one is the "apply transform"
/// step of a frame; dropping it returns the caller to raw surface pixels.
struct WorldPainter<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    view: ViewTransform,
}

impl<'a> WorldPainter<'a> {
    fn new(frame: &'a mut [u8], width: u32, height: u32, view: ViewTransform) -> Self {
        Self {
            frame,
            width,
            height,
            view,
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let top_left = self.view.to_screen(Vec2::new(rect.x, rect.y));
        let bottom_right = self.view.to_screen(Vec2::new(rect.right(), rect.bottom()));
        fill_rect_px(
            self.frame,
            self.width,
            self.height,
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
            color,
        );
    }

    fn stroke_rect(&mut self, rect: Rect, line_width: f32, color: [u8; 4]) {
        let top_left = self.view.to_screen(Vec2::new(rect.x, rect.y));
        let bottom_right = self.view.to_screen(Vec2::new(rect.right(), rect.bottom()));
        stroke_rect_px(
            self.frame,
            self.width,
            self.height,
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
            line_width * self.view.scale(),
            color,
        );
    }

    fn stroke_segment(&mut self, segment: &LineSegment, line_width: f32, color: [u8; 4]) {
        stroke_line_px(
            self.frame,
            self.width,
            self.height,
            self.view.to_screen(segment.start()),
            self.view.to_screen(segment.end()),
            line_width * self.view.scale(),
            color,
        );
    }

    fn fill_upper_half_disc(&mut self, center: Vec2, radius: f32, inner: [u8; 4], outer: [u8; 4]) {
        fill_upper_half_disc_px(
            self.frame,
            self.width,
            self.height,
            self.view.to_screen(center),
            radius * self.view.scale(),
            inner,
            outer,
        );
    }

    fn text_scale(&self, font_px: f32) -> i32 {
        scale_for_font_px(font_px * self.view.scale())
    }

    fn text_centered(&mut self, center: Vec2, text: &str, font_px: f32, color: [u8; 4]) {
        let scale = self.text_scale(font_px);
        draw_text_centered_px(
            self.frame,
            self.width,
            self.height,
            self.view.to_screen(center),
            text,
            scale,
            color,
        );
    }

    fn text(&mut self, origin: Vec2, text: &str, font_px: f32, color: [u8; 4]) {
        let scale = self.text_scale(font_px);
        let screen = self.view.to_screen(origin);
        draw_text_px(
            self.frame,
            self.width,
            self.height,
            screen.x.round() as i32,
            screen.y.round() as i32,
            text,
            scale,
            color,
        );
    }
}

/// Redraws `floor` into an RGBA8 frame of `width` x `height` pixels.
///
/// The frame is cleared first, so the output depends only on the arguments.
pub fn render_floor(frame: &mut [u8], width: u32, height: u32, floor: &Floor, view: &ViewTransform) {
    if width == 0 || height == 0 {
        return;
    }
    clear_frame(frame, CLEAR_COLOR);

    let style = FloorStyle::for_floor(floor.id);
    let mut painter = WorldPainter::new(frame, width, height, *view);
    painter.fill_rect(BACKGROUND_RECT, style.background_color());
    match style {
        FloorStyle::Indoor => draw_indoor(&mut painter, floor),
        FloorStyle::Outdoor => draw_outdoor(&mut painter),
    }
}

fn draw_indoor(painter: &mut WorldPainter<'_>, floor: &Floor) {
    for wall in &floor.walls {
        painter.stroke_segment(wall, WALL_WIDTH, WALL_COLOR);
    }
    for passage in &floor.passages {
        painter.stroke_segment(passage, PASSAGE_WIDTH, PASSAGE_COLOR);
    }
    for shop in &floor.shops {
        draw_shop(painter, shop);
    }
    painter.text(
        FLOOR_TITLE_ORIGIN,
        &floor.display_name,
        FLOOR_TITLE_FONT_PX,
        FLOOR_TITLE_COLOR,
    );
}

fn draw_shop(painter: &mut WorldPainter<'_>, shop: &Shop) {
    painter.fill_rect(shop.bounds, shop.color.rgba());
    painter.stroke_rect(shop.bounds, SHOP_BORDER_WIDTH, SHOP_BORDER_COLOR);
    painter.text_centered(
        shop.bounds.center(),
        &shop.id,
        SHOP_LABEL_FONT_PX,
        SHOP_LABEL_COLOR,
    );
}

fn draw_outdoor(painter: &mut WorldPainter<'_>) {
    painter.fill_rect(ROAD_RECT, ROAD_COLOR);

    painter.fill_rect(ENTRANCE_RECT, ENTRANCE_COLOR);
    painter.text_centered(
        ENTRANCE_RECT.center(),
        ENTRANCE_LABEL,
        ENTRANCE_LABEL_FONT_PX,
        ENTRANCE_LABEL_COLOR,
    );

    draw_subway_entrance(painter);
}

fn draw_subway_entrance(painter: &mut WorldPainter<'_>) {
    let half_width = SUBWAY_WIDTH * 0.5;
    painter.fill_rect(
        Rect::new(
            SUBWAY_CENTER.x - half_width,
            SUBWAY_CENTER.y,
            SUBWAY_WIDTH,
            SUBWAY_BASE_HEIGHT,
        ),
        SUBWAY_BASE_COLOR,
    );
    painter.fill_upper_half_disc(
        SUBWAY_CENTER,
        half_width,
        SUBWAY_ARCH_INNER_COLOR,
        SUBWAY_ARCH_OUTER_COLOR,
    );
    painter.fill_upper_half_disc(
        SUBWAY_CENTER,
        half_width - SUBWAY_SHADOW_INSET,
        SUBWAY_SHADOW_COLOR,
        SUBWAY_SHADOW_COLOR,
    );
    painter.text_centered(
        Vec2::new(SUBWAY_CENTER.x, SUBWAY_CENTER.y + SUBWAY_BASE_HEIGHT * 0.5),
        SUBWAY_LABEL,
        SUBWAY_LABEL_FONT_PX,
        SUBWAY_LABEL_COLOR,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floors::FloorRegistry;

    const WIDTH: u32 = 1000;
    const HEIGHT: u32 = 700;

    fn frame() -> Vec<u8> {
        vec![0u8; (WIDTH * HEIGHT * 4) as usize]
    }

    fn pixel_at(frame: &[u8], x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * WIDTH + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    fn registry() -> FloorRegistry {
        FloorRegistry::builtin().expect("builtin floors")
    }

    #[test]
    fn style_splits_outdoor_from_indoor() {
        assert_eq!(FloorStyle::for_floor(FloorId::Outdoor), FloorStyle::Outdoor);
        for id in [FloorId::Ground, FloorId::Basement1, FloorId::Basement2] {
            assert_eq!(FloorStyle::for_floor(id), FloorStyle::Indoor, "id={id}");
        }
    }

    #[test]
    fn render_is_idempotent() {
        let registry = registry();
        let view = ViewTransform::new(1.3, -42.0, 17.5);
        for floor in registry.floors() {
            let mut first = frame();
            let mut second = frame();
            render_floor(&mut first, WIDTH, HEIGHT, floor, &view);
            render_floor(&mut second, WIDTH, HEIGHT, floor, &view);
            render_floor(&mut second, WIDTH, HEIGHT, floor, &view);
            assert!(first == second, "floor {} is not idempotent", floor.id);
        }
    }

    #[test]
    fn indoor_layers_use_their_colors() {
        let registry = registry();
        let mut frame = frame();
        render_floor(
            &mut frame,
            WIDTH,
            HEIGHT,
            registry.floor(FloorId::Ground),
            &ViewTransform::default(),
        );
        assert_eq!(pixel_at(&frame, 10, 10), CLEAR_COLOR);
        assert_eq!(pixel_at(&frame, 900, 620), INDOOR_BACKGROUND_COLOR);
        assert_eq!(pixel_at(&frame, 600, 600), WALL_COLOR);
        assert_eq!(pixel_at(&frame, 450, 580), PASSAGE_COLOR);
        // Inside shop 1, clear of its border and its centered label.
        assert_eq!(pixel_at(&frame, 126, 126), registry.floor(FloorId::Ground).shops[0].color.rgba());
        assert_eq!(pixel_at(&frame, 150, 120), SHOP_BORDER_COLOR);
    }

    #[test]
    fn outdoor_draws_road_entrance_and_subway() {
        let registry = registry();
        let mut frame = frame();
        render_floor(
            &mut frame,
            WIDTH,
            HEIGHT,
            registry.floor(FloorId::Outdoor),
            &ViewTransform::default(),
        );
        assert_eq!(pixel_at(&frame, 60, 200), OUTDOOR_GROUND_COLOR);
        assert_eq!(pixel_at(&frame, 200, 330), ROAD_COLOR);
        assert_eq!(pixel_at(&frame, 455, 55), ENTRANCE_COLOR);
        assert_eq!(pixel_at(&frame, 430, 375), SUBWAY_BASE_COLOR);
        // Arch ring between the shadow and the rim is unshadowed gradient.
        let ring = pixel_at(&frame, 500, 278);
        assert!(ring[0] < SUBWAY_ARCH_INNER_COLOR[0] && ring[0] >= SUBWAY_ARCH_OUTER_COLOR[0]);
        // No shop fill or wall ink anywhere on the outdoor map.
        assert_ne!(pixel_at(&frame, 600, 600), WALL_COLOR);
    }

    #[test]
    fn pan_and_zoom_move_geometry() {
        let registry = registry();
        let floor = registry.floor(FloorId::Ground);
        let view = ViewTransform::new(2.0, -100.0, -100.0);
        let mut frame = frame();
        render_floor(&mut frame, WIDTH, HEIGHT, floor, &view);
        // Shop 1 spans world x 120..170, screen x 140..240 at this view.
        let inside = view.to_screen(Vec2::new(124.0, 124.0));
        assert_eq!(
            pixel_at(&frame, inside.x as u32, inside.y as u32),
            floor.shops[0].color.rgba()
        );
        // The top-left background corner is pushed off-surface.
        assert_eq!(pixel_at(&frame, 0, 0), INDOOR_BACKGROUND_COLOR);
    }

    #[test]
    fn far_pans_render_an_empty_map() {
        use crate::app::{handle_event, MapEvent, MapState};

        let registry = registry();
        for target in [
            Vec2::new(3.0e9, 0.0),
            Vec2::new(-3.0e9, 0.0),
            Vec2::new(0.0, 3.0e9),
            Vec2::new(-3.0e9, -3.0e9),
        ] {
            let mut state = MapState::new(FloorId::Ground);
            for event in [MapEvent::PointerDown(Vec2::new(0.0, 0.0)), MapEvent::PointerMove(target)] {
                state = handle_event(&state, &registry, event).state;
            }
            assert_eq!(state.view.offset(), target);

            for floor in registry.floors() {
                let mut frame = frame();
                render_floor(&mut frame, WIDTH, HEIGHT, floor, &state.view);
                assert!(
                    frame.chunks_exact(4).all(|px| px == CLEAR_COLOR),
                    "floor {} panned to {target:?} left ink on screen",
                    floor.id
                );
            }
        }
    }

    #[test]
    fn tiny_or_empty_frames_are_safe() {
        let registry = registry();
        let floor = registry.floor(FloorId::Basement1);
        let mut empty = vec![];
        render_floor(&mut empty, 0, 0, floor, &ViewTransform::default());
        let mut one = vec![0u8; 4];
        render_floor(&mut one, 1, 1, floor, &ViewTransform::default());
        assert_eq!(one, CLEAR_COLOR.to_vec());
    }
}
