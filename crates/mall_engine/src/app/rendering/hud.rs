use crate::app::{MapState, ShopSelection};
use crate::floors::{FloorId, FloorRegistry};
use crate::geometry::Vec2;

use super::raster::{fill_rect_px, stroke_rect_px};
use super::text::{draw_text_centered_px, draw_text_px, text_size_px};
use super::Viewport;

const HUD_TEXT_SCALE: i32 = 2;
const HUD_MARGIN: i32 = 12;
const HUD_LINE_ADVANCE: i32 = 8 * HUD_TEXT_SCALE;
const FLOOR_BUTTON_WIDTH: i32 = 104;
const FLOOR_BUTTON_HEIGHT: i32 = 28;
const FLOOR_BUTTON_GAP: i32 = 8;
const FLOOR_BUTTON_COLOR: [u8; 4] = [236, 239, 244, 255];
const FLOOR_BUTTON_ACTIVE_COLOR: [u8; 4] = [52, 120, 220, 255];
const FLOOR_BUTTON_TEXT_COLOR: [u8; 4] = [40, 44, 52, 255];
const FLOOR_BUTTON_ACTIVE_TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];
const PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];
const INFO_PANEL_WIDTH: i32 = 220;
const INFO_PANEL_PADDING: i32 = 10;
const INFO_PANEL_BG_COLOR: [u8; 4] = [255, 255, 255, 230];
const INFO_PANEL_TEXT_COLOR: [u8; 4] = [33, 33, 33, 255];
const CURRENT_FLOOR_PADDING: i32 = 2 * HUD_TEXT_SCALE;
const CURRENT_FLOOR_BG_COLOR: [u8; 4] = [10, 12, 16, 200];
const CURRENT_FLOOR_TEXT_COLOR: [u8; 4] = [244, 248, 252, 255];

/// Screen-space rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRect {
    pub fn contains(&self, point: Vec2) -> bool {
        let x = point.x.floor() as i32;
        let y = point.y.floor() as i32;
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }

    fn center(&self) -> Vec2 {
        Vec2::new(
            self.left as f32 + self.width as f32 * 0.5,
            self.top as f32 + self.height as f32 * 0.5,
        )
    }
}

/// Floor selector buttons, right-aligned along the top edge in selector order.
pub fn floor_button_rects(viewport_width: u32, count: usize) -> Vec<ScreenRect> {
    let count = count as i32;
    let strip_width = count * FLOOR_BUTTON_WIDTH + (count - 1).max(0) * FLOOR_BUTTON_GAP;
    let strip_left = viewport_width as i32 - HUD_MARGIN - strip_width;
    (0..count)
        .map(|index| ScreenRect {
            left: strip_left + index * (FLOOR_BUTTON_WIDTH + FLOOR_BUTTON_GAP),
            top: HUD_MARGIN,
            width: FLOOR_BUTTON_WIDTH,
            height: FLOOR_BUTTON_HEIGHT,
        })
        .collect()
}

pub fn floor_button_at(registry: &FloorRegistry, viewport_width: u32, point: Vec2) -> Option<FloorId> {
    let floors = registry.floors();
    floor_button_rects(viewport_width, floors.len())
        .into_iter()
        .zip(floors)
        .find(|(rect, _)| rect.contains(point))
        .map(|(_, floor)| floor.id)
}

/// What a surface point lands on when the HUD covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudTarget {
    FloorButton(FloorId),
    /// Any other HUD surface: gaps in the selector strip, the floor label, the info panel.
    Panel,
}

/// HUD hit-test for the frame `draw_hud` would paint for `state`. Points it returns
/// `Some` for belong to the HUD and must not reach the map.
pub fn hud_target_at(
    registry: &FloorRegistry,
    state: &MapState,
    viewport: Viewport,
    point: Vec2,
) -> Option<HudTarget> {
    if let Some(floor) = floor_button_at(registry, viewport.width, point) {
        return Some(HudTarget::FloorButton(floor));
    }
    let strip = floor_strip_rect(viewport.width, registry.floors().len());
    let label = current_floor_label_rect(
        &registry.floor(state.active_floor).display_name,
        viewport.height,
    );
    let panel = state
        .selection
        .as_ref()
        .map(|_| info_panel_rect(viewport.width));
    let covered = strip.is_some_and(|rect| rect.contains(point))
        || label.contains(point)
        || panel.is_some_and(|rect| rect.contains(point));
    covered.then_some(HudTarget::Panel)
}

fn floor_strip_rect(viewport_width: u32, count: usize) -> Option<ScreenRect> {
    let rects = floor_button_rects(viewport_width, count);
    let (first, last) = (rects.first()?, rects.last()?);
    Some(ScreenRect {
        left: first.left,
        top: first.top,
        width: last.left + last.width - first.left,
        height: first.height,
    })
}

fn current_floor_label_rect(display_name: &str, viewport_height: u32) -> ScreenRect {
    let (text_w, text_h) = text_size_px(display_name, HUD_TEXT_SCALE);
    ScreenRect {
        left: HUD_MARGIN,
        top: viewport_height as i32 - HUD_MARGIN - text_h - CURRENT_FLOOR_PADDING * 2,
        width: text_w + CURRENT_FLOOR_PADDING * 2,
        height: text_h + CURRENT_FLOOR_PADDING * 2,
    }
}

fn info_panel_rect(viewport_width: u32) -> ScreenRect {
    ScreenRect {
        left: viewport_width as i32 - HUD_MARGIN - INFO_PANEL_WIDTH,
        top: HUD_MARGIN + FLOOR_BUTTON_HEIGHT + FLOOR_BUTTON_GAP,
        width: INFO_PANEL_WIDTH,
        height: INFO_PANEL_PADDING * 2 + HUD_LINE_ADVANCE * 2,
    }
}

/// Draws the floor selector, the current floor label and, when a shop is selected, its
/// info panel. Runs after the map so it always sits on top.
pub fn draw_hud(frame: &mut [u8], width: u32, height: u32, registry: &FloorRegistry, state: &MapState) {
    if width == 0 || height == 0 {
        return;
    }
    draw_floor_buttons(frame, width, height, registry, state.active_floor);
    draw_current_floor_label(
        frame,
        width,
        height,
        &registry.floor(state.active_floor).display_name,
    );
    if let Some(selection) = state.selection.as_ref() {
        draw_info_panel(frame, width, height, selection);
    }
}

fn draw_floor_buttons(
    frame: &mut [u8],
    width: u32,
    height: u32,
    registry: &FloorRegistry,
    active: FloorId,
) {
    let floors = registry.floors();
    for (rect, floor) in floor_button_rects(width, floors.len()).into_iter().zip(floors) {
        let is_active = floor.id == active;
        let (fill, ink) = if is_active {
            (FLOOR_BUTTON_ACTIVE_COLOR, FLOOR_BUTTON_ACTIVE_TEXT_COLOR)
        } else {
            (FLOOR_BUTTON_COLOR, FLOOR_BUTTON_TEXT_COLOR)
        };
        fill_screen_rect(frame, width, height, rect, fill);
        outline_screen_rect(frame, width, height, rect, PANEL_BORDER_COLOR);
        draw_text_centered_px(
            frame,
            width,
            height,
            rect.center(),
            &floor.display_name,
            HUD_TEXT_SCALE,
            ink,
        );
    }
}

fn draw_current_floor_label(frame: &mut [u8], width: u32, height: u32, display_name: &str) {
    let rect = current_floor_label_rect(display_name, height);
    fill_screen_rect(frame, width, height, rect, CURRENT_FLOOR_BG_COLOR);
    draw_text_px(
        frame,
        width,
        height,
        rect.left + CURRENT_FLOOR_PADDING,
        rect.top + CURRENT_FLOOR_PADDING,
        display_name,
        HUD_TEXT_SCALE,
        CURRENT_FLOOR_TEXT_COLOR,
    );
}

fn draw_info_panel(frame: &mut [u8], width: u32, height: u32, selection: &ShopSelection) {
    let rect = info_panel_rect(width);
    fill_screen_rect(frame, width, height, rect, INFO_PANEL_BG_COLOR);
    outline_screen_rect(frame, width, height, rect, PANEL_BORDER_COLOR);

    let text_left = rect.left + INFO_PANEL_PADDING;
    let mut y = rect.top + INFO_PANEL_PADDING;
    for line in [
        selection.shop_name.clone(),
        format!("ID: {}", selection.shop_id),
    ] {
        draw_text_px(
            frame,
            width,
            height,
            text_left,
            y,
            &line,
            HUD_TEXT_SCALE,
            INFO_PANEL_TEXT_COLOR,
        );
        y += HUD_LINE_ADVANCE;
    }
}

fn fill_screen_rect(frame: &mut [u8], width: u32, height: u32, rect: ScreenRect, color: [u8; 4]) {
    fill_rect_px(
        frame,
        width,
        height,
        rect.left as f32,
        rect.top as f32,
        (rect.left + rect.width) as f32,
        (rect.top + rect.height) as f32,
        color,
    );
}

fn outline_screen_rect(frame: &mut [u8], width: u32, height: u32, rect: ScreenRect, color: [u8; 4]) {
    // Stroke along pixel centers so a one-pixel line stays one pixel wide.
    let left = rect.left as f32 + 0.5;
    let top = rect.top as f32 + 0.5;
    let right = (rect.left + rect.width) as f32 - 0.5;
    let bottom = (rect.top + rect.height) as f32 - 0.5;
    stroke_rect_px(frame, width, height, left, top, right, bottom, 1.0, color);
}
