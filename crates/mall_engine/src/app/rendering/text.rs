use super::raster::fill_rect_px;
use crate::geometry::Vec2;

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;

/// 3x5 glyph, one row per entry, most significant of the low three bits is the left column.
type GlyphRows = [u8; GLYPH_HEIGHT as usize];

const BLANK: GlyphRows = [0; GLYPH_HEIGHT as usize];

const FONT: &[(char, GlyphRows)] = &[
    ('0', [0b111, 0b101, 0b101, 0b101, 0b111]),
    ('1', [0b010, 0b110, 0b010, 0b010, 0b111]),
    ('2', [0b111, 0b001, 0b111, 0b100, 0b111]),
    ('3', [0b111, 0b001, 0b011, 0b001, 0b111]),
    ('4', [0b101, 0b101, 0b111, 0b001, 0b001]),
    ('5', [0b111, 0b100, 0b111, 0b001, 0b111]),
    ('6', [0b111, 0b100, 0b111, 0b101, 0b111]),
    ('7', [0b111, 0b001, 0b010, 0b010, 0b010]),
    ('8', [0b111, 0b101, 0b111, 0b101, 0b111]),
    ('9', [0b111, 0b101, 0b111, 0b001, 0b111]),
    ('A', [0b010, 0b101, 0b111, 0b101, 0b101]),
    ('B', [0b110, 0b101, 0b110, 0b101, 0b110]),
    ('C', [0b011, 0b100, 0b100, 0b100, 0b011]),
    ('D', [0b110, 0b101, 0b101, 0b101, 0b110]),
    ('E', [0b111, 0b100, 0b110, 0b100, 0b111]),
    ('F', [0b111, 0b100, 0b110, 0b100, 0b100]),
    ('G', [0b011, 0b100, 0b101, 0b101, 0b011]),
    ('H', [0b101, 0b101, 0b111, 0b101, 0b101]),
    ('I', [0b111, 0b010, 0b010, 0b010, 0b111]),
    ('J', [0b001, 0b001, 0b001, 0b101, 0b010]),
    ('K', [0b101, 0b110, 0b100, 0b110, 0b101]),
    ('L', [0b100, 0b100, 0b100, 0b100, 0b111]),
    ('M', [0b101, 0b111, 0b111, 0b101, 0b101]),
    ('N', [0b110, 0b101, 0b101, 0b101, 0b101]),
    ('O', [0b010, 0b101, 0b101, 0b101, 0b010]),
    ('P', [0b110, 0b101, 0b110, 0b100, 0b100]),
    ('Q', [0b010, 0b101, 0b101, 0b110, 0b011]),
    ('R', [0b110, 0b101, 0b110, 0b101, 0b101]),
    ('S', [0b011, 0b100, 0b010, 0b001, 0b110]),
    ('T', [0b111, 0b010, 0b010, 0b010, 0b010]),
    ('U', [0b101, 0b101, 0b101, 0b101, 0b111]),
    ('V', [0b101, 0b101, 0b101, 0b101, 0b010]),
    ('W', [0b101, 0b101, 0b111, 0b111, 0b101]),
    ('X', [0b101, 0b101, 0b010, 0b101, 0b101]),
    ('Y', [0b101, 0b101, 0b010, 0b010, 0b010]),
    ('Z', [0b111, 0b001, 0b010, 0b100, 0b111]),
    ('-', [0b000, 0b000, 0b111, 0b000, 0b000]),
    (':', [0b000, 0b010, 0b000, 0b010, 0b000]),
    ('.', [0b000, 0b000, 0b000, 0b000, 0b010]),
    ('#', [0b101, 0b111, 0b101, 0b111, 0b101]),
    ('/', [0b001, 0b001, 0b010, 0b100, 0b100]),
];

/// Lowercase letters share the uppercase shapes.
fn glyph_for(ch: char) -> Option<GlyphRows> {
    let upper = ch.to_ascii_uppercase();
    FONT.iter()
        .find(|(glyph_char, _)| *glyph_char == upper)
        .map(|(_, rows)| *rows)
}

pub(crate) fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale
}

pub(crate) fn text_size_px(text: &str, scale: i32) -> (i32, i32) {
    let chars = text.chars().count() as i32;
    if chars == 0 {
        return (0, 0);
    }
    (chars * glyph_advance(scale) - scale, GLYPH_HEIGHT * scale)
}

/// Scale that makes a glyph roughly `font_px` tall, never below one pixel per cell.
pub(crate) fn scale_for_font_px(font_px: f32) -> i32 {
    let scale = (font_px / (GLYPH_HEIGHT as f32)).round();
    if scale.is_finite() {
        (scale as i32).max(1)
    } else {
        1
    }
}

/// Draws `text` with its top-left corner at `(x, y)`. Characters without a glyph
/// advance the cursor without painting.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_text_px(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    text: &str,
    scale: i32,
    color: [u8; 4],
) {
    let scale = scale.max(1);
    let (text_w, text_h) = text_size_px(text, scale);
    if !text_box_touches_frame(width, height, x, y, text_w, text_h) {
        return;
    }
    // Past this point the box overlaps the frame, so cursor arithmetic stays in range.
    let mut cursor_x = x;
    for ch in text.chars() {
        let rows = glyph_for(ch).unwrap_or(BLANK);
        draw_glyph(frame, width, height, cursor_x, y, rows, scale, color);
        cursor_x += glyph_advance(scale);
    }
}

fn text_box_touches_frame(width: u32, height: u32, x: i32, y: i32, text_w: i32, text_h: i32) -> bool {
    let (x, y) = (i64::from(x), i64::from(y));
    x < i64::from(width)
        && y < i64::from(height)
        && x + i64::from(text_w) > 0
        && y + i64::from(text_h) > 0
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_text_centered_px(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center: Vec2,
    text: &str,
    scale: i32,
    color: [u8; 4],
) {
    let (text_w, text_h) = text_size_px(text, scale.max(1));
    let x = (center.x - text_w as f32 * 0.5).round() as i32;
    let y = (center.y - text_h as f32 * 0.5).round() as i32;
    draw_text_px(frame, width, height, x, y, text, scale, color);
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rows: GlyphRows,
    scale: i32,
    color: [u8; 4],
) {
    for (row_index, row_bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            let left = x + col * scale;
            let top = y + row_index as i32 * scale;
            fill_rect_px(
                frame,
                width,
                height,
                left as f32,
                top as f32,
                (left + scale) as f32,
                (top + scale) as f32,
                color,
            );
        }
    }
}
