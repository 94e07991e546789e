//! RGBA8 frame primitives. Every writer clips against the frame, so callers may pass
//! coordinates that lie partly or entirely off-surface.

use crate::geometry::Vec2;

pub(crate) fn clear_frame(frame: &mut [u8], color: [u8; 4]) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&color);
    }
}

pub(crate) fn write_pixel_rgba_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    color: [u8; 4],
) {
    let Some(range) = pixel_byte_range(frame.len(), width, height, x, y) else {
        return;
    };
    if color[3] == 255 {
        frame[range].copy_from_slice(&color);
    } else {
        let pixel = &mut frame[range];
        let alpha = color[3] as u32;
        for channel in 0..3 {
            let src = color[channel] as u32;
            let dst = pixel[channel] as u32;
            pixel[channel] = ((src * alpha + dst * (255 - alpha) + 127) / 255) as u8;
        }
        pixel[3] = 255;
    }
}

fn pixel_byte_range(
    frame_len: usize,
    width: u32,
    height: u32,
    x: i32,
    y: i32,
) -> Option<std::ops::Range<usize>> {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return None;
    }
    let pixel_offset = (y as usize)
        .checked_mul(width as usize)?
        .checked_add(x as usize)?;
    let start = pixel_offset.checked_mul(4)?;
    let end = start.checked_add(4)?;
    (end <= frame_len).then_some(start..end)
}

/// Fills the pixels whose centers fall inside `[left, right) x [top, bottom)`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn fill_rect_px(
    frame: &mut [u8],
    width: u32,
    height: u32,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    color: [u8; 4],
) {
    let start_x = (left.round() as i32).max(0);
    let start_y = (top.round() as i32).max(0);
    let end_x = (right.round() as i32).min(width as i32);
    let end_y = (bottom.round() as i32).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }
    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba_clipped(frame, width, height, px, py, color);
        }
    }
}

/// Strokes a segment of the given thickness; pixels within half the thickness of the
/// segment are painted. Thickness is floored at one pixel.
pub(crate) fn stroke_line_px(
    frame: &mut [u8],
    width: u32,
    height: u32,
    from: Vec2,
    to: Vec2,
    thickness_px: f32,
    color: [u8; 4],
) {
    if width == 0 || height == 0 {
        return;
    }
    let half = (thickness_px * 0.5).max(0.5);
    let min_x = ((from.x.min(to.x) - half).floor() as i32).max(0);
    let max_x = ((from.x.max(to.x) + half).ceil() as i32).min(width as i32 - 1);
    let min_y = ((from.y.min(to.y) - half).floor() as i32).max(0);
    let max_y = ((from.y.max(to.y) + half).ceil() as i32).min(height as i32 - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    let seg_x = to.x - from.x;
    let seg_y = to.y - from.y;
    let seg_len_sq = seg_x * seg_x + seg_y * seg_y;
    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let cx = px as f32 + 0.5;
            let cy = py as f32 + 0.5;
            let t = if seg_len_sq > 0.0 {
                (((cx - from.x) * seg_x + (cy - from.y) * seg_y) / seg_len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dx = cx - (from.x + seg_x * t);
            let dy = cy - (from.y + seg_y * t);
            if dx * dx + dy * dy <= half * half {
                write_pixel_rgba_clipped(frame, width, height, px, py, color);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn stroke_rect_px(
    frame: &mut [u8],
    width: u32,
    height: u32,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    thickness_px: f32,
    color: [u8; 4],
) {
    let corners = [
        Vec2::new(left, top),
        Vec2::new(right, top),
        Vec2::new(right, bottom),
        Vec2::new(left, bottom),
    ];
    for i in 0..corners.len() {
        let from = corners[i];
        let to = corners[(i + 1) % corners.len()];
        stroke_line_px(frame, width, height, from, to, thickness_px, color);
    }
}

/// Fills the upper half of a disc, shading from `inner` at the center to `outer` at the rim.
#[allow(clippy::too_many_arguments)]
pub(crate) fn fill_upper_half_disc_px(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center: Vec2,
    radius: f32,
    inner: [u8; 4],
    outer: [u8; 4],
) {
    if radius <= 0.0 || width == 0 || height == 0 {
        return;
    }
    let min_x = ((center.x - radius).floor() as i32).max(0);
    let max_x = ((center.x + radius).ceil() as i32).min(width as i32 - 1);
    let min_y = ((center.y - radius).floor() as i32).max(0);
    let max_y = (center.y.ceil() as i32).min(height as i32 - 1);
    for py in min_y..=max_y {
        let cy = py as f32 + 0.5;
        if cy > center.y {
            continue;
        }
        for px in min_x..=max_x {
            let cx = px as f32 + 0.5;
            let distance = ((cx - center.x).powi(2) + (cy - center.y).powi(2)).sqrt();
            if distance > radius {
                continue;
            }
            let color = lerp_rgba(inner, outer, distance / radius);
            write_pixel_rgba_clipped(frame, width, height, px, py, color);
        }
    }
}

pub(crate) fn lerp_rgba(from: [u8; 4], to: [u8; 4], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for channel in 0..4 {
        let a = from[channel] as f32;
        let b = to[channel] as f32;
        out[channel] = (a + (b - a) * t).round() as u8;
    }
    out
}
