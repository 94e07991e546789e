use crate::geometry::Vec2;

pub const VIEW_SCALE_DEFAULT: f32 = 1.0;
pub const VIEW_SCALE_MIN: f32 = 0.5;
pub const VIEW_SCALE_MAX: f32 = 3.0;
pub const WHEEL_ZOOM_IN_FACTOR: f32 = 1.1;
pub const WHEEL_ZOOM_OUT_FACTOR: f32 = 0.9;

/// Pan and zoom of the map: `screen = world * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: VIEW_SCALE_DEFAULT,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn new(scale: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            scale: clamp_view_scale(scale),
            offset_x,
            offset_y,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Screen position of the world origin.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2 {
            x: world.x * self.scale + self.offset_x,
            y: world.y * self.scale + self.offset_y,
        }
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        Vec2 {
            x: (screen.x - self.offset_x) / self.scale,
            y: (screen.y - self.offset_y) / self.scale,
        }
    }

    /// Zooms by `factor` around `screen`.
    ///
    /// The offset is moved with the unclamped factor before the scale is clamped, so a tick
    /// that hits a scale limit still shifts the map slightly.
    pub fn zoom_at(&mut self, screen: Vec2, factor: f32) {
        self.offset_x = screen.x - (screen.x - self.offset_x) * factor;
        self.offset_y = screen.y - (screen.y - self.offset_y) * factor;
        self.scale = clamp_view_scale(self.scale * factor);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.offset_x += dx;
        self.offset_y += dy;
    }
}

pub fn wheel_zoom_factor(delta_y: f32) -> f32 {
    if delta_y < 0.0 {
        WHEEL_ZOOM_IN_FACTOR
    } else {
        WHEEL_ZOOM_OUT_FACTOR
    }
}

fn clamp_view_scale(scale: f32) -> f32 {
    if !scale.is_finite() {
        return VIEW_SCALE_DEFAULT;
    }
    scale.clamp(VIEW_SCALE_MIN, VIEW_SCALE_MAX)
}
