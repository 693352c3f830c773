use macroquad::{
    camera::Camera2D,
    math::{vec2, Rect, Vec2},
};

/// Half the world height shown on the canvas.
pub const WORLD_HALF_HEIGHT: f32 = 2.0;

/// Maps window pixels to canvas world units.
///
/// The canvas sits right of a sidebar of `sidebar` pixels. World space spans
/// `[-2·aspect, 2·aspect] × [-2, 2]` over the canvas, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub sidebar: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, sidebar: f32) -> Self {
        Self { width, height, sidebar }
    }

    fn canvas_width(&self) -> f32 {
        (self.width - self.sidebar).max(1.0)
    }

    fn canvas_height(&self) -> f32 {
        self.height.max(1.0)
    }

    pub fn aspect(&self) -> f32 {
        self.canvas_width() / self.canvas_height()
    }

    pub fn contains_screen(&self, x: f32, y: f32) -> bool {
        x >= self.sidebar && x < self.width && y >= 0.0 && y < self.height
    }

    pub fn screen_to_world(&self, x: f32, y: f32) -> Vec2 {
        let half_w = WORLD_HALF_HEIGHT * self.aspect();
        let nx = (x - self.sidebar) / self.canvas_width();
        let ny = y / self.canvas_height();
        vec2(
            nx * 2.0 * half_w - half_w,
            WORLD_HALF_HEIGHT - ny * 2.0 * WORLD_HALF_HEIGHT,
        )
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let half_w = WORLD_HALF_HEIGHT * self.aspect();
        vec2(
            self.sidebar + (world.x + half_w) / (2.0 * half_w) * self.canvas_width(),
            (WORLD_HALF_HEIGHT - world.y) / (2.0 * WORLD_HALF_HEIGHT) * self.canvas_height(),
        )
    }

    /// World-space rectangle covered by the canvas region.
    pub fn world_rect(&self) -> Rect {
        let half_w = WORLD_HALF_HEIGHT * self.aspect();
        Rect::new(-half_w, -WORLD_HALF_HEIGHT, 2.0 * half_w, 2.0 * WORLD_HALF_HEIGHT)
    }

    /// World units per screen pixel.
    pub fn world_per_pixel(&self) -> f32 {
        2.0 * WORLD_HALF_HEIGHT / self.canvas_height()
    }

    /// Camera over the whole window that agrees with `screen_to_world`
    /// inside the canvas region.
    pub fn camera(&self) -> Camera2D {
        let full_world_width = self.width.max(1.0) * self.world_per_pixel();
        Camera2D {
            target: self.screen_to_world(self.width / 2.0, self.height / 2.0),
            zoom: vec2(2.0 / full_world_width, 1.0 / WORLD_HALF_HEIGHT),
            ..Default::default()
        }
    }
}

/// Free-function form of [`Viewport::screen_to_world`].
pub fn screen_to_world(screen_x: f32, screen_y: f32, width: f32, height: f32, sidebar: f32) -> Vec2 {
    Viewport::new(width, height, sidebar).screen_to_world(screen_x, screen_y)
}
