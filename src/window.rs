use std::path::Path;

use nalgebra as na;
use na::vector;
use log::info;

use crate::error::RenderError;
use crate::scene::{Context, DEFAULT_DEPTH};
use crate::transform::{DEFAULT_FAR, DEFAULT_NEAR};

/// Rendering surface. Owns the one drawing context and hands out two views of it:
/// `camera()` for the transforms and `draw()` for color and primitives.
pub struct Window {
    title: String,
    context: Context,
}

/// Camera half of the context.
pub struct Camera<'a> {
    context: &'a mut Context,
}

/// Drawing half of the context.
pub struct Draw<'a> {
    context: &'a mut Context,
}

impl Window {
    /// Creates a width x height surface, cleared to black. Both dimensions have to be positive.
    pub fn new(width: u32, height: u32, title: &str) -> Result<Window, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        info!("window \"{title}\" ({width}x{height})");
        return Ok(Window {
            title: title.to_string(),
            context: Context::new(width, height),
        });
    }

    pub fn camera(&mut self) -> Camera<'_> {
        return Camera { context: &mut self.context };
    }

    pub fn draw(&mut self) -> Draw<'_> {
        return Draw { context: &mut self.context };
    }

    /// Saves the surface as a plain PPM.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        return self.context.save(path);
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        return self.context.save_png(path);
    }

    pub fn title(&self) -> &str {
        return &self.title;
    }

    pub fn width(&self) -> u32 {
        return self.context.buffer().width;
    }

    pub fn height(&self) -> u32 {
        return self.context.buffer().height;
    }

    pub fn context(&self) -> &Context {
        return &self.context;
    }
}

impl<'a> Camera<'a> {
    /// Perspective projection with the default clip planes (0.1 and 100).
    pub fn perspective(&mut self, fov: f32, aspect: f32) -> &mut Self {
        return self.perspective_clip(fov, aspect, DEFAULT_NEAR, DEFAULT_FAR);
    }

    pub fn perspective_clip(&mut self, fov: f32, aspect: f32, near: f32, far: f32) -> &mut Self {
        self.context.perspective(fov, aspect, near, far);
        return self;
    }

    /// Checked perspective, leaves the projection as it was on error.
    pub fn try_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) -> Result<&mut Self, RenderError> {
        self.context.try_perspective(fov, aspect, near, far)?;
        return Ok(self);
    }

    /// Places the camera at eye, looking at the origin.
    pub fn look_at(&mut self, eye_x: f32, eye_y: f32, eye_z: f32) -> &mut Self {
        return self.look_at_target(eye_x, eye_y, eye_z, 0.0, 0.0, 0.0);
    }

    /// The camera only translates, so the target has no effect on the view.
    pub fn look_at_target(
        &mut self,
        eye_x: f32, eye_y: f32, eye_z: f32,
        target_x: f32, target_y: f32, target_z: f32,
    ) -> &mut Self {
        self.context.look_at(vector![eye_x, eye_y, eye_z], vector![target_x, target_y, target_z]);
        return self;
    }
}

impl<'a> Draw<'a> {
    pub fn color(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.context.color(r, g, b);
        return self;
    }

    /// Rectangle at the default depth of 2.
    pub fn rect(&mut self, left: f32, bottom: f32, right: f32, top: f32) -> &mut Self {
        return self.rect_at(left, bottom, right, top, DEFAULT_DEPTH);
    }

    pub fn rect_at(&mut self, left: f32, bottom: f32, right: f32, top: f32, z: f32) -> &mut Self {
        self.context.rect(left, bottom, right, top, z);
        return self;
    }

    /// Line at the default depth of 2.
    pub fn line(&mut self, x_0: f32, y_0: f32, x_1: f32, y_1: f32) -> &mut Self {
        return self.line_at(x_0, y_0, x_1, y_1, DEFAULT_DEPTH);
    }

    pub fn line_at(&mut self, x_0: f32, y_0: f32, x_1: f32, y_1: f32, z: f32) -> &mut Self {
        self.context.line(x_0, y_0, x_1, y_1, z);
        return self;
    }

    pub fn clear(&mut self) -> &mut Self {
        self.context.clear();
        return self;
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        return self.context.save(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{BLACK, RED};
    use crate::transform::Transform;
    use std::f32::consts::PI;

    #[test]
    fn rejects_empty_surface() {
        assert!(matches!(Window::new(0, 10, "empty"), Err(RenderError::InvalidSize { width: 0, height: 10 })));
        assert!(matches!(Window::new(10, 0, "empty"), Err(RenderError::InvalidSize { .. })));
    }

    #[test]
    fn keeps_title_and_size() {
        let window = Window::new(32, 16, "test").unwrap();
        assert_eq!(window.title(), "test");
        assert_eq!((window.width(), window.height()), (32, 16));
    }

    #[test]
    fn camera_and_draw_share_state() {
        let mut window = Window::new(100, 100, "shared").unwrap();
        window.camera().look_at(0.0, 0.0, 5.0).perspective(PI / 3.0, 1.0);
        window.draw().color(1.0, 0.0, 0.0).rect(-0.5, -0.5, 0.5, 0.5);

        let context = window.context();
        assert_eq!(*context.projection(), Transform::perspective(PI / 3.0, 1.0, DEFAULT_NEAR, DEFAULT_FAR));
        assert_eq!(context.view().as_slice()[12..15], [0.0f32, 0.0, -5.0]);
        assert_eq!(context.current_color(), RED);
    }

    #[test]
    fn target_does_not_change_view() {
        let mut a = Window::new(10, 10, "a").unwrap();
        let mut b = Window::new(10, 10, "b").unwrap();
        a.camera().look_at(1.0, 2.0, 3.0);
        b.camera().look_at_target(1.0, 2.0, 3.0, 9.0, -4.0, 0.5);
        assert_eq!(a.context().view(), b.context().view());
    }

    #[test]
    fn draw_clear_wipes_buffer() {
        let mut window = Window::new(10, 10, "clear").unwrap();
        window.draw().line(-1.0, 0.0, 1.0, 0.0).clear();
        assert_eq!(window.context().buffer().as_render_data(), vec![0u8; 300]);
        assert_eq!(window.context().buffer().pixel(5, 5), Some(BLACK));
    }
}
