use std::path::Path;

use nalgebra as na;
use na::{vector, Vector2, Vector3};
use log::{debug, trace, warn};

use crate::error::RenderError;
use crate::image::{Color, PixelBuffer, WHITE};
use crate::transform::{validate_perspective, Transform};
use crate::util::Vertex;

/// Depth used by `rect` and `line` when the caller has no better idea.
pub const DEFAULT_DEPTH: f32 = 2.0;

/// Transformation of normalized device coordinates to the pixel coordinates of a
/// width x height buffer. y is flipped, as row 0 is the top of the image.
/// Truncates toward zero and doesn't clamp, the rasterizer skips whatever ends up outside.
pub fn viewport(ndc: Vector2<f32>, width: u32, height: u32) -> Vector2<i32> {
    return vector![
        ((ndc.x + 1.0) * 0.5 * width as f32) as i32,
        ((1.0 - ndc.y) * 0.5 * height as f32) as i32
    ];
}

/// Drawing context: current color, camera transforms and the buffer everything is drawn into.
/// Every primitive goes through projection * view, the viewport and then the rasterizer.
pub struct Context {
    buffer: PixelBuffer,
    color: Color,
    projection: Transform,
    view: Transform,
}

impl Context {
    /// New context with a black buffer, white drawing color and identity transforms.
    pub fn new(width: u32, height: u32) -> Context {
        return Context {
            buffer: PixelBuffer::new(width, height),
            color: WHITE,
            projection: Transform::identity(),
            view: Transform::identity(),
        };
    }

    /// Replaces the projection. Degenerate parameters are not rejected, only logged;
    /// see `try_perspective` for the checked variant.
    pub fn perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) -> &mut Self {
        if let Err(err) = validate_perspective(fov, aspect, near, far) {
            warn!("{err}, projected geometry will be garbage");
        }
        debug!("perspective fov={fov} aspect={aspect} near={near} far={far}");
        self.projection = Transform::perspective(fov, aspect, near, far);
        return self;
    }

    /// Replaces the projection, failing without touching it on degenerate parameters.
    pub fn try_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) -> Result<&mut Self, RenderError> {
        self.projection = Transform::try_perspective(fov, aspect, near, far)?;
        debug!("perspective fov={fov} aspect={aspect} near={near} far={far}");
        return Ok(self);
    }

    /// Replaces the view with a translation by -eye. The target is ignored.
    pub fn look_at(&mut self, eye: Vector3<f32>, target: Vector3<f32>) -> &mut Self {
        debug!("look_at eye={:?}", eye.as_slice());
        self.view = Transform::look_at(eye, target);
        return self;
    }

    pub fn color(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.color = Color { r, g, b };
        return self;
    }

    /// Wireframe rectangle in the z plane: the four sides, the right-bottom to left-top
    /// diagonal and a point marker at each corner.
    pub fn rect(&mut self, left: f32, bottom: f32, right: f32, top: f32, z: f32) -> &mut Self {
        trace!("rect ({left}, {bottom}) - ({right}, {top}) at z={z}");
        let corners = [
            Vertex::new(vector![left, bottom, z], self.color, vector![0.0, 0.0]),
            Vertex::new(vector![right, bottom, z], self.color, vector![1.0, 0.0]),
            Vertex::new(vector![right, top, z], self.color, vector![1.0, 1.0]),
            Vertex::new(vector![left, top, z], self.color, vector![0.0, 1.0]),
        ];
        let points = corners.map(|vertex| self.to_screen(vertex));

        // Drawn as the two triangles 0-1-3 and 1-2-3, so 1-3 shows up as a diagonal.
        let edges = [(0, 1), (1, 3), (3, 0), (1, 2), (2, 3), (3, 1)];
        for (a, b) in edges {
            self.buffer.draw_line(points[a].x, points[a].y, points[b].x, points[b].y, self.color);
        }
        for point in points {
            self.buffer.draw_point(point.x, point.y, self.color);
        }
        return self;
    }

    /// Line segment in the z plane with point markers at both ends.
    pub fn line(&mut self, x_0: f32, y_0: f32, x_1: f32, y_1: f32, z: f32) -> &mut Self {
        trace!("line ({x_0}, {y_0}) - ({x_1}, {y_1}) at z={z}");
        let a = self.to_screen(Vertex::new(vector![x_0, y_0, z], self.color, vector![0.0, 0.0]));
        let b = self.to_screen(Vertex::new(vector![x_1, y_1, z], self.color, vector![1.0, 1.0]));

        self.buffer.draw_line(a.x, a.y, b.x, b.y, self.color);
        self.buffer.draw_point(a.x, a.y, self.color);
        self.buffer.draw_point(b.x, b.y, self.color);
        return self;
    }

    /// Resets the buffer to black. Camera and color are kept.
    pub fn clear(&mut self) -> &mut Self {
        self.buffer.clear();
        return self;
    }

    /// Writes the buffer to path as a plain PPM.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        return self.buffer.save_ppm(path);
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        return self.buffer.save_png(path);
    }

    /// projection * view, the transform every vertex goes through.
    pub fn combined(&self) -> Transform {
        return self.view.then(&self.projection);
    }

    /// Vertex through the combined transform, perspective divide and viewport.
    fn to_screen(&self, vertex: Vertex) -> Vector2<i32> {
        let ndc = self.combined().transform_vertex(vertex).position;
        return viewport(ndc.xy(), self.buffer.width, self.buffer.height);
    }

    pub fn current_color(&self) -> Color {
        return self.color;
    }

    pub fn projection(&self) -> &Transform {
        return &self.projection;
    }

    pub fn view(&self) -> &Transform {
        return &self.view;
    }

    pub fn buffer(&self) -> &PixelBuffer {
        return &self.buffer;
    }
}
