use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ::image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use log::info;

use crate::error::RenderError;

/// Half size of the square drawn by `draw_point`, which ends up 5x5 pixels.
pub const POINT_RADIUS: i32 = 2;

/// Color with channels normally in [0.0, 1.0].
/// Nothing stops values outside of that range, they are only clamped on export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
pub const RED:   Color = Color { r: 1.0, g: 0.0, b: 0.0 };
pub const GREEN: Color = Color { r: 0.0, g: 1.0, b: 0.0 };
pub const BLUE:  Color = Color { r: 0.0, g: 0.0, b: 1.0 };

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Color {
        return Color { r, g, b };
    }

    /// rgb8 representation, channels clamped to [0, 1] and truncated after scaling by 255.
    pub fn to_rgb8(&self) -> [u8; 3] {
        fn channel(value: f32) -> u8 {
            return (value.clamp(0.0, 1.0) * 255.0) as u8;
        }
        return [channel(self.r), channel(self.g), channel(self.b)];
    }
}

/// Color buffer, holding one flat array per channel.
/// Index of pixel (x, y) is y * width + x, (0, 0) is the top left corner.
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    fb_r: Vec<f32>,
    fb_g: Vec<f32>,
    fb_b: Vec<f32>,
}

impl PixelBuffer {
    /// New buffer of the given size with every pixel set to black.
    pub fn new(width: u32, height: u32) -> PixelBuffer {
        let n_pixels = width as usize * height as usize;
        return PixelBuffer {
            width,
            height,
            fb_r: vec![0.0; n_pixels],
            fb_g: vec![0.0; n_pixels],
            fb_b: vec![0.0; n_pixels],
        };
    }

    /// Sets all pixels to black.
    pub fn clear(&mut self) {
        self.fb_r.fill(0.0);
        self.fb_g.fill(0.0);
        self.fb_b.fill(0.0);
    }

    /// Checking if coordinate is in buffer bounds.
    fn in_bounds(&self, x: i64, y: i64) -> bool {
        return x >= 0 && x < self.width as i64 && y >= 0 && y < self.height as i64;
    }

    fn index(&self, x: i64, y: i64) -> usize {
        return (y * self.width as i64 + x) as usize;
    }

    /// Color at the given pixel, None outside of the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let (x, y) = (x as i64, y as i64);
        if !self.in_bounds(x, y) {
            return None;
        }
        let index = self.index(x, y);
        return Some(Color {
            r: self.fb_r[index],
            g: self.fb_g[index],
            b: self.fb_b[index],
        });
    }

    /// Overwrites the pixel with color. Writes outside of the buffer are dropped.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        let index = self.index(x, y);
        self.fb_r[index] = color.r;
        self.fb_g[index] = color.g;
        self.fb_b[index] = color.b;
    }

    /// Draws a line between (x_0, y_0) and (x_1, y_1), both ends included,
    /// via Bresenham's algorithm as presented in https://en.wikipedia.org/wiki/Bresenham%27s_line_algorithm
    /// Only the part of the line inside the buffer is written.
    pub fn draw_line(&mut self, x_0: i32, y_0: i32, x_1: i32, y_1: i32, color: Color) {
        // Working in i64, so far off-screen endpoints don't overflow the error terms.
        let (x_0, y_0) = (x_0 as i64, y_0 as i64);
        let (x_1, y_1) = (x_1 as i64, y_1 as i64);

        // Both ends on the same outer side of the buffer, nothing to draw.
        let (w, h) = (self.width as i64, self.height as i64);
        if (x_0 < 0 && x_1 < 0) || (y_0 < 0 && y_1 < 0) || (x_0 >= w && x_1 >= w) || (y_0 >= h && y_1 >= h) {
            return;
        }

        let dx: i64 = (x_1 - x_0).abs();
        let sx: i64 = match x_0 < x_1 {
            true  =>  1,
            false => -1,
        };
        let dy: i64 = -(y_1 - y_0).abs();
        let sy: i64 = match y_0 < y_1 {
            true  =>  1,
            false => -1,
        };

        // Every iteration of the loop takes exactly one step along the major axis, so the walk
        // can be started at the first step inside the buffer and stopped after the last one.
        // Endpoints far off screen (a vertex right in front of the camera) would otherwise mean
        // billions of iterations for a few hundred visible pixels.
        let x_major = dx >= -dy;
        let (major_0, major_step, major_len, minor_len, major_size) = match x_major {
            true  => (x_0, sx, dx, -dy, w),
            false => (y_0, sy, -dy, dx, h),
        };
        let (first, last) = major_steps_in_bounds(major_0, major_step, major_len, major_size);
        if first > last {
            return;
        }

        let minor = minor_steps(first, major_len, minor_len);
        let (steps_x, steps_y) = match x_major {
            true  => (first, minor),
            false => (minor, first),
        };
        let mut x = x_0 + sx * steps_x;
        let mut y = y_0 + sy * steps_y;
        // Error term after steps_x x-steps and steps_y y-steps from the start. It stays within a
        // few multiples of dx and dy, only the products need the extra width.
        let mut error = ((dx + dy) as i128 + steps_x as i128 * dy as i128 + steps_y as i128 * dx as i128) as i64;

        let mut remaining = last - first;
        let mut e2;
        loop {
            self.set_pixel(x, y, color);
            if remaining == 0 {
                break;
            }
            remaining -= 1;
            e2 = 2 * error;
            if e2 >= dy {
                error += dy;
                x += sx;
            }
            if e2 <= dx {
                error += dx;
                y += sy;
            }
        }
    }

    /// Draws a filled square marker centered at (x, y).
    pub fn draw_point(&mut self, x: i32, y: i32, color: Color) {
        let (x, y) = (x as i64, y as i64);
        let r = POINT_RADIUS as i64;
        for dx in -r..=r {
            for dy in -r..=r {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// Get buffer as rgb8 data of size 3 * (number of pixels), rows going top to bottom.
    pub fn as_render_data(&self) -> Vec<u8> {
        let mut render_data = Vec::with_capacity(3 * self.fb_r.len());
        for i in 0..self.fb_r.len() {
            let color = Color { r: self.fb_r[i], g: self.fb_g[i], b: self.fb_b[i] };
            render_data.extend_from_slice(&color.to_rgb8());
        }
        return render_data;
    }

    /// Writes the buffer as a plain (P3) PPM: header, then one line of rgb triplets per image row.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "P3\n{} {}\n255\n", self.width, self.height)?;
        let width = self.width as usize;
        for row in 0..self.height as usize {
            for column in 0..width {
                let index = row * width + column;
                let [r, g, b] = Color { r: self.fb_r[index], g: self.fb_g[index], b: self.fb_b[index] }.to_rgb8();
                if column > 0 {
                    out.write_all(b" ")?;
                }
                write!(out, "{} {} {}", r, g, b)?;
            }
            out.write_all(b"\n")?;
        }
        return Ok(());
    }

    /// Saves the buffer to a PPM file at path.
    pub fn save_ppm<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        let io_error = |source| RenderError::Io { path: path.to_path_buf(), source };

        let file = File::create(path).map_err(io_error)?;
        let mut out = BufWriter::new(file);
        self.write_ppm(&mut out).map_err(io_error)?;
        out.flush().map_err(io_error)?;

        info!("saved {}x{} ppm to {}", self.width, self.height, path.display());
        return Ok(());
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        return ImageBuffer::from_fn(self.width, self.height, |x, y| {
            // Always in bounds, from_fn only visits the buffer's own pixels.
            let color = self.pixel(x as i32, y as i32).unwrap_or(BLACK);
            Rgb(color.to_rgb8())
        });
    }

    /// Saves the buffer as a PNG through the image crate.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.to_rgb_image().save_with_format(path, ImageFormat::Png)?;
        info!("saved {}x{} png to {}", self.width, self.height, path.display());
        return Ok(());
    }
}

/// Range of major axis steps (0..=len) whose coordinate start + step * n lies in [0, size).
/// Empty when first > last.
fn major_steps_in_bounds(start: i64, step: i64, len: i64, size: i64) -> (i64, i64) {
    let (first, last) = match step > 0 {
        true  => (-start, size - 1 - start),
        false => (start - (size - 1), start),
    };
    return (first.max(0), last.min(len));
}

/// Minor axis steps the Bresenham walk has taken after n major axis steps:
/// floor(n * minor_len / major_len + 1/2), computed exactly in integers.
fn minor_steps(n: i64, major_len: i64, minor_len: i64) -> i64 {
    if major_len == 0 {
        return 0;
    }
    let numerator = 2 * n as i128 * minor_len as i128 + major_len as i128;
    return (numerator / (2 * major_len as i128)) as i64;
}
