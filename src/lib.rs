//! Immediate-mode software wireframe renderer.
//!
//! Rectangles and lines given in world space go through a projection * view transform,
//! get mapped to pixels and are rasterized as edges plus corner markers into a color
//! buffer, which can be exported as a plain PPM (or a PNG through the `image` crate).

pub mod error;
pub mod image;
pub mod scene;
pub mod transform;
pub mod util;
pub mod window;

pub use crate::error::RenderError;
pub use crate::image::{Color, PixelBuffer};
pub use crate::scene::{viewport, Context};
pub use crate::transform::Transform;
pub use crate::util::Vertex;
pub use crate::window::{Camera, Draw, Window};
