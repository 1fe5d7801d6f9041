use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the renderer.
/// Out-of-bounds drawing is never an error, pixels outside the buffer are just skipped.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid perspective parameters: fov={fov}, aspect={aspect}, near={near}, far={far}")]
    InvalidCamera {
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },

    #[error("surface size must be positive, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("unable to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("image export failed: {0}")]
    Image(#[from] ::image::ImageError),
}
