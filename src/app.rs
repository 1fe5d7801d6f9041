use std::f32::consts::PI;
use std::path::PathBuf;

use log::info;

use wire_renderer::Window;

/// Everything the demo needs to know to render and export a frame.
pub struct Params {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub output: PathBuf,
    pub png_output: Option<PathBuf>, // Extra PNG copy of the frame, if requested.
}

impl Default for Params {
    fn default() -> Self {
        return Params {
            width: 800,
            height: 600,
            title: String::from("wire_renderer"),
            output: PathBuf::from("out.ppm"),
            png_output: None,
        };
    }
}

/// Renders the demo scene: a red rectangle and a green diagonal seen from z = 5.
pub fn run(params: Params) -> Result<(), Box<dyn std::error::Error>> {
    let mut window = Window::new(params.width, params.height, &params.title)?;
    let aspect = params.width as f32 / params.height as f32;

    window.camera()
        .look_at(0.0, 0.0, 5.0)
        .perspective(PI / 3.0, aspect);

    window.draw()
        .color(1.0, 0.0, 0.0)
        .rect(-0.5, -0.5, 0.5, 0.5)
        .color(0.0, 1.0, 0.0)
        .line(-0.8, -0.8, 0.8, 0.8);

    window.save(&params.output)?;
    if let Some(png_output) = &params.png_output {
        window.save_png(png_output)?;
    }
    info!("done rendering \"{}\"", window.title());

    return Ok(());
}
