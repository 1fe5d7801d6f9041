mod app;

use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Default values.
    let mut params = app::Params::default();

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).ok_or_else(|| format!("missing value for {}", args[i]))?;
        match args[i].as_str() {
            "-o" => { params.output = PathBuf::from(value); }
            "-W" => { params.width = value.parse()?; }
            "-H" => { params.height = value.parse()?; }
            "-t" => { params.title = value.clone(); }
            "--png" => { params.png_output = Some(PathBuf::from(value)); }
            other => { return Err(format!("unknown argument {other}").into()); }
        }
        i += 2;
    }

    app::run(params)?;

    return Ok(());
}
