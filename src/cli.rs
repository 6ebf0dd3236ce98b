// ============================================================================
// Paintr CLI — headless image conversion via command-line arguments
// ============================================================================
//
// Usage examples:
//   paintr --input photo.jpg --output drawing.png
//   paintr -i scan.webp -o fitted.png --width 800 --height 600
//
// No GUI is opened in CLI mode. The input is validated against the same
// allow-list and size cap as a GUI import, optionally aspect-fitted onto a
// fixed canvas, and written out as PNG.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::color::StyleState;
use crate::io;

/// Paintr headless converter.
#[derive(Parser, Debug)]
#[command(
    name = "paintr",
    about = "Paintr headless image converter",
    long_about = "Convert an image to PNG without opening the GUI, applying the\n\
                  same format allow-list (PNG, JPEG, GIF, WEBP) and 10 MiB size\n\
                  cap as an interactive import.\n\n\
                  Example:\n  \
                  paintr --input photo.jpg --output out.png --width 800 --height 600"
)]
pub struct CliArgs {
    /// Input image file (PNG, JPEG, GIF, or WEBP; sniffed from the bytes).
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output PNG path.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Canvas width to fit the image onto. Requires --height.
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Canvas height to fit the image onto. Requires --width.
    #[arg(long, requires = "width")]
    pub height: Option<u32>,
}

/// True when the process was invoked with CLI arguments (any argument
/// starting with `-` besides the bare program name).
pub fn is_cli_mode() -> bool {
    std::env::args().skip(1).any(|a| a.starts_with('-'))
}

/// Run the headless conversion. Never opens a window.
pub fn run() -> ExitCode {
    let args = CliArgs::parse();
    let image = match io::load_image(&args.input) {
        Ok(img) => img,
        Err(err) => {
            eprintln!("paintr: cannot load {}: {err}", args.input.display());
            return ExitCode::FAILURE;
        }
    };

    let output = match (args.width, args.height) {
        (Some(w), Some(h)) => io::fit_to_canvas(&image, w, h, StyleState::default().background()),
        _ => image,
    };

    if let Err(err) = io::export_png(&args.output, &output) {
        eprintln!("paintr: cannot write {}: {err}", args.output.display());
        return ExitCode::FAILURE;
    }
    println!("Wrote {}", args.output.display());
    ExitCode::SUCCESS
}
