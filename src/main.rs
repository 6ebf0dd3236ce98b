use std::process::ExitCode;

use eframe::egui;

use paintr::app::PaintrApp;
use paintr::{cli, logger};

fn main() -> ExitCode {
    // Headless mode: any flag argument means convert-and-exit, no window.
    if cli::is_cli_mode() {
        return cli::run();
    }

    // Initialize session log (overwrites previous session log)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_title("Paintr"),
        ..Default::default()
    };

    match eframe::run_native(
        "Paintr",
        options,
        Box::new(|cc| Box::new(PaintrApp::new(cc))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("paintr: failed to start GUI: {err}");
            ExitCode::FAILURE
        }
    }
}
