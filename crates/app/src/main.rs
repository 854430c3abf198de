#[cfg(not(target_arch = "wasm32"))]
use std::process;

#[cfg(not(target_arch = "wasm32"))]
use eframe::egui;

mod app;
#[cfg(not(target_arch = "wasm32"))]
mod args;
mod error;
#[cfg(not(target_arch = "wasm32"))]
mod headless;
mod host;

#[cfg(not(target_arch = "wasm32"))]
type CreatorError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    let (console, log_level_state) = app::setup_tracing();

    tracing::info!("Solido starting");

    let args: Vec<String> = std::env::args().collect();
    let launch = match args::LaunchArgs::parse(&args) {
        Ok(launch) => launch,
        Err(err) => {
            eprintln!("{err}");
            args::print_help();
            process::exit(2);
        }
    };
    if launch.help {
        args::print_help();
        return Ok(());
    }

    match headless::maybe_run_headless(&launch) {
        Ok(true) => return Ok(()),
        Ok(false) => {}
        Err(err) => {
            eprintln!("headless error: {err}");
            process::exit(1);
        }
    }

    let loaded = launch.load_settings().and_then(|settings| {
        let config = launch.scene_config()?;
        Ok((settings, config))
    });
    let (settings, config) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 700.0]),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };
    let inbox = host::HostInbox::new();
    eframe::run_native(
        "Solido",
        native_options,
        Box::new(move |cc| {
            app::SolidoApp::new(cc, console, log_level_state, settings, config, inbox)
                .map(|app| Box::new(app) as Box<dyn eframe::App>)
                .map_err(CreatorError::from)
        }),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {}
