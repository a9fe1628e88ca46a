//! Gridgui Headless Runner
//!
//! Builds a small layered GUI on the software backend, renders a single
//! frame and writes the layer snapshot (and optionally the frame) to disk.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use gridgui::app::Config;
use gridgui::core::Color;
use gridgui::gui::{Gui, LayerRect, RenderOrder};
use gridgui::renderer::{FontRegistry, FontRenderer, PixelBuffer, SoftwareBackend};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CONSOLE_LAYER: i32 = 1;
const PANEL_LAYER: i32 = 2;

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_file: Option<PathBuf> = None;
    let mut width: Option<u32> = None;
    let mut height: Option<u32> = None;
    let mut snapshot_file: Option<PathBuf> = None;
    let mut ppm_file: Option<PathBuf> = None;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                if i < args.len() {
                    config_file = Some(PathBuf::from(&args[i]));
                }
            },
            "-W" | "--width" => {
                i += 1;
                if i < args.len() {
                    width = args[i].parse().ok();
                }
            },
            "-H" | "--height" => {
                i += 1;
                if i < args.len() {
                    height = args[i].parse().ok();
                }
            },
            "-s" | "--snapshot" => {
                i += 1;
                if i < args.len() {
                    snapshot_file = Some(PathBuf::from(&args[i]));
                }
            },
            "-p" | "--ppm" => {
                i += 1;
                if i < args.len() {
                    ppm_file = Some(PathBuf::from(&args[i]));
                }
            },
            "-h" | "--help" => {
                show_help = true;
            },
            other => {
                tracing::warn!("Ignoring unknown argument '{}'", other);
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let mut config = match &config_file {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            },
        },
        None => Config::load_or_default(),
    };
    if let Some(w) = width {
        config.screen_width = w;
    }
    if let Some(h) = height {
        config.screen_height = h;
    }

    match run(&config, snapshot_file, ppm_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(
    config: &Config,
    snapshot_file: Option<PathBuf>,
    ppm_file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let fonts = load_fonts(config);
    let has_font = fonts.contains(&config.default_font);
    let backend = SoftwareBackend::new(fonts).with_palette(config.palette.clone());

    let mut gui = Gui::new(backend, config.screen_width, config.screen_height)?;

    if has_font {
        gui.add_layer(
            CONSOLE_LAYER,
            LayerRect::new(0, 0, config.screen_width, config.screen_height),
            &config.default_font,
            |rect: &mut LayerRect, w: u32, h: u32| {
                rect.x = 0;
                rect.y = 0;
                rect.w = w;
                rect.h = h;
            },
            true,
            RenderOrder::Auto,
        )?;
    } else {
        tracing::error!(
            "Font '{}' is not available, skipping console layer",
            config.default_font
        );
    }

    // A panel covering the middle of the screen
    gui.add_owner_layer(
        PANEL_LAYER,
        LayerRect::new(0, 0, 1, 1),
        |rect: &mut LayerRect, w: u32, h: u32| {
            rect.w = (w / 2).max(1);
            rect.h = (h / 2).max(1);
            rect.x = (w / 4) as i32;
            rect.y = (h / 4) as i32;
        },
        |rect: &LayerRect, surface: &mut PixelBuffer| {
            surface.fill_rect(0, 0, rect.w, rect.h, [32, 64, 128, 192]);
            surface.fill_rect(0, 0, rect.w, 2, [255, 255, 255, 255]);
        },
        RenderOrder::Auto,
    )?;

    // Lay everything out for the configured screen size
    gui.on_resize(config.screen_width, config.screen_height)?;

    if let Some(console) = gui.get_layer(CONSOLE_LAYER).and_then(|l| l.console_mut()) {
        let (cols, rows) = console.grid_size();
        console.draw_box(0, 0, cols, rows, Color::WHITE, Color::BLACK);
        console.print_center(0, " gridgui ", Color::YELLOW, Color::BLACK);
    }

    let mut window = PixelBuffer::new(config.screen_width, config.screen_height)?;
    let (r, g, b) = config.clear_color;
    window.clear([r, g, b, 255]);
    gui.render(&mut window)?;

    let snapshot = gui.snapshot();
    tracing::info!("Rendered {} layers", gui.len());
    tracing::debug!("\n{}", snapshot.to_text());

    let json = snapshot.to_json()?;
    match snapshot_file {
        Some(path) => std::fs::write(&path, json)?,
        None => println!("{}", json),
    }

    if let Some(path) = ppm_file {
        window.write_ppm(BufWriter::new(File::create(&path)?))?;
        tracing::info!("Wrote frame to {}", path.display());
    }

    Ok(())
}

fn load_fonts(config: &Config) -> FontRegistry {
    let mut registry = match FontRegistry::from_config(config) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::warn!("Failed to load configured fonts: {}", e);
            FontRegistry::new()
        },
    };

    if !registry.contains(&config.default_font) {
        match FontRenderer::with_default_font(16.0) {
            Ok(font) => registry.register(&config.default_font, font),
            Err(e) => tracing::warn!("No system font found: {}", e),
        }
    }
    registry
}

fn print_help() {
    println!("Gridgui Headless Runner");
    println!();
    println!("Usage: gridgui-headless [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>    Load configuration from a JSON file");
    println!("  -W, --width <N>        Override screen width in pixels");
    println!("  -H, --height <N>       Override screen height in pixels");
    println!("  -s, --snapshot <PATH>  Write the layer snapshot here instead of stdout");
    println!("  -p, --ppm <PATH>       Write the rendered frame as a PPM image");
    println!("  -h, --help             Show this help message");
    println!();
    println!("Environment:");
    println!("  RUST_LOG               Log filter (default: info)");
}
