//! Render a document request to PDF
//!
//! Reads a JSON `DocumentRequest` and writes the PDF under its suggested
//! file name.
//!
//! Usage:
//!   cargo run --release --bin render_document -- request.json
//!   cargo run --release --bin render_document -- request.json --output-dir out --font fonts/NotoNastaliqUrdu.ttf
//!   cargo run --release --bin render_document -- request.json --config layout.json --jpeg 80
//!
//! Set `RUST_LOG=debug` for per-page progress.

use dastavez::{DocumentKind, DocumentPipeline, DocumentRequest, FontProvider, LayoutConfig};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

struct RenderArgs {
    request: PathBuf,
    output_dir: PathBuf,
    config: Option<PathBuf>,
    fonts: Vec<PathBuf>,
    system_fonts: bool,
    jpeg_quality: Option<u8>,
}

impl RenderArgs {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut request = None;
        let mut output_dir = PathBuf::from(".");
        let mut config = None;
        let mut fonts = Vec::new();
        let mut system_fonts = true;
        let mut jpeg_quality = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--output-dir" | "-o" => {
                    i += 1;
                    output_dir = PathBuf::from(args.get(i).ok_or("--output-dir needs a value")?);
                },
                "--config" => {
                    i += 1;
                    config = Some(PathBuf::from(args.get(i).ok_or("--config needs a value")?));
                },
                "--font" => {
                    i += 1;
                    fonts.push(PathBuf::from(args.get(i).ok_or("--font needs a value")?));
                },
                "--no-system-fonts" => {
                    system_fonts = false;
                },
                "--jpeg" => {
                    i += 1;
                    let value = args.get(i).ok_or("--jpeg needs a quality")?;
                    jpeg_quality = Some(value.parse().map_err(|_| format!("invalid JPEG quality: {}", value))?);
                },
                other if !other.starts_with('-') && request.is_none() => {
                    request = Some(PathBuf::from(other));
                },
                other => return Err(format!("unknown argument: {}", other)),
            }
            i += 1;
        }

        Ok(Self {
            request: request.ok_or("missing request file")?,
            output_dir,
            config,
            fonts,
            system_fonts,
            jpeg_quality,
        })
    }
}

fn load_config(args: &RenderArgs, request: &DocumentRequest) -> Result<LayoutConfig, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => match request.kind {
            DocumentKind::Translation { .. } => LayoutConfig::translation(),
            _ => LayoutConfig::default(),
        },
    };
    Ok(match args.jpeg_quality {
        Some(quality) => config.as_jpeg(quality),
        None => config,
    })
}

fn run(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request: DocumentRequest = serde_json::from_str(&fs::read_to_string(&args.request)?)?;
    let config = load_config(&args, &request)?;

    let provider = if args.system_fonts {
        FontProvider::with_system_fonts()
    } else {
        FontProvider::new()
    };
    for path in &args.fonts {
        let faces = provider.register_font_data(fs::read(path)?)?;
        log::info!("Registered {} face(s) from {}", faces, path.display());
    }

    let start = Instant::now();
    let pipeline = DocumentPipeline::new(Arc::new(provider), config);
    let document = pipeline.generate(&request)?;

    fs::create_dir_all(&args.output_dir)?;
    let path = document.save_in(&args.output_dir)?;

    for warning in &document.warnings {
        eprintln!("warning: {}", warning);
    }
    println!(
        "{} ({} page(s), {} bytes) in {:.2?}",
        path.display(),
        document.page_count,
        document.bytes.len(),
        start.elapsed()
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let args = match RenderArgs::from_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: render_document <request.json> [--output-dir DIR] [--config FILE] [--font FILE]... [--no-system-fonts] [--jpeg QUALITY]");
            std::process::exit(2);
        },
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
