use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use resume_export::capture::{Capturer, RasterOptions};
use resume_export::config;
use resume_export::export::{DownloadDir, ExportRequest, ExportState, Exporter};
use resume_export::pdf::Orientation;
use resume_export::resume::{ResumeData, ResumeStore, TemplateKind, render_with};
use resume_export::surface::{Framebuffer, Surface};

/// Résumé Export - render résumé data and save it as a PDF
#[derive(Parser, Debug)]
#[command(
    name = "resume-export",
    about = "Render résumé data with a template and export it as a single-page A4 PDF",
    after_help = "ENVIRONMENT VARIABLES:\n\
        RESUME_EXPORT_OUTPUT_DIR     Directory finished PDFs are saved to\n\
        RESUME_EXPORT_SCALE          Capture scale factor\n\
        RESUME_EXPORT_FILENAME       Fallback file name (without .pdf)\n\
        RESUME_EXPORT_JPEG_QUALITY   Snapshot JPEG quality (1-100)\n\
        RESUME_EXPORT_TEMPLATE       Template for an empty résumé\n\
        RUST_LOG                     Log filter (e.g. resume_export=debug)"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export résumé data as a PDF
    Export {
        /// Résumé JSON (stored envelope or bare document)
        #[arg(short, long)]
        data: PathBuf,

        /// Template: modern, classic or minimal (default: the résumé's own choice)
        #[arg(short, long)]
        template: Option<TemplateKind>,

        /// File name without extension (default: the person's name)
        #[arg(short, long)]
        filename: Option<String>,

        /// Capture scale factor
        #[arg(short, long, env = "RESUME_EXPORT_SCALE", default_value = "2")]
        scale: f64,

        /// Directory the PDF is saved to
        #[arg(short, long, env = "RESUME_EXPORT_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Lay the page out landscape instead of portrait
        #[arg(long)]
        landscape: bool,

        /// Output the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a mock framebuffer to smoke-test the pipeline
    Mock {
        /// Width in pixels
        #[arg(short = 'W', long, default_value_t = config::DEFAULT_MOCK_WIDTH)]
        width: u32,

        /// Height in pixels
        #[arg(short = 'H', long, default_value_t = config::DEFAULT_MOCK_HEIGHT)]
        height: u32,

        /// Fill color as hex (e.g., "ff0000" for red)
        #[arg(short, long, default_value = "ffffff")]
        color: String,

        /// Directory the PDF is saved to
        #[arg(short, long, env = "RESUME_EXPORT_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// File name without extension
        #[arg(short, long, default_value = "mock")]
        filename: String,
    },

    /// Render résumé data to a PNG without exporting
    Preview {
        /// Résumé JSON (stored envelope or bare document)
        #[arg(short, long)]
        data: PathBuf,

        /// Template: modern, classic or minimal (default: the résumé's own choice)
        #[arg(short, long)]
        template: Option<TemplateKind>,

        /// Output PNG path
        #[arg(short, long, default_value = "./resume_preview.png")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    match args.command {
        Some(Commands::Export {
            data,
            template,
            filename,
            scale,
            output_dir,
            landscape,
            json,
        }) => {
            let resume = ResumeStore::new(&data).load()?;
            let kind = pick_template(&resume, template);
            let preview = render_with(&resume, kind);

            let filename = filename.unwrap_or_else(|| resume.export_filename(&config::default_filename()));
            let orientation = if landscape { Orientation::Landscape } else { Orientation::Portrait };
            let request = ExportRequest::new(filename).scale(scale).orientation(orientation);

            let state = run_export(&preview, &request, &output_dir).await;
            report(&state, json, &[("template", kind.name())])?;
        }

        Some(Commands::Mock {
            width,
            height,
            color,
            output_dir,
            filename,
        }) => {
            let color_bytes = parse_hex_color(&color)?;
            let mut fb = Framebuffer::with_color(width, height, color_bytes).with_id("mock");

            // Draw some sample content
            fb.draw_text(10, 10, "Mock Framebuffer", contrast(color_bytes), color_bytes);
            fb.draw_rect(10, 30, 100, 50, [128, 128, 128]);

            let request = ExportRequest::new(filename).scale(1.0);
            let state = run_export(&fb, &request, &output_dir).await;
            report(&state, false, &[])?;
            println!("  Surface: {}x{}", width, height);
        }

        Some(Commands::Preview { data, template, output }) => {
            let resume = ResumeStore::new(&data).load()?;
            let kind = pick_template(&resume, template);
            let preview = render_with(&resume, kind);

            std::fs::write(&output, preview.to_png()?)?;

            println!("Created preview: {}", output.display());
            println!("  Template: {}", kind);
            println!("  Size: {}x{}", preview.width(), preview.height());
        }

        None => {
            println!("Résumé Export - render résumé data and save it as a PDF");
            println!();
            println!("Usage: resume-export <COMMAND>");
            println!();
            println!("Commands:");
            println!("  export   Export résumé data as a single-page A4 PDF");
            println!("  mock     Export a mock framebuffer to smoke-test the pipeline");
            println!("  preview  Render résumé data to a PNG without exporting");
            println!();
            println!("Run with --help for more information.");
        }
    }

    Ok(())
}

/// An explicit choice wins; an empty résumé falls back to the configured template
fn pick_template(resume: &ResumeData, explicit: Option<TemplateKind>) -> TemplateKind {
    explicit.unwrap_or_else(|| {
        if resume.is_blank() {
            config::template()
        } else {
            resume.selected_template
        }
    })
}

async fn run_export(surface: &dyn Surface, request: &ExportRequest, output_dir: &Path) -> ExportState {
    let options = RasterOptions {
        jpeg_quality: config::jpeg_quality(),
        ..RasterOptions::default()
    };
    let exporter = Exporter::new(
        Capturer::scaling().with_options(options),
        DownloadDir::new(output_dir),
    );

    exporter.export(surface, request).await;
    exporter.status().current()
}

fn report(state: &ExportState, as_json: bool, extra: &[(&str, &str)]) -> Result<(), Box<dyn Error>> {
    if as_json {
        let mut out = json!({
            "state": state.label(),
            "path": state.saved_path().map(|p| p.display().to_string()),
            "error": state.error().map(|e| e.to_string()),
            "error_kind": state.error().map(|e| e.kind()),
        });
        for (key, value) in extra {
            out[*key] = json!(value);
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
    }

    match state {
        ExportState::Succeeded(path) => {
            if !as_json {
                println!("Exported PDF: {}", path.display());
            }
            Ok(())
        }
        ExportState::Failed(err) => Err(format!("Export failed: {}", err).into()),
        other => Err(format!("Export did not finish (state: {})", other.label()).into()),
    }
}

/// White text on dark fills, black on light ones
fn contrast(bg: [u8; 3]) -> [u8; 3] {
    let luma = (bg[0] as u32 * 299 + bg[1] as u32 * 587 + bg[2] as u32 * 114) / 1000;
    if luma > 128 { [0, 0, 0] } else { [255, 255, 255] }
}

fn parse_hex_color(hex: &str) -> Result<[u8; 3], Box<dyn Error>> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err("Color must be 6 hex digits (e.g., 'ff0000')".into());
    }
    let r = u8::from_str_radix(&hex[0..2], 16)?;
    let g = u8::from_str_radix(&hex[2..4], 16)?;
    let b = u8::from_str_radix(&hex[4..6], 16)?;
    Ok([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("ff0000").unwrap(), [255, 0, 0]);
        assert_eq!(parse_hex_color("#0a0B0c").unwrap(), [10, 11, 12]);
        assert!(parse_hex_color("fff").is_err());
        assert!(parse_hex_color("zz0000").is_err());
    }

    #[test]
    fn test_parse_hex_color_rejects_non_ascii() {
        // Six bytes, but not six characters
        assert!(parse_hex_color("a\u{e9}123").is_err());
        assert!(parse_hex_color("\u{e9}\u{e9}\u{e9}").is_err());
    }
}
