use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use reportcam::{CaptureSession, Error, FrameSource, RawFrame, SessionState};

#[derive(Parser)]
#[command(name = "reportcam")]
#[command(version)]
#[command(about = "Fill DOCX report templates with photos via PHOTO placeholder cells")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the placeholders a template contains, with capture geometry
    Inspect {
        /// Template DOCX file
        template: PathBuf,

        /// Preview viewport as WIDTHxHEIGHT, used for the guide frames
        #[arg(long, default_value = "360x640")]
        viewport: String,
    },

    /// Fill a template: one photo file per placeholder, in document order
    Compose {
        /// Template DOCX file
        template: PathBuf,

        /// Photo files standing in for camera frames, one per placeholder
        #[arg(short, long = "photo", value_name = "FILE")]
        photos: Vec<PathBuf>,

        /// Output DOCX path
        #[arg(short, long)]
        output: PathBuf,

        /// Viewport as WIDTHxHEIGHT; crops follow the same geometry the
        /// on-screen guide would show
        #[arg(long, default_value = "360x640")]
        viewport: String,
    },
}

fn parse_viewport(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s.split_once('x').ok_or("expected WIDTHxHEIGHT")?;
    let w: f64 = w.parse().map_err(|_| "bad viewport width")?;
    let h: f64 = h.parse().map_err(|_| "bad viewport height")?;
    if w <= 0.0 || h <= 0.0 {
        return Err("viewport must be positive".into());
    }
    Ok((w, h))
}

/// Frame source over photo files: each capture trigger consumes the next
/// file, as if the camera had delivered it.
struct FileFrames {
    paths: Vec<PathBuf>,
    next: usize,
}

impl FrameSource for FileFrames {
    fn next_frame(&mut self) -> Result<RawFrame, String> {
        let path = self
            .paths
            .get(self.next)
            .ok_or("no photo file left for this placeholder")?;
        self.next += 1;
        let bytes = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
        let (width, height) = image::load_from_memory(&bytes)
            .map(|img| (img.width(), img.height()))
            .map_err(|e| format!("{}: {e}", path.display()))?;
        Ok(RawFrame {
            bytes,
            width,
            height,
        })
    }
}

fn fmt_mm(v: Option<f64>) -> String {
    match v {
        Some(mm) => format!("{mm:.2}mm"),
        None => "?".to_string(),
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Commands::Inspect { template, viewport } => {
            let (vw, vh) = parse_viewport(&viewport).map_err(other)?;
            let specs = reportcam::inspect_template(&template)?;
            if specs.is_empty() {
                println!("no placeholders found");
                return Ok(());
            }
            for spec in &specs {
                let frame = spec
                    .aspect_ratio()
                    .map(|ar| reportcam::guide_frame(ar, vw, vh))
                    .map(|r| format!("guide {:.0}x{:.0} at ({:.0}, {:.0})", r.w, r.h, r.x, r.y))
                    .unwrap_or_else(|| "no guide (size unknown)".to_string());
                println!(
                    "{}  table {} row {} col {}  {} x {}  {}",
                    spec.token,
                    spec.table_index,
                    spec.row_index,
                    spec.col_index,
                    fmt_mm(spec.width_mm),
                    fmt_mm(spec.height_mm),
                    frame,
                );
            }
            Ok(())
        }
        Commands::Compose {
            template,
            photos,
            output,
            viewport,
        } => {
            let (vw, vh) = parse_viewport(&viewport).map_err(other)?;
            let specs = reportcam::inspect_template(&template)?;
            if photos.len() != specs.len() {
                return Err(other(format!(
                    "template has {} placeholder(s) but {} photo(s) were given",
                    specs.len(),
                    photos.len()
                )));
            }

            let mut session = CaptureSession::new(specs, vw, vh);
            let mut frames = FileFrames {
                paths: photos,
                next: 0,
            };
            session.start();
            while matches!(session.state(), SessionState::AwaitingCapture(_)) {
                session.capture(&mut frames)?;
            }
            let specs = session.specs().to_vec();
            let captured = session.into_photos()?;

            reportcam::compose_document(&template, &specs, &captured, &output)?;
            println!("wrote {}", output.display());
            Ok(())
        }
    }
}

fn other(msg: impl Into<String>) -> Error {
    Error::Io(std::io::Error::other(msg.into()))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
