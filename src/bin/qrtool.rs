use anyhow::Context;
use clap::{Parser, Subcommand};
use qr_forge::tools::{init_tracing, load_settings, logo_base64_from_file, read_bytes};
use qr_forge::utils::codec::to_base64;
use qr_forge::{QrError, QrService, ReadRequest, RenderRequest, StatisticsStore};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "Render and read QR codes")]
struct Cli {
    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a payload to a PNG
    Generate {
        #[arg(long)]
        text: String,
        /// Output file; base64 goes to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        pixel_size: Option<u32>,
        #[arg(long, default_value = "#000000")]
        fg: String,
        #[arg(long, default_value = "#FFFFFF")]
        bg: String,
        #[arg(long)]
        bubble: bool,
        #[arg(long)]
        transparent: bool,
        /// Logo image to place in the center
        #[arg(long)]
        logo: Option<PathBuf>,
        /// Also print the PNG as base64 when writing to --out
        #[arg(long)]
        base64: bool,
    },
    /// Decode the QR code in an image
    Read {
        #[arg(long)]
        image: PathBuf,
    },
    /// Summarize a JSON-lines statistics log
    Stats {
        #[arg(long)]
        records: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;

    match cli.command {
        Command::Generate {
            text,
            out,
            pixel_size,
            fg,
            bg,
            bubble,
            transparent,
            logo,
            base64,
        } => {
            let logo_base64 = logo.as_deref().map(logo_base64_from_file).transpose()?;
            let request = RenderRequest {
                payload: text,
                pixel_size,
                foreground: fg,
                background: bg,
                logo_base64,
                bubble,
                transparent_background: transparent,
            };
            generate_cmd(QrService::new(settings)?, &request, out.as_deref(), base64)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Read { image } => read_cmd(QrService::new(settings)?, &image),
        Command::Stats { records } => {
            stats_cmd(&records)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn generate_cmd(
    service: QrService,
    request: &RenderRequest,
    out: Option<&Path>,
    base64: bool,
) -> anyhow::Result<()> {
    let png = service.render_png(request)?;
    if let Some(path) = out {
        std::fs::write(path, &png)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Wrote {} ({} bytes)", path.display(), png.len());
    }
    if base64 || out.is_none() {
        println!("{}", to_base64(&png));
    }
    Ok(())
}

fn read_cmd(service: QrService, image: &Path) -> anyhow::Result<ExitCode> {
    let bytes = read_bytes(image).with_context(|| format!("failed to read {}", image.display()))?;
    match service.read(&ReadRequest { image: bytes }) {
        Ok(response) => {
            println!("{}", response.text);
            Ok(ExitCode::SUCCESS)
        }
        Err(QrError::SymbolNotFound) => {
            eprintln!("No QR code found in {}", image.display());
            Ok(ExitCode::from(2))
        }
        Err(err) => Err(err.into()),
    }
}

fn stats_cmd(records: &Path) -> anyhow::Result<()> {
    let file =
        File::open(records).with_context(|| format!("failed to open {}", records.display()))?;
    let store = StatisticsStore::load_json_lines(BufReader::new(file))?;
    println!("{}", serde_json::to_string_pretty(&store.summary())?);
    Ok(())
}
