use clap::{Parser, Subcommand};
use simple_resize::config::{self, ResizeConfig};
use simple_resize::engine::{ResizeEngine, ResizeOutcome, ResizeResult};
use simple_resize::imaging::{Edge, OutputFormat, RustBackend};
use simple_resize::input::InputFile;
use simple_resize::output::{self, PreviewHandle, ResizeReport};
use simple_resize::session::ResizeSession;
use simple_resize::ResizeError;
use std::path::PathBuf;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Target size flags. Anything not given keeps its configured value.
#[derive(clap::Args, Clone, Debug)]
struct SizeArgs {
    /// Target width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Target height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Scale by percent instead of pixels (100 = unchanged)
    #[arg(long, value_name = "PERCENT", conflicts_with_all = ["width", "height"])]
    percent: Option<f64>,

    /// Keep the source aspect ratio
    #[arg(long, conflicts_with = "no_keep_aspect")]
    keep_aspect: bool,

    /// Allow width and height to distort the image
    #[arg(long)]
    no_keep_aspect: bool,

    /// Edge that wins when both --width and --height are given with the aspect lock on
    #[arg(long, value_name = "EDGE")]
    fixed: Option<Edge>,
}

/// Output encoding flags.
#[derive(clap::Args, Clone, Debug)]
struct EncodeArgs {
    /// Output format: jpeg, png or webp
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Quality from 0.0 to 1.0 (JPEG only)
    #[arg(long)]
    quality: Option<f32>,
}

#[derive(Parser)]
#[command(name = "simple-resize")]
#[command(about = "Resize images locally")]
#[command(long_about = "\
Resize images locally

Give a target in pixels (--width/--height) or percent (--percent). With the
aspect lock on, the edge you give wins and the other follows the source's
ratio; if you give both, --fixed decides which one wins.

Results are saved as resized-<width>x<height>.<ext>.

Run 'simple-resize gen-config' to generate a documented simple-resize.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./simple-resize.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize an image and save the result
    Resize {
        input: PathBuf,
        #[command(flatten)]
        size: SizeArgs,
        #[command(flatten)]
        encode: EncodeArgs,
        /// Directory to save into (overrides output.directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the output dimensions without encoding anything
    Dims {
        input: PathBuf,
        #[command(flatten)]
        size: SizeArgs,
    },
    /// Render a temporary preview and release it when Enter is pressed
    Preview {
        input: PathBuf,
        #[command(flatten)]
        size: SizeArgs,
        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Print a stock simple-resize.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simple_resize=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config(cli.config.as_deref(), &std::env::current_dir()?)?;

    match cli.command {
        Command::Resize {
            input,
            size,
            encode,
            out_dir,
            json,
        } => {
            let (engine, session) = prepare(&config, &input, &size, Some(&encode))?;
            let result = finish(session.resize(&engine).await?)?;
            let dir = out_dir.unwrap_or_else(|| config.output.directory.clone());
            let saved = output::save_download(&result, &dir)?;
            let report = report_for(&session, &result).with_saved(saved);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in output::format_report(&report) {
                    println!("{line}");
                }
            }
        }
        Command::Dims { input, size } => {
            let (_, session) = prepare(&config, &input, &size, None)?;
            println!("{}", session.target_dimensions()?);
        }
        Command::Preview {
            input,
            size,
            encode,
        } => {
            let (engine, session) = prepare(&config, &input, &size, Some(&encode))?;
            let result = finish(session.resize(&engine).await?)?;
            let preview = PreviewHandle::create(&result)?;
            for line in output::format_report(&report_for(&session, &result)) {
                println!("{line}");
            }
            println!("Preview: {}", preview.url());
            println!("Press Enter to release the preview");
            let mut line = String::new();
            tokio::io::BufReader::new(tokio::io::stdin())
                .read_line(&mut line)
                .await?;
            preview.revoke()?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Accept and decode the input, then replay the flags as session edits.
fn prepare(
    config: &ResizeConfig,
    input: &std::path::Path,
    size: &SizeArgs,
    encode: Option<&EncodeArgs>,
) -> Result<(ResizeEngine<RustBackend>, ResizeSession), ResizeError> {
    let engine = ResizeEngine::new(RustBackend::new()).with_max_edge(config.output.max_edge);
    let file = InputFile::open(input)?;
    let source = engine.decode(&file)?;

    let mut session = ResizeSession::from_config(config);
    session.load(file.name(), source);
    apply_size_args(&mut session, size, config.size.authoritative)?;
    if let Some(encode) = encode {
        if let Some(format) = encode.format {
            session.set_format(format);
        }
        if let Some(quality) = encode.quality {
            session.set_quality(quality);
        }
    }
    Ok((engine, session))
}

fn apply_size_args(
    session: &mut ResizeSession,
    size: &SizeArgs,
    default_fixed: Edge,
) -> Result<(), ResizeError> {
    if size.keep_aspect {
        session.set_keep_aspect(true)?;
    }
    if size.no_keep_aspect {
        session.set_keep_aspect(false)?;
    }

    if let Some(percent) = size.percent {
        session.set_use_percent(true);
        session.set_percent(percent);
        return Ok(());
    }
    if size.width.is_some() || size.height.is_some() {
        session.set_use_percent(false);
    }

    // The edge edited last is authoritative, so the fixed edge goes last.
    let fixed = size.fixed.unwrap_or(default_fixed);
    match (size.width, size.height, fixed) {
        (Some(w), Some(h), Edge::Width) => {
            session.set_height(h)?;
            session.set_width(w)?;
        }
        (Some(w), Some(h), Edge::Height) => {
            session.set_width(w)?;
            session.set_height(h)?;
        }
        (Some(w), None, _) => session.set_width(w)?,
        (None, Some(h), _) => session.set_height(h)?,
        (None, None, _) => {}
    }
    Ok(())
}

fn finish(outcome: ResizeOutcome) -> Result<ResizeResult, ResizeError> {
    outcome
        .into_fresh()
        .ok_or_else(|| ResizeError::Task("resize was superseded".to_string()))
}

fn report_for(session: &ResizeSession, result: &ResizeResult) -> ResizeReport {
    let (name, natural) = session
        .source()
        .map(|s| (s.name.as_str(), s.image.dimensions()))
        .unwrap_or(("", result.dimensions()));
    ResizeReport::new(name, natural, result, session.quality())
}
