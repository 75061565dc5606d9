//! `richline` command-line entrypoint: inspect, reflow and map markdown lines.

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use richline::{CreatedBy, EditorConfig, LineDocument};
#[cfg(feature = "cli")]
use std::io::{self, Read};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "richline", about = "Richline document tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Print every line's display text and marks as JSON.
    Decode { file: Option<PathBuf> },
    /// Reflow every line to a display-width budget.
    Wrap {
        #[arg(short, long, env = "RICHLINE_CHARS_PER_LINE")]
        width: Option<usize>,
        file: Option<PathBuf>,
    },
    /// Translate a display offset on one line into a markdown offset.
    Map {
        #[arg(short, long)]
        line: usize,
        #[arg(short = 'p', long)]
        display_pos: usize,
        file: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn read_input(file: Option<PathBuf>) -> anyhow::Result<LineDocument> {
    let text = match file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|err| anyhow::anyhow!("failed to read {}: {}", path.display(), err))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let text = text.strip_suffix('\n').unwrap_or(&text);
    Ok(LineDocument::from_markdown(text, CreatedBy::Human))
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "richline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = EditorConfig::from_env();
    config.validate()?;

    match cli.command {
        Commands::Decode { file } => {
            let document = read_input(file)?;
            println!("{}", serde_json::to_string_pretty(document.lines())?);
        }
        Commands::Wrap { width, file } => {
            let width = width.unwrap_or(config.chars_per_line);
            if width == 0 {
                anyhow::bail!("width must be at least 1");
            }
            let document = read_input(file)?;
            tracing::debug!(width, lines = document.len(), "wrapping");
            for line in document.lines() {
                for segment in richline::wrap::wrap(line.markdown_text(), width) {
                    println!("{}", segment);
                }
            }
        }
        Commands::Map {
            line,
            display_pos,
            file,
        } => {
            let document = read_input(file)?;
            document.check_line(line)?;
            if let Some(target) = document.line(line) {
                println!("{}", target.display_to_markdown(display_pos));
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("richline CLI requires building with --features cli");
    std::process::exit(1);
}
