mod embed;
mod parser;
mod pipeline;
mod settings;
mod walk;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};

use embed::Encoding;
use pipeline::{Pipeline, Tool};

#[derive(Parser)]
#[command(name = "lehrmittel", about = "Answer-box links for Lehrmittel question documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy every Auftrag section of each Lehrmittel document into a questions file
    Extract {
        #[command(flatten)]
        target: Target,
    },
    /// Rebuild each questions file with answer links and one reflection block
    Convert {
        #[command(flatten)]
        target: Target,
        /// How question text is written into links (default from config: raw)
        #[arg(long, value_enum)]
        encoding: Option<Encoding>,
    },
    /// Regenerate the answer links inside each Lehrmittel document
    Rewrite {
        #[command(flatten)]
        target: Target,
        /// How question text is written into links (default from config: percent)
        #[arg(long, value_enum)]
        encoding: Option<Encoding>,
    },
}

#[derive(Args)]
struct Target {
    /// Folder to search recursively (asked for when omitted)
    root: Option<PathBuf>,
    /// Report what would be written without touching any file
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = settings::load()?;

    let (tool, target, encoding) = match cli.command {
        Commands::Extract { target } => (Tool::Extract, target, None),
        Commands::Convert { target, encoding } => (Tool::Convert, target, encoding),
        Commands::Rewrite { target, encoding } => (Tool::Rewrite, target, encoding),
    };

    let root = match target.root {
        Some(root) => root,
        None => prompt_root()?,
    };
    if !root.is_dir() {
        bail!("The specified path is not a valid directory: {}", root.display());
    }

    let pipeline = Pipeline {
        tool,
        settings: &settings,
        encoding: encoding.unwrap_or_else(|| settings.encoding_for(tool)),
        dry_run: target.dry_run,
    };

    let files = walk::find_files(&root, pipeline.input_name());
    if files.is_empty() {
        println!("No '{}' found under {}", pipeline.input_name(), root.display());
        return Ok(());
    }

    let stats = walk::run_batch(&files, |path| pipeline.process(path))?;
    stats.print(pipeline.dry_run);

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn prompt_root() -> anyhow::Result<PathBuf> {
    eprint!("Enter the path to the folder: ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim();
    if input.is_empty() {
        bail!("No path provided");
    }
    Ok(PathBuf::from(input))
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
