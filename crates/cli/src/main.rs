mod commands;
mod project;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "blogkit")]
#[command(version, about = "Static site generator for a personal blog", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize a new blog directory
    Init {
        /// Path to create the blog in
        path: PathBuf,

        /// Site name
        #[arg(long)]
        name: Option<String>,

        /// Base URL the site is published at
        #[arg(long)]
        url: Option<String>,

        /// Site language
        #[arg(long, default_value = "en", value_parser = ["en", "zh"])]
        language: String,
    },

    /// Validate configuration and content
    Validate {
        /// Path to blog directory
        path: PathBuf,
    },

    /// Preview site locally with hot reload
    Preview {
        /// Path to blog directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Build the static site
    Build {
        /// Path to blog directory
        path: PathBuf,

        /// Output directory (defaults to build.output_dir from blog.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref().unwrap_or("info"))?;

    match cli.command {
        Command::Init {
            path,
            name,
            url,
            language,
        } => commands::init::run(path, name, url, language).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Preview { path, port } => commands::preview::run(path, port).await,
        Command::Build { path, output } => commands::build::run(path, output).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "blogkit", &mut io::stdout());
            Ok(())
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}
