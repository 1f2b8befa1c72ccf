//! osz-rewriter - re-attribute beatmap sets to a new mapper.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use osz_rewriter::{
    mapset::{self, MapsetId},
    rewrite, OutputNaming, Pipeline, RenameStyle, RunConfig,
};

/// Download beatmap sets and re-attribute them to their mapper.
#[derive(Parser)]
#[command(name = "osz-rewriter", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every mapset URL listed in a file.
    Run {
        /// File with one mapset URL per line.
        #[arg(long, short, default_value = "urls.txt")]
        input: PathBuf,

        /// Directory for the rewritten archives.
        #[arg(long, short, env = "OSZ_OUTPUT_DIR", default_value = "Maps")]
        output: PathBuf,

        /// Mirror base URL.
        #[arg(long, env = "OSZ_MIRROR_URL", default_value = osz_rewriter::mirror::DEFAULT_MIRROR_URL)]
        mirror_url: String,

        /// Directory for per-item scratch space (defaults to the system temp dir).
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Description file naming: simple or metadata.
        #[arg(long, default_value_t = RenameStyle::Simple)]
        rename: RenameStyle,

        /// Output archive naming: suffix or prefix.
        #[arg(long, default_value_t = OutputNaming::Suffix)]
        output_naming: OutputNaming,

        /// Per-request timeout in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Print the mapset ID extracted from each URL.
    ExtractId {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Rewrite a local description file and print it to stdout.
    Rewrite {
        /// Path to an `.osu` file.
        file: PathBuf,

        /// New creator ID.
        #[arg(long)]
        creator: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "osz_rewriter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match execute(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            input,
            output,
            mirror_url,
            work_dir,
            rename,
            output_naming,
            timeout_secs,
        } => {
            let mut config = RunConfig::new(output)
                .with_mirror_url(mirror_url)
                .with_rename_style(rename)
                .with_output_naming(output_naming);
            if let Some(dir) = work_dir {
                config = config.with_work_dir(dir);
            }
            if let Some(secs) = timeout_secs {
                config = config.with_timeout(Duration::from_secs(secs));
            }

            run(&input, config).await?;
        }

        Commands::ExtractId { urls } => {
            for url in urls {
                match MapsetId::from_url(&url) {
                    Ok(id) => println!("{id}"),
                    Err(e) => println!("error: {e}"),
                }
            }
        }

        Commands::Rewrite { file, creator } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let (rewritten, _) = rewrite::rewrite_description(&text, &creator);
            print!("{rewritten}");
        }
    }

    Ok(())
}

/// Process the URL list at `input`.
async fn run(input: &std::path::Path, config: RunConfig) -> Result<()> {
    let contents = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read URL list {}", input.display()))?;
    let urls = mapset::parse_url_list(&contents);

    tracing::info!(
        count = urls.len(),
        mirror = %config.mirror_url,
        output = %config.output_dir.display(),
        "Starting batch"
    );

    let pipeline = Pipeline::new(config).context("Failed to build HTTP client")?;
    pipeline.run_batch(&urls).await;

    Ok(())
}
