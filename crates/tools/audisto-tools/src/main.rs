use anyhow::{Result, anyhow};
use audisto_async::types::ChunkedRequest;
use audisto_tools::AudistoTools;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "audisto-tools")]
#[command(about = "Read-only Audisto crawl tools for AI agents")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show available tools and usage examples
    Help,
    /// List the most recent crawls
    Status,
    /// Summarize a single crawl
    Summary {
        /// Numeric crawl id (see `status`)
        #[arg(allow_negative_numbers = true)]
        crawl_id: i64,
    },
    /// Dump a chunked listing endpoint as JSON lines
    Pages {
        /// Endpoint path below the versioned base URL, e.g. /crawls/123/pages/
        #[arg(long)]
        path: String,
        /// Items per chunk (1-10000)
        #[arg(long, default_value_t = 100)]
        chunk_size: u32,
        /// Extra query parameter as key=value; repeatable
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Stop after this many items
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Tool output goes to stdout; logs stay on stderr
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "audisto_tools=info,audisto_async=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let tools = AudistoTools::new();

    if matches!(args.command, Commands::Help) {
        println!("{}", tools.get_help());
        return Ok(());
    }

    tracing::info!("Starting Audisto tools...");
    if tools.validate_startup_credentials().is_err() {
        tracing::error!("Cannot run without valid credentials");
        return Err(anyhow!(
            "Missing credentials: set AUDISTO_API_KEY and AUDISTO_PASSWORD in your environment"
        ));
    }

    let output = match args.command {
        Commands::Help => tools.get_help().to_string(),
        Commands::Status => tools.get_crawl_status().await,
        Commands::Summary { crawl_id } => tools.get_crawl_summary(crawl_id).await,
        Commands::Pages {
            path,
            chunk_size,
            params,
            limit,
        } => {
            let request = params.into_iter().fold(
                ChunkedRequest::new(path).with_chunk_size(chunk_size),
                |req, (k, v)| req.with_param(k, v),
            );
            tools.dump_chunked(request, limit).await
        }
    };
    println!("{output}");

    Ok(())
}
