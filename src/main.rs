//! deepbrief - citation-backed research briefs
//!
//! Usage:
//!   deepbrief serve                          → start the HTTP gateway
//!   deepbrief brief "topic" --identity me    → run one brief from the CLI
//!   deepbrief brief "topic" --follow-up      → interpret as a follow-up

use clap::{Parser, Subcommand};
use deepbrief_core::{BriefRequest, DeepbriefConfig, SearchDepth};
use deepbrief_engine::{Engine, EngineConfig};
use deepbrief_gateway::{start_gateway, GatewayConfig};
use deepbrief_llm::GroqProvider;
use deepbrief_search::TavilyClient;
use deepbrief_store::FileContextStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "deepbrief",
    about = "Citation-backed research briefs: plan, search, summarize, synthesize",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Config file (default: ~/.deepbrief/deepbrief.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to a file (in addition to stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Bind address
        #[arg(short, long)]
        bind: Option<String>,

        /// Port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one research brief and print it as markdown
    Brief {
        /// The research topic
        topic: String,

        /// Caller identity used for context continuity
        #[arg(short, long, default_value = "cli")]
        identity: String,

        /// Interpret the topic as a follow-up to this identity's prior brief
        #[arg(short, long, default_value_t = false)]
        follow_up: bool,

        /// Search depth: basic or advanced
        #[arg(short, long, default_value = "basic")]
        depth: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref());

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(DeepbriefConfig::default_path);
    let config = DeepbriefConfig::load(&config_path);

    let engine = Arc::new(build_engine(&config)?);

    match cli.command {
        Commands::Serve { bind, port } => {
            let gateway = GatewayConfig {
                bind: bind
                    .or_else(|| config.gateway.bind.clone())
                    .unwrap_or_else(|| "0.0.0.0".to_string()),
                port: port.or(config.gateway.port).unwrap_or(8787),
            };
            start_gateway(engine, gateway).await
        }
        Commands::Brief {
            topic,
            identity,
            follow_up,
            depth,
        } => {
            let depth = parse_depth(&depth)?;
            let mut request = BriefRequest::new(identity, topic).with_depth(depth);
            if follow_up {
                request = request.follow_up();
            }

            let outcome = engine.run(request, None).await?;
            println!("{}", outcome.brief.render_markdown());
            if let Some(warning) = outcome.store_warning {
                tracing::warn!("{}", warning);
            }
            Ok(())
        }
    }
}

fn init_tracing(log_file: Option<&std::path::Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file = path.file_name().map(PathBuf::from).unwrap_or_else(|| "deepbrief.log".into());
            let appender = tracing_appender::rolling::never(dir, file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(appender)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn build_engine(config: &DeepbriefConfig) -> anyhow::Result<Engine> {
    let groq_key = std::env::var("GROQ_API_KEY")
        .ok()
        .or_else(|| config.models.api_key.clone())
        .ok_or_else(|| anyhow::anyhow!("GROQ_API_KEY not set"))?;
    let tavily_key = std::env::var("TAVILY_API_KEY")
        .ok()
        .or_else(|| config.search.api_key.clone())
        .ok_or_else(|| anyhow::anyhow!("TAVILY_API_KEY not set"))?;

    let mut generator = GroqProvider::new(groq_key);
    if let Some(base_url) = &config.models.base_url {
        generator = generator.with_base_url(base_url.as_str());
    }
    if let (Some(fast), Some(smart)) = (&config.models.fast, &config.models.smart) {
        generator = generator.with_models(fast.as_str(), smart.as_str());
    }

    let mut search = TavilyClient::new(tavily_key);
    if let Some(max_results) = config.search.max_results {
        search = search.with_max_results(max_results);
    }

    let store_dir = std::env::var("DEEPBRIEF_STATE_DIR")
        .map(PathBuf::from)
        .ok()
        .or_else(|| config.store.dir.clone().map(PathBuf::from))
        .unwrap_or_else(DeepbriefConfig::default_store_dir);
    let store = FileContextStore::open(&store_dir)
        .map_err(|e| anyhow::anyhow!("cannot open context store at {}: {}", store_dir.display(), e))?;

    let engine_config = EngineConfig {
        retry_budget: config.pipeline.retry_budget,
        call_timeout: Duration::from_secs(config.pipeline.call_timeout_secs),
        summarize_workers: config.pipeline.summarize_workers,
    };

    Ok(Engine::new(
        Arc::new(generator),
        Arc::new(search),
        Arc::new(store),
        engine_config,
    ))
}

fn parse_depth(raw: &str) -> anyhow::Result<SearchDepth> {
    match raw {
        "basic" => Ok(SearchDepth::Basic),
        "advanced" => Ok(SearchDepth::Advanced),
        other => anyhow::bail!("unknown search depth '{}' (expected basic or advanced)", other),
    }
}
