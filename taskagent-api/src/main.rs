//! taskagent-api - Task Management Backend
//!
//! Accepts free-text task descriptions, extracts structured fields through
//! a language model, resolves priority and due dates, and serves CRUD plus
//! hybrid search over the stored tasks.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskagent_api::services::{EmbeddingClient, LlmClient};
use taskagent_api::AppState;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Parser)]
#[clap(name = "taskagent-api")]
#[clap(about = "LLM-assisted task management backend")]
struct Args {
    /// Root folder for database and state (overrides env and config file)
    #[clap(long)]
    root_folder: Option<String>,

    /// Port to listen on
    #[clap(long, env = "TASKAGENT_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load TOML config before tracing so the configured level applies
    let toml_config = taskagent_common::config::load_toml_config().unwrap_or_default();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting taskagent-api (Task Management Backend)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve and prepare the root folder
    let root_folder = taskagent_common::config::resolve_root_folder(args.root_folder.as_deref());
    taskagent_common::config::ensure_root_folder(&root_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;

    let db_path = taskagent_common::config::database_path(&root_folder);
    info!("Database: {}", db_path.display());

    let db_pool = taskagent_api::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Resolve OpenAI credentials (Database -> ENV -> TOML)
    let api_key = taskagent_api::config::resolve_openai_api_key(&db_pool, &toml_config).await?;
    let base_url = taskagent_api::config::resolve_openai_base_url(&toml_config);

    let llm = LlmClient::new(api_key.clone(), base_url.clone())
        .map_err(|e| anyhow::anyhow!("Failed to create LLM client: {}", e))?;
    let embeddings = EmbeddingClient::new(api_key, base_url)
        .map_err(|e| anyhow::anyhow!("Failed to create embedding client: {}", e))?;

    let state = AppState::new(db_pool, llm, embeddings);
    let app = taskagent_api::build_router(state);

    let port = args.port.unwrap_or(DEFAULT_PORT);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
