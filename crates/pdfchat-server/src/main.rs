//! pdfchat: HTTP relay for document question answering.

use std::sync::Arc;

use pdfchat_core::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" | "help" => {
                println!("pdfchat - chat with your documents");
                println!();
                println!("Usage: pdfchat [command]");
                println!();
                println!("Commands:");
                println!("  (none)                   Start the server");
                println!("  help                     Show this help message");
                println!();
                println!("Environment:");
                println!("  HOST, PORT               Listen address (default 0.0.0.0:3000)");
                println!("  OPENAI_API_HOST          Provider base URL");
                println!("  OPENAI_API_KEY           Fallback key when a request carries none");
                println!("  OPENAI_ORGANIZATION      Sent as OpenAI-Organization");
                println!("  DEFAULT_SYSTEM_PROMPT    System prompt template");
                println!("  PINECONE_BASE_URL        Override the Pinecone service URL");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'pdfchat help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let config = ServerConfig::from_env();
    let state = Arc::new(AppState::from_env());
    info!("Provider host: {}", state.provider.api_host);
    if state.provider.api_key.is_none() {
        info!("OPENAI_API_KEY not set; requests must carry their own key");
    }

    let app = routes::build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("pdfchat server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
