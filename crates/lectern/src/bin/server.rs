//! Lecture notes server binary

use lectern::config::LecternConfig;
use lectern::server::LecternServer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                 Lectern - Lecture Notes API               ║
║      Upload a lecture, get exam-ready Markdown notes      ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config_path = std::env::args().nth(1);
    let config = LecternConfig::load(config_path.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  Server: {}:{}", config.server.host, config.server.port);
    tracing::info!(
        "  Notes models: {} / {}",
        config.pipeline.short_summary.model,
        config.pipeline.refine.model
    );
    tracing::info!("  Markdown model: {}", config.pipeline.markdown.model);
    tracing::info!(
        "  Embeddings: {} ({} dims)",
        config.providers.gemini.embed_model,
        config.providers.gemini.embed_dimensions
    );
    tracing::info!(
        "  Retrieval: {} char chunks, top {}",
        config.retrieval.chunk_size,
        config.retrieval.top_k
    );

    let server = LecternServer::new(config)?;

    println!("Endpoints:");
    println!("  POST /lecture/clean    - Upload a lecture, receive Markdown notes");
    println!("  POST /chat-with-notes  - Ask questions about uploaded notes");
    println!("  GET  /health           - Health check");
    println!();
    println!("Listening on http://{}", server.address());

    server.start().await?;

    Ok(())
}
