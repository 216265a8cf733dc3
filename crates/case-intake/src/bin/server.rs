//! Case intake server binary
//!
//! Run with: cargo run -p case-intake --bin case-intake-server

use case_intake::{config::IntakeConfig, server::CaseServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "case_intake=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                    Fraud Case Intake                      ║
║        Attachment OCR and Investigation Summaries         ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config = IntakeConfig::from_env();

    tracing::info!("Configuration loaded");
    tracing::info!("  - OCR model: {}", config.ocr.model_id);
    tracing::info!("  - Chat deployment: {}", config.llm.deployment);
    tracing::info!("  - OCR workers: {}", config.processing.max_ocr_workers);
    match &config.azure {
        Ok(settings) => tracing::info!("  - Azure settings: {:?}", settings),
        Err(missing) => {
            tracing::warn!("{}", missing);
            tracing::warn!("Case requests will fail until these are set");
        }
    }

    // Create server (clients are built once here)
    let server = CaseServer::new(config);

    // Check storage
    if let Some(services) = server.state().services() {
        for (name, reachable) in services.health().await {
            if reachable {
                tracing::info!("{} is reachable", name);
            } else {
                tracing::warn!("{} is not reachable", name);
            }
        }
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  GET|POST /api/githubrepodocs - Process a case");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
