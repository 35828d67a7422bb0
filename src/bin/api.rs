use bucketlist_generator::{api::start_server, gemini::GeminiClient};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let gemini_api_key = std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| {
        eprintln!("GEMINI_API_KEY not set in .env; generation calls will fail");
        String::new()
    });

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("Bucket List Generator - API Server");
    info!("Port: {}", api_port);

    let backend = Arc::new(GeminiClient::new(gemini_api_key));

    start_server(backend, api_port).await?;

    Ok(())
}
