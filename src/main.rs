use forum_search_api::{Config, SearchError, Server};

#[tokio::main]
async fn main() -> Result<(), SearchError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Forum Search API server");

    let config = Config::from_env()?;
    let server = Server::new(config).await?;
    server.run().await?;

    Ok(())
}
