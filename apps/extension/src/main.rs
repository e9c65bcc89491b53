use std::net::SocketAddr;

use anyhow::Context;

use brainz_lastfm_client::ApiKeyStatus;
use brainz_lastfm_extension::routes::{build_cors_layer, router};
use brainz_lastfm_extension::{build_schema, HostConfig, LastfmExtension};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "brainz_lastfm_extension=debug,brainz_lastfm_client=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = HostConfig::from_env().context("Failed to load host config")?;

    tracing::info!("Starting Last.fm extension host on port {}", config.port);

    let extension = LastfmExtension::new(&config.lastfm)?;

    if config.lastfm.has_api_key() {
        match extension.loader().client().validate_api_key().await {
            ApiKeyStatus::Valid => tracing::info!("Last.fm API key validated"),
            ApiKeyStatus::Invalid => {
                tracing::error!("Last.fm rejected the configured API key; every field will fail")
            }
            ApiKeyStatus::Unknown(reason) => {
                tracing::warn!(reason = %reason, "Could not validate the Last.fm API key")
            }
        }
    } else {
        tracing::warn!("LASTFM_API_KEY is not set; Last.fm fields will return errors");
    }

    let schema = build_schema(&extension);
    tracing::info!("GraphQL schema built");

    let app = router(schema, build_cors_layer(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!(
        "GraphQL Playground available at http://{}:{}/graphql/playground",
        addr.ip(),
        addr.port()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
