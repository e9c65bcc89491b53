//! HTTP routes of the standalone host

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::Extension,
    http::{header, Method},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::HostConfig;
use crate::graphql::HostSchema;

/// Build the CORS layer; permissive unless origins are configured
pub fn build_cors_layer(config: &HostConfig) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            tracing::info!(
                "CORS configured with {} allowed origin(s)",
                allowed_origins.len()
            );
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                .max_age(std::time::Duration::from_secs(3600))
        }
        _ => CorsLayer::permissive(),
    }
}

/// Build the host router around `schema`
pub fn router(schema: HostSchema, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/graphql", post(graphql_handler))
        .route("/graphql/playground", get(graphql_playground))
        .layer(Extension(schema))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn graphql_handler(
    Extension(schema): Extension<HostSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// GraphQL Playground handler for development
async fn graphql_playground() -> impl IntoResponse {
    Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}

async fn root() -> &'static str {
    "Last.fm GraphQL extension host"
}

async fn health() -> &'static str {
    "OK"
}
