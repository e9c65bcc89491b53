//! Extension entry point

use async_graphql::SchemaBuilder;
use brainz_lastfm_client::LastfmClient;
use brainz_shared_config::LastfmConfig;

use crate::error::ExtensionResult;
use crate::loader::LastfmLoader;

/// The Last.fm schema extension
///
/// Owns the one client and loader shared by every query execution, so the
/// response cache lives as long as the extension.
#[derive(Clone)]
pub struct LastfmExtension {
    loader: LastfmLoader,
}

impl LastfmExtension {
    pub const NAME: &'static str = "Last.fm";

    pub const DESCRIPTION: &'static str =
        "Retrieve artist, release, and recording information from Last.fm.";

    /// Build the client and loader from `config`
    pub fn new(config: &LastfmConfig) -> ExtensionResult<Self> {
        let client = LastfmClient::new(config)?;
        tracing::debug!(
            has_api_key = client.has_api_key(),
            cache_size = config.cache_size,
            "Last.fm extension initialized"
        );
        Ok(Self {
            loader: LastfmLoader::new(client, config),
        })
    }

    pub fn loader(&self) -> &LastfmLoader {
        &self.loader
    }

    /// Install the loader into a schema's context data
    pub fn register<Q, M, S>(&self, builder: SchemaBuilder<Q, M, S>) -> SchemaBuilder<Q, M, S> {
        builder.data(self.loader.clone())
    }
}
