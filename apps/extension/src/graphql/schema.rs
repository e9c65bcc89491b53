//! Schema of the standalone host

use async_graphql::{EmptyMutation, EmptySubscription, Schema};

use super::extension::LastfmExtension;
use super::host::HostQuery;

/// The standalone host's GraphQL schema type
pub type HostSchema = Schema<HostQuery, EmptyMutation, EmptySubscription>;

/// Build the host schema with the extension registered
pub fn build_schema(extension: &LastfmExtension) -> HostSchema {
    extension
        .register(Schema::build(HostQuery, EmptyMutation, EmptySubscription))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainz_shared_config::LastfmConfig;

    #[test]
    fn test_sdl_uses_lastfm_names() {
        let extension = LastfmExtension::new(&LastfmConfig::with_base_url("http://localhost:1/2.0/")).unwrap();
        let sdl = build_schema(&extension).sdl();

        for name in [
            "type LastFMArtist",
            "type LastFMAlbum",
            "type LastFMTrack",
            "type LastFMTagEdge",
            "type LastFMChartQuery",
            "type LastFMCountry",
            "enum LastFMImageSize",
            "summaryHTML",
            "lastFM",
            "EXTRALARGE",
        ] {
            assert!(sdl.contains(name), "missing {name} in SDL");
        }
    }
}
