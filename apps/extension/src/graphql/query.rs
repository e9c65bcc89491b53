//! Root Last.fm queries not tied to a MusicBrainz entity

use async_graphql::{Context, Object, Result};
use brainz_lastfm_client::Params;

use crate::connection::{Connection, ConnectionArgs, Paging};
use crate::country;
use crate::entity::{Artist, Tag, Track};
use crate::error::GraphQLResultExt;
use crate::loader::{LoaderKey, Method};

use super::types::{loader, LastFmArtistConnection, LastFmTagConnection, LastFmTrackConnection};

/// A query for data on Last.fm that is not connected to any particular
/// MusicBrainz entity
#[derive(Debug, Default, Clone, Copy)]
pub struct LastFmQuery;

#[Object(name = "LastFMQuery")]
impl LastFmQuery {
    /// A query for chart data
    async fn chart(&self) -> LastFmChartQuery {
        LastFmChartQuery
    }
}

/// A query for chart data
#[derive(Debug, Default, Clone, Copy)]
pub struct LastFmChartQuery;

/// The chart method and params for an optional country code
fn chart_request(global: Method, geo: Method, country: Option<&str>) -> (Method, Params) {
    match country {
        Some(country) => (
            geo,
            Params::from([("country".to_string(), country::upstream_name(country))]),
        ),
        None => (global, Params::new()),
    }
}

#[Object(name = "LastFMChartQuery")]
impl LastFmChartQuery {
    /// The most popular artists, ordered by popularity; with a country code,
    /// the most popular artists in that country
    async fn top_artists(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "A two-letter ISO 3166 country code")] country: Option<String>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<LastFmArtistConnection> {
        let args = ConnectionArgs::new(first, after.as_deref()).gql()?;
        let (method, base) = chart_request(
            Method::ChartTopArtists,
            Method::GeoTopArtists,
            country.as_deref(),
        );
        let Some(params) = args.upstream_params(base, Paging::Pages).gql()? else {
            return Ok(Connection::<Artist>::empty().into());
        };
        let page = loader(ctx)?
            .load_artists(LoaderKey::new(method, params))
            .await
            .gql()?;
        Ok(Connection::from_page(page, &args).into())
    }

    /// The most popular tags, ordered by popularity
    async fn top_tags(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<LastFmTagConnection> {
        let args = ConnectionArgs::new(first, after.as_deref()).gql()?;
        let Some(params) = args.upstream_params(Params::new(), Paging::Pages).gql()? else {
            return Ok(Connection::<Tag>::empty().into());
        };
        let page = loader(ctx)?
            .load_tags(LoaderKey::new(Method::ChartTopTags, params))
            .await
            .gql()?;
        Ok(Connection::from_page(page, &args).into())
    }

    /// The most popular tracks, ordered by popularity; with a country code,
    /// the most popular tracks in that country
    async fn top_tracks(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "A two-letter ISO 3166 country code")] country: Option<String>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<LastFmTrackConnection> {
        let args = ConnectionArgs::new(first, after.as_deref()).gql()?;
        let (method, base) = chart_request(
            Method::ChartTopTracks,
            Method::GeoTopTracks,
            country.as_deref(),
        );
        let Some(params) = args.upstream_params(base, Paging::Pages).gql()? else {
            return Ok(Connection::<Track>::empty().into());
        };
        let page = loader(ctx)?
            .load_tracks(LoaderKey::new(method, params))
            .await
            .gql()?;
        Ok(Connection::from_page(page, &args).into())
    }
}

/// A country with chart data available on Last.fm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastFmCountry {
    pub area_name: String,
    /// Lowercase ISO 3166-1 alpha-2 code
    pub iso_code: String,
    pub iso_name: Option<String>,
}

impl LastFmCountry {
    /// Build from a host area; only areas of type `Country` with at least one
    /// ISO 3166-1 code qualify
    pub fn from_area(area_type: Option<&str>, area_name: &str, iso_codes: &[String]) -> Option<Self> {
        if area_type != Some("Country") {
            return None;
        }
        let iso_code = iso_codes.first()?.to_lowercase();
        if iso_code.is_empty() {
            return None;
        }
        Some(Self {
            area_name: area_name.to_string(),
            iso_name: country::name_for_code(&iso_code).map(str::to_string),
            iso_code,
        })
    }

    /// The name the geo endpoints expect
    pub fn upstream_name(&self) -> &str {
        self.iso_name.as_deref().unwrap_or(&self.area_name)
    }

    fn geo_params(&self) -> Params {
        Params::from([("country".to_string(), self.upstream_name().to_string())])
    }
}

#[Object(name = "LastFMCountry")]
impl LastFmCountry {
    /// The top artists in this country, ordered by popularity
    async fn top_artists(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<LastFmArtistConnection> {
        let args = ConnectionArgs::new(first, after.as_deref()).gql()?;
        let Some(params) = args.upstream_params(self.geo_params(), Paging::Pages).gql()? else {
            return Ok(Connection::<Artist>::empty().into());
        };
        let page = loader(ctx)?
            .load_artists(LoaderKey::new(Method::GeoTopArtists, params))
            .await
            .gql()?;
        Ok(Connection::from_page(page, &args).into())
    }

    /// The top tracks in this country, ordered by popularity
    async fn top_tracks(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<LastFmTrackConnection> {
        let args = ConnectionArgs::new(first, after.as_deref()).gql()?;
        let Some(params) = args.upstream_params(self.geo_params(), Paging::Pages).gql()? else {
            return Ok(Connection::<Track>::empty().into());
        };
        let page = loader(ctx)?
            .load_tracks(LoaderKey::new(Method::GeoTopTracks, params))
            .await
            .gql()?;
        Ok(Connection::from_page(page, &args).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_country_from_area() {
        let country = LastFmCountry::from_area(Some("Country"), "Germany", &codes(&["DE"])).unwrap();
        assert_eq!(country.iso_code, "de");
        assert_eq!(country.iso_name.as_deref(), Some("Germany"));
        assert_eq!(country.upstream_name(), "Germany");
    }

    #[test]
    fn test_non_country_areas() {
        assert!(LastFmCountry::from_area(Some("City"), "Berlin", &codes(&["DE"])).is_none());
        assert!(LastFmCountry::from_area(None, "Germany", &codes(&["DE"])).is_none());
        assert!(LastFmCountry::from_area(Some("Country"), "Germany", &[]).is_none());
    }

    #[test]
    fn test_unknown_code_falls_back_to_area_name() {
        let country = LastFmCountry::from_area(Some("Country"), "Kosovo", &codes(&["XK"])).unwrap();
        assert_eq!(country.iso_name, None);
        assert_eq!(country.upstream_name(), "Kosovo");
    }

    #[test]
    fn test_chart_request() {
        let (method, params) = chart_request(Method::ChartTopArtists, Method::GeoTopArtists, Some("de"));
        assert_eq!(method, Method::GeoTopArtists);
        assert_eq!(params["country"], "Germany");

        let (method, params) = chart_request(Method::ChartTopArtists, Method::GeoTopArtists, Some("Atlantis"));
        assert_eq!(method, Method::GeoTopArtists);
        assert_eq!(params["country"], "Atlantis");

        let (method, params) = chart_request(Method::ChartTopTracks, Method::GeoTopTracks, None);
        assert_eq!(method, Method::ChartTopTracks);
        assert!(params.is_empty());
    }
}
