use crate::models::{ArticleDetails, Candidate, Coordinate};
use crate::services::provider::{ProviderError, SearchProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// MediaWiki rejects geosearch radii outside this range
const MIN_GEOSEARCH_RADIUS_M: f64 = 10.0;
const MAX_GEOSEARCH_RADIUS_M: f64 = 10_000.0;

/// Upper bound on `gslimit` / `srlimit` for anonymous clients
const MAX_LIST_LIMIT: usize = 500;

/// Upper bound on titles per `titles=` request
const MAX_TITLES_PER_REQUEST: usize = 50;

/// MediaWiki action API client
///
/// Handles all communication with a Wikipedia instance including:
/// - Geosearch around a coordinate
/// - Full-text search
/// - Coordinate and thumbnail lookup per article
/// - Intro extract of a single article
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    endpoint: String,
    thumbnail_size: u32,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<Q> {
    query: Option<Q>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    info: String,
}

#[derive(Debug, Deserialize)]
struct GeoSearchQuery {
    #[serde(default)]
    geosearch: Vec<GeoHit>,
}

#[derive(Debug, Deserialize)]
struct GeoHit {
    title: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct TextSearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    normalized: Vec<TitleMapping>,
    #[serde(default)]
    redirects: Vec<TitleMapping>,
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct TitleMapping {
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    coordinates: Vec<PageCoordinate>,
    thumbnail: Option<Thumbnail>,
    extract: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageCoordinate {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

impl WikipediaClient {
    /// Create a new client against an `api.php` endpoint
    pub fn new(
        endpoint: String,
        user_agent: &str,
        timeout_secs: u64,
        thumbnail_size: u32,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            thumbnail_size,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the plain-text intro of an article.
    /// `Ok(None)` when the page is missing or has no extract.
    pub async fn article_summary(&self, title: &str) -> Result<Option<String>, ProviderError> {
        let params = [
            ("prop", "extracts".to_string()),
            ("exintro", "1".to_string()),
            ("explaintext", "1".to_string()),
            ("redirects", "1".to_string()),
            ("titles", title.to_string()),
        ];

        let query: Option<PagesQuery> = self.query(&params).await?;

        let summary = query
            .and_then(|q| q.pages.into_iter().find(|p| !p.missing))
            .and_then(|p| p.extract)
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Ok(summary)
    }

    /// Run one `action=query` request and unwrap its `query` member
    async fn query<Q: DeserializeOwned>(
        &self,
        params: &[(&str, String)],
    ) -> Result<Option<Q>, ProviderError> {
        let mut url = format!("{}?action=query&format=json&formatversion=2", self.endpoint);
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        tracing::debug!("Querying MediaWiki: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("MediaWiki request failed: {} - {}", status, body);
            return Err(ProviderError::Api(format!("MediaWiki returned {}", status)));
        }

        let body = response.text().await?;
        let parsed: ApiResponse<Q> = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(err) = parsed.error {
            return Err(ProviderError::Api(format!("{}: {}", err.code, err.info)));
        }

        Ok(parsed.query)
    }

    async fn details_chunk(
        &self,
        titles: &[String],
    ) -> Result<HashMap<String, ArticleDetails>, ProviderError> {
        let params = [
            ("prop", "coordinates|pageimages".to_string()),
            ("colimit", "max".to_string()),
            ("piprop", "thumbnail".to_string()),
            ("pithumbsize", self.thumbnail_size.to_string()),
            ("pilimit", MAX_TITLES_PER_REQUEST.to_string()),
            ("redirects", "1".to_string()),
            ("titles", titles.join("|")),
        ];

        let query: PagesQuery = self.query(&params).await?.unwrap_or_default();

        let pages: HashMap<&str, &Page> =
            query.pages.iter().map(|p| (p.title.as_str(), p)).collect();

        let mut details = HashMap::with_capacity(titles.len());
        for requested in titles {
            let resolved = resolve_title(requested, &query.normalized, &query.redirects);
            let entry = match pages.get(resolved) {
                Some(page) if !page.missing => ArticleDetails {
                    coordinate: page
                        .coordinates
                        .first()
                        .and_then(|c| Coordinate::new(c.lat, c.lon).ok()),
                    thumbnail: page.thumbnail.as_ref().map(|t| t.source.clone()),
                },
                _ => ArticleDetails::default(),
            };
            details.insert(requested.clone(), entry);
        }

        Ok(details)
    }
}

/// Follow the API's title normalization and redirect mappings from the
/// title that was asked for to the title the page is reported under.
fn resolve_title<'a>(
    requested: &'a str,
    normalized: &'a [TitleMapping],
    redirects: &'a [TitleMapping],
) -> &'a str {
    let lookup = |title: &'a str, mappings: &'a [TitleMapping]| -> &'a str {
        mappings
            .iter()
            .find(|m| m.from == title)
            .map(|m| m.to.as_str())
            .unwrap_or(title)
    };

    lookup(lookup(requested, normalized), redirects)
}

#[async_trait]
impl SearchProvider for WikipediaClient {
    async fn geosearch(
        &self,
        center: Coordinate,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let radius = radius_m.clamp(MIN_GEOSEARCH_RADIUS_M, MAX_GEOSEARCH_RADIUS_M);
        if radius != radius_m {
            tracing::debug!("Clamped geosearch radius {} m to {} m", radius_m, radius);
        }

        let params = [
            ("list", "geosearch".to_string()),
            ("gscoord", format!("{}|{}", center.latitude, center.longitude)),
            ("gsradius", format!("{}", radius.round() as u32)),
            ("gslimit", limit.clamp(1, MAX_LIST_LIMIT).to_string()),
        ];

        let query: Option<GeoSearchQuery> = self.query(&params).await?;

        let candidates: Vec<Candidate> = query
            .map(|q| q.geosearch)
            .unwrap_or_default()
            .into_iter()
            .map(|hit| Candidate {
                coordinate: Coordinate::new(hit.lat, hit.lon).ok(),
                identity: hit.title,
                thumbnail: None,
            })
            .collect();

        tracing::debug!("Geosearch returned {} candidates within {} m", candidates.len(), radius);

        Ok(candidates)
    }

    async fn text_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let params = [
            ("list", "search".to_string()),
            ("srsearch", query.to_string()),
            ("srlimit", limit.clamp(1, MAX_LIST_LIMIT).to_string()),
        ];

        let result: Option<TextSearchQuery> = self.query(&params).await?;

        let candidates: Vec<Candidate> = result
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .map(|hit| Candidate::titled(hit.title))
            .collect();

        tracing::debug!("Text search for {:?} returned {} candidates", query, candidates.len());

        Ok(candidates)
    }

    async fn article_details(
        &self,
        identities: &[String],
    ) -> Result<HashMap<String, ArticleDetails>, ProviderError> {
        let mut details = HashMap::with_capacity(identities.len());
        for chunk in identities.chunks(MAX_TITLES_PER_REQUEST) {
            details.extend(self.details_chunk(chunk).await?);
        }
        Ok(details)
    }

    fn max_radius_m(&self) -> Option<f64> {
        Some(MAX_GEOSEARCH_RADIUS_M)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wikipedia_client_creation() {
        let client = WikipediaClient::new(
            "https://es.wikipedia.test/w/api.php/".to_string(),
            "geoplaces-test/0.1",
            5,
            300,
        )
        .unwrap();

        assert_eq!(client.endpoint(), "https://es.wikipedia.test/w/api.php");
        assert_eq!(client.thumbnail_size, 300);
        assert_eq!(client.max_radius_m(), Some(10_000.0));
    }

    #[test]
    fn test_resolve_title_follows_normalization_then_redirect() {
        let normalized = vec![TitleMapping {
            from: "museo del prado".to_string(),
            to: "Museo del prado".to_string(),
        }];
        let redirects = vec![TitleMapping {
            from: "Museo del prado".to_string(),
            to: "Museo del Prado".to_string(),
        }];

        assert_eq!(
            resolve_title("museo del prado", &normalized, &redirects),
            "Museo del Prado"
        );
        assert_eq!(resolve_title("Alhambra", &normalized, &redirects), "Alhambra");
    }

    #[test]
    fn test_parse_pages_payload() {
        let body = r#"{
            "batchcomplete": true,
            "query": {
                "pages": [
                    {
                        "pageid": 1,
                        "title": "Museo del Prado",
                        "coordinates": [{"lat": 40.4138, "lon": -3.6921, "primary": true, "globe": "earth"}],
                        "thumbnail": {"source": "https://upload.example/prado.jpg", "width": 300, "height": 200}
                    },
                    {"title": "No existe", "missing": true}
                ]
            }
        }"#;

        let parsed: ApiResponse<PagesQuery> = serde_json::from_str(body).unwrap();
        let pages = parsed.query.unwrap().pages;
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].coordinates[0].lat, 40.4138);
        assert!(pages[1].missing);
    }
}
