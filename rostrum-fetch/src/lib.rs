//! Catalog fetcher — sequential scrape of the paginated upstream event API.
//!
//! The upstream endpoint answers offset/size queries with the section-wrapped
//! document shape that `rostrum_core::snapshot::normalize` understands. The
//! loop here is deliberately plain:
//! - one request at a time, no parallel fetches
//! - a fixed inter-request delay as a rate-limiting courtesy
//! - no retries; any page failure propagates to the caller
//!
//! The merged record list is persisted as one flat `{ "items": [...] }`
//! snapshot that the analyzer loads at startup.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use rostrum_core::config::FetchConfig;
use rostrum_core::models::SessionRecord;
use rostrum_core::snapshot::{self, RawCatalog};

/// How much of an error body to keep in error messages.
const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] rostrum_core::CoreError),
}

/// HTTP client for the upstream catalog API.
pub struct CatalogClient {
    client: Client,
    config: FetchConfig,
}

impl CatalogClient {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetch a single page at the given record offset.
    pub async fn fetch_page(&self, offset: u64) -> Result<RawCatalog, FetchError> {
        let url = format!(
            "{}?from={}&size={}",
            self.config.base_url, offset, self.config.page_size
        );
        tracing::debug!("Fetching catalog page: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(ERROR_BODY_PREVIEW)
                .collect();
            return Err(FetchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<RawCatalog>().await?)
    }

    /// Walk the catalog from offset 0 until the reported total is reached, a
    /// page comes back empty, or the page safety cap trips.
    pub async fn fetch_all(&self) -> Result<Vec<SessionRecord>, FetchError> {
        let mut merged: Vec<SessionRecord> = Vec::new();
        let mut total: Option<u64> = None;
        let mut offset = 0u64;

        for page in 0..self.config.max_pages {
            let doc = self.fetch_page(offset).await?;
            if total.is_none() {
                total = doc.total_search_items;
            }

            let records = snapshot::normalize(doc);
            if records.is_empty() {
                break;
            }
            merged.extend(records);
            tracing::info!(
                "Fetched page {} ({} records so far{})",
                page + 1,
                merged.len(),
                total.map(|t| format!(" of {t}")).unwrap_or_default()
            );

            if let Some(total) = total {
                if merged.len() as u64 >= total {
                    break;
                }
            }

            offset += self.config.page_size;
            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }

        Ok(merged)
    }
}

/// Fetch the full catalog and rewrite the snapshot file.
/// Returns the number of records persisted.
pub async fn refresh_snapshot(client: &CatalogClient, path: &Path) -> Result<usize, FetchError> {
    let records = client.fetch_all().await?;
    snapshot::write_snapshot(path, &records)?;
    tracing::info!(
        "Snapshot refreshed: {} records written to {}",
        records.len(),
        path.display()
    );
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> FetchConfig {
        FetchConfig {
            base_url,
            page_size: 2,
            request_delay_ms: 0,
            max_pages: 10,
        }
    }

    fn page(codes: &[&str], total: u64) -> serde_json::Value {
        json!({
            "sectionList": [{
                "items": codes.iter().map(|c| json!({"code": c, "title": c})).collect::<Vec<_>>()
            }],
            "totalSearchItems": total
        })
    }

    #[tokio::test]
    async fn test_fetch_all_pages_sequentially_until_total() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("from", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A1", "A2"], 3)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("from", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A3"], 3)))
            .mount(&server)
            .await;

        let client =
            CatalogClient::new(test_config(format!("{}/api/search", server.uri()))).unwrap();
        let records = client.fetch_all().await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].code.as_deref(), Some("A1"));
        assert_eq!(records[2].code.as_deref(), Some("A3"));
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_empty_page() {
        let server = MockServer::start().await;

        // No total reported; the loop must stop at the first empty page.
        Mock::given(method("GET"))
            .and(query_param("from", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": [{"code": "A1"}, {"code": "A2"}]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("from", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let client =
            CatalogClient::new(test_config(format!("{}/api/search", server.uri()))).unwrap();
        let records = client.fetch_all().await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_page_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client =
            CatalogClient::new(test_config(format!("{}/api/search", server.uri()))).unwrap();
        let err = client.fetch_all().await.unwrap_err();
        match err {
            FetchError::Api { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_page_cap_bounds_the_loop() {
        let server = MockServer::start().await;
        // A server that always returns a full page and never a total would
        // loop forever without the cap.
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": [{"code": "X"}, {"code": "Y"}]})),
            )
            .mount(&server)
            .await;

        let mut config = test_config(format!("{}/api/search", server.uri()));
        config.max_pages = 3;
        let client = CatalogClient::new(config).unwrap();
        let records = client.fetch_all().await.unwrap();
        assert_eq!(records.len(), 6);
    }

    #[tokio::test]
    async fn test_refresh_snapshot_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A1", "A2"], 2)))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let snapshot_path = dir.path().join("catalog.json");

        let client =
            CatalogClient::new(test_config(format!("{}/api/search", server.uri()))).unwrap();
        let count = refresh_snapshot(&client, &snapshot_path).await.unwrap();
        assert_eq!(count, 2);

        let loaded = rostrum_core::snapshot::load_snapshot(&snapshot_path).unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
