// Supabase (PostgREST) store

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;
use url::Url;

use crate::schema::AnalysisResult;
use crate::store::ReviewStore;
use crate::types::*;

pub const DEFAULT_TABLE: &str = "review_insights";

/// Store writing to one PostgREST table keyed by `review_id`
#[derive(Clone)]
pub struct SupabaseStore {
    http_client: HttpClient,
    base_url: Url,
    service_key: SecureApiKey,
    table: String,
}

impl SupabaseStore {
    pub fn new(base_url: &str, service_key: SecureApiKey) -> InsightsResult<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| {
                InsightsError::ConfigError(format!("invalid Supabase URL {:?}: {}", base_url, e))
            })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                InsightsError::ConfigError(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            base_url,
            service_key,
            table: DEFAULT_TABLE.to_string(),
        })
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn table_url(&self) -> InsightsResult<Url> {
        self.base_url
            .join(&format!("rest/v1/{}", self.table))
            .map_err(|e| InsightsError::ConfigError(format!("invalid table URL: {}", e)))
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .header("apikey", self.service_key.as_str())
            .bearer_auth(self.service_key.as_str())
    }

    async fn fetch_rows(&self, url: Url) -> InsightsResult<Vec<AnalysisResult>> {
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(request_failed)?;
        let response = check_status(response).await?;
        read_rows(response).await
    }
}

/// Turn non-success statuses into `PersistenceError`s
async fn check_status(response: reqwest::Response) -> InsightsResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
    Err(InsightsError::persistence_error(
        format!("store returned {}: {}", status, sanitize_error_message(&body)),
        Some(status),
        None::<reqwest::Error>,
    ))
}

fn request_failed(e: reqwest::Error) -> InsightsError {
    InsightsError::persistence_error(format!("store request failed: {}", e), None, Some(e))
}

async fn read_rows(response: reqwest::Response) -> InsightsResult<Vec<AnalysisResult>> {
    response.json::<Vec<AnalysisResult>>().await.map_err(|e| {
        InsightsError::persistence_error(format!("unreadable store response: {}", e), None, Some(e))
    })
}

#[async_trait]
impl ReviewStore for SupabaseStore {
    async fn upsert(&self, record: &AnalysisResult) -> InsightsResult<AnalysisResult> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("on_conflict", "review_id");

        let response = self
            .request(reqwest::Method::POST, url)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[record])
            .send()
            .await
            .map_err(request_failed)?;
        let response = check_status(response).await?;
        let rows = read_rows(response).await?;

        tracing::info!(
            review_id = %record.review_id,
            table = %self.table,
            "Saved analysis to database"
        );
        Ok(rows.into_iter().next().unwrap_or_else(|| record.clone()))
    }

    async fn get(&self, review_id: &str) -> InsightsResult<Option<AnalysisResult>> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("review_id", &format!("eq.{}", review_id));
        Ok(self.fetch_rows(url).await?.into_iter().next())
    }

    async fn list(&self, limit: usize) -> InsightsResult<Vec<AnalysisResult>> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "review_date.desc")
            .append_pair("limit", &limit.to_string());
        self.fetch_rows(url).await
    }

    fn name(&self) -> &str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_is_rooted_under_rest_v1() {
        let store = SupabaseStore::new("https://abc.supabase.co", SecureApiKey::new("k")).unwrap();
        assert_eq!(
            store.table_url().unwrap().as_str(),
            "https://abc.supabase.co/rest/v1/review_insights"
        );

        let store = SupabaseStore::new("http://localhost:54321/proxy", SecureApiKey::new("k"))
            .unwrap()
            .with_table("reviews");
        assert_eq!(
            store.table_url().unwrap().as_str(),
            "http://localhost:54321/proxy/rest/v1/reviews"
        );
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        assert!(matches!(
            SupabaseStore::new("not a url", SecureApiKey::new("k")),
            Err(InsightsError::ConfigError(_))
        ));
    }
}
