use crate::config::CatalogConfig;
use crate::errors::{CatalogError, Result};
use crate::models::{self, GameDetail, GameSummary};

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl ApiClient {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(CatalogError::Network)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// List URL: fixed score/platform filters plus an optional search term.
    /// The term is percent-encoded; a blank term adds no search parameter.
    pub fn list_url(&self, search: Option<&str>) -> String {
        let mut url = format!(
            "{}/games?key={}&metacritic={},{}&platforms={}&search_exact=true",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_key,
            self.config.min_score,
            self.config.max_score,
            self.config.platform
        );
        if let Some(term) = search {
            let term = term.trim();
            if !term.is_empty() {
                url.push_str("&search=");
                url.push_str(&urlencoding::encode(term));
            }
        }
        url
    }

    pub fn detail_url(&self, id: i64) -> String {
        format!(
            "{}/games/{}?key={}",
            self.config.base_url.trim_end_matches('/'),
            id,
            self.config.api_key
        )
    }

    pub async fn fetch_list(&self, search: Option<&str>) -> Result<Vec<GameSummary>> {
        let response = self.client.get(self.list_url(search)).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Http(format!(
                "HTTP {}: {}",
                status.as_u16(),
                text
            )));
        }
        let bytes = response.bytes().await?;
        models::decode_list(&bytes)
    }

    pub async fn fetch_detail(&self, id: i64) -> Result<GameDetail> {
        let response = self.client.get(self.detail_url(id)).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Http(format!(
                "HTTP {}: {}",
                status.as_u16(),
                text
            )));
        }
        let bytes = response.bytes().await?;
        models::decode_detail(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        let config = CatalogConfig::new("test-key").expect("config");
        ApiClient::new(config).expect("client")
    }

    #[test]
    fn list_url_carries_key_and_filters() {
        let url = client().list_url(None);
        assert!(url.starts_with("https://api.rawg.io/api/games?key=test-key"));
        assert!(url.contains("metacritic=75,100"));
        assert!(url.contains("platforms=4"));
        assert!(url.contains("search_exact=true"));
        assert!(!url.contains("search="), "no search param without a term: {url}");
    }

    #[test]
    fn search_term_is_percent_encoded() {
        let url = client().list_url(Some("zelda: breath & wild"));
        assert!(url.contains("&search=zelda%3A%20breath%20%26%20wild"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn blank_search_term_is_omitted() {
        let url = client().list_url(Some("   "));
        assert!(!url.contains("search="));
    }

    #[test]
    fn detail_url_uses_id_path_segment() {
        let url = client().detail_url(3498);
        assert_eq!(url, "https://api.rawg.io/api/games/3498?key=test-key");
    }
}
