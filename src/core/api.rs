use crate::models::{
    chat::{ChatIdentity, ChatResponse, ChatSummary, ExportResponse, Transcript},
    stats::{AdvancedStats, Analytics, Stats},
};
use eyre::{Context, Report, eyre};
use reqwest::{Client as ReqwestClient, header};
use serde::de::DeserializeOwned;
use url::Url;

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Request/response side of the admin server.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: ReqwestClient,
    base: Url,
}

impl ApiClient {
    pub fn new(server_url: &str) -> Result<Self, Report> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(APP_USER_AGENT),
        );
        let http = ReqwestClient::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build reqwest client")?;
        let base = Url::parse(server_url)
            .with_context(|| format!("Invalid server url {:?}", server_url))?;

        Ok(Self { http, base })
    }

    /// Builds `<base>/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Report> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| eyre!("Server url {} cannot be a base", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolves a location returned by the server, e.g. an export's
    /// `/static/downloads/...` path, against the server root.
    pub fn resolve(&self, location: &str) -> Result<Url, Report> {
        self.base
            .join(location)
            .with_context(|| format!("Invalid location {:?}", location))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Report> {
        tracing::debug!("GET {}", url);
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()?;
        response
            .json()
            .await
            .with_context(|| format!("Malformed response from {}", url))
    }

    pub async fn stats(&self) -> Result<Stats, Report> {
        self.get_json(self.endpoint(&["api", "stats"])?).await
    }

    pub async fn advanced_stats(&self) -> Result<AdvancedStats, Report> {
        self.get_json(self.endpoint(&["api", "advanced_stats"])?).await
    }

    pub async fn analytics(&self) -> Result<Analytics, Report> {
        self.get_json(self.endpoint(&["api", "analytics"])?).await
    }

    pub async fn chats(&self) -> Result<Vec<ChatSummary>, Report> {
        self.get_json(self.endpoint(&["api", "chats"])?).await
    }

    /// Fetches the full transcript of one chat.
    pub async fn chat(&self, identity: &ChatIdentity) -> Result<Transcript, Report> {
        let url = self.endpoint(&[
            "api",
            "chat",
            &identity.user_id,
            identity.bot_type.as_str(),
        ])?;
        let response: ChatResponse = self.get_json(url).await?;
        Ok(response.into())
    }

    pub async fn export(&self, identity: &ChatIdentity) -> Result<ExportResponse, Report> {
        let url = self.endpoint(&[
            "api",
            "export",
            &identity.user_id,
            identity.bot_type.as_str(),
        ])?;
        self.get_json(url).await
    }

    /// Raw bytes of a server path, used for static assets.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, Report> {
        let url = self.resolve(path)?;
        let bytes = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::BotType;

    #[test]
    fn endpoints_are_rooted_at_the_server() {
        let api = ApiClient::new("http://localhost:5000").unwrap();
        assert_eq!(
            api.endpoint(&["api", "chat", "42", BotType::Evg.as_str()])
                .unwrap()
                .as_str(),
            "http://localhost:5000/api/chat/42/evg"
        );
    }

    #[test]
    fn endpoints_keep_a_path_prefix_and_encode_segments() {
        let api = ApiClient::new("https://admin.example.com/panel/").unwrap();
        assert_eq!(
            api.endpoint(&["api", "export", "a b/c", "damon"])
                .unwrap()
                .as_str(),
            "https://admin.example.com/panel/api/export/a%20b%2Fc/damon"
        );
    }

    #[test]
    fn download_locations_resolve_against_the_root() {
        let api = ApiClient::new("http://localhost:5000").unwrap();
        assert_eq!(
            api.resolve("/static/downloads/chat_42_evg.xlsx")
                .unwrap()
                .as_str(),
            "http://localhost:5000/static/downloads/chat_42_evg.xlsx"
        );
        assert_eq!(
            api.resolve("https://cdn.example.com/x.xlsx").unwrap().as_str(),
            "https://cdn.example.com/x.xlsx"
        );
    }

    #[test]
    fn rejects_invalid_server_url() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
