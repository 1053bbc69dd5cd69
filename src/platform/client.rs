//! HTTP client for the SwitchTube REST API

use super::credentials::AccessToken;
use crate::core::{ChannelMetadata, ChannelVideo, VideoMetadata, VideoVariant};
use crate::error::SwitchdlError;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Base URL of the SwitchTube instance
pub const SWITCHTUBE_BASE_URL: &str = "https://tube.switch.ch";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// API base URL
    pub base_url: String,
    /// Connect timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: SWITCHTUBE_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("switchdl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Result of checking a token against the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Valid,
    /// Rejected with 401 or 403
    Invalid(u16),
}

/// Authenticated SwitchTube API client.
///
/// Performs no retries: any non-200 answer is an error carrying the status.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: AccessToken,
    cancel: CancellationToken,
}

impl ApiClient {
    /// Create a client for the public SwitchTube instance
    pub fn new(token: AccessToken) -> Result<Self, SwitchdlError> {
        Self::with_config(token, HttpClientConfig::default())
    }

    pub fn with_config(token: AccessToken, config: HttpClientConfig) -> Result<Self, SwitchdlError> {
        let http = Client::builder()
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|source| SwitchdlError::Request {
                context: "HTTP client setup",
                source,
            })?;

        Ok(Self {
            http,
            base_url: Url::parse(&config.base_url)?,
            token,
            cancel: CancellationToken::new(),
        })
    }

    /// Abort in-flight requests when `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check whether the token is accepted
    pub async fn validate_token(&self) -> Result<TokenStatus, SwitchdlError> {
        let url = self.base_url.join("/api/v1/profiles/me")?;
        let response = self.send(self.json_request(url), "token validation").await?;

        match response.status() {
            StatusCode::OK => Ok(TokenStatus::Valid),
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Ok(TokenStatus::Invalid(status.as_u16()))
            }
            status => Err(SwitchdlError::UnexpectedStatus {
                context: "token validation",
                status: status.as_u16(),
            }),
        }
    }

    pub async fn fetch_video_details(&self, video_id: &str) -> Result<VideoMetadata, SwitchdlError> {
        let url = self.api_url(&["videos", video_id])?;
        self.get_json(url, "video details", video_id).await
    }

    /// Variants of a video, best quality first
    pub async fn fetch_video_variants(
        &self,
        video_id: &str,
    ) -> Result<Vec<VideoVariant>, SwitchdlError> {
        let url = self.api_url(&["videos", video_id, "video_variants"])?;
        self.get_json(url, "video variants", video_id).await
    }

    pub async fn fetch_channel_details(
        &self,
        channel_id: &str,
    ) -> Result<ChannelMetadata, SwitchdlError> {
        let url = self.api_url(&["channels", channel_id])?;
        self.get_json(url, "channel details", channel_id).await
    }

    pub async fn fetch_channel_videos(
        &self,
        channel_id: &str,
    ) -> Result<Vec<ChannelVideo>, SwitchdlError> {
        let url = self.api_url(&["channels", channel_id, "videos"])?;
        self.get_json(url, "channel videos", channel_id).await
    }

    /// Start downloading the media at `path`.
    ///
    /// `path` is relative to the base URL unless it is already absolute.
    pub async fn stream_download(&self, path: &str) -> Result<Response, SwitchdlError> {
        let url = self.download_url(path)?;
        debug!("Starting media download from {}", url);

        let request = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.authorization());
        let response = self.send(request, "video download").await?;

        if response.status() != StatusCode::OK {
            return Err(SwitchdlError::UnexpectedStatus {
                context: "download",
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }

    /// Absolute URL for a media path
    pub fn download_url(&self, path: &str) -> Result<Url, SwitchdlError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        Ok(self.base_url.join(path)?)
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url, SwitchdlError> {
        let mut url = self.base_url.join("/api/v1/browse")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .extend(segments);
        Ok(url)
    }

    fn authorization(&self) -> String {
        format!("Token {}", self.token.expose())
    }

    fn json_request(&self, url: Url) -> RequestBuilder {
        self.http
            .get(url)
            .header(AUTHORIZATION, self.authorization())
            .header(ACCEPT, "application/json")
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &'static str,
        id: &str,
    ) -> Result<T, SwitchdlError> {
        debug!("GET {}", url);
        let response = self.send(self.json_request(url), context).await?;
        let status = response.status();
        debug!("{} for {}: HTTP {}", context, id, status);

        match status {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                return Err(SwitchdlError::NotFound {
                    what: context,
                    id: id.to_string(),
                })
            }
            _ => {
                return Err(SwitchdlError::UnexpectedStatus {
                    context,
                    status: status.as_u16(),
                })
            }
        }

        let body = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(SwitchdlError::Cancelled),
            body = response.bytes() => body.map_err(|source| SwitchdlError::Request { context, source })?,
        };
        serde_json::from_slice(&body).map_err(|source| SwitchdlError::Decode { context, source })
    }

    async fn send(
        &self,
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<Response, SwitchdlError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(SwitchdlError::Cancelled),
            result = request.send() => result.map_err(|source| SwitchdlError::Request { context, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        let config = HttpClientConfig {
            base_url: server.url(),
            ..Default::default()
        };
        ApiClient::with_config(AccessToken::new("secret"), config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_video_details_sends_auth_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/browse/videos/abc")
            .match_header("authorization", "Token secret")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"abc","title":"Hello","published_at":"2025-06-02T11:08:32.977+02:00","duration_in_milliseconds":1000}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let video = client.fetch_video_details("abc").await.unwrap();
        assert_eq!(video.title, "Hello");
        assert_eq!(video.duration_ms, 1000);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_and_unexpected_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/browse/videos/missing")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/browse/channels/broken/videos")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let err = client.fetch_video_details("missing").await.unwrap_err();
        assert!(matches!(err, SwitchdlError::NotFound { what: "video details", .. }));

        let err = client.fetch_channel_videos("broken").await.unwrap_err();
        assert!(matches!(
            err,
            SwitchdlError::UnexpectedStatus { context: "channel videos", status: 500 }
        ));
    }

    #[tokio::test]
    async fn test_fetch_variants_keeps_order() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/browse/videos/abc/video_variants")
            .with_status(200)
            .with_body(r#"[{"path":"/a.mp4","name":"hd","media_type":"video/mp4"},{"path":"/b.mp4","name":"sd","media_type":"video/mp4"}]"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let variants = client.fetch_video_variants("abc").await.unwrap();
        let labels: Vec<_> = variants.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["hd", "sd"]);
    }

    #[tokio::test]
    async fn test_channel_endpoints() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/browse/channels/ch1")
            .with_status(200)
            .with_body(r#"{"id":"ch1","name":"Physics"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/browse/channels/ch1/videos")
            .with_status(200)
            .with_body(r#"[{"id":"v1","title":"One"},{"id":"v2","title":"Two"}]"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.fetch_channel_details("ch1").await.unwrap().name, "Physics");
        assert_eq!(client.fetch_channel_videos("ch1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_validate_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/profiles/me")
            .with_status(401)
            .create_async()
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.validate_token().await.unwrap(), TokenStatus::Invalid(401));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_stream_download_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/media/gone.mp4")
            .match_header("authorization", "Token secret")
            .with_status(410)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let err = client.stream_download("/media/gone.mp4").await.unwrap_err();
        assert!(matches!(err, SwitchdlError::UnexpectedStatus { status: 410, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_names_endpoint() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/browse/videos/abc/video_variants")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server).await;
        let err = client.fetch_video_variants("abc").await.unwrap_err();
        assert!(matches!(err, SwitchdlError::Decode { context: "video variants", .. }));
        assert!(err.to_string().contains("video variants"));
    }

    #[tokio::test]
    async fn test_unreachable_server_names_endpoint() {
        let config = HttpClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let client = ApiClient::with_config(AccessToken::new("t"), config).unwrap();
        let err = client.fetch_channel_details("ch1").await.unwrap_err();
        assert!(matches!(err, SwitchdlError::Request { context: "channel details", .. }));
        assert!(err.to_string().starts_with("request for channel details failed"));
    }

    #[tokio::test]
    async fn test_cancelled_client_never_sends() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/browse/videos/abc")
            .with_status(200)
            .with_body(r#"{"id":"abc","title":"Hello"}"#)
            .expect(0)
            .create_async()
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let client = client_for(&server).await.with_cancellation(cancel);
        for _ in 0..50 {
            let err = client.fetch_video_details("abc").await.unwrap_err();
            assert!(matches!(err, SwitchdlError::Cancelled));
        }
        mock.assert_async().await;
    }

    #[test]
    fn test_download_url() {
        let client = ApiClient::new(AccessToken::new("t")).unwrap();
        assert_eq!(
            client.download_url("/media/x.mp4").unwrap().as_str(),
            "https://tube.switch.ch/media/x.mp4"
        );
        assert_eq!(
            client.download_url("https://cdn.example.com/y.mp4").unwrap().as_str(),
            "https://cdn.example.com/y.mp4"
        );
    }

    #[test]
    fn test_api_url_escapes_segments() {
        let client = ApiClient::new(AccessToken::new("t")).unwrap();
        let url = client.api_url(&["videos", "a b"]).unwrap();
        assert_eq!(url.as_str(), "https://tube.switch.ch/api/v1/browse/videos/a%20b");
    }
}
