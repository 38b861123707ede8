use std::time::Duration;

use futures::Stream;
use futures::TryStreamExt;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use super::models::{ApiConfig, VideoListResponse, VideoMetadata};
use crate::session::Session;

const API_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const TRANSFER_READ_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Status(StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Status(StatusCode::UNAUTHORIZED) | ApiError::Status(StatusCode::FORBIDDEN)
        )
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// HTTP client bound to one authenticated session.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: &Session) -> Result<Self> {
        let http = Client::builder()
            .cookie_provider(session.jar())
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(TRANSFER_READ_TIMEOUT)
            .build()?;

        Ok(Self { config, http })
    }

    /// Fetch one page of the account's videos, newest first. Pages start at 1.
    pub async fn list_videos(&self, page: u32, count: u32) -> Result<VideoListResponse> {
        let url = format!("{}/videos", self.config.catalog_base_url);
        debug!(page, count, "requesting catalog page");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("sort", "date_added".to_string()),
                ("sortd", "DESC".to_string()),
                ("count", count.to_string()),
                ("page", page.to_string()),
            ])
            .timeout(API_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Fetch the metadata (title and renditions) for a single video.
    pub async fn video_metadata(&self, shortcode: &str) -> Result<VideoMetadata> {
        let url = format!("{}/videos/{}", self.config.metadata_base_url, shortcode);
        debug!(shortcode, "requesting metadata");

        let response = self.http.get(&url).timeout(API_TIMEOUT).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ApiError::Status(response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Start a file transfer.
    /// Returns (total_size, stream)
    pub async fn download_file_stream(
        &self,
        download_url: &str,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        let response = self.http.get(download_url).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(ApiError::RequestError);

        Ok((total_size, stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        let config = ApiConfig {
            catalog_base_url: format!("{}/api/v1", server.url()),
            metadata_base_url: server.url(),
            login_url: format!("{}/check", server.url()),
            page_size: 50,
        };
        ApiClient::new(config, &Session::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_list_videos_sends_paging_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/videos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("sort".into(), "date_added".into()),
                Matcher::UrlEncoded("sortd".into(), "DESC".into()),
                Matcher::UrlEncoded("count".into(), "50".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total": 51, "videos": [{"shortcode": "zz9", "title": "Last"}]}"#)
            .create_async()
            .await;

        let page = client_for(&server).list_videos(2, 50).await.unwrap();
        assert_eq!(page.total, 51);
        assert_eq!(page.videos[0].shortcode.as_deref(), Some("zz9"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_videos_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/videos")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let err = client_for(&server).list_videos(1, 1).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_video_metadata_non_200_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/videos/gone1")
            .with_status(404)
            .create_async()
            .await;

        let err = client_for(&server).video_metadata("gone1").await.unwrap_err();
        assert!(matches!(err, ApiError::Status(StatusCode::NOT_FOUND)));
        assert!(!err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_video_metadata_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/videos/bad01")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client_for(&server).video_metadata("bad01").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_download_file_stream_reports_length() {
        let mut server = mockito::Server::new_async().await;
        let body = vec![7u8; 20_000];
        server
            .mock("GET", "/cdn/clip.mp4")
            .with_status(200)
            .with_body(body.clone())
            .create_async()
            .await;

        let client = client_for(&server);
        let url = format!("{}/cdn/clip.mp4", server.url());
        let (total, stream) = client.download_file_stream(&url).await.unwrap();
        assert_eq!(total, Some(20_000));

        let chunks: Vec<_> = stream.collect().await;
        let received: usize = chunks.into_iter().map(|c| c.unwrap().len()).sum();
        assert_eq!(received, body.len());
    }
}
