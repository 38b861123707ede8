use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One page from the `/videos` listing endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoListResponse {
    pub videos: Vec<VideoSummary>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoSummary {
    #[serde(default)]
    pub shortcode: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Response from the per-video metadata endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub files: Option<HashMap<String, FileInfo>>,
}

/// A single rendition inside `files`. Entries still being processed come back with nulls.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileInfo {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base of the authenticated listing API; `/videos` is appended.
    pub catalog_base_url: String,
    /// Base of the public metadata API; `/videos/{shortcode}` is appended.
    pub metadata_base_url: String,
    pub login_url: String,
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: "https://api-f.streamable.com/api/v1".to_string(),
            metadata_base_url: "https://api.streamable.com".to_string(),
            login_url: "https://ajax.streamable.com/check".to_string(),
            page_size: 50,
        }
    }
}
