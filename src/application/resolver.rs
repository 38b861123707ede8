use std::collections::HashMap;

use tracing::debug;

use crate::api::models::FileInfo;
use crate::api::ApiClient;
use crate::domain::{AppError, CatalogEntry, FileVariant, Quality};
use crate::utils::{normalize_url, sanitize_filename};

/// Title and chosen rendition for one catalog entry.
#[derive(Debug, Clone)]
pub struct ResolvedVideo {
    pub title: String,
    pub variant: FileVariant,
}

/// Pick the first rendition in precedence order that carries a usable URL.
pub fn select_best_variant(files: &HashMap<String, FileInfo>) -> Option<FileVariant> {
    Quality::PRECEDENCE.iter().find_map(|&quality| {
        let info = files.get(quality.label())?;
        let url = info.url.as_deref().filter(|u| !u.is_empty())?;
        Some(FileVariant {
            quality,
            url: normalize_url(url),
            width: info.width,
            height: info.height,
        })
    })
}

/// Metadata title, then catalog title, then the shortcode itself; sanitized.
pub fn resolve_title(metadata_title: Option<&str>, entry: &CatalogEntry) -> String {
    let title = metadata_title
        .filter(|t| !t.is_empty())
        .or(Some(entry.title.as_str()).filter(|t| !t.is_empty()))
        .unwrap_or(entry.shortcode.as_str());
    sanitize_filename(title)
}

pub async fn resolve_variant(
    client: &ApiClient,
    entry: &CatalogEntry,
) -> Result<ResolvedVideo, AppError> {
    let metadata = client
        .video_metadata(&entry.shortcode)
        .await
        .map_err(|e| AppError::Api(format!("Failed to fetch metadata: {}", e)))?;

    let title = resolve_title(metadata.title.as_deref(), entry);

    let files = match metadata.files {
        Some(files) if !files.is_empty() => files,
        _ => return Err(AppError::NoFiles),
    };
    debug!(shortcode = %entry.shortcode, labels = ?files.keys().collect::<Vec<_>>(), "available files");

    let variant = select_best_variant(&files).ok_or(AppError::NoDownloadUrl)?;
    Ok(ResolvedVideo { title, variant })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(url: Option<&str>) -> FileInfo {
        FileInfo {
            url: url.map(str::to_string),
            width: Some(1920),
            height: Some(1080),
        }
    }

    fn files(entries: &[(&str, Option<&str>)]) -> HashMap<String, FileInfo> {
        entries
            .iter()
            .map(|(label, url)| (label.to_string(), file(*url)))
            .collect()
    }

    fn entry(shortcode: &str, title: &str) -> CatalogEntry {
        CatalogEntry {
            shortcode: shortcode.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_original_wins_over_others() {
        let all_three = files(&[
            ("mp4-mobile", Some("https://cdn.example.com/mobile.mp4")),
            ("mp4", Some("https://cdn.example.com/standard.mp4")),
            ("original", Some("https://cdn.example.com/original.mp4")),
        ]);
        let variant = select_best_variant(&all_three).unwrap();
        assert_eq!(variant.quality, Quality::Original);
        assert_eq!(variant.url, "https://cdn.example.com/original.mp4");
        assert_eq!(variant.width, Some(1920));
    }

    #[test]
    fn test_mobile_only_is_normalized() {
        let mobile_only = files(&[("mp4-mobile", Some("//cdn.example.com/mobile.mp4"))]);
        let variant = select_best_variant(&mobile_only).unwrap();
        assert_eq!(variant.quality, Quality::Mp4Mobile);
        assert_eq!(variant.url, "https://cdn.example.com/mobile.mp4");
    }

    #[test]
    fn test_empty_files_yield_nothing() {
        assert!(select_best_variant(&HashMap::new()).is_none());
    }

    #[test]
    fn test_entries_without_url_are_passed_over() {
        let mixed = files(&[
            ("original", None),
            ("mp4", Some("")),
            ("mp4-mobile", Some("https://cdn.example.com/m.mp4")),
        ]);
        assert_eq!(select_best_variant(&mixed).unwrap().quality, Quality::Mp4Mobile);

        let unknown_label = files(&[("webm", Some("https://cdn.example.com/v.webm"))]);
        assert!(select_best_variant(&unknown_label).is_none());
    }

    #[test]
    fn test_resolve_title_fallbacks() {
        assert_eq!(resolve_title(Some("From API"), &entry("abc", "From list")), "From API");
        assert_eq!(resolve_title(Some(""), &entry("abc", "From list")), "From list");
        assert_eq!(resolve_title(None, &entry("abc", "")), "abc");
        assert_eq!(resolve_title(Some("a/b?"), &entry("abc", "")), "ab");
    }
}
