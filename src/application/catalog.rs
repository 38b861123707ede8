use std::collections::HashSet;
use std::io::Write;

use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::domain::CatalogEntry;

/// Walk the listing endpoint page by page and collect every video.
///
/// Stops on the first empty page, on a page that adds no new shortcode, or
/// once the number of rows received reaches the server-reported total. A
/// failed or malformed page ends enumeration but keeps what was already
/// collected. Shortcodes already seen are dropped.
pub async fn enumerate_catalog(client: &ApiClient, page_size: u32) -> Vec<CatalogEntry> {
    let mut entries: Vec<CatalogEntry> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut received: u64 = 0;
    let mut page = 1;

    loop {
        let response = match client.list_videos(page, page_size).await {
            Ok(response) => response,
            Err(e) => {
                warn!(page, "catalog page failed, keeping {} videos: {}", entries.len(), e);
                break;
            }
        };

        if response.videos.is_empty() {
            debug!(page, "empty catalog page");
            break;
        }

        received += response.videos.len() as u64;
        let before = entries.len();

        for video in response.videos {
            let Some(shortcode) = video.shortcode.filter(|s| !s.is_empty()) else {
                warn!(page, "catalog entry without shortcode skipped");
                continue;
            };
            if !seen.insert(shortcode.clone()) {
                debug!(shortcode, "duplicate catalog entry skipped");
                continue;
            }
            entries.push(CatalogEntry {
                shortcode,
                title: video.title.unwrap_or_default(),
            });
        }

        eprint!("\r  Fetched {} videos...", entries.len());
        let _ = std::io::stderr().flush();

        if received >= response.total {
            break;
        }
        if entries.len() == before {
            debug!(page, "catalog page added nothing new");
            break;
        }
        page += 1;
    }

    eprintln!();
    entries
}
