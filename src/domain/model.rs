use std::fmt;
use std::path::PathBuf;

/// One video owned by the account, as listed by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub shortcode: String,
    pub title: String,
}

/// Quality labels exposed in a video's `files` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Original,
    Mp4,
    Mp4Mobile,
}

impl Quality {
    /// Most-original first, then standard, then mobile-reduced.
    pub const PRECEDENCE: [Quality; 3] = [Quality::Original, Quality::Mp4, Quality::Mp4Mobile];

    pub fn label(self) -> &'static str {
        match self {
            Quality::Original => "original",
            Quality::Mp4 => "mp4",
            Quality::Mp4Mobile => "mp4-mobile",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileVariant {
    pub quality: Quality,
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl FileVariant {
    /// `1920x1080`, with `unknown` standing in for missing dimensions.
    pub fn dimensions(&self) -> String {
        let show = |v: Option<u32>| v.map_or_else(|| "unknown".to_string(), |v| v.to_string());
        format!("{}x{}", show(self.width), show(self.height))
    }
}

#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub shortcode: String,
    pub title: String,
    pub variant: FileVariant,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    Downloaded(PathBuf),
    SkippedExists(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DownloadSummary {
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded(_) => self.downloaded += 1,
            DownloadOutcome::SkippedExists(_) => self.skipped += 1,
            DownloadOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}
