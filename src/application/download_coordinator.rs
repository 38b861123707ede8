use std::io::Write;
use std::path::{Path, PathBuf};

use futures::{stream::BoxStream, StreamExt};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{info, warn};

use crate::{
    api::ApiClient,
    application::resolver::resolve_variant,
    domain::{AppError, CatalogEntry, DownloadOutcome, DownloadPlan},
    utils::output_filename,
};

/// Bytes buffered before each write to disk.
pub const CHUNK_SIZE: usize = 8192;

#[derive(Debug, Clone)]
pub enum DownloadEvent {
    Progress { downloaded: u64, total: Option<u64> },
    Completed(PathBuf),
    Failed(AppError),
}

impl DownloadEvent {
    /// Percentage transferred, when the server announced a size.
    pub fn percent(&self) -> Option<f32> {
        match self {
            DownloadEvent::Progress {
                downloaded,
                total: Some(total),
            } if *total > 0 => Some(*downloaded as f32 / *total as f32 * 100.0),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: ApiClient,
    output_dir: PathBuf,
}

impl DownloadCoordinator {
    pub fn new(api_client: ApiClient, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_client,
            output_dir: output_dir.into(),
        }
    }

    pub async fn prepare_download(&self, entry: &CatalogEntry) -> Result<DownloadPlan, AppError> {
        let resolved = resolve_variant(&self.api_client, entry).await?;
        let path = self
            .output_dir
            .join(output_filename(&resolved.title, &entry.shortcode));

        Ok(DownloadPlan {
            shortcode: entry.shortcode.clone(),
            title: resolved.title,
            variant: resolved.variant,
            path,
        })
    }

    /// Resolve, skip if already on disk, otherwise transfer. Never aborts the run.
    pub async fn process_entry(&self, entry: &CatalogEntry) -> DownloadOutcome {
        let plan = match self.prepare_download(entry).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!(shortcode = %entry.shortcode, "  {}", e);
                return DownloadOutcome::Failed(e.to_string());
            }
        };

        let filename = display_name(&plan.path);
        if plan.path.exists() {
            info!("  Already exists: {}", filename);
            return DownloadOutcome::SkippedExists(plan.path);
        }

        info!("  Title: {}", plan.title);
        info!(
            "  Quality: {} ({})",
            plan.variant.quality,
            plan.variant.dimensions()
        );
        info!("  Downloading...");

        let mut events = self.download_stream(plan.variant.url.clone(), plan.path.clone());
        let mut last_shown: Option<f32> = None;
        while let Some(event) = events.next().await {
            match event {
                DownloadEvent::Progress { .. } => {
                    if let Some(pct) = event.percent() {
                        // One decimal place is all the line shows.
                        let rounded = (pct * 10.0).floor() / 10.0;
                        if last_shown != Some(rounded) {
                            eprint!("\r  Progress: {:.1}%", rounded);
                            let _ = std::io::stderr().flush();
                            last_shown = Some(rounded);
                        }
                    }
                }
                DownloadEvent::Completed(path) => {
                    end_progress_line(last_shown);
                    info!("  Saved: {}", filename);
                    return DownloadOutcome::Downloaded(path);
                }
                DownloadEvent::Failed(e) => {
                    end_progress_line(last_shown);
                    warn!(shortcode = %plan.shortcode, "  Error downloading: {}", e);
                    return DownloadOutcome::Failed(e.to_string());
                }
            }
        }

        DownloadOutcome::Failed("download stream ended unexpectedly".to_string())
    }

    /// Stream `url` into `path`. The file is created only once the server
    /// has answered successfully; a transfer that fails midway leaves the
    /// partial file behind.
    pub fn download_stream(&self, url: String, path: PathBuf) -> BoxStream<'static, DownloadEvent> {
        futures::stream::unfold(
            DownloadRuntimeState::Start {
                client: self.api_client.clone(),
                url,
                path,
            },
            |state| async move {
                match state {
                    DownloadRuntimeState::Start { client, url, path } => {
                        let (total, stream) = match client.download_file_stream(&url).await {
                            Ok(response) => response,
                            Err(e) => {
                                return Some((
                                    DownloadEvent::Failed(AppError::Transfer(e.to_string())),
                                    DownloadRuntimeState::Finished,
                                ));
                            }
                        };

                        let file = match tokio::fs::File::create(&path).await {
                            Ok(file) => file,
                            Err(e) => {
                                return Some((
                                    DownloadEvent::Failed(AppError::Transfer(format!(
                                        "Failed to create file: {}",
                                        e
                                    ))),
                                    DownloadRuntimeState::Finished,
                                ));
                            }
                        };

                        Some((
                            DownloadEvent::Progress {
                                downloaded: 0,
                                total,
                            },
                            DownloadRuntimeState::Downloading {
                                file: BufWriter::with_capacity(CHUNK_SIZE, file),
                                stream: stream.boxed(),
                                downloaded: 0,
                                total,
                                path,
                            },
                        ))
                    }
                    DownloadRuntimeState::Downloading {
                        mut file,
                        mut stream,
                        mut downloaded,
                        total,
                        path,
                    } => match stream.next().await {
                        Some(Ok(chunk)) => {
                            if let Err(e) = file.write_all(&chunk).await {
                                let _ = file.flush().await;
                                return Some((
                                    DownloadEvent::Failed(AppError::Transfer(format!(
                                        "Write error: {}",
                                        e
                                    ))),
                                    DownloadRuntimeState::Finished,
                                ));
                            }

                            downloaded += chunk.len() as u64;

                            Some((
                                DownloadEvent::Progress { downloaded, total },
                                DownloadRuntimeState::Downloading {
                                    file,
                                    stream,
                                    downloaded,
                                    total,
                                    path,
                                },
                            ))
                        }
                        Some(Err(e)) => {
                            // Keep what was already received in the partial file.
                            let _ = file.flush().await;
                            Some((
                                DownloadEvent::Failed(AppError::Transfer(e.to_string())),
                                DownloadRuntimeState::Finished,
                            ))
                        }
                        None => {
                            let synced = match file.flush().await {
                                Ok(()) => file.get_ref().sync_all().await,
                                Err(e) => Err(e),
                            };
                            if let Err(e) = synced {
                                return Some((
                                    DownloadEvent::Failed(AppError::Transfer(format!(
                                        "Failed to sync file: {}",
                                        e
                                    ))),
                                    DownloadRuntimeState::Finished,
                                ));
                            }

                            Some((
                                DownloadEvent::Completed(path),
                                DownloadRuntimeState::Finished,
                            ))
                        }
                    },
                    DownloadRuntimeState::Finished => None,
                }
            },
        )
        .boxed()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn end_progress_line(last_shown: Option<f32>) {
    if last_shown.is_some() {
        eprintln!();
    }
}

enum DownloadRuntimeState {
    Start {
        client: ApiClient,
        url: String,
        path: PathBuf,
    },
    Downloading {
        file: BufWriter<tokio::fs::File>,
        stream: BoxStream<'static, crate::api::Result<bytes::Bytes>>,
        downloaded: u64,
        total: Option<u64>,
        path: PathBuf,
    },
    Finished,
}
