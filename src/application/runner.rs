use std::path::PathBuf;

use tracing::{error, info};

use crate::api::{ApiClient, ApiConfig, ApiError};
use crate::application::catalog::enumerate_catalog;
use crate::application::download_coordinator::DownloadCoordinator;
use crate::domain::{AppError, DownloadSummary};
use crate::session::SessionAcquirer;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub api: ApiConfig,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: DownloadSummary,
    pub catalog_size: usize,
    pub output_dir: PathBuf,
}

/// Probe the listing endpoint with a one-item page. Anything other than a
/// well-formed listing means the login did not produce a usable session.
pub async fn verify_session(client: &ApiClient) -> Result<(), AppError> {
    match client.list_videos(1, 1).await {
        Ok(_) => Ok(()),
        Err(e @ ApiError::Status(_)) if e.is_unauthorized() => Err(AppError::Auth(format!(
            "session rejected by the listing endpoint ({})",
            e
        ))),
        Err(e) => Err(AppError::Auth(format!(
            "unexpected response after login: {}",
            e
        ))),
    }
}

/// Acquire a session, enumerate the catalog and process every entry in order.
///
/// Only authentication failure, an empty catalog, or an unusable output
/// directory abort the run; per-item failures are counted.
pub async fn run(acquirer: &dyn SessionAcquirer, config: &RunConfig) -> Result<RunReport, AppError> {
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|e| {
            AppError::Io(format!(
                "cannot create output directory {}: {}",
                config.output_dir.display(),
                e
            ))
        })?;
    let output_dir = tokio::fs::canonicalize(&config.output_dir)
        .await
        .unwrap_or_else(|_| config.output_dir.clone());
    info!("Output directory: {}", output_dir.display());

    info!("Logging in ({})...", acquirer.name());
    let session = acquirer.acquire().await?;

    let client = ApiClient::new(config.api.clone(), &session)
        .map_err(|e| AppError::Auth(format!("failed to build HTTP client: {}", e)))?;
    verify_session(&client).await?;
    info!("Login successful!");

    info!("Fetching video list via API...");
    let catalog = enumerate_catalog(&client, config.api.page_size).await;
    if catalog.is_empty() {
        return Err(AppError::EmptyCatalog);
    }
    info!(
        "Found {} videos. Fetching metadata and downloading...",
        catalog.len()
    );

    let coordinator = DownloadCoordinator::new(client, output_dir.clone());
    let mut summary = DownloadSummary::default();
    for (i, entry) in catalog.iter().enumerate() {
        info!("[{}/{}] Processing: {}", i + 1, catalog.len(), entry.shortcode);
        let outcome = coordinator.process_entry(entry).await;
        summary.record(&outcome);
    }

    if summary.failed > 0 {
        error!("{} of {} videos failed", summary.failed, catalog.len());
    }

    Ok(RunReport {
        summary,
        catalog_size: catalog.len(),
        output_dir,
    })
}
