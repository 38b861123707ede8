pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{CatalogEntry, DownloadOutcome, DownloadPlan, DownloadSummary, FileVariant, Quality};
