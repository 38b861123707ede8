pub mod catalog;
pub mod download_coordinator;
pub mod resolver;
pub mod runner;

pub use catalog::enumerate_catalog;
pub use download_coordinator::{DownloadCoordinator, DownloadEvent};
pub use runner::{run, RunConfig, RunReport};
