//! File-backed storage for runs, feedback, and configuration

pub mod config;
pub mod feedback;
pub mod report;
pub mod workflow;

pub use config::TeamConfigStorage;
pub use feedback::FeedbackStorage;
pub use report::ReportStorage;
pub use workflow::WorkflowStorage;

use std::path::PathBuf;

pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .expect("Could not find data directory")
        .join("jiraflow")
}

pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .expect("Could not find config directory")
        .join("jiraflow")
}

pub fn init_data_dir() -> crate::Result<PathBuf> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    std::fs::create_dir_all(data_dir.join("runs"))?;
    Ok(data_dir)
}

pub fn init_config_dir() -> crate::Result<PathBuf> {
    let config_dir = get_config_dir();
    std::fs::create_dir_all(&config_dir)?;
    Ok(config_dir)
}

/// Directory holding all artifacts for one ticket's run
pub fn run_dir(data_dir: &std::path::Path, ticket_key: &str) -> PathBuf {
    data_dir.join("runs").join(ticket_key)
}
