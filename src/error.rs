use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup conditions. Anything else is reported through `anyhow` context.
#[derive(Debug, Error)]
pub enum HnJobsError {
    #[error(
        "File not found at {}.\nChecked parent directory as well.\nUse --fetch to download data directly.",
        path.display()
    )]
    InputNotFound { path: PathBuf },

    #[error("API request to {endpoint} failed with status {status}")]
    Api {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("No 'Who is hiring?' thread found via Algolia.")]
    NoThreadFound,
}
