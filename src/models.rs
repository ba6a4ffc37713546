use serde::{Deserialize, Serialize};

/// One normalized hiring post, built once by either extraction path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub user: String,
    pub age: String,
    pub header: String,
    pub company: String,
    pub location: String, // always "Unknown" for now
    pub url: Option<String>,
    pub content: String,
    pub is_us_only: bool,
    pub is_remote: bool,
    pub is_visa: bool,
    pub source_line: u32,
}

/// Flags derived from a posting header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub is_us_only: bool,
    pub is_remote: bool,
    pub is_visa: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    ExcludeUsOnly,
    RemoteOnly,
    VisaOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    pub exclude_us_only: bool,
    pub remote_only: bool,
    pub visa_only: bool,
}

impl FilterState {
    pub fn toggle(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::ExcludeUsOnly => self.exclude_us_only = !self.exclude_us_only,
            FilterKind::RemoteOnly => self.remote_only = !self.remote_only,
            FilterKind::VisaOnly => self.visa_only = !self.visa_only,
        }
    }

    pub fn is_enabled(&self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::ExcludeUsOnly => self.exclude_us_only,
            FilterKind::RemoteOnly => self.remote_only,
            FilterKind::VisaOnly => self.visa_only,
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        (!self.exclude_us_only || !job.is_us_only)
            && (!self.remote_only || job.is_remote)
            && (!self.visa_only || job.is_visa)
    }
}
