use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle labels the marketplace contract writes into `status`.
///
/// [`JobListing::status`] keeps the raw label so that labels added by a
/// newer contract survive decoding; this enum covers the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job posted by a client, as currently stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: String,
    /// Address of the posting client. Matched against profiles by address only.
    pub client: String,
    pub title: String,
    pub description: String,
    /// Comma-space joined skill list, whatever encoding the ledger used.
    pub required_skills: String,
    /// Smallest currency unit.
    pub budget: u64,
    /// Milliseconds since the Unix epoch.
    pub deadline: u64,
    pub status: String,
    pub applications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_freelancer: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl JobListing {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Open.as_str()
    }
}
