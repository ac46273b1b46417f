//! Viewer-relative filtering of the job feed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::JobListing;

/// Which slice of the feed the viewer is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewContext {
    /// Every open job.
    #[default]
    Default,
    /// Jobs the viewer posted, in any status.
    Hire,
    /// Open jobs posted by someone else.
    FindGig,
}

impl ViewContext {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Hire => "hire",
            Self::FindGig => "find-gig",
        }
    }
}

impl fmt::Display for ViewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "all" => Ok(Self::Default),
            "hire" => Ok(Self::Hire),
            "find-gig" | "find_gig" | "findgig" => Ok(Self::FindGig),
            other => Err(format!(
                "unknown view '{other}': expected default, hire, or find-gig"
            )),
        }
    }
}

/// Compare two ledger addresses.
///
/// Surrounding whitespace and hex-digit case are ignored.
#[must_use]
pub fn addresses_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Keep the jobs visible to `viewer` in `view`, preserving order.
///
/// Without a viewer (or with a blank one) every view falls back to
/// [`ViewContext::Default`].
#[must_use]
pub fn apply_view(
    jobs: Vec<JobListing>,
    viewer: Option<&str>,
    view: ViewContext,
) -> Vec<JobListing> {
    let viewer = viewer.filter(|address| !address.trim().is_empty());
    match (viewer, view) {
        (Some(viewer), ViewContext::Hire) => jobs
            .into_iter()
            .filter(|job| addresses_match(&job.client, viewer))
            .collect(),
        (Some(viewer), ViewContext::FindGig) => jobs
            .into_iter()
            .filter(|job| job.is_open() && !addresses_match(&job.client, viewer))
            .collect(),
        _ => jobs.into_iter().filter(JobListing::is_open).collect(),
    }
}
