use serde::{Deserialize, Serialize};

/// Platform-wide counters read from the shared platform object.
///
/// `Default` is the all-zero snapshot substituted when the read fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_freelancers: u64,
    pub total_clients: u64,
    pub total_jobs: u64,
}
