use serde::{Deserialize, Serialize};

/// A freelancer's on-chain profile. `owner` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreelancerProfile {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub bio: String,
    /// Comma-space joined skill list.
    pub skills: String,
    pub portfolio: String,
    pub rating: u64,
    pub completed_jobs: u64,
    pub created_at: u64,
}

/// A client's on-chain profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub company: String,
    pub description: String,
    pub projects_posted: u64,
    pub rating: u64,
    pub created_at: u64,
}
