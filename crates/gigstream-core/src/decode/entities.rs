use serde_json::{Map, Value};

use super::{joined_list, optional_address, status_label, string_list, text, u64_or};
use crate::ledger::LedgerObject;
use crate::model::{ClientProfile, FreelancerProfile, JobListing, JobStatus, PlatformStats};

/// Deadline assumed for a job that does not carry one: one week out.
pub const DEFAULT_DEADLINE_WINDOW_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// Time reference for defaulted fields.
///
/// Captured once per fetch so every record in a result shares the same
/// "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext {
    pub now_ms: u64,
}

impl DecodeContext {
    #[must_use]
    pub const fn at(now_ms: u64) -> Self {
        Self { now_ms }
    }

    #[must_use]
    pub const fn default_deadline(self) -> u64 {
        self.now_ms.saturating_add(DEFAULT_DEADLINE_WINDOW_MS)
    }
}

/// Build a [`JobListing`] from a job object.
///
/// Missing or malformed fields take their documented defaults: budget `0`,
/// deadline one week after `ctx.now_ms`, creation time `ctx.now_ms`, no
/// applications, no assigned freelancer. Status is `Open` only when absent.
#[must_use]
pub fn decode_job(object: &LedgerObject, ctx: DecodeContext) -> JobListing {
    JobListing {
        id: object.object_id.clone(),
        client: text(object.field("client")),
        title: text(object.field("title")),
        description: text(object.field("description")),
        required_skills: joined_list(object.field("required_skills")),
        budget: u64_or(object.field("budget"), 0),
        deadline: u64_or(object.field("deadline"), ctx.default_deadline()),
        status: status_label(object.field("status"), JobStatus::Open.as_str()),
        applications: string_list(object.field("applications")),
        assigned_freelancer: optional_address(object.field("assigned_freelancer")),
        created_at: u64_or(object.field("created_at"), ctx.now_ms),
    }
}

/// Build a [`ClientProfile`] from a client profile object.
#[must_use]
pub fn decode_client_profile(object: &LedgerObject, ctx: DecodeContext) -> ClientProfile {
    ClientProfile {
        id: object.object_id.clone(),
        owner: text(object.field("owner")),
        name: text(object.field("name")),
        company: text(object.field("company")),
        description: text(object.field("description")),
        projects_posted: u64_or(object.field("projects_posted"), 0),
        rating: u64_or(object.field("rating"), 0),
        created_at: u64_or(object.field("created_at"), ctx.now_ms),
    }
}

/// Build a [`FreelancerProfile`] from a freelancer profile object.
///
/// `skills` goes through the same normalization as job skills.
#[must_use]
pub fn decode_freelancer_profile(object: &LedgerObject, ctx: DecodeContext) -> FreelancerProfile {
    FreelancerProfile {
        id: object.object_id.clone(),
        owner: text(object.field("owner")),
        name: text(object.field("name")),
        bio: text(object.field("bio")),
        skills: joined_list(object.field("skills")),
        portfolio: text(object.field("portfolio")),
        rating: u64_or(object.field("rating"), 0),
        completed_jobs: u64_or(object.field("completed_jobs"), 0),
        created_at: u64_or(object.field("created_at"), ctx.now_ms),
    }
}

/// Read the three platform counters; each defaults to zero on its own.
#[must_use]
pub fn decode_platform_stats(fields: &Map<String, Value>) -> PlatformStats {
    PlatformStats {
        total_freelancers: u64_or(fields.get("total_freelancers"), 0),
        total_clients: u64_or(fields.get("total_clients"), 0),
        total_jobs: u64_or(fields.get("total_jobs"), 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: u64 = 1_700_000_000_000;

    fn object(id: &str, fields: Value) -> LedgerObject {
        LedgerObject {
            object_id: id.to_string(),
            version: Some(3),
            object_type: Some("0xabc::gigstream::JobListing".to_string()),
            fields: match fields {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }

    #[test]
    fn full_job_decodes_every_field() {
        let job = decode_job(
            &object(
                "0xj1",
                json!({
                    "client": "0xc1",
                    "title": "Audit",
                    "description": "Review the escrow module",
                    "required_skills": ["Rust", "Move"],
                    "budget": "5000",
                    "deadline": "1700600000000",
                    "status": "InProgress",
                    "applications": ["0xf1", "0xf2"],
                    "assigned_freelancer": {"vec": ["0xf1"]},
                    "created_at": 1_699_000_000_000_u64
                }),
            ),
            DecodeContext::at(NOW),
        );

        assert_eq!(job.id, "0xj1");
        assert_eq!(job.client, "0xc1");
        assert_eq!(job.required_skills, "Rust, Move");
        assert_eq!(job.budget, 5000);
        assert_eq!(job.deadline, 1_700_600_000_000);
        assert_eq!(job.status, "InProgress");
        assert_eq!(job.applications, vec!["0xf1", "0xf2"]);
        assert_eq!(job.assigned_freelancer.as_deref(), Some("0xf1"));
        assert_eq!(job.created_at, 1_699_000_000_000);
    }

    #[test]
    fn empty_job_takes_defaults_from_context() {
        let job = decode_job(&object("0xj2", json!({})), DecodeContext::at(NOW));

        assert_eq!(job.budget, 0);
        assert_eq!(job.deadline, NOW + DEFAULT_DEADLINE_WINDOW_MS);
        assert_eq!(job.created_at, NOW);
        assert_eq!(job.status, "Open");
        assert!(job.applications.is_empty());
        assert_eq!(job.assigned_freelancer, None);
        assert_eq!(job.required_skills, "");
    }

    #[test]
    fn malformed_job_fields_default_instead_of_failing() {
        let job = decode_job(
            &object(
                "0xj3",
                json!({
                    "budget": "lots",
                    "deadline": {"nested": true},
                    "applications": "0xf1",
                    "assigned_freelancer": {"vec": []},
                    "status": 7
                }),
            ),
            DecodeContext::at(NOW),
        );

        assert_eq!(job.budget, 0);
        assert_eq!(job.deadline, NOW + DEFAULT_DEADLINE_WINDOW_MS);
        assert!(job.applications.is_empty());
        assert_eq!(job.assigned_freelancer, None);
        assert_eq!(job.status, "7");
        assert!(!job.is_open());
    }

    #[test]
    fn default_deadline_saturates() {
        assert_eq!(DecodeContext::at(u64::MAX).default_deadline(), u64::MAX);
    }

    #[test]
    fn freelancer_skills_normalize_like_job_skills() {
        let profile = decode_freelancer_profile(
            &object(
                "0xp1",
                json!({
                    "owner": "0xf1",
                    "name": "Ada",
                    "bio": "Systems",
                    "skills": {"fields": {"a": "Rust", "b": "Move"}},
                    "portfolio": "https://ada.dev",
                    "rating": "48",
                    "completed_jobs": 12
                }),
            ),
            DecodeContext::at(NOW),
        );

        assert_eq!(profile.skills, "Rust, Move");
        assert_eq!(profile.rating, 48);
        assert_eq!(profile.completed_jobs, 12);
        assert_eq!(profile.created_at, NOW);
    }

    #[test]
    fn client_profile_defaults_counters() {
        let profile = decode_client_profile(
            &object("0xp2", json!({"owner": "0xc1", "name": "Acme", "company": "Acme Ltd"})),
            DecodeContext::at(NOW),
        );

        assert_eq!(profile.owner, "0xc1");
        assert_eq!(profile.company, "Acme Ltd");
        assert_eq!(profile.projects_posted, 0);
        assert_eq!(profile.rating, 0);
    }

    #[test]
    fn platform_counters_default_independently() {
        let fields = object(
            "0xplat",
            json!({"total_freelancers": "4", "total_clients": null, "total_jobs": 9}),
        )
        .fields;
        assert_eq!(
            decode_platform_stats(&fields),
            PlatformStats {
                total_freelancers: 4,
                total_clients: 0,
                total_jobs: 9,
            }
        );
    }
}
