//! Ledger → typed entity projection.
//!
//! The [`ProjectionBuilder`] answers every read the marketplace needs by
//! querying the ledger directly: there is no local store. Jobs are found by
//! their creation events and hydrated one object at a time; profiles are
//! found by the latest creation event naming their owner.
//!
//! # Failure handling
//!
//! A failed discovery query fails the whole fetch. A single object that
//! cannot be read is logged and skipped, so one bad listing never hides the
//! rest of the feed.

pub mod hydrate;
pub mod view;

use std::cmp::Reverse;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{ContractConfig, ProjectionConfig};
use crate::decode::{
    DecodeContext, decode_client_profile, decode_freelancer_profile, decode_job,
    decode_platform_stats,
};
use crate::error::ProjectionError;
use crate::ledger::{EventQuery, LedgerEvent, LedgerObject, LedgerQuery, ObjectOptions};
use crate::model::{ClientProfile, FreelancerProfile, JobListing, PlatformStats};

pub use view::{ViewContext, addresses_match, apply_view};

/// Event emitted when a job listing is created. Payload: `job_id`.
pub const JOB_CREATED_EVENT: &str = "JobListingCreated";
/// Event emitted when a client profile is created. Payload: `owner`, `profile_id`.
pub const CLIENT_PROFILE_CREATED_EVENT: &str = "ClientProfileCreated";
/// Event emitted when a freelancer profile is created. Payload: `owner`, `profile_id`.
pub const FREELANCER_PROFILE_CREATED_EVENT: &str = "FreelancerProfileCreated";

/// Message shown in place of the feed when discovery fails.
pub const FEED_LOAD_ERROR: &str = "Failed to load job listings from blockchain";

/// Milliseconds since the Unix epoch.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

/// Wall-clock time from the system clock.
#[must_use]
pub fn system_clock() -> Clock {
    Arc::new(|| u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0))
}

// ---------------------------------------------------------------------------
// JobFeed
// ---------------------------------------------------------------------------

/// Result of a job feed fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobFeed {
    /// Visible jobs, most recently created first.
    pub jobs: Vec<JobListing>,
    /// Creation events returned by discovery.
    pub discovered: usize,
    /// Discovered jobs dropped because their object could not be read.
    pub skipped: usize,
    /// Set when discovery failed; `jobs` is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobFeed {
    /// The empty feed reported when discovery fails.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            error: Some(FEED_LOAD_ERROR.to_string()),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectionBuilder
// ---------------------------------------------------------------------------

/// Reads marketplace state from a [`LedgerQuery`].
///
/// Holds no cache; every call re-reads the ledger.
pub struct ProjectionBuilder<L> {
    ledger: L,
    contract: ContractConfig,
    settings: ProjectionConfig,
    clock: Clock,
}

impl<L: LedgerQuery> ProjectionBuilder<L> {
    #[must_use]
    pub fn new(ledger: L, contract: ContractConfig, settings: ProjectionConfig) -> Self {
        Self {
            ledger,
            contract,
            settings,
            clock: system_clock(),
        }
    }

    /// Replace the clock used for defaulted timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Read the platform counters from the shared platform object.
    ///
    /// Any read failure yields the all-zero snapshot; this never fails.
    #[must_use]
    pub fn fetch_platform_stats(&self) -> PlatformStats {
        let platform_id = &self.contract.platform_object_id;
        match self
            .ledger
            .get_object(platform_id, ObjectOptions::content_and_type())
        {
            Ok(object) => decode_platform_stats(&object.fields),
            Err(e) => {
                warn!(object_id = %platform_id, error = %e, "platform stats unavailable, reporting zeros");
                PlatformStats::default()
            }
        }
    }

    /// Fetch the job feed as seen by `viewer` in `view`.
    ///
    /// Discovery failure is folded into [`JobFeed::error`]; use
    /// [`Self::try_fetch_jobs`] to get the underlying error instead.
    #[must_use]
    pub fn fetch_jobs(&self, viewer: Option<&str>, view: ViewContext) -> JobFeed {
        self.try_fetch_jobs(viewer, view).unwrap_or_else(|e| {
            error!(error = %e, "job discovery failed");
            JobFeed::failed()
        })
    }

    /// Fetch the job feed, surfacing discovery failure.
    ///
    /// Order follows discovery: most recently created first. Jobs whose
    /// object cannot be read are skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::Discovery`] if the creation-event query
    /// fails.
    pub fn try_fetch_jobs(
        &self,
        viewer: Option<&str>,
        view: ViewContext,
    ) -> Result<JobFeed, ProjectionError> {
        let ctx = DecodeContext::at((self.clock)());
        let events = self.discover(JOB_CREATED_EVENT)?;

        let hydrated = hydrate::map_ordered(
            &events,
            self.settings.hydration_concurrency,
            |event| self.hydrate_job(event, ctx),
        );

        let discovered = events.len();
        let decoded: Vec<JobListing> = hydrated.into_iter().flatten().collect();
        let skipped = discovered - decoded.len();
        let jobs = apply_view(decoded, viewer, view);

        info!(discovered, skipped, visible = jobs.len(), view = %view, "job feed projected");

        Ok(JobFeed {
            jobs,
            discovered,
            skipped,
            error: None,
        })
    }

    /// Most recent client profile created by `owner`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::Discovery`] if the profile-event query
    /// fails. A profile object that cannot be read yields `Ok(None)`.
    pub fn fetch_client_profile(
        &self,
        owner: &str,
    ) -> Result<Option<ClientProfile>, ProjectionError> {
        let ctx = DecodeContext::at((self.clock)());
        Ok(self
            .latest_profile_object(CLIENT_PROFILE_CREATED_EVENT, owner)?
            .map(|object| decode_client_profile(&object, ctx)))
    }

    /// Most recent freelancer profile created by `owner`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::Discovery`] if the profile-event query
    /// fails. A profile object that cannot be read yields `Ok(None)`.
    pub fn fetch_freelancer_profile(
        &self,
        owner: &str,
    ) -> Result<Option<FreelancerProfile>, ProjectionError> {
        let ctx = DecodeContext::at((self.clock)());
        Ok(self
            .latest_profile_object(FREELANCER_PROFILE_CREATED_EVENT, owner)?
            .map(|object| decode_freelancer_profile(&object, ctx)))
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn discover(&self, event_name: &str) -> Result<Vec<LedgerEvent>, ProjectionError> {
        let event_type = self.contract.event_type(event_name);
        let query = EventQuery::latest(event_type.clone(), self.settings.page_size);
        match self.ledger.query_events(&query) {
            Ok(page) => {
                debug!(event_type = %event_type, count = page.data.len(), "events discovered");
                Ok(page.data)
            }
            Err(source) => Err(ProjectionError::Discovery { event_type, source }),
        }
    }

    fn hydrate_job(&self, event: &LedgerEvent, ctx: DecodeContext) -> Option<JobListing> {
        let Some(job_id) = event.payload_str("job_id") else {
            warn!(tx_digest = %event.id.tx_digest, "skipping creation event without job_id");
            return None;
        };
        self.read_object(job_id, "job")
            .map(|object| decode_job(&object, ctx))
    }

    fn latest_profile_object(
        &self,
        event_name: &str,
        owner: &str,
    ) -> Result<Option<LedgerObject>, ProjectionError> {
        let events = self.discover(event_name)?;

        // Newest timestamp wins; on a tie, the earlier (newer) page entry.
        let latest = events
            .iter()
            .filter(|event| {
                event
                    .payload_str("owner")
                    .is_some_and(|candidate| addresses_match(candidate, owner))
            })
            .min_by_key(|event| Reverse(event.timestamp_ms.unwrap_or(0)));

        let Some(event) = latest else {
            debug!(owner, event = event_name, "no profile event for owner");
            return Ok(None);
        };
        let Some(profile_id) = event.payload_str("profile_id") else {
            warn!(owner, tx_digest = %event.id.tx_digest, "profile event without profile_id");
            return Ok(None);
        };

        Ok(self.read_object(profile_id, "profile"))
    }

    fn read_object(&self, object_id: &str, kind: &str) -> Option<LedgerObject> {
        match self
            .ledger
            .get_object(object_id, ObjectOptions::content_and_type())
        {
            Ok(object) => Some(object),
            Err(e) => {
                warn!(object_id, kind, error = %e, code = %e.error_code(), "skipping unreadable object");
                None
            }
        }
    }
}
