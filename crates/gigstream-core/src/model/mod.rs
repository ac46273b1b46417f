//! Typed entities reconstructed from ledger objects.
//!
//! The ledger is authoritative; these types are read-only projections and
//! carry no behavior beyond small queries over their own fields.

pub mod job;
pub mod profile;
pub mod stats;

pub use job::{JobListing, JobStatus};
pub use profile::{ClientProfile, FreelancerProfile};
pub use stats::PlatformStats;
