//! Transaction payloads for the marketplace's entry functions.
//!
//! This module only describes calls; signing and submission belong to a
//! wallet behind [`TransactionSubmitter`]. Payloads serialize to JSON so an
//! external signer can consume them.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ContractConfig;
use crate::validate::{
    ValidationError, future_deadline, object_id, optional_text, positive_budget, required_text,
};

pub const CREATE_FREELANCER_PROFILE: &str = "create_freelancer_profile";
pub const CREATE_CLIENT_PROFILE: &str = "create_client_profile";
pub const CREATE_JOB_LISTING: &str = "create_job_listing";

/// One argument of a move call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CallArg {
    /// Reference to an existing object by id.
    Object(String),
    /// UTF-8 string passed by value.
    String(String),
    /// Unsigned 64-bit integer passed by value.
    U64(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    /// `{package}::{module}::{function}`.
    pub target: String,
    pub arguments: Vec<CallArg>,
}

/// A single-call transaction ready for signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub call: MoveCall,
    pub gas_budget: u64,
}

impl TransactionPayload {
    fn new(contract: &ContractConfig, function: &str, arguments: Vec<CallArg>) -> Self {
        Self {
            call: MoveCall {
                target: contract.function_target(function),
                arguments,
            },
            gas_budget: contract.gas_budget,
        }
    }
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreelancerProfileForm {
    pub name: String,
    pub bio: String,
    /// Comma-separated skill list.
    pub skills: String,
    pub portfolio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientProfileForm {
    pub name: String,
    pub company: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobForm {
    pub title: String,
    pub description: String,
    pub required_skills: String,
    /// Smallest currency unit.
    pub budget: u64,
    /// `YYYY-MM-DD`, RFC 3339, or epoch milliseconds.
    pub deadline: String,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// `create_freelancer_profile(platform, name, bio, skills, portfolio)`.
///
/// # Errors
///
/// Returns a [`ValidationError`] if name, bio, or skills is blank.
pub fn create_freelancer_profile(
    contract: &ContractConfig,
    form: &FreelancerProfileForm,
) -> Result<TransactionPayload, ValidationError> {
    let platform = object_id("platform_object_id", &contract.platform_object_id)?;
    let arguments = vec![
        CallArg::Object(platform),
        CallArg::String(required_text("name", &form.name)?),
        CallArg::String(required_text("bio", &form.bio)?),
        CallArg::String(required_text("skills", &form.skills)?),
        CallArg::String(optional_text("portfolio", &form.portfolio)?),
    ];
    Ok(TransactionPayload::new(
        contract,
        CREATE_FREELANCER_PROFILE,
        arguments,
    ))
}

/// `create_client_profile(name, company, description)`.
///
/// # Errors
///
/// Returns a [`ValidationError`] if any field is blank.
pub fn create_client_profile(
    contract: &ContractConfig,
    form: &ClientProfileForm,
) -> Result<TransactionPayload, ValidationError> {
    let arguments = vec![
        CallArg::String(required_text("name", &form.name)?),
        CallArg::String(required_text("company", &form.company)?),
        CallArg::String(required_text("description", &form.description)?),
    ];
    Ok(TransactionPayload::new(
        contract,
        CREATE_CLIENT_PROFILE,
        arguments,
    ))
}

/// `create_job_listing(platform, client_profile, title, description,
/// required_skills, budget, deadline)`.
///
/// `client_profile` is the poster's client profile object; posting without
/// one is rejected.
///
/// # Errors
///
/// Returns a [`ValidationError`] for a missing client profile, blank text
/// fields, a zero budget, or a deadline not after `now_ms`.
pub fn create_job_listing(
    contract: &ContractConfig,
    client_profile: Option<&str>,
    form: &JobForm,
    now_ms: u64,
) -> Result<TransactionPayload, ValidationError> {
    let Some(client_profile) = client_profile else {
        return Err(ValidationError::new(
            "client_profile",
            "",
            "a client profile is required to post jobs",
            "create one with `gs tx client-profile` first",
            "missing_client_profile",
        ));
    };

    let platform = object_id("platform_object_id", &contract.platform_object_id)?;
    let arguments = vec![
        CallArg::Object(platform),
        CallArg::Object(object_id("client_profile", client_profile)?),
        CallArg::String(required_text("title", &form.title)?),
        CallArg::String(required_text("description", &form.description)?),
        CallArg::String(required_text("required_skills", &form.required_skills)?),
        CallArg::U64(positive_budget(form.budget)?),
        CallArg::U64(future_deadline(&form.deadline, now_ms)?),
    ];
    Ok(TransactionPayload::new(
        contract,
        CREATE_JOB_LISTING,
        arguments,
    ))
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The wallet or user declined to sign.
    #[error("submission rejected: {0}")]
    Rejected(String),
    /// No signer is reachable.
    #[error("signer unavailable: {0}")]
    Unavailable(String),
    /// The transaction was signed but execution failed.
    #[error("execution failed: {0}")]
    Execution(String),
}

/// Signs and executes a payload.
pub trait TransactionSubmitter {
    /// # Errors
    ///
    /// Returns a [`SubmitError`] if the payload was not executed.
    fn submit(&self, payload: &TransactionPayload) -> Result<SubmissionReceipt, SubmitError>;
}

/// Flattened submission result for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_digest: Option<String>,
}

/// Submit `payload` and fold the result into a [`CallOutcome`].
pub fn submit_and_report<S: TransactionSubmitter + ?Sized>(
    submitter: &S,
    payload: &TransactionPayload,
) -> CallOutcome {
    match submitter.submit(payload) {
        Ok(receipt) => {
            info!(target_fn = %payload.call.target, digest = %receipt.digest, "transaction executed");
            CallOutcome {
                success: true,
                error: None,
                transaction_digest: Some(receipt.digest),
            }
        }
        Err(e) => {
            warn!(target_fn = %payload.call.target, error = %e, "transaction failed");
            CallOutcome {
                success: false,
                error: Some(e.to_string()),
                transaction_digest: None,
            }
        }
    }
}
