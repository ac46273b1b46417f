//! `gs tx` — build unsigned move-call payloads for an external wallet.

use std::io::{self, Write};

use clap::{Args, Subcommand};
use gigstream_core::projection::system_clock;
use gigstream_core::tx::{
    CallArg, ClientProfileForm, FreelancerProfileForm, JobForm, TransactionPayload,
    create_client_profile, create_freelancer_profile, create_job_listing,
};
use gigstream_core::validate::ValidationError;
use tracing::debug;

use crate::output::{CliError, pretty_kv, pretty_section, render_error, render_mode};
use crate::session::Session;

#[derive(Args, Debug)]
pub struct TxArgs {
    #[command(subcommand)]
    pub command: TxCommand,
}

#[derive(Subcommand, Debug)]
pub enum TxCommand {
    /// Register a freelancer profile
    FreelancerProfile(FreelancerProfileArgs),
    /// Register a client profile
    ClientProfile(ClientProfileArgs),
    /// Post a job listing from a client profile
    PostJob(PostJobArgs),
}

#[derive(Args, Debug)]
pub struct FreelancerProfileArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub bio: String,
    /// Comma-separated skills.
    #[arg(long)]
    pub skills: String,
    #[arg(long, default_value = "")]
    pub portfolio: String,
}

#[derive(Args, Debug)]
pub struct ClientProfileArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct PostJobArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    /// Comma-separated skills.
    #[arg(long)]
    pub skills: String,
    /// Budget in the smallest currency unit.
    #[arg(long)]
    pub budget: u64,
    /// `YYYY-MM-DD`, RFC 3339 timestamp, or epoch milliseconds.
    #[arg(long)]
    pub deadline: String,
    /// Client profile object id.
    #[arg(long, conflicts_with = "sender")]
    pub client_profile: Option<String>,
    /// Look up the latest client profile created by this address.
    #[arg(long)]
    pub sender: Option<String>,
}

/// Execute `gs tx`.
pub fn run_tx(args: &TxArgs, session: &Session) -> anyhow::Result<()> {
    session.require_contract()?;
    let contract = &session.config.contract;

    let built = match &args.command {
        TxCommand::FreelancerProfile(a) => create_freelancer_profile(
            contract,
            &FreelancerProfileForm {
                name: a.name.clone(),
                bio: a.bio.clone(),
                skills: a.skills.clone(),
                portfolio: a.portfolio.clone(),
            },
        ),
        TxCommand::ClientProfile(a) => create_client_profile(
            contract,
            &ClientProfileForm {
                name: a.name.clone(),
                company: a.company.clone(),
                description: a.description.clone(),
            },
        ),
        TxCommand::PostJob(a) => {
            let client_profile = resolve_client_profile(a, session)?;
            create_job_listing(
                contract,
                client_profile.as_deref(),
                &JobForm {
                    title: a.title.clone(),
                    description: a.description.clone(),
                    required_skills: a.skills.clone(),
                    budget: a.budget,
                    deadline: a.deadline.clone(),
                },
                system_clock()(),
            )
        }
    };

    let payload = match built {
        Ok(payload) => payload,
        Err(e) => return Err(reject(session, &e)),
    };
    debug!(target_fn = %payload.call.target, args = payload.call.arguments.len(), "built payload");

    render_mode(
        session.output,
        &payload,
        |p, w| render_payload_text(p, w),
        |p, w| render_payload_pretty(p, w),
    )
}

fn reject(session: &Session, err: &ValidationError) -> anyhow::Error {
    if let Err(render_err) = render_error(session.output, &CliError::from(err)) {
        return render_err;
    }
    anyhow::anyhow!("{err}")
}

/// `--client-profile` as given, or the latest profile owned by `--sender`.
fn resolve_client_profile(args: &PostJobArgs, session: &Session) -> anyhow::Result<Option<String>> {
    if args.client_profile.is_some() {
        return Ok(args.client_profile.clone());
    }
    let Some(sender) = &args.sender else {
        return Ok(None);
    };
    match session.projection()?.fetch_client_profile(sender) {
        Ok(profile) => Ok(profile.map(|p| p.id)),
        Err(e) => {
            render_error(
                session.output,
                &CliError::from_code(e.error_code(), e.to_string()),
            )?;
            Err(e.into())
        }
    }
}

fn describe_arg(arg: &CallArg) -> (&'static str, String) {
    match arg {
        CallArg::Object(id) => ("object", id.clone()),
        CallArg::String(s) => ("string", s.clone()),
        CallArg::U64(n) => ("u64", n.to_string()),
    }
}

fn render_payload_text(payload: &TransactionPayload, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "target={} gas_budget={}",
        payload.call.target, payload.gas_budget
    )?;
    for (i, arg) in payload.call.arguments.iter().enumerate() {
        let (kind, value) = describe_arg(arg);
        writeln!(w, "arg{i}  {kind}  {value}")?;
    }
    Ok(())
}

fn render_payload_pretty(payload: &TransactionPayload, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Transaction payload")?;
    pretty_kv(w, "Target", &payload.call.target)?;
    pretty_kv(w, "Gas budget", payload.gas_budget.to_string())?;
    writeln!(w)?;
    writeln!(w, "Arguments:")?;
    for (i, arg) in payload.call.arguments.iter().enumerate() {
        let (kind, value) = describe_arg(arg);
        writeln!(w, "  [{i}] {kind:<7} {value}")?;
    }
    writeln!(w)?;
    writeln!(
        w,
        "Sign and submit with your wallet, e.g. `gs --json tx ... > payload.json`."
    )
}
