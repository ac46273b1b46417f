//! `gs profile` — look up a client or freelancer profile by owner address.

use std::io::{self, Write};

use clap::{Args, Subcommand};
use gigstream_core::error::ErrorCode;
use gigstream_core::format::{format_date, skill_tags};
use gigstream_core::model::{ClientProfile, FreelancerProfile};

use crate::output::{CliError, Renderable, pretty_kv, pretty_section, render_error, render_item};
use crate::session::Session;

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Latest client profile created by an address
    Client {
        /// Owner address.
        owner: String,
    },
    /// Latest freelancer profile created by an address
    Freelancer {
        /// Owner address.
        owner: String,
    },
}

/// Execute `gs profile`.
pub fn run_profile(args: &ProfileArgs, session: &Session) -> anyhow::Result<()> {
    let projection = session.projection()?;

    let found = match &args.command {
        ProfileCommand::Client { owner } => projection
            .fetch_client_profile(owner)
            .map(|profile| profile.map(|p| render_item(&p, session.output))),
        ProfileCommand::Freelancer { owner } => projection
            .fetch_freelancer_profile(owner)
            .map(|profile| profile.map(|p| render_item(&p, session.output))),
    };

    match found {
        Ok(Some(rendered)) => Ok(rendered?),
        Ok(None) => {
            let (kind, owner) = match &args.command {
                ProfileCommand::Client { owner } => ("client", owner),
                ProfileCommand::Freelancer { owner } => ("freelancer", owner),
            };
            render_error(
                session.output,
                &CliError::from_code(
                    ErrorCode::ProfileNotFound,
                    format!("no {kind} profile found for {owner}"),
                ),
            )?;
            anyhow::bail!("{kind} profile not found");
        }
        Err(e) => {
            render_error(
                session.output,
                &CliError::from_code(e.error_code(), e.to_string()),
            )?;
            Err(e.into())
        }
    }
}

impl Renderable for ClientProfile {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        pretty_section(w, &format!("Client profile: {}", self.name))?;
        pretty_kv(w, "Id", &self.id)?;
        pretty_kv(w, "Owner", &self.owner)?;
        pretty_kv(w, "Company", &self.company)?;
        pretty_kv(w, "Projects", self.projects_posted.to_string())?;
        pretty_kv(w, "Rating", self.rating.to_string())?;
        pretty_kv(w, "Joined", format_date(self.created_at))?;
        if !self.description.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", self.description)?;
        }
        Ok(())
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(w, self).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "id={} owner={} name={} company={} projects={} rating={}",
            self.id, self.owner, self.name, self.company, self.projects_posted, self.rating
        )
    }
}

impl Renderable for FreelancerProfile {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        pretty_section(w, &format!("Freelancer profile: {}", self.name))?;
        pretty_kv(w, "Id", &self.id)?;
        pretty_kv(w, "Owner", &self.owner)?;
        pretty_kv(w, "Skills", skill_tags(&self.skills).join(" | "))?;
        if !self.portfolio.is_empty() {
            pretty_kv(w, "Portfolio", &self.portfolio)?;
        }
        pretty_kv(w, "Completed", self.completed_jobs.to_string())?;
        pretty_kv(w, "Rating", self.rating.to_string())?;
        pretty_kv(w, "Joined", format_date(self.created_at))?;
        if !self.bio.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", self.bio)?;
        }
        Ok(())
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(w, self).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "id={} owner={} name={} skills={} completed={} rating={}",
            self.id, self.owner, self.name, self.skills, self.completed_jobs, self.rating
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freelancer() -> FreelancerProfile {
        FreelancerProfile {
            id: "0xp1".into(),
            owner: "0xf1".into(),
            name: "Ada".into(),
            bio: "Systems engineer".into(),
            skills: "Rust, Move".into(),
            portfolio: String::new(),
            rating: 5,
            completed_jobs: 12,
            created_at: 1_893_456_000_000,
        }
    }

    #[test]
    fn freelancer_pretty_lists_skill_tags() {
        let mut buf = Vec::new();
        freelancer().render_human(&mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("Freelancer profile: Ada"));
        assert!(text.contains("Rust | Move"));
        assert!(text.contains("2030-01-01"));
        assert!(!text.contains("Portfolio"));
    }

    #[test]
    fn freelancer_json_round_trips_fields() {
        let mut buf = Vec::new();
        freelancer().render_json(&mut buf).expect("write");
        let json: serde_json::Value = serde_json::from_slice(&buf).expect("valid json");
        assert_eq!(json["completed_jobs"], 12);
        assert_eq!(json["skills"], "Rust, Move");
    }

    #[test]
    fn client_text_is_single_line() {
        let client = ClientProfile {
            id: "0xp2".into(),
            owner: "0xc1".into(),
            name: "Acme".into(),
            company: "Acme Ltd".into(),
            description: "Widgets".into(),
            projects_posted: 3,
            rating: 4,
            created_at: 0,
        };
        let mut buf = Vec::new();
        client.render_table(&mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("projects=3"));
    }
}
