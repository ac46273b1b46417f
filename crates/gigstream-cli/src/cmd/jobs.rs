//! `gs jobs` — the job feed.

use std::io::{self, Write};

use clap::Args;
use gigstream_core::error::ErrorCode;
use gigstream_core::format::{days_remaining, format_date, short_address, skill_tags};
use gigstream_core::model::JobListing;
use gigstream_core::projection::{JobFeed, ViewContext, system_clock};

use crate::output::{CliError, pretty_rule, render_error, render_mode};
use crate::session::Session;

/// Arguments for `gs jobs`.
#[derive(Args, Debug)]
pub struct JobsArgs {
    /// Address of the viewing account.
    #[arg(long, env = "GIGSTREAM_VIEWER")]
    pub viewer: Option<String>,

    /// Slice of the feed to show: default, hire, or find-gig.
    #[arg(long, default_value = "default")]
    pub view: ViewContext,
}

/// Execute `gs jobs`.
pub fn run_jobs(args: &JobsArgs, session: &Session) -> anyhow::Result<()> {
    let projection = session.projection()?;
    let feed = projection.fetch_jobs(args.viewer.as_deref(), args.view);

    if let Some(message) = &feed.error {
        render_error(
            session.output,
            &CliError::from_code(ErrorCode::DiscoveryFailed, message.clone()),
        )?;
        anyhow::bail!("{message}");
    }

    let now = system_clock()();
    render_mode(
        session.output,
        &feed,
        |feed, w| render_feed_text(feed, w),
        |feed, w| render_feed_pretty(feed, now, w),
    )
}

const TEXT_HEADERS: [&str; 6] = ["ID", "STATUS", "BUDGET", "DEADLINE", "CLIENT", "TITLE"];

fn render_feed_text(feed: &JobFeed, w: &mut dyn Write) -> io::Result<()> {
    if feed.jobs.is_empty() {
        return Ok(());
    }
    writeln!(w, "{}", TEXT_HEADERS.join("  "))?;
    for job in &feed.jobs {
        writeln!(
            w,
            "{}  {}  {}  {}  {}  {}",
            job.id,
            job.status,
            job.budget,
            format_date(job.deadline),
            job.client,
            job.title
        )?;
    }
    Ok(())
}

fn render_feed_pretty(feed: &JobFeed, now_ms: u64, w: &mut dyn Write) -> io::Result<()> {
    if feed.jobs.is_empty() {
        writeln!(w, "No jobs to show.")?;
    }
    for job in &feed.jobs {
        render_job_pretty(job, now_ms, w)?;
    }
    if feed.skipped > 0 {
        writeln!(
            w,
            "{} of {} listings could not be loaded and were skipped.",
            feed.skipped, feed.discovered
        )?;
    }
    Ok(())
}

fn render_job_pretty(job: &JobListing, now_ms: u64, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}  [{}]", job.title, job.status)?;
    pretty_rule(w)?;
    writeln!(w, "  {:<12} {}", "id:", short_address(&job.id))?;
    writeln!(w, "  {:<12} {}", "client:", short_address(&job.client))?;
    writeln!(w, "  {:<12} {}", "budget:", job.budget)?;
    writeln!(
        w,
        "  {:<12} {} ({})",
        "deadline:",
        format_date(job.deadline),
        days_remaining(job.deadline, now_ms)
    )?;
    let tags = skill_tags(&job.required_skills);
    if !tags.is_empty() {
        writeln!(w, "  {:<12} {}", "skills:", tags.join(" | "))?;
    }
    writeln!(w, "  {:<12} {}", "applicants:", job.applications.len())?;
    if let Some(freelancer) = &job.assigned_freelancer {
        writeln!(w, "  {:<12} {}", "assigned:", short_address(freelancer))?;
    }
    if !job.description.is_empty() {
        writeln!(w)?;
        for line in job.description.lines() {
            writeln!(w, "  {line}")?;
        }
    }
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: u64 = 24 * 60 * 60 * 1000;
    const NOW: u64 = 1_893_456_000_000;

    fn job() -> JobListing {
        JobListing {
            id: "0x1234567890abcdef".into(),
            client: "0xc1".into(),
            title: "Audit escrow".into(),
            description: "Review the module".into(),
            required_skills: "Move, Rust".into(),
            budget: 5_000,
            deadline: NOW + 3 * DAY_MS,
            status: "Open".into(),
            applications: vec!["0xf1".into()],
            assigned_freelancer: None,
            created_at: NOW,
        }
    }

    fn feed(jobs: Vec<JobListing>) -> JobFeed {
        JobFeed {
            discovered: jobs.len(),
            jobs,
            skipped: 0,
            error: None,
        }
    }

    #[test]
    fn text_rows_follow_headers() {
        let mut buf = Vec::new();
        render_feed_text(&feed(vec![job()]), &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ID  STATUS  BUDGET  DEADLINE  CLIENT  TITLE"));
        assert_eq!(
            lines.next(),
            Some("0x1234567890abcdef  Open  5000  2030-01-04  0xc1  Audit escrow")
        );
    }

    #[test]
    fn empty_text_feed_prints_nothing() {
        let mut buf = Vec::new();
        render_feed_text(&feed(Vec::new()), &mut buf).expect("write");
        assert!(buf.is_empty());
    }

    #[test]
    fn pretty_shows_countdown_and_tags() {
        let mut buf = Vec::new();
        render_feed_pretty(&feed(vec![job()]), NOW, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Audit escrow  [Open]"));
        assert!(text.contains("3 days remaining"));
        assert!(text.contains("Move | Rust"));
        assert!(text.contains("0x1234...cdef"));
    }

    #[test]
    fn pretty_reports_skipped_listings() {
        let mut partial = feed(vec![job()]);
        partial.discovered = 3;
        partial.skipped = 2;
        let mut buf = Vec::new();
        render_feed_pretty(&partial, NOW, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("2 of 3 listings could not be loaded"));
    }
}
