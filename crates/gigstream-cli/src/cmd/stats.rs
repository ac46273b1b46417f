//! `gs stats` — platform counters.

use std::io::{self, Write};

use clap::Args;
use gigstream_core::model::PlatformStats;

use crate::output::{pretty_kv, pretty_section, render_mode};
use crate::session::Session;

/// Arguments for `gs stats`.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {}

/// Execute `gs stats`.
///
/// An unreadable platform object reports zeros rather than failing.
pub fn run_stats(_args: &StatsArgs, session: &Session) -> anyhow::Result<()> {
    let projection = session.projection()?;
    let stats = projection.fetch_platform_stats();
    render_mode(session.output, &stats, render_stats_text, render_stats_pretty)
}

fn render_stats_text(stats: &PlatformStats, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "freelancers={} clients={} jobs={}",
        stats.total_freelancers, stats.total_clients, stats.total_jobs
    )
}

fn render_stats_pretty(stats: &PlatformStats, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Platform")?;
    pretty_kv(w, "Freelancers", stats.total_freelancers.to_string())?;
    pretty_kv(w, "Clients", stats.total_clients.to_string())?;
    pretty_kv(w, "Jobs posted", stats.total_jobs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlatformStats {
        PlatformStats {
            total_freelancers: 12,
            total_clients: 4,
            total_jobs: 30,
        }
    }

    #[test]
    fn text_is_one_line_of_pairs() {
        let mut buf = Vec::new();
        render_stats_text(&sample(), &mut buf).expect("write");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "freelancers=12 clients=4 jobs=30\n"
        );
    }

    #[test]
    fn pretty_has_labeled_rows() {
        let mut buf = Vec::new();
        render_stats_pretty(&sample(), &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("Platform\n"));
        assert!(text.contains("Jobs posted:"));
        assert!(text.contains("30"));
    }
}
