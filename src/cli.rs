use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::tracker::filter::apply_filters;
use crate::tracker::render::{project, View};
use crate::tracker::repository::{FetchError, JobRepository};
use crate::tracker::StatusFilter;

#[derive(Debug, Parser)]
#[command(name = "job-tracker", version, about = "Track job applications and their deadlines")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the dashboard server (default)
    Serve,

    /// Fetch the job list once and print it as a table
    List {
        /// "all" or one status value (대기, 지원완료, 서류통과, 최종합격, 불합격)
        #[arg(long, default_value = "all")]
        status: StatusFilter,

        /// Only show jobs due within three days
        #[arg(long)]
        urgent: bool,
    },

    /// Apply database migrations and exit
    Migrate,
}

/// One-shot fetch, filter and render
pub async fn list<R: JobRepository>(
    repository: &R,
    status: StatusFilter,
    urgent: bool,
    today: NaiveDate,
) -> Result<View, FetchError> {
    let jobs = repository.list().await?;
    let filtered = apply_filters(&jobs, status, urgent, today);
    info!("Listing {} of {} jobs (status={}, urgent={})", filtered.len(), jobs.len(), status, urgent);
    Ok(project(&filtered, today))
}
