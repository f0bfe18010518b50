use crate::cli::{DiscoverArgs, DisplayArgs, SmokeTestArgs};
use job_scout::config::{AppConfig, SourceConfig};
use job_scout::error::AppError;
use job_scout::workflows::discovery::{Classification, FilterPipeline, InteractiveSelector};
use job_scout::workflows::listings::ListingFetcher;
use job_scout::workflows::tracking::{
    with_fresh_store, with_store, AppliedJob, JobId, JobRepository, RepositoryError,
};
use std::io::{self, Write};
use tracing::info;

const SMOKE_TITLE: &str = "myjob";
const SMOKE_ID: &str = "myJobId";

pub(crate) async fn run_discover(mut config: AppConfig, args: DiscoverArgs) -> Result<(), AppError> {
    let DiscoverArgs { source_url, db } = args;

    if let Some(url) = source_url {
        config.source = SourceConfig::new(url)?;
    }
    let db = db.unwrap_or(config.store.path);

    let postings = ListingFetcher::default()
        .fetch(&config.source.listing_url)
        .await?;
    let pipeline = FilterPipeline::new(config.filter);
    let detail_base_url = config.source.detail_base_url().to_string();

    with_store(&db, |store| -> Result<(), AppError> {
        let classification = pipeline.classify(&postings, store)?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        render_classification(&classification, &mut out)?;

        let outcome = InteractiveSelector::new(store, detail_base_url).run(
            classification.new,
            io::stdin().lock(),
            &mut out,
        )?;
        info!(
            recorded = outcome.recorded.len(),
            remaining = outcome.remaining.len(),
            stop = ?outcome.stop,
            "discovery finished"
        );
        Ok(())
    })
}

pub(crate) fn run_display(config: AppConfig, args: DisplayArgs) -> Result<(), AppError> {
    let db = args.db.unwrap_or(config.store.path);

    with_store(&db, |store| -> Result<(), AppError> {
        let jobs = store.list()?;
        let stdout = io::stdout();
        render_applied_jobs(&jobs, args.json, &mut stdout.lock())
    })
}

pub(crate) fn run_smoke_test(config: AppConfig, args: SmokeTestArgs) -> Result<(), AppError> {
    let db = args.db.unwrap_or(config.store.test_path);

    with_fresh_store(&db, |store| {
        let stdout = io::stdout();
        smoke_sequence(store, &mut stdout.lock())
    })
}

fn smoke_sequence<R, W>(store: &R, out: &mut W) -> Result<(), AppError>
where
    R: JobRepository + ?Sized,
    W: Write,
{
    let id = JobId::from(SMOKE_ID);
    store.insert(SMOKE_TITLE, &id)?;

    let found = store
        .find(&id)?
        .ok_or_else(|| RepositoryError::Unavailable(format!("{id} missing right after insert")))?;
    writeln!(out, "{}", found.applied_at)?;

    render_applied_jobs(&store.list()?, false, out)
}

fn render_classification<W: Write>(
    classification: &Classification,
    out: &mut W,
) -> Result<(), AppError> {
    writeln!(out)?;
    writeln!(out, "Bad Titles:")?;
    for (title, ids) in &classification.rejected {
        let ids = ids.iter().map(JobId::as_str).collect::<Vec<_>>().join(", ");
        writeln!(out, "  {title}: [{ids}]")?;
    }
    writeln!(
        out,
        "Already applied: {} | outside target location: {}",
        classification.already_applied.len(),
        classification.outside_location
    )?;
    Ok(())
}

fn render_applied_jobs<W: Write>(jobs: &[AppliedJob], json: bool, out: &mut W) -> Result<(), AppError> {
    if json {
        serde_json::to_writer_pretty(&mut *out, jobs)?;
        writeln!(out)?;
        return Ok(());
    }

    for job in jobs {
        writeln!(out, "{} {} {}", job.title, job.id, job.applied_at)?;
    }
    Ok(())
}
