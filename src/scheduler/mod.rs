//! Daily review sampling.
//!
//! Once a day, at the configured local time, a fraction of the records whose
//! last task was completed on the previous local day is queued for review.
//! Cycles run one after another on a single background task; a failed cycle
//! is logged and the next one is still scheduled.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::SchedulerConfig;
use crate::database::repository::reviews;
use crate::database::{Database, DatabaseError};
use crate::domain::sampling::sample_for_review;

/// Storage the sampling cycle reads from and writes to.
#[async_trait]
pub trait ReviewQueue: Send + Sync {
    /// Records whose tasks were all completed, the last one on `date`.
    async fn eligible_completed_on(&self, date: NaiveDate) -> Result<Vec<i64>, DatabaseError>;

    async fn enqueue_reviews(&self, death_ids: &[i64]) -> Result<u64, DatabaseError>;
}

pub struct PgReviewQueue {
    db: Database,
}

impl PgReviewQueue {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewQueue for PgReviewQueue {
    async fn eligible_completed_on(&self, date: NaiveDate) -> Result<Vec<i64>, DatabaseError> {
        let (from, until) = local_day_bounds(date);
        reviews::completed_between(self.db.pool(), from, until).await
    }

    async fn enqueue_reviews(&self, death_ids: &[i64]) -> Result<u64, DatabaseError> {
        reviews::insert_reviews(self.db.pool(), death_ids).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub date: NaiveDate,
    pub eligible: usize,
    pub sampled: Vec<i64>,
    pub inserted: u64,
}

/// One sampling pass over the records completed on `date`.
pub async fn run_cycle<Q, R>(
    queue: &Q,
    date: NaiveDate,
    percent: u32,
    rng: &mut R,
) -> Result<CycleReport, DatabaseError>
where
    Q: ReviewQueue + ?Sized,
    R: Rng + Send + ?Sized,
{
    let eligible = queue.eligible_completed_on(date).await?;
    let sampled = sample_for_review(&eligible, percent, rng);

    let inserted = if sampled.is_empty() {
        0
    } else {
        queue.enqueue_reviews(&sampled).await?
    };

    Ok(CycleReport {
        date,
        eligible: eligible.len(),
        sampled,
        inserted,
    })
}

/// First occurrence of `run_at` strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, run_at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(run_at);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// UTC instants of local midnight at the start and end of `date`.
pub fn local_day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN);
    let end = start + Duration::days(1);
    (local_to_utc(start), local_to_utc(end))
}

fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // midnight skipped by a DST jump
        None => naive.and_utc(),
    }
}

/// Runs the daily loop on a background task.
pub fn spawn(queue: Arc<dyn ReviewQueue>, config: SchedulerConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(run_at = %config.run_at, percent = config.sample_percent, "Review sampling scheduled");
        loop {
            let now = Local::now().naive_local();
            let next = next_run_after(now, config.run_at);
            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            let Some(day) = next.date().pred_opt() else {
                continue;
            };
            let mut rng = StdRng::from_entropy();
            match run_cycle(queue.as_ref(), day, config.sample_percent, &mut rng).await {
                Ok(report) => info!(
                    date = %report.date,
                    eligible = report.eligible,
                    inserted = report.inserted,
                    "Review sampling cycle finished"
                ),
                Err(e) => error!(date = %day, "Review sampling cycle failed: {}", e),
            }
        }
    })
}
