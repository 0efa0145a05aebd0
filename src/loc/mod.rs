// LOC module.
// Recomputation, cache reconciliation, aggregation, and the end-to-end run driver.

pub mod aggregate;
pub mod recompute;
pub mod reconcile;

use std::time::{Duration, Instant};

use tracing::info;

use crate::cache::{CacheRecord, CacheStore};
use crate::config::Config;
use crate::error::Result;
use crate::github::{QueryService, collect_repositories};
use crate::metrics::{QueryKind, QueryMetrics};

pub use aggregate::{RunTotals, aggregate};
pub use recompute::{LocTally, Recomputed, recompute};
pub use reconcile::{PartialReconcile, ReconcileState, Reconciler, Reconciliation};

/// Everything a caller needs after a run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub totals: RunTotals,
    pub records: Vec<CacheRecord>,
    pub metrics: QueryMetrics,
    pub elapsed: Duration,
}

/// Compute LOC totals for `config.user_name`, reusing the cache where possible.
///
/// Holds the cache file lock for the whole run.
pub async fn tally_user_loc<S: QueryService + ?Sized>(
    service: &mut S,
    config: &Config,
) -> Result<RunReport> {
    let started = Instant::now();
    let mut metrics = QueryMetrics::new();

    let author_id = service.user_id(&config.user_name).await;
    metrics.record(QueryKind::UserLookup);
    let author_id = author_id?;

    let live = collect_repositories(
        service,
        &config.user_name,
        &config.affiliations,
        &mut metrics,
    )
    .await?;

    let store = CacheStore::new(config.cache_file(), config.comment_size);
    let _lock = store.lock()?;

    let Reconciliation { records, totals } = Reconciler::new(&store, &author_id)
        .reconcile(service, &live, config.force_recompute, &mut metrics)
        .await?;

    let elapsed = started.elapsed();
    info!(
        user = %config.user_name,
        additions = totals.total_additions,
        deletions = totals.total_deletions,
        net = totals.net_loc,
        cached = totals.served_from_cache,
        queries = metrics.total(),
        elapsed_ms = elapsed.as_millis() as u64,
        "LOC tally complete"
    );

    Ok(RunReport {
        totals,
        records,
        metrics,
        elapsed,
    })
}
